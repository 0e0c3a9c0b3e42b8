//! HTTP page source
//!
//! Checklist pages redirect through a cookie-setting hop, so the agent keeps
//! a cookie store for its lifetime. Every request passes through a shared
//! throttle so concurrent batch fetches still honor the crawl delay.

use super::PageSource;
use super::throttle::ThrottledSection;
use crate::config::Config;
use crate::{Error, Result};
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Throttled HTTP client identifying itself with a fixed user agent
pub struct HtmlRetriever {
    agent: Agent,
    user_agent: String,
    throttle: ThrottledSection,
}

impl HtmlRetriever {
    /// Create a retriever
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Value sent in the `User-Agent` header
    /// * `crawl_delay` - Minimum interval between requests
    /// * `timeout` - Overall timeout for each request
    pub fn new(user_agent: impl Into<String>, crawl_delay: Duration, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            user_agent: user_agent.into(),
            throttle: ThrottledSection::new(crawl_delay),
        }
    }

    /// Create a retriever from the application configuration
    pub fn from_config(config: &Config, crawl_delay: Duration) -> Self {
        Self::new(
            config.user_agent.clone(),
            crawl_delay,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Change the crawl delay, e.g. once robots.txt has been read
    pub fn set_crawl_delay(&self, crawl_delay: Duration) {
        self.throttle.set_min_interval(crawl_delay);
    }

    pub fn crawl_delay(&self) -> Duration {
        self.throttle.min_interval()
    }
}

impl PageSource for HtmlRetriever {
    fn fetch(&self, url: &str) -> Result<String> {
        self.throttle.wait();
        debug!("GET {}", url);

        let response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|e| Error::retrieval(url, e.to_string()))?;

        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| Error::retrieval(url, format!("failed reading response body: {}", e)))?;

        debug!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
