//! robots.txt crawl-delay discovery
//!
//! Only the `Crawl-delay` directive is honored. Rules in a group apply when
//! its `User-agent` line names our agent or `*`; the longest delay across all
//! applicable groups wins.

use super::PageSource;
use crate::Result;
use crate::constants::ROBOTS_FILE_NAME;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT_TAG: &str = "user-agent:";
const CRAWL_DELAY_TAG: &str = "crawl-delay:";

/// Scheme and host part of a URL ("https://ebird.org/checklist/S1" gives
/// "https://ebird.org")
///
/// Returns `None` for an http(s) URL without `//`.
pub fn base_url(url: &str) -> Option<String> {
    let host_start = if url.starts_with("http") {
        url.find("//")? + 2
    } else {
        0
    };

    match url[host_start..].find('/') {
        Some(slash) => Some(url[..host_start + slash].to_string()),
        None => Some(url.to_string()),
    }
}

/// A fetched robots.txt file
#[derive(Debug, Clone, Default)]
pub struct RobotsTxt {
    content: String,
}

impl RobotsTxt {
    pub fn parse(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Fetch `<base>/robots.txt`
    pub fn fetch(source: &dyn PageSource, base: &str) -> Result<Self> {
        let separator = if base.ends_with('/') { "" } else { "/" };
        let url = format!("{}{}{}", base, separator, ROBOTS_FILE_NAME);
        debug!("Fetching {}", url);
        Ok(Self::parse(source.fetch(&url)?))
    }

    /// Longest crawl delay applying to `user_agent`, if any group sets one
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        let mut rules_apply = false;
        let mut delay: Option<Duration> = None;

        for line in self.content.lines() {
            let line = line.trim();
            let lower = line.to_ascii_lowercase();

            if let Some(agent) = lower.strip_prefix(USER_AGENT_TAG) {
                let agent = agent.trim();
                rules_apply = agent == "*" || agent.contains(&user_agent.to_ascii_lowercase());
            } else if rules_apply {
                if let Some(value) = lower.strip_prefix(CRAWL_DELAY_TAG) {
                    if let Some(parsed) = parse_delay(value) {
                        delay = Some(delay.map_or(parsed, |current| current.max(parsed)));
                    }
                }
            }
        }

        delay
    }
}

fn parse_delay(value: &str) -> Option<Duration> {
    let seconds = value.trim().parse::<f64>().ok()?;
    if seconds.is_finite() && seconds >= 0.0 {
        Some(Duration::from_secs_f64(seconds))
    } else {
        None
    }
}

/// Work out the delay to keep between requests to the host of `first_url`
///
/// Uses the robots.txt crawl delay when the file can be fetched and sets one;
/// otherwise falls back to `default_delay`.
pub fn resolve_crawl_delay(
    source: &dyn PageSource,
    first_url: &str,
    user_agent: &str,
    default_delay: Duration,
) -> Duration {
    let Some(base) = base_url(first_url) else {
        warn!("Cannot determine host of {}, using default crawl delay", first_url);
        return default_delay;
    };

    match RobotsTxt::fetch(source, &base) {
        Ok(robots) => match robots.crawl_delay(user_agent) {
            Some(delay) => {
                info!("Using robots.txt crawl delay of {:?} for {}", delay, base);
                delay
            }
            // No Crawl-delay still paces requests at the configured default, never zero
            None => {
                debug!("robots.txt for {} sets no crawl delay", base);
                default_delay
            }
        },
        Err(e) => {
            warn!("Could not read robots.txt for {}: {}", base, e);
            default_delay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const ROBOTS: &str = "\
User-agent: Googlebot
Crawl-delay: 30

User-agent: *
Disallow: /admin
Crawl-delay: 2

User-agent: eBird Compiler
Crawl-delay: 5
";

    struct FixedSource(Option<&'static str>);

    impl PageSource for FixedSource {
        fn fetch(&self, url: &str) -> Result<String> {
            assert_eq!(url, "https://ebird.org/robots.txt");
            self.0
                .map(str::to_string)
                .ok_or_else(|| Error::retrieval(url, "404"))
        }
    }

    #[test]
    fn test_base_url() {
        assert_eq!(
            base_url("https://ebird.org/checklist/S76543210").as_deref(),
            Some("https://ebird.org")
        );
        assert_eq!(base_url("https://ebird.org").as_deref(), Some("https://ebird.org"));
        assert_eq!(base_url("ebird.org/checklist").as_deref(), Some("ebird.org"));
        assert_eq!(base_url("http:ebird.org"), None);
    }

    #[test]
    fn test_crawl_delay_takes_longest_applicable() {
        let robots = RobotsTxt::parse(ROBOTS);
        assert_eq!(
            robots.crawl_delay("eBird Compiler"),
            Some(Duration::from_secs(5))
        );
        assert_eq!(robots.crawl_delay("other-bot"), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_crawl_delay_absent() {
        let robots = RobotsTxt::parse("User-agent: *\nDisallow: /private\n");
        assert_eq!(robots.crawl_delay("eBird Compiler"), None);
    }

    #[test]
    fn test_crawl_delay_ignores_bad_values() {
        let robots = RobotsTxt::parse("User-agent: *\nCrawl-delay: soon\nCrawl-delay: 0.5\n");
        assert_eq!(
            robots.crawl_delay("eBird Compiler"),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_resolve_crawl_delay() {
        let default = Duration::from_secs(1);

        let found = resolve_crawl_delay(
            &FixedSource(Some(ROBOTS)),
            "https://ebird.org/checklist/S1",
            "eBird Compiler",
            default,
        );
        assert_eq!(found, Duration::from_secs(5));

        let missing = resolve_crawl_delay(
            &FixedSource(None),
            "https://ebird.org/checklist/S1",
            "eBird Compiler",
            default,
        );
        assert_eq!(missing, default);
    }

    #[test]
    fn test_resolve_without_crawl_delay_keeps_default() {
        let default = Duration::from_secs(1);

        let delay = resolve_crawl_delay(
            &FixedSource(Some("User-agent: *\nDisallow: /private\n")),
            "https://ebird.org/checklist/S1",
            "eBird Compiler",
            default,
        );

        assert_eq!(delay, default);
        assert_ne!(delay, Duration::ZERO);
    }
}
