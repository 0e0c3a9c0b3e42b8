//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command-line flags (applied by the CLI through
//! the `with_*` builders).

use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CHECKLIST_BASE_URL, DEFAULT_CRAWL_DELAY_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT, TAXONOMY_FILE_NAME, env_vars,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Value of the User-Agent header, also matched against robots.txt groups
    pub user_agent: String,

    /// Prefix used to expand bare checklist identifiers into URLs
    pub checklist_base_url: String,

    /// Location of the taxonomy reference table
    pub taxonomy_path: PathBuf,

    /// Where to download the taxonomy table from when it is missing
    pub taxonomy_url: Option<String>,

    /// Delay between requests when robots.txt sets none (seconds)
    pub default_crawl_delay_secs: u64,

    /// Overall timeout for one request (seconds)
    pub request_timeout_secs: u64,

    /// Read robots.txt for a crawl delay before fetching
    pub respect_robots_txt: bool,

    /// Show a progress bar while retrieving
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            checklist_base_url: DEFAULT_CHECKLIST_BASE_URL.to_string(),
            taxonomy_path: default_taxonomy_path(),
            taxonomy_url: None,
            default_crawl_delay_secs: DEFAULT_CRAWL_DELAY_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            respect_robots_txt: true,
            show_progress: true,
        }
    }
}

/// Default taxonomy location: the user data directory, else the working directory
pub fn default_taxonomy_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(TAXONOMY_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(TAXONOMY_FILE_NAME))
}

/// Default config file location in the user config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        let config: Config = toml::from_str(&text)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Build the layered configuration
    ///
    /// # Arguments
    ///
    /// * `config_file` - Explicit config file; must exist when given
    /// * `env` - Environment lookup, normally `|key| std::env::var(key).ok()`
    ///
    /// Without an explicit file, the default config path is used if present.
    pub fn load_layered<F>(config_file: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(env)
    }

    /// Apply environment variable overrides
    pub fn apply_env<F>(mut self, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = env(env_vars::TAXONOMY_PATH) {
            debug!("{} overrides taxonomy path", env_vars::TAXONOMY_PATH);
            self.taxonomy_path = PathBuf::from(path);
        }
        if let Some(user_agent) = env(env_vars::USER_AGENT) {
            self.user_agent = user_agent;
        }
        if let Some(delay) = env(env_vars::CRAWL_DELAY) {
            self.default_crawl_delay_secs = delay.trim().parse().map_err(|e| {
                Error::configuration(format!(
                    "{} must be a whole number of seconds, got '{}': {}",
                    env_vars::CRAWL_DELAY,
                    delay,
                    e
                ))
            })?;
        }
        Ok(self)
    }

    /// Override the taxonomy path
    pub fn with_taxonomy_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.taxonomy_path = path.into();
        self
    }

    /// Override the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Disable the progress bar
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Skip robots.txt and use the default crawl delay
    pub fn without_robots_txt(mut self) -> Self {
        self.respect_robots_txt = false;
        self
    }

    pub fn default_crawl_delay(&self) -> Duration {
        Duration::from_secs(self.default_crawl_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(Error::configuration("user_agent must not be empty"));
        }

        if !self.checklist_base_url.starts_with("http") {
            return Err(Error::configuration(format!(
                "checklist_base_url must be an http(s) URL, got '{}'",
                self.checklist_base_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::configuration(
                "request_timeout_secs must be greater than 0",
            ));
        }

        if let Some(url) = &self.taxonomy_url {
            if !url.starts_with("http") {
                return Err(Error::configuration(format!(
                    "taxonomy_url must be an http(s) URL, got '{}'",
                    url
                )));
            }
        }

        if self.taxonomy_path.as_os_str().is_empty() {
            return Err(Error::configuration("taxonomy_path must not be empty"));
        }

        debug!(
            "Configuration valid (user agent '{}', {}s default crawl delay)",
            self.user_agent,
            self.default_crawl_delay_secs
        );
        Ok(())
    }
}
