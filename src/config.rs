//! Configuration module for freebie-alert.
//!
//! Two layers feed the program. [`Subscription`] holds the six required
//! values given on the command line; [`Config`] holds the optional ambient
//! settings read from a TOML file.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{AlertError, Result};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional path to a log file. Console only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Forum endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ForumConfig {
    /// Scheme and host the listing is fetched from.
    #[serde(default = "default_forum_base_url")]
    pub base_url: String,
    /// Host prefixed to permalinks in notifications.
    #[serde(default = "default_link_host")]
    pub link_host: String,
    /// User-Agent header sent with every listing request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_forum_base_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_link_host() -> String {
    "www.reddit.com".to_string()
}

fn default_user_agent() -> String {
    "Chrome".to_string()
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            base_url: default_forum_base_url(),
            link_host: default_link_host(),
            user_agent: default_user_agent(),
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_total_timeout() -> u64 {
    30
}

impl HttpConfig {
    /// Connection timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Total request timeout as a [`Duration`].
    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs(self.total_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            total_timeout_secs: default_total_timeout(),
        }
    }
}

/// Twilio API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    /// Base URL of the Twilio REST API.
    #[serde(default = "default_twilio_api_base")]
    pub api_base: String,
}

fn default_twilio_api_base() -> String {
    "https://api.twilio.com".to_string()
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            api_base: default_twilio_api_base(),
        }
    }
}

/// Poll loop configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Skip items already delivered in a recent poll.
    #[serde(default)]
    pub dedup: bool,
    /// How many polls a delivered item is remembered for when dedup is on.
    #[serde(default = "default_seen_retention_polls")]
    pub seen_retention_polls: u32,
}

fn default_seen_retention_polls() -> u32 {
    3
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            dedup: false,
            seen_retention_polls: default_seen_retention_polls(),
        }
    }
}

/// Ambient configuration, optionally loaded from a TOML file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Forum endpoint configuration.
    #[serde(default)]
    pub forum: ForumConfig,
    /// HTTP client configuration.
    #[serde(default)]
    pub http: HttpConfig,
    /// Twilio API configuration.
    #[serde(default)]
    pub twilio: TwilioConfig,
    /// Poll loop configuration.
    #[serde(default)]
    pub poll: PollConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(AlertError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| AlertError::Config(format!("config parse error: {e}")))
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - a base URL is not an absolute http(s) URL
    /// - a timeout is zero
    /// - dedup is on with a retention of zero polls
    pub fn validate(&self) -> Result<()> {
        validate_base_url("forum.base_url", &self.forum.base_url)?;
        validate_base_url("twilio.api_base", &self.twilio.api_base)?;

        if self.http.connect_timeout_secs == 0 || self.http.total_timeout_secs == 0 {
            return Err(AlertError::Config(
                "http timeouts must be at least one second".to_string(),
            ));
        }

        if self.poll.dedup && self.poll.seen_retention_polls == 0 {
            return Err(AlertError::Config(
                "poll.seen_retention_polls must be positive when dedup is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_base_url(key: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| AlertError::Config(format!("{key} is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AlertError::Config(format!(
            "{key} has unsupported scheme: {scheme}"
        ))),
    }
}

/// Twilio account credentials and phone numbers.
#[derive(Clone)]
pub struct TwilioCredentials {
    /// Account SID.
    pub account_id: String,
    /// Auth token.
    pub auth_token: String,
    /// Sending (Twilio) number.
    pub from_number: String,
    /// Recipient number.
    pub to_number: String,
}

impl std::fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_id", &self.account_id)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("to_number", &self.to_number)
            .finish()
    }
}

/// What to watch and whom to tell, as given on the command line.
#[derive(Debug, Clone)]
pub struct Subscription {
    /// Messaging credentials and numbers.
    pub credentials: TwilioCredentials,
    /// Subreddit name, without the `r/` prefix.
    pub forum_name: String,
    /// Seconds between polls; also the width of the recency window.
    pub poll_interval_secs: u64,
}

impl Subscription {
    /// Validate the subscription.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(AlertError::Config(
                "poll interval must be positive".to_string(),
            ));
        }
        if self.forum_name.trim().is_empty() {
            return Err(AlertError::Config("forum name is empty".to_string()));
        }
        Ok(())
    }
}
