use std::time::Duration;

use crate::error::{Error, Result};

/// Default WebSocket endpoint for the feed backend
const DEFAULT_WS_URL: &str = "ws://localhost:8765";

/// Default number of reconnection attempts before giving up
const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Default delay between reconnection attempts
const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_millis(3000);

/// Configuration for a [`FeedSession`](crate::session::FeedSession)
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tradefeed_rs::FeedConfig;
///
/// let config = FeedConfig::default()
///     .with_url("ws://feed.example.com:8765")
///     .with_max_reconnect_attempts(3)
///     .with_reconnect_interval(Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// WebSocket endpoint URL
    pub url: String,
    /// Token sent as an auth frame immediately after the connection opens
    pub auth_token: Option<String>,
    /// Number of automatic reconnection attempts before the session fails
    pub max_reconnect_attempts: u32,
    /// Fixed delay between reconnection attempts
    pub reconnect_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_WS_URL.to_string(),
            auth_token: None,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
        }
    }
}

impl FeedConfig {
    /// Build a configuration from environment variables
    ///
    /// Recognized variables:
    /// - `TRADEFEED_WS_URL` - WebSocket endpoint
    /// - `TRADEFEED_AUTH_TOKEN` - auth token sent after connect
    /// - `TRADEFEED_MAX_RECONNECT_ATTEMPTS` - attempt bound
    /// - `TRADEFEED_RECONNECT_INTERVAL_MS` - retry delay in milliseconds
    ///
    /// Unset variables fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a numeric variable is set but
    /// unparsable.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("TRADEFEED_WS_URL") {
            config.url = url;
        }
        if let Ok(token) = std::env::var("TRADEFEED_AUTH_TOKEN") {
            config.auth_token = Some(token);
        }
        if let Ok(raw) = std::env::var("TRADEFEED_MAX_RECONNECT_ATTEMPTS") {
            config.max_reconnect_attempts = raw.parse().map_err(|_| {
                Error::Config(format!(
                    "invalid TRADEFEED_MAX_RECONNECT_ATTEMPTS: {}",
                    raw
                ))
            })?;
        }
        if let Ok(raw) = std::env::var("TRADEFEED_RECONNECT_INTERVAL_MS") {
            let ms: u64 = raw.parse().map_err(|_| {
                Error::Config(format!("invalid TRADEFEED_RECONNECT_INTERVAL_MS: {}", raw))
            })?;
            config.reconnect_interval = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Set the WebSocket endpoint URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the auth token sent immediately after the connection opens
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the number of automatic reconnection attempts
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    /// Set the fixed delay between reconnection attempts
    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }
}
