//! Client configuration.
//!
//! Durations are given in milliseconds when deserialized:
//!
//! ```json
//! { "url": "https://api.devnet.solana.com", "timeout_ms": 10000 }
//! ```

use std::time::Duration;

use serde::{Deserialize, Deserializer};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_PREFLIGHT_COMMITMENT: &str = "confirmed";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcConfig {
    pub url: String,

    /// Per-request HTTP timeout.
    #[serde(
        rename = "timeout_ms",
        default = "default_timeout",
        deserialize_with = "duration_from_millis"
    )]
    pub timeout: Duration,

    /// Delay between `getSignatureStatuses` polls while confirming.
    #[serde(
        rename = "poll_interval_ms",
        default = "default_poll_interval",
        deserialize_with = "duration_from_millis"
    )]
    pub poll_interval: Duration,

    #[serde(default = "default_preflight_commitment")]
    pub preflight_commitment: String,

    #[serde(default)]
    pub skip_preflight: bool,
}

impl RpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            preflight_commitment: DEFAULT_PREFLIGHT_COMMITMENT.to_string(),
            skip_preflight: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_preflight_commitment(mut self, commitment: impl Into<String>) -> Self {
        self.preflight_commitment = commitment.into();
        self
    }

    pub fn with_skip_preflight(mut self, skip_preflight: bool) -> Self {
        self.skip_preflight = skip_preflight;
        self
    }
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_preflight_commitment() -> String {
    DEFAULT_PREFLIGHT_COMMITMENT.to_string()
}

fn duration_from_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}
