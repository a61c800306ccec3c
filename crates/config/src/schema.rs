//! Host config schema: how the bundled CLI reaches PagerDuty.

use serde::{Deserialize, Serialize};

/// Events API v2 enqueue endpoint.
pub const DEFAULT_EVENTS_API_URL: &str = "https://events.pagerduty.com/v2/enqueue";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdNotifyConfig {
    pub pagerduty: PagerDutyClientConfig,
}

/// Settings for the PagerDuty Events API client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerDutyClientConfig {
    /// Override the enqueue endpoint (proxies, tests).
    pub api_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PagerDutyClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_EVENTS_API_URL.into(),
            timeout_secs: 10,
        }
    }
}
