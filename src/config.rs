use std::time::Duration;

use serde::Deserialize;

use crate::services::recommendation_client::DEFAULT_HISTORY_LIMIT;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the recommendation backend
    #[serde(default = "default_recommendation_api_url")]
    pub recommendation_api_url: String,

    /// Timeout for the recommendation request, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Number of videos requested per recommendation page
    #[serde(default = "default_feed_page_size")]
    pub feed_page_size: u32,

    /// Number of watch history entries requested
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Length of the cosmetic select/back transition, in milliseconds
    #[serde(default = "default_transition_delay_ms")]
    pub transition_delay_ms: u64,

    /// Demo session user; when unset the feed starts signed out
    #[serde(default)]
    pub session_user_id: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_recommendation_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_feed_page_size() -> u32 {
    8
}

fn default_history_limit() -> u32 {
    DEFAULT_HISTORY_LIMIT
}

fn default_transition_delay_ms() -> u64 {
    300
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recommendation_api_url: default_recommendation_api_url(),
            request_timeout_ms: default_request_timeout_ms(),
            feed_page_size: default_feed_page_size(),
            history_limit: default_history_limit(),
            transition_delay_ms: default_transition_delay_ms(),
            session_user_id: None,
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}
