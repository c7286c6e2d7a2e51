use std::time::Duration;

/// Store URL: runtime env var, then default (same lookup order the rest of
/// the tooling uses).
const DEFAULT_API_URL: &str = "http://localhost:9100";

const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the conversation store.
    pub base_url: String,
    /// How often the open conversation is polled for new messages.
    pub poll_interval: Duration,
    /// Timeout applied to every store request.
    pub request_timeout: Duration,
    /// Maximum conversations fetched per list load.
    pub page_limit: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl DashboardConfig {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("CHATDESK_API_URL") {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        if let Some(ms) = std::env::var("CHATDESK_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.poll_interval = Duration::from_millis(ms.max(100));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = DashboardConfig::default();
        assert_eq!(config.base_url, "http://localhost:9100");
        assert_eq!(config.poll_interval, Duration::from_millis(3000));
        assert_eq!(config.page_limit, 50);
    }
}
