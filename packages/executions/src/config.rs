// ABOUTME: Execution proxy configuration
// ABOUTME: Backend address, timeouts, fallback usage labels, and ledger failure policy

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use agentdesk_config::{
    DEFAULT_EXECUTOR_CONNECT_TIMEOUT_SECS, DEFAULT_EXECUTOR_TIMEOUT_SECS, DEFAULT_EXECUTOR_URL,
    DEFAULT_MODEL, DEFAULT_PROVIDER,
};

/// What to do when the backend succeeded but the usage entry could not be written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerPolicy {
    /// Surface the ledger failure to the caller
    #[default]
    Strict,
    /// Log the failure and still return the backend response
    BestEffort,
}

impl FromStr for LedgerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "strict" => Ok(LedgerPolicy::Strict),
            "best_effort" => Ok(LedgerPolicy::BestEffort),
            other => Err(format!("Invalid ledger policy: {}", other)),
        }
    }
}

impl fmt::Display for LedgerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerPolicy::Strict => f.write_str("strict"),
            LedgerPolicy::BestEffort => f.write_str("best_effort"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Fixed backend origin; endpoints are appended to it
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Recorded when the backend does not report a provider
    pub default_provider: String,
    /// Recorded when the backend does not report a model
    pub default_model: String,
    pub ledger_policy: LedgerPolicy,
}

impl ExecutorConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXECUTOR_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_EXECUTOR_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_EXECUTOR_CONNECT_TIMEOUT_SECS),
            default_provider: DEFAULT_PROVIDER.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            ledger_policy: LedgerPolicy::Strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_policy_parsing() {
        assert_eq!("strict".parse::<LedgerPolicy>().unwrap(), LedgerPolicy::Strict);
        assert_eq!("Best-Effort".parse::<LedgerPolicy>().unwrap(), LedgerPolicy::BestEffort);
        assert_eq!("best_effort".parse::<LedgerPolicy>().unwrap(), LedgerPolicy::BestEffort);
        assert!("sometimes".parse::<LedgerPolicy>().is_err());
        assert_eq!(LedgerPolicy::default(), LedgerPolicy::Strict);
    }

    #[test]
    fn test_defaults() {
        let config = ExecutorConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_model, "gpt-4");
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }
}
