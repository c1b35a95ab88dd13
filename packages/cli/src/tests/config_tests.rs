use crate::config::{Config, ConfigError};
use agentdesk_executions::LedgerPolicy;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::time::Duration;

const ALL_VARS: &[&str] = &[
    "AGENTDESK_API_HOST",
    "AGENTDESK_API_PORT",
    "PORT",
    "AGENTDESK_CORS_ORIGIN",
    "AGENTDESK_DATABASE_PATH",
    "AGENTDESK_EXECUTOR_URL",
    "AGENTDESK_EXECUTOR_TIMEOUT_SECS",
    "AGENTDESK_EXECUTOR_CONNECT_TIMEOUT_SECS",
    "AGENTDESK_LEDGER_POLICY",
    "AGENTDESK_DEFAULT_PROVIDER",
    "AGENTDESK_DEFAULT_MODEL",
    "AGENTDESK_ENCRYPTION_SECRET",
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_config_from_env_defaults() {
    clear_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 4001);
    assert_eq!(config.host.to_string(), "127.0.0.1");
    assert_eq!(config.cors_origin, "http://localhost:5173");
    assert!(config.database_path.ends_with(".agentdesk/agentdesk.db"));
    assert_eq!(config.executor.base_url, "http://localhost:8000");
    assert_eq!(config.executor.request_timeout, Duration::from_secs(120));
    assert_eq!(config.executor.connect_timeout, Duration::from_secs(10));
    assert_eq!(config.executor.default_provider, "openai");
    assert_eq!(config.executor.default_model, "gpt-4");
    assert_eq!(config.executor.ledger_policy, LedgerPolicy::Strict);
    assert!(config.encryption_secret.is_none());
}

#[test]
#[serial]
fn test_config_from_env_with_all_custom() {
    clear_env();
    env::set_var("AGENTDESK_API_HOST", "0.0.0.0");
    env::set_var("AGENTDESK_API_PORT", "3000");
    env::set_var("AGENTDESK_CORS_ORIGIN", "https://app.example.com");
    env::set_var("AGENTDESK_DATABASE_PATH", "/tmp/agentdesk-test.db");
    env::set_var("AGENTDESK_EXECUTOR_URL", "https://agents.internal:9000");
    env::set_var("AGENTDESK_EXECUTOR_TIMEOUT_SECS", "30");
    env::set_var("AGENTDESK_LEDGER_POLICY", "best-effort");
    env::set_var("AGENTDESK_DEFAULT_MODEL", "gpt-4o");
    env::set_var("AGENTDESK_ENCRYPTION_SECRET", "s3cret");

    let config = Config::from_env().unwrap();

    assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    assert_eq!(config.cors_origin, "https://app.example.com");
    assert_eq!(config.database_path.to_str(), Some("/tmp/agentdesk-test.db"));
    assert_eq!(config.executor.base_url, "https://agents.internal:9000");
    assert_eq!(config.executor.request_timeout, Duration::from_secs(30));
    assert_eq!(config.executor.ledger_policy, LedgerPolicy::BestEffort);
    assert_eq!(config.executor.default_model, "gpt-4o");
    assert_eq!(config.encryption_secret.as_deref(), Some("s3cret"));

    clear_env();
}

#[test]
#[serial]
fn test_legacy_port_variable() {
    clear_env();
    env::set_var("PORT", "8080");

    assert_eq!(Config::from_env().unwrap().port, 8080);

    env::set_var("AGENTDESK_API_PORT", "9090");
    assert_eq!(Config::from_env().unwrap().port, 9090);

    clear_env();
}

#[test]
#[serial]
fn test_config_invalid_port() {
    clear_env();
    env::set_var("AGENTDESK_API_PORT", "not-a-number");

    let result = Config::from_env();
    assert!(matches!(result.unwrap_err(), ConfigError::InvalidPort(_)));

    env::set_var("AGENTDESK_API_PORT", "0");
    let result = Config::from_env();
    assert!(matches!(result.unwrap_err(), ConfigError::PortOutOfRange(0)));

    clear_env();
}

#[rstest]
#[case("AGENTDESK_EXECUTOR_TIMEOUT_SECS", "0")]
#[case("AGENTDESK_EXECUTOR_TIMEOUT_SECS", "soon")]
#[case("AGENTDESK_EXECUTOR_CONNECT_TIMEOUT_SECS", "-1")]
#[serial]
fn test_config_invalid_timeouts(#[case] var: &str, #[case] value: &str) {
    clear_env();
    env::set_var(var, value);

    let result = Config::from_env();
    assert!(matches!(result.unwrap_err(), ConfigError::InvalidTimeout { .. }));

    clear_env();
}

#[test]
#[serial]
fn test_config_invalid_ledger_policy_and_url() {
    clear_env();
    env::set_var("AGENTDESK_LEDGER_POLICY", "sometimes");
    assert!(matches!(
        Config::from_env().unwrap_err(),
        ConfigError::InvalidLedgerPolicy(_)
    ));

    clear_env();
    env::set_var("AGENTDESK_EXECUTOR_URL", "localhost:8000");
    assert!(matches!(
        Config::from_env().unwrap_err(),
        ConfigError::InvalidExecutorUrl(_)
    ));

    clear_env();
}

#[test]
#[serial]
fn test_config_invalid_host() {
    clear_env();
    env::set_var("AGENTDESK_API_HOST", "not a host");

    assert!(matches!(
        Config::from_env().unwrap_err(),
        ConfigError::InvalidHost(_)
    ));

    clear_env();
}
