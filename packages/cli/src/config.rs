use std::env;
use std::net::{IpAddr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use agentdesk_config::*;
use agentdesk_executions::{ExecutorConfig, LedgerPolicy};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid value for {name}: {value}")]
    InvalidTimeout { name: &'static str, value: String },
    #[error("Invalid ledger policy: {0}")]
    InvalidLedgerPolicy(String),
    #[error("Invalid executor URL: {0}")]
    InvalidExecutorUrl(String),
}

#[derive(Debug)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub cors_origin: String,
    pub database_path: PathBuf,
    pub executor: ExecutorConfig,
    pub encryption_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env::var(AGENTDESK_API_PORT)
            .or_else(|_| env::var(PORT))
            .unwrap_or_else(|_| DEFAULT_API_PORT.to_string());

        let port = port_str.trim().parse::<u16>()?;

        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host_str = env::var(AGENTDESK_API_HOST).unwrap_or_else(|_| DEFAULT_API_HOST.to_string());
        let host = host_str
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(host_str.clone()))?;

        let cors_origin =
            env::var(AGENTDESK_CORS_ORIGIN).unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        let database_path = env::var(AGENTDESK_DATABASE_PATH)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(agentdesk_core::default_database_path);

        let base_url =
            env::var(AGENTDESK_EXECUTOR_URL).unwrap_or_else(|_| DEFAULT_EXECUTOR_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidExecutorUrl(base_url));
        }

        let ledger_policy = match env::var(AGENTDESK_LEDGER_POLICY) {
            Ok(value) => value
                .parse::<LedgerPolicy>()
                .map_err(|_| ConfigError::InvalidLedgerPolicy(value))?,
            Err(_) => LedgerPolicy::default(),
        };

        let executor = ExecutorConfig {
            base_url,
            request_timeout: seconds_from_env(
                AGENTDESK_EXECUTOR_TIMEOUT_SECS,
                DEFAULT_EXECUTOR_TIMEOUT_SECS,
            )?,
            connect_timeout: seconds_from_env(
                AGENTDESK_EXECUTOR_CONNECT_TIMEOUT_SECS,
                DEFAULT_EXECUTOR_CONNECT_TIMEOUT_SECS,
            )?,
            default_provider: env::var(AGENTDESK_DEFAULT_PROVIDER)
                .unwrap_or_else(|_| DEFAULT_PROVIDER.to_string()),
            default_model: env::var(AGENTDESK_DEFAULT_MODEL)
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            ledger_policy,
        };

        let encryption_secret = env::var(AGENTDESK_ENCRYPTION_SECRET)
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Config {
            host,
            port,
            cors_origin,
            database_path,
            executor,
            encryption_secret,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Positive whole seconds from `name`, or `default` when unset
fn seconds_from_env(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::InvalidTimeout { name, value }),
        },
        Err(_) => Ok(Duration::from_secs(default)),
    }
}
