// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Agentdesk

// Server Configuration
pub const AGENTDESK_API_HOST: &str = "AGENTDESK_API_HOST";
pub const AGENTDESK_API_PORT: &str = "AGENTDESK_API_PORT";
pub const PORT: &str = "PORT"; // Legacy

// CORS Configuration
pub const AGENTDESK_CORS_ORIGIN: &str = "AGENTDESK_CORS_ORIGIN";

// Database Configuration
pub const AGENTDESK_DATABASE_PATH: &str = "AGENTDESK_DATABASE_PATH";

// Execution Backend Configuration
pub const AGENTDESK_EXECUTOR_URL: &str = "AGENTDESK_EXECUTOR_URL";
pub const AGENTDESK_EXECUTOR_TIMEOUT_SECS: &str = "AGENTDESK_EXECUTOR_TIMEOUT_SECS";
pub const AGENTDESK_EXECUTOR_CONNECT_TIMEOUT_SECS: &str = "AGENTDESK_EXECUTOR_CONNECT_TIMEOUT_SECS";

// Usage Ledger Configuration
pub const AGENTDESK_LEDGER_POLICY: &str = "AGENTDESK_LEDGER_POLICY";
pub const AGENTDESK_DEFAULT_PROVIDER: &str = "AGENTDESK_DEFAULT_PROVIDER";
pub const AGENTDESK_DEFAULT_MODEL: &str = "AGENTDESK_DEFAULT_MODEL";

// Credential Encryption
pub const AGENTDESK_ENCRYPTION_SECRET: &str = "AGENTDESK_ENCRYPTION_SECRET";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";

// Defaults
pub const DEFAULT_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_API_PORT: u16 = 4001;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_EXECUTOR_URL: &str = "http://localhost:8000";
pub const DEFAULT_EXECUTOR_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_EXECUTOR_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_LOG_FILTER: &str = "info,agentdesk=debug";
