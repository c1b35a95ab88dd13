// ABOUTME: Agent execution proxy for Agentdesk
// ABOUTME: Forwards invocations to the execution backend and records reported usage

pub mod config;
pub mod error;
pub mod proxy;
pub mod usage;

pub use config::{ExecutorConfig, LedgerPolicy};
pub use error::{ExecutionError, ExecutionResult};
pub use proxy::{resolve_endpoint, ExecutionProxy};
