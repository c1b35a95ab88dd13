// ABOUTME: Execution proxy error types
// ABOUTME: Distinguishes backend failures from usage ledger write failures

use agentdesk_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Connect failure, timeout, or broken response stream
    #[error("Agent execution failed: {0}")]
    Transport(String),

    /// Backend answered with a non-success status; `body` is its raw response text
    #[error("Agent execution failed: {body}")]
    Backend { status: u16, body: String },

    /// Success status, but the body is not a JSON object
    #[error("Agent execution failed: invalid backend response: {0}")]
    InvalidResponse(String),

    /// Backend succeeded but the usage entry could not be written
    #[error("Failed to record usage: {0}")]
    LedgerWrite(#[source] StorageError),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;

impl ExecutionError {
    /// True for the failures where the backend call itself did not succeed
    pub fn is_execution_failure(&self) -> bool {
        matches!(
            self,
            ExecutionError::Transport(_)
                | ExecutionError::Backend { .. }
                | ExecutionError::InvalidResponse(_)
        )
    }

    /// Backend-supplied or transport detail, without the error prefix
    pub fn detail(&self) -> String {
        match self {
            ExecutionError::Transport(detail)
            | ExecutionError::InvalidResponse(detail)
            | ExecutionError::Client(detail) => detail.clone(),
            ExecutionError::Backend { body, .. } => body.clone(),
            ExecutionError::LedgerWrite(err) => err.to_string(),
        }
    }
}
