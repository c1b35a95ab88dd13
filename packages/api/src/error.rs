// ABOUTME: Gateway error type and its HTTP mapping
// ABOUTME: Sanitizes messages for clients and logs internal detail with a request id

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use agentdesk_core::truncate;
use agentdesk_executions::ExecutionError;
use agentdesk_storage::StorageError;

/// Longest slice of an upstream error body returned to clients
pub const MAX_UPSTREAM_EXCERPT: usize = 500;

/// Shown when the backend failed without saying why
const UNKNOWN_UPSTREAM_ERROR: &str = "Unknown error";

/// Main application error type that all handlers should return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend call failed; the raw error stays in the logs
    #[error("Execution failed")]
    ExecutionFailed(ExecutionError),

    /// The backend succeeded but its usage could not be recorded
    #[error("Usage ledger write failed")]
    LedgerWrite(ExecutionError),

    #[error("Storage error")]
    Storage(StorageError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

/// Error detail structure with machine-readable codes
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl AppError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden {
            message: message.into(),
        }
    }

    /// Convert AppError to appropriate HTTP status code and error code
    pub fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::ExecutionFailed(_) => (StatusCode::BAD_GATEWAY, "EXECUTION_FAILED"),
            AppError::LedgerWrite(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LEDGER_WRITE_FAILED"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Get user-friendly error message (sanitized for external consumption)
    pub fn to_user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => format!("Validation failed: {}", msg),
            AppError::NotFound => "The requested resource was not found".to_string(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::Forbidden { message } => message.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::ExecutionFailed(err) => {
                let detail = err.detail();
                let detail = if detail.trim().is_empty() {
                    UNKNOWN_UPSTREAM_ERROR.to_string()
                } else {
                    truncate(&detail, MAX_UPSTREAM_EXCERPT)
                };
                format!("Agent execution failed: {}", detail)
            }
            AppError::LedgerWrite(_) => {
                "Agent execution succeeded but usage could not be recorded".to_string()
            }
            AppError::Storage(_) => "Data storage error".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => AppError::NotFound,
            StorageError::Conflict(msg) => AppError::Conflict(msg),
            StorageError::InvalidInput(msg) => AppError::Validation(msg),
            other => AppError::Storage(other),
        }
    }
}

impl From<ExecutionError> for AppError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::LedgerWrite(_) => AppError::LedgerWrite(err),
            ExecutionError::Client(msg) => {
                AppError::Internal(anyhow::anyhow!("HTTP client error: {}", msg))
            }
            other => AppError::ExecutionFailed(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();
        let user_message = self.to_user_message();

        // Log internal errors with full context but don't expose details
        match &self {
            AppError::Internal(err) => {
                error!(
                    request_id = %request_id,
                    error = %err,
                    "Internal server error occurred"
                );
            }
            AppError::Storage(err) => {
                error!(
                    request_id = %request_id,
                    storage_error = %err,
                    "Storage system error"
                );
            }
            AppError::LedgerWrite(err) => {
                error!(
                    request_id = %request_id,
                    ledger_error = %err,
                    "Usage ledger write failed"
                );
            }
            AppError::ExecutionFailed(err) => {
                warn!(
                    request_id = %request_id,
                    execution_error = %truncate(&err.to_string(), MAX_UPSTREAM_EXCERPT),
                    "Agent execution failed"
                );
            }
            _ => {}
        }

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: error_code.to_string(),
                message: user_message,
            },
            request_id,
        };

        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn response_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_maps_to_422() {
        let (status, body) = response_json(AppError::Validation("query is required".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_backend_failure_maps_to_502_with_excerpt() {
        let long_body = "x".repeat(2000);
        let err: AppError = ExecutionError::Backend {
            status: 500,
            body: long_body,
        }
        .into();
        let (status, body) = response_json(err).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "EXECUTION_FAILED");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("Agent execution failed: "));
        assert!(message.len() < 600);
    }

    #[tokio::test]
    async fn test_backend_failure_with_empty_body_reads_unknown_error() {
        let err: AppError = ExecutionError::Backend {
            status: 503,
            body: String::new(),
        }
        .into();
        let (status, body) = response_json(err).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body["error"]["message"],
            "Agent execution failed: Unknown error"
        );
    }

    #[tokio::test]
    async fn test_ledger_failure_maps_to_500() {
        let err: AppError = ExecutionError::LedgerWrite(StorageError::NotFound).into();
        let (status, body) = response_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "LEDGER_WRITE_FAILED");
    }

    #[tokio::test]
    async fn test_storage_errors_are_classified() {
        assert!(matches!(AppError::from(StorageError::NotFound), AppError::NotFound));
        assert!(matches!(
            AppError::from(StorageError::Conflict("dup".into())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(StorageError::InvalidInput("bad".into())),
            AppError::Validation(_)
        ));

        let (status, body) =
            response_json(AppError::from(StorageError::Database("disk I/O".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Data storage error");
    }
}
