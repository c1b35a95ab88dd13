// ABOUTME: HTTP request handler for running an agent
// ABOUTME: Validates input, selects the caller credential, and proxies to the execution backend

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::auth::CurrentUser;
use super::error::AppError;
use super::extract::{ApiJson, ApiPath};
use super::state::AppState;
use super::validation::{input_or_empty, validate_input};

/// Request body for running an agent
#[derive(Debug, Default, Deserialize)]
pub struct RunAgentRequest {
    /// Arguments checked against the agent's input schema; absent means `{}`
    pub input: Option<Value>,
    /// Caller-supplied provider key, used for this call only
    pub api_key: Option<String>,
    /// Provider whose stored key to use when `api_key` is absent
    pub provider: Option<String>,
}

/// Run an agent and return the backend response verbatim
pub async fn run_agent(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(agent_id): ApiPath<i64>,
    ApiJson(request): ApiJson<RunAgentRequest>,
) -> Result<Json<Value>, AppError> {
    let agent = match state.catalog.find_by_id(agent_id).await? {
        Some(agent) if agent.is_active || user.is_admin() => agent,
        _ => return Err(AppError::NotFound),
    };

    let input = input_or_empty(request.input);
    validate_input(&agent.input_schema, &input)
        .map_err(|errors| AppError::Validation(errors.join("; ")))?;

    let credential = match request.api_key.filter(|key| !key.is_empty()) {
        Some(key) => Some(key),
        None => match request.provider.as_deref() {
            Some(provider) => {
                let stored = state.api_settings.get_active_key(user.id, provider).await?;
                debug!(
                    "Stored {} key {} for user {}",
                    provider,
                    if stored.is_some() { "found" } else { "not found" },
                    user.id
                );
                stored
            }
            None => None,
        },
    };

    info!("User {} running agent {} ({})", user.id, agent.id, agent.slug);

    let output = state
        .proxy
        .execute(user.id, &agent, input, credential.as_deref())
        .await?;

    Ok(Json(output))
}
