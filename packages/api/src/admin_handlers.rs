// ABOUTME: HTTP request handlers for catalog administration
// ABOUTME: Create, read, update, and delete agents; admin role required

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use agentdesk_agents::{Agent, AgentCreateInput, AgentUpdateInput};

use super::auth::AdminUser;
use super::error::AppError;
use super::extract::{ApiJson, ApiPath};
use super::response::{ok, ApiResponse, ApiResult};
use super::state::AppState;

/// List all agents, newest first, including inactive ones
pub async fn list_agents(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> ApiResult<Vec<Agent>> {
    info!("Admin {} listing all agents", admin.id);

    ok(state.agents.list_agents().await?)
}

pub async fn get_agent(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Agent> {
    ok(state.agents.get_agent(id).await?)
}

pub async fn create_agent(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(input): ApiJson<AgentCreateInput>,
) -> Result<(StatusCode, Json<ApiResponse<Agent>>), AppError> {
    info!("Admin {} creating agent '{}'", admin.id, input.name);

    let agent = state.agents.create_agent(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(agent))))
}

pub async fn update_agent(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<AgentUpdateInput>,
) -> ApiResult<Agent> {
    info!("Admin {} updating agent {}", admin.id, id);

    ok(state.agents.update_agent(id, input).await?)
}

pub async fn delete_agent(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    info!("Admin {} deleting agent {}", admin.id, id);

    state.agents.delete_agent(id).await?;
    ok(json!({"message": "Agent deleted successfully"}))
}
