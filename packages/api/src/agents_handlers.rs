// ABOUTME: HTTP request handlers for the agent catalog
// ABOUTME: Lists active agents and resolves agents by slug for signed-in users

use axum::extract::State;
use tracing::info;

use agentdesk_agents::Agent;

use super::auth::CurrentUser;
use super::error::AppError;
use super::extract::ApiPath;
use super::response::{ok, ApiResult};
use super::state::AppState;

/// List every active agent, ordered by name
pub async fn list_agents(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Vec<Agent>> {
    info!("Listing active agents for user {}", user.id);

    let agents = state.catalog.find_active_agents().await?;
    ok(agents)
}

/// Get one agent by slug. Inactive agents are only visible to admins.
pub async fn get_agent_by_slug(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(slug): ApiPath<String>,
) -> ApiResult<Agent> {
    info!("Getting agent by slug: {}", slug);

    match state.catalog.find_by_slug(&slug).await? {
        Some(agent) if agent.is_active || user.is_admin() => ok(agent),
        _ => Err(AppError::NotFound),
    }
}
