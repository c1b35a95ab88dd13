// ABOUTME: HTTP request handlers for usage reporting
// ABOUTME: Ledger listings and aggregate statistics scoped to the caller

use axum::extract::State;
use tracing::info;

use agentdesk_security::User;
use agentdesk_usage::{UsageLogEntry, UsageQuery, UsageStats};

use super::auth::CurrentUser;
use super::error::AppError;
use super::extract::ApiQuery;
use super::response::{ok, ApiResult};
use super::state::AppState;

/// Restrict `query` to what `user` may see. Non-admins only ever see their own
/// entries; asking for another user's is forbidden.
fn scope_query(user: &User, mut query: UsageQuery, admin_default_all: bool) -> Result<UsageQuery, AppError> {
    if user.is_admin() {
        if query.user_id.is_none() && !admin_default_all {
            query.user_id = Some(user.id);
        }
        return Ok(query);
    }

    match query.user_id {
        Some(requested) if requested != user.id => Err(AppError::forbidden(
            "Cannot view usage for another user",
        )),
        _ => {
            query.user_id = Some(user.id);
            Ok(query)
        }
    }
}

/// List ledger entries, newest first
pub async fn list_usage(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(query): ApiQuery<UsageQuery>,
) -> ApiResult<Vec<UsageLogEntry>> {
    let query = scope_query(&user, query, false)?;
    info!(
        "Listing usage entries (user_id: {:?}, agent_id: {:?}, limit: {})",
        query.user_id,
        query.agent_id,
        query.limit()
    );

    ok(state.usage.list_entries(&query).await?)
}

/// Aggregate usage statistics. Admins see every user unless `userId` is given.
pub async fn get_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(query): ApiQuery<UsageQuery>,
) -> ApiResult<UsageStats> {
    let query = scope_query(&user, query, true)?;
    info!("Getting usage stats (user_id: {:?})", query.user_id);

    ok(state.usage.get_stats(&query).await?)
}
