// ABOUTME: Authentication context for API requests
// ABOUTME: Resolves the caller from the upstream identity header and enforces admin access

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use agentdesk_security::User;

use crate::error::AppError;
use crate::state::AppState;

/// Header set by the trusted upstream authenticator
pub const USER_ID_HEADER: &str = "x-user-id";

/// Current authenticated user
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .ok_or(AppError::Unauthorized)?;

        match state.users.find_user(user_id).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                debug!("Rejecting request for unknown user {}", user_id);
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// Current user, required to hold the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::forbidden("Administrator access required"));
        }
        Ok(AdminUser(user))
    }
}
