// ABOUTME: HTTP request handlers for the caller's stored provider keys
// ABOUTME: Keys are write-only; responses carry a masked view

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use agentdesk_security::MaskedApiSetting;

use super::auth::CurrentUser;
use super::extract::{ApiJson, ApiPath};
use super::response::{ok, ApiResult};
use super::state::AppState;

pub async fn list_api_keys(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Vec<MaskedApiSetting>> {
    ok(state.api_settings.list_masked(user.id).await?)
}

/// Request body for storing a provider key
#[derive(Deserialize)]
pub struct UpsertApiKeyRequest {
    pub api_key: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Store or replace the caller's key for `provider`
pub async fn upsert_api_key(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(provider): ApiPath<String>,
    ApiJson(request): ApiJson<UpsertApiKeyRequest>,
) -> ApiResult<MaskedApiSetting> {
    info!("Storing {} API key for user {}", provider, user.id);

    let setting = state
        .api_settings
        .upsert(user.id, &provider, &request.api_key, request.is_active)
        .await?;
    ok(setting)
}

pub async fn delete_api_key(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(provider): ApiPath<String>,
) -> ApiResult<Value> {
    info!("Deleting {} API key for user {}", provider, user.id);

    state.api_settings.delete(user.id, &provider).await?;
    ok(json!({"message": "API key deleted successfully"}))
}
