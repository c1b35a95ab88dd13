// ABOUTME: HTTP API layer for Agentdesk providing REST endpoints and routing
// ABOUTME: Request gateway that authorizes callers and drives the catalog, proxy, and ledger

use axum::{
    routing::{get, post, put},
    Router,
};

pub mod admin_handlers;
pub mod agents_handlers;
pub mod api_keys_handlers;
pub mod auth;
pub mod error;
pub mod extract;
pub mod health;
pub mod response;
pub mod run_handlers;
pub mod state;
pub mod usage_handlers;
pub mod validation;

pub use auth::{AdminUser, CurrentUser, USER_ID_HEADER};
pub use error::AppError;
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use response::ApiResponse;
pub use state::AppState;

/// Creates the catalog and execution router (nested under /api/agents)
pub fn create_agents_router() -> Router<AppState> {
    Router::new()
        .route("/", get(agents_handlers::list_agents))
        .route("/{slug}", get(agents_handlers::get_agent_by_slug))
        .route("/{id}/run", post(run_handlers::run_agent))
}

/// Creates the catalog administration router (nested under /api/admin)
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/agents",
            get(admin_handlers::list_agents).post(admin_handlers::create_agent),
        )
        .route(
            "/agents/{id}",
            get(admin_handlers::get_agent)
                .put(admin_handlers::update_agent)
                .delete(admin_handlers::delete_agent),
        )
}

/// Creates the usage reporting router (nested under /api/usage)
pub fn create_usage_router() -> Router<AppState> {
    Router::new()
        .route("/", get(usage_handlers::list_usage))
        .route("/stats", get(usage_handlers::get_stats))
}

/// Creates the per-user credential router (nested under /api/users)
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/me/api-keys", get(api_keys_handlers::list_api_keys))
        .route(
            "/me/api-keys/{provider}",
            put(api_keys_handlers::upsert_api_key).delete(api_keys_handlers::delete_api_key),
        )
}

/// Full `/api` surface with state attached
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/agents", create_agents_router())
        .nest("/api/admin", create_admin_router())
        .nest("/api/usage", create_usage_router())
        .nest("/api/users", create_users_router())
        .with_state(state)
}
