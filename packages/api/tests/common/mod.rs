// ABOUTME: Common test utilities for gateway integration tests
// ABOUTME: Provides test server setup with a mock execution backend and HTTP helpers

use std::sync::Arc;
use std::time::Duration;

use agentdesk_agents::{Agent, AgentCreateInput, AgentStorage};
use agentdesk_api::{create_router, AppState, USER_ID_HEADER};
use agentdesk_executions::{ExecutorConfig, LedgerPolicy};
use agentdesk_security::{ApiKeyEncryption, NewUser, Role, User, UserStorage};
use agentdesk_storage::connect_in_memory;
use serde_json::Value;
use sqlx::SqlitePool;
use wiremock::MockServer;

/// Test context containing server URL, database pool, mock backend, and seeded users
pub struct TestContext {
    pub base_url: String,
    #[allow(dead_code)]
    pub pool: SqlitePool,
    pub backend: MockServer,
    pub user: User,
    pub admin: User,
}

/// Create a test server with an isolated database and a mock execution backend
pub async fn setup_test_server() -> TestContext {
    setup_test_server_with_policy(LedgerPolicy::Strict).await
}

pub async fn setup_test_server_with_policy(policy: LedgerPolicy) -> TestContext {
    let pool = connect_in_memory()
        .await
        .expect("Failed to create database pool");
    let backend = MockServer::start().await;

    let users = UserStorage::new(pool.clone());
    let user = users
        .create_user(NewUser {
            email: "member@example.com".to_string(),
            name: "Member".to_string(),
            role: Role::Subscriber,
        })
        .await
        .expect("Failed to create user");
    let admin = users
        .create_user(NewUser {
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            role: Role::Admin,
        })
        .await
        .expect("Failed to create admin");

    let encryption = Arc::new(ApiKeyEncryption::from_secret("test-secret").unwrap());
    let executor = ExecutorConfig {
        ledger_policy: policy,
        request_timeout: Duration::from_secs(5),
        ..ExecutorConfig::new(backend.uri())
    };
    let state = AppState::new(pool.clone(), encryption, executor).expect("Failed to build state");
    let app = create_router(state);

    // Bind to random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestContext {
        base_url,
        pool,
        backend,
        user,
        admin,
    }
}

/// Insert an agent directly through storage
#[allow(dead_code)]
pub async fn create_agent(pool: &SqlitePool, name: &str, schema: Option<Value>, is_active: bool) -> Agent {
    AgentStorage::new(pool.clone())
        .create_agent(AgentCreateInput {
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            category: "Research".to_string(),
            input_schema: schema,
            endpoint: None,
            is_active,
        })
        .await
        .expect("Failed to create agent")
}

/// Helper to make GET requests as `user_id`
#[allow(dead_code)]
pub async fn get(base_url: &str, path: &str, user_id: Option<i64>) -> reqwest::Response {
    with_user(reqwest::Client::new().get(format!("{}{}", base_url, path)), user_id)
        .send()
        .await
        .expect("Failed to make GET request")
}

/// Helper to make POST requests with JSON body
#[allow(dead_code)]
pub async fn post_json<T: serde::Serialize>(
    base_url: &str,
    path: &str,
    user_id: Option<i64>,
    body: &T,
) -> reqwest::Response {
    with_user(reqwest::Client::new().post(format!("{}{}", base_url, path)), user_id)
        .json(body)
        .send()
        .await
        .expect("Failed to make POST request")
}

/// Helper to make PUT requests with JSON body
#[allow(dead_code)]
pub async fn put_json<T: serde::Serialize>(
    base_url: &str,
    path: &str,
    user_id: Option<i64>,
    body: &T,
) -> reqwest::Response {
    with_user(reqwest::Client::new().put(format!("{}{}", base_url, path)), user_id)
        .json(body)
        .send()
        .await
        .expect("Failed to make PUT request")
}

/// Helper to make DELETE requests
#[allow(dead_code)]
pub async fn delete(base_url: &str, path: &str, user_id: Option<i64>) -> reqwest::Response {
    with_user(reqwest::Client::new().delete(format!("{}{}", base_url, path)), user_id)
        .send()
        .await
        .expect("Failed to make DELETE request")
}

fn with_user(request: reqwest::RequestBuilder, user_id: Option<i64>) -> reqwest::RequestBuilder {
    match user_id {
        Some(id) => request.header(USER_ID_HEADER, id.to_string()),
        None => request,
    }
}
