// ABOUTME: Shared application state for request handlers
// ABOUTME: Holds the catalog, ledger, credential stores, and execution proxy

use std::sync::Arc;

use sqlx::SqlitePool;

use agentdesk_agents::{AgentCatalog, AgentStorage};
use agentdesk_executions::{ExecutionProxy, ExecutionResult, ExecutorConfig};
use agentdesk_security::{ApiKeyEncryption, UserApiSettingStorage, UserStorage};
use agentdesk_usage::{UsageLedger, UsageLogStorage};

#[derive(Clone)]
pub struct AppState {
    /// Read-side lookups used by the user-facing routes
    pub catalog: Arc<dyn AgentCatalog>,
    /// Administrative catalog operations
    pub agents: Arc<AgentStorage>,
    pub usage: Arc<UsageLogStorage>,
    pub users: Arc<UserStorage>,
    pub api_settings: Arc<UserApiSettingStorage>,
    pub proxy: Arc<ExecutionProxy>,
}

impl AppState {
    /// Wire every store to `pool` and build the proxy on top of the SQLite ledger
    pub fn new(
        pool: SqlitePool,
        encryption: Arc<ApiKeyEncryption>,
        executor: ExecutorConfig,
    ) -> ExecutionResult<Self> {
        let agents = Arc::new(AgentStorage::new(pool.clone()));
        let usage = Arc::new(UsageLogStorage::new(pool.clone()));
        let ledger: Arc<dyn UsageLedger> = usage.clone();
        let proxy = Arc::new(ExecutionProxy::new(executor, ledger)?);

        Ok(Self {
            catalog: agents.clone(),
            agents,
            usage,
            users: Arc::new(UserStorage::new(pool.clone())),
            api_settings: Arc::new(UserApiSettingStorage::new(pool, encryption)),
            proxy,
        })
    }
}
