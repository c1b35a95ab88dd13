// ABOUTME: Read-side capability of the agent catalog
// ABOUTME: Lookup operations injected into the gateway and execution flow

use async_trait::async_trait;

use crate::types::Agent;
use agentdesk_storage::StorageError;

#[async_trait]
pub trait AgentCatalog: Send + Sync {
    /// Every agent with `is_active = true`, ordered by name
    async fn find_active_agents(&self) -> Result<Vec<Agent>, StorageError>;

    /// Exact, case-sensitive slug match; `None` when absent
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Agent>, StorageError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Agent>, StorageError>;
}
