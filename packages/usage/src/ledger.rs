// ABOUTME: Write-side capability of the usage ledger
// ABOUTME: The single append operation the execution proxy depends on

use async_trait::async_trait;

use crate::types::{NewUsageLogEntry, UsageLogEntry};
use agentdesk_storage::StorageError;

#[async_trait]
pub trait UsageLedger: Send + Sync {
    /// Persist one entry and return it with its generated id and timestamps
    async fn append(&self, entry: NewUsageLogEntry) -> Result<UsageLogEntry, StorageError>;
}
