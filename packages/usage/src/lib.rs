// ABOUTME: Usage ledger for Agentdesk
// ABOUTME: Append-only record of agent invocations with token and cost accounting

pub mod ledger;
pub mod storage;
pub mod types;

pub use ledger::UsageLedger;
pub use storage::UsageLogStorage;
pub use types::{
    normalize_cost, AgentUsageStats, NewUsageLogEntry, UsageLogEntry, UsageQuery, UsageStats,
    UsageStatus, COST_SCALE,
};
