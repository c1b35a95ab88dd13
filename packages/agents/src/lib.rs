// ABOUTME: Agent catalog for Agentdesk
// ABOUTME: Catalog types, lookup trait, SQLite storage, and the bundled default catalog

pub mod catalog;
pub mod seed;
pub mod storage;
pub mod types;

pub use catalog::AgentCatalog;
pub use seed::{default_agents, SeedAgent};
pub use storage::AgentStorage;
pub use types::{default_input_schema, Agent, AgentCreateInput, AgentUpdateInput};
