// ABOUTME: Bundled default agent catalog
// ABOUTME: Loads agent definitions from config/agents.json at compile time

use serde::Deserialize;
use serde_json::Value;

use agentdesk_storage::StorageError;

/// Catalog entry as shipped in the bundled config; slugs are fixed
#[derive(Debug, Clone, Deserialize)]
pub struct SeedAgent {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub category: String,
    pub endpoint: Option<String>,
    pub is_active: bool,
    pub input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct AgentsConfig {
    #[allow(dead_code)]
    version: String,
    agents: Vec<SeedAgent>,
}

/// Parse the bundled catalog
pub fn default_agents() -> Result<Vec<SeedAgent>, StorageError> {
    let config_json = include_str!("../config/agents.json");
    let config: AgentsConfig = serde_json::from_str(config_json)
        .map_err(|e| StorageError::Database(format!("Invalid bundled agent catalog: {}", e)))?;
    Ok(config.agents)
}
