// ABOUTME: Agent catalog type definitions
// ABOUTME: Catalog entries plus the create and update inputs used by administrators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use agentdesk_storage::StorageError;

/// Longest accepted agent name, in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// A named, schema-described remote capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub category: String,
    pub input_schema: Value,
    /// Backend path; `None` means `/agents/{id}/run`
    pub endpoint: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentCreateInput {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub input_schema: Option<Value>,
    pub endpoint: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Partial update; absent fields keep their stored value.
/// An empty `description` or `endpoint` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub input_schema: Option<Value>,
    pub endpoint: Option<String>,
    pub is_active: Option<bool>,
}

fn default_true() -> bool {
    true
}

/// Schema stored when none is supplied
pub fn default_input_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

pub(crate) fn validate_name(name: &str) -> Result<(), StorageError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StorageError::InvalidInput("Name is required".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(StorageError::InvalidInput(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

pub(crate) fn validate_category(category: &str) -> Result<(), StorageError> {
    if category.trim().is_empty() {
        return Err(StorageError::InvalidInput("Category is required".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_schema(schema: &Value) -> Result<(), StorageError> {
    if !schema.is_object() {
        return Err(StorageError::InvalidInput(
            "Input schema must be a JSON object".to_string(),
        ));
    }
    Ok(())
}

/// Blank strings are stored as NULL
pub(crate) fn blank_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl AgentCreateInput {
    pub fn validate(&self) -> Result<(), StorageError> {
        validate_name(&self.name)?;
        validate_category(&self.category)?;
        if let Some(schema) = &self.input_schema {
            validate_schema(schema)?;
        }
        Ok(())
    }
}

impl AgentUpdateInput {
    pub fn validate(&self) -> Result<(), StorageError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(schema) = &self.input_schema {
            validate_schema(schema)?;
        }
        Ok(())
    }
}
