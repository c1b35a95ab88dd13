// ABOUTME: Per-user provider credential types
// ABOUTME: Stored setting with encrypted key and the masked view returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored credential row. `api_key` holds ciphertext.
#[derive(Debug, Clone)]
pub struct UserApiSetting {
    pub id: i64,
    pub user_id: i64,
    pub provider: String,
    pub api_key: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credential as shown to its owner; never carries the key itself
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedApiSetting {
    pub provider: String,
    pub is_active: bool,
    pub key_hint: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
