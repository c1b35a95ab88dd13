// ABOUTME: Encrypted storage for per-user provider credentials
// ABOUTME: Upsert, lookup, masked listing, and removal keyed by (user, provider)

use std::sync::Arc;

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;

use super::types::{MaskedApiSetting, UserApiSetting};
use crate::encryption::ApiKeyEncryption;
use agentdesk_core::key_hint;
use agentdesk_storage::StorageError;

pub struct UserApiSettingStorage {
    pool: SqlitePool,
    encryption: Arc<ApiKeyEncryption>,
}

impl UserApiSettingStorage {
    pub fn new(pool: SqlitePool, encryption: Arc<ApiKeyEncryption>) -> Self {
        Self { pool, encryption }
    }

    /// Store or replace the credential for `(user_id, provider)`
    pub async fn upsert(
        &self,
        user_id: i64,
        provider: &str,
        api_key: &str,
        is_active: bool,
    ) -> Result<MaskedApiSetting, StorageError> {
        let provider = normalize_provider(provider)?;
        if api_key.trim().is_empty() {
            return Err(StorageError::InvalidInput("API key is required".to_string()));
        }

        debug!("Storing {} credential for user: {}", provider, user_id);

        let encrypted = self.encryption.encrypt(api_key.trim()).map_err(|e| {
            StorageError::Encryption(format!("Failed to encrypt {} API key: {}", provider, e))
        })?;

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO user_api_settings (user_id, provider, api_key, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, provider) DO UPDATE SET
                api_key = excluded.api_key,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(&provider)
        .bind(&encrypted)
        .bind(is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let setting = self
            .get_setting(user_id, &provider)
            .await?
            .ok_or(StorageError::NotFound)?;
        self.mask(setting)
    }

    /// Decrypted key for an active credential, if one is stored
    pub async fn get_active_key(
        &self,
        user_id: i64,
        provider: &str,
    ) -> Result<Option<String>, StorageError> {
        let provider = normalize_provider(provider)?;

        match self.get_setting(user_id, &provider).await? {
            Some(setting) if setting.is_active => {
                let key = self.encryption.decrypt(&setting.api_key).map_err(|e| {
                    StorageError::Encryption(format!("Failed to decrypt {} API key: {}", provider, e))
                })?;
                Ok(Some(key).filter(|k| !k.is_empty()))
            }
            _ => Ok(None),
        }
    }

    pub async fn list_masked(&self, user_id: i64) -> Result<Vec<MaskedApiSetting>, StorageError> {
        let rows = sqlx::query("SELECT * FROM user_api_settings WHERE user_id = ? ORDER BY provider")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| self.row_to_setting(row).and_then(|s| self.mask(s)))
            .collect()
    }

    /// Remove a credential; `NotFound` when none was stored
    pub async fn delete(&self, user_id: i64, provider: &str) -> Result<(), StorageError> {
        let provider = normalize_provider(provider)?;

        let result = sqlx::query("DELETE FROM user_api_settings WHERE user_id = ? AND provider = ?")
            .bind(user_id)
            .bind(&provider)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_setting(
        &self,
        user_id: i64,
        provider: &str,
    ) -> Result<Option<UserApiSetting>, StorageError> {
        let row = sqlx::query("SELECT * FROM user_api_settings WHERE user_id = ? AND provider = ?")
            .bind(user_id)
            .bind(provider)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(|r| self.row_to_setting(r)).transpose()
    }

    fn mask(&self, setting: UserApiSetting) -> Result<MaskedApiSetting, StorageError> {
        let plaintext = self.encryption.decrypt(&setting.api_key).map_err(|e| {
            StorageError::Encryption(format!("Failed to decrypt stored API key: {}", e))
        })?;

        Ok(MaskedApiSetting {
            provider: setting.provider,
            is_active: setting.is_active,
            key_hint: key_hint(&plaintext),
            created_at: setting.created_at,
            updated_at: setting.updated_at,
        })
    }

    fn row_to_setting(&self, row: &SqliteRow) -> Result<UserApiSetting, StorageError> {
        Ok(UserApiSetting {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
            provider: row.try_get("provider").map_err(StorageError::Sqlx)?,
            api_key: row.try_get("api_key").map_err(StorageError::Sqlx)?,
            is_active: row.try_get("is_active").map_err(StorageError::Sqlx)?,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
            updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
        })
    }
}

/// Provider names are stored lowercase; only `[a-z0-9_-]` is accepted
fn normalize_provider(provider: &str) -> Result<String, StorageError> {
    let provider = provider.trim().to_lowercase();
    let valid = !provider.is_empty()
        && provider.len() <= 64
        && provider
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(provider)
    } else {
        Err(StorageError::InvalidInput(format!(
            "Invalid provider name: {}",
            provider
        )))
    }
}
