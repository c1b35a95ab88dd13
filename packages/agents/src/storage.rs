// ABOUTME: Agent catalog storage layer using SQLite
// ABOUTME: Lookups for end users and create, update, delete, and seeding for administrators

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info};

use crate::catalog::AgentCatalog;
use crate::seed::default_agents;
use crate::types::{
    blank_to_none, default_input_schema, Agent, AgentCreateInput, AgentUpdateInput,
};
use agentdesk_core::slugify;
use agentdesk_storage::StorageError;

pub struct AgentStorage {
    pool: SqlitePool,
}

impl AgentStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All agents, newest first
    pub async fn list_agents(&self) -> Result<Vec<Agent>, StorageError> {
        let rows = sqlx::query("SELECT * FROM agents ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| self.row_to_agent(row)).collect()
    }

    /// Fetch an agent by id, failing with `NotFound` when absent
    pub async fn get_agent(&self, id: i64) -> Result<Agent, StorageError> {
        self.find_by_id(id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn create_agent(&self, input: AgentCreateInput) -> Result<Agent, StorageError> {
        input.validate()?;

        let name = input.name.trim().to_string();
        let slug = derive_slug(&name)?;
        let schema = input.input_schema.unwrap_or_else(default_input_schema);
        let now = Utc::now();

        debug!("Creating agent: {} ({})", name, slug);

        let result = sqlx::query(
            r#"
            INSERT INTO agents (
                name, slug, description, category, input_schema, endpoint,
                is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&name)
        .bind(&slug)
        .bind(blank_to_none(input.description.as_deref()))
        .bind(input.category.trim())
        .bind(schema_to_text(&schema)?)
        .bind(blank_to_none(input.endpoint.as_deref()))
        .bind(input.is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_constraint(e, &format!("Agent with slug '{}'", slug)))?;

        info!("Created agent {} with slug {}", result.last_insert_rowid(), slug);
        self.get_agent(result.last_insert_rowid()).await
    }

    /// Apply a partial update. The slug is re-derived only when the name changes.
    pub async fn update_agent(
        &self,
        id: i64,
        input: AgentUpdateInput,
    ) -> Result<Agent, StorageError> {
        input.validate()?;

        let existing = self.get_agent(id).await?;

        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.name)
            .to_string();
        let slug = if name != existing.name {
            derive_slug(&name)?
        } else {
            existing.slug.clone()
        };
        let description = match input.description.as_deref() {
            Some(value) => blank_to_none(Some(value)),
            None => existing.description.clone(),
        };
        let endpoint = match input.endpoint.as_deref() {
            Some(value) => blank_to_none(Some(value)),
            None => existing.endpoint.clone(),
        };
        let category = input
            .category
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.category)
            .to_string();
        let schema = input.input_schema.unwrap_or(existing.input_schema);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        debug!("Updating agent {} (slug {} -> {})", id, existing.slug, slug);

        sqlx::query(
            r#"
            UPDATE agents
            SET name = ?, slug = ?, description = ?, category = ?, input_schema = ?,
                endpoint = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(&slug)
        .bind(description)
        .bind(&category)
        .bind(schema_to_text(&schema)?)
        .bind(endpoint)
        .bind(is_active)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_constraint(e, &format!("Agent with slug '{}'", slug)))?;

        self.get_agent(id).await
    }

    /// Delete an agent. Agents with recorded usage cannot be deleted.
    pub async fn delete_agent(&self, id: i64) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::from_constraint(e, "Agent"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        info!("Deleted agent {}", id);
        Ok(())
    }

    /// Insert or refresh the bundled catalog, matching rows by slug.
    /// Returns the number of entries written.
    pub async fn seed_default_agents(&self) -> Result<usize, StorageError> {
        let agents = default_agents()?;
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;
        let now = Utc::now();

        for agent in &agents {
            sqlx::query(
                r#"
                INSERT INTO agents (
                    name, slug, description, category, input_schema, endpoint,
                    is_active, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(slug) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description,
                    category = excluded.category,
                    input_schema = excluded.input_schema,
                    endpoint = excluded.endpoint,
                    is_active = excluded.is_active,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&agent.name)
            .bind(&agent.slug)
            .bind(&agent.description)
            .bind(&agent.category)
            .bind(schema_to_text(&agent.input_schema)?)
            .bind(&agent.endpoint)
            .bind(agent.is_active)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        info!("Seeded {} default agents", agents.len());
        Ok(agents.len())
    }

    fn row_to_agent(&self, row: &SqliteRow) -> Result<Agent, StorageError> {
        let schema_text: String = row.try_get("input_schema").map_err(StorageError::Sqlx)?;
        let input_schema = serde_json::from_str(&schema_text).map_err(|e| {
            StorageError::Database(format!("Failed to parse input_schema: {}", e))
        })?;

        Ok(Agent {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            name: row.try_get("name").map_err(StorageError::Sqlx)?,
            slug: row.try_get("slug").map_err(StorageError::Sqlx)?,
            description: row.try_get("description").map_err(StorageError::Sqlx)?,
            category: row.try_get("category").map_err(StorageError::Sqlx)?,
            input_schema,
            endpoint: row.try_get("endpoint").map_err(StorageError::Sqlx)?,
            is_active: row.try_get("is_active").map_err(StorageError::Sqlx)?,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
            updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
        })
    }
}

#[async_trait]
impl AgentCatalog for AgentStorage {
    async fn find_active_agents(&self) -> Result<Vec<Agent>, StorageError> {
        let rows = sqlx::query("SELECT * FROM agents WHERE is_active = 1 ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| self.row_to_agent(row)).collect()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Agent>, StorageError> {
        let row = sqlx::query("SELECT * FROM agents WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(|r| self.row_to_agent(r)).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Agent>, StorageError> {
        let row = sqlx::query("SELECT * FROM agents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(|r| self.row_to_agent(r)).transpose()
    }
}

fn derive_slug(name: &str) -> Result<String, StorageError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(StorageError::InvalidInput(
            "Name must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(slug)
}

fn schema_to_text(schema: &Value) -> Result<String, StorageError> {
    serde_json::to_string(schema)
        .map_err(|e| StorageError::InvalidInput(format!("Invalid input schema: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdesk_storage::connect_in_memory;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn setup() -> AgentStorage {
        AgentStorage::new(connect_in_memory().await.unwrap())
    }

    fn input(name: &str) -> AgentCreateInput {
        AgentCreateInput {
            name: name.to_string(),
            description: Some("Does things".to_string()),
            category: "Finance".to_string(),
            input_schema: None,
            endpoint: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_defaults() {
        let storage = setup().await;

        let agent = storage
            .create_agent(input("Ledger Analysis Agent"))
            .await
            .unwrap();

        assert_eq!(agent.slug, "ledger-analysis-agent");
        assert_eq!(agent.input_schema, default_input_schema());
        assert_eq!(agent.endpoint, None);
        assert!(agent.is_active);
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_is_conflict() {
        let storage = setup().await;

        storage.create_agent(input("SEO Agent")).await.unwrap();
        let err = storage.create_agent(input("seo   agent!")).await.unwrap_err();

        match err {
            StorageError::Conflict(msg) => assert!(msg.contains("seo-agent")),
            other => panic!("Expected Conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_name_without_slug_characters() {
        let storage = setup().await;
        assert!(matches!(
            storage.create_agent(input("!!!")).await,
            Err(StorageError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_create_transliterates_non_ascii_name() {
        let storage = setup().await;

        let accented = storage.create_agent(input("Café Agent")).await.unwrap();
        assert_eq!(accented.slug, "cafe-agent");

        let cjk = storage.create_agent(input("数据分析")).await.unwrap();
        assert!(!cjk.slug.is_empty());
        assert_eq!(
            storage.find_by_slug(&cjk.slug).await.unwrap().map(|a| a.id),
            Some(cjk.id)
        );
    }

    #[tokio::test]
    async fn test_update_recomputes_slug_only_on_name_change() {
        let storage = setup().await;
        let agent = storage.create_agent(input("Code Reviewer")).await.unwrap();

        let same_name = storage
            .update_agent(
                agent.id,
                AgentUpdateInput {
                    category: Some("Development".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same_name.slug, "code-reviewer");
        assert_eq!(same_name.category, "Development");

        let renamed = storage
            .update_agent(
                agent.id,
                AgentUpdateInput {
                    name: Some("AI Code Review Agent".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.slug, "ai-code-review-agent");
        assert!(storage.find_by_slug("code-reviewer").await.unwrap().is_none());

        let renamed_back = storage
            .update_agent(
                agent.id,
                AgentUpdateInput {
                    name: Some("Code Reviewer".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed_back.slug, "code-reviewer");
    }

    #[tokio::test]
    async fn test_update_clears_endpoint_and_description() {
        let storage = setup().await;
        let mut create = input("Endpoint Agent");
        create.endpoint = Some("/custom/run".to_string());
        let agent = storage.create_agent(create).await.unwrap();
        assert_eq!(agent.endpoint.as_deref(), Some("/custom/run"));

        let updated = storage
            .update_agent(
                agent.id,
                AgentUpdateInput {
                    endpoint: Some("".to_string()),
                    description: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.endpoint, None);
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn test_update_missing_agent() {
        let storage = setup().await;
        assert!(matches!(
            storage.update_agent(99, AgentUpdateInput::default()).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_find_active_agents_excludes_inactive() {
        let storage = setup().await;
        storage.create_agent(input("Zeta Agent")).await.unwrap();
        storage.create_agent(input("Alpha Agent")).await.unwrap();
        let mut hidden = input("Hidden Agent");
        hidden.is_active = false;
        storage.create_agent(hidden).await.unwrap();

        let active = storage.find_active_agents().await.unwrap();
        let names: Vec<_> = active.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha Agent", "Zeta Agent"]);

        // Inactive agents remain resolvable by slug
        assert!(storage.find_by_slug("hidden-agent").await.unwrap().is_some());
        assert_eq!(storage.list_agents().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_find_by_slug_is_case_sensitive() {
        let storage = setup().await;
        storage.create_agent(input("Ledger Agent")).await.unwrap();

        assert!(storage.find_by_slug("ledger-agent").await.unwrap().is_some());
        assert!(storage.find_by_slug("Ledger-Agent").await.unwrap().is_none());
        assert!(storage.find_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_agent() {
        let storage = setup().await;
        let agent = storage.create_agent(input("Temp Agent")).await.unwrap();

        storage.delete_agent(agent.id).await.unwrap();
        assert!(storage.find_by_id(agent.id).await.unwrap().is_none());
        assert!(matches!(
            storage.delete_agent(agent.id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_seed_is_idempotent_and_upserts_by_slug() {
        let storage = setup().await;

        assert_eq!(storage.seed_default_agents().await.unwrap(), 5);
        assert_eq!(storage.seed_default_agents().await.unwrap(), 5);

        let agents = storage.list_agents().await.unwrap();
        assert_eq!(agents.len(), 5);

        let advisor = storage
            .find_by_slug("financial-advisor")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(advisor.name, "Individualized Financial Advisory Agent");
        assert_eq!(
            advisor.input_schema["properties"]["risk_tolerance"]["enum"],
            json!(["low", "moderate", "high"])
        );
        assert_eq!(advisor.endpoint.as_deref(), Some("/agents/financial-advisor/run"));
    }
}
