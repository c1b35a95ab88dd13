// ABOUTME: Usage ledger storage layer using SQLite
// ABOUTME: Appends ledger entries and serves filtered listings and aggregates

use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use crate::ledger::UsageLedger;
use crate::types::{
    normalize_cost, AgentUsageStats, NewUsageLogEntry, UsageLogEntry, UsageQuery, UsageStats,
    UsageStatus,
};
use agentdesk_storage::StorageError;

pub struct UsageLogStorage {
    pool: SqlitePool,
}

impl UsageLogStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_entry(&self, id: i64) -> Result<UsageLogEntry, StorageError> {
        let row = sqlx::query("SELECT * FROM usage_log_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound)?;

        self.row_to_entry(&row)
    }

    /// List ledger entries, newest first
    pub async fn list_entries(&self, query: &UsageQuery) -> Result<Vec<UsageLogEntry>, StorageError> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM usage_log_entries WHERE 1=1");
        push_filters(&mut builder, query);
        builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        builder.push_bind(query.limit());
        builder.push(" OFFSET ");
        builder.push_bind(query.offset());

        debug!("Fetching usage entries: {}", builder.sql());

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| self.row_to_entry(row)).collect()
    }

    /// Aggregate totals for the entries matching `query` (limit and offset are ignored).
    /// Costs are summed as decimals so totals stay exact.
    pub async fn get_stats(&self, query: &UsageQuery) -> Result<UsageStats, StorageError> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT agent_id, status, is_own_key, tokens_input, tokens_output,
                   tokens_total, duration_ms, cost_incurred
            FROM usage_log_entries WHERE 1=1
            "#,
        );
        push_filters(&mut builder, query);

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut stats = UsageStats {
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            own_key_requests: 0,
            total_input_tokens: 0,
            total_output_tokens: 0,
            total_tokens: 0,
            total_cost: normalize_cost(Decimal::ZERO),
            average_duration_ms: 0.0,
            by_agent: Vec::new(),
        };
        let mut by_agent: BTreeMap<i64, AgentUsageStats> = BTreeMap::new();
        let mut duration_sum = 0i64;
        let mut duration_count = 0i64;

        for row in &rows {
            let agent_id: i64 = row.try_get("agent_id").map_err(StorageError::Sqlx)?;
            let status: String = row.try_get("status").map_err(StorageError::Sqlx)?;
            let is_own_key: bool = row.try_get("is_own_key").map_err(StorageError::Sqlx)?;
            let tokens_total: i64 = row.try_get("tokens_total").map_err(StorageError::Sqlx)?;
            let duration_ms: Option<i64> = row.try_get("duration_ms").map_err(StorageError::Sqlx)?;
            let cost = parse_cost(row)?;

            stats.total_requests += 1;
            if status == UsageStatus::Success.as_str() {
                stats.successful_requests += 1;
            } else {
                stats.failed_requests += 1;
            }
            if is_own_key {
                stats.own_key_requests += 1;
            }
            stats.total_input_tokens += row
                .try_get::<i64, _>("tokens_input")
                .map_err(StorageError::Sqlx)?;
            stats.total_output_tokens += row
                .try_get::<i64, _>("tokens_output")
                .map_err(StorageError::Sqlx)?;
            stats.total_tokens += tokens_total;
            stats.total_cost += cost;
            if let Some(ms) = duration_ms {
                duration_sum += ms;
                duration_count += 1;
            }

            let agent = by_agent.entry(agent_id).or_insert_with(|| AgentUsageStats {
                agent_id,
                count: 0,
                total_tokens: 0,
                total_cost: normalize_cost(Decimal::ZERO),
            });
            agent.count += 1;
            agent.total_tokens += tokens_total;
            agent.total_cost += cost;
        }

        if duration_count > 0 {
            stats.average_duration_ms = duration_sum as f64 / duration_count as f64;
        }
        stats.total_cost = normalize_cost(stats.total_cost);

        let mut by_agent: Vec<AgentUsageStats> = by_agent
            .into_values()
            .map(|mut agent| {
                agent.total_cost = normalize_cost(agent.total_cost);
                agent
            })
            .collect();
        by_agent.sort_by(|a, b| b.total_cost.cmp(&a.total_cost).then(a.agent_id.cmp(&b.agent_id)));
        stats.by_agent = by_agent;

        Ok(stats)
    }

    fn row_to_entry(&self, row: &SqliteRow) -> Result<UsageLogEntry, StorageError> {
        let status: String = row.try_get("status").map_err(StorageError::Sqlx)?;
        let status = UsageStatus::from_str(&status).map_err(StorageError::Database)?;

        Ok(UsageLogEntry {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
            agent_id: row.try_get("agent_id").map_err(StorageError::Sqlx)?,
            tokens_input: row.try_get("tokens_input").map_err(StorageError::Sqlx)?,
            tokens_output: row.try_get("tokens_output").map_err(StorageError::Sqlx)?,
            tokens_total: row.try_get("tokens_total").map_err(StorageError::Sqlx)?,
            duration_ms: row.try_get("duration_ms").map_err(StorageError::Sqlx)?,
            provider: row.try_get("provider").map_err(StorageError::Sqlx)?,
            model: row.try_get("model").map_err(StorageError::Sqlx)?,
            is_own_key: row.try_get("is_own_key").map_err(StorageError::Sqlx)?,
            cost_incurred: parse_cost(row)?,
            status,
            error_message: row.try_get("error_message").map_err(StorageError::Sqlx)?,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
            updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
        })
    }
}

#[async_trait]
impl UsageLedger for UsageLogStorage {
    async fn append(&self, entry: NewUsageLogEntry) -> Result<UsageLogEntry, StorageError> {
        let cost = normalize_cost(entry.cost_incurred);
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO usage_log_entries (
                user_id, agent_id, tokens_input, tokens_output, tokens_total,
                duration_ms, provider, model, is_own_key, cost_incurred,
                status, error_message, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.agent_id)
        .bind(entry.tokens_input)
        .bind(entry.tokens_output)
        .bind(entry.tokens_total)
        .bind(entry.duration_ms)
        .bind(&entry.provider)
        .bind(&entry.model)
        .bind(entry.is_own_key)
        .bind(cost.to_string())
        .bind(entry.status.as_str())
        .bind(&entry.error_message)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        debug!(
            "Appended usage entry {} (user {}, agent {}, tokens {})",
            result.last_insert_rowid(),
            entry.user_id,
            entry.agent_id,
            entry.tokens_total
        );

        self.get_entry(result.last_insert_rowid()).await
    }
}

/// Append WHERE conditions for the query's filters
fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &UsageQuery) {
    if let Some(user_id) = query.user_id {
        builder.push(" AND user_id = ");
        builder.push_bind(user_id);
    }
    if let Some(agent_id) = query.agent_id {
        builder.push(" AND agent_id = ");
        builder.push_bind(agent_id);
    }
    if let Some(start_date) = query.start_date {
        builder.push(" AND created_at >= ");
        builder.push_bind(start_date);
    }
    if let Some(end_date) = query.end_date {
        builder.push(" AND created_at <= ");
        builder.push_bind(end_date);
    }
}

fn parse_cost(row: &SqliteRow) -> Result<Decimal, StorageError> {
    let text: String = row.try_get("cost_incurred").map_err(StorageError::Sqlx)?;
    Decimal::from_str(&text)
        .map_err(|e| StorageError::Database(format!("Invalid cost_incurred '{}': {}", text, e)))
}
