// ABOUTME: Usage ledger type definitions
// ABOUTME: Ledger entries, query filters, and aggregated usage statistics

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Fractional digits kept for `cost_incurred`
pub const COST_SCALE: u32 = 6;

/// Default and maximum page sizes for ledger listings
pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageStatus {
    Success,
    Failed,
}

impl UsageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageStatus::Success => "success",
            UsageStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for UsageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(UsageStatus::Success),
            "failed" => Ok(UsageStatus::Failed),
            other => Err(format!("Unknown usage status: {}", other)),
        }
    }
}

/// Entry to append; id and timestamps are assigned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUsageLogEntry {
    pub user_id: i64,
    pub agent_id: i64,
    pub tokens_input: i64,
    pub tokens_output: i64,
    pub tokens_total: i64,
    pub duration_ms: Option<i64>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub is_own_key: bool,
    pub cost_incurred: Decimal,
    pub status: UsageStatus,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub id: i64,
    pub user_id: i64,
    pub agent_id: i64,
    pub tokens_input: i64,
    pub tokens_output: i64,
    pub tokens_total: i64,
    pub duration_ms: Option<i64>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub is_own_key: bool,
    pub cost_incurred: Decimal,
    pub status: UsageStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
    #[serde(rename = "agentId")]
    pub agent_id: Option<i64>,
    #[serde(rename = "startDate")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(rename = "endDate")]
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl UsageQuery {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_requests: i64,
    pub successful_requests: i64,
    pub failed_requests: i64,
    pub own_key_requests: i64,
    pub total_input_tokens: i64,
    pub total_output_tokens: i64,
    pub total_tokens: i64,
    pub total_cost: Decimal,
    pub average_duration_ms: f64,
    #[serde(rename = "byAgent")]
    pub by_agent: Vec<AgentUsageStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentUsageStats {
    pub agent_id: i64,
    pub count: i64,
    pub total_tokens: i64,
    pub total_cost: Decimal,
}

/// Round to `COST_SCALE` places (half away from zero) and fix the scale,
/// so `0.05` is stored as `0.050000`
pub fn normalize_cost(cost: Decimal) -> Decimal {
    let mut rounded = cost.round_dp_with_strategy(COST_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(COST_SCALE);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_cost_fixes_scale() {
        let cost = Decimal::from_str("0.05").unwrap();
        assert_eq!(normalize_cost(cost).to_string(), "0.050000");
        assert_eq!(normalize_cost(Decimal::ZERO).to_string(), "0.000000");
    }

    #[test]
    fn test_normalize_cost_rounds_extra_digits() {
        let cost = Decimal::from_str("0.0000125").unwrap();
        assert_eq!(normalize_cost(cost).to_string(), "0.000013");
        let cost = Decimal::from_str("1.1234564").unwrap();
        assert_eq!(normalize_cost(cost).to_string(), "1.123456");
    }

    #[test]
    fn test_usage_status_round_trip_names() {
        assert_eq!("success".parse::<UsageStatus>().unwrap(), UsageStatus::Success);
        assert_eq!(UsageStatus::Failed.to_string(), "failed");
        assert!("pending".parse::<UsageStatus>().is_err());
    }

    #[test]
    fn test_query_limit_bounds() {
        let query = UsageQuery::default();
        assert_eq!(query.limit(), DEFAULT_LIST_LIMIT);
        assert_eq!(query.offset(), 0);

        let query = UsageQuery {
            limit: Some(10_000),
            offset: Some(-5),
            ..Default::default()
        };
        assert_eq!(query.limit(), MAX_LIST_LIMIT);
        assert_eq!(query.offset(), 0);
    }
}
