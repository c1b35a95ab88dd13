// ABOUTME: Interpretation of backend-reported usage
// ABOUTME: Turns the optional `usage` object of a backend response into a ledger entry

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use agentdesk_usage::{normalize_cost, NewUsageLogEntry, UsageStatus};

/// Usage block from a backend response, if one was reported.
/// `"usage": null` counts as not reported.
pub fn reported_usage(body: &Value) -> Option<&Value> {
    body.get("usage").filter(|usage| !usage.is_null())
}

/// Non-negative integer count; anything else counts as zero
pub fn token_count(usage: &Value, field: &str) -> i64 {
    usage
        .get(field)
        .and_then(Value::as_i64)
        .filter(|count| *count >= 0)
        .unwrap_or(0)
}

/// Cost from a JSON number or numeric string, parsed as a decimal.
/// Missing, malformed, or negative values count as zero.
pub fn reported_cost(usage: &Value) -> Decimal {
    let text = match usage.get("cost") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        _ => return normalize_cost(Decimal::ZERO),
    };

    let cost = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .unwrap_or(Decimal::ZERO);

    if cost.is_sign_negative() {
        normalize_cost(Decimal::ZERO)
    } else {
        normalize_cost(cost)
    }
}

/// Non-blank string from `usage`, then from the top level of the body
fn reported_label(body: &Value, usage: &Value, field: &str) -> Option<String> {
    [usage, body]
        .into_iter()
        .filter_map(|source| source.get(field).and_then(Value::as_str))
        .map(str::trim)
        .find(|label| !label.is_empty())
        .map(str::to_string)
}

fn reported_duration(body: &Value, usage: &Value) -> Option<i64> {
    [usage, body]
        .into_iter()
        .filter_map(|source| source.get("duration_ms").and_then(Value::as_i64))
        .find(|ms| *ms >= 0)
}

/// Labels and timing used when the backend leaves them out
pub struct UsageDefaults<'a> {
    pub provider: &'a str,
    pub model: &'a str,
    pub measured_duration_ms: i64,
}

/// Build the ledger entry for one successful invocation, or `None` when
/// the body reports no usage
pub fn entry_from_response(
    user_id: i64,
    agent_id: i64,
    body: &Value,
    is_own_key: bool,
    defaults: &UsageDefaults<'_>,
) -> Option<NewUsageLogEntry> {
    let usage = reported_usage(body)?;
    let duration_ms = reported_duration(body, usage).unwrap_or(defaults.measured_duration_ms);

    Some(NewUsageLogEntry {
        user_id,
        agent_id,
        tokens_input: token_count(usage, "prompt_tokens"),
        tokens_output: token_count(usage, "completion_tokens"),
        tokens_total: token_count(usage, "total_tokens"),
        duration_ms: Some(duration_ms),
        provider: Some(
            reported_label(body, usage, "provider")
                .unwrap_or_else(|| defaults.provider.to_string()),
        ),
        model: Some(
            reported_label(body, usage, "model").unwrap_or_else(|| defaults.model.to_string()),
        ),
        is_own_key,
        cost_incurred: reported_cost(usage),
        status: UsageStatus::Success,
        error_message: None,
    })
}
