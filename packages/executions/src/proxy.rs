// ABOUTME: Execution proxy forwarding agent invocations to the backend
// ABOUTME: Records one usage entry per successful call that reports usage

use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use agentdesk_agents::Agent;
use agentdesk_core::{redact_secret, truncate};
use agentdesk_usage::UsageLedger;

use crate::config::{ExecutorConfig, LedgerPolicy};
use crate::error::{ExecutionError, ExecutionResult};
use crate::usage::{entry_from_response, UsageDefaults};

/// Longest backend body excerpt written to logs
const LOG_BODY_LIMIT: usize = 200;

/// Path on the backend for `agent`: its own endpoint, or `/agents/{id}/run`
pub fn resolve_endpoint(agent: &Agent) -> String {
    match agent.endpoint.as_deref().map(str::trim) {
        Some(endpoint) if !endpoint.is_empty() => {
            if endpoint.starts_with('/') {
                endpoint.to_string()
            } else {
                format!("/{}", endpoint)
            }
        }
        _ => format!("/agents/{}/run", agent.id),
    }
}

pub struct ExecutionProxy {
    client: Client,
    config: ExecutorConfig,
    ledger: Arc<dyn UsageLedger>,
}

impl ExecutionProxy {
    pub fn new(config: ExecutorConfig, ledger: Arc<dyn UsageLedger>) -> ExecutionResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ExecutionError::Client(e.to_string()))?;

        Ok(Self {
            client,
            config,
            ledger,
        })
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Full backend URL for `agent`
    pub fn endpoint_url(&self, agent: &Agent) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            resolve_endpoint(agent)
        )
    }

    /// Run `agent` on behalf of `caller_id` and return the backend body unchanged.
    ///
    /// An empty credential is treated as absent; any other value is forwarded
    /// unchanged. When the backend reports usage,
    /// exactly one ledger entry is appended before returning; failed calls
    /// append nothing.
    pub async fn execute(
        &self,
        caller_id: i64,
        agent: &Agent,
        input: Value,
        caller_credential: Option<&str>,
    ) -> ExecutionResult<Value> {
        let credential = caller_credential.filter(|key| !key.is_empty());
        let url = self.endpoint_url(agent);

        info!(
            "Executing agent '{}' (id {}) for user {} at {} (key: {})",
            agent.slug,
            agent.id,
            caller_id,
            url,
            redact_secret(credential.unwrap_or(""))
        );

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "input": input,
                "api_key": credential,
            }))
            .send()
            .await
            .map_err(|e| {
                error!("Execution request for agent {} failed: {}", agent.id, e);
                if e.is_timeout() {
                    ExecutionError::Transport("Request timed out".to_string())
                } else if e.is_connect() {
                    ExecutionError::Transport("Could not connect to execution backend".to_string())
                } else {
                    ExecutionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExecutionError::Transport(format!("Failed to read response: {}", e)))?;
        let elapsed_ms = started.elapsed().as_millis() as i64;

        if !status.is_success() {
            error!(
                "Agent {} execution failed with status {}: {}",
                agent.id,
                status,
                truncate(&text, LOG_BODY_LIMIT)
            );
            return Err(ExecutionError::Backend {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            error!("Agent {} returned non-JSON body: {}", agent.id, e);
            ExecutionError::InvalidResponse(e.to_string())
        })?;
        if !body.is_object() {
            return Err(ExecutionError::InvalidResponse(
                "expected a JSON object".to_string(),
            ));
        }

        let defaults = UsageDefaults {
            provider: &self.config.default_provider,
            model: &self.config.default_model,
            measured_duration_ms: elapsed_ms,
        };
        let entry = entry_from_response(caller_id, agent.id, &body, credential.is_some(), &defaults);

        if let Some(entry) = entry {
            match self.ledger.append(entry).await {
                Ok(recorded) => debug!(
                    "Recorded usage entry {} ({} tokens, cost {})",
                    recorded.id, recorded.tokens_total, recorded.cost_incurred
                ),
                Err(e) => match self.config.ledger_policy {
                    LedgerPolicy::Strict => {
                        error!("Failed to record usage for agent {}: {}", agent.id, e);
                        return Err(ExecutionError::LedgerWrite(e));
                    }
                    LedgerPolicy::BestEffort => {
                        warn!(
                            "Failed to record usage for agent {}, returning response anyway: {}",
                            agent.id, e
                        );
                    }
                },
            }
        } else {
            debug!("Agent {} reported no usage", agent.id);
        }

        info!("Agent {} completed in {}ms", agent.id, elapsed_ms);
        Ok(body)
    }
}
