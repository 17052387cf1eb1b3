//! Clawnch deployment client.
//!
//! `deploy` asks Clawnch to read an anchor post and deploy the token it
//! describes. Whether Clawnch deduplicates repeated calls for the same post
//! is up to Clawnch; every call here is a full attempt.

use std::future::Future;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Endpoints;
use crate::error::{failure_fields, read_json, status_error, RemoteError};
use crate::registry::TokenSource;
use crate::types::{Deployment, LaunchedTokenRecord};

/// Result of a deployment attempt that reached Clawnch and got an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Deployed(Deployment),
    /// Clawnch refused. It may report several problems at once.
    Rejected {
        reason: String,
        diagnostics: Vec<String>,
        http_status: u16,
    },
}

/// Deployment capability the orchestrator needs.
pub trait DeployService: Send + Sync {
    /// Transport failures and unreadable answers are `Err`; a refusal from
    /// the service is `Ok(DeployOutcome::Rejected)`.
    fn deploy(
        &self,
        api_key: &str,
        anchor_post_id: &str,
    ) -> impl Future<Output = Result<DeployOutcome, RemoteError>> + Send;
}

/// HTTP client for the Clawnch API.
#[derive(Clone)]
pub struct ClawnchClient {
    http: reqwest::Client,
    api: String,
}

#[derive(Deserialize)]
struct TokensResponse {
    #[serde(default)]
    tokens: Vec<LaunchedTokenRecord>,
}

impl ClawnchClient {
    pub fn new(endpoints: &Endpoints) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(endpoints.http_client()?, endpoints))
    }

    pub fn with_client(http: reqwest::Client, endpoints: &Endpoints) -> Self {
        Self {
            http,
            api: endpoints.clone().normalized().deploy_api,
        }
    }
}

/// Turn a `/launch` answer into an outcome.
fn launch_outcome(status: u16, data: Value) -> Result<DeployOutcome, RemoteError> {
    let refused = data.get("success").and_then(Value::as_bool) == Some(false);
    if !(200..300).contains(&status) || refused {
        let (reason, diagnostics) = failure_fields(&data, "Failed to launch token");
        return Ok(DeployOutcome::Rejected {
            reason,
            diagnostics,
            http_status: status,
        });
    }
    serde_json::from_value(data)
        .map(DeployOutcome::Deployed)
        .map_err(|e| RemoteError::Malformed(format!("launch response: {e}")))
}

impl DeployService for ClawnchClient {
    async fn deploy(&self, api_key: &str, anchor_post_id: &str) -> Result<DeployOutcome, RemoteError> {
        tracing::info!(post_id = %anchor_post_id, "Requesting token deployment");
        let resp = self
            .http
            .post(format!("{}/launch", self.api))
            .json(&json!({
                "moltbook_key": api_key,
                "post_id": anchor_post_id,
            }))
            .send()
            .await?;
        let (status, data) = read_json(resp).await?;
        let outcome = launch_outcome(status.as_u16(), data)?;
        match &outcome {
            DeployOutcome::Deployed(d) => {
                tracing::info!(post_id = %anchor_post_id, token = %d.token_address, "Token deployed")
            }
            DeployOutcome::Rejected {
                reason,
                http_status,
                ..
            } => {
                tracing::warn!(post_id = %anchor_post_id, status = http_status, %reason, "Deployment rejected")
            }
        }
        Ok(outcome)
    }
}

impl TokenSource for ClawnchClient {
    async fn fetch_tokens(&self) -> Result<Vec<LaunchedTokenRecord>, RemoteError> {
        let resp = self.http.get(format!("{}/tokens", self.api)).send().await?;
        let (status, data) = read_json(resp).await?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &data, "Failed to fetch tokens"));
        }
        let parsed: TokensResponse = serde_json::from_value(data)
            .map_err(|e| RemoteError::Malformed(format!("tokens response: {e}")))?;
        Ok(parsed.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_is_rejection_with_diagnostics() {
        let outcome = launch_outcome(
            400,
            json!({ "error": "Validation failed", "errors": ["liquidity too low", "bad image"] }),
        )
        .unwrap();
        assert_eq!(
            outcome,
            DeployOutcome::Rejected {
                reason: "Validation failed".into(),
                diagnostics: vec!["liquidity too low".into(), "bad image".into()],
                http_status: 400,
            }
        );
    }

    #[test]
    fn ok_status_with_success_false_is_rejection() {
        let outcome = launch_outcome(200, json!({ "success": false, "error": "weekly limit" })).unwrap();
        assert!(matches!(outcome, DeployOutcome::Rejected { ref reason, .. } if reason == "weekly limit"));
    }

    #[test]
    fn success_payload_is_deployment() {
        let outcome = launch_outcome(
            200,
            json!({ "success": true, "agent": "reefbot", "token_address": "0xabc", "tx_hash": "0x1" }),
        )
        .unwrap();
        let DeployOutcome::Deployed(d) = outcome else {
            panic!("expected deployment");
        };
        assert_eq!(d.token_address, "0xabc");
        assert_eq!(d.agent, "reefbot");
    }

    #[test]
    fn success_without_token_address_is_malformed() {
        assert!(matches!(
            launch_outcome(200, json!({ "success": true })),
            Err(RemoteError::Malformed(_))
        ));
    }

    #[test]
    fn bare_error_status_uses_fallback_reason() {
        let outcome = launch_outcome(502, Value::Null).unwrap();
        assert!(matches!(outcome, DeployOutcome::Rejected { ref reason, http_status: 502, .. } if reason == "Failed to launch token"));
    }
}
