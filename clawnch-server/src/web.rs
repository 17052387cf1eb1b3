//! HTTP routes.
//!
//! Every failure body is `{ "success": false, "error": ... }`, optionally
//! with `errors`, `phase`, `post_id`/`post_url` and `http_status`. Clients
//! offer a retry only when `phase` is `deployment` and `post_id` is present.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clawnch_sdk::registry::list_launched_tokens;
use clawnch_sdk::{
    ClawnchClient, Deployment, LaunchRequest, LaunchResult, Launcher, MoltbookClient, Phase,
    RemoteError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;

pub type HttpLauncher = Launcher<MoltbookClient, ClawnchClient>;

/// Shared by all handlers. Holds no per-launch state.
pub struct AppState {
    pub launcher: HttpLauncher,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let endpoints = config.endpoints();
        let http = endpoints.http_client()?;
        let launcher = Launcher::new(
            MoltbookClient::with_client(http.clone(), &endpoints),
            ClawnchClient::with_client(http, &endpoints),
            endpoints.default_community.clone(),
        );
        Ok(Self { launcher })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(api_health))
        .route("/api/v1/launch", post(api_launch))
        .route("/api/v1/launch/retry", post(api_retry_launch))
        .route("/api/v1/tokens", get(api_tokens))
        .route("/api/v1/agents/register", post(api_register_agent))
        .route("/api/v1/agents/status", post(api_claim_status))
        .route("/api/v1/agents/profile", post(api_profile))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve in the background. Returns the bound address.
pub async fn start(config: &ServerConfig) -> anyhow::Result<(SocketAddr, JoinHandle<()>)> {
    let state = Arc::new(AppState::from_config(config)?);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!("HTTP listener on {addr}");
    let app = router(state);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("HTTP server error: {e}");
        }
    });
    Ok((addr, handle))
}

/// Bind and serve until the server stops.
pub async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let (_addr, handle) = start(config).await?;
    handle.await?;
    Ok(())
}

// ─── Request/Response Types ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LaunchBody {
    #[serde(default)]
    moltbook_key: String,
    #[serde(default)]
    token_name: String,
    #[serde(default)]
    token_symbol: String,
    #[serde(default)]
    wallet: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    submolt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RetryBody {
    #[serde(default)]
    moltbook_key: String,
    #[serde(default)]
    post_id: String,
}

#[derive(Debug, Deserialize)]
struct RegisterBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct AgentKeyBody {
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    agent_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct LaunchResponse {
    success: bool,
    #[serde(flatten)]
    deployment: Option<Deployment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<Phase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    http_status: Option<u16>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    retryable: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

// ─── Response mapping ────────────────────────────────────────────────────────

fn failure_status(http_status: Option<u16>) -> StatusCode {
    http_status
        .filter(|s| *s >= 400)
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

fn launch_response(result: LaunchResult) -> Response {
    match result {
        LaunchResult::Launched(deployment) => (
            StatusCode::OK,
            Json(LaunchResponse {
                success: true,
                deployment: Some(deployment),
                error: None,
                errors: Vec::new(),
                phase: None,
                post_id: None,
                post_url: None,
                http_status: None,
                retryable: false,
            }),
        )
            .into_response(),
        LaunchResult::Failed(failure) => {
            let status = match failure.phase {
                Phase::Validation => StatusCode::BAD_REQUEST,
                Phase::AnchorCreation | Phase::Deployment => failure_status(failure.http_status),
            };
            let retryable = failure.retryable();
            let (post_id, post_url) = match failure.anchor {
                Some(anchor) => (Some(anchor.id), Some(anchor.url)),
                None => (None, None),
            };
            (
                status,
                Json(LaunchResponse {
                    success: false,
                    deployment: None,
                    error: Some(failure.reason),
                    errors: failure.diagnostics,
                    phase: Some(failure.phase),
                    post_id,
                    post_url,
                    http_status: failure.http_status,
                    retryable,
                }),
            )
                .into_response()
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({ "success": false, "error": message.into() })),
    )
        .into_response()
}

fn bad_body(rejection: JsonRejection) -> Response {
    error_response(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// Pass a Moltbook answer through with `success` merged in.
fn passthrough(result: Result<Value, RemoteError>) -> Response {
    match result {
        Ok(Value::Object(mut map)) => {
            map.insert("success".into(), Value::Bool(true));
            Json(Value::Object(map)).into_response()
        }
        Ok(other) => Json(json!({ "success": true, "data": other })).into_response(),
        Err(e) => error_response(failure_status(e.status()), e.to_string()),
    }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn api_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn api_launch(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LaunchBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return bad_body(e),
    };
    let request = LaunchRequest {
        name: body.token_name,
        symbol: body.token_symbol,
        wallet: body.wallet,
        description: body.description,
        image: body.image,
        community: body.submolt,
    };
    let result = state.launcher.launch(&body.moltbook_key, &request).await;
    if let Some(f) = result.failure() {
        tracing::info!(phase = %f.phase, retryable = f.retryable(), "Launch request failed");
    }
    launch_response(result)
}

async fn api_retry_launch(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RetryBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return bad_body(e),
    };
    let result = state
        .launcher
        .retry_launch(&body.moltbook_key, &body.post_id)
        .await;
    launch_response(result)
}

async fn api_tokens(State(state): State<Arc<AppState>>) -> Response {
    let listing = list_launched_tokens(state.launcher.deployer()).await;
    let status = if listing.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(listing)).into_response()
}

async fn api_register_agent(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return bad_body(e),
    };
    if body.name.trim().is_empty() || body.description.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Name and description are required",
        );
    }
    passthrough(
        state
            .launcher
            .social()
            .register_agent(&body.name, &body.description)
            .await,
    )
}

async fn api_claim_status(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AgentKeyBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return bad_body(e),
    };
    if body.api_key.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "API key is required");
    }
    passthrough(state.launcher.social().claim_status(&body.api_key).await)
}

async fn api_profile(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AgentKeyBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return bad_body(e),
    };
    if body.api_key.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "API key is required");
    }
    passthrough(
        state
            .launcher
            .social()
            .profile(&body.api_key, body.agent_name.as_deref())
            .await,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawnch_sdk::{AnchorRef, LaunchFailure};

    fn failed(phase: Phase, http_status: Option<u16>, anchor: Option<AnchorRef>) -> LaunchResult {
        LaunchResult::Failed(LaunchFailure {
            phase,
            reason: "boom".into(),
            diagnostics: vec![],
            anchor,
            http_status,
        })
    }

    #[test]
    fn status_codes_follow_phase() {
        assert_eq!(
            launch_response(failed(Phase::Validation, None, None)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            launch_response(failed(Phase::AnchorCreation, Some(401), None)).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            launch_response(failed(Phase::Deployment, None, None)).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            launch_response(failed(Phase::Deployment, Some(200), None)).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn launch_failure_body_shape() {
        let anchor = AnchorRef {
            id: "p_1".into(),
            url: "https://www.moltbook.com/post/p_1".into(),
        };
        let resp = launch_response(failed(Phase::Deployment, Some(400), Some(anchor)));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "boom",
                "phase": "deployment",
                "post_id": "p_1",
                "post_url": "https://www.moltbook.com/post/p_1",
                "http_status": 400,
                "retryable": true,
            })
        );
    }
}
