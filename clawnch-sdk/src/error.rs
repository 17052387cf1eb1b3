//! Error types shared by the clients and the orchestrator.

use std::fmt;

/// A launch input field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Symbol,
    Wallet,
    Description,
    Image,
    AgentKey,
    PostId,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Symbol => write!(f, "symbol"),
            Field::Wallet => write!(f, "wallet"),
            Field::Description => write!(f, "description"),
            Field::Image => write!(f, "image"),
            Field::AgentKey => write!(f, "agent_key"),
            Field::PostId => write!(f, "post_id"),
        }
    }
}

/// One rule a launch input broke. No network call has happened yet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct Violation {
    pub field: Field,
    pub message: String,
}

impl Violation {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Failure talking to Moltbook or Clawnch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with an error status or an explicit failure body.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        details: Vec<String>,
    },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RemoteError {
    /// HTTP status the remote returned, if it returned one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Per-item diagnostics reported by the remote.
    pub fn details(&self) -> &[String] {
        match self {
            RemoteError::Status { details, .. } => details,
            _ => &[],
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout
        } else if e.is_decode() {
            RemoteError::Malformed(e.to_string())
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}

/// Read a response body as JSON. A non-JSON error body reads as `null` so the
/// caller's fallback message applies; a non-JSON success body is malformed.
pub(crate) async fn read_json(
    resp: reqwest::Response,
) -> Result<(reqwest::StatusCode, serde_json::Value), RemoteError> {
    let status = resp.status();
    let text = resp.text().await?;
    if text.trim().is_empty() {
        return Ok((status, serde_json::Value::Null));
    }
    match serde_json::from_str(&text) {
        Ok(v) => Ok((status, v)),
        Err(_) if !status.is_success() => Ok((status, serde_json::Value::Null)),
        Err(e) => Err(RemoteError::Malformed(e.to_string())),
    }
}

/// Pull `error` and `errors[]` out of a JSON failure body.
pub(crate) fn failure_fields(body: &serde_json::Value, fallback: &str) -> (String, Vec<String>) {
    let message = body["error"]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string();
    let details = body["errors"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|v| match v.as_str() {
                    Some(s) => s.to_string(),
                    None => v.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();
    (message, details)
}

pub(crate) fn status_error(status: u16, body: &serde_json::Value, fallback: &str) -> RemoteError {
    let (message, details) = failure_fields(body, fallback);
    RemoteError::Status {
        status,
        message,
        details,
    }
}
