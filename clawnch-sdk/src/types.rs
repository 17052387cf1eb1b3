//! Launch data model.
//!
//! A [`LaunchRequest`] is consumed once. The [`AnchorPost`] it produces lives
//! on Moltbook and outlives any number of failed deployments. Every
//! orchestrator call returns a fresh [`LaunchResult`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw launch parameters as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRequest {
    pub name: String,
    /// Ticker, any case. Sent upstream in uppercase.
    pub symbol: String,
    /// Base wallet that receives the agent's fee share.
    pub wallet: String,
    pub description: String,
    /// URL of an already-hosted image.
    pub image: String,
    /// Submolt for the anchor post. `None` or empty means the default one.
    #[serde(default)]
    pub community: Option<String>,
}

/// A post created on Moltbook to anchor one logical launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorPost {
    pub id: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl AnchorPost {
    pub fn reference(&self) -> AnchorRef {
        AnchorRef {
            id: self.id.clone(),
            url: self.url.clone(),
        }
    }
}

/// The part of an anchor post a caller needs to retry a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRef {
    pub id: String,
    pub url: String,
}

/// Fee split reported by Clawnch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    #[serde(default)]
    pub agent_share: String,
    #[serde(default)]
    pub platform_share: String,
    #[serde(default)]
    pub agent_wallet: String,
}

/// Successful deployment payload, as Clawnch reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Name of the agent the token was launched for.
    #[serde(default)]
    pub agent: String,
    pub token_address: String,
    #[serde(default)]
    pub tx_hash: String,
    /// Token page on the deployment service.
    #[serde(default, rename = "clanker_url")]
    pub deployment_url: String,
    #[serde(default)]
    pub explorer_url: String,
    #[serde(default)]
    pub rewards: Option<Rewards>,
}

/// Orchestrator step a failed launch stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Validation,
    AnchorCreation,
    Deployment,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Validation => write!(f, "validation"),
            Phase::AnchorCreation => write!(f, "anchor_creation"),
            Phase::Deployment => write!(f, "deployment"),
        }
    }
}

/// Terminal failure of one orchestrator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchFailure {
    pub phase: Phase,
    pub reason: String,
    pub diagnostics: Vec<String>,
    /// Present once an anchor post exists for this launch.
    pub anchor: Option<AnchorRef>,
    /// HTTP status of the remote failure, when there was one.
    pub http_status: Option<u16>,
}

impl LaunchFailure {
    /// Whether the caller may retry the deployment without posting again.
    pub fn retryable(&self) -> bool {
        self.phase == Phase::Deployment && self.anchor.is_some()
    }
}

/// Outcome of [`crate::Launcher::launch`] or [`crate::Launcher::retry_launch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchResult {
    Launched(Deployment),
    Failed(LaunchFailure),
}

impl LaunchResult {
    pub fn is_launched(&self) -> bool {
        matches!(self, LaunchResult::Launched(_))
    }

    pub fn failure(&self) -> Option<&LaunchFailure> {
        match self {
            LaunchResult::Failed(f) => Some(f),
            LaunchResult::Launched(_) => None,
        }
    }
}

/// A token Clawnch has already launched. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchedTokenRecord {
    pub name: String,
    pub symbol: String,
    pub token_address: String,
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub post_url: String,
    #[serde(default)]
    pub clanker_url: String,
    #[serde(default)]
    pub explorer_url: String,
    #[serde(default)]
    pub launched_at: String,
}

impl LaunchedTokenRecord {
    /// `launched_at` parsed as RFC 3339, if it is.
    pub fn launched_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.launched_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}
