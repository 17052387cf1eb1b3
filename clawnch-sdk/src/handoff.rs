//! Launch parameters embedded in the anchor post.
//!
//! Clawnch does not take launch parameters directly. It reads them back out
//! of the anchor post body, so the body is the wire format between the two
//! services:
//!
//! ````text
//! Launching Reef Runner ($REEF)! 🚀
//!
//! !clawnch
//! ```json
//! {
//!   "version": 1,
//!   "name": "Reef Runner",
//!   "symbol": "REEF",
//!   ...
//! }
//! ```
//! ````
//!
//! The JSON block is always produced by serde, so user text cannot break out
//! of it.

use serde::{Deserialize, Serialize};

use crate::validate::ValidLaunch;

/// Line that introduces the parameter block.
pub const MARKER: &str = "!clawnch";
/// Current handoff format version.
pub const VERSION: u32 = 1;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

fn default_version() -> u32 {
    VERSION
}

/// Launch parameters as the deployment service reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchHandoff {
    #[serde(default = "default_version")]
    pub version: u32,
    pub name: String,
    pub symbol: String,
    pub wallet: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandoffError {
    #[error("no !clawnch marker in post body")]
    MissingMarker,
    #[error("no json block after !clawnch marker")]
    MissingBlock,
    #[error("invalid launch json: {0}")]
    InvalidJson(String),
    #[error("unsupported handoff version {0}")]
    UnsupportedVersion(u32),
}

impl From<&ValidLaunch> for LaunchHandoff {
    fn from(v: &ValidLaunch) -> Self {
        Self {
            version: VERSION,
            name: v.name.clone(),
            symbol: v.symbol.clone(),
            wallet: v.wallet.clone(),
            description: v.description.clone(),
            image: v.image.clone(),
        }
    }
}

impl LaunchHandoff {
    /// Anchor post title.
    pub fn title(&self) -> String {
        format!("Launching {} (${})!", self.prose_name(), self.symbol)
    }

    /// Name with line breaks flattened so it cannot fake a marker line.
    fn prose_name(&self) -> String {
        self.name.replace(['\r', '\n'], " ")
    }

    /// Full anchor post body: prose, marker, fenced JSON.
    pub fn render_post_body(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(format!(
            "Launching {} (${})! 🚀\n\n{MARKER}\n{FENCE_OPEN}\n{json}\n{FENCE_CLOSE}",
            self.prose_name(),
            self.symbol
        ))
    }
}

/// Recover the handoff from a post body.
pub fn parse_post_body(body: &str) -> Result<LaunchHandoff, HandoffError> {
    let mut lines = body.lines();
    lines
        .by_ref()
        .find(|l| l.trim() == MARKER)
        .ok_or(HandoffError::MissingMarker)?;
    lines
        .by_ref()
        .find(|l| l.trim() == FENCE_OPEN)
        .ok_or(HandoffError::MissingBlock)?;

    let mut json = String::new();
    let mut closed = false;
    for line in lines {
        if line.trim() == FENCE_CLOSE {
            closed = true;
            break;
        }
        json.push_str(line);
        json.push('\n');
    }
    if !closed {
        return Err(HandoffError::MissingBlock);
    }

    let handoff: LaunchHandoff =
        serde_json::from_str(&json).map_err(|e| HandoffError::InvalidJson(e.to_string()))?;
    if handoff.version != VERSION {
        return Err(HandoffError::UnsupportedVersion(handoff.version));
    }
    Ok(handoff)
}
