//! Read-only view of tokens Clawnch has launched.
//!
//! Each call re-fetches the whole list. Nothing is cached and no cursor is
//! kept, so calling again restarts from scratch.

use std::future::Future;

use serde::Serialize;

use crate::error::RemoteError;
use crate::types::LaunchedTokenRecord;

/// Anything that can produce the full launched-token list.
pub trait TokenSource: Send + Sync {
    fn fetch_tokens(
        &self,
    ) -> impl Future<Output = Result<Vec<LaunchedTokenRecord>, RemoteError>> + Send;
}

/// One full snapshot. A failed fetch is an empty list with `error` set,
/// never a partial list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenListing {
    pub tokens: Vec<LaunchedTokenRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TokenListing {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LaunchedTokenRecord> {
        self.tokens.iter()
    }

    pub fn into_result(self) -> Result<Vec<LaunchedTokenRecord>, String> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.tokens),
        }
    }
}

impl IntoIterator for TokenListing {
    type Item = LaunchedTokenRecord;
    type IntoIter = std::vec::IntoIter<LaunchedTokenRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

/// Fetch every launched token.
pub async fn list_launched_tokens<S: TokenSource>(source: &S) -> TokenListing {
    match source.fetch_tokens().await {
        Ok(tokens) => {
            tracing::debug!(count = tokens.len(), "Fetched launched tokens");
            TokenListing {
                tokens,
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Token listing failed");
            TokenListing {
                tokens: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}
