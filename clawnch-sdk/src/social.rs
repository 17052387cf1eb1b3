//! Moltbook client.
//!
//! The only write the launch flow makes here is the anchor post. Agent
//! registration, claim status and profile lookups are single-call
//! pass-throughs with no launch state attached.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::config::Endpoints;
use crate::error::{read_json, status_error, RemoteError};
use crate::types::AnchorPost;

/// Social platform capability the orchestrator needs.
pub trait SocialPlatform: Send + Sync {
    /// Create one durable post. Not idempotent: every call is a new post.
    fn create_anchor_post(
        &self,
        api_key: &str,
        community: &str,
        title: &str,
        body: &str,
    ) -> impl Future<Output = Result<AnchorPost, RemoteError>> + Send;

    /// Public URL of a post. No network call.
    fn anchor_post_url(&self, id: &str) -> String;
}

/// HTTP client for the Moltbook API.
#[derive(Clone)]
pub struct MoltbookClient {
    http: reqwest::Client,
    api: String,
    post_url_base: String,
}

impl MoltbookClient {
    pub fn new(endpoints: &Endpoints) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(endpoints.http_client()?, endpoints))
    }

    /// Reuse an existing HTTP client (its timeout applies).
    pub fn with_client(http: reqwest::Client, endpoints: &Endpoints) -> Self {
        let endpoints = endpoints.clone().normalized();
        Self {
            http,
            api: endpoints.social_api,
            post_url_base: endpoints.post_url_base,
        }
    }

    /// Register a new agent. Returns the platform's response as-is.
    pub async fn register_agent(&self, name: &str, description: &str) -> Result<Value, RemoteError> {
        tracing::info!(agent = %name, "Registering agent");
        let resp = self
            .http
            .post(format!("{}/agents/register", self.api))
            .json(&json!({ "name": name, "description": description }))
            .send()
            .await?;
        let (status, data) = read_json(resp).await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Agent registration rejected");
            return Err(status_error(status.as_u16(), &data, "Failed to register agent"));
        }
        Ok(data)
    }

    /// Whether the agent behind `api_key` has been claimed by its owner.
    pub async fn claim_status(&self, api_key: &str) -> Result<Value, RemoteError> {
        self.get_authed("agents/status", api_key, &[], "Failed to check status")
            .await
    }

    /// Profile of `name`, or of the agent behind `api_key` when `name` is `None`.
    pub async fn profile(&self, api_key: &str, name: Option<&str>) -> Result<Value, RemoteError> {
        match name.filter(|n| !n.is_empty()) {
            Some(n) => {
                self.get_authed("agents/profile", api_key, &[("name", n)], "Failed to get profile")
                    .await
            }
            None => {
                self.get_authed("agents/me", api_key, &[], "Failed to get profile")
                    .await
            }
        }
    }

    async fn get_authed(
        &self,
        path: &str,
        api_key: &str,
        query: &[(&str, &str)],
        fallback: &str,
    ) -> Result<Value, RemoteError> {
        let resp = self
            .http
            .get(format!("{}/{path}", self.api))
            .bearer_auth(api_key)
            .query(query)
            .send()
            .await?;
        let (status, data) = read_json(resp).await?;
        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "Moltbook request rejected");
            return Err(status_error(status.as_u16(), &data, fallback));
        }
        Ok(data)
    }
}

impl SocialPlatform for MoltbookClient {
    async fn create_anchor_post(
        &self,
        api_key: &str,
        community: &str,
        title: &str,
        body: &str,
    ) -> Result<AnchorPost, RemoteError> {
        tracing::info!(submolt = %community, "Creating anchor post");
        let resp = self
            .http
            .post(format!("{}/posts", self.api))
            .bearer_auth(api_key)
            .json(&json!({
                "submolt": community,
                "title": title,
                "content": body,
            }))
            .send()
            .await?;
        let (status, data) = read_json(resp).await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Anchor post rejected");
            return Err(status_error(
                status.as_u16(),
                &data,
                "Failed to create Moltbook post",
            ));
        }

        let post = &data["post"];
        let id = match &post["id"] {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                return Err(RemoteError::Malformed(
                    "No post ID returned from Moltbook".into(),
                ))
            }
        };
        let created_at = post["created_at"]
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        tracing::info!(post_id = %id, "Anchor post created");
        Ok(AnchorPost {
            url: self.anchor_post_url(&id),
            id,
            created_at,
        })
    }

    fn anchor_post_url(&self, id: &str) -> String {
        format!("{}/{id}", self.post_url_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_url_is_derived_from_id() {
        let client = MoltbookClient::with_client(
            reqwest::Client::new(),
            &Endpoints {
                post_url_base: "https://www.moltbook.com/post/".into(),
                ..Default::default()
            },
        );
        assert_eq!(
            client.anchor_post_url("p_1"),
            "https://www.moltbook.com/post/p_1"
        );
    }
}
