//! Server configuration, from flags or environment.

use std::time::Duration;

use clap::Parser;
use clawnch_sdk::config::{
    DEFAULT_COMMUNITY, DEFAULT_DEPLOY_API, DEFAULT_POST_URL_BASE, DEFAULT_SOCIAL_API,
    DEFAULT_TIMEOUT_SECS,
};
use clawnch_sdk::Endpoints;

/// Default HTTP listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

#[derive(Parser, Debug, Clone)]
#[command(name = "clawnch-server", about = "HTTP service for Clawnch token launches")]
pub struct ServerConfig {
    /// Address to listen on (host:port).
    #[arg(long, env = "CLAWNCH_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: String,

    /// Moltbook API base URL.
    #[arg(long, env = "MOLTBOOK_API_URL", default_value = DEFAULT_SOCIAL_API)]
    pub moltbook_api: String,

    /// Base of public Moltbook post URLs.
    #[arg(long, env = "MOLTBOOK_POST_URL", default_value = DEFAULT_POST_URL_BASE)]
    pub moltbook_post_url: String,

    /// Clawnch API base URL.
    #[arg(long, env = "CLAWNCH_API_URL", default_value = DEFAULT_DEPLOY_API)]
    pub clawnch_api: String,

    /// Submolt for anchor posts when a request names none.
    #[arg(long, env = "CLAWNCH_DEFAULT_SUBMOLT", default_value = DEFAULT_COMMUNITY)]
    pub default_submolt: String,

    /// Timeout for each upstream request, in seconds.
    #[arg(long, env = "CLAWNCH_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            moltbook_api: DEFAULT_SOCIAL_API.to_string(),
            moltbook_post_url: DEFAULT_POST_URL_BASE.to_string(),
            clawnch_api: DEFAULT_DEPLOY_API.to_string(),
            default_submolt: DEFAULT_COMMUNITY.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            social_api: self.moltbook_api.clone(),
            post_url_base: self.moltbook_post_url.clone(),
            deploy_api: self.clawnch_api.clone(),
            default_community: self.default_submolt.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
        .normalized()
    }
}
