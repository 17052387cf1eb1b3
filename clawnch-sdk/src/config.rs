//! Remote service endpoints.

use std::time::Duration;

/// Moltbook REST API base.
pub const DEFAULT_SOCIAL_API: &str = "https://www.moltbook.com/api/v1";
/// Public post URLs are `{base}/{id}`.
pub const DEFAULT_POST_URL_BASE: &str = "https://www.moltbook.com/post";
/// Clawnch deployment API base.
pub const DEFAULT_DEPLOY_API: &str = "https://clawn.ch/api";
/// Submolt that anchor posts go to unless the caller picks another one.
pub const DEFAULT_COMMUNITY: &str = "clawnch";
/// Per-request timeout for every remote call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the social platform and deployment service live.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Moltbook API base, without trailing slash.
    pub social_api: String,
    /// Base of public post URLs, without trailing slash.
    pub post_url_base: String,
    /// Clawnch API base, without trailing slash.
    pub deploy_api: String,
    /// Community used when a launch request leaves it empty.
    pub default_community: String,
    /// Timeout applied to each remote request.
    pub timeout: Duration,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            social_api: DEFAULT_SOCIAL_API.to_string(),
            post_url_base: DEFAULT_POST_URL_BASE.to_string(),
            deploy_api: DEFAULT_DEPLOY_API.to_string(),
            default_community: DEFAULT_COMMUNITY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Endpoints {
    /// Normalize user-supplied bases so path joins never double up slashes.
    pub fn normalized(mut self) -> Self {
        for base in [
            &mut self.social_api,
            &mut self.post_url_base,
            &mut self.deploy_api,
        ] {
            while base.ends_with('/') {
                base.pop();
            }
        }
        self
    }

    /// Build the shared HTTP client with the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("clawnch-sdk/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_strips_trailing_slashes() {
        let ep = Endpoints {
            social_api: "http://a/api/v1//".into(),
            post_url_base: "http://a/post/".into(),
            deploy_api: "http://b/api".into(),
            ..Default::default()
        }
        .normalized();
        assert_eq!(ep.social_api, "http://a/api/v1");
        assert_eq!(ep.post_url_base, "http://a/post");
        assert_eq!(ep.deploy_api, "http://b/api");
    }
}
