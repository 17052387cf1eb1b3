//! Launch orchestrator.
//!
//! Fresh launch: validate → create anchor post → deploy.
//! Retry launch: deploy against an anchor post that already exists.
//!
//! The anchor post is created at most once per logical launch, and only from
//! [`Launcher::launch`]. Once it exists, every failure carries its id and URL
//! so the caller can retry the deployment alone. The launcher holds no
//! per-launch state; concurrent calls are independent and nothing stops two
//! retries of the same post from racing. Clawnch decides what a duplicate
//! deployment means, including the one-launch-per-week rule.

use crate::deploy::{DeployOutcome, DeployService};
use crate::error::{Field, RemoteError, Violation};
use crate::handoff::LaunchHandoff;
use crate::social::SocialPlatform;
use crate::types::{AnchorRef, LaunchFailure, LaunchRequest, LaunchResult, Phase};
use crate::validate::{self, require};

pub struct Launcher<S, D> {
    social: S,
    deployer: D,
    default_community: String,
}

impl<S: SocialPlatform, D: DeployService> Launcher<S, D> {
    pub fn new(social: S, deployer: D, default_community: impl Into<String>) -> Self {
        Self {
            social,
            deployer,
            default_community: default_community.into(),
        }
    }

    pub fn social(&self) -> &S {
        &self.social
    }

    pub fn deployer(&self) -> &D {
        &self.deployer
    }

    /// Fresh launch. Creates a new anchor post, then deploys against it.
    pub async fn launch(&self, api_key: &str, request: &LaunchRequest) -> LaunchResult {
        let mut violations: Vec<Violation> =
            require(Field::AgentKey, api_key).err().into_iter().collect();
        let valid = match validate::validate(request, &self.default_community) {
            Ok(valid) if violations.is_empty() => valid,
            Ok(_) => return validation_failure(violations),
            Err(more) => {
                violations.extend(more);
                return validation_failure(violations);
            }
        };

        let handoff = LaunchHandoff::from(&valid);
        let body = match handoff.render_post_body() {
            Ok(body) => body,
            Err(e) => {
                return LaunchResult::Failed(LaunchFailure {
                    phase: Phase::AnchorCreation,
                    reason: format!("could not encode launch parameters: {e}"),
                    diagnostics: Vec::new(),
                    anchor: None,
                    http_status: None,
                })
            }
        };

        let anchor = match self
            .social
            .create_anchor_post(api_key, &valid.community, &handoff.title(), &body)
            .await
        {
            Ok(post) => post.reference(),
            Err(e) => {
                tracing::warn!(error = %e, phase = %Phase::AnchorCreation, "Launch failed");
                return remote_failure(Phase::AnchorCreation, e, None);
            }
        };

        self.deploy_against(api_key, anchor).await
    }

    /// Retry the deployment step against an existing anchor post.
    pub async fn retry_launch(&self, api_key: &str, anchor_post_id: &str) -> LaunchResult {
        let violations: Vec<Violation> = [
            require(Field::AgentKey, api_key),
            require(Field::PostId, anchor_post_id),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();
        if !violations.is_empty() {
            return validation_failure(violations);
        }

        let id = anchor_post_id.trim();
        tracing::info!(post_id = %id, "Retrying deployment against existing anchor post");
        let anchor = AnchorRef {
            id: id.to_string(),
            url: self.social.anchor_post_url(id),
        };
        self.deploy_against(api_key, anchor).await
    }

    async fn deploy_against(&self, api_key: &str, anchor: AnchorRef) -> LaunchResult {
        match self.deployer.deploy(api_key, &anchor.id).await {
            Ok(DeployOutcome::Deployed(deployment)) => LaunchResult::Launched(deployment),
            Ok(DeployOutcome::Rejected {
                reason,
                diagnostics,
                http_status,
            }) => LaunchResult::Failed(LaunchFailure {
                phase: Phase::Deployment,
                reason,
                diagnostics,
                anchor: Some(anchor),
                http_status: Some(http_status),
            }),
            Err(e) => {
                tracing::warn!(post_id = %anchor.id, error = %e, phase = %Phase::Deployment, "Launch failed");
                remote_failure(Phase::Deployment, e, Some(anchor))
            }
        }
    }
}

fn validation_failure(violations: Vec<Violation>) -> LaunchResult {
    let reason = match violations.as_slice() {
        [only] => only.to_string(),
        _ => "Invalid launch request".to_string(),
    };
    LaunchResult::Failed(LaunchFailure {
        phase: Phase::Validation,
        reason,
        diagnostics: violations.iter().map(ToString::to_string).collect(),
        anchor: None,
        http_status: None,
    })
}

fn remote_failure(phase: Phase, err: RemoteError, anchor: Option<AnchorRef>) -> LaunchResult {
    LaunchResult::Failed(LaunchFailure {
        phase,
        http_status: err.status(),
        diagnostics: err.details().to_vec(),
        reason: err.to_string(),
        anchor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::parse_post_body;
    use crate::types::{AnchorPost, Deployment};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const KEY: &str = "moltbook_sk_test";

    #[derive(Default)]
    struct FakeSocial {
        posts: Mutex<Vec<(String, String, String)>>,
        fail_with: Option<RemoteError>,
    }

    impl SocialPlatform for FakeSocial {
        async fn create_anchor_post(
            &self,
            _api_key: &str,
            community: &str,
            title: &str,
            body: &str,
        ) -> Result<AnchorPost, RemoteError> {
            if let Some(e) = &self.fail_with {
                return Err(e.clone());
            }
            let mut posts = self.posts.lock().unwrap();
            posts.push((community.into(), title.into(), body.into()));
            let id = format!("p_{}", posts.len());
            Ok(AnchorPost {
                url: self.anchor_post_url(&id),
                id,
                created_at: chrono::Utc::now(),
            })
        }

        fn anchor_post_url(&self, id: &str) -> String {
            format!("https://www.moltbook.com/post/{id}")
        }
    }

    #[derive(Default)]
    struct FakeDeployer {
        calls: Mutex<Vec<(String, String)>>,
        outcomes: Mutex<VecDeque<Result<DeployOutcome, RemoteError>>>,
    }

    impl FakeDeployer {
        fn answering(outcomes: Vec<Result<DeployOutcome, RemoteError>>) -> Self {
            Self {
                calls: Mutex::default(),
                outcomes: Mutex::new(outcomes.into()),
            }
        }

        fn post_ids(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
        }
    }

    impl DeployService for FakeDeployer {
        async fn deploy(&self, api_key: &str, anchor_post_id: &str) -> Result<DeployOutcome, RemoteError> {
            self.calls
                .lock()
                .unwrap()
                .push((api_key.into(), anchor_post_id.into()));
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected deploy call")
        }
    }

    fn request() -> LaunchRequest {
        LaunchRequest {
            name: "Reef Runner".into(),
            symbol: "reef".into(),
            wallet: format!("0x{}", "a".repeat(40)),
            description: "d".into(),
            image: "http://x/y.png".into(),
            community: None,
        }
    }

    fn deployed() -> DeployOutcome {
        DeployOutcome::Deployed(Deployment {
            agent: "reefbot".into(),
            token_address: "0xtoken".into(),
            tx_hash: "0xtx".into(),
            deployment_url: "https://clanker.world/clanker/0xtoken".into(),
            explorer_url: "https://basescan.org/token/0xtoken".into(),
            rewards: None,
        })
    }

    fn liquidity_too_low() -> DeployOutcome {
        DeployOutcome::Rejected {
            reason: "liquidity too low".into(),
            diagnostics: vec![],
            http_status: 400,
        }
    }

    fn launcher(social: FakeSocial, deployer: FakeDeployer) -> Launcher<FakeSocial, FakeDeployer> {
        Launcher::new(social, deployer, "clawnch")
    }

    #[tokio::test]
    async fn invalid_request_never_posts() {
        let l = launcher(FakeSocial::default(), FakeDeployer::default());
        let mut req = request();
        req.symbol = "R3 EF".into();
        let result = l.launch(KEY, &req).await;

        let failure = result.failure().unwrap();
        assert_eq!(failure.phase, Phase::Validation);
        assert!(failure.anchor.is_none());
        assert!(l.social().posts.lock().unwrap().is_empty());
        assert!(l.deployer().post_ids().is_empty());
    }

    #[tokio::test]
    async fn missing_key_is_validation_failure() {
        let l = launcher(FakeSocial::default(), FakeDeployer::default());
        let failure = l.launch("", &request()).await.failure().cloned().unwrap();
        assert_eq!(failure.phase, Phase::Validation);
        assert_eq!(failure.diagnostics, ["agent_key: is required"]);
        assert!(l.social().posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn anchor_failure_has_no_anchor() {
        let social = FakeSocial {
            fail_with: Some(RemoteError::Status {
                status: 401,
                message: "Invalid API key".into(),
                details: vec![],
            }),
            ..Default::default()
        };
        let l = launcher(social, FakeDeployer::default());
        let failure = l.launch(KEY, &request()).await.failure().cloned().unwrap();

        assert_eq!(failure.phase, Phase::AnchorCreation);
        assert_eq!(failure.reason, "Invalid API key");
        assert_eq!(failure.http_status, Some(401));
        assert!(failure.anchor.is_none());
        assert!(!failure.retryable());
        assert!(l.deployer().post_ids().is_empty());
    }

    #[tokio::test]
    async fn anchor_timeout_is_anchor_failure() {
        let social = FakeSocial {
            fail_with: Some(RemoteError::Timeout),
            ..Default::default()
        };
        let l = launcher(social, FakeDeployer::default());
        let failure = l.launch(KEY, &request()).await.failure().cloned().unwrap();
        assert_eq!(failure.phase, Phase::AnchorCreation);
        assert_eq!(failure.http_status, None);
    }

    #[tokio::test]
    async fn anchor_post_embeds_normalized_parameters() {
        let l = launcher(FakeSocial::default(), FakeDeployer::answering(vec![Ok(deployed())]));
        assert!(l.launch(KEY, &request()).await.is_launched());

        let posts = l.social().posts.lock().unwrap();
        let (community, title, body) = &posts[0];
        assert_eq!(community, "clawnch");
        assert_eq!(title, "Launching Reef Runner ($REEF)!");
        let handoff = parse_post_body(body).unwrap();
        assert_eq!(handoff.symbol, "REEF");
        assert_eq!(handoff.wallet, request().wallet);
    }

    #[tokio::test]
    async fn deploy_failure_then_retry_reuses_anchor() {
        let deployer = FakeDeployer::answering(vec![Ok(liquidity_too_low()), Ok(deployed())]);
        let l = launcher(FakeSocial::default(), deployer);

        let failure = l.launch(KEY, &request()).await.failure().cloned().unwrap();
        assert_eq!(failure.phase, Phase::Deployment);
        assert_eq!(failure.reason, "liquidity too low");
        let anchor = failure.anchor.clone().unwrap();
        assert_eq!(anchor.id, "p_1");
        assert_eq!(anchor.url, "https://www.moltbook.com/post/p_1");
        assert!(failure.retryable());

        let LaunchResult::Launched(d) = l.retry_launch(KEY, &anchor.id).await else {
            panic!("retry should launch");
        };
        assert_eq!(d.token_address, "0xtoken");
        assert_eq!(d.agent, "reefbot");

        assert_eq!(l.social().posts.lock().unwrap().len(), 1);
        assert_eq!(l.deployer().post_ids(), ["p_1", "p_1"]);
    }

    #[tokio::test]
    async fn retries_target_same_post_and_never_create_one() {
        let deployer = FakeDeployer::answering(vec![
            Ok(liquidity_too_low()),
            Err(RemoteError::Timeout),
        ]);
        let l = launcher(FakeSocial::default(), deployer);

        let first = l.retry_launch(KEY, "p_9").await;
        let second = l.retry_launch(KEY, "p_9").await;

        for result in [first, second] {
            let failure = result.failure().cloned().unwrap();
            assert_eq!(failure.phase, Phase::Deployment);
            assert_eq!(failure.anchor.unwrap().id, "p_9");
        }
        assert_eq!(l.deployer().post_ids(), ["p_9", "p_9"]);
        assert!(l.social().posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn retry_requires_key_and_post() {
        let l = launcher(FakeSocial::default(), FakeDeployer::default());
        let failure = l.retry_launch(" ", "").await.failure().cloned().unwrap();
        assert_eq!(failure.phase, Phase::Validation);
        assert_eq!(failure.diagnostics.len(), 2);
        assert!(failure.anchor.is_none());
        assert!(l.deployer().post_ids().is_empty());
    }

    #[tokio::test]
    async fn multiple_remote_diagnostics_are_kept() {
        let deployer = FakeDeployer::answering(vec![Err(RemoteError::Status {
            status: 422,
            message: "Validation failed".into(),
            details: vec!["insufficient liquidity".into(), "malformed metadata".into()],
        })]);
        let l = launcher(FakeSocial::default(), deployer);
        let failure = l.launch(KEY, &request()).await.failure().cloned().unwrap();
        assert_eq!(failure.diagnostics, ["insufficient liquidity", "malformed metadata"]);
        assert_eq!(failure.http_status, Some(422));
        assert_eq!(failure.anchor.unwrap().id, "p_1");
    }
}
