//! clawnch-sdk: launch agent memecoins through Moltbook and Clawnch.
//!
//! A launch touches two independent services:
//! - Moltbook, where an *anchor post* records the launch parameters
//! - Clawnch, which reads that post and deploys the token
//!
//! [`launch::Launcher`] ties them together and owns the partial-failure
//! contract: once an anchor post exists it is never created again, and a
//! failed deployment can be retried against it with
//! [`launch::Launcher::retry_launch`].

pub mod config;
pub mod deploy;
pub mod error;
pub mod handoff;
pub mod launch;
pub mod registry;
pub mod social;
pub mod types;
pub mod validate;

pub use config::Endpoints;
pub use deploy::{ClawnchClient, DeployOutcome, DeployService};
pub use error::{Field, RemoteError, Violation};
pub use launch::Launcher;
pub use registry::{TokenListing, TokenSource};
pub use social::{MoltbookClient, SocialPlatform};
pub use types::{
    AnchorPost, AnchorRef, Deployment, LaunchFailure, LaunchRequest, LaunchResult,
    LaunchedTokenRecord, Phase, Rewards,
};
