//! Persistent configuration for the clawnch CLI.
//!
//! Config file lives at `~/.config/clawnch/cli.toml` (the platform config
//! dir). Flags win over environment variables, which win over the file,
//! which wins over built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clawnch_sdk::Endpoints;
use serde::{Deserialize, Serialize};

/// User configuration (persisted in cli.toml).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Moltbook agent API key.
    pub api_key: Option<String>,
    /// Wallet that receives the agent's fee share.
    pub wallet: Option<String>,
    /// Submolt for anchor posts.
    pub submolt: Option<String>,
    pub moltbook_api: Option<String>,
    pub moltbook_post_url: Option<String>,
    pub clawnch_api: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Settings given on the command line or through the environment.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Moltbook agent API key
    #[arg(long, env = "MOLTBOOK_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Wallet that receives the agent's fee share
    #[arg(long, env = "CLAWNCH_WALLET", global = true)]
    pub wallet: Option<String>,

    /// Submolt for the launch post
    #[arg(long, env = "CLAWNCH_SUBMOLT", global = true)]
    pub submolt: Option<String>,

    /// Moltbook API base URL
    #[arg(long, env = "MOLTBOOK_API_URL", global = true)]
    pub moltbook_api: Option<String>,

    /// Base of public Moltbook post URLs
    #[arg(long, env = "MOLTBOOK_POST_URL", global = true)]
    pub moltbook_post_url: Option<String>,

    /// Clawnch API base URL
    #[arg(long, env = "CLAWNCH_API_URL", global = true)]
    pub clawnch_api: Option<String>,

    /// Timeout for each remote request, in seconds
    #[arg(long, env = "CLAWNCH_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clawnch")
        .join("cli.toml")
}

impl Config {
    /// Load from `path`. A missing file is an empty config.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("bad config file {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("can't create {}", dir.display()))?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("can't write {}", path.display()))
    }

    /// Take every value the overrides set; keep the rest.
    pub fn absorb(&mut self, o: &Overrides) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }
        take(&mut self.api_key, &o.api_key);
        take(&mut self.wallet, &o.wallet);
        take(&mut self.submolt, &o.submolt);
        take(&mut self.moltbook_api, &o.moltbook_api);
        take(&mut self.moltbook_post_url, &o.moltbook_post_url);
        take(&mut self.clawnch_api, &o.clawnch_api);
        take(&mut self.timeout_secs, &o.timeout_secs);
    }
}

/// Effective settings after merging overrides, config file and defaults.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub api_key: Option<String>,
    pub wallet: Option<String>,
    pub endpoints: Endpoints,
}

impl Resolved {
    pub fn merge(o: &Overrides, config: &Config) -> Self {
        let defaults = Endpoints::default();
        let pick = |cli: &Option<String>, file: &Option<String>, default: String| {
            cli.clone()
                .or_else(|| file.clone())
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(default)
        };

        let endpoints = Endpoints {
            social_api: pick(&o.moltbook_api, &config.moltbook_api, defaults.social_api),
            post_url_base: pick(
                &o.moltbook_post_url,
                &config.moltbook_post_url,
                defaults.post_url_base,
            ),
            deploy_api: pick(&o.clawnch_api, &config.clawnch_api, defaults.deploy_api),
            default_community: pick(&o.submolt, &config.submolt, defaults.default_community),
            timeout: o
                .timeout_secs
                .or(config.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
        .normalized();

        Self {
            api_key: o.api_key.clone().or_else(|| config.api_key.clone()),
            wallet: o.wallet.clone().or_else(|| config.wallet.clone()),
            endpoints,
        }
    }
}
