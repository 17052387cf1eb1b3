//! clawnch: launch agent tokens from the command line.
//!
//!   clawnch launch --name .. --symbol .. --description .. --image ..
//!   clawnch retry --post <id>       deploy again against an existing post
//!   clawnch tokens                  list launched tokens
//!   clawnch register / status / profile
//!   clawnch config [--save]         show or persist settings
//!
//! Exits non-zero whenever the requested operation did not succeed.

mod config;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clawnch_sdk::registry::list_launched_tokens;
use clawnch_sdk::{ClawnchClient, LaunchRequest, LaunchResult, Launcher, MoltbookClient};
use tracing_subscriber::EnvFilter;

use config::{Config, Overrides, Resolved};

#[derive(Parser)]
#[command(name = "clawnch", version, about = "Launch agent tokens through Moltbook and Clawnch")]
struct Cli {
    /// Config file (default: <config dir>/clawnch/cli.toml)
    #[arg(long, env = "CLAWNCH_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Post the launch announcement and deploy the token
    Launch {
        /// Token name
        #[arg(long)]
        name: String,
        /// Ticker symbol, 1-10 letters or digits
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        description: String,
        /// URL of an already-hosted image
        #[arg(long)]
        image: String,
    },
    /// Deploy again against an existing launch post
    Retry {
        /// Moltbook post id printed by the failed launch
        #[arg(long)]
        post: String,
    },
    /// List every token launched so far
    Tokens {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a new Moltbook agent
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },
    /// Check whether the agent has been claimed
    Status,
    /// Show an agent profile (your own by default)
    Profile {
        #[arg(long)]
        name: Option<String>,
    },
    /// Show effective settings, or persist the given ones with --save
    Config {
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clawnch=warn,clawnch_sdk=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let path = cli.config.clone().unwrap_or_else(config::default_path);
    let mut file = Config::load_from(&path)?;
    let resolved = Resolved::merge(&cli.overrides, &file);
    tracing::debug!(
        config = %path.display(),
        moltbook = %resolved.endpoints.social_api,
        clawnch = %resolved.endpoints.deploy_api,
        submolt = %resolved.endpoints.default_community,
        "Resolved settings"
    );

    let launcher = || -> Result<Launcher<MoltbookClient, ClawnchClient>> {
        let endpoints = &resolved.endpoints;
        let http = endpoints.http_client()?;
        Ok(Launcher::new(
            MoltbookClient::with_client(http.clone(), endpoints),
            ClawnchClient::with_client(http, endpoints),
            endpoints.default_community.clone(),
        ))
    };
    let api_key = resolved.api_key.clone().unwrap_or_default();

    match cli.command {
        Command::Launch {
            name,
            symbol,
            description,
            image,
        } => {
            let request = LaunchRequest {
                name,
                symbol,
                wallet: resolved.wallet.clone().unwrap_or_default(),
                description,
                image,
                community: None,
            };
            let result = launcher()?.launch(&api_key, &request).await;
            Ok(report(&result))
        }
        Command::Retry { post } => {
            let result = launcher()?.retry_launch(&api_key, &post).await;
            Ok(report(&result))
        }
        Command::Tokens { json } => {
            let listing = list_launched_tokens(launcher()?.deployer()).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
                return Ok(if listing.is_ok() {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                });
            }
            let tokens = listing
                .into_result()
                .map_err(anyhow::Error::msg)
                .context("token listing failed")?;
            print!("{}", output::token_table(&tokens));
            Ok(ExitCode::SUCCESS)
        }
        Command::Register { name, description } => {
            let data = launcher()?
                .social()
                .register_agent(&name, &description)
                .await
                .context("registration failed")?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            eprintln!("Save the api_key above: clawnch config --save --api-key <key>");
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            let key = require_key(&resolved)?;
            let data = launcher()?
                .social()
                .claim_status(key)
                .await
                .context("status check failed")?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Profile { name } => {
            let key = require_key(&resolved)?;
            let data = launcher()?
                .social()
                .profile(key, name.as_deref())
                .await
                .context("profile lookup failed")?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { save } => {
            if save {
                file.absorb(&cli.overrides);
                file.save_to(&path)?;
                println!("Saved {}", path.display());
                return Ok(ExitCode::SUCCESS);
            }
            let ep = &resolved.endpoints;
            println!("config file:  {}", path.display());
            println!(
                "api key:      {}",
                if resolved.api_key.is_some() { "set" } else { "not set" }
            );
            println!(
                "wallet:       {}",
                resolved.wallet.as_deref().unwrap_or("not set")
            );
            println!("submolt:      {}", ep.default_community);
            println!("moltbook api: {}", ep.social_api);
            println!("post urls:    {}/<id>", ep.post_url_base);
            println!("clawnch api:  {}", ep.deploy_api);
            println!("timeout:      {}s", ep.timeout.as_secs());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn require_key(resolved: &Resolved) -> Result<&str> {
    resolved
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .context("no API key: pass --api-key, set MOLTBOOK_API_KEY, or save one with `clawnch config --save --api-key <key>`")
}

fn report(result: &LaunchResult) -> ExitCode {
    match result {
        LaunchResult::Launched(d) => {
            print!("{}", output::deployment(d));
            ExitCode::SUCCESS
        }
        LaunchResult::Failed(f) => {
            eprint!("{}", output::failure(f));
            ExitCode::FAILURE
        }
    }
}
