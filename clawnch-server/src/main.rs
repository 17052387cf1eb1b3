use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // JSON logs in production (CLAWNCH_LOG_JSON=1), human-readable otherwise
    let json_logs = std::env::var("CLAWNCH_LOG_JSON").unwrap_or_default() == "1";
    let filter = EnvFilter::from_default_env()
        .add_directive("clawnch_server=info".parse()?)
        .add_directive("clawnch_sdk=info".parse()?);
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = clawnch_server::config::ServerConfig::parse();
    tracing::info!(
        moltbook = %config.moltbook_api,
        clawnch = %config.clawnch_api,
        submolt = %config.default_submolt,
        "Starting clawnch-server"
    );
    clawnch_server::web::serve(&config).await
}
