//! Plain-text rendering of launch results and token listings.

use std::fmt::Write;

use clawnch_sdk::{Deployment, LaunchFailure, LaunchedTokenRecord};

/// The command that retries a deployment against an existing post.
pub fn retry_command(post_id: &str) -> String {
    format!("clawnch retry --post {post_id}")
}

pub fn deployment(d: &Deployment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Token launched for {}", display_or(&d.agent, "agent"));
    let _ = writeln!(out, "  address:  {}", d.token_address);
    if !d.tx_hash.is_empty() {
        let _ = writeln!(out, "  tx:       {}", d.tx_hash);
    }
    if !d.deployment_url.is_empty() {
        let _ = writeln!(out, "  clanker:  {}", d.deployment_url);
    }
    if !d.explorer_url.is_empty() {
        let _ = writeln!(out, "  explorer: {}", d.explorer_url);
    }
    if let Some(r) = &d.rewards {
        let _ = writeln!(
            out,
            "  rewards:  {} to {} / {} to platform",
            r.agent_share,
            display_or(&r.agent_wallet, "agent"),
            r.platform_share
        );
    }
    out
}

pub fn failure(f: &LaunchFailure) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Launch failed during {}: {}", f.phase, f.reason);
    for d in &f.diagnostics {
        if *d != f.reason {
            let _ = writeln!(out, "  - {d}");
        }
    }
    if let Some(anchor) = &f.anchor {
        let _ = writeln!(out, "Launch post: {}", anchor.url);
    }
    if let (true, Some(anchor)) = (f.retryable(), &f.anchor) {
        let _ = writeln!(out, "The post is live. Retry without posting again:");
        let _ = writeln!(out, "  {}", retry_command(&anchor.id));
    }
    out
}

pub fn token_table(tokens: &[LaunchedTokenRecord]) -> String {
    if tokens.is_empty() {
        return "No tokens launched yet\n".to_string();
    }
    let sym_w = tokens.iter().map(|t| t.symbol.len()).max().unwrap_or(0).max(6);
    let name_w = tokens.iter().map(|t| t.name.chars().count()).max().unwrap_or(0).max(4);
    let mut out = String::new();
    let _ = writeln!(out, "{:sym_w$}  {:name_w$}  {:42}  LAUNCHED", "SYMBOL", "NAME", "ADDRESS");
    for t in tokens {
        let launched = t
            .launched_at_utc()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| t.launched_at.clone());
        let _ = writeln!(
            out,
            "{:sym_w$}  {:name_w$}  {:42}  {launched}",
            t.symbol, t.name, t.token_address
        );
    }
    out
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}
