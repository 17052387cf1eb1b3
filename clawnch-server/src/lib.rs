//! clawnch-server: HTTP surface over the clawnch launch orchestrator.
//!
//! Exposes fresh launch, retry launch and token listing as JSON endpoints,
//! plus thin Moltbook agent pass-throughs.

pub mod config;
pub mod web;
