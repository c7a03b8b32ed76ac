//! rpzgate - Entry point.
//!
//! Loads the configuration named by `CONFIG_PATH` (default `rpzgate.toml`),
//! then performs a single import. Any failure exits with a non-zero status.

use std::borrow::Cow;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use rpzgate::config::Config;

fn init_logging() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();

    let config_path = std::env::var("CONFIG_PATH")
        .map(Cow::Owned)
        .unwrap_or(Cow::Borrowed("rpzgate.toml"));
    let config = Config::load(config_path.as_ref())
        .with_context(|| format!("Failed to load configuration from {config_path}"))?;

    rpzgate::import::run(&config)
        .await
        .with_context(|| format!("Failed to import {}", config.url))?;

    Ok(())
}
