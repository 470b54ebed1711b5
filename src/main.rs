//! quickdeploy: deploy-and-verify helper for hosted serverless functions.
//!
//! This is the application entry point. It initializes tracing, loads the
//! deployment configuration from a TOML file, resolves the bearer credential
//! from the environment, reads the function source, and runs the deploy loop.
//! When every candidate endpoint rejects the upload, it probes the currently
//! live function and prints version/feature diagnostics instead.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quickdeploy::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use quickdeploy::{deploy, health, Deployer};

/// quickdeploy: upload a serverless function and verify the deployment
#[derive(Parser, Debug)]
#[command(name = "quickdeploy", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "quickdeploy=debug")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load(&args.config)?;
    tracing::info!(
        slug = %config.deploy.slug,
        candidates = config.deploy.endpoints.len(),
        "Loaded configuration"
    );

    // Credential and artifact are both required before any HTTP is attempted
    let token = deploy::resolve_token(&config.deploy.token_env)?;
    let body = deploy::load_artifact(&config.deploy.artifact)?;
    tracing::info!(
        artifact = %config.deploy.artifact,
        bytes = body.len(),
        "Read function source"
    );

    let deployer = Deployer::new(&config.deploy, token, body)?;
    let success = deployer.run().await;

    if !success {
        println!("❌ All deployment attempts failed");
        // The upload could not be confirmed; at least report what is live now
        health::report_current(&config.health.url).await;
    }

    Ok(())
}
