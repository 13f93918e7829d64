//! Command-line interface for search-loadtest
//!
//! # Usage Examples
//!
//! ```bash
//! # Everything from server.toml, if present
//! search-loadtest
//!
//! # Explicit config file with command-line overrides
//! search-loadtest --config load.toml --count 50000 --id-type int
//!
//! # Self-signed cluster with basic auth
//! SEARCH_LOADTEST_PASSWORD=secret search-loadtest \
//!   --url https://search:9200 --username admin --validate-cert false
//! ```

use anyhow::Context;
use clap::Parser;
use loadtest_populate_opensearch::HttpSearchClient;
use search_loadtest::logging::{init_tracing, mask_url_credentials};
use search_loadtest::{run_actions, Settings, SettingsArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "search-loadtest")]
#[command(about = "Generate, upload and query test documents against OpenSearch")]
#[command(long_about = None)]
struct Cli {
    /// TOML config file (default: server.toml if present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "loadtest_populate_opensearch=debug"
    #[arg(long)]
    log_level: Option<String>,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_deref());

    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.settings.apply(&mut settings);
    settings.validate()?;

    tracing::info!(
        "Target {} index '{}', action {:?}",
        mask_url_credentials(&settings.url),
        settings.index_name,
        settings.action
    );

    let client = HttpSearchClient::new(settings.client_config())
        .context("Failed to create HTTP client")?;

    let report = run_actions(&settings, client).await;
    report.log_summary();

    tracing::info!("Run completed");
    Ok(())
}
