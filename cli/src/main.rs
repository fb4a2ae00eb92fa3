mod argparse;
mod commands;

use anyhow::Result;
use argparse::{Cli, Commands};
use clap::Parser;
use photo_search::SearchConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if it exists
    dotenv::dotenv().ok();

    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = SearchConfig::from_env();
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    tracing::debug!(
        database_url = %config.database_url,
        query_timeout_ms = config.query_timeout.as_millis() as u64,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Search(args) => commands::search_command(&config, args).await,
        Commands::Explain(args) => commands::explain_command(args),
        Commands::SeedDemo => commands::seed_demo_command(&config).await,
        Commands::Album(args) => commands::album_command(&config, args).await,
    }
}
