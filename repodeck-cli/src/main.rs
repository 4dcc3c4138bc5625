//! Repodeck CLI
//!
//! Command-line console for listing, creating, editing and deleting the
//! repositories of the authenticated user.

mod commands;
mod config;
mod prompt;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use repodeck_core::dto::repository::{ListQuery, SortDirection, SortKey};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "repodeck")]
#[command(about = "Manage your hosted repositories", long_about = None)]
struct Cli {
    /// API base URL
    #[arg(long, env = "REPODECK_API_URL", default_value = "https://api.github.com")]
    api_url: String,

    /// Access token sent as a bearer token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Field to sort the list by (created, updated, pushed, full_name)
    #[arg(long, default_value = "created")]
    sort: SortKey,

    /// Sort direction (asc, desc)
    #[arg(long, default_value = "desc")]
    direction: SortDirection,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        token: cli.token,
        list_query: ListQuery::new(cli.sort, cli.direction),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
