//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod console;
mod repo;

use anyhow::Result;
use clap::Subcommand;
use repodeck_core::domain::repository::RepositoryKey;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List your repositories
    List {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new repository
    Create {
        /// Repository name
        #[arg(short, long)]
        name: String,

        /// Repository description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Edit or rename a repository
    Edit {
        /// Repository to edit, as OWNER/NAME
        repo: RepositoryKey,

        /// New name (defaults to the current one)
        #[arg(short, long)]
        name: Option<String>,

        /// New description (defaults to the current one)
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a repository
    Delete {
        /// Repository to delete, as OWNER/NAME
        repo: RepositoryKey,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Interactive console that keeps the list on screen
    Console,
}

/// Handle a CLI command
///
/// Starts a sync engine for the configured API and routes the command to
/// its handler.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let engine = config.start_engine();

    let result = match command {
        Commands::List { json } => repo::list_repositories(&engine, json).await,
        Commands::Create { name, description } => {
            repo::create_repository(&engine, name, description).await
        }
        Commands::Edit {
            repo,
            name,
            description,
        } => repo::edit_repository(&engine, repo, name, description).await,
        Commands::Delete { repo, yes } => repo::delete_repository(&engine, repo, yes).await,
        Commands::Console => console::run_console(&engine).await,
    };

    engine.shutdown().await;
    result
}
