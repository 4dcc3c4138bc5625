//! One-shot repository command handlers
//!
//! Each handler drives the sync engine for a single command and prints the
//! settled result.

use anyhow::{Context, Result, anyhow};
use colored::*;
use repodeck_core::domain::repository::{RepositoryKey, RepositoryRecord};
use repodeck_core::dto::repository::NewRepositoryRequest;
use repodeck_sync::EngineHandle;

use crate::prompt::StdinPrompt;
use crate::render::{print_repository_details, print_snapshot};

/// List all repositories
pub async fn list_repositories(engine: &EngineHandle, json: bool) -> Result<()> {
    let snapshot = engine
        .refresh()
        .await
        .context("Failed to load repositories")?;

    if json {
        let out = serde_json::to_string_pretty(snapshot.records())
            .context("Failed to encode repositories")?;
        println!("{}", out);
    } else {
        print_snapshot(&snapshot);
    }

    Ok(())
}

/// Create a new repository
pub async fn create_repository(
    engine: &EngineHandle,
    name: String,
    description: Option<String>,
) -> Result<()> {
    let record = engine
        .create(NewRepositoryRequest::new(name, description))
        .await
        .context("Failed to create repository")?;

    println!("{}", "✓ Repository created successfully!".green().bold());
    print_repository_details(&record);

    Ok(())
}

/// Edit or rename a repository
///
/// Fields not given keep their current values, so the current record is
/// loaded first.
pub async fn edit_repository(
    engine: &EngineHandle,
    key: RepositoryKey,
    name: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let snapshot = engine
        .refresh()
        .await
        .context("Failed to load repositories")?;
    let current = snapshot
        .find(&key)
        .ok_or_else(|| anyhow!("Repository {} not found", key))?;

    let request = edit_request(current, name, description);
    let record = engine
        .update(key.clone(), request)
        .await
        .with_context(|| format!("Failed to update {}", key))?;

    println!("{}", "✓ Repository updated successfully!".green().bold());
    print_repository_details(&record);

    Ok(())
}

/// Delete a repository
pub async fn delete_repository(engine: &EngineHandle, key: RepositoryKey, yes: bool) -> Result<()> {
    if !yes {
        let prompt = StdinPrompt::stdin();
        let question = format!("Delete repository '{}'?", key);
        if !prompt.confirm(&question).await? {
            println!("{}", "Cancelled.".yellow());
            return Ok(());
        }
    }

    engine
        .delete(key.clone())
        .await
        .with_context(|| format!("Failed to delete {}", key))?;

    println!(
        "{}",
        format!("✓ Repository {} deleted successfully!", key)
            .green()
            .bold()
    );

    Ok(())
}

/// Builds an update body, keeping current values for fields not given
pub(crate) fn edit_request(
    current: &RepositoryRecord,
    name: Option<String>,
    description: Option<String>,
) -> NewRepositoryRequest {
    NewRepositoryRequest::new(
        name.unwrap_or_else(|| current.name().to_string()),
        description.or_else(|| current.description().map(str::to_string)),
    )
}
