//! Terminal rendering of repositories and sync events

use colored::*;
use repodeck_core::domain::repository::RepositoryRecord;
use repodeck_sync::{CommandKind, LoadOutcome, Snapshot, SyncEvent};

/// Print the whole snapshot as a numbered list
pub fn print_snapshot(snapshot: &Snapshot) {
    if snapshot.is_empty() {
        let message = match snapshot.outcome() {
            LoadOutcome::NotLoaded => "Repositories not loaded yet.",
            _ => "No repositories found.",
        };
        println!("{}", message.yellow());
        return;
    }

    println!(
        "{}",
        format!("Found {} repositor{}:", snapshot.len(), plural(snapshot.len())).bold()
    );
    println!();
    for (index, record) in snapshot.iter().enumerate() {
        print_repository_summary(index + 1, record);
    }
}

/// Print a repository summary
pub fn print_repository_summary(position: usize, record: &RepositoryRecord) {
    println!(
        "  {} {} {}",
        format!("{:>2}.", position).dimmed(),
        "▸".cyan(),
        record.key().to_string().bold()
    );
    if let Some(desc) = record.description() {
        println!("       {}", desc.dimmed());
    }
    if let Some(language) = record.primary_language() {
        println!("       Language: {}", language.cyan());
    }
    println!();
}

/// Print detailed repository information
pub fn print_repository_details(record: &RepositoryRecord) {
    println!("  ID:          {}", record.id().to_string().cyan());
    println!("  Name:        {}", record.key().to_string().bold());
    if let Some(desc) = record.description() {
        println!("  Description: {}", desc);
    }
    if let Some(language) = record.primary_language() {
        println!("  Language:    {}", language);
    }
    if let Some(avatar) = record.owner_avatar_url() {
        println!("  Avatar:      {}", avatar.dimmed());
    }
}

/// Print a sync event as it arrives in the console
pub fn print_event(event: &SyncEvent) {
    match event {
        SyncEvent::RefreshStarted => println!("{}", "Refreshing...".dimmed()),
        SyncEvent::ListUpdated(snapshot) => print_snapshot(snapshot),
        SyncEvent::ListLoadFailed(error) => {
            println!("{} {}", "✗ Could not load repositories:".red().bold(), error)
        }
        SyncEvent::CommandSucceeded { command } => {
            println!("{}", success_message(command).green().bold())
        }
        SyncEvent::CommandFailed { command, error } => {
            println!("{} {}", failure_message(command).red().bold(), error)
        }
    }
}

pub fn success_message(command: &CommandKind) -> String {
    match command {
        CommandKind::Create { name } => format!("✓ Repository {} created successfully!", name),
        CommandKind::Update { key } => format!("✓ Repository {} updated successfully!", key),
        CommandKind::Delete { key } => format!("✓ Repository {} deleted successfully!", key),
    }
}

pub fn failure_message(command: &CommandKind) -> String {
    match command {
        CommandKind::Create { .. } => "✗ Failed to create repository:".to_string(),
        CommandKind::Update { key } => format!("✗ Failed to update {}:", key),
        CommandKind::Delete { key } => format!("✗ Failed to delete {}:", key),
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "y" } else { "ies" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repodeck_core::domain::repository::RepositoryKey;

    #[test]
    fn test_messages() {
        let key = RepositoryKey::new("a", "r1");
        assert_eq!(
            success_message(&CommandKind::Delete { key: key.clone() }),
            "✓ Repository a/r1 deleted successfully!"
        );
        assert_eq!(
            failure_message(&CommandKind::Update { key }),
            "✗ Failed to update a/r1:"
        );
        assert_eq!(
            failure_message(&CommandKind::Create {
                name: "x".to_string()
            }),
            "✗ Failed to create repository:"
        );
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1), "y");
        assert_eq!(plural(2), "ies");
    }
}
