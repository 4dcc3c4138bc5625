//! Interactive console
//!
//! Keeps the repository list on screen and re-renders it from engine events.
//! Row commands (`edit N`, `delete N`) go through [`RepositoryActions`], the
//! same seam any other front end would use.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use repodeck_core::domain::repository::RepositoryRecord;
use repodeck_core::dto::repository::NewRepositoryRequest;
use repodeck_sync::{EngineHandle, RepositoryActions, Snapshot, SyncEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::repo::edit_request;
use crate::prompt::StdinPrompt;
use crate::render::{print_event, print_snapshot};

/// Run the console until `quit` or end of input
pub async fn run_console(engine: &EngineHandle) -> Result<()> {
    let prompt = Arc::new(StdinPrompt::stdin());
    let actions = ConsoleActions {
        engine: engine.clone(),
        prompt: prompt.clone(),
    };
    let mut events = engine.subscribe();
    let mut view = ListView::new(engine.snapshot());

    print_help();
    refresh_in_background(engine);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if let SyncEvent::ListUpdated(snapshot) = &event {
                        view.show(snapshot.clone());
                    }
                    print_event(&event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "console fell behind on sync events");
                    view.show(engine.snapshot());
                    print_snapshot(view.snapshot());
                }
                Err(RecvError::Closed) => break,
            },
            line = prompt.next_line() => {
                let Some(line) = line? else { break };
                match ConsoleCommand::parse(&line) {
                    ConsoleCommand::Empty => {}
                    ConsoleCommand::List => print_snapshot(view.snapshot()),
                    ConsoleCommand::Refresh => refresh_in_background(engine),
                    ConsoleCommand::New => {
                        if let Err(e) = actions.create().await {
                            println!("{} {:#}", "✗".red().bold(), e);
                        }
                    }
                    ConsoleCommand::Edit(position) => match view.select(position) {
                        Some(record) => actions.on_edit(record).await,
                        None => print_no_such_row(position),
                    },
                    ConsoleCommand::Delete(position) => match view.select(position) {
                        Some(record) => actions.on_delete(record).await,
                        None => print_no_such_row(position),
                    },
                    ConsoleCommand::Help => print_help(),
                    ConsoleCommand::Quit => break,
                    ConsoleCommand::Unknown(input) => {
                        println!("{} {}", "Unknown command:".yellow(), input);
                        println!("Type 'help' for the list of commands.");
                    }
                }
            }
        }
    }

    Ok(())
}

/// Outcomes arrive as events, so the reply itself is only logged
fn refresh_in_background(engine: &EngineHandle) {
    let engine = engine.clone();
    tokio::spawn(async move {
        if let Err(e) = engine.refresh().await {
            debug!("console refresh finished with error: {}", e);
        }
    });
}

fn print_no_such_row(position: usize) {
    println!("{}", format!("No repository #{}", position).yellow());
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  list        Show the repository list");
    println!("  refresh     Reload the list from the server");
    println!("  new         Create a repository");
    println!("  edit N      Edit or rename repository N");
    println!("  delete N    Delete repository N");
    println!("  help        Show this help");
    println!("  quit        Leave the console");
    println!();
}

/// The list as last rendered; row numbers refer to it
struct ListView {
    snapshot: Snapshot,
}

impl ListView {
    fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    fn show(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
    }

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// 1-based row lookup
    fn select(&self, position: usize) -> Option<&RepositoryRecord> {
        position
            .checked_sub(1)
            .and_then(|index| self.snapshot.records().get(index))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ConsoleCommand {
    Empty,
    List,
    Refresh,
    New,
    Edit(usize),
    Delete(usize),
    Help,
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Self::Empty;
        };
        let argument = words.next();
        let trailing = words.next().is_some();

        let position = || argument.and_then(|a| a.parse::<usize>().ok());
        let command = match (verb.to_ascii_lowercase().as_str(), argument) {
            ("list" | "ls", None) => Some(Self::List),
            ("refresh" | "r", None) => Some(Self::Refresh),
            ("new" | "create", None) => Some(Self::New),
            ("edit" | "e", Some(_)) => position().map(Self::Edit),
            ("delete" | "rm", Some(_)) => position().map(Self::Delete),
            ("help" | "?", None) => Some(Self::Help),
            ("quit" | "exit" | "q", None) => Some(Self::Quit),
            _ => None,
        };

        match command {
            Some(command) if !trailing => command,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Prompts for input on stdin and sends the result to the engine
///
/// Command outcomes are rendered from engine events, not from the replies.
struct ConsoleActions {
    engine: EngineHandle,
    prompt: Arc<StdinPrompt>,
}

impl ConsoleActions {
    async fn create(&self) -> Result<()> {
        let name = self.prompt.ask("Name:").await?.unwrap_or_default();
        let description = self.prompt.ask("Description (optional):").await?;
        let request = NewRepositoryRequest::new(name, description.filter(|d| !d.is_empty()));

        if let Err(e) = self.engine.create(request).await {
            debug!("create finished with error: {}", e);
        }
        Ok(())
    }

    async fn edit(&self, record: &RepositoryRecord) -> Result<()> {
        println!(
            "Editing {} (blank keeps the current value, '-' clears the description)",
            record.key().to_string().bold()
        );
        let name = self
            .prompt
            .ask(&format!("Name [{}]:", record.name()))
            .await?
            .filter(|n| !n.is_empty());
        let description = self
            .prompt
            .ask(&format!("Description [{}]:", record.description().unwrap_or("")))
            .await?
            .and_then(description_answer);

        let request = edit_request(record, name, description);
        if let Err(e) = self.engine.update(record.key(), request).await {
            debug!("update finished with error: {}", e);
        }
        Ok(())
    }

    async fn delete(&self, record: &RepositoryRecord) -> Result<()> {
        let key = record.key();
        if !self
            .prompt
            .confirm(&format!("Delete repository '{}'?", key))
            .await?
        {
            println!("{}", "Cancelled.".yellow());
            return Ok(());
        }

        if let Err(e) = self.engine.delete(key).await {
            debug!("delete finished with error: {}", e);
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryActions for ConsoleActions {
    async fn on_edit(&self, record: &RepositoryRecord) {
        if let Err(e) = self.edit(record).await {
            println!("{} {:#}", "✗".red().bold(), e);
        }
    }

    async fn on_delete(&self, record: &RepositoryRecord) {
        if let Err(e) = self.delete(record).await {
            println!("{} {:#}", "✗".red().bold(), e);
        }
    }
}

/// Blank keeps the current description, `-` clears it
fn description_answer(answer: String) -> Option<String> {
    match answer.as_str() {
        "" => None,
        "-" => Some(String::new()),
        _ => Some(answer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleCommand::parse(""), ConsoleCommand::Empty);
        assert_eq!(ConsoleCommand::parse("list"), ConsoleCommand::List);
        assert_eq!(ConsoleCommand::parse("REFRESH"), ConsoleCommand::Refresh);
        assert_eq!(ConsoleCommand::parse("new"), ConsoleCommand::New);
        assert_eq!(ConsoleCommand::parse("edit 2"), ConsoleCommand::Edit(2));
        assert_eq!(ConsoleCommand::parse("rm 1"), ConsoleCommand::Delete(1));
        assert_eq!(ConsoleCommand::parse("q"), ConsoleCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        for input in ["edit", "edit two", "delete 1 2", "list all", "push"] {
            assert_eq!(
                ConsoleCommand::parse(input),
                ConsoleCommand::Unknown(input.to_string()),
                "{input}"
            );
        }
    }

    #[test]
    fn test_description_answer() {
        assert_eq!(description_answer(String::new()), None);
        assert_eq!(description_answer("-".to_string()), Some(String::new()));
        assert_eq!(description_answer("d2".to_string()), Some("d2".to_string()));
    }
}
