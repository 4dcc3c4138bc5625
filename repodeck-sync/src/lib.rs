//! Repodeck Sync
//!
//! Keeps an in-memory list of the user's repositories in step with the
//! hosting service.
//!
//! - [`RepositoryListStore`] holds the current snapshot and broadcasts changes.
//! - [`RepositorySyncEngine`] runs the list/create/update/delete commands,
//!   refreshing the whole list after every confirmed mutation.
//! - [`EngineHandle`] is what UIs hold: command methods, the latest
//!   snapshot, and a [`SyncEvent`] subscription.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use repodeck_client::GitHubClient;
//! use repodeck_sync::{EngineConfig, RepositorySyncEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api = Arc::new(GitHubClient::new("https://api.github.com").with_token("ghp_example"));
//!     let engine = RepositorySyncEngine::spawn(api, EngineConfig::default());
//!
//!     let snapshot = engine.refresh().await?;
//!     println!("{} repositories", snapshot.len());
//!     Ok(())
//! }
//! ```

mod actions;
pub mod engine;
pub mod error;
mod event;
pub mod store;

pub use actions::RepositoryActions;
pub use engine::{EngineConfig, EngineHandle, RefreshPhase, RepositorySyncEngine};
pub use error::{HttpStatusKind, Result, SyncError};
pub use event::{CommandKind, SyncEvent};
pub use store::{LoadOutcome, RepositoryListStore, Snapshot};
