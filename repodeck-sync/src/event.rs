//! Notifications sent from the engine to observers

use std::fmt;

use repodeck_core::domain::repository::RepositoryKey;

use crate::error::SyncError;
use crate::store::Snapshot;

/// Mutation a command notification refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Create { name: String },
    Update { key: RepositoryKey },
    Delete { key: RepositoryKey },
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Create { name } => write!(f, "create {}", name),
            CommandKind::Update { key } => write!(f, "update {}", key),
            CommandKind::Delete { key } => write!(f, "delete {}", key),
        }
    }
}

/// Change notification delivered to subscribers
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A list request was sent
    RefreshStarted,

    /// The collection was replaced; carries the full new snapshot
    ListUpdated(Snapshot),

    /// A list request failed; the previous collection is still in place
    ListLoadFailed(SyncError),

    /// The server confirmed a mutation; a refresh follows
    CommandSucceeded { command: CommandKind },

    /// A mutation was rejected locally or by the server
    CommandFailed {
        command: CommandKind,
        error: SyncError,
    },
}
