//! Repository list store
//!
//! Holds the current ordered collection of repositories and the outcome of
//! the last load. The collection is only ever swapped as a whole, so a
//! reader holding a [`Snapshot`] always sees one complete server response.

use std::collections::HashSet;
use std::sync::Arc;

use repodeck_core::domain::repository::{RepositoryKey, RepositoryRecord};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::error::SyncError;
use crate::event::SyncEvent;

/// Result of the most recent list load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing has been loaded yet
    NotLoaded,
    /// The last load returned this many repositories
    Loaded(usize),
    /// The last load succeeded with no repositories
    Empty,
    /// The last load failed; the collection is from an earlier load
    Failed(SyncError),
}

/// Read-only view of the store at one point in time
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Arc<[RepositoryRecord]>,
    outcome: LoadOutcome,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            outcome: LoadOutcome::NotLoaded,
        }
    }

    pub fn records(&self) -> &[RepositoryRecord] {
        &self.records
    }

    pub fn outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RepositoryRecord> {
        self.records.iter()
    }

    /// Looks up a repository by its `(owner, name)` key
    pub fn find(&self, key: &RepositoryKey) -> Option<&RepositoryRecord> {
        self.records
            .iter()
            .find(|r| r.owner() == key.owner && r.name() == key.name)
    }

    /// Whether both snapshots share the same collection allocation
    pub fn same_collection(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

/// Owner of the current repository collection
///
/// The store never fails: load errors are recorded as data so observers
/// can show them without losing the list.
pub struct RepositoryListStore {
    current: watch::Sender<Snapshot>,
    events: broadcast::Sender<SyncEvent>,
}

impl RepositoryListStore {
    /// Creates an empty store whose event channel buffers `capacity` events
    /// per subscriber
    pub fn new(capacity: usize) -> Self {
        let (current, _) = watch::channel(Snapshot::empty());
        let (events, _) = broadcast::channel(capacity.max(1));
        Self { current, events }
    }

    /// Swaps in a freshly loaded collection and notifies observers once
    ///
    /// Records repeating an earlier `(owner, name)` pair are dropped so a
    /// snapshot never holds two entries for the same repository.
    pub fn replace_all(&self, records: Vec<RepositoryRecord>) {
        let mut seen = HashSet::with_capacity(records.len());
        let records: Vec<RepositoryRecord> = records
            .into_iter()
            .filter(|record| {
                let fresh = seen.insert(record.key());
                if !fresh {
                    warn!("Dropping duplicate repository {} from list", record.key());
                }
                fresh
            })
            .collect();

        let outcome = if records.is_empty() {
            LoadOutcome::Empty
        } else {
            LoadOutcome::Loaded(records.len())
        };

        let snapshot = Snapshot {
            records: Arc::from(records),
            outcome,
        };
        debug!("Store replaced with {} repositories", snapshot.len());

        self.current.send_replace(snapshot.clone());
        self.publish(SyncEvent::ListUpdated(snapshot));
    }

    /// Records a failed load without touching the collection
    pub fn set_last_error(&self, reason: SyncError) {
        self.current
            .send_modify(|snapshot| snapshot.outcome = LoadOutcome::Failed(reason.clone()));
        self.publish(SyncEvent::ListLoadFailed(reason));
    }

    /// The collection as it stands now
    pub fn current_snapshot(&self) -> Snapshot {
        self.current.borrow().clone()
    }

    /// Subscribes to change notifications
    ///
    /// Dropping the receiver stops observation; the store does not care
    /// whether anyone is listening.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Receiver that always holds the latest snapshot
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.current.subscribe()
    }

    pub(crate) fn publish(&self, event: SyncEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}
