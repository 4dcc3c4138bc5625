//! Repository sync engine
//!
//! The engine is a single task that owns the [`RepositoryListStore`]. Callers
//! talk to it through an [`EngineHandle`]; network requests run in their own
//! tasks and report back to the engine over a channel, so every state change
//! and every notification happens on the engine task, one at a time.
//!
//! Policy:
//! - Every confirmed mutation is followed by a full list refresh. The store
//!   is never patched locally.
//! - Only one list request is in flight at a time. A plain refresh asked for
//!   while one is in flight joins it. A refresh that follows a mutation
//!   queues one follow-up list instead, since the in-flight one may have
//!   been answered before the mutation landed. Any number of follow-up
//!   requests share that single extra call.

use std::mem;
use std::sync::Arc;

use repodeck_client::{ClientError, RepositoryApi};
use repodeck_core::domain::repository::{RepositoryKey, RepositoryRecord};
use repodeck_core::dto::repository::{ListQuery, NewRepositoryRequest};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::error::{Result, SyncError};
use crate::event::{CommandKind, SyncEvent};
use crate::store::{RepositoryListStore, Snapshot};

/// Engine tuning
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Sort parameters passed to every list request
    pub list_query: ListQuery,

    /// Events buffered per subscriber before the slowest one starts lagging
    pub event_capacity: usize,

    /// Commands that can be queued before callers wait
    pub command_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            list_query: ListQuery::default(),
            event_capacity: 64,
            command_capacity: 32,
        }
    }
}

/// Whether a list request is currently on the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    InFlight,
}

/// A list-affecting mutation
#[derive(Debug, Clone)]
enum Mutation {
    Create(NewRepositoryRequest),
    Update(RepositoryKey, NewRepositoryRequest),
    Delete(RepositoryKey),
}

impl Mutation {
    fn command(&self) -> CommandKind {
        match self {
            Mutation::Create(request) => CommandKind::Create {
                name: request.name.clone(),
            },
            Mutation::Update(key, _) => CommandKind::Update { key: key.clone() },
            Mutation::Delete(key) => CommandKind::Delete { key: key.clone() },
        }
    }

    /// Local checks done before anything is sent
    fn validate(&self) -> Result<()> {
        match self {
            Mutation::Create(request) => request.validate()?,
            Mutation::Update(key, request) => {
                request.validate()?;
                validate_key(key)?;
            }
            Mutation::Delete(key) => validate_key(key)?,
        }
        Ok(())
    }

    async fn send(
        self,
        api: &dyn RepositoryApi,
    ) -> std::result::Result<Option<RepositoryRecord>, ClientError> {
        match self {
            Mutation::Create(request) => api.create(&request).await.map(Some),
            Mutation::Update(key, request) => api.update(&key, &request).await.map(Some),
            Mutation::Delete(key) => api.delete(&key).await.map(|_| None),
        }
    }
}

fn validate_key(key: &RepositoryKey) -> Result<()> {
    if key.owner.is_empty() || key.name.is_empty() {
        return Err(SyncError::Validation(format!(
            "invalid repository address `{}`",
            key
        )));
    }
    Ok(())
}

type MutationReply = oneshot::Sender<Result<Option<RepositoryRecord>>>;

enum Request {
    Refresh {
        reply: oneshot::Sender<Result<Snapshot>>,
    },
    Mutate {
        mutation: Mutation,
        reply: MutationReply,
    },
    Shutdown,
}

enum Completion {
    Listed(std::result::Result<Vec<RepositoryRecord>, ClientError>),
    Mutated {
        command: CommandKind,
        result: std::result::Result<Option<RepositoryRecord>, ClientError>,
        reply: MutationReply,
    },
}

/// Someone waiting for a list request to resolve
enum Waiter {
    Refresh(oneshot::Sender<Result<Snapshot>>),
    /// A confirmed mutation, answered once its trailing refresh settles
    Mutation(MutationReply, Option<RepositoryRecord>),
}

impl Waiter {
    fn settle(self, refreshed: &Result<Snapshot>) {
        // A caller that stopped waiting is not an error.
        match self {
            Waiter::Refresh(reply) => {
                let _ = reply.send(refreshed.clone());
            }
            Waiter::Mutation(reply, record) => {
                let _ = reply.send(Ok(record));
            }
        }
    }
}

/// The single task that owns the repository list
pub struct RepositorySyncEngine {
    api: Arc<dyn RepositoryApi>,
    store: Arc<RepositoryListStore>,
    list_query: ListQuery,
    requests: mpsc::Receiver<Request>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    phase: watch::Sender<RefreshPhase>,
    /// Waiting on the list request currently in flight
    current: Vec<Waiter>,
    /// Waiting on the list request that will follow the current one
    follow_up: Option<Vec<Waiter>>,
}

impl RepositorySyncEngine {
    /// Creates an engine and the handle used to drive it
    ///
    /// The engine does nothing until [`run`](Self::run) is awaited.
    pub fn new(api: Arc<dyn RepositoryApi>, config: EngineConfig) -> (Self, EngineHandle) {
        let store = Arc::new(RepositoryListStore::new(config.event_capacity));
        let (requests_tx, requests) = mpsc::channel(config.command_capacity.max(1));
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (phase, phase_rx) = watch::channel(RefreshPhase::Idle);

        let engine = Self {
            api,
            store: Arc::clone(&store),
            list_query: config.list_query,
            requests,
            completions_tx,
            completions,
            phase,
            current: Vec::new(),
            follow_up: None,
        };

        let handle = EngineHandle {
            requests: requests_tx,
            store,
            phase: phase_rx,
        };

        (engine, handle)
    }

    /// Creates an engine and runs it on a new tokio task
    pub fn spawn(api: Arc<dyn RepositoryApi>, config: EngineConfig) -> EngineHandle {
        let (engine, handle) = Self::new(api, config);
        tokio::spawn(engine.run());
        handle
    }

    /// Processes commands and completions until shut down
    ///
    /// Returns when [`EngineHandle::shutdown`] is called or every handle has
    /// been dropped. Requests still on the network are left to finish; their
    /// results are discarded.
    pub async fn run(mut self) {
        info!("Sync engine started");

        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(Request::Shutdown) | None => break,
                    Some(request) => self.handle_request(request),
                },
                Some(completion) = self.completions.recv() => self.handle_completion(completion),
            }
        }

        if !self.current.is_empty() || self.follow_up.is_some() {
            debug!("Sync engine stopping with a refresh still in flight");
        }
        info!("Sync engine stopped");
    }

    fn handle_request(&mut self, request: Request) {
        match request {
            Request::Refresh { reply } => self.request_refresh(Waiter::Refresh(reply), false),
            Request::Mutate { mutation, reply } => self.start_mutation(mutation, reply),
            Request::Shutdown => {}
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Listed(result) => self.finish_refresh(result),
            Completion::Mutated {
                command,
                result,
                reply,
            } => self.finish_mutation(command, result, reply),
        }
    }

    // =============================================================================
    // Refresh
    // =============================================================================

    fn is_refreshing(&self) -> bool {
        *self.phase.borrow() == RefreshPhase::InFlight
    }

    /// Attaches `waiter` to a list request, sending one only if none is in flight
    fn request_refresh(&mut self, waiter: Waiter, after_mutation: bool) {
        if !self.is_refreshing() {
            self.current.push(waiter);
            self.start_list();
            return;
        }

        match (&mut self.follow_up, after_mutation) {
            (Some(queued), _) => queued.push(waiter),
            (None, true) => {
                debug!("List in flight; queueing one follow-up refresh");
                self.follow_up = Some(vec![waiter]);
            }
            (None, false) => {
                debug!("List in flight; joining it");
                self.current.push(waiter);
            }
        }
    }

    fn start_list(&mut self) {
        self.phase.send_replace(RefreshPhase::InFlight);
        self.store.publish(SyncEvent::RefreshStarted);

        let api = Arc::clone(&self.api);
        let query = self.list_query;
        let completions = self.completions_tx.clone();

        debug!("Sending list request");
        tokio::spawn(async move {
            let result = api.list(query).await;
            // The engine may be gone by now; late results are dropped.
            let _ = completions.send(Completion::Listed(result));
        });
    }

    fn finish_refresh(&mut self, result: std::result::Result<Vec<RepositoryRecord>, ClientError>) {
        self.phase.send_replace(RefreshPhase::Idle);

        let refreshed = match result {
            Ok(records) => {
                info!("Loaded {} repositories", records.len());
                self.store.replace_all(records);
                Ok(self.store.current_snapshot())
            }
            Err(err) => {
                let err = SyncError::from(err);
                warn!("Failed to load repositories: {}", err);
                self.store.set_last_error(err.clone());
                Err(err)
            }
        };

        for waiter in mem::take(&mut self.current) {
            waiter.settle(&refreshed);
        }

        if let Some(waiters) = self.follow_up.take() {
            self.current = waiters;
            self.start_list();
        }
    }

    // =============================================================================
    // Mutations
    // =============================================================================

    fn start_mutation(&mut self, mutation: Mutation, reply: MutationReply) {
        let command = mutation.command();

        if let Err(err) = mutation.validate() {
            warn!("Rejected {}: {}", command, err);
            self.store.publish(SyncEvent::CommandFailed {
                command,
                error: err.clone(),
            });
            let _ = reply.send(Err(err));
            return;
        }

        let api = Arc::clone(&self.api);
        let completions = self.completions_tx.clone();

        debug!("Sending {}", command);
        tokio::spawn(async move {
            let result = mutation.send(api.as_ref()).await;
            let _ = completions.send(Completion::Mutated {
                command,
                result,
                reply,
            });
        });
    }

    fn finish_mutation(
        &mut self,
        command: CommandKind,
        result: std::result::Result<Option<RepositoryRecord>, ClientError>,
        reply: MutationReply,
    ) {
        match result {
            Ok(record) => {
                info!("Server confirmed {}", command);
                self.store.publish(SyncEvent::CommandSucceeded { command });
                self.request_refresh(Waiter::Mutation(reply, record), true);
            }
            Err(err) => {
                let err = SyncError::from(err);
                warn!("Failed to {}: {}", command, err);
                self.store.publish(SyncEvent::CommandFailed {
                    command,
                    error: err.clone(),
                });
                let _ = reply.send(Err(err));
            }
        }
    }
}

/// Cloneable handle for issuing commands and observing the list
#[derive(Clone)]
pub struct EngineHandle {
    requests: mpsc::Sender<Request>,
    store: Arc<RepositoryListStore>,
    phase: watch::Receiver<RefreshPhase>,
}

impl EngineHandle {
    /// Reloads the list from the server
    ///
    /// Resolves with the snapshot produced by the list request this call
    /// was attached to.
    pub async fn refresh(&self) -> Result<Snapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Refresh { reply }).await?;
        rx.await.map_err(|_| SyncError::EngineStopped)?
    }

    /// Creates a repository
    ///
    /// Resolves once the trailing refresh has settled, with the record the
    /// server returned.
    pub async fn create(&self, request: NewRepositoryRequest) -> Result<RepositoryRecord> {
        self.mutate(Mutation::Create(request))
            .await?
            .ok_or_else(|| SyncError::Decode("no repository in create response".to_string()))
    }

    /// Updates (and possibly renames) the repository currently at `key`
    pub async fn update(
        &self,
        key: RepositoryKey,
        request: NewRepositoryRequest,
    ) -> Result<RepositoryRecord> {
        self.mutate(Mutation::Update(key, request))
            .await?
            .ok_or_else(|| SyncError::Decode("no repository in update response".to_string()))
    }

    /// Deletes the repository at `key`
    pub async fn delete(&self, key: RepositoryKey) -> Result<()> {
        self.mutate(Mutation::Delete(key)).await.map(|_| ())
    }

    /// The store's collection as it stands now
    pub fn snapshot(&self) -> Snapshot {
        self.store.current_snapshot()
    }

    /// Subscribes to change notifications; drop the receiver to stop observing
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.store.subscribe()
    }

    /// Receiver that always holds the latest snapshot
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.store.watch()
    }

    /// Whether a list request is on the network right now
    pub fn refresh_phase(&self) -> RefreshPhase {
        *self.phase.borrow()
    }

    /// Stops the engine; outstanding callers receive [`SyncError::EngineStopped`]
    pub async fn shutdown(&self) {
        let _ = self.requests.send(Request::Shutdown).await;
    }

    async fn mutate(&self, mutation: Mutation) -> Result<Option<RepositoryRecord>> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Mutate { mutation, reply }).await?;
        rx.await.map_err(|_| SyncError::EngineStopped)?
    }

    async fn send(&self, request: Request) -> Result<()> {
        self.requests
            .send(request)
            .await
            .map_err(|_| SyncError::EngineStopped)
    }
}
