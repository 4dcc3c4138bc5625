//! Row actions offered by a rendering layer

use async_trait::async_trait;
use repodeck_core::domain::repository::RepositoryRecord;

/// What a renderer may ask for on a displayed repository
///
/// The renderer is handed an implementation of this trait instead of
/// callbacks, so the engine never depends on UI event types. Implementations
/// typically collect input and then call into an
/// [`EngineHandle`](crate::EngineHandle).
#[async_trait]
pub trait RepositoryActions: Send + Sync {
    /// The user wants to edit `record`
    async fn on_edit(&self, record: &RepositoryRecord);

    /// The user wants to delete `record`
    async fn on_delete(&self, record: &RepositoryRecord);
}
