//! Repository API contract
//!
//! The sync engine only depends on this trait, so it can be driven by the
//! HTTP client in production and by scripted fakes in tests.

use async_trait::async_trait;
use repodeck_core::domain::repository::{RepositoryKey, RepositoryRecord};
use repodeck_core::dto::repository::{ListQuery, NewRepositoryRequest};

use crate::error::Result;

/// Remote repository operations
///
/// Every method is a single request/response exchange. Implementations must
/// not retry on their own; the caller decides what to do with a failure.
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    /// Lists the authenticated user's repositories in server order
    async fn list(&self, query: ListQuery) -> Result<Vec<RepositoryRecord>>;

    /// Creates a repository and returns the server's view of it
    async fn create(&self, request: &NewRepositoryRequest) -> Result<RepositoryRecord>;

    /// Updates the repository currently addressed by `key`
    ///
    /// A rename is expressed by putting the new name in `request`; the
    /// returned record carries it.
    async fn update(
        &self,
        key: &RepositoryKey,
        request: &NewRepositoryRequest,
    ) -> Result<RepositoryRecord>;

    /// Deletes the repository addressed by `key`
    async fn delete(&self, key: &RepositoryKey) -> Result<()>;
}
