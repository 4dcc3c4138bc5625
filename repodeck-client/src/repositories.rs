//! Repository endpoints

use async_trait::async_trait;
use reqwest::Method;
use repodeck_core::domain::repository::{RepositoryKey, RepositoryRecord};
use repodeck_core::dto::repository::{ListQuery, NewRepositoryRequest, RepositoryPayload};
use tracing::debug;

use crate::GitHubClient;
use crate::api::RepositoryApi;
use crate::error::Result;

#[async_trait]
impl RepositoryApi for GitHubClient {
    // =============================================================================
    // Repository Management
    // =============================================================================

    /// `GET /user/repos?sort=&direction=`
    async fn list(&self, query: ListQuery) -> Result<Vec<RepositoryRecord>> {
        let url = self.endpoint(&["user", "repos"])?;
        debug!(%url, sort = %query.sort, direction = %query.direction, "listing repositories");

        let response = self
            .request(Method::GET, url)
            .query(&query.as_pairs()[..])
            .send()
            .await?;

        let payloads: Vec<RepositoryPayload> = self.handle_response(response).await?;
        Ok(payloads.into_iter().map(RepositoryRecord::from).collect())
    }

    /// `POST /user/repos`
    async fn create(&self, request: &NewRepositoryRequest) -> Result<RepositoryRecord> {
        let url = self.endpoint(&["user", "repos"])?;
        debug!(%url, name = %request.name, "creating repository");

        let response = self.request(Method::POST, url).json(request).send().await?;

        let payload: RepositoryPayload = self.handle_response(response).await?;
        Ok(payload.into())
    }

    /// `PATCH /repos/{owner}/{repo}`
    async fn update(
        &self,
        key: &RepositoryKey,
        request: &NewRepositoryRequest,
    ) -> Result<RepositoryRecord> {
        let url = self.endpoint(&["repos", key.owner.as_str(), key.name.as_str()])?;
        debug!(%url, new_name = %request.name, "updating repository");

        let response = self
            .request(Method::PATCH, url)
            .json(request)
            .send()
            .await?;

        let payload: RepositoryPayload = self.handle_response(response).await?;
        Ok(payload.into())
    }

    /// `DELETE /repos/{owner}/{repo}`
    async fn delete(&self, key: &RepositoryKey) -> Result<()> {
        let url = self.endpoint(&["repos", key.owner.as_str(), key.name.as_str()])?;
        debug!(%url, "deleting repository");

        let response = self.request(Method::DELETE, url).send().await?;

        self.handle_empty_response(response).await
    }
}
