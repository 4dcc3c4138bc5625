//! Repodeck HTTP Client
//!
//! A small, type-safe client for the repository endpoints of a GitHub-style
//! hosting API.
//!
//! The [`RepositoryApi`] trait is the contract the sync engine depends on;
//! [`GitHubClient`] is the HTTP implementation of it.
//!
//! # Example
//!
//! ```no_run
//! use repodeck_client::{GitHubClient, RepositoryApi};
//! use repodeck_core::dto::repository::ListQuery;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GitHubClient::new("https://api.github.com").with_token("ghp_example");
//!
//!     for repo in client.list(ListQuery::default()).await? {
//!         println!("{}/{}", repo.owner(), repo.name());
//!     }
//!     Ok(())
//! }
//! ```

mod api;
pub mod error;
mod repositories;

// Re-export commonly used types
pub use api::RepositoryApi;
pub use error::{ClientError, Result};

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// Media type the hosting API expects in `Accept`
const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Default `User-Agent`; the service rejects requests without one
const DEFAULT_USER_AGENT: &str = concat!("repodeck/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the hosting service's repository endpoints
///
/// Construct one per process and hand it to the sync engine; it is cheap to
/// clone and shares its connection pool between clones.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// Base URL of the API (e.g., "https://api.github.com")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Bearer token sent with every request, if configured
    token: Option<String>,
    user_agent: String,
}

impl GitHubClient {
    /// Create a new client for the given API base URL
    ///
    /// # Example
    /// ```
    /// use repodeck_client::GitHubClient;
    ///
    /// let client = GitHubClient::new("https://api.github.com");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use repodeck_client::GitHubClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = GitHubClient::with_client("https://api.github.com", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Authenticate every request with a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the `User-Agent` header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a token has been configured
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // =============================================================================
    // Request Building
    // =============================================================================

    /// Build an endpoint URL from path segments
    ///
    /// Segments are percent-encoded, so an owner or repository name can never
    /// escape its position in the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid base URL {}: {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!("base URL {} cannot have a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Start a request with the headers every call carries
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, ACCEPT_JSON)
            .header(USER_AGENT, &self.user_agent);

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    ///
    /// This method checks the status code and returns an error if the request failed.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ClientError::api_error(
            status.as_u16(),
            error_message(&error_text),
        ))
    }
}

/// Pull the `message` field out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
