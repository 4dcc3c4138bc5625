//! Configuration module
//!
//! Handles CLI configuration: API location, credentials and list ordering.

use std::sync::Arc;

use repodeck_client::GitHubClient;
use repodeck_core::dto::repository::ListQuery;
use repodeck_sync::{EngineConfig, EngineHandle, RepositorySyncEngine};
use tracing::debug;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosting API
    pub api_url: String,

    /// Bearer token, if any
    pub token: Option<String>,

    /// Ordering requested for every list
    pub list_query: ListQuery,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if matches!(&self.token, Some(token) if token.trim().is_empty()) {
            anyhow::bail!("token cannot be empty when given");
        }

        Ok(())
    }

    /// Builds the HTTP client described by this configuration
    pub fn client(&self) -> GitHubClient {
        let client = GitHubClient::new(&self.api_url);
        match &self.token {
            Some(token) => client.with_token(token),
            None => client,
        }
    }

    /// Starts a sync engine backed by this configuration's client
    pub fn start_engine(&self) -> EngineHandle {
        let client = self.client();
        debug!(
            api_url = client.base_url(),
            authenticated = client.is_authenticated(),
            "starting sync engine"
        );

        let engine_config = EngineConfig {
            list_query: self.list_query,
            ..EngineConfig::default()
        };
        RepositorySyncEngine::spawn(Arc::new(client), engine_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            api_url: "https://api.github.com".to_string(),
            token: Some("ghp_test".to_string()),
            list_query: ListQuery::default(),
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = config();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Invalid URL should fail
        config.api_url = "api.github.com".to_string();
        assert!(config.validate().is_err());

        config.api_url = String::new();
        assert!(config.validate().is_err());

        config.api_url = "http://localhost:8080".to_string();
        assert!(config.validate().is_ok());

        // Blank token should fail, missing token is fine
        config.token = Some("  ".to_string());
        assert!(config.validate().is_err());

        config.token = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_carries_token() {
        let client = config().client();
        assert!(client.is_authenticated());
        assert_eq!(client.base_url(), "https://api.github.com");

        let anonymous = Config {
            token: None,
            ..config()
        }
        .client();
        assert!(!anonymous.is_authenticated());
    }
}
