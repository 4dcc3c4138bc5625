//! Repository domain model
//!
//! A `RepositoryRecord` is one entry of a loaded snapshot. Fields are private
//! so a record cannot be edited after it has been built from a server
//! response; an edit always yields a fresh record from the server.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dto::repository::RepositoryPayload;

/// Service-assigned repository identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryId(pub u64);

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable snapshot of one remote repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    id: RepositoryId,
    owner: String,
    name: String,
    description: Option<String>,
    primary_language: Option<String>,
    owner_avatar_url: Option<String>,
}

impl RepositoryRecord {
    /// Creates a record with only the identifying fields set
    pub fn new(id: RepositoryId, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            owner: owner.into(),
            name: name.into(),
            description: None,
            primary_language: None,
            owner_avatar_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_primary_language(mut self, language: impl Into<String>) -> Self {
        self.primary_language = Some(language.into());
        self
    }

    pub fn with_owner_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.owner_avatar_url = Some(url.into());
        self
    }

    pub fn id(&self) -> RepositoryId {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn primary_language(&self) -> Option<&str> {
        self.primary_language.as_deref()
    }

    /// Avatar reference of the owning account, only meaningful to renderers
    pub fn owner_avatar_url(&self) -> Option<&str> {
        self.owner_avatar_url.as_deref()
    }

    /// The `(owner, name)` pair used to address this repository
    pub fn key(&self) -> RepositoryKey {
        RepositoryKey::new(self.owner.clone(), self.name.clone())
    }
}

impl From<RepositoryPayload> for RepositoryRecord {
    fn from(payload: RepositoryPayload) -> Self {
        // The service sends `""` for a cleared description; treat it as absent.
        let description = payload.description.filter(|d| !d.is_empty());
        Self {
            id: RepositoryId(payload.id),
            owner: payload.owner.login,
            name: payload.name,
            description,
            primary_language: payload.language,
            owner_avatar_url: payload.owner.avatar_url,
        }
    }
}

/// Address of a repository on the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryKey {
    pub owner: String,
    pub name: String,
}

impl RepositoryKey {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Error returned when an `owner/name` string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected OWNER/NAME, got `{0}`")]
pub struct ParseKeyError(pub String);

impl FromStr for RepositoryKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(ParseKeyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_payload() {
        let json = r#"{
            "id": 42,
            "name": "r1",
            "full_name": "a/r1",
            "description": "d1",
            "language": "Go",
            "private": false,
            "owner": { "login": "a", "avatar_url": "https://avatars.example/a.png", "type": "User" }
        }"#;

        let payload: RepositoryPayload = serde_json::from_str(json).unwrap();
        let record = RepositoryRecord::from(payload);

        assert_eq!(record.id(), RepositoryId(42));
        assert_eq!(record.owner(), "a");
        assert_eq!(record.name(), "r1");
        assert_eq!(record.description(), Some("d1"));
        assert_eq!(record.primary_language(), Some("Go"));
        assert_eq!(
            record.owner_avatar_url(),
            Some("https://avatars.example/a.png")
        );
    }

    #[test]
    fn test_record_from_sparse_payload() {
        let json = r#"{ "name": "r2", "description": null, "owner": { "login": "b" } }"#;

        let payload: RepositoryPayload = serde_json::from_str(json).unwrap();
        let record = RepositoryRecord::from(payload);

        assert_eq!(record.id(), RepositoryId::default());
        assert_eq!(record.description(), None);
        assert_eq!(record.primary_language(), None);
        assert_eq!(record.owner_avatar_url(), None);
    }

    #[test]
    fn test_empty_description_is_absent() {
        let json = r#"{ "name": "r3", "description": "", "owner": { "login": "c" } }"#;
        let payload: RepositoryPayload = serde_json::from_str(json).unwrap();

        assert_eq!(RepositoryRecord::from(payload).description(), None);
    }

    #[test]
    fn test_key_parse() {
        let key: RepositoryKey = "octo/hello".parse().unwrap();
        assert_eq!(key, RepositoryKey::new("octo", "hello"));
        assert_eq!(key.to_string(), "octo/hello");

        assert!("octo".parse::<RepositoryKey>().is_err());
        assert!("/hello".parse::<RepositoryKey>().is_err());
        assert!("octo/".parse::<RepositoryKey>().is_err());
        assert!("a/b/c".parse::<RepositoryKey>().is_err());
    }

    #[test]
    fn test_record_key() {
        let record = RepositoryRecord::new(RepositoryId(1), "a", "r1");
        assert_eq!(record.key(), RepositoryKey::new("a", "r1"));
    }
}
