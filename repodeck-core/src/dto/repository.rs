//! Repository DTOs
//!
//! Request bodies and query parameters sent to the hosting service, and the
//! subset of its repository object that the client consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Body for creating or updating a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepositoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A request was rejected before being sent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("repository name cannot be empty")]
    EmptyName,
}

impl NewRepositoryRequest {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }

    /// Checks the request can be sent to the service
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Field the service sorts the repository list by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Created,
    Updated,
    Pushed,
    FullName,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::Updated => "updated",
            SortKey::Pushed => "pushed",
            SortKey::FullName => "full_name",
        }
    }
}

/// Sort direction of the repository list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Error returned for an unrecognised sort key or direction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseSortError {
    kind: &'static str,
    value: String,
}

impl FromStr for SortKey {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(SortKey::Created),
            "updated" => Ok(SortKey::Updated),
            "pushed" => Ok(SortKey::Pushed),
            "full_name" => Ok(SortKey::FullName),
            other => Err(ParseSortError {
                kind: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ParseSortError {
                kind: "sort direction",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters of the list operation, passed through unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl ListQuery {
    pub fn new(sort: SortKey, direction: SortDirection) -> Self {
        Self { sort, direction }
    }

    /// Query pairs in the order they appear in the URL
    pub fn as_pairs(&self) -> [(&'static str, &'static str); 2] {
        [
            ("sort", self.sort.as_str()),
            ("direction", self.direction.as_str()),
        ]
    }
}

/// Repository object as returned by the service
///
/// Only the consumed fields are declared; everything else in the payload is
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryPayload {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub owner: OwnerPayload,
}

/// Owning account embedded in a repository object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerPayload {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}
