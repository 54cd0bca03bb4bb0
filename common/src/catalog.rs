//! # Catalog Model
//!
//! Entities as returned by a [`crate::client::CatalogClient`].
//!
//! These types are never assembled by the reconciler itself; they are read
//! from the catalog and inspected through the capability queries
//! ([`CatalogService::has_alias`], [`CatalogService::has_tag`],
//! [`CatalogService::has_tool`] and [`Repository::get_service`]).

use std::fmt;

use serde::{Deserialize, Serialize};

mod diff;
pub mod inputs;

pub use diff::FieldChange;

/// Opaque catalog identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogService {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
    /// Alias of the assigned tier.
    #[serde(default)]
    pub tier: Option<String>,
    /// Alias of the assigned lifecycle.
    #[serde(default)]
    pub lifecycle: Option<String>,
    /// Alias of the owning team.
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<ServiceRepository>,
}

impl CatalogService {
    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }

    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tags.iter().any(|t| t.key == key && t.value == value)
    }

    pub fn has_tool(&self, category: &str, display_name: &str, environment: &str) -> bool {
        self.tools.iter().any(|t| {
            t.category == category && t.display_name == display_name && t.environment == environment
        })
    }

    /// Field-level differences between `self` (before) and `other` (after).
    pub fn diff(&self, other: &CatalogService) -> Vec<FieldChange> {
        diff::diff_services(self, other)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Id,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub id: Id,
    pub category: String,
    pub display_name: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: Id,
    pub alias: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub services: Vec<ServiceRepository>,
}

impl Repository {
    /// Attachment of this repository to `service_id` at `base_directory`, if any.
    pub fn get_service(&self, service_id: &Id, base_directory: &str) -> Option<&ServiceRepository> {
        self.services
            .iter()
            .find(|s| &s.service_id == service_id && s.base_directory == base_directory)
    }
}

/// Link between a repository and a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRepository {
    pub id: Id,
    pub service_id: Id,
    pub repository_id: Id,
    #[serde(default)]
    pub base_directory: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: Id,
    pub alias: String,
    pub name: String,
    #[serde(default)]
    pub index: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub id: Id,
    pub alias: String,
    pub name: String,
    #[serde(default)]
    pub index: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: Id,
    pub alias: String,
    pub name: String,
}
