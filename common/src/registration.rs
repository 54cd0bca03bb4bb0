//! # Service Registration Model
//!
//! A registration is the locally assembled description of a service that wants
//! to exist in the catalog. It is produced by the Kubernetes collector and is
//! the only input of a reconciliation.
//!
//! Every field except `name` and `aliases` may be omitted in the serialized
//! form and falls back to its empty value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRegistration {
    pub name: String,
    pub aliases: Vec<String>,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub framework: String,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub lifecycle: String,
    #[serde(default)]
    pub owner: String,
    /// Tags sent as one batch. `None` means no assign request at all,
    /// while an empty map is still sent.
    #[serde(default)]
    pub tag_assigns: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub tag_creates: Vec<TagPair>,
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
    #[serde(default)]
    pub repositories: Vec<RepositoryDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPair {
    pub key: String,
    pub value: String,
}

impl TagPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub category: String,
    pub display_name: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub url: String,
}

impl ToolDescriptor {
    pub fn new(
        category: impl Into<String>,
        display_name: impl Into<String>,
        environment: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            display_name: display_name.into(),
            environment: environment.into(),
            url: url.into(),
        }
    }
}

/// A request to attach a catalog repository to the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Alias of the repository as known by the catalog (e.g. `github.com:org/repo`).
    pub repository: String,
    #[serde(default)]
    pub base_directory: String,
    #[serde(default)]
    pub display_name: String,
}

impl RepositoryDescriptor {
    pub fn new(
        repository: impl Into<String>,
        base_directory: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            base_directory: base_directory.into(),
            display_name: display_name.into(),
        }
    }
}

impl std::fmt::Display for RepositoryDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{Alias: {}, Directory: {}, Name: {}}}",
            self.repository, self.base_directory, self.display_name
        )
    }
}

impl ServiceRegistration {
    /// Name used to prefix log lines, falling back to the first alias.
    pub fn label(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        self.aliases
            .iter()
            .find(|a| !a.is_empty())
            .map(String::as_str)
            .unwrap_or("<unnamed>")
    }
}
