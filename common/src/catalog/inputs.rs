//! Request payloads accepted by [`crate::client::CatalogClient`].
//!
//! Optional fields left as `None` are not sent, so an update never clears a
//! value the catalog already holds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCreateInput {
    pub name: String,
    pub product: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub framework: Option<String>,
    pub tier: Option<String>,
    pub lifecycle: Option<String>,
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUpdateInput {
    pub id: Id,
    pub product: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub framework: Option<String>,
    pub tier: Option<String>,
    pub lifecycle: Option<String>,
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasCreateInput {
    pub alias: String,
    pub owner_id: Id,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAssignInput {
    pub id: Id,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCreateInput {
    pub id: Id,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCreateInput {
    pub category: String,
    pub display_name: String,
    pub environment: Option<String>,
    pub url: String,
    pub service_id: Id,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRepositoryCreateInput {
    pub repository_alias: String,
    pub base_directory: Option<String>,
    pub display_name: Option<String>,
    pub service_id: Id,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRepositoryUpdateInput {
    pub id: Id,
    pub display_name: String,
}

/// `Some(value)` unless `value` is empty.
pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
