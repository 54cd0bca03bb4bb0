//! # catsync core
//!
//! Application services of catsync.
//!
//! * **[`reconciler`]**: reconciles a registration against the catalog.
//! * **[`report`]**: structured outcome of a reconciliation.
//! * **[`cache`]**: alias resolution for tiers, lifecycles and teams.
//! * **[`memory`]**: an in-process [`catsync_common::client::CatalogClient`].

pub mod cache;
pub mod memory;
pub mod reconciler;
pub mod report;

pub use cache::AliasCache;
pub use memory::{CatalogSnapshot, InMemoryCatalog};
pub use reconciler::Reconciler;
pub use report::ReconcileReport;
