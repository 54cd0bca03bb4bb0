use std::collections::BTreeMap;
use std::sync::Arc;

use catsync_common::catalog::{Id, Lifecycle, Repository, Team, Tier};
use catsync_common::config::Config;
use catsync_common::registration::{
    RepositoryDescriptor, ServiceRegistration, TagPair, ToolDescriptor,
};
use catsync_core::{AliasCache, CatalogSnapshot, InMemoryCatalog, Reconciler};

/// A catalog with reference data and one unattached repository.
pub fn seeded_catalog() -> Arc<InMemoryCatalog> {
    Arc::new(InMemoryCatalog::from_snapshot(CatalogSnapshot {
        repositories: vec![Repository {
            id: Id::new("repo-1"),
            alias: "github.com:acme/payments".into(),
            name: "payments".into(),
            services: vec![],
        }],
        tiers: vec![Tier {
            id: Id::new("tier-2"),
            alias: "tier_1".into(),
            name: "Mission Critical".into(),
            index: 1,
        }],
        lifecycles: vec![Lifecycle {
            id: Id::new("lc-3"),
            alias: "generally_available".into(),
            name: "Generally Available".into(),
            index: 3,
        }],
        teams: vec![Team {
            id: Id::new("team-4"),
            alias: "payments_team".into(),
            name: "Payments".into(),
        }],
        ..Default::default()
    }))
}

pub async fn reconciler(catalog: &Arc<InMemoryCatalog>, config: Config) -> Reconciler {
    let cache = AliasCache::load(catalog.as_ref())
        .await
        .expect("reference data loads");
    catalog.clear_calls();
    Reconciler::new(catalog.clone(), Arc::new(cache), config)
}

/// A registration touching every pass.
pub fn payments() -> ServiceRegistration {
    ServiceRegistration {
        name: "payments".into(),
        aliases: vec!["payments-api".into(), "payments-worker".into()],
        product: "checkout".into(),
        description: "Moves money".into(),
        language: "rust".into(),
        framework: "axum".into(),
        tier: "tier_1".into(),
        lifecycle: "generally_available".into(),
        owner: "payments_team".into(),
        tag_assigns: Some(BTreeMap::from([("team".to_string(), "payments".to_string())])),
        tag_creates: vec![TagPair::new("env", "prod"), TagPair::new("region", "eu")],
        tools: vec![
            ToolDescriptor::new("logs", "Kibana", "prod", "https://kibana.example.com"),
            ToolDescriptor::new("metrics", "Grafana", "", "https://grafana.example.com"),
        ],
        repositories: vec![RepositoryDescriptor::new(
            "github.com:acme/payments",
            "/",
            "payments",
        )],
    }
}
