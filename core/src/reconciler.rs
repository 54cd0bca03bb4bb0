//! # Service Reconciler
//!
//! Implements the "reconcile a registration" use case.
//!
//! A reconciliation runs in two phases:
//! 1. **Entry**: find the catalog entry through the registration's aliases,
//!    creating it if nothing resolves, updating it otherwise.
//! 2. **Passes**: upsert aliases, tags, tools and repositories. The four passes
//!    are independent of each other and run concurrently.
//!
//! Remote failures never bubble up as errors; they are logged and recorded in
//! the returned [`ReconcileReport`].

use std::sync::Arc;

use catsync_common::aliases::AliasResolver;
use catsync_common::client::CatalogClient;
use catsync_common::config::Config;
use catsync_common::registration::ServiceRegistration;
use tracing::{info, trace, warn};

use crate::report::{AbortReason, EntryOutcome, Passes, ReconcileReport, Reconciliation};

mod entry;
mod lookup;
mod passes;

pub struct Reconciler {
    client: Arc<dyn CatalogClient>,
    aliases: Arc<dyn AliasResolver>,
    config: Config,
}

impl Reconciler {
    pub fn new(
        client: Arc<dyn CatalogClient>,
        aliases: Arc<dyn AliasResolver>,
        config: Config,
    ) -> Self {
        Self {
            client,
            aliases,
            config,
        }
    }

    /// Reconciles a single registration against the catalog.
    ///
    /// `None` is accepted and reported as aborted without touching the catalog.
    pub async fn reconcile(&self, registration: Option<&ServiceRegistration>) -> ReconcileReport {
        let Some(registration) = registration else {
            return ReconcileReport::Aborted {
                service: String::new(),
                reason: AbortReason::MissingRegistration,
            };
        };

        if registration.aliases.is_empty() {
            warn!(
                "[{}] found 0 aliases from kubernetes data",
                registration.name
            );
            return aborted(registration, AbortReason::NoAliases);
        }
        trace!("[{}] Parsed data: {:?}", registration.label(), registration);

        let client = self.client.as_ref();
        let (service, entry) = match lookup::find_service(client, registration).await {
            Some(found) => {
                entry::update_service(client, self.aliases.as_ref(), registration, found).await
            }
            None => {
                if registration.name.is_empty() {
                    warn!(
                        "unable to create service with an empty name. aliases = [\"{}\"]",
                        registration.aliases.join("\", \"")
                    );
                    return aborted(registration, AbortReason::EmptyName);
                }
                match entry::create_service(client, self.aliases.as_ref(), registration).await {
                    Ok(created) => (created, EntryOutcome::Created),
                    Err(e) => return aborted(registration, AbortReason::CreateFailed(e)),
                }
            }
        };

        let passes = if self.config.detach {
            Passes::Detached(passes::dispatch(
                self.client.clone(),
                Arc::new(registration.clone()),
                Arc::new(service.clone()),
            ))
        } else {
            Passes::Completed(passes::run(client, registration, &service).await)
        };

        info!("[{}] Finished processing data", service.name);

        ReconcileReport::Reconciled(Reconciliation {
            service,
            entry,
            passes,
        })
    }

    /// Reconciles registrations one after another, in order.
    pub async fn reconcile_all(&self, registrations: &[ServiceRegistration]) -> Vec<ReconcileReport> {
        let mut reports = Vec::with_capacity(registrations.len());
        for registration in registrations {
            reports.push(self.reconcile(Some(registration)).await);
        }
        reports
    }
}

fn aborted(registration: &ServiceRegistration, reason: AbortReason) -> ReconcileReport {
    ReconcileReport::Aborted {
        service: registration.name.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::AliasCache;
    use crate::memory::{CatalogSnapshot, InMemoryCatalog, Operation};
    use crate::report::{ItemReport, Outcome, SkipReason, Subject};
    use std::collections::BTreeMap;
    use catsync_common::catalog::{CatalogService, Id, Repository, ServiceRepository, Tag};
    use catsync_common::registration::{RepositoryDescriptor, TagPair, ToolDescriptor};

    fn reconciler(catalog: &Arc<InMemoryCatalog>) -> Reconciler {
        Reconciler::new(
            catalog.clone(),
            Arc::new(AliasCache::new()),
            Config::default(),
        )
    }

    fn registration(name: &str, aliases: &[&str]) -> ServiceRegistration {
        ServiceRegistration {
            name: name.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    fn existing() -> CatalogSnapshot {
        CatalogSnapshot {
            services: vec![CatalogService {
                id: Id::new("svc-1"),
                name: "billing".into(),
                aliases: vec!["real-2".into()],
                tags: vec![Tag {
                    id: Id::new("tag-2"),
                    key: "env".into(),
                    value: "prod".into(),
                }],
                ..Default::default()
            }],
            repositories: vec![Repository {
                id: Id::new("repo-3"),
                alias: "github.com:acme/billing".into(),
                name: "billing".into(),
                services: vec![ServiceRepository {
                    id: Id::new("sr-4"),
                    service_id: Id::new("svc-1"),
                    repository_id: Id::new("repo-3"),
                    base_directory: "/".into(),
                    display_name: "old".into(),
                }],
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_registration_is_noop() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let report = reconciler(&catalog).reconcile(None).await;

        assert_eq!(
            report.abort_reason(),
            Some(&AbortReason::MissingRegistration)
        );
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_no_aliases_means_no_remote_calls() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        let reg = registration("billing", &[]);

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        assert_eq!(report.abort_reason(), Some(&AbortReason::NoAliases));
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_name_never_creates() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let reg = registration("", &["unknown-1", "unknown-2"]);

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        assert_eq!(report.abort_reason(), Some(&AbortReason::EmptyName));
        assert_eq!(catalog.count(Operation::GetServiceWithAlias), 2);
        assert_eq!(catalog.count(Operation::CreateService), 0);
        assert!(catalog.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_empty_name_can_update_existing() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        let reg = registration("", &["real-2"]);

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        assert!(!report.is_aborted());
        assert_eq!(catalog.count(Operation::UpdateService), 1);
    }

    #[tokio::test]
    async fn test_lookup_stops_at_first_resolving_alias() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        let reg = registration("billing", &["missing-1", "real-2", "real-3"]);

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        let reconciliation = report.reconciliation().unwrap();
        assert_eq!(reconciliation.service.id, Id::new("svc-1"));
        let lookups: Vec<String> = catalog
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                crate::memory::CatalogCall::GetServiceWithAlias(alias) => Some(alias),
                _ => None,
            })
            .collect();
        assert_eq!(lookups, vec!["missing-1", "real-2"]);
    }

    #[tokio::test]
    async fn test_lookup_skips_empty_aliases() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        let reg = registration("billing", &["", "real-2"]);

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        assert_eq!(
            report.reconciliation().unwrap().service.id,
            Id::new("svc-1")
        );
        let lookups: Vec<String> = catalog
            .calls()
            .into_iter()
            .filter(|c| c.operation() == Operation::GetServiceWithAlias)
            .map(|c| c.key().to_string())
            .collect();
        assert_eq!(lookups, vec!["real-2"]);
    }

    #[tokio::test]
    async fn test_create_failure_skips_passes() {
        let catalog = Arc::new(InMemoryCatalog::new());
        catalog.fail_on(Operation::CreateService, None);
        let mut reg = registration("orders", &["orders"]);
        reg.tag_creates = vec![TagPair::new("env", "prod")];

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        assert!(matches!(
            report.abort_reason(),
            Some(AbortReason::CreateFailed(_))
        ));
        assert_eq!(catalog.count(Operation::CreateTag), 0);
        assert_eq!(catalog.count(Operation::CreateAlias), 0);
    }

    #[tokio::test]
    async fn test_update_failure_still_runs_passes() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        catalog.fail_on(Operation::UpdateService, None);
        let mut reg = registration("billing", &["real-2", "billing-api"]);
        reg.tag_creates = vec![TagPair::new("team", "payments")];

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        let reconciliation = report.reconciliation().unwrap();
        assert!(matches!(
            reconciliation.entry,
            EntryOutcome::UpdateFailed { .. }
        ));
        assert_eq!(catalog.count(Operation::CreateAlias), 1);
        assert_eq!(catalog.count(Operation::CreateTag), 1);
    }

    #[tokio::test]
    async fn test_existing_tag_is_not_created() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        let mut reg = registration("billing", &["real-2"]);
        reg.tag_creates = vec![TagPair::new("env", "prod")];

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        assert_eq!(catalog.count(Operation::CreateTag), 0);
        let passes = report.passes().unwrap();
        assert_eq!(
            passes.tags[0].outcome,
            Outcome::Skipped(SkipReason::AlreadyExists)
        );
    }

    #[tokio::test]
    async fn test_tag_assign_is_a_single_batch() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        catalog.fail_on(Operation::AssignTags, None);
        let mut reg = registration("billing", &["real-2"]);
        reg.tag_assigns = Some(
            [("team", "payments"), ("tier", "1")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        reg.tag_creates = vec![TagPair::new("region", "eu")];

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        let tags = &report.passes().unwrap().tags;
        assert_eq!(tags.len(), 2);
        assert!(matches!(tags[0].outcome, Outcome::Failed(_)));
        assert_eq!(tags[1].outcome, Outcome::Created);
        assert_eq!(catalog.count(Operation::AssignTags), 1);
    }

    #[tokio::test]
    async fn test_empty_tag_assign_map_is_still_sent() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        let mut reg = registration("billing", &["real-2"]);
        reg.tag_assigns = Some(BTreeMap::new());

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        assert_eq!(catalog.count(Operation::AssignTags), 1);
        assert_eq!(
            report.passes().unwrap().tags,
            vec![ItemReport::new(
                Subject::TagAssign(BTreeMap::new()),
                Outcome::Updated
            )]
        );
    }

    #[tokio::test]
    async fn test_absent_tag_assign_sends_nothing() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        let reg = registration("billing", &["real-2"]);

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        assert_eq!(catalog.count(Operation::AssignTags), 0);
        assert!(report.passes().unwrap().tags.is_empty());
    }

    #[tokio::test]
    async fn test_repository_display_name_update() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        let mut reg = registration("billing", &["real-2"]);
        reg.repositories = vec![RepositoryDescriptor::new(
            "github.com:acme/billing",
            "/",
            "new",
        )];

        reconciler(&catalog).reconcile(Some(&reg)).await;

        let updates: Vec<_> = catalog
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                crate::memory::CatalogCall::UpdateServiceRepository(input) => Some(input),
                _ => None,
            })
            .collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].id, Id::new("sr-4"));
        assert_eq!(updates[0].display_name, "new");
    }

    #[tokio::test]
    async fn test_repository_empty_display_name_is_skipped() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        let mut reg = registration("billing", &["real-2"]);
        reg.repositories = vec![RepositoryDescriptor::new("github.com:acme/billing", "/", "")];

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        assert_eq!(catalog.count(Operation::UpdateServiceRepository), 0);
        assert_eq!(catalog.count(Operation::CreateServiceRepository), 0);
        assert_eq!(
            report.passes().unwrap().repositories[0].outcome,
            Outcome::Skipped(SkipReason::Unchanged)
        );
    }

    #[tokio::test]
    async fn test_unknown_repository_is_skipped() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        let mut reg = registration("billing", &["real-2"]);
        reg.repositories = vec![
            RepositoryDescriptor::new("github.com:acme/ghost", "/", "ghost"),
            RepositoryDescriptor::new("github.com:acme/billing", "/worker", "worker"),
        ];

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        let repositories = &report.passes().unwrap().repositories;
        assert_eq!(
            repositories[0].outcome,
            Outcome::Skipped(SkipReason::RepositoryNotFound)
        );
        assert_eq!(repositories[1].outcome, Outcome::Created);
    }

    #[tokio::test]
    async fn test_tool_dedup_uses_full_triple() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        let mut reg = registration("billing", &["real-2"]);
        reg.tools = vec![
            ToolDescriptor::new("logs", "Kibana", "prod", "https://kibana/prod"),
            ToolDescriptor::new("logs", "Kibana", "staging", "https://kibana/staging"),
            ToolDescriptor::new("logs", "Kibana", "prod", "https://kibana/prod"),
        ];

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        assert_eq!(catalog.count(Operation::CreateTool), 2);
        let tools = &report.passes().unwrap().tools;
        assert_eq!(tools[2].outcome, Outcome::Skipped(SkipReason::AlreadyExists));
    }

    #[tokio::test]
    async fn test_alias_failures_are_isolated() {
        let catalog = Arc::new(InMemoryCatalog::from_snapshot(existing()));
        catalog.fail_on(Operation::CreateAlias, Some("bad"));
        let reg = registration("billing", &["real-2", "", "bad", "good"]);

        let report = reconciler(&catalog).reconcile(Some(&reg)).await;

        let outcomes: Vec<&Outcome> = report
            .passes()
            .unwrap()
            .aliases
            .iter()
            .map(|a| &a.outcome)
            .collect();
        assert_eq!(outcomes[0], &Outcome::Skipped(SkipReason::AlreadyExists));
        assert_eq!(outcomes[1], &Outcome::Skipped(SkipReason::Empty));
        assert!(matches!(outcomes[2], Outcome::Failed(_)));
        assert_eq!(outcomes[3], &Outcome::Created);
    }

    #[tokio::test]
    async fn test_detached_passes_can_be_joined() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let reconciler = Reconciler::new(
            catalog.clone(),
            Arc::new(AliasCache::new()),
            Config {
                detach: true,
                ..Config::default()
            },
        );
        let mut reg = registration("orders", &["orders", "orders-api"]);
        reg.tag_creates = vec![TagPair::new("env", "prod")];

        let report = reconciler.reconcile(Some(&reg)).await;
        assert!(report.passes().is_none());

        let ReconcileReport::Reconciled(reconciliation) = report else {
            panic!("expected a reconciliation");
        };
        let passes = reconciliation.passes.wait().await;
        assert_eq!(passes.summary().created, 3);
        assert_eq!(catalog.count(Operation::CreateAlias), 2);
    }
}
