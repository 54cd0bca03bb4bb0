use catsync_common::config::Config;
use catsync_common::registration::ServiceRegistration;
use catsync_core::ReconcileReport;
use catsync_core::memory::Operation;
use catsync_core::report::{EntryOutcome, Outcome, Passes};

use super::util::{payments, reconciler, seeded_catalog};

#[tokio::test]
async fn new_service_is_created_with_everything_attached() {
    let catalog = seeded_catalog();
    let report = reconciler(&catalog, Config::default())
        .await
        .reconcile(Some(&payments()))
        .await;

    let reconciliation = report.reconciliation().expect("reconciled");
    assert_eq!(reconciliation.entry, EntryOutcome::Created);

    let passes = report.passes().expect("passes ran in place");
    let summary = passes.summary();
    assert_eq!(summary.created, 7, "{passes:?}");
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 0);

    let snapshot = catalog.snapshot();
    let service = &snapshot.services[0];
    assert_eq!(service.name, "payments");
    assert_eq!(service.tier.as_deref(), Some("tier_1"));
    assert_eq!(service.lifecycle.as_deref(), Some("generally_available"));
    assert_eq!(service.owner.as_deref(), Some("payments_team"));
    assert_eq!(service.aliases, vec!["payments-api", "payments-worker"]);
    assert!(service.has_tag("team", "payments"));
    assert!(service.has_tag("env", "prod"));
    assert!(service.has_tag("region", "eu"));
    assert!(service.has_tool("logs", "Kibana", "prod"));
    assert!(service.has_tool("metrics", "Grafana", ""));

    let attachment = &snapshot.repositories[0].services[0];
    assert_eq!(attachment.service_id, service.id);
    assert_eq!(attachment.base_directory, "/");
    assert_eq!(attachment.display_name, "payments");
}

#[tokio::test]
async fn unknown_reference_aliases_are_left_unset() {
    let catalog = seeded_catalog();
    let mut registration = payments();
    registration.tier = "tier_9".into();
    registration.owner = "nobody".into();

    reconciler(&catalog, Config::default())
        .await
        .reconcile(Some(&registration))
        .await;

    let service = &catalog.snapshot().services[0];
    assert_eq!(service.tier, None);
    assert_eq!(service.owner, None);
    assert_eq!(service.lifecycle.as_deref(), Some("generally_available"));
}

#[tokio::test]
async fn detached_passes_finish_once_awaited() {
    let catalog = seeded_catalog();
    let config = Config {
        detach: true,
        ..Config::default()
    };
    let report = reconciler(&catalog, config)
        .await
        .reconcile(Some(&payments()))
        .await;

    assert!(report.passes().is_none());
    let ReconcileReport::Reconciled(reconciliation) = report else {
        panic!("expected a reconciliation");
    };
    assert!(matches!(reconciliation.passes, Passes::Detached(_)));

    let passes = reconciliation.passes.wait().await;
    assert_eq!(passes.summary().failed, 0);
    assert_eq!(catalog.count(Operation::CreateAlias), 2);
    assert_eq!(catalog.count(Operation::CreateTool), 2);
}

#[tokio::test]
async fn one_failing_tool_does_not_stop_the_rest() {
    let catalog = seeded_catalog();
    catalog.fail_on(Operation::CreateTool, Some("Kibana"));

    let report = reconciler(&catalog, Config::default())
        .await
        .reconcile(Some(&payments()))
        .await;

    let passes = report.passes().expect("passes ran in place");
    assert_eq!(passes.summary().failed, 1);
    assert!(matches!(passes.tools[0].outcome, Outcome::Failed(_)));
    assert_eq!(passes.tools[1].outcome, Outcome::Created);
    assert_eq!(passes.aliases.len(), 2);
    assert!(passes.aliases.iter().all(|a| a.outcome == Outcome::Created));
    assert_eq!(passes.repositories[0].outcome, Outcome::Created);
}

#[tokio::test]
async fn reconcile_all_handles_each_registration() {
    let catalog = seeded_catalog();
    let registrations = vec![
        payments(),
        ServiceRegistration {
            name: "ledger".into(),
            aliases: vec!["ledger".into()],
            ..Default::default()
        },
        ServiceRegistration {
            name: "orphan".into(),
            ..Default::default()
        },
    ];

    let reports = reconciler(&catalog, Config::default())
        .await
        .reconcile_all(&registrations)
        .await;

    assert_eq!(reports.len(), 3);
    assert!(!reports[0].is_aborted());
    assert!(!reports[1].is_aborted());
    assert!(reports[2].is_aborted());

    let names: Vec<String> = catalog
        .snapshot()
        .services
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["payments", "ledger"]);
}
