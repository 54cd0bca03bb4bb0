use std::sync::Arc;

use catsync_common::config::Config;
use catsync_core::memory::{CatalogCall, Operation};
use catsync_core::InMemoryCatalog;
use catsync_core::report::{EntryOutcome, Outcome, SkipReason};

use super::util::{payments, reconciler, seeded_catalog};

#[tokio::test]
async fn second_run_only_refreshes_the_entry_and_tag_batch() {
    let catalog = seeded_catalog();
    let reconciler = reconciler(&catalog, Config::default()).await;
    let registration = payments();

    reconciler.reconcile(Some(&registration)).await;
    let after_first = catalog.snapshot();
    catalog.clear_calls();

    let report = reconciler.reconcile(Some(&registration)).await;

    let operations: Vec<Operation> = catalog
        .mutations()
        .iter()
        .map(CatalogCall::operation)
        .collect();
    assert_eq!(
        operations,
        vec![Operation::UpdateService, Operation::AssignTags]
    );
    assert_eq!(catalog.snapshot(), after_first);

    let reconciliation = report.reconciliation().expect("reconciled");
    assert_eq!(
        reconciliation.entry,
        EntryOutcome::Updated { changes: vec![] }
    );

    let passes = report.passes().expect("passes ran in place");
    let summary = passes.summary();
    assert_eq!(summary.created, 0);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        passes.repositories[0].outcome,
        Outcome::Skipped(SkipReason::Unchanged)
    );
}

#[tokio::test]
async fn rerun_fills_in_what_failed_before() {
    let catalog = seeded_catalog();
    catalog.fail_on(Operation::CreateTag, Some("region"));
    let registration = payments();

    reconciler(&catalog, Config::default())
        .await
        .reconcile(Some(&registration))
        .await;
    assert!(!catalog.snapshot().services[0].has_tag("region", "eu"));

    // Same state, no failure rules.
    let catalog = Arc::new(InMemoryCatalog::from_snapshot(catalog.snapshot()));

    reconciler(&catalog, Config::default())
        .await
        .reconcile(Some(&registration))
        .await;

    let creates: Vec<String> = catalog
        .mutations()
        .iter()
        .filter(|c| c.operation() == Operation::CreateTag)
        .map(|c| c.key().to_string())
        .collect();
    assert_eq!(creates, vec!["region"]);
    assert!(catalog.snapshot().services[0].has_tag("region", "eu"));
}
