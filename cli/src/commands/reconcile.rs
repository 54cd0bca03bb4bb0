use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;
use tracing::{info, warn};

use crate::commands::snapshot;
use crate::terminal::{colors, print, progress};
use catsync_common::catalog::CatalogService;
use catsync_common::config::Config;
use catsync_common::registration::ServiceRegistration;
use catsync_core::report::{AbortReason, EntryOutcome, Outcome, PassReport, Summary};
use catsync_core::{AliasCache, InMemoryCatalog, ReconcileReport, Reconciler};

type Detail = (String, ColoredString);

/// A report whose passes have all finished.
enum Settled {
    Aborted {
        label: String,
        reason: AbortReason,
    },
    Reconciled {
        service: CatalogService,
        entry: EntryOutcome,
        passes: PassReport,
    },
}

pub async fn reconcile(
    registrations: &Path,
    catalog: &Path,
    dry_run: bool,
    cfg: &Config,
) -> anyhow::Result<()> {
    let registrations: Vec<ServiceRegistration> = snapshot::load_registrations(registrations)?;
    let client = Arc::new(InMemoryCatalog::from_snapshot(snapshot::load_catalog(catalog)?));
    let aliases = AliasCache::load(client.as_ref()).await?;
    let reconciler = Reconciler::new(client.clone(), Arc::new(aliases), cfg.clone());

    let start_time: Instant = Instant::now();
    progress::start(registrations.len(), cfg.quiet);

    let mut reports: Vec<(String, ReconcileReport)> = Vec::with_capacity(registrations.len());
    for registration in &registrations {
        let label = registration.label().to_string();
        progress::working_on(&label);
        let report = reconciler.reconcile(Some(registration)).await;
        reports.push((label, report));
        progress::advance();
    }

    let mut settled: Vec<Settled> = Vec::with_capacity(reports.len());
    for (label, report) in reports {
        settled.push(settle(label, report).await);
    }
    progress::finish();

    print_results(&settled, start_time.elapsed(), cfg);

    if dry_run {
        info!("Dry run, catalog at {} left untouched", catalog.display());
    } else {
        snapshot::save_catalog(catalog, &client.snapshot())?;
    }
    Ok(())
}

async fn settle(label: String, report: ReconcileReport) -> Settled {
    match report {
        ReconcileReport::Aborted { reason, .. } => Settled::Aborted { label, reason },
        ReconcileReport::Reconciled(r) => Settled::Reconciled {
            service: r.service,
            entry: r.entry,
            passes: r.passes.wait().await,
        },
    }
}

fn print_results(settled: &[Settled], total_time: Duration, cfg: &Config) {
    if settled.is_empty() {
        warn!("No registrations to reconcile");
        return;
    }

    print::header("Results", cfg.quiet);
    if cfg.quiet == 0 {
        for (idx, result) in settled.iter().enumerate() {
            print_tree(idx, result);
            if idx + 1 != settled.len() {
                print::print("");
            }
        }
        print::end_of_program();
    }

    if cfg.quiet < 2 {
        print_summary(settled, total_time);
    }
}

fn print_tree(idx: usize, result: &Settled) {
    match result {
        Settled::Aborted { label, reason } => {
            print::tree_head(idx, label);
            let details: Vec<Detail> =
                vec![("Aborted".to_string(), reason.to_string().color(colors::FAILED))];
            print::as_tree_one_level(&details);
        }
        Settled::Reconciled {
            service,
            entry,
            passes,
        } => {
            print::tree_head(idx, &service.name);
            let mut details: Vec<Detail> = vec![
                ("Id".to_string(), service.id.to_string().normal()),
                ("Entry".to_string(), entry_detail(entry)),
            ];
            details.extend(
                passes
                    .items()
                    .map(|item| (item.subject.to_string(), outcome_detail(&item.outcome))),
            );
            print::as_tree_one_level(&details);
        }
    }
}

fn entry_detail(entry: &EntryOutcome) -> ColoredString {
    match entry {
        EntryOutcome::Created => "created".color(colors::CREATED),
        EntryOutcome::Updated { changes } if changes.is_empty() => {
            "unchanged".color(colors::SKIPPED)
        }
        EntryOutcome::Updated { changes } => {
            let changes: Vec<String> = changes.iter().map(|c| c.to_string()).collect();
            format!("updated ({})", changes.join("; ")).color(colors::UPDATED)
        }
        EntryOutcome::UpdateFailed { error } => {
            format!("update failed ({error})").color(colors::FAILED)
        }
    }
}

fn outcome_detail(outcome: &Outcome) -> ColoredString {
    let color = match outcome {
        Outcome::Created => colors::CREATED,
        Outcome::Updated => colors::UPDATED,
        Outcome::Skipped(_) => colors::SKIPPED,
        Outcome::Failed(_) => colors::FAILED,
    };
    outcome.to_string().color(color)
}

/// Tallies every item across all settled reports, plus the aborted count.
fn totals(settled: &[Settled]) -> (Summary, usize) {
    let mut total = Summary::default();
    let mut aborted = 0;
    for result in settled {
        match result {
            Settled::Aborted { .. } => aborted += 1,
            Settled::Reconciled { passes, .. } => {
                let s = passes.summary();
                total.created += s.created;
                total.updated += s.updated;
                total.skipped += s.skipped;
                total.failed += s.failed;
            }
        }
    }
    (total, aborted)
}

fn print_summary(settled: &[Settled], total_time: Duration) {
    print::print_status(summary_line(settled, total_time));
}

fn summary_line(settled: &[Settled], total_time: Duration) -> String {
    let (total, aborted) = totals(settled);
    let services: ColoredString = format!("{} services", settled.len()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();

    let mut line = format!("Reconciled {services} in {total_time}: {total}");
    if aborted > 0 {
        line.push_str(&format!(", {}", format!("{aborted} aborted").color(colors::FAILED)));
    }
    line
}
