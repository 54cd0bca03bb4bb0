//! # Reconciliation Reports
//!
//! Structured results of a reconciliation. Every remote decision the
//! reconciler takes ends up here, so callers can inspect what happened to each
//! alias, tag, tool and repository instead of scraping logs.

use std::collections::BTreeMap;
use std::fmt;

use catsync_common::catalog::{CatalogService, FieldChange};
use catsync_common::error::CatalogError;
use catsync_common::registration::{RepositoryDescriptor, TagPair, ToolDescriptor};
use tokio::task::JoinHandle;
use tracing::error;

#[derive(Debug)]
pub enum ReconcileReport {
    /// Nothing beyond (at most) the lookup was sent to the catalog.
    Aborted { service: String, reason: AbortReason },
    Reconciled(Reconciliation),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbortReason {
    #[error("no registration given")]
    MissingRegistration,
    #[error("registration has no aliases")]
    NoAliases,
    #[error("unable to create a service with an empty name")]
    EmptyName,
    #[error("failed creating service: {0}")]
    CreateFailed(CatalogError),
}

#[derive(Debug)]
pub struct Reconciliation {
    /// The catalog entry the passes ran against.
    pub service: CatalogService,
    pub entry: EntryOutcome,
    pub passes: Passes,
}

/// What happened to the catalog entry itself before the passes ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Created,
    Updated { changes: Vec<FieldChange> },
    UpdateFailed { error: CatalogError },
}

#[derive(Debug)]
pub enum Passes {
    Completed(PassReport),
    /// Passes still running on the runtime.
    Detached(DetachedPasses),
}

/// Per-item outcomes of the four upsert passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub aliases: Vec<ItemReport>,
    pub tags: Vec<ItemReport>,
    pub tools: Vec<ItemReport>,
    pub repositories: Vec<ItemReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub subject: Subject,
    pub outcome: Outcome,
}

impl ItemReport {
    pub fn new(subject: Subject, outcome: Outcome) -> Self {
        Self { subject, outcome }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Alias(String),
    TagAssign(BTreeMap<String, String>),
    Tag(TagPair),
    Tool(ToolDescriptor),
    Repository(RepositoryDescriptor),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Skipped(SkipReason),
    Failed(CatalogError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Empty,
    AlreadyExists,
    Unchanged,
    RepositoryNotFound,
}

/// Tally of item outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    /// True if the run left the catalog untouched.
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.updated == 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} skipped, {} failed",
            self.created, self.updated, self.skipped, self.failed
        )
    }
}

impl PassReport {
    pub fn items(&self) -> impl Iterator<Item = &ItemReport> {
        self.aliases
            .iter()
            .chain(&self.tags)
            .chain(&self.tools)
            .chain(&self.repositories)
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for item in self.items() {
            match item.outcome {
                Outcome::Created => summary.created += 1,
                Outcome::Updated => summary.updated += 1,
                Outcome::Skipped(_) => summary.skipped += 1,
                Outcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Handles to upsert passes spawned in detached mode.
///
/// Dropping this value does not cancel the passes.
#[derive(Debug)]
pub struct DetachedPasses {
    pub(crate) aliases: JoinHandle<Vec<ItemReport>>,
    pub(crate) tags: JoinHandle<Vec<ItemReport>>,
    pub(crate) tools: JoinHandle<Vec<ItemReport>>,
    pub(crate) repositories: JoinHandle<Vec<ItemReport>>,
}

impl DetachedPasses {
    /// Waits for every pass and collects their outcomes.
    ///
    /// A pass that panicked contributes no items.
    pub async fn join(self) -> PassReport {
        PassReport {
            aliases: collect("aliases", self.aliases).await,
            tags: collect("tags", self.tags).await,
            tools: collect("tools", self.tools).await,
            repositories: collect("repositories", self.repositories).await,
        }
    }
}

async fn collect(pass: &str, handle: JoinHandle<Vec<ItemReport>>) -> Vec<ItemReport> {
    match handle.await {
        Ok(items) => items,
        Err(e) => {
            error!("{} pass did not complete: {}", pass, e);
            Vec::new()
        }
    }
}

impl Passes {
    /// Outcomes of the passes, waiting for them if they were detached.
    pub async fn wait(self) -> PassReport {
        match self {
            Passes::Completed(report) => report,
            Passes::Detached(handles) => handles.join().await,
        }
    }
}

impl ReconcileReport {
    pub fn is_aborted(&self) -> bool {
        matches!(self, ReconcileReport::Aborted { .. })
    }

    pub fn reconciliation(&self) -> Option<&Reconciliation> {
        match self {
            ReconcileReport::Reconciled(r) => Some(r),
            ReconcileReport::Aborted { .. } => None,
        }
    }

    /// Completed pass outcomes; `None` when aborted or detached.
    pub fn passes(&self) -> Option<&PassReport> {
        match self.reconciliation()?.passes {
            Passes::Completed(ref report) => Some(report),
            Passes::Detached(_) => None,
        }
    }

    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match self {
            ReconcileReport::Aborted { reason, .. } => Some(reason),
            ReconcileReport::Reconciled(_) => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Alias(alias) => write!(f, "alias '{alias}'"),
            Subject::TagAssign(tags) => {
                let json = serde_json::to_string(tags).map_err(|_| fmt::Error)?;
                write!(f, "tags {json}")
            }
            Subject::Tag(tag) => write!(f, "tag '{} = {}'", tag.key, tag.value),
            Subject::Tool(tool) => write!(
                f,
                "tool '{{Category: {}, Environment: {}, Name: {}}}'",
                tool.category, tool.environment, tool.display_name
            ),
            Subject::Repository(repo) => write!(f, "repository '{repo}'"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created => f.write_str("created"),
            Outcome::Updated => f.write_str("updated"),
            Outcome::Skipped(reason) => write!(f, "skipped ({reason})"),
            Outcome::Failed(e) => write!(f, "failed ({e})"),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::Empty => "empty",
            SkipReason::AlreadyExists => "already exists",
            SkipReason::Unchanged => "unchanged",
            SkipReason::RepositoryNotFound => "repository not found",
        };
        f.write_str(text)
    }
}
