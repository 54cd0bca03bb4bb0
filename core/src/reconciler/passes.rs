//! The four upsert passes.
//!
//! Each pass walks its part of the registration sequentially. Every item is
//! failure-isolated: an error is logged and recorded, then the pass moves on.
//! Items attached earlier in the same pass count as existing for the ones that
//! follow, so duplicates in a registration are only sent once.

use std::collections::HashSet;
use std::sync::Arc;

use catsync_common::catalog::CatalogService;
use catsync_common::catalog::inputs::{
    AliasCreateInput, ServiceRepositoryCreateInput, ServiceRepositoryUpdateInput, TagAssignInput,
    TagCreateInput, ToolCreateInput, non_empty,
};
use catsync_common::client::CatalogClient;
use catsync_common::registration::ServiceRegistration;
use tracing::{debug, error, info, warn};

use crate::report::{DetachedPasses, ItemReport, Outcome, PassReport, SkipReason, Subject};

/// Runs all passes concurrently and waits for every one of them.
pub(super) async fn run(
    client: &dyn CatalogClient,
    registration: &ServiceRegistration,
    service: &CatalogService,
) -> PassReport {
    let (aliases, tags, tools, repositories) = tokio::join!(
        upsert_aliases(client, registration, service),
        upsert_tags(client, registration, service),
        upsert_tools(client, registration, service),
        upsert_repositories(client, registration, service),
    );
    PassReport {
        aliases,
        tags,
        tools,
        repositories,
    }
}

/// Spawns every pass on the runtime and returns without waiting.
pub(super) fn dispatch(
    client: Arc<dyn CatalogClient>,
    registration: Arc<ServiceRegistration>,
    service: Arc<CatalogService>,
) -> DetachedPasses {
    macro_rules! spawn_pass {
        ($pass:ident) => {{
            let client = client.clone();
            let registration = registration.clone();
            let service = service.clone();
            tokio::spawn(async move { $pass(client.as_ref(), &registration, &service).await })
        }};
    }

    DetachedPasses {
        aliases: spawn_pass!(upsert_aliases),
        tags: spawn_pass!(upsert_tags),
        tools: spawn_pass!(upsert_tools),
        repositories: spawn_pass!(upsert_repositories),
    }
}

pub(super) async fn upsert_aliases(
    client: &dyn CatalogClient,
    registration: &ServiceRegistration,
    service: &CatalogService,
) -> Vec<ItemReport> {
    let mut reports = Vec::with_capacity(registration.aliases.len());
    let mut attached: HashSet<&str> = HashSet::new();

    for alias in &registration.aliases {
        let subject = Subject::Alias(alias.clone());
        if alias.is_empty() {
            reports.push(ItemReport::new(subject, Outcome::Skipped(SkipReason::Empty)));
            continue;
        }
        if service.has_alias(alias) || attached.contains(alias.as_str()) {
            reports.push(ItemReport::new(
                subject,
                Outcome::Skipped(SkipReason::AlreadyExists),
            ));
            continue;
        }

        let input = AliasCreateInput {
            alias: alias.clone(),
            owner_id: service.id.clone(),
        };
        let outcome = match client.create_alias(input).await {
            Ok(_) => {
                info!("[{}] Assigned alias '{}'", service.name, alias);
                attached.insert(alias.as_str());
                Outcome::Created
            }
            Err(e) => {
                error!("[{}] Failed assigning alias '{}': {}", service.name, alias, e);
                Outcome::Failed(e)
            }
        };
        reports.push(ItemReport::new(subject, outcome));
    }
    reports
}

/// Batch assign first, then the explicit creates. Neither depends on the other.
pub(super) async fn upsert_tags(
    client: &dyn CatalogClient,
    registration: &ServiceRegistration,
    service: &CatalogService,
) -> Vec<ItemReport> {
    let mut reports = Vec::with_capacity(registration.tag_creates.len() + 1);
    if let Some(report) = assign_tags(client, registration, service).await {
        reports.push(report);
    }
    reports.extend(create_tags(client, registration, service).await);
    reports
}

async fn assign_tags(
    client: &dyn CatalogClient,
    registration: &ServiceRegistration,
    service: &CatalogService,
) -> Option<ItemReport> {
    let tags = registration.tag_assigns.as_ref()?;
    let subject = Subject::TagAssign(tags.clone());

    let input = TagAssignInput {
        id: service.id.clone(),
        tags: tags.clone(),
    };
    let outcome = match client.assign_tags(input).await {
        Ok(_) => {
            info!("[{}] Assigned {}", service.name, subject);
            Outcome::Updated
        }
        Err(e) => {
            error!("[{}] Failed assigning {}: {}", service.name, subject, e);
            Outcome::Failed(e)
        }
    };
    Some(ItemReport::new(subject, outcome))
}

async fn create_tags(
    client: &dyn CatalogClient,
    registration: &ServiceRegistration,
    service: &CatalogService,
) -> Vec<ItemReport> {
    let mut reports = Vec::with_capacity(registration.tag_creates.len());
    let mut created: HashSet<(&str, &str)> = HashSet::new();

    for tag in &registration.tag_creates {
        let subject = Subject::Tag(tag.clone());
        if service.has_tag(&tag.key, &tag.value)
            || created.contains(&(tag.key.as_str(), tag.value.as_str()))
        {
            reports.push(ItemReport::new(
                subject,
                Outcome::Skipped(SkipReason::AlreadyExists),
            ));
            continue;
        }

        let input = TagCreateInput {
            id: service.id.clone(),
            key: tag.key.clone(),
            value: tag.value.clone(),
        };
        let outcome = match client.create_tag(input).await {
            Ok(_) => {
                info!("[{}] Created {}", service.name, subject);
                created.insert((tag.key.as_str(), tag.value.as_str()));
                Outcome::Created
            }
            Err(e) => {
                error!("[{}] Failed creating {}: {}", service.name, subject, e);
                Outcome::Failed(e)
            }
        };
        reports.push(ItemReport::new(subject, outcome));
    }
    reports
}

pub(super) async fn upsert_tools(
    client: &dyn CatalogClient,
    registration: &ServiceRegistration,
    service: &CatalogService,
) -> Vec<ItemReport> {
    let mut reports = Vec::with_capacity(registration.tools.len());
    let mut created: HashSet<(&str, &str, &str)> = HashSet::new();

    for tool in &registration.tools {
        let subject = Subject::Tool(tool.clone());
        let triple = (
            tool.category.as_str(),
            tool.display_name.as_str(),
            tool.environment.as_str(),
        );
        if service.has_tool(triple.0, triple.1, triple.2) || created.contains(&triple) {
            debug!(
                "[{}] {} already exists on service ... skipping",
                service.name, subject
            );
            reports.push(ItemReport::new(
                subject,
                Outcome::Skipped(SkipReason::AlreadyExists),
            ));
            continue;
        }

        let input = ToolCreateInput {
            category: tool.category.clone(),
            display_name: tool.display_name.clone(),
            environment: non_empty(&tool.environment),
            url: tool.url.clone(),
            service_id: service.id.clone(),
        };
        let outcome = match client.create_tool(input).await {
            Ok(_) => {
                info!("[{}] Ensured {}", service.name, subject);
                created.insert(triple);
                Outcome::Created
            }
            Err(e) => {
                error!("[{}] Failed assigning {}: {}", service.name, subject, e);
                Outcome::Failed(e)
            }
        };
        reports.push(ItemReport::new(subject, outcome));
    }
    reports
}

pub(super) async fn upsert_repositories(
    client: &dyn CatalogClient,
    registration: &ServiceRegistration,
    service: &CatalogService,
) -> Vec<ItemReport> {
    let mut reports = Vec::with_capacity(registration.repositories.len());

    for descriptor in &registration.repositories {
        let subject = Subject::Repository(descriptor.clone());

        let repository = match client.get_repository_with_alias(&descriptor.repository).await {
            Ok(repository) => repository,
            Err(e) => {
                warn!(
                    "[{}] Repository with alias: '{}' not found so it cannot be attached to service ... skipping ({})",
                    service.name, descriptor, e
                );
                reports.push(ItemReport::new(
                    subject,
                    Outcome::Skipped(SkipReason::RepositoryNotFound),
                ));
                continue;
            }
        };

        let outcome = match repository.get_service(&service.id, &descriptor.base_directory) {
            Some(attached)
                if !descriptor.display_name.is_empty()
                    && attached.display_name != descriptor.display_name =>
            {
                let input = ServiceRepositoryUpdateInput {
                    id: attached.id.clone(),
                    display_name: descriptor.display_name.clone(),
                };
                match client.update_service_repository(input).await {
                    Ok(_) => {
                        info!("[{}] Updated {}", service.name, subject);
                        Outcome::Updated
                    }
                    Err(e) => {
                        error!("[{}] Failed updating {}: {}", service.name, subject, e);
                        Outcome::Failed(e)
                    }
                }
            }
            Some(_) => {
                debug!(
                    "[{}] {} already attached to service ... skipping",
                    service.name, subject
                );
                Outcome::Skipped(SkipReason::Unchanged)
            }
            None => {
                let input = ServiceRepositoryCreateInput {
                    repository_alias: descriptor.repository.clone(),
                    base_directory: non_empty(&descriptor.base_directory),
                    display_name: non_empty(&descriptor.display_name),
                    service_id: service.id.clone(),
                };
                match client.create_service_repository(input).await {
                    Ok(_) => {
                        info!("[{}] Attached {}", service.name, subject);
                        Outcome::Created
                    }
                    Err(e) => {
                        error!("[{}] Failed assigning {}: {}", service.name, subject, e);
                        Outcome::Failed(e)
                    }
                }
            }
        };
        reports.push(ItemReport::new(subject, outcome));
    }
    reports
}
