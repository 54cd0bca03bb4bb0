use catsync_common::aliases::AliasResolver;
use catsync_common::catalog::CatalogService;
use catsync_common::catalog::inputs::{ServiceCreateInput, ServiceUpdateInput, non_empty};
use catsync_common::client::{CatalogClient, CatalogResult};
use catsync_common::registration::ServiceRegistration;
use tracing::{error, info};

use crate::report::EntryOutcome;

/// Tier, lifecycle and owner aliases the catalog knows about.
///
/// Values that do not resolve are left out of the request.
struct Resolved {
    tier: Option<String>,
    lifecycle: Option<String>,
    owner: Option<String>,
}

fn resolve(aliases: &dyn AliasResolver, registration: &ServiceRegistration) -> Resolved {
    Resolved {
        tier: aliases.try_get_tier(&registration.tier).map(|t| t.alias),
        lifecycle: aliases
            .try_get_lifecycle(&registration.lifecycle)
            .map(|l| l.alias),
        owner: aliases.try_get_team(&registration.owner).map(|t| t.alias),
    }
}

pub(super) fn create_input(
    aliases: &dyn AliasResolver,
    registration: &ServiceRegistration,
) -> ServiceCreateInput {
    let resolved = resolve(aliases, registration);
    ServiceCreateInput {
        name: registration.name.clone(),
        product: non_empty(&registration.product),
        description: non_empty(&registration.description),
        language: non_empty(&registration.language),
        framework: non_empty(&registration.framework),
        tier: resolved.tier,
        lifecycle: resolved.lifecycle,
        owner: resolved.owner,
    }
}

pub(super) fn update_input(
    aliases: &dyn AliasResolver,
    registration: &ServiceRegistration,
    service: &CatalogService,
) -> ServiceUpdateInput {
    let resolved = resolve(aliases, registration);
    ServiceUpdateInput {
        id: service.id.clone(),
        product: non_empty(&registration.product),
        description: non_empty(&registration.description),
        language: non_empty(&registration.language),
        framework: non_empty(&registration.framework),
        tier: resolved.tier,
        lifecycle: resolved.lifecycle,
        owner: resolved.owner,
    }
}

pub(super) async fn create_service(
    client: &dyn CatalogClient,
    aliases: &dyn AliasResolver,
    registration: &ServiceRegistration,
) -> CatalogResult<CatalogService> {
    match client.create_service(create_input(aliases, registration)).await {
        Ok(service) => {
            info!("[{}] Created new service", service.name);
            Ok(service)
        }
        Err(e) => {
            error!("[{}] Failed creating service: {}", registration.name, e);
            Err(e)
        }
    }
}

/// Best-effort update of an existing entry.
///
/// Returns the updated entry, or the one that was found if the update failed.
pub(super) async fn update_service(
    client: &dyn CatalogClient,
    aliases: &dyn AliasResolver,
    registration: &ServiceRegistration,
    service: CatalogService,
) -> (CatalogService, EntryOutcome) {
    let input = update_input(aliases, registration, &service);
    match client.update_service(input).await {
        Ok(updated) => {
            let changes = service.diff(&updated);
            if !changes.is_empty() {
                let lines: Vec<String> = changes.iter().map(|c| format!("\t{c}")).collect();
                info!(
                    "[{}] Updated Service - Diff:\n{}",
                    service.name,
                    lines.join("\n")
                );
            }
            (updated, EntryOutcome::Updated { changes })
        }
        Err(e) => {
            error!("[{}] Failed updating service: {}", service.name, e);
            (service, EntryOutcome::UpdateFailed { error: e })
        }
    }
}
