use catsync_common::catalog::CatalogService;
use catsync_common::client::CatalogClient;
use catsync_common::registration::ServiceRegistration;
use tracing::{debug, info};

/// Tries every alias in order and returns the first entry that resolves.
///
/// There is no fallback search by registration name.
pub(super) async fn find_service(
    client: &dyn CatalogClient,
    registration: &ServiceRegistration,
) -> Option<CatalogService> {
    for alias in registration.aliases.iter().filter(|a| !a.is_empty()) {
        match client.get_service_with_alias(alias).await {
            Ok(service) if !service.id.is_empty() => {
                info!(
                    "[{}] Reconciling service found with alias '{}' ...",
                    service.name, alias
                );
                return Some(service);
            }
            Ok(_) => debug!(
                "[{}] alias '{}' resolved to a service without id",
                registration.label(),
                alias
            ),
            Err(e) => debug!("[{}] alias '{}': {}", registration.label(), alias, e),
        }
    }
    None
}
