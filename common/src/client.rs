//! # Catalog Client Port
//!
//! The contract for talking to the remote service catalog. The reconciler only
//! ever depends on this trait; connection handling, authentication, retries and
//! the wire format all belong to the implementation.

use async_trait::async_trait;

use crate::catalog::inputs::{
    AliasCreateInput, ServiceCreateInput, ServiceRepositoryCreateInput,
    ServiceRepositoryUpdateInput, ServiceUpdateInput, TagAssignInput, TagCreateInput,
    ToolCreateInput,
};
use crate::catalog::{
    CatalogService, Lifecycle, Repository, ServiceRepository, Tag, Team, Tier, Tool,
};
use crate::error::CatalogError;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Resolves the service owning `alias`.
    async fn get_service_with_alias(&self, alias: &str) -> CatalogResult<CatalogService>;

    async fn create_service(&self, input: ServiceCreateInput) -> CatalogResult<CatalogService>;

    async fn update_service(&self, input: ServiceUpdateInput) -> CatalogResult<CatalogService>;

    /// Attaches an alias and returns every alias of the owner afterwards.
    async fn create_alias(&self, input: AliasCreateInput) -> CatalogResult<Vec<String>>;

    /// Assigns the whole mapping in one request and returns the resulting tags.
    async fn assign_tags(&self, input: TagAssignInput) -> CatalogResult<Vec<Tag>>;

    async fn create_tag(&self, input: TagCreateInput) -> CatalogResult<Tag>;

    async fn create_tool(&self, input: ToolCreateInput) -> CatalogResult<Tool>;

    async fn get_repository_with_alias(&self, alias: &str) -> CatalogResult<Repository>;

    async fn create_service_repository(
        &self,
        input: ServiceRepositoryCreateInput,
    ) -> CatalogResult<ServiceRepository>;

    async fn update_service_repository(
        &self,
        input: ServiceRepositoryUpdateInput,
    ) -> CatalogResult<ServiceRepository>;

    async fn list_tiers(&self) -> CatalogResult<Vec<Tier>>;

    async fn list_lifecycles(&self) -> CatalogResult<Vec<Lifecycle>>;

    async fn list_teams(&self) -> CatalogResult<Vec<Team>>;
}
