//! # In-Memory Catalog
//!
//! A [`CatalogClient`] keeping the whole catalog in process memory.
//!
//! It backs offline runs of the CLI (state is loaded from and written back to a
//! JSON [`CatalogSnapshot`]) and serves as the catalog double in tests. Every
//! call is recorded in a journal, so callers can check exactly what the
//! reconciler sent.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use catsync_common::catalog::inputs::{
    AliasCreateInput, ServiceCreateInput, ServiceRepositoryCreateInput,
    ServiceRepositoryUpdateInput, ServiceUpdateInput, TagAssignInput, TagCreateInput,
    ToolCreateInput,
};
use catsync_common::catalog::{
    CatalogService, Id, Lifecycle, Repository, ServiceRepository, Tag, Team, Tier, Tool,
};
use catsync_common::client::{CatalogClient, CatalogResult};
use catsync_common::error::CatalogError;
use serde::{Deserialize, Serialize};

mod journal;

pub use journal::{CatalogCall, Operation};
use journal::FailureRule;

/// Serializable state of an [`InMemoryCatalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub services: Vec<CatalogService>,
    #[serde(default)]
    pub repositories: Vec<Repository>,
    #[serde(default)]
    pub tiers: Vec<Tier>,
    #[serde(default)]
    pub lifecycles: Vec<Lifecycle>,
    #[serde(default)]
    pub teams: Vec<Team>,
    /// Last numeric id suffix handed out.
    #[serde(default)]
    pub last_id: u64,
}

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogSnapshot>,
    journal: Mutex<Vec<CatalogCall>>,
    failures: Mutex<Vec<FailureRule>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(mut snapshot: CatalogSnapshot) -> Self {
        // Attachments live on the repositories; services only carry a view of them.
        for service in &mut snapshot.services {
            service.repositories.clear();
        }
        snapshot.last_id = snapshot.last_id.max(highest_id(&snapshot));
        Self {
            state: Mutex::new(snapshot),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.state().clone()
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<CatalogCall> {
        lock(&self.journal).clone()
    }

    /// Calls that changed (or tried to change) catalog state.
    pub fn mutations(&self) -> Vec<CatalogCall> {
        lock(&self.journal)
            .iter()
            .filter(|c| c.operation().is_mutation())
            .cloned()
            .collect()
    }

    pub fn count(&self, operation: Operation) -> usize {
        lock(&self.journal)
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    pub fn clear_calls(&self) {
        lock(&self.journal).clear();
    }

    /// Rejects every call of `operation`, or only those about `key` when given.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn fail_on(&self, operation: Operation, key: Option<&str>) {
        lock(&self.failures).push(FailureRule {
            operation,
            key: key.map(str::to_string),
        });
    }

    fn state(&self) -> MutexGuard<'_, CatalogSnapshot> {
        lock(&self.state)
    }

    /// Journals the call and applies failure rules.
    fn begin(&self, call: CatalogCall) -> CatalogResult<()> {
        let failed = lock(&self.failures).iter().any(|rule| rule.matches(&call));
        let operation = call.operation();
        lock(&self.journal).push(call);
        if failed {
            return Err(CatalogError::rejected(format!(
                "{operation:?} refused by the catalog"
            )));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CatalogSnapshot {
    fn next_id(&mut self, prefix: &str) -> Id {
        self.last_id += 1;
        Id(format!("{prefix}-{}", self.last_id))
    }

    fn service_mut(&mut self, id: &Id) -> CatalogResult<&mut CatalogService> {
        self.services
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| CatalogError::not_found("service", id.as_str()))
    }

    /// A service as the catalog reports it, with its repository attachments.
    fn view(&self, service: &CatalogService) -> CatalogService {
        let mut view = service.clone();
        view.repositories = self
            .repositories
            .iter()
            .flat_map(|r| &r.services)
            .filter(|sr| sr.service_id == service.id)
            .cloned()
            .collect();
        view
    }

    fn view_by_id(&self, id: &Id) -> CatalogResult<CatalogService> {
        self.services
            .iter()
            .find(|s| &s.id == id)
            .map(|s| self.view(s))
            .ok_or_else(|| CatalogError::not_found("service", id.as_str()))
    }
}

fn highest_id(snapshot: &CatalogSnapshot) -> u64 {
    let services = snapshot.services.iter().flat_map(|s| {
        std::iter::once(&s.id)
            .chain(s.tags.iter().map(|t| &t.id))
            .chain(s.tools.iter().map(|t| &t.id))
    });
    let repositories = snapshot
        .repositories
        .iter()
        .flat_map(|r| std::iter::once(&r.id).chain(r.services.iter().map(|sr| &sr.id)));
    let reference = snapshot
        .tiers
        .iter()
        .map(|t| &t.id)
        .chain(snapshot.lifecycles.iter().map(|l| &l.id))
        .chain(snapshot.teams.iter().map(|t| &t.id));

    services
        .chain(repositories)
        .chain(reference)
        .filter_map(|id| id.as_str().rsplit('-').next()?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn get_service_with_alias(&self, alias: &str) -> CatalogResult<CatalogService> {
        self.begin(CatalogCall::GetServiceWithAlias(alias.to_string()))?;
        let state = self.state();
        state
            .services
            .iter()
            .find(|s| s.has_alias(alias))
            .map(|s| state.view(s))
            .ok_or_else(|| CatalogError::not_found("service", alias))
    }

    async fn create_service(&self, input: ServiceCreateInput) -> CatalogResult<CatalogService> {
        self.begin(CatalogCall::CreateService(input.clone()))?;
        if input.name.is_empty() {
            return Err(CatalogError::rejected("service name must not be empty"));
        }
        let mut state = self.state();
        if state.services.iter().any(|s| s.name == input.name) {
            return Err(CatalogError::already_exists("service", input.name));
        }

        let service = CatalogService {
            id: state.next_id("svc"),
            name: input.name,
            product: input.product,
            description: input.description,
            language: input.language,
            framework: input.framework,
            tier: input.tier,
            lifecycle: input.lifecycle,
            owner: input.owner,
            ..CatalogService::default()
        };
        state.services.push(service.clone());
        Ok(service)
    }

    async fn update_service(&self, input: ServiceUpdateInput) -> CatalogResult<CatalogService> {
        self.begin(CatalogCall::UpdateService(input.clone()))?;
        let mut state = self.state();
        let service = state.service_mut(&input.id)?;

        let fields = [
            (&mut service.product, input.product),
            (&mut service.description, input.description),
            (&mut service.language, input.language),
            (&mut service.framework, input.framework),
            (&mut service.tier, input.tier),
            (&mut service.lifecycle, input.lifecycle),
            (&mut service.owner, input.owner),
        ];
        for (field, value) in fields {
            if value.is_some() {
                *field = value;
            }
        }

        state.view_by_id(&input.id)
    }

    async fn create_alias(&self, input: AliasCreateInput) -> CatalogResult<Vec<String>> {
        self.begin(CatalogCall::CreateAlias(input.clone()))?;
        let mut state = self.state();
        if state.services.iter().any(|s| s.has_alias(&input.alias)) {
            return Err(CatalogError::already_exists("alias", input.alias));
        }
        let service = state.service_mut(&input.owner_id)?;
        service.aliases.push(input.alias);
        Ok(service.aliases.clone())
    }

    async fn assign_tags(&self, input: TagAssignInput) -> CatalogResult<Vec<Tag>> {
        self.begin(CatalogCall::AssignTags(input.clone()))?;
        let mut state = self.state();
        state.service_mut(&input.id)?;

        for (key, value) in input.tags {
            let service = state.service_mut(&input.id)?;
            if let Some(tag) = service.tags.iter_mut().find(|t| t.key == key) {
                tag.value = value;
                continue;
            }
            let id = state.next_id("tag");
            state.service_mut(&input.id)?.tags.push(Tag { id, key, value });
        }
        Ok(state.service_mut(&input.id)?.tags.clone())
    }

    async fn create_tag(&self, input: TagCreateInput) -> CatalogResult<Tag> {
        self.begin(CatalogCall::CreateTag(input.clone()))?;
        let mut state = self.state();
        if state.service_mut(&input.id)?.has_tag(&input.key, &input.value) {
            return Err(CatalogError::already_exists(
                "tag",
                format!("{}={}", input.key, input.value),
            ));
        }

        let tag = Tag {
            id: state.next_id("tag"),
            key: input.key,
            value: input.value,
        };
        state.service_mut(&input.id)?.tags.push(tag.clone());
        Ok(tag)
    }

    async fn create_tool(&self, input: ToolCreateInput) -> CatalogResult<Tool> {
        self.begin(CatalogCall::CreateTool(input.clone()))?;
        let mut state = self.state();
        state.service_mut(&input.service_id)?;

        let tool = Tool {
            id: state.next_id("tool"),
            category: input.category,
            display_name: input.display_name,
            environment: input.environment.unwrap_or_default(),
            url: input.url,
        };
        state.service_mut(&input.service_id)?.tools.push(tool.clone());
        Ok(tool)
    }

    async fn get_repository_with_alias(&self, alias: &str) -> CatalogResult<Repository> {
        self.begin(CatalogCall::GetRepositoryWithAlias(alias.to_string()))?;
        self.state()
            .repositories
            .iter()
            .find(|r| r.alias == alias)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("repository", alias))
    }

    async fn create_service_repository(
        &self,
        input: ServiceRepositoryCreateInput,
    ) -> CatalogResult<ServiceRepository> {
        self.begin(CatalogCall::CreateServiceRepository(input.clone()))?;
        let mut state = self.state();
        state.service_mut(&input.service_id)?;

        let base_directory = input.base_directory.unwrap_or_default();
        let repository = state
            .repositories
            .iter()
            .position(|r| r.alias == input.repository_alias)
            .ok_or_else(|| CatalogError::not_found("repository", &input.repository_alias))?;
        if state.repositories[repository]
            .get_service(&input.service_id, &base_directory)
            .is_some()
        {
            return Err(CatalogError::already_exists(
                "service repository",
                format!("{}:{}", input.repository_alias, base_directory),
            ));
        }

        let id = state.next_id("sr");
        let repository = &mut state.repositories[repository];
        let attachment = ServiceRepository {
            id,
            service_id: input.service_id,
            repository_id: repository.id.clone(),
            base_directory,
            display_name: input
                .display_name
                .unwrap_or_else(|| repository.name.clone()),
        };
        repository.services.push(attachment.clone());
        Ok(attachment)
    }

    async fn update_service_repository(
        &self,
        input: ServiceRepositoryUpdateInput,
    ) -> CatalogResult<ServiceRepository> {
        self.begin(CatalogCall::UpdateServiceRepository(input.clone()))?;
        let mut state = self.state();
        let attachment = state
            .repositories
            .iter_mut()
            .flat_map(|r| r.services.iter_mut())
            .find(|sr| sr.id == input.id)
            .ok_or_else(|| CatalogError::not_found("service repository", input.id.as_str()))?;
        attachment.display_name = input.display_name;
        Ok(attachment.clone())
    }

    async fn list_tiers(&self) -> CatalogResult<Vec<Tier>> {
        self.begin(CatalogCall::ListTiers)?;
        Ok(self.state().tiers.clone())
    }

    async fn list_lifecycles(&self) -> CatalogResult<Vec<Lifecycle>> {
        self.begin(CatalogCall::ListLifecycles)?;
        Ok(self.state().lifecycles.clone())
    }

    async fn list_teams(&self) -> CatalogResult<Vec<Team>> {
        self.begin(CatalogCall::ListTeams)?;
        Ok(self.state().teams.clone())
    }
}
