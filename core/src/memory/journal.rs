use catsync_common::catalog::inputs::{
    AliasCreateInput, ServiceCreateInput, ServiceRepositoryCreateInput,
    ServiceRepositoryUpdateInput, ServiceUpdateInput, TagAssignInput, TagCreateInput,
    ToolCreateInput,
};

/// A call received by the in-memory catalog, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    GetServiceWithAlias(String),
    CreateService(ServiceCreateInput),
    UpdateService(ServiceUpdateInput),
    CreateAlias(AliasCreateInput),
    AssignTags(TagAssignInput),
    CreateTag(TagCreateInput),
    CreateTool(ToolCreateInput),
    GetRepositoryWithAlias(String),
    CreateServiceRepository(ServiceRepositoryCreateInput),
    UpdateServiceRepository(ServiceRepositoryUpdateInput),
    ListTiers,
    ListLifecycles,
    ListTeams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetServiceWithAlias,
    CreateService,
    UpdateService,
    CreateAlias,
    AssignTags,
    CreateTag,
    CreateTool,
    GetRepositoryWithAlias,
    CreateServiceRepository,
    UpdateServiceRepository,
    ListTiers,
    ListLifecycles,
    ListTeams,
}

impl CatalogCall {
    pub fn operation(&self) -> Operation {
        match self {
            CatalogCall::GetServiceWithAlias(_) => Operation::GetServiceWithAlias,
            CatalogCall::CreateService(_) => Operation::CreateService,
            CatalogCall::UpdateService(_) => Operation::UpdateService,
            CatalogCall::CreateAlias(_) => Operation::CreateAlias,
            CatalogCall::AssignTags(_) => Operation::AssignTags,
            CatalogCall::CreateTag(_) => Operation::CreateTag,
            CatalogCall::CreateTool(_) => Operation::CreateTool,
            CatalogCall::GetRepositoryWithAlias(_) => Operation::GetRepositoryWithAlias,
            CatalogCall::CreateServiceRepository(_) => Operation::CreateServiceRepository,
            CatalogCall::UpdateServiceRepository(_) => Operation::UpdateServiceRepository,
            CatalogCall::ListTiers => Operation::ListTiers,
            CatalogCall::ListLifecycles => Operation::ListLifecycles,
            CatalogCall::ListTeams => Operation::ListTeams,
        }
    }

    /// The value identifying what the call is about: an alias, a service name,
    /// a tag key, a tool name or an id.
    pub fn key(&self) -> &str {
        match self {
            CatalogCall::GetServiceWithAlias(alias) => alias,
            CatalogCall::CreateService(input) => &input.name,
            CatalogCall::UpdateService(input) => input.id.as_str(),
            CatalogCall::CreateAlias(input) => &input.alias,
            CatalogCall::AssignTags(input) => input.id.as_str(),
            CatalogCall::CreateTag(input) => &input.key,
            CatalogCall::CreateTool(input) => &input.display_name,
            CatalogCall::GetRepositoryWithAlias(alias) => alias,
            CatalogCall::CreateServiceRepository(input) => &input.repository_alias,
            CatalogCall::UpdateServiceRepository(input) => input.id.as_str(),
            CatalogCall::ListTiers | CatalogCall::ListLifecycles | CatalogCall::ListTeams => "",
        }
    }
}

impl Operation {
    /// True for calls that change catalog state.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Operation::GetServiceWithAlias
                | Operation::GetRepositoryWithAlias
                | Operation::ListTiers
                | Operation::ListLifecycles
                | Operation::ListTeams
        )
    }
}

/// Makes matching calls fail. A rule without key matches every call of its operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FailureRule {
    pub operation: Operation,
    pub key: Option<String>,
}

impl FailureRule {
    pub fn matches(&self, call: &CatalogCall) -> bool {
        self.operation == call.operation()
            && self.key.as_deref().is_none_or(|key| key == call.key())
    }
}
