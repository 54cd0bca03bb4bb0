//! # Alias Cache
//!
//! An [`AliasResolver`] backed by alias-keyed maps of tiers, lifecycles and
//! teams. It is populated once (usually from the catalog itself through
//! [`AliasCache::load`]) and then handed to the reconciler.

use std::collections::HashMap;

use catsync_common::aliases::AliasResolver;
use catsync_common::catalog::{Lifecycle, Team, Tier};
use catsync_common::client::{CatalogClient, CatalogResult};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct AliasCache {
    tiers: HashMap<String, Tier>,
    lifecycles: HashMap<String, Lifecycle>,
    teams: HashMap<String, Team>,
}

impl AliasCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches tiers, lifecycles and teams from the catalog.
    pub async fn load(client: &dyn CatalogClient) -> CatalogResult<Self> {
        let cache = Self::new()
            .with_tiers(client.list_tiers().await?)
            .with_lifecycles(client.list_lifecycles().await?)
            .with_teams(client.list_teams().await?);
        debug!(
            "alias cache loaded: {} tiers, {} lifecycles, {} teams",
            cache.tiers.len(),
            cache.lifecycles.len(),
            cache.teams.len()
        );
        Ok(cache)
    }

    pub fn with_tiers(mut self, tiers: impl IntoIterator<Item = Tier>) -> Self {
        self.tiers
            .extend(tiers.into_iter().map(|t| (t.alias.clone(), t)));
        self
    }

    pub fn with_lifecycles(mut self, lifecycles: impl IntoIterator<Item = Lifecycle>) -> Self {
        self.lifecycles
            .extend(lifecycles.into_iter().map(|l| (l.alias.clone(), l)));
        self
    }

    pub fn with_teams(mut self, teams: impl IntoIterator<Item = Team>) -> Self {
        self.teams
            .extend(teams.into_iter().map(|t| (t.alias.clone(), t)));
        self
    }

    /// Tiers ordered by index.
    pub fn tiers(&self) -> Vec<&Tier> {
        let mut tiers: Vec<&Tier> = self.tiers.values().collect();
        tiers.sort_by(|a, b| (a.index, &a.alias).cmp(&(b.index, &b.alias)));
        tiers
    }

    /// Lifecycles ordered by index.
    pub fn lifecycles(&self) -> Vec<&Lifecycle> {
        let mut lifecycles: Vec<&Lifecycle> = self.lifecycles.values().collect();
        lifecycles.sort_by(|a, b| (a.index, &a.alias).cmp(&(b.index, &b.alias)));
        lifecycles
    }

    /// Teams ordered by alias.
    pub fn teams(&self) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.teams.values().collect();
        teams.sort_by(|a, b| a.alias.cmp(&b.alias));
        teams
    }
}

impl AliasResolver for AliasCache {
    fn try_get_tier(&self, alias: &str) -> Option<Tier> {
        if alias.is_empty() {
            return None;
        }
        self.tiers.get(alias).cloned()
    }

    fn try_get_lifecycle(&self, alias: &str) -> Option<Lifecycle> {
        if alias.is_empty() {
            return None;
        }
        self.lifecycles.get(alias).cloned()
    }

    fn try_get_team(&self, alias: &str) -> Option<Team> {
        if alias.is_empty() {
            return None;
        }
        self.teams.get(alias).cloned()
    }
}
