use crate::catalog::{Lifecycle, Team, Tier};

/// Resolves the free-form tier, lifecycle and owner values of a registration
/// to catalog reference data.
pub trait AliasResolver: Send + Sync {
    /// Retrieves the tier known under `alias`.
    ///
    /// # Returns
    /// * `Some(Tier)` - If the alias is known.
    /// * `None` - If it is unknown or empty.
    fn try_get_tier(&self, alias: &str) -> Option<Tier>;

    fn try_get_lifecycle(&self, alias: &str) -> Option<Lifecycle>;

    fn try_get_team(&self, alias: &str) -> Option<Team>;
}
