//! Reading and writing the JSON files the CLI works on.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use catsync_common::registration::ServiceRegistration;
use catsync_core::CatalogSnapshot;
use tracing::debug;

pub fn load_registrations(path: &Path) -> anyhow::Result<Vec<ServiceRegistration>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read registrations from {}", path.display()))?;
    let registrations: Vec<ServiceRegistration> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of registrations", path.display()))?;
    debug!("Loaded {} registrations from {}", registrations.len(), path.display());
    Ok(registrations)
}

/// Loads a catalog snapshot. A file that does not exist yet is an empty catalog.
pub fn load_catalog(path: &Path) -> anyhow::Result<CatalogSnapshot> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No catalog at {}, starting empty", path.display());
            return Ok(CatalogSnapshot::default());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read catalog from {}", path.display()));
        }
    };
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid catalog snapshot", path.display()))
}

pub fn save_catalog(path: &Path, snapshot: &CatalogSnapshot) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json + "\n")
        .with_context(|| format!("failed to write catalog to {}", path.display()))?;
    debug!("Catalog written to {}", path.display());
    Ok(())
}
