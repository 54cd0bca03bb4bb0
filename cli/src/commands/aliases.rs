use std::path::Path;

use colored::*;

use crate::commands::snapshot;
use crate::terminal::{colors, print};
use catsync_common::config::Config;
use catsync_core::{AliasCache, InMemoryCatalog};

type Detail = (String, ColoredString);

pub async fn aliases(catalog: &Path, cfg: &Config) -> anyhow::Result<()> {
    let client = InMemoryCatalog::from_snapshot(snapshot::load_catalog(catalog)?);
    let cache = AliasCache::load(&client).await?;

    print::header("Tiers", cfg.quiet);
    print_group(
        cache
            .tiers()
            .into_iter()
            .map(|t| (t.alias.clone(), format!("{} (index {})", t.name, t.index).normal()))
            .collect(),
    );

    print::header("Lifecycles", cfg.quiet);
    print_group(
        cache
            .lifecycles()
            .into_iter()
            .map(|l| (l.alias.clone(), l.name.clone().normal()))
            .collect(),
    );

    print::header("Teams", cfg.quiet);
    print_group(
        cache
            .teams()
            .into_iter()
            .map(|t| (t.alias.clone(), t.name.clone().normal()))
            .collect(),
    );

    print::end_of_program();
    Ok(())
}

fn print_group(details: Vec<Detail>) {
    if details.is_empty() {
        print::print_status("none".color(colors::SKIPPED).to_string());
        return;
    }
    print::as_tree_one_level(&details);
}
