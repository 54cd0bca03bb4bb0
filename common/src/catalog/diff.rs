use std::collections::BTreeSet;
use std::fmt;

use super::CatalogService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub before: String,
    pub after: String,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.field, self.before, self.after)
    }
}

pub(super) fn diff_services(before: &CatalogService, after: &CatalogService) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    let mut scalar = |field: &'static str, a: Option<&str>, b: Option<&str>| {
        if a != b {
            changes.push(FieldChange {
                field,
                before: render(a),
                after: render(b),
            });
        }
    };

    scalar("name", Some(before.name.as_str()), Some(after.name.as_str()));
    scalar("product", before.product.as_deref(), after.product.as_deref());
    scalar(
        "description",
        before.description.as_deref(),
        after.description.as_deref(),
    );
    scalar("language", before.language.as_deref(), after.language.as_deref());
    scalar("framework", before.framework.as_deref(), after.framework.as_deref());
    scalar("tier", before.tier.as_deref(), after.tier.as_deref());
    scalar("lifecycle", before.lifecycle.as_deref(), after.lifecycle.as_deref());
    scalar("owner", before.owner.as_deref(), after.owner.as_deref());

    // Order is not meaningful for aliases and tags.
    let aliases_before: BTreeSet<&str> = before.aliases.iter().map(String::as_str).collect();
    let aliases_after: BTreeSet<&str> = after.aliases.iter().map(String::as_str).collect();
    if aliases_before != aliases_after {
        changes.push(FieldChange {
            field: "aliases",
            before: join(aliases_before),
            after: join(aliases_after),
        });
    }

    let tags_before: BTreeSet<String> = before
        .tags
        .iter()
        .map(|t| format!("{}={}", t.key, t.value))
        .collect();
    let tags_after: BTreeSet<String> = after
        .tags
        .iter()
        .map(|t| format!("{}={}", t.key, t.value))
        .collect();
    if tags_before != tags_after {
        changes.push(FieldChange {
            field: "tags",
            before: join(tags_before.iter().map(String::as_str)),
            after: join(tags_after.iter().map(String::as_str)),
        });
    }

    changes
}

fn render(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => "<unset>".to_string(),
    }
}

fn join<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    format!("[{}]", values.into_iter().collect::<Vec<_>>().join(", "))
}
