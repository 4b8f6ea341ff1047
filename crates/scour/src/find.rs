//! Orphan finder: walk the registry, group by table, analyze each group.
//!
//! Grouping models by physical table before analysis is what prevents false
//! positives with table inheritance: a column declared only by one of the
//! models sharing a table must not look orphaned to the others.

use indexmap::IndexMap;

use crate::analyze::find_orphaned_columns;
use crate::catalog::Catalog;
use crate::registry::{ModelDescriptor, ModelRegistry};
use crate::rules::PurgeRules;
use crate::{Error, Result};

/// A column proposed for removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Physical table the column lives on.
    pub table: String,
    /// The orphaned column.
    pub column: String,
    /// Representative model id of the table group, for attribution.
    pub model_id: i64,
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} (model #{})", self.table, self.column, self.model_id)
    }
}

/// The models mapping to one physical table.
#[derive(Debug, Clone)]
pub struct TableGroup {
    /// Physical table name.
    pub table: String,
    /// Representative model id: the first registration encountered for the
    /// table. Attribution only; it does not affect the candidate set.
    pub owner_id: i64,
    /// Every descriptor mapping to the table. More than one signals
    /// inheritance sharing.
    pub models: Vec<ModelDescriptor>,
}

/// Group registered models by physical table.
///
/// Two passes: enumerate and resolve first, then fold into a map keyed by
/// table name. Skips abstract models (no table) and stale registrations
/// (no descriptor) — both are expected registry states, not errors.
pub fn group_by_table<R: ModelRegistry>(registry: &R) -> Vec<TableGroup> {
    let mut resolved: Vec<(i64, String, ModelDescriptor)> = Vec::new();
    for entry in registry.registered() {
        let Some(desc) = registry.descriptor(&entry.name) else {
            tracing::debug!(model = %entry.name, "skipping stale registration");
            continue;
        };
        let Some(table) = desc.table.clone() else {
            tracing::debug!(model = %entry.name, "skipping abstract model");
            continue;
        };
        resolved.push((entry.id, table, desc.clone()));
    }

    let mut groups: IndexMap<String, TableGroup> = IndexMap::new();
    for (id, table, desc) in resolved {
        groups
            .entry(table.clone())
            .or_insert_with(|| TableGroup {
                table,
                owner_id: id,
                models: Vec::new(),
            })
            .models
            .push(desc);
    }

    groups.into_values().collect()
}

/// Find every orphaned column across the registry.
///
/// Returns one candidate per orphaned column, attributed to its table
/// group's representative model. An empty result is reported as
/// [`Error::NothingToDo`] so callers can tell "clean schema" apart from
/// real failures. Idempotent for an unchanged catalog and registry.
pub async fn find_orphans<C, R>(
    catalog: &C,
    registry: &R,
    rules: &PurgeRules,
) -> Result<Vec<Candidate>>
where
    C: Catalog,
    R: ModelRegistry,
{
    let mut candidates = Vec::new();

    for group in group_by_table(registry) {
        let orphans = find_orphaned_columns(catalog, &group.table, &group.models, rules).await?;
        tracing::debug!(
            table = %group.table,
            models = group.models.len(),
            orphans = orphans.len(),
            "analyzed table group"
        );
        candidates.extend(orphans.into_iter().map(|column| Candidate {
            table: group.table.clone(),
            column,
            model_id: group.owner_id,
        }));
    }

    if candidates.is_empty() {
        return Err(Error::NothingToDo);
    }
    Ok(candidates)
}
