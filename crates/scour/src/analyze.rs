//! Schema analyzer: which physical columns does no field explain?
//!
//! The declared-field set is the *union* across every model sharing the
//! table. With table inheritance, a column can be stored by one model and
//! absent (or computed) in a sibling mapped to the same table; intersection
//! semantics would flag it, union semantics keep it safe.

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::registry::ModelDescriptor;
use crate::rules::PurgeRules;
use crate::Result;

/// Compute the orphaned columns of one table, pure part.
///
/// `physical` is the catalog's column list for `table`, already filtered
/// and in catalog order; the result preserves that order. All descriptors
/// in `models` map to `table` — grouping is the caller's responsibility and
/// is not re-checked here.
pub fn orphaned_columns(
    physical: &[String],
    table: &str,
    models: &[ModelDescriptor],
    rules: &PurgeRules,
) -> Vec<String> {
    let mut declared: HashSet<&str> = models
        .iter()
        .flat_map(|m| m.fields.iter())
        .filter(|(_, def)| def.stored)
        .map(|(name, _)| name.as_str())
        .collect();

    declared.extend(rules.reserved.iter().map(String::as_str));
    declared.extend(rules.blacklisted(table).iter().map(String::as_str));

    physical
        .iter()
        .filter(|column| !declared.contains(column.as_str()))
        .cloned()
        .collect()
}

/// Compute the orphaned columns of one table against the live catalog.
///
/// No side effects; deterministic for an unchanged catalog and descriptor
/// set. Catalog failures propagate.
pub async fn find_orphaned_columns<C: Catalog>(
    catalog: &C,
    table: &str,
    models: &[ModelDescriptor],
    rules: &PurgeRules,
) -> Result<Vec<String>> {
    let physical = catalog.columns(table).await?;
    Ok(orphaned_columns(&physical, table, models, rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FieldDef;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn make_model(model: &str, table: &str, fields: &[(&str, bool)]) -> ModelDescriptor {
        let mut desc = ModelDescriptor::new(model, table);
        for (name, stored) in fields {
            desc = desc.with_field(*name, FieldDef { stored: *stored });
        }
        desc
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn reserved_only(reserved: &[&str]) -> PurgeRules {
        PurgeRules {
            reserved: reserved.iter().map(|s| s.to_string()).collect(),
            blacklist: HashMap::new(),
        }
    }

    #[test]
    fn test_single_model_orphan() {
        // Model stores {a, b}; table has {a, b, c, id, created_at}.
        let model = make_model("res.partner", "res_partner", &[("a", true), ("b", true)]);
        let physical = cols(&["a", "b", "c", "id", "created_at"]);
        let rules = reserved_only(&["id", "created_at"]);

        let orphans = orphaned_columns(&physical, "res_partner", &[model], &rules);
        assert_eq!(orphans, cols(&["c"]));
    }

    #[test]
    fn test_shared_table_uses_union_of_fields() {
        // M1 stores {x}, M2 stores {y}, both on T; only z is orphaned.
        let m1 = make_model("stock.picking", "stock_picking", &[("x", true)]);
        let m2 = make_model("stock.picking.in", "stock_picking", &[("y", true)]);
        let physical = cols(&["x", "y", "z"]);
        let rules = reserved_only(&[]);

        let orphans = orphaned_columns(&physical, "stock_picking", &[m1, m2], &rules);
        assert_eq!(orphans, cols(&["z"]));
    }

    #[test]
    fn test_field_computed_in_one_model_stored_in_sibling() {
        // "total" is computed-unstored in m1 but stored by m2: declared.
        let m1 = make_model("sale.order", "sale_order", &[("total", false)]);
        let m2 = make_model("sale.order.ext", "sale_order", &[("total", true)]);
        let physical = cols(&["total"]);
        let rules = reserved_only(&[]);

        let orphans = orphaned_columns(&physical, "sale_order", &[m1, m2], &rules);
        assert!(orphans.is_empty());
    }

    #[test]
    fn test_computed_everywhere_is_orphaned() {
        let model = make_model("sale.order", "sale_order", &[("total", false)]);
        let physical = cols(&["total"]);
        let rules = reserved_only(&[]);

        let orphans = orphaned_columns(&physical, "sale_order", &[model], &rules);
        assert_eq!(orphans, cols(&["total"]));
    }

    #[test]
    fn test_blacklist_excludes_exact_table_only() {
        let mut blacklist = HashMap::new();
        blacklist.insert("wkf_instance".to_string(), vec!["legacy_flag".to_string()]);
        let rules = PurgeRules {
            reserved: vec![],
            blacklist,
        };
        let model = make_model("wkf.instance", "wkf_instance", &[("state", true)]);
        let physical = cols(&["state", "legacy_flag"]);

        // Blacklisted on its own table: excluded even with no declaring field.
        let orphans = orphaned_columns(&physical, "wkf_instance", &[model.clone()], &rules);
        assert!(orphans.is_empty());

        // Same column name on another table is not protected.
        let other = make_model("wkf.workitem", "wkf_workitem", &[("state", true)]);
        let orphans = orphaned_columns(&physical, "wkf_workitem", &[other], &rules);
        assert_eq!(orphans, cols(&["legacy_flag"]));
    }

    #[test]
    fn test_reserved_never_candidates() {
        // No model declares anything; only the reserved set protects columns.
        let model = make_model("res.partner", "res_partner", &[]);
        let physical = cols(&["id", "created_at", "updated_at", "ghost"]);
        let rules = reserved_only(&["id", "created_at", "updated_at"]);

        let orphans = orphaned_columns(&physical, "res_partner", &[model], &rules);
        assert_eq!(orphans, cols(&["ghost"]));
    }

    #[test]
    fn test_result_preserves_catalog_order() {
        let model = make_model("res.partner", "res_partner", &[("kept", true)]);
        let physical = cols(&["z_last", "kept", "a_first"]);
        let rules = reserved_only(&[]);

        let orphans = orphaned_columns(&physical, "res_partner", &[model], &rules);
        assert_eq!(orphans, cols(&["z_last", "a_first"]));
    }

    proptest! {
        // Union-not-intersection: a field stored by *any* model in the group
        // never surfaces as a candidate, however the other models declare it.
        #[test]
        fn prop_stored_fields_never_candidates(
            stored in proptest::collection::hash_set("[a-z]{1,8}", 0..8),
            extras in proptest::collection::hash_set("[A-Z]{1,8}", 0..8),
            flags in proptest::collection::vec(any::<bool>(), 8),
        ) {
            // First model stores every field; a sibling re-declares an
            // arbitrary subset as computed-unstored.
            let mut m1 = ModelDescriptor::new("m.one", "t");
            let mut m2 = ModelDescriptor::new("m.two", "t");
            for (i, name) in stored.iter().enumerate() {
                m1 = m1.with_field(name.clone(), FieldDef::stored());
                if flags[i % flags.len()] {
                    m2 = m2.with_field(name.clone(), FieldDef::computed());
                }
            }

            // Physical layout: declared fields plus extras; extras use a
            // disjoint alphabet so they never collide with field names.
            let physical: Vec<String> =
                stored.iter().chain(extras.iter()).cloned().collect();
            let rules = PurgeRules {
                reserved: vec![],
                blacklist: std::collections::HashMap::new(),
            };

            let orphans = orphaned_columns(&physical, "t", &[m1, m2], &rules);

            for field in &stored {
                prop_assert!(!orphans.contains(field));
            }
            for extra in &extras {
                prop_assert!(orphans.contains(extra));
            }
        }
    }
}
