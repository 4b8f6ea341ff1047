//! Exclusion rules for the schema analyzer.
//!
//! Two fixed sets keep known-legitimate columns out of the candidate list:
//! the reserved columns the framework maintains without a declaring field,
//! and a per-table blacklist of columns that are in use despite having no
//! field. Both are built once at startup and never mutated afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Columns the framework always maintains: the row identifier and the audit
/// columns. These never correspond to a declared field and are never
/// candidates.
pub const RESERVED_COLUMNS: &[&str] = &[
    "id",
    "created_at",
    "created_by",
    "updated_at",
    "updated_by",
];

/// Process-wide, read-only analyzer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeRules {
    /// Framework-maintained columns, excluded on every table.
    pub reserved: Vec<String>,
    /// Known-legitimate columns with no declaring field, keyed by exact
    /// physical table name.
    pub blacklist: HashMap<String, Vec<String>>,
}

impl Default for PurgeRules {
    fn default() -> Self {
        Self {
            reserved: RESERVED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            blacklist: HashMap::new(),
        }
    }
}

impl PurgeRules {
    /// Rules with the default reserved set and the given blacklist.
    pub fn with_blacklist(blacklist: HashMap<String, Vec<String>>) -> Self {
        Self {
            blacklist,
            ..Self::default()
        }
    }

    /// Blacklist entries registered for this exact table name.
    pub fn blacklisted(&self, table: &str) -> &[String] {
        self.blacklist.get(table).map(Vec::as_slice).unwrap_or(&[])
    }
}
