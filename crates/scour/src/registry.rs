//! Model registry read interface.
//!
//! The registry itself belongs to the application; this crate consumes it
//! through two narrow queries: which models are registered, and what fields
//! a given model declares. Descriptors are plain data populated once per
//! run — no runtime reflection.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A declared model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Whether the field is backed by a physical column. Computed fields
    /// that are not stored have no column and must not constrain the
    /// declared-field set.
    pub stored: bool,
}

impl FieldDef {
    /// A plain stored field.
    pub fn stored() -> Self {
        Self { stored: true }
    }

    /// A computed field with no backing column.
    pub fn computed() -> Self {
        Self { stored: false }
    }
}

/// One registered application model: its physical table and declared fields.
///
/// `table` is `None` for abstract/virtual models that persist nothing.
/// Field order is preserved for deterministic reporting; it carries no
/// semantic weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model identifier, e.g. `stock.picking`.
    pub model: String,
    /// Physical table backing the model, if any.
    pub table: Option<String>,
    /// Declared fields, keyed by field name.
    pub fields: IndexMap<String, FieldDef>,
}

impl ModelDescriptor {
    /// Create a descriptor for a table-backed model.
    pub fn new(model: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            table: Some(table.into()),
            fields: IndexMap::new(),
        }
    }

    /// Create a descriptor for an abstract model with no backing table.
    pub fn abstract_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            table: None,
            fields: IndexMap::new(),
        }
    }

    /// Add a declared field.
    pub fn with_field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }
}

/// A registry *registration*: a numeric id and the model name it points at.
///
/// Registrations can go stale — the entry survives while the model it names
/// has been removed — so resolving one to a descriptor returns `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    pub id: i64,
    pub name: String,
}

/// Read access to the application's model registry.
pub trait ModelRegistry {
    /// Enumerate every registration, stale ones included.
    fn registered(&self) -> Vec<ModelRef>;

    /// Resolve a registration to its descriptor.
    ///
    /// `None` means the registration is stale (points at a removed model);
    /// callers skip such entries rather than erroring.
    fn descriptor(&self, model: &str) -> Option<&ModelDescriptor>;
}
