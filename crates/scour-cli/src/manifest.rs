//! Model manifest: a file-backed snapshot of the model registry.
//!
//! The application exporting its registry writes one `[[model]]` entry per
//! registration. Abstract models simply omit `table`; computed fields are
//! declared with `stored = false` so the analyzer can ignore them.
//!
//! ```toml
//! [[model]]
//! id = 1
//! name = "res.partner"
//! table = "res_partner"
//!
//! [model.fields]
//! name = { stored = true }
//! display_name = { stored = false }
//! ```

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use scour::{FieldDef, ModelDescriptor, ModelRef, ModelRegistry};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default, rename = "model")]
    models: Vec<ManifestModel>,
}

#[derive(Debug, Deserialize)]
struct ManifestModel {
    id: i64,
    name: String,
    table: Option<String>,
    #[serde(default)]
    fields: IndexMap<String, FieldDef>,
}

/// A [`ModelRegistry`] backed by a manifest file.
#[derive(Debug)]
pub struct ManifestRegistry {
    registered: Vec<ModelRef>,
    descriptors: HashMap<String, ModelDescriptor>,
}

impl ManifestRegistry {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::Io(path.display().to_string(), e.to_string()))?;
        Self::parse(&content)
            .map_err(|e| ManifestError::Parse(path.display().to_string(), e.to_string()))
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let manifest: Manifest = toml::from_str(content)?;

        let registered = manifest
            .models
            .iter()
            .map(|m| ModelRef {
                id: m.id,
                name: m.name.clone(),
            })
            .collect();

        let descriptors = manifest
            .models
            .into_iter()
            .map(|m| {
                (
                    m.name.clone(),
                    ModelDescriptor {
                        model: m.name,
                        table: m.table,
                        fields: m.fields,
                    },
                )
            })
            .collect();

        Ok(Self {
            registered,
            descriptors,
        })
    }
}

impl ModelRegistry for ManifestRegistry {
    fn registered(&self) -> Vec<ModelRef> {
        self.registered.clone()
    }

    fn descriptor(&self, model: &str) -> Option<&ModelDescriptor> {
        self.descriptors.get(model)
    }
}

/// Errors that can occur when loading a manifest.
#[derive(Debug)]
pub enum ManifestError {
    /// I/O error reading the file (path, cause)
    Io(String, String),
    /// Parse error in the TOML file (path, cause)
    Parse(String, String),
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestError::Io(path, e) => write!(f, "Failed to read {}: {}", path, e),
            ManifestError::Parse(path, e) => write!(f, "Failed to parse {}: {}", path, e),
        }
    }
}

impl std::error::Error for ManifestError {}
