//! TOML formats for schema and values files.
//!
//! Schema file:
//! ```toml
//! [document]
//! root = "DWPBody"
//! group = "root"                 # optional
//! [document.attributes]          # optional, order preserved
//! xmlns = "http://example.org/claim"
//!
//! [[groups.root]]
//! field = "surname"
//! path = "Claimant/Surname"
//! ```
//!
//! Values file: top-level string keys are scalars, arrays of tables are
//! field collections.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::application::error_ext::DomainResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    from_toml_table, Attributes, DocumentSchema, FlatValueMap, MappingTable, RawMappingEntry,
    DEFAULT_GROUP,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSchema {
    pub document: RawDocument,
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<RawMappingEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDocument {
    pub root: String,
    #[serde(default = "default_group")]
    pub group: String,
    #[serde(default)]
    pub attributes: toml::Table,
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

/// Parse and validate a schema; `origin` is used for error messages only.
pub fn parse_schema(content: &str, origin: &Path) -> ApplicationResult<DocumentSchema> {
    let raw: RawSchema = toml::from_str(content).map_err(|e| ApplicationError::Schema {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut attributes = Attributes::new();
    for (key, value) in &raw.document.attributes {
        let value = value.as_str().ok_or_else(|| ApplicationError::Schema {
            path: origin.to_path_buf(),
            message: format!(
                "attribute '{}' must be a string, found {}",
                key,
                value.type_str()
            ),
        })?;
        attributes.insert(key.clone(), value);
    }

    let table = MappingTable::try_from(raw.groups).in_file(origin)?;
    debug!(groups = table.len(), root = %raw.document.root, "parsed schema");

    DocumentSchema::new(raw.document.root, attributes, raw.document.group, table).in_file(origin)
}

/// Parse a values file into a value map; unsupported value types are domain errors.
pub fn parse_values(content: &str, origin: &Path) -> ApplicationResult<FlatValueMap> {
    let table: toml::Table = toml::from_str(content).map_err(|e| ApplicationError::Values {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;
    from_toml_table(&table).in_file(origin)
}
