//! Submission values: scalars and field collections.

use std::collections::BTreeMap;

use crate::domain::error::{DomainError, DomainResult};

/// Field name to value, for one submission or one collection element.
pub type FlatValueMap = BTreeMap<String, FlatValue>;

/// Value of a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatValue {
    Scalar(String),
    /// Repeated sub-record (e.g. several jobs); order is significant.
    Collection(Vec<FlatValueMap>),
}

impl FlatValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        FlatValue::Scalar(value.into())
    }

    pub fn collection(elements: impl IntoIterator<Item = FlatValueMap>) -> Self {
        FlatValue::Collection(elements.into_iter().collect())
    }

    /// Blank scalars are treated like absent fields.
    pub fn is_blank(&self) -> bool {
        matches!(self, FlatValue::Scalar(s) if s.trim().is_empty())
    }
}

impl From<&str> for FlatValue {
    fn from(value: &str) -> Self {
        FlatValue::Scalar(value.to_string())
    }
}

impl From<String> for FlatValue {
    fn from(value: String) -> Self {
        FlatValue::Scalar(value)
    }
}

/// Convert an untyped TOML table into a value map.
///
/// Strings become scalars and arrays of tables become collections. Anything
/// else is rejected with the offending field; nested fields are reported as
/// `parent[index].field`.
pub fn from_toml_table(table: &toml::Table) -> DomainResult<FlatValueMap> {
    convert_table(table, None)
}

fn convert_table(table: &toml::Table, scope: Option<&str>) -> DomainResult<FlatValueMap> {
    table
        .iter()
        .map(|(key, value)| {
            let field = match scope {
                Some(scope) => format!("{scope}.{key}"),
                None => key.clone(),
            };
            convert_value(&field, value).map(|v| (key.clone(), v))
        })
        .collect()
}

fn convert_value(field: &str, value: &toml::Value) -> DomainResult<FlatValue> {
    match value {
        toml::Value::String(s) => Ok(FlatValue::Scalar(s.clone())),
        toml::Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                toml::Value::Table(table) => {
                    convert_table(table, Some(&format!("{field}[{index}]")))
                }
                other => Err(invalid(
                    &format!("{field}[{index}]"),
                    &format!("array element of type {}", other.type_str()),
                )),
            })
            .collect::<DomainResult<Vec<_>>>()
            .map(FlatValue::Collection),
        other => Err(invalid(field, other.type_str())),
    }
}

fn invalid(field: &str, found: &str) -> DomainError {
    DomainError::InvalidFieldValue {
        field: field.to_string(),
        found: found.to_string(),
    }
}
