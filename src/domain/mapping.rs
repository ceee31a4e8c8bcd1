//! Mapping tables: named groups of field-to-path associations.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::path::PathExpression;

/// Places the value of `field` at `path`; collection fields name the
/// `group` that interprets each element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub field: String,
    pub path: PathExpression,
    pub group: Option<String>,
}

impl MappingEntry {
    pub fn new(field: impl Into<String>, path: &str) -> DomainResult<Self> {
        Ok(Self {
            field: field.into(),
            path: PathExpression::parse(path)?,
            group: None,
        })
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Read-only after construction; safe to share between concurrent builds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    groups: BTreeMap<String, Vec<MappingEntry>>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group; group names are unique.
    pub fn insert_group(
        &mut self,
        name: impl Into<String>,
        entries: Vec<MappingEntry>,
    ) -> DomainResult<()> {
        let name = name.into();
        if self.groups.contains_key(&name) {
            return Err(DomainError::DuplicateMappingGroup(name));
        }
        self.groups.insert(name, entries);
        Ok(())
    }

    /// Builder-style variant of [`MappingTable::insert_group`].
    pub fn with_group(
        mut self,
        name: impl Into<String>,
        entries: Vec<MappingEntry>,
    ) -> DomainResult<Self> {
        self.insert_group(name, entries)?;
        Ok(self)
    }

    pub fn group(&self, name: &str) -> DomainResult<&[MappingEntry]> {
        self.groups
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| DomainError::UnknownMappingGroup(name.to_string()))
    }

    /// Group used for the elements of a collection field.
    pub fn nested_group<'t>(
        &'t self,
        entry: &'t MappingEntry,
    ) -> DomainResult<(&'t str, &'t [MappingEntry])> {
        let name = entry.group.as_deref().ok_or_else(|| {
            DomainError::UnknownMappingGroup(format!("(none declared for field '{}')", entry.field))
        })?;
        Ok((name, self.group(name)?))
    }

    pub fn contains_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Groups in name order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[MappingEntry])> {
        self.groups
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Check that every nested group reference points at an existing group.
    pub fn validate(&self) -> DomainResult<()> {
        for entries in self.groups.values() {
            for entry in entries {
                if let Some(group) = &entry.group {
                    if !self.contains_group(group) {
                        return Err(DomainError::UnknownMappingGroup(group.clone()));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Mapping entry as declared in a schema file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawMappingEntry {
    pub field: String,
    pub path: String,
    #[serde(default)]
    pub group: Option<String>,
}

impl TryFrom<RawMappingEntry> for MappingEntry {
    type Error = DomainError;

    fn try_from(raw: RawMappingEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            field: raw.field,
            path: PathExpression::parse(&raw.path)?,
            group: raw.group,
        })
    }
}

impl TryFrom<BTreeMap<String, Vec<RawMappingEntry>>> for MappingTable {
    type Error = DomainError;

    fn try_from(raw: BTreeMap<String, Vec<RawMappingEntry>>) -> Result<Self, Self::Error> {
        let mut table = MappingTable::new();
        for (name, entries) in raw {
            let entries = entries
                .into_iter()
                .map(MappingEntry::try_from)
                .collect::<DomainResult<Vec<_>>>()?;
            table.insert_group(name, entries)?;
        }
        Ok(table)
    }
}
