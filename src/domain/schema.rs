//! Document schema: root element plus the mapping table that fills it.

use crate::domain::attributes::Attributes;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::mapping::MappingTable;
use crate::domain::node::Node;
use crate::domain::path::{is_xml_name, PathExpression};

pub const DEFAULT_GROUP: &str = "root";

/// Everything needed to start a build: root name, root attributes and the
/// top-level mapping group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSchema {
    root: String,
    attributes: Attributes,
    group: String,
    table: MappingTable,
}

impl DocumentSchema {
    /// Validates the root name, the top-level group and all nested group references.
    pub fn new(
        root: impl Into<String>,
        attributes: Attributes,
        group: impl Into<String>,
        table: MappingTable,
    ) -> DomainResult<Self> {
        let root = root.into();
        let group = group.into();

        if PathExpression::parse(&root)?.len() != 1 {
            return Err(DomainError::MalformedPath {
                path: root,
                reason: "root must be a single node name".to_string(),
            });
        }
        if let Some((key, _)) = attributes.iter().find(|(key, _)| !is_xml_name(key)) {
            return Err(DomainError::InvalidNodeState {
                node: root,
                reason: format!("'{key}' is not a valid XML attribute name"),
            });
        }
        table.group(&group)?;
        table.validate()?;

        Ok(Self {
            root,
            attributes,
            group,
            table,
        })
    }

    pub fn root_name(&self) -> &str {
        &self.root
    }

    pub fn root_attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Fresh, empty root node for one build.
    pub fn create_root(&self) -> Node {
        Node::root(&self.root, self.attributes.clone())
    }
}
