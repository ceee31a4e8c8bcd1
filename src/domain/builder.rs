//! Projects flat submission values onto a document tree using a mapping table.

use tracing::{debug, instrument, trace};

use crate::domain::attributes::Attributes;
use crate::domain::error::DomainResult;
use crate::domain::mapping::{MappingEntry, MappingTable};
use crate::domain::node::Node;
use crate::domain::schema::DocumentSchema;
use crate::domain::values::{FlatValue, FlatValueMap};

/// A completed (or in-progress) document owned by one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Node,
}

impl Document {
    pub fn new(root_name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            root: Node::root(root_name, attributes),
        }
    }

    /// Build a complete document for `values` against `schema`.
    pub fn build(schema: &DocumentSchema, values: &FlatValueMap) -> DomainResult<Self> {
        let mut document = Self {
            root: schema.create_root(),
        };
        DocumentBuilder::new(schema.table()).build(schema.group(), values, &mut document.root)?;
        Ok(document)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }
}

/// Walks mapping groups against value maps. Holds only a shared reference to
/// the table, so one table can serve many builds.
#[derive(Debug, Clone, Copy)]
pub struct DocumentBuilder<'a> {
    table: &'a MappingTable,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(table: &'a MappingTable) -> Self {
        Self { table }
    }

    /// Apply mapping group `group` to `values`, placing nodes below `root`.
    ///
    /// Entries are processed in declared order. Absent and blank fields are
    /// skipped. The first error aborts the build.
    #[instrument(level = "debug", skip(self, values, root), fields(root = %root.name()))]
    pub fn build(&self, group: &str, values: &FlatValueMap, root: &mut Node) -> DomainResult<()> {
        let entries = self.table.group(group)?;
        debug!(entries = entries.len(), fields = values.len(), "applying mapping group");

        for entry in entries {
            match values.get(&entry.field) {
                None => trace!(field = %entry.field, "absent, skipped"),
                Some(value) if value.is_blank() => trace!(field = %entry.field, "blank, skipped"),
                Some(FlatValue::Scalar(text)) => self.place_scalar(entry, text, root)?,
                Some(FlatValue::Collection(elements)) => {
                    self.place_collection(entry, elements, root)?
                }
            }
        }

        Ok(())
    }

    fn place_scalar(&self, entry: &MappingEntry, text: &str, root: &mut Node) -> DomainResult<()> {
        trace!(field = %entry.field, path = %entry.path, "placing scalar");
        root.resolve_path(&entry.path, &Attributes::new())?
            .set_text(text)
    }

    /// One container node per element, tagged with its zero-based `order`.
    fn place_collection(
        &self,
        entry: &MappingEntry,
        elements: &[FlatValueMap],
        root: &mut Node,
    ) -> DomainResult<()> {
        let (group, _) = self.table.nested_group(entry)?;
        debug!(field = %entry.field, group, elements = elements.len(), "placing collection");

        for (index, element) in elements.iter().enumerate() {
            let container = root.resolve_path(&entry.path, &Attributes::order(index))?;
            self.build(group, element, container)?;
        }

        Ok(())
    }
}
