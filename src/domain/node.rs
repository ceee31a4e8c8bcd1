//! Owned document tree: named nodes with attributes and either children or text.

use tracing::{instrument, trace, warn};

use crate::domain::attributes::Attributes;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::matcher::MatchMode;
use crate::domain::path::{PathExpression, PATH_SEPARATOR};

/// Payload of a node. Element children and text are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Children(Vec<Node>),
    Text(String),
}

impl Default for Content {
    fn default() -> Self {
        Content::Children(Vec::new())
    }
}

/// Tree node. Each node exclusively owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    attributes: Attributes,
    content: Content,
}

impl Node {
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
            content: Content::default(),
        }
    }

    /// Root of a document, carrying its static attributes (namespace declarations).
    pub fn root(name: impl Into<String>, attributes: Attributes) -> Self {
        Self::new(name, attributes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Element children; empty for text nodes.
    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Children(children) => children,
            Content::Text(_) => &[],
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Children(_) => None,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children().iter().filter(move |c| c.name == name)
    }

    /// Follow a slash path by first name match at each level, e.g. `Person/Name`.
    pub fn descendant(&self, path: &str) -> Option<&Node> {
        path.split(PATH_SEPARATOR)
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Node::node_count).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(Node::depth)
            .max()
            .unwrap_or(0)
    }

    /// Return the first child matching `name`/`attributes`, or create and append one.
    ///
    /// Children are scanned in declaration order. With `create == false` a miss yields
    /// `Ok(None)`. Creating a child below a node that holds text is an invalid state.
    pub fn resolve_child(
        &mut self,
        name: &str,
        attributes: &Attributes,
        mode: MatchMode,
        create: bool,
    ) -> DomainResult<Option<&mut Node>> {
        let children = match &mut self.content {
            Content::Children(children) => children,
            Content::Text(_) if create => {
                return Err(DomainError::InvalidNodeState {
                    node: self.name.clone(),
                    reason: format!("cannot add child '{name}' to a node holding text"),
                });
            }
            Content::Text(_) => return Ok(None),
        };

        if let Some(position) = children
            .iter()
            .position(|c| c.name == name && mode.matches(&c.attributes, attributes))
        {
            return Ok(Some(&mut children[position]));
        }

        if !create {
            return Ok(None);
        }

        trace!(parent = %self.name, child = name, attributes = %attributes, "creating node");
        children.push(Node::new(name, attributes.clone()));
        Ok(children.last_mut())
    }

    /// Descend along `path`, creating missing nodes.
    ///
    /// Intermediate segments match on name alone; the leaf segment carries
    /// `leaf_attributes` and is matched exactly when any are given.
    #[instrument(level = "trace", skip_all, fields(root = %self.name, path = %path))]
    pub fn resolve_path(
        &mut self,
        path: &PathExpression,
        leaf_attributes: &Attributes,
    ) -> DomainResult<&mut Node> {
        let no_attributes = Attributes::new();
        let last = path.len().saturating_sub(1);
        let mut current = self;

        for (index, segment) in path.segments().iter().enumerate() {
            let (attributes, mode) = if index == last {
                (leaf_attributes, MatchMode::for_leaf(leaf_attributes))
            } else {
                (&no_attributes, MatchMode::Partial)
            };

            let resolved = current
                .resolve_child(segment, attributes, mode, true)
                .map_err(|e| DomainError::PathResolution {
                    segment: segment.clone(),
                    consumed: path.prefix(index),
                    reason: e.to_string(),
                })?;

            current = resolved.ok_or_else(|| DomainError::PathResolution {
                segment: segment.clone(),
                consumed: path.prefix(index),
                reason: "no matching node could be created".to_string(),
            })?;
        }

        Ok(current)
    }

    /// Attach a text value. Fails if the node already owns element children;
    /// existing text is replaced.
    pub fn set_text(&mut self, value: impl Into<String>) -> DomainResult<()> {
        if self.has_children() {
            return Err(DomainError::InvalidNodeState {
                node: self.name.clone(),
                reason: "cannot set text on a node with element children".to_string(),
            });
        }

        let value = value.into();
        if let Content::Text(previous) = &self.content {
            warn!(node = %self.name, previous = %previous, "replacing existing text");
        }
        self.content = Content::Text(value);
        Ok(())
    }
}
