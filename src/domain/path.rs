//! Slash-delimited path expressions.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::{DomainError, DomainResult};

pub const PATH_SEPARATOR: char = '/';

/// Ordered, non-empty sequence of node names, e.g. `Person/Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    segments: Vec<String>,
}

impl PathExpression {
    /// Parse a path string into its segments.
    ///
    /// Fails on an empty string, on any empty (or whitespace-only) segment,
    /// which covers leading, trailing and doubled separators, and on segments
    /// that are not XML element names.
    pub fn parse(path: &str) -> DomainResult<Self> {
        if path.trim().is_empty() {
            return Err(DomainError::MalformedPath {
                path: path.to_string(),
                reason: "path is empty".to_string(),
            });
        }

        let segments: Vec<String> = path.split(PATH_SEPARATOR).map(str::to_string).collect();
        if let Some(position) = segments.iter().position(|s| s.trim().is_empty()) {
            return Err(DomainError::MalformedPath {
                path: path.to_string(),
                reason: format!("segment {} is empty", position + 1),
            });
        }

        if let Some(segment) = segments.iter().find(|s| !is_xml_name(s)) {
            return Err(DomainError::MalformedPath {
                path: path.to_string(),
                reason: format!("'{segment}' is not a valid XML name"),
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a parsed expression.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The first `count` segments joined back into a path string.
    pub fn prefix(&self, count: usize) -> String {
        let end = count.min(self.segments.len());
        self.segments[..end].join("/")
    }
}

/// XML `Name`: starts with a letter, `_` or `:`, continues with letters,
/// digits, `-`, `.`, `_` or `:`.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':'))
        }
        _ => false,
    }
}

impl FromStr for PathExpression {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
