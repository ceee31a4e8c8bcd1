//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent configuration defects or malformed submission data.
/// Every variant is fatal for the build that raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed path expression '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("unknown mapping group: {0}")]
    UnknownMappingGroup(String),

    #[error("duplicate mapping group: {0}")]
    DuplicateMappingGroup(String),

    #[error("cannot resolve node '{segment}' below '{consumed}': {reason}")]
    PathResolution {
        segment: String,
        consumed: String,
        reason: String,
    },

    #[error("invalid state for node '{node}': {reason}")]
    InvalidNodeState { node: String, reason: String },

    #[error("unsupported value for field '{field}': found {found}")]
    InvalidFieldValue { field: String, found: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
