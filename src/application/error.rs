//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add file and config context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{path}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: DomainError,
    },

    #[error("invalid schema file {path}: {message}")]
    Schema { path: PathBuf, message: String },

    #[error("invalid values file {path}: {message}")]
    Values { path: PathBuf, message: String },

    #[error("cannot render document: {message}")]
    Render { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Underlying domain error, if this failure came from the builder or its inputs.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ApplicationError::Domain(e) | ApplicationError::InFile { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
