//! Application services

pub mod document;

pub use document::{BuildOutcome, DocumentService};
