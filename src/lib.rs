//! claimdoc: builds hierarchical XML documents from flat claim-form values.
//!
//! A schema declares, per named group, which field lands at which
//! slash-delimited path. Scalars become element text; collections create one
//! `order`-attributed node per element and are built with a nested group.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
