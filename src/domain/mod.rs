//! Domain layer: path-mapped document building
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod attributes;
pub mod builder;
pub mod error;
pub mod mapping;
pub mod matcher;
pub mod node;
pub mod path;
pub mod schema;
pub mod values;

pub use attributes::{Attributes, ORDER_ATTRIBUTE};
pub use builder::{Document, DocumentBuilder};
pub use error::{DomainError, DomainResult};
pub use mapping::{MappingEntry, MappingTable, RawMappingEntry};
pub use matcher::MatchMode;
pub use node::{Content, Node};
pub use path::PathExpression;
pub use schema::{DocumentSchema, DEFAULT_GROUP};
pub use values::{from_toml_table, FlatValue, FlatValueMap};
