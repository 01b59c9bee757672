//! Core types for the Weft property-graph engine.
//!
//! Identifiers, entities, request/result types, the error taxonomy, and
//! cache configuration shared by the store and engine crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::{CacheBound, CacheConfig};
pub use error::{WeftError, WeftResult};
pub use types::{
    Graph, GraphId, GraphRequest, GraphResult, Node, NodeId, NodeRequest, Properties, Relation,
    RelationId, RelationRequest,
};
