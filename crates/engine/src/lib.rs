//! Weft engine: property-graph mutation and traversal over the store.
//!
//! The engine is organized around one transaction per request. Batch
//! node creation resolves caller-chosen temporary identifiers, relation
//! bindings are validated against graph ownership, k-degree expansion
//! walks the undirected adjacency, and a bounded TTL cache fronts
//! expansion reads. [`GraphService`] is the entry point.

pub mod binding;
pub mod cache;
pub mod expansion;
pub mod identity;
pub mod keys;
pub mod mutation;
pub mod service;

pub use binding::{resolve_endpoint, validate_bindings, ResolvedBinding};
pub use cache::{CacheStats, ExpansionCache};
pub use expansion::expand;
pub use identity::TempIdMap;
pub use service::{GraphService, RelationChange};
