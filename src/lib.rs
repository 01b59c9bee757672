//! Weft: an embedded property-graph engine.
//!
//! Graphs own nodes; nodes carry open property maps; relations bind
//! nodes of the same graph. Mutations run inside explicit transactions
//! and batch creation binds nodes by temporary identifier. K-degree
//! expansion reads through a bounded TTL cache that every committed
//! mutation invalidates.
//!
//! ```
//! use weft::{CacheConfig, GraphRequest, GraphService, MemoryStore};
//! use weft::{NodeRequest, RelationRequest};
//!
//! # fn main() -> weft::WeftResult<()> {
//! let service = GraphService::new(MemoryStore::new(), CacheConfig::default());
//! let result = service.create_graph_and_nodes(
//!     &GraphRequest::new("routes"),
//!     &[NodeRequest::new("a"), NodeRequest::new("b")],
//!     &[RelationRequest::new("a", "b", "connects")],
//! )?;
//! let view = service.expand(&result.graph.id, &result.nodes[0].id, 1)?;
//! assert_eq!(view.node_count(), 2);
//! # Ok(())
//! # }
//! ```

pub use weft_core::{
    CacheBound, CacheConfig, Graph, GraphId, GraphRequest, GraphResult, Node, NodeId, NodeRequest,
    Properties, Relation, RelationId, RelationRequest, WeftError, WeftResult,
};
pub use weft_engine::{CacheStats, ExpansionCache, GraphService, RelationChange};
pub use weft_store::{MemoryStore, Transaction};
