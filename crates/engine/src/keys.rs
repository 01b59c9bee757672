//! Key construction and parsing for the graph layout.
//!
//! All graph data lives in the KV store under `/`-separated keys:
//!
//! - `g/{graph}`                 → graph record
//! - `n/{node}`                  → node record
//! - `o/{node}`                  → owning graph id (ownership index)
//! - `m/{graph}/{node}`          → membership relation record
//! - `r/{graph}/{relation}`      → relation record
//! - `a/{graph}/{src}/{relation}` → dst node id (forward adjacency)
//! - `b/{graph}/{dst}/{relation}` → src node id (reverse adjacency)
//!
//! UUIDs never contain the separator, so parsing is a prefix strip.

use weft_core::{GraphId, NodeId, RelationId, WeftError, WeftResult};

/// Separator between key path segments.
const SEP: char = '/';

/// Validate a relation name supplied by the caller.
pub fn validate_relation_name(name: &str) -> WeftResult<()> {
    if name.is_empty() {
        return Err(WeftError::invalid_input("relation name must not be empty"));
    }
    Ok(())
}

// =============================================================================
// Key construction
// =============================================================================

/// Key for a graph record: `g/{graph}`.
pub fn graph_key(graph: &GraphId) -> String {
    format!("g{SEP}{graph}")
}

/// Prefix for all graph records: `g/`.
pub fn all_graphs_prefix() -> String {
    format!("g{SEP}")
}

/// Key for a node record: `n/{node}`.
pub fn node_key(node: &NodeId) -> String {
    format!("n{SEP}{node}")
}

/// Key for a node's ownership index entry: `o/{node}`.
pub fn owner_key(node: &NodeId) -> String {
    format!("o{SEP}{node}")
}

/// Key for a membership relation record: `m/{graph}/{node}`.
pub fn membership_key(graph: &GraphId, node: &NodeId) -> String {
    format!("m{SEP}{graph}{SEP}{node}")
}

/// Prefix for all membership records of a graph: `m/{graph}/`.
pub fn memberships_prefix(graph: &GraphId) -> String {
    format!("m{SEP}{graph}{SEP}")
}

/// Key for a relation record: `r/{graph}/{relation}`.
pub fn relation_key(graph: &GraphId, relation: &RelationId) -> String {
    format!("r{SEP}{graph}{SEP}{relation}")
}

/// Prefix for all relation records of a graph: `r/{graph}/`.
pub fn relations_prefix(graph: &GraphId) -> String {
    format!("r{SEP}{graph}{SEP}")
}

/// Key for a forward adjacency entry: `a/{graph}/{src}/{relation}`.
pub fn forward_adj_key(graph: &GraphId, src: &NodeId, relation: &RelationId) -> String {
    format!("a{SEP}{graph}{SEP}{src}{SEP}{relation}")
}

/// Prefix for a node's forward adjacency: `a/{graph}/{src}/`.
pub fn forward_adj_prefix(graph: &GraphId, src: &NodeId) -> String {
    format!("a{SEP}{graph}{SEP}{src}{SEP}")
}

/// Key for a reverse adjacency entry: `b/{graph}/{dst}/{relation}`.
pub fn reverse_adj_key(graph: &GraphId, dst: &NodeId, relation: &RelationId) -> String {
    format!("b{SEP}{graph}{SEP}{dst}{SEP}{relation}")
}

/// Prefix for a node's reverse adjacency: `b/{graph}/{dst}/`.
pub fn reverse_adj_prefix(graph: &GraphId, dst: &NodeId) -> String {
    format!("b{SEP}{graph}{SEP}{dst}{SEP}")
}

/// Prefixes covering every graph-scoped key family, used by graph delete.
pub fn graph_scoped_prefixes(graph: &GraphId) -> [String; 4] {
    [
        memberships_prefix(graph),
        relations_prefix(graph),
        format!("a{SEP}{graph}{SEP}"),
        format!("b{SEP}{graph}{SEP}"),
    ]
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse the node id out of a membership key for the given graph.
pub fn parse_membership_key(graph: &GraphId, key: &str) -> Option<NodeId> {
    key.strip_prefix(&memberships_prefix(graph))
        .and_then(NodeId::parse)
}

/// Parse the relation id out of a relation key for the given graph.
pub fn parse_relation_key(graph: &GraphId, key: &str) -> Option<RelationId> {
    key.strip_prefix(&relations_prefix(graph))
        .and_then(RelationId::parse)
}

/// Parse the relation id out of an adjacency key, given its scan prefix.
pub fn parse_adj_key(prefix: &str, key: &str) -> Option<RelationId> {
    key.strip_prefix(prefix).and_then(RelationId::parse)
}
