//! Mutation executor: node and relation writes inside the active
//! transaction.
//!
//! Every write in one request is stamped with the request's single
//! "now" value, so all entities created by a batch share an identical
//! timestamp. Callers validate the target graph once per request and
//! touch its `updated_at` through `touch_graph`; the per-entity
//! functions here assume that check already happened.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use weft_core::types::MEMBERSHIP_RELATION;
use weft_core::{
    Graph, GraphId, GraphRequest, Node, NodeId, Properties, Relation, RelationId, WeftError,
    WeftResult,
};
use weft_store::Transaction;

use crate::identity::check_properties;
use crate::keys;

/// Membership relation record: the implicit graph → node edge,
/// immutable for the node's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Membership {
    id: RelationId,
    name: String,
    graph: GraphId,
    node: NodeId,
    created_at: DateTime<Utc>,
}

pub(crate) fn encode<T: Serialize>(value: &T) -> WeftResult<String> {
    serde_json::to_string(value).map_err(|e| WeftError::serialization(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(raw: &str) -> WeftResult<T> {
    serde_json::from_str(raw).map_err(|e| WeftError::serialization(e.to_string()))
}

// =============================================================================
// Reads
// =============================================================================

/// Get a graph record, or None if it doesn't exist.
pub fn get_graph(tx: &Transaction, graph: &GraphId) -> WeftResult<Option<Graph>> {
    match tx.get(&keys::graph_key(graph))? {
        Some(raw) => Ok(Some(decode(&raw)?)),
        None => Ok(None),
    }
}

/// Get a graph record, failing with `GraphNotFound` if absent.
pub fn require_graph(tx: &Transaction, graph: &GraphId) -> WeftResult<Graph> {
    get_graph(tx, graph)?.ok_or_else(|| WeftError::graph_not_found(graph))
}

/// Get a node record, or None if it doesn't exist.
pub fn get_node(tx: &Transaction, node: &NodeId) -> WeftResult<Option<Node>> {
    match tx.get(&keys::node_key(node))? {
        Some(raw) => Ok(Some(decode(&raw)?)),
        None => Ok(None),
    }
}

fn require_node(tx: &Transaction, node: &NodeId) -> WeftResult<Node> {
    get_node(tx, node)?.ok_or_else(|| WeftError::node_not_found(node))
}

/// Owning graph of a node via the ownership index, or None if unknown.
pub fn owning_graph(tx: &Transaction, node: &NodeId) -> WeftResult<Option<GraphId>> {
    match tx.get(&keys::owner_key(node))? {
        Some(raw) => GraphId::parse(&raw)
            .map(Some)
            .ok_or_else(|| WeftError::serialization(format!("malformed ownership entry: {raw}"))),
        None => Ok(None),
    }
}

/// All graph records, sorted by id.
pub fn list_graphs(tx: &Transaction) -> WeftResult<Vec<Graph>> {
    let mut graphs = Vec::new();
    for (_, raw) in tx.scan_prefix(&keys::all_graphs_prefix())? {
        graphs.push(decode(&raw)?);
    }
    Ok(graphs)
}

// =============================================================================
// Writes
// =============================================================================

/// Create a graph record.
pub fn create_graph(
    tx: &mut Transaction,
    request: &GraphRequest,
    now: DateTime<Utc>,
) -> WeftResult<Graph> {
    let graph = Graph {
        id: GraphId::new(),
        title: request.title.clone(),
        description: request.description.clone(),
        created_at: now,
        updated_at: now,
    };
    tx.put(keys::graph_key(&graph.id), encode(&graph)?)?;
    Ok(graph)
}

/// Refresh a graph's `updated_at`, failing with `GraphNotFound` if absent.
pub fn touch_graph(tx: &mut Transaction, graph: &GraphId, now: DateTime<Utc>) -> WeftResult<()> {
    let mut record = require_graph(tx, graph)?;
    record.updated_at = now;
    tx.put(keys::graph_key(graph), encode(&record)?)?;
    Ok(())
}

/// Create a node under a graph: node record, membership relation, and
/// ownership index entry. The node id is assigned by the caller so the
/// identity resolver can bind it before the write.
pub fn create_node(
    tx: &mut Transaction,
    graph: &GraphId,
    id: NodeId,
    properties: Properties,
    now: DateTime<Utc>,
) -> WeftResult<Node> {
    check_properties(&properties)?;
    let node = Node {
        id,
        properties,
        created_at: now,
        updated_at: now,
    };
    let membership = Membership {
        id: RelationId::new(),
        name: MEMBERSHIP_RELATION.to_string(),
        graph: *graph,
        node: id,
        created_at: now,
    };
    tx.put(keys::node_key(&id), encode(&node)?)?;
    tx.put(keys::membership_key(graph, &id), encode(&membership)?)?;
    tx.put(keys::owner_key(&id), graph.to_string())?;
    Ok(node)
}

/// Create a relation between two already-resolved node ids, stamping
/// both endpoints' `updated_at`.
pub fn create_relation(
    tx: &mut Transaction,
    graph: &GraphId,
    source: NodeId,
    target: NodeId,
    name: &str,
    now: DateTime<Utc>,
) -> WeftResult<Relation> {
    keys::validate_relation_name(name)?;

    let mut src = require_node(tx, &source)?;
    src.updated_at = now;
    tx.put(keys::node_key(&source), encode(&src)?)?;
    // Self-loops re-read the node just written; last write wins either way.
    let mut dst = require_node(tx, &target)?;
    dst.updated_at = now;
    tx.put(keys::node_key(&target), encode(&dst)?)?;

    let relation = Relation {
        id: RelationId::new(),
        name: name.to_string(),
        source,
        target,
        created_at: now,
        updated_at: now,
    };
    tx.put(keys::relation_key(graph, &relation.id), encode(&relation)?)?;
    tx.put(
        keys::forward_adj_key(graph, &source, &relation.id),
        target.to_string(),
    )?;
    tx.put(
        keys::reverse_adj_key(graph, &target, &relation.id),
        source.to_string(),
    )?;
    Ok(relation)
}

/// Replace a node's whole property map, preserving identifier and
/// `created_at` and refreshing `updated_at`. Returns the owning graph
/// alongside the updated node so callers can invalidate its cache.
pub fn update_node(
    tx: &mut Transaction,
    node: &NodeId,
    properties: Properties,
    now: DateTime<Utc>,
) -> WeftResult<(GraphId, Node)> {
    check_properties(&properties)?;
    let graph = owning_graph(tx, node)?.ok_or_else(|| WeftError::node_not_found(node))?;
    let mut record = require_node(tx, node)?;
    record.properties = properties;
    record.updated_at = now;
    tx.put(keys::node_key(node), encode(&record)?)?;
    Ok((graph, record))
}

/// Rename a relation looked up by id within its graph.
pub fn rename_relation(
    tx: &mut Transaction,
    graph: &GraphId,
    relation: &RelationId,
    name: &str,
    now: DateTime<Utc>,
) -> WeftResult<Relation> {
    keys::validate_relation_name(name)?;
    let key = keys::relation_key(graph, relation);
    let raw = tx
        .get(&key)?
        .ok_or_else(|| WeftError::relation_not_found(relation))?;
    let mut record: Relation = decode(&raw)?;
    record.name = name.to_string();
    record.updated_at = now;
    tx.put(key, encode(&record)?)?;
    Ok(record)
}

/// Delete a relation looked up by id within its graph, removing the
/// record and both adjacency entries.
pub fn delete_relation(
    tx: &mut Transaction,
    graph: &GraphId,
    relation: &RelationId,
) -> WeftResult<()> {
    let key = keys::relation_key(graph, relation);
    let raw = tx
        .get(&key)?
        .ok_or_else(|| WeftError::relation_not_found(relation))?;
    let record: Relation = decode(&raw)?;
    tx.delete(key)?;
    tx.delete(keys::forward_adj_key(graph, &record.source, relation))?;
    tx.delete(keys::reverse_adj_key(graph, &record.target, relation))?;
    Ok(())
}

/// Delete a batch of nodes from a graph.
///
/// Every id must exist as a node (`NodeNotFound`) and be a member of
/// the named graph (`NodeBoundToAnotherGraph`); the whole batch is
/// validated before the first delete. Deletion detaches and removes
/// each node together with its membership, ownership entry, and all
/// incident relations.
pub fn delete_nodes(tx: &mut Transaction, graph: &GraphId, nodes: &[NodeId]) -> WeftResult<()> {
    for node in nodes {
        if get_node(tx, node)?.is_none() {
            return Err(WeftError::node_not_found(node));
        }
        match owning_graph(tx, node)? {
            Some(owner) if owner == *graph => {}
            _ => {
                return Err(WeftError::NodeBoundToAnotherGraph {
                    node: node.to_string(),
                })
            }
        }
    }
    for node in nodes {
        delete_incident_relations(tx, graph, node)?;
        tx.delete(keys::membership_key(graph, node))?;
        tx.delete(keys::owner_key(node))?;
        tx.delete(keys::node_key(node))?;
    }
    Ok(())
}

/// Remove all relations incident to a node, forward and reverse.
fn delete_incident_relations(
    tx: &mut Transaction,
    graph: &GraphId,
    node: &NodeId,
) -> WeftResult<()> {
    let fwd_prefix = keys::forward_adj_prefix(graph, node);
    for (key, dst_raw) in tx.scan_prefix(&fwd_prefix)? {
        if let (Some(relation), Some(dst)) = (
            keys::parse_adj_key(&fwd_prefix, &key),
            NodeId::parse(&dst_raw),
        ) {
            tx.delete(keys::relation_key(graph, &relation))?;
            tx.delete(keys::reverse_adj_key(graph, &dst, &relation))?;
        }
        tx.delete(key)?;
    }
    let rev_prefix = keys::reverse_adj_prefix(graph, node);
    for (key, src_raw) in tx.scan_prefix(&rev_prefix)? {
        if let (Some(relation), Some(src)) = (
            keys::parse_adj_key(&rev_prefix, &key),
            NodeId::parse(&src_raw),
        ) {
            tx.delete(keys::relation_key(graph, &relation))?;
            tx.delete(keys::forward_adj_key(graph, &src, &relation))?;
        }
        tx.delete(key)?;
    }
    Ok(())
}

/// Delete a graph and all data scoped to it: nodes, ownership entries,
/// memberships, relations, and adjacency.
pub fn delete_graph(tx: &mut Transaction, graph: &GraphId) -> WeftResult<()> {
    require_graph(tx, graph)?;
    for (key, _) in tx.scan_prefix(&keys::memberships_prefix(graph))? {
        if let Some(node) = keys::parse_membership_key(graph, &key) {
            tx.delete(keys::node_key(&node))?;
            tx.delete(keys::owner_key(&node))?;
        }
    }
    for prefix in keys::graph_scoped_prefixes(graph) {
        for (key, _) in tx.scan_prefix(&prefix)? {
            tx.delete(key)?;
        }
    }
    tx.delete(keys::graph_key(graph))?;
    Ok(())
}
