//! K-degree expansion: bounded breadth-first traversal from a start
//! node.
//!
//! Adjacency is undirected for traversal purposes; a relation makes its
//! two endpoints mutual neighbors regardless of direction. The degree
//! bound counts traversal rounds from the start node. A negative degree
//! removes the bound and the walk runs to fixpoint, which terminates
//! because the visited set only grows and the graph is finite. Degree
//! zero yields the start node alone.
//!
//! The returned view carries every visited node plus the relations whose
//! endpoints are both visited. Membership relations live outside the
//! relation key family and never appear in results. Nodes and relations
//! are sorted by id so equal frontiers compare equal.

use std::collections::BTreeSet;

use weft_core::{GraphId, GraphResult, Node, NodeId, Relation, WeftError, WeftResult};
use weft_store::Transaction;

use crate::keys;
use crate::mutation::{decode, get_node, owning_graph, require_graph};

/// Expand from `start` up to `degree` traversal rounds.
pub fn expand(
    tx: &Transaction,
    graph: &GraphId,
    start: &NodeId,
    degree: i64,
) -> WeftResult<GraphResult> {
    let graph_record = require_graph(tx, graph)?;
    if get_node(tx, start)?.is_none() {
        return Err(WeftError::node_not_found(start));
    }
    match owning_graph(tx, start)? {
        Some(owner) if owner == *graph => {}
        _ => {
            return Err(WeftError::NodeBoundToAnotherGraph {
                node: start.to_string(),
            })
        }
    }

    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    visited.insert(*start);
    let mut frontier = vec![*start];
    let mut rounds: i64 = 0;
    while !frontier.is_empty() && (degree < 0 || rounds < degree) {
        let mut next = Vec::new();
        for node in &frontier {
            for neighbor in neighbors(tx, graph, node)? {
                if visited.contains(&neighbor) {
                    continue;
                }
                // Adjacency entries whose node record is gone are
                // stale; skip them rather than surface phantom nodes.
                if get_node(tx, &neighbor)?.is_none() {
                    tracing::warn!(
                        target: "weft::engine",
                        graph = %graph,
                        node = %neighbor,
                        "adjacency entry points at missing node"
                    );
                    continue;
                }
                visited.insert(neighbor);
                next.push(neighbor);
            }
        }
        frontier = next;
        rounds += 1;
    }

    let mut nodes: Vec<Node> = Vec::with_capacity(visited.len());
    for id in &visited {
        if let Some(node) = get_node(tx, id)? {
            nodes.push(node);
        }
    }

    let mut relations: Vec<Relation> = Vec::new();
    if degree != 0 {
        for (_, raw) in tx.scan_prefix(&keys::relations_prefix(graph))? {
            let relation: Relation = decode(&raw)?;
            if visited.contains(&relation.source) && visited.contains(&relation.target) {
                relations.push(relation);
            }
        }
        relations.sort_by_key(|r| r.id);
    }

    Ok(GraphResult {
        graph: graph_record,
        nodes,
        relations,
    })
}

/// Undirected neighbors of a node: forward targets plus reverse sources.
fn neighbors(tx: &Transaction, graph: &GraphId, node: &NodeId) -> WeftResult<Vec<NodeId>> {
    let mut out = Vec::new();
    let prefixes = [
        keys::forward_adj_prefix(graph, node),
        keys::reverse_adj_prefix(graph, node),
    ];
    for prefix in prefixes {
        for (_, raw) in tx.scan_prefix(&prefix)? {
            if let Some(neighbor) = NodeId::parse(&raw) {
                out.push(neighbor);
            }
        }
    }
    Ok(out)
}
