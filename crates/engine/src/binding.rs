//! Relation binding validation for batch requests.
//!
//! A relation request names its endpoints with tokens that are either
//! temporary identifiers bound earlier in the same batch or UUIDs of
//! pre-existing nodes. Every endpoint must resolve, and every resolved
//! node must already be owned by the target graph; nothing here assumes
//! an endpoint is valid just because another request referenced it.

use std::collections::BTreeSet;

use weft_core::{GraphId, NodeId, RelationRequest, WeftError, WeftResult};
use weft_store::Transaction;

use crate::identity::TempIdMap;
use crate::keys;
use crate::mutation::owning_graph;

/// A relation request whose endpoints resolved to permanent node ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    pub source: NodeId,
    pub target: NodeId,
    pub name: String,
}

/// Resolve an endpoint token: temporary identifier first, then UUID.
///
/// A token that is neither fails with `NodeNotFound` naming the token.
pub fn resolve_endpoint(token: &str, map: &TempIdMap) -> WeftResult<NodeId> {
    if let Some(node) = map.resolve(token) {
        return Ok(node);
    }
    NodeId::parse(token).ok_or_else(|| WeftError::node_not_found(token))
}

/// Resolve and validate a batch of relation requests against a graph.
///
/// Resolution covers every request before ownership is checked, so the
/// distinct endpoint set is verified in one pass over the ownership
/// index. An endpoint with no ownership entry fails with `NodeNotFound`;
/// one owned by a different graph fails with
/// `CrossGraphRelationViolation`. Output preserves request order.
pub fn validate_bindings(
    tx: &Transaction,
    graph: &GraphId,
    requests: &[RelationRequest],
    map: &TempIdMap,
) -> WeftResult<Vec<ResolvedBinding>> {
    let mut resolved = Vec::with_capacity(requests.len());
    let mut endpoints = BTreeSet::new();
    for request in requests {
        keys::validate_relation_name(&request.name)?;
        let source = resolve_endpoint(&request.source, map)?;
        let target = resolve_endpoint(&request.target, map)?;
        endpoints.insert(source);
        endpoints.insert(target);
        resolved.push(ResolvedBinding {
            source,
            target,
            name: request.name.clone(),
        });
    }
    for node in &endpoints {
        match owning_graph(tx, node)? {
            Some(owner) if owner == *graph => {}
            Some(_) => {
                return Err(WeftError::CrossGraphRelationViolation {
                    node: node.to_string(),
                })
            }
            None => return Err(WeftError::node_not_found(node)),
        }
    }
    Ok(resolved)
}
