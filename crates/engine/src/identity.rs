//! Identity resolution for batch node creation.
//!
//! A batch names its nodes with caller-chosen temporary identifiers.
//! The map from temporary identifier to permanent id is request-scoped:
//! created empty, populated as each node is created (so later relation
//! bindings in the same batch can reference earlier nodes), and
//! discarded with the request. Duplicate temporary identifiers are
//! detected incrementally, before the offending node is assigned an id,
//! so nothing beyond the duplicate is ever written.

use rustc_hash::FxHashMap;

use weft_core::types::is_reserved_property_key;
use weft_core::{NodeId, Properties, WeftError, WeftResult};

/// Request-scoped map from temporary identifier to permanent node id.
#[derive(Debug, Default)]
pub struct TempIdMap {
    map: FxHashMap<String, NodeId>,
}

impl TempIdMap {
    /// Create an empty map for a new batch request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a temporary identifier for a freshly assigned node id.
    ///
    /// Fails with `DuplicateTemporaryIdentifier` if the identifier is
    /// already bound in this batch.
    pub fn insert(&mut self, temp_id: &str, node: NodeId) -> WeftResult<()> {
        if self.map.contains_key(temp_id) {
            return Err(WeftError::DuplicateTemporaryIdentifier {
                temp_id: temp_id.to_string(),
            });
        }
        self.map.insert(temp_id.to_string(), node);
        Ok(())
    }

    /// Resolve a temporary identifier, if it is bound in this batch.
    pub fn resolve(&self, temp_id: &str) -> Option<NodeId> {
        self.map.get(temp_id).copied()
    }

    /// Number of bound identifiers.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the batch has bound no identifiers yet.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Reject property maps that carry engine-managed keys.
///
/// Checked before any store write for the node in question.
pub fn check_properties(properties: &Properties) -> WeftResult<()> {
    for key in properties.keys() {
        if is_reserved_property_key(key) {
            return Err(WeftError::ReservedPropertyKey { key: key.clone() });
        }
    }
    Ok(())
}
