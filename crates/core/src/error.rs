//! Error taxonomy for Weft.
//!
//! Every variant maps to a stable machine-readable code and names the
//! offending identifier, so callers can correct a request without
//! inspecting engine internals. All of these abort the whole request:
//! the transaction boundary converts them into a rollback.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type WeftResult<T> = Result<T, WeftError>;

/// All errors surfaced by the Weft engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeftError {
    /// The named graph does not exist.
    #[error("graph not found: {id}")]
    GraphNotFound { id: String },

    /// The named node does not exist.
    #[error("node not found: {id}")]
    NodeNotFound { id: String },

    /// The named relation does not exist in the given graph.
    #[error("relation not found: {id}")]
    RelationNotFound { id: String },

    /// Two node requests in one batch carry the same temporary identifier.
    #[error("duplicate temporary identifier in batch: '{temp_id}'")]
    DuplicateTemporaryIdentifier { temp_id: String },

    /// A caller-supplied property map contains a reserved key.
    #[error("reserved property key: '{key}'")]
    ReservedPropertyKey { key: String },

    /// A relation request binds a node owned by a different graph.
    #[error("relation endpoint {node} belongs to another graph")]
    CrossGraphRelationViolation { node: String },

    /// A node delete names a node owned by a different graph.
    #[error("node {node} is bound to another graph")]
    NodeBoundToAnotherGraph { node: String },

    /// A write operation ran without an active transaction.
    #[error("operation requires an active transaction")]
    TransactionRequired,

    /// Malformed caller input outside the specific variants above.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A record could not be serialized or deserialized.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// Invalid engine configuration.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

impl WeftError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            WeftError::GraphNotFound { .. } => "GRAPH_NOT_FOUND",
            WeftError::NodeNotFound { .. } => "NODE_NOT_FOUND",
            WeftError::RelationNotFound { .. } => "RELATION_NOT_FOUND",
            WeftError::DuplicateTemporaryIdentifier { .. } => "DUPLICATE_TEMPORARY_IDENTIFIER",
            WeftError::ReservedPropertyKey { .. } => "RESERVED_PROPERTY_KEY",
            WeftError::CrossGraphRelationViolation { .. } => "CROSS_GRAPH_RELATION_VIOLATION",
            WeftError::NodeBoundToAnotherGraph { .. } => "NODE_BOUND_TO_ANOTHER_GRAPH",
            WeftError::TransactionRequired => "TRANSACTION_REQUIRED",
            WeftError::InvalidInput { .. } => "INVALID_INPUT",
            WeftError::Serialization { .. } => "SERIALIZATION_ERROR",
            WeftError::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// Construct a `GraphNotFound` error.
    pub fn graph_not_found(id: impl ToString) -> Self {
        WeftError::GraphNotFound { id: id.to_string() }
    }

    /// Construct a `NodeNotFound` error.
    pub fn node_not_found(id: impl ToString) -> Self {
        WeftError::NodeNotFound { id: id.to_string() }
    }

    /// Construct a `RelationNotFound` error.
    pub fn relation_not_found(id: impl ToString) -> Self {
        WeftError::RelationNotFound { id: id.to_string() }
    }

    /// Construct an `InvalidInput` error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        WeftError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Construct a `Serialization` error.
    pub fn serialization(reason: impl Into<String>) -> Self {
        WeftError::Serialization {
            reason: reason.into(),
        }
    }

    /// Construct a `Config` error.
    pub fn config(reason: impl Into<String>) -> Self {
        WeftError::Config {
            reason: reason.into(),
        }
    }
}
