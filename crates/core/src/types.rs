//! Entity, identifier, and request/result types for the graph engine.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Open string-to-string property map attached to a node.
pub type Properties = BTreeMap<String, String>;

/// Property keys managed by the engine; callers may not supply them.
pub const RESERVED_PROPERTY_KEYS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Name of the implicit membership relation from a graph to each node it owns.
pub const MEMBERSHIP_RELATION: &str = "contains";

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse the canonical hyphenated string form.
            pub fn parse(s: &str) -> Option<Self> {
                Uuid::parse_str(s).ok().map(Self)
            }

            /// The underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Permanent identifier of a graph.
    GraphId
);
define_id!(
    /// Permanent identifier of a node.
    NodeId
);
define_id!(
    /// Permanent identifier of a relation.
    RelationId
);

/// A graph: an independent container of nodes and relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub id: GraphId,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A node: a property bag owned by exactly one graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named directed relation between two nodes of the same graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: RelationId,
    pub name: String,
    pub source: NodeId,
    pub target: NodeId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create one node within a batch.
///
/// `temp_id` is the caller-chosen token naming this node for relation
/// binding inside the same batch; it must be unique per batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRequest {
    pub temp_id: String,
    #[serde(default)]
    pub properties: Properties,
}

impl NodeRequest {
    /// Convenience constructor for a node request without properties.
    pub fn new(temp_id: impl Into<String>) -> Self {
        Self {
            temp_id: temp_id.into(),
            properties: Properties::new(),
        }
    }

    /// Attach a property to the request.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Request to bind two nodes with a named relation.
///
/// `source` and `target` are endpoint tokens: either a temporary
/// identifier from the current batch or the permanent UUID of an
/// existing node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationRequest {
    pub source: String,
    pub target: String,
    pub name: String,
}

impl RelationRequest {
    /// Convenience constructor.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            name: name.into(),
        }
    }
}

/// Request to create a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl GraphRequest {
    /// Convenience constructor.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
        }
    }
}

/// A materialized graph view: the graph record plus a node and relation
/// set. Returned by batch creation and by k-degree expansion; nodes and
/// relations are sorted by id so equal views compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphResult {
    pub graph: Graph,
    pub nodes: Vec<Node>,
    pub relations: Vec<Relation>,
}

impl GraphResult {
    /// Number of nodes in the view.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of relations in the view.
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Whether the view contains the given node.
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }
}

/// Whether a property key is reserved for engine-managed fields.
pub fn is_reserved_property_key(key: &str) -> bool {
    RESERVED_PROPERTY_KEYS.contains(&key)
}
