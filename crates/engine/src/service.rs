//! Service facade: transaction boundary, cache coordination, and the
//! engine-level operations.
//!
//! Every mutating operation exists twice: a `*_tx` form taking the
//! active transaction explicitly, and a top-level wrapper that runs the
//! `*_tx` form through `with_transaction` and invalidates the graph's
//! cache entries after a successful commit. Invalidation is
//! unconditional; the wrapper never reasons about whether a mutation
//! could have changed a cached result. `expand` is read-only and
//! cache-first.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use weft_core::{
    CacheConfig, Graph, GraphId, GraphRequest, GraphResult, Node, NodeId, NodeRequest, Relation,
    RelationId, RelationRequest, WeftError, WeftResult,
};
use weft_store::{MemoryStore, Transaction};

use crate::binding::validate_bindings;
use crate::cache::ExpansionCache;
use crate::expansion;
use crate::identity::TempIdMap;
use crate::mutation;

/// A single relation change within an update batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationChange {
    /// Rename the relation, keeping its endpoints.
    Rename { relation: RelationId, name: String },
    /// Remove the relation and its adjacency entries.
    Delete { relation: RelationId },
}

/// The engine's public surface: a store, a cache, and the operations.
pub struct GraphService {
    store: Arc<MemoryStore>,
    cache: Arc<ExpansionCache>,
}

impl GraphService {
    /// Build a service over a store with a validated cache config.
    pub fn new(store: Arc<MemoryStore>, config: CacheConfig) -> Self {
        Self {
            store,
            cache: Arc::new(ExpansionCache::new(config)),
        }
    }

    /// Build a service sharing an existing cache instance.
    pub fn with_cache(store: Arc<MemoryStore>, cache: Arc<ExpansionCache>) -> Self {
        Self { store, cache }
    }

    /// The expansion cache, shared process-wide.
    pub fn cache(&self) -> &ExpansionCache {
        &self.cache
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    /// Run a closure inside a transaction: commit on `Ok`, roll back on
    /// `Err`. The handle is always finished when this returns.
    pub fn with_transaction<T>(
        &self,
        f: impl FnOnce(&mut Transaction) -> WeftResult<T>,
    ) -> WeftResult<T> {
        let mut tx = self.store.begin();
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(target: "weft::engine", error = %e, "rolling back transaction");
                tx.rollback()?;
                Err(e)
            }
        }
    }

    // =========================================================================
    // Engine-level operations, explicit transaction
    // =========================================================================

    /// Create a batch of nodes in a graph and bind them with relations,
    /// all stamped with one `now`.
    ///
    /// Nodes are created in submission order; each temporary identifier
    /// is bound before the next node is touched, so a duplicate aborts
    /// with nothing written beyond it. Relation endpoints resolve
    /// through the batch's temporary identifiers or permanent UUIDs and
    /// must all be owned by the target graph.
    pub fn create_and_bind_nodes_tx(
        &self,
        tx: &mut Transaction,
        graph: &GraphId,
        nodes: &[NodeRequest],
        relations: &[RelationRequest],
        now: DateTime<Utc>,
    ) -> WeftResult<GraphResult> {
        mutation::require_graph(tx, graph)?;

        let mut map = TempIdMap::new();
        let mut created = Vec::with_capacity(nodes.len());
        for request in nodes {
            let id = NodeId::new();
            map.insert(&request.temp_id, id)?;
            mutation::create_node(tx, graph, id, request.properties.clone(), now)?;
            created.push(id);
        }

        let bindings = validate_bindings(tx, graph, relations, &map)?;
        let mut created_relations = Vec::with_capacity(bindings.len());
        for binding in &bindings {
            created_relations.push(mutation::create_relation(
                tx,
                graph,
                binding.source,
                binding.target,
                &binding.name,
                now,
            )?);
        }
        mutation::touch_graph(tx, graph, now)?;

        // Relation creation touched endpoint timestamps; re-read the
        // batch for the returned view.
        let mut result_nodes = Vec::with_capacity(created.len());
        for id in &created {
            let node =
                mutation::get_node(tx, id)?.ok_or_else(|| WeftError::node_not_found(id))?;
            result_nodes.push(node);
        }
        result_nodes.sort_by_key(|n| n.id);
        created_relations.sort_by_key(|r| r.id);

        tracing::debug!(
            target: "weft::engine",
            graph = %graph,
            nodes = result_nodes.len(),
            relations = created_relations.len(),
            "batch created"
        );
        Ok(GraphResult {
            graph: mutation::require_graph(tx, graph)?,
            nodes: result_nodes,
            relations: created_relations,
        })
    }

    /// Create a graph and populate it with a node batch in one request.
    pub fn create_graph_and_nodes_tx(
        &self,
        tx: &mut Transaction,
        request: &GraphRequest,
        nodes: &[NodeRequest],
        relations: &[RelationRequest],
        now: DateTime<Utc>,
    ) -> WeftResult<GraphResult> {
        let graph = mutation::create_graph(tx, request, now)?;
        self.create_and_bind_nodes_tx(tx, &graph.id, nodes, relations, now)
    }

    /// Replace a node's property map; returns the owning graph with the
    /// updated node.
    pub fn update_node_tx(
        &self,
        tx: &mut Transaction,
        node: &NodeId,
        properties: weft_core::Properties,
        now: DateTime<Utc>,
    ) -> WeftResult<(GraphId, Node)> {
        let (graph, updated) = mutation::update_node(tx, node, properties, now)?;
        mutation::touch_graph(tx, &graph, now)?;
        Ok((graph, updated))
    }

    /// Apply a batch of relation renames and deletes within a graph.
    /// Returns the surviving renamed relations in submission order.
    pub fn update_or_delete_relations_tx(
        &self,
        tx: &mut Transaction,
        graph: &GraphId,
        changes: &[RelationChange],
        now: DateTime<Utc>,
    ) -> WeftResult<Vec<Relation>> {
        mutation::require_graph(tx, graph)?;
        let mut renamed = Vec::new();
        for change in changes {
            match change {
                RelationChange::Rename { relation, name } => {
                    renamed.push(mutation::rename_relation(tx, graph, relation, name, now)?);
                }
                RelationChange::Delete { relation } => {
                    mutation::delete_relation(tx, graph, relation)?;
                }
            }
        }
        mutation::touch_graph(tx, graph, now)?;
        Ok(renamed)
    }

    /// Delete a batch of nodes from a graph with their incident
    /// relations.
    pub fn delete_nodes_tx(
        &self,
        tx: &mut Transaction,
        graph: &GraphId,
        nodes: &[NodeId],
        now: DateTime<Utc>,
    ) -> WeftResult<()> {
        mutation::require_graph(tx, graph)?;
        mutation::delete_nodes(tx, graph, nodes)?;
        mutation::touch_graph(tx, graph, now)?;
        Ok(())
    }

    // =========================================================================
    // Transactional wrappers
    // =========================================================================

    /// Transactional [`Self::create_and_bind_nodes_tx`].
    pub fn create_and_bind_nodes(
        &self,
        graph: &GraphId,
        nodes: &[NodeRequest],
        relations: &[RelationRequest],
    ) -> WeftResult<GraphResult> {
        let now = Utc::now();
        let result = self
            .with_transaction(|tx| self.create_and_bind_nodes_tx(tx, graph, nodes, relations, now))?;
        self.cache.invalidate_graph(graph);
        Ok(result)
    }

    /// Transactional [`Self::create_graph_and_nodes_tx`].
    pub fn create_graph_and_nodes(
        &self,
        request: &GraphRequest,
        nodes: &[NodeRequest],
        relations: &[RelationRequest],
    ) -> WeftResult<GraphResult> {
        let now = Utc::now();
        let result = self
            .with_transaction(|tx| self.create_graph_and_nodes_tx(tx, request, nodes, relations, now))?;
        self.cache.invalidate_graph(&result.graph.id);
        Ok(result)
    }

    /// Transactional [`Self::update_node_tx`].
    pub fn update_node(
        &self,
        node: &NodeId,
        properties: weft_core::Properties,
    ) -> WeftResult<Node> {
        let now = Utc::now();
        let (graph, updated) =
            self.with_transaction(|tx| self.update_node_tx(tx, node, properties, now))?;
        self.cache.invalidate_graph(&graph);
        Ok(updated)
    }

    /// Transactional [`Self::update_or_delete_relations_tx`].
    pub fn update_or_delete_relations(
        &self,
        graph: &GraphId,
        changes: &[RelationChange],
    ) -> WeftResult<Vec<Relation>> {
        let now = Utc::now();
        let renamed =
            self.with_transaction(|tx| self.update_or_delete_relations_tx(tx, graph, changes, now))?;
        self.cache.invalidate_graph(graph);
        Ok(renamed)
    }

    /// Transactional [`Self::delete_nodes_tx`].
    pub fn delete_nodes(&self, graph: &GraphId, nodes: &[NodeId]) -> WeftResult<()> {
        let now = Utc::now();
        self.with_transaction(|tx| self.delete_nodes_tx(tx, graph, nodes, now))?;
        self.cache.invalidate_graph(graph);
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// K-degree expansion, cache-first.
    ///
    /// A hit returns the cached view without touching the store; a miss
    /// traverses inside a read transaction and stores the result.
    pub fn expand(&self, graph: &GraphId, start: &NodeId, degree: i64) -> WeftResult<GraphResult> {
        if let Some(hit) = self.cache.get(graph, degree) {
            tracing::debug!(target: "weft::engine", graph = %graph, degree, "expansion cache hit");
            return Ok(hit);
        }
        let result = {
            let tx = self.store.begin();
            expansion::expand(&tx, graph, start, degree)?
        };
        self.cache.put(graph, degree, &result)?;
        Ok(result)
    }

    /// Fetch a graph record.
    pub fn get_graph(&self, graph: &GraphId) -> WeftResult<Graph> {
        let tx = self.store.begin();
        mutation::require_graph(&tx, graph)
    }

    /// Fetch a node record.
    pub fn get_node(&self, node: &NodeId) -> WeftResult<Node> {
        let tx = self.store.begin();
        mutation::get_node(&tx, node)?.ok_or_else(|| WeftError::node_not_found(node))
    }

    /// All graphs, sorted by id.
    pub fn list_graphs(&self) -> WeftResult<Vec<Graph>> {
        let tx = self.store.begin();
        mutation::list_graphs(&tx)
    }

    // =========================================================================
    // Graph lifecycle
    // =========================================================================

    /// Create an empty graph.
    pub fn create_graph(&self, request: &GraphRequest) -> WeftResult<Graph> {
        let now = Utc::now();
        let graph = self.with_transaction(|tx| mutation::create_graph(tx, request, now))?;
        tracing::info!(target: "weft::engine", graph = %graph.id, title = %graph.title, "graph created");
        Ok(graph)
    }

    /// Delete a graph with everything it owns, and its cache entries.
    pub fn delete_graph(&self, graph: &GraphId) -> WeftResult<()> {
        self.with_transaction(|tx| mutation::delete_graph(tx, graph))?;
        self.cache.invalidate_graph(graph);
        tracing::info!(target: "weft::engine", graph = %graph, "graph deleted");
        Ok(())
    }
}
