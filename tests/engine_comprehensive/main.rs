//! Comprehensive engine test suite.
//!
//! Exercises the public surface end to end: batch node creation with
//! temporary identifiers, relation binding validation, k-degree
//! expansion, cache coherence, node lifecycle, and transaction
//! semantics.
//!
//! ```bash
//! cargo test --test engine_comprehensive
//! ```


mod expansion_traversal;
mod node_lifecycle;
mod transactions;
