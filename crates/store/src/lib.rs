//! Graph-store collaborator for the Weft engine.
//!
//! An in-memory ordered key-value store executing buffered operations
//! inside explicit transactions. The engine treats it purely as a
//! parameterized-operation executor: put/get/delete/scan inside a
//! transaction handle, commit on success, rollback on failure.

pub mod memory;

pub use memory::{MemoryStore, Transaction};
