//! In-memory ordered store with buffered transactions.
//!
//! Committed state is a single ordered map behind an `RwLock`; prefix
//! scans need the ordering. A transaction buffers its writes privately
//! and sees them overlaid on the committed state (read-your-writes),
//! then applies them atomically on commit under the write lock. Rollback
//! discards the buffer. Isolation across concurrent transactions is the
//! store's job; the engine runs one transaction per request and never
//! locks on top of this.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use weft_core::{WeftError, WeftResult};

/// Process-wide in-memory store.
pub struct MemoryStore {
    committed: RwLock<BTreeMap<String, String>>,
    /// Bumped on every commit; used by tests to observe write activity.
    version: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            committed: RwLock::new(BTreeMap::new()),
            version: AtomicU64::new(0),
        })
    }

    /// Begin a new transaction over the current committed state.
    pub fn begin(self: &Arc<Self>) -> Transaction {
        Transaction {
            store: Arc::clone(self),
            writes: BTreeMap::new(),
            state: TxnState::Active,
        }
    }

    /// Commit counter; bumped once per successful commit.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Number of committed keys.
    pub fn len(&self) -> usize {
        self.committed.read().len()
    }

    /// Whether the committed state is empty.
    pub fn is_empty(&self) -> bool {
        self.committed.read().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxnState {
    Active,
    Committed,
    RolledBack,
}

/// A transaction handle: buffered writes over a read view.
///
/// Dropping an active handle discards its writes, so the handle is
/// always released on exit whether the request succeeded or not. Any
/// operation on a finished handle fails with `TransactionRequired`.
pub struct Transaction {
    store: Arc<MemoryStore>,
    /// Buffered writes: `Some` is a put, `None` a delete.
    writes: BTreeMap<String, Option<String>>,
    state: TxnState,
}

impl Transaction {
    fn ensure_active(&self) -> WeftResult<()> {
        match self.state {
            TxnState::Active => Ok(()),
            _ => Err(WeftError::TransactionRequired),
        }
    }

    /// Whether the transaction is still open.
    pub fn is_active(&self) -> bool {
        self.state == TxnState::Active
    }

    /// Read a key, seeing this transaction's own writes first.
    pub fn get(&self, key: &str) -> WeftResult<Option<String>> {
        self.ensure_active()?;
        if let Some(buffered) = self.writes.get(key) {
            return Ok(buffered.clone());
        }
        Ok(self.store.committed.read().get(key).cloned())
    }

    /// Buffer a put.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> WeftResult<()> {
        self.ensure_active()?;
        self.writes.insert(key.into(), Some(value.into()));
        Ok(())
    }

    /// Buffer a delete.
    pub fn delete(&mut self, key: impl Into<String>) -> WeftResult<()> {
        self.ensure_active()?;
        self.writes.insert(key.into(), None);
        Ok(())
    }

    /// All live `(key, value)` pairs under a prefix, in key order, with
    /// this transaction's writes overlaid.
    pub fn scan_prefix(&self, prefix: &str) -> WeftResult<Vec<(String, String)>> {
        self.ensure_active()?;
        let mut merged: BTreeMap<String, String> = {
            let committed = self.store.committed.read();
            committed
                .range(prefix.to_string()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };
        for (key, value) in self
            .writes
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }

    /// Apply all buffered writes atomically and finish the handle.
    pub fn commit(&mut self) -> WeftResult<()> {
        self.ensure_active()?;
        {
            let mut committed = self.store.committed.write();
            for (key, value) in std::mem::take(&mut self.writes) {
                match value {
                    Some(v) => {
                        committed.insert(key, v);
                    }
                    None => {
                        committed.remove(&key);
                    }
                }
            }
        }
        self.store.version.fetch_add(1, Ordering::AcqRel);
        self.state = TxnState::Committed;
        Ok(())
    }

    /// Discard all buffered writes and finish the handle.
    pub fn rollback(&mut self) -> WeftResult<()> {
        self.ensure_active()?;
        self.writes.clear();
        self.state = TxnState::RolledBack;
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TxnState::Active && !self.writes.is_empty() {
            tracing::debug!(
                target: "weft::store",
                buffered = self.writes.len(),
                "transaction dropped without commit; writes discarded"
            );
        }
    }
}
