//! Staged write overlay.
//!
//! Contracts never write to the backing store directly. Every put/delete of
//! one invocation lands in a [`StagedState`] overlay; reads and scans see the
//! overlay merged over the backing store (read-your-writes). Only when the
//! whole operation has succeeded does the host take the finished
//! [`WriteSet`] and apply it — so a precondition failure or a late error
//! can never leave a transition partially visible, regardless of whether
//! the host's own commit protocol would have caught it.

use std::collections::BTreeMap;

use tracing::debug;

use super::{StateResult, StateStore};

/// A single buffered mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Write this value at the key.
    Put(Vec<u8>),
    /// Remove the key.
    Delete,
}

/// The complete, ordered set of writes staged by one invocation.
///
/// Applying a write set is the host's commit step. The set is inert data;
/// dropping it discards the invocation's effects entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSet {
    ops: BTreeMap<String, WriteOp>,
}

impl WriteSet {
    /// Number of distinct keys touched.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether any write was staged.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate the staged operations in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WriteOp)> {
        self.ops.iter().map(|(k, op)| (k.as_str(), op))
    }

    /// Apply every staged operation to `store`.
    ///
    /// The backing stores used here apply point writes infallibly short of
    /// I/O errors; on an I/O error mid-apply the host must discard the
    /// transaction, which is exactly the all-or-nothing second safety net
    /// the staging layer assumes.
    pub fn apply<S: StateStore>(&self, store: &mut S) -> StateResult<()> {
        debug!(writes = self.ops.len(), "applying staged write set");
        for (key, op) in &self.ops {
            match op {
                WriteOp::Put(value) => store.put(key, value.clone())?,
                WriteOp::Delete => store.delete(key)?,
            }
        }
        Ok(())
    }
}

/// Read-through view of a backing store with buffered writes on top.
#[derive(Debug)]
pub struct StagedState<'a, S: StateStore> {
    base: &'a S,
    writes: WriteSet,
}

impl<'a, S: StateStore> StagedState<'a, S> {
    /// Stage over an immutable view of `base`.
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            writes: WriteSet::default(),
        }
    }

    /// Read a key, seeing staged-but-uncommitted writes first.
    pub fn get(&self, key: &str) -> StateResult<Option<Vec<u8>>> {
        match self.writes.ops.get(key) {
            Some(WriteOp::Put(value)) => Ok(Some(value.clone())),
            Some(WriteOp::Delete) => Ok(None),
            None => self.base.get(key),
        }
    }

    /// Stage a write. Nothing reaches the backing store.
    pub fn put(&mut self, key: &str, value: Vec<u8>) {
        self.writes.ops.insert(key.to_string(), WriteOp::Put(value));
    }

    /// Stage a delete. Shadows any earlier staged put of the same key.
    pub fn delete(&mut self, key: &str) {
        self.writes.ops.insert(key.to_string(), WriteOp::Delete);
    }

    /// Prefix scan over the merged view: backing entries overridden by
    /// staged puts, minus staged deletes, in byte-lexicographic key order.
    pub fn scan_prefix(&self, prefix: &str) -> StateResult<Vec<(String, Vec<u8>)>> {
        let mut merged: BTreeMap<String, Vec<u8>> =
            self.base.scan_prefix(prefix)?.into_iter().collect();
        for (key, op) in &self.writes.ops {
            if !key.starts_with(prefix) {
                continue;
            }
            match op {
                WriteOp::Put(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                WriteOp::Delete => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }

    /// Hand the buffered writes to the host for commit.
    pub fn into_write_set(self) -> WriteSet {
        self.writes
    }
}
