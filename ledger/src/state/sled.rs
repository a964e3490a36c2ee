//! Durable world state over sled.
//!
//! One sled tree (`world_state`) holds every record; keys are the UTF-8
//! bytes of the string keys used everywhere else. sled iterates trees in
//! byte order, so `scan_prefix` comes straight from `Tree::scan_prefix`.
//!
//! This store backs single-node deployments and durability tests. In a real
//! replicated deployment the world state lives in the host's own storage
//! engine and contracts see it only through the [`StateStore`] trait.

use std::path::Path;

use sled::{Db, Tree};

use super::{StateError, StateResult, StateStore};

const WORLD_STATE_TREE: &str = "world_state";

/// sled-backed [`StateStore`].
///
/// Thread safety follows from sled: lock-free concurrent reads, serialized
/// writes. Clones share the same underlying tree.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: Db,
    tree: Tree,
}

impl SledStore {
    /// Open or create a store at the given filesystem path.
    pub fn open<P: AsRef<Path>>(path: P) -> StateResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Create a temporary store that lives in memory and is cleaned up on
    /// drop. Ideal for unit tests — no filesystem side effects.
    pub fn open_temporary() -> StateResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> StateResult<Self> {
        let tree = db.open_tree(WORLD_STATE_TREE)?;
        Ok(Self { db, tree })
    }

    /// Block until all pending writes are durable on disk.
    pub fn flush(&self) -> StateResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl StateStore for SledStore {
    fn get(&self, key: &str) -> StateResult<Option<Vec<u8>>> {
        Ok(self.tree.get(key.as_bytes())?.map(|v| v.to_vec()))
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> StateResult<()> {
        self.tree.insert(key.as_bytes(), value)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StateResult<()> {
        self.tree.remove(key.as_bytes())?;
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> StateResult<Vec<(String, Vec<u8>)>> {
        let mut entries = Vec::new();
        for item in self.tree.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            let key = String::from_utf8(key.to_vec()).map_err(|_| {
                StateError::Corrupt("world-state key is not valid UTF-8".into())
            })?;
            entries.push((key, value.to_vec()));
        }
        Ok(entries)
    }
}
