//! In-memory world state over a `BTreeMap`. The reference implementation
//! for tests and for hosts that manage durability themselves.

use std::collections::BTreeMap;
use std::ops::Bound;

use super::{StateResult, StateStore};

/// BTreeMap-backed [`StateStore`]. Iteration order is byte-lexicographic by
/// construction, which is exactly the scan order the composite key codec
/// requires.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries. Test convenience.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> StateResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> StateResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StateResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> StateResult<Vec<(String, Vec<u8>)>> {
        let range = self
            .entries
            .range::<String, _>((Bound::Included(prefix.to_string()), Bound::Unbounded));
        Ok(range
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.put("k", b"v".to_vec()).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));

        store.delete("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
        // Deleting again is a no-op, not an error.
        store.delete("k").unwrap();
    }

    #[test]
    fn scan_returns_only_prefix_matches_in_order() {
        let mut store = MemoryStore::new();
        store.put("a/2", b"2".to_vec()).unwrap();
        store.put("a/1", b"1".to_vec()).unwrap();
        store.put("b/1", b"x".to_vec()).unwrap();
        store.put("a", b"bare".to_vec()).unwrap();

        let hits = store.scan_prefix("a/").unwrap();
        let keys: Vec<_> = hits.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a/1", "a/2"]);
    }

    #[test]
    fn empty_prefix_scans_everything() {
        let mut store = MemoryStore::new();
        store.put("x", b"1".to_vec()).unwrap();
        store.put("y", b"2".to_vec()).unwrap();
        assert_eq!(store.scan_prefix("").unwrap().len(), 2);
    }
}
