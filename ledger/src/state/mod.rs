//! # State Store
//!
//! The seam between contract logic and the host's replicated world state.
//!
//! ```text
//! memory.rs — BTreeMap-backed store. Deterministic, zero I/O, for tests.
//! sled.rs   — sled-backed store. One tree, durable, survives reopen.
//! staged.rs — write overlay + WriteSet. Buffers one invocation's writes.
//! ```
//!
//! Keys are strings (composite keys embed `U+0000`, which is fine in Rust
//! strings), values are raw bytes. Scans return entries in
//! byte-lexicographic key order — both implementations get this for free
//! from their ordered backing structures, and the composite key codec
//! depends on it.

pub mod memory;
pub mod sled;
pub mod staged;

pub use self::sled::SledStore;
pub use memory::MemoryStore;
pub use staged::{StagedState, WriteSet};

/// Errors from the state-store layer. Wrapped into
/// [`LedgerError::Storage`](crate::LedgerError::Storage) at the contract
/// boundary.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// sled-level I/O failure.
    #[error("sled error: {0}")]
    Sled(#[from] ::sled::Error),

    /// Backend failure not attributable to a specific store API.
    #[error("backend error: {0}")]
    Backend(String),

    /// A stored record exists but cannot be interpreted.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StateResult<T> = Result<T, StateError>;

/// Durable key-value world state, as the host exposes it to a contract.
///
/// All writes performed through one invocation's [`StagedState`] are applied
/// by the host atomically or not at all; implementations only need plain
/// point operations plus an ordered prefix scan.
pub trait StateStore {
    /// Read the value at `key`, or `None` if absent.
    fn get(&self, key: &str) -> StateResult<Option<Vec<u8>>>;

    /// Write `value` at `key`, overwriting any previous value.
    fn put(&mut self, key: &str, value: Vec<u8>) -> StateResult<()>;

    /// Remove `key`. Deleting an absent key is not an error.
    fn delete(&mut self, key: &str) -> StateResult<()>;

    /// All entries whose key starts with `prefix`, in byte-lexicographic
    /// key order.
    fn scan_prefix(&self, prefix: &str) -> StateResult<Vec<(String, Vec<u8>)>>;
}
