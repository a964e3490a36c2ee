//! # Transaction Context
//!
//! The per-invocation bundle a contract operation runs against: a staged
//! view of world state, the resolved caller identity, and the events the
//! operation has recorded. The host constructs one context per submitted
//! transaction, runs the operation, and either commits the finished write
//! set and delivers the events (on `Ok`) or drops the whole context (on
//! `Err`). A contract holding a context can therefore never half-commit.

use tracing::debug;

use crate::error::LedgerResult;
use crate::event::LedgerEvent;
use crate::identity::ClientIdentity;
use crate::state::{StagedState, StateStore, WriteSet};

/// One invocation's view of the world.
#[derive(Debug)]
pub struct TransactionContext<'a, S: StateStore> {
    state: StagedState<'a, S>,
    client: ClientIdentity,
    events: Vec<LedgerEvent>,
}

impl<'a, S: StateStore> TransactionContext<'a, S> {
    /// Open a context over `base` for the given resolved caller.
    pub fn new(base: &'a S, client: ClientIdentity) -> Self {
        Self {
            state: StagedState::new(base),
            client,
            events: Vec::new(),
        }
    }

    /// The verified identity submitting this transaction.
    pub fn client(&self) -> &ClientIdentity {
        &self.client
    }

    /// Read a key, seeing this invocation's staged writes first.
    pub fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        Ok(self.state.get(key)?)
    }

    /// Stage a write for commit at the end of the invocation.
    pub fn put_state(&mut self, key: &str, value: Vec<u8>) {
        self.state.put(key, value);
    }

    /// Stage a delete for commit at the end of the invocation.
    pub fn delete_state(&mut self, key: &str) {
        self.state.delete(key);
    }

    /// Ordered prefix scan over the merged (staged + committed) view.
    pub fn scan_prefix(&self, prefix: &str) -> LedgerResult<Vec<(String, Vec<u8>)>> {
        Ok(self.state.scan_prefix(prefix)?)
    }

    /// Record an event for delivery after commit.
    ///
    /// Contract operations call this only after every state write of the
    /// operation has been staged, and never on a failure path.
    pub fn set_event(&mut self, event: LedgerEvent) {
        debug!(event = event.name(), "event staged");
        self.events.push(event);
    }

    /// Events recorded so far. Mostly useful to the host and to tests.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Tear down into the pieces the host commits: the buffered write set
    /// and the events to deliver.
    pub fn finish(self) -> (WriteSet, Vec<LedgerEvent>) {
        (self.state.into_write_set(), self.events)
    }
}

/// Run `op` as one atomic invocation against `store`.
///
/// This is the host's commit loop in miniature, and the harness the
/// integration tests drive: stage everything, then commit on `Ok` and
/// discard on `Err`. Returns the operation's value together with the events
/// that were delivered.
pub fn invoke<S, T, F>(
    store: &mut S,
    client: ClientIdentity,
    op: F,
) -> LedgerResult<(T, Vec<LedgerEvent>)>
where
    S: StateStore,
    F: FnOnce(&mut TransactionContext<'_, S>) -> LedgerResult<T>,
{
    let mut ctx = TransactionContext::new(&*store, client);
    let value = op(&mut ctx)?;
    let (writes, events) = ctx.finish();
    writes.apply(store)?;
    Ok((value, events))
}
