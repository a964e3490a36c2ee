// Copyright (c) 2026 Carta Labs. MIT License.
// See LICENSE for details.

//! # CARTA Ledger — World-State Substrate
//!
//! The foundation layer for CARTA contracts: everything a chaincode-style
//! token contract needs from its host, expressed as explicit Rust seams
//! instead of inherited framework context.
//!
//! A CARTA contract is a synchronous state-transition function. The host
//! calls it once per submitted transaction, hands it a resolved caller
//! identity and a view of the replicated key-value world state, and commits
//! every write of that invocation atomically — or none of them. This crate
//! provides the pieces that make that contract deterministic and replayable:
//!
//! - **key** — the composite key codec. A namespace plus an ordered tuple of
//!   string components becomes one sortable key, so prefix-range scans can
//!   emulate a secondary index with no false positives.
//! - **state** — the `StateStore` trait (get/put/delete/prefix scan) with an
//!   in-memory store for tests and a sled-backed store for durability, plus
//!   the staged write overlay that buffers an invocation's writes until the
//!   whole operation has succeeded.
//! - **context** — `TransactionContext`, the per-invocation bundle of staged
//!   state, caller identity, and collected events.
//! - **identity** — the resolved caller: unique id plus issuing organization.
//! - **event** — structured event payloads recorded as part of the committed
//!   transaction's public record.
//! - **error** — the error taxonomy shared by every contract operation.
//! - **config** — namespace prefixes, metadata keys, and wire sentinels.
//!
//! ## Design Philosophy
//!
//! 1. Stage first, commit once. No operation ever leaves a transition
//!    partially visible — the host's all-or-nothing commit is a second
//!    safety net, not the correctness mechanism.
//! 2. No ambient globals. Prefixes and issuer identity are constructor
//!    parameters, so two ledger instances never interfere.
//! 3. Same bytes as the wire. Records serialize with the original JSON
//!    field names, so state is readable by any peer of the protocol.

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod identity;
pub mod key;
pub mod state;

pub use context::{invoke, TransactionContext};
pub use error::{LedgerError, LedgerResult};
pub use event::LedgerEvent;
pub use identity::ClientIdentity;
pub use state::{MemoryStore, SledStore, StateStore, WriteSet};
