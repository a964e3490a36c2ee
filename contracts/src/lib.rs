// Copyright (c) 2026 Carta Labs. MIT License.
// See LICENSE for details.

//! # CARTA Contracts
//!
//! Chaincode-style contracts built on the `carta-ledger` world-state
//! substrate. Each contract is a plain struct whose operations take an
//! explicit [`TransactionContext`](carta_ledger::TransactionContext) — no
//! inherited framework base type, no ambient state. The host resolves the
//! caller, opens a context, runs exactly one operation, and commits or
//! discards the staged writes as a unit.
//!
//! - **nft** — the non-fungible-token ledger: unique, ownable assets with
//!   a composite-key balance index, per-token approvals, blanket operator
//!   approvals, and issuer-gated mint and metadata.
//!
//! ## Design Principles
//!
//! 1. Every precondition is checked before any write is staged, and every
//!    write is staged before the operation's single event is recorded.
//! 2. Authorization failures name the policy that rejected the caller,
//!    never the secret that would have satisfied it.
//! 3. Record schemas serialize with the protocol's wire field names, so
//!    world state stays readable by every peer.

pub mod nft;

pub use nft::{KeySpace, NftContract, TokenRecord};
