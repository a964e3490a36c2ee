//! # Ledger Events
//!
//! Structured events recorded as part of a committed transaction's public
//! record. The host delivers them to subscribers after commit; the contract
//! only appends them to its [`TransactionContext`](crate::TransactionContext)
//! once every state write of the operation has been staged, and never on a
//! failure path.
//!
//! The names and JSON shapes below are part of the external protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An event emitted by a successful mutating operation.
///
/// Field names in the serialized payload follow the wire protocol
/// (`from`/`to`/`tokenId`, …), not Rust conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LedgerEvent {
    /// Ownership change. Mint uses the sentinel `"0x0"` as `from`, burn uses
    /// it as `to`.
    Transfer {
        from: String,
        to: String,
        #[serde(rename = "tokenId")]
        token_id: u64,
    },
    /// Per-token approved spender change.
    Approval {
        owner: String,
        approved: String,
        #[serde(rename = "tokenId")]
        token_id: u64,
    },
    /// Blanket operator grant or revocation.
    ApprovalForAll {
        owner: String,
        operator: String,
        approved: bool,
    },
}

impl LedgerEvent {
    /// The event name under which the payload is recorded.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "Transfer",
            LedgerEvent::Approval { .. } => "Approval",
            LedgerEvent::ApprovalForAll { .. } => "ApprovalForAll",
        }
    }

    /// The JSON payload recorded alongside the name.
    pub fn payload(&self) -> Value {
        // Serializing an infallible struct-of-strings; the expect cannot
        // trip short of an allocator failure.
        serde_json::to_value(self).expect("event payload serialization")
    }
}
