//! # Ledger Constants
//!
//! Every well-known key, prefix, and sentinel of the CARTA wire format lives
//! here. Contracts receive these as constructor parameters (see
//! `carta_contracts::nft::KeySpace`) rather than reading them ambiently, so
//! the constants below are defaults, not globals.
//!
//! Changing any of these invalidates every record already written under the
//! old layout, so treat them as frozen.

// ---------------------------------------------------------------------------
// Namespace Prefixes
// ---------------------------------------------------------------------------

/// Namespace for token records: `composite(nft, tokenId)`.
pub const NFT_PREFIX: &str = "nft";

/// Namespace for the per-owner balance index: `composite(balance, owner, tokenId)`.
pub const BALANCE_PREFIX: &str = "balance";

/// Namespace for operator approvals: `composite(approval, owner, operator)`.
pub const APPROVAL_PREFIX: &str = "approval";

// ---------------------------------------------------------------------------
// Metadata Keys
// ---------------------------------------------------------------------------

/// Flat world-state key holding the collection name.
pub const NAME_KEY: &str = "name";

/// Flat world-state key holding the collection symbol.
pub const SYMBOL_KEY: &str = "symbol";

// ---------------------------------------------------------------------------
// Wire Sentinels
// ---------------------------------------------------------------------------

/// Placeholder identity used in `Transfer` events to represent creation
/// (mint emits `from = "0x0"`) or destruction (burn emits `to = "0x0"`).
pub const NONE_IDENTITY: &str = "0x0";

/// Value stored under every balance index entry. Presence of the key is the
/// signal; the content is never read. A genuinely empty value would be
/// indistinguishable from a delete in some stores, so one byte it is.
pub const BALANCE_MARKER: &[u8] = &[0x00];

/// Default issuing organization permitted to mint and set metadata.
/// Deployments override this at contract construction.
pub const DEFAULT_ISSUER_ORG: &str = "Org1MSP";
