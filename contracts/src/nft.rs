//! # Non-Fungible Token Ledger
//!
//! Tracks unique, ownable assets in world state. Three record families keep
//! each other honest:
//!
//! | Record            | Key                               | Value                    |
//! |-------------------|-----------------------------------|--------------------------|
//! | token record      | `composite(nft, tokenId)`         | JSON [`TokenRecord`]     |
//! | balance index     | `composite(balance, owner, tokenId)` | one marker byte       |
//! | operator approval | `composite(approval, owner, operator)` | JSON approval record |
//!
//! The balance index exists purely so `balance_of` and `total_supply` can be
//! answered with a prefix scan instead of a relational index. Every mutation
//! that changes a token's owner moves the index entry in the same staged
//! write set, so the invariant "index entries under an owner == token
//! records owned by that owner" holds after every committed operation.
//!
//! ## Authorization Policy
//!
//! Minting and metadata (`set_option`) are gated on the issuing
//! organization. Transfer and per-token approval accept three equivalent
//! paths: current owner, the token's approved spender, or a blanket
//! operator approval. Burn is owner-only — no operator or spender bypass.
//!
//! ## Atomicity
//!
//! Operations stage all writes through the transaction context and record
//! their single event only after the last write. An early `Err` leaves the
//! staged write set for the host to discard; nothing is ever partially
//! visible.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use carta_ledger::config;
use carta_ledger::key::{composite_key, composite_prefix};
use carta_ledger::state::{StateError, StateStore};
use carta_ledger::{ClientIdentity, LedgerError, LedgerEvent, LedgerResult, TransactionContext};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A live token. Absence of the record means the token does not exist;
/// there is no tombstone state.
///
/// Serialized field names follow the wire protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Numeric token id. The textual decimal form of this value is the
    /// record's key component.
    #[serde(rename = "tokenId")]
    pub token_id: u64,
    /// Current owner identity.
    pub owner: String,
    /// Metadata URI attached at mint time. Immutable thereafter.
    #[serde(rename = "tokenURI")]
    pub token_uri: String,
    /// Approved spender for this one token, or empty. Cleared on every
    /// ownership change.
    pub approved: String,
}

/// Blanket operator grant. Independent of any token record and never
/// expires on its own; a later grant with `approved = false` revokes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorApproval {
    pub owner: String,
    pub operator: String,
    pub approved: bool,
}

// ---------------------------------------------------------------------------
// Key Space
// ---------------------------------------------------------------------------

/// The namespace prefixes and flat keys one contract instance writes under.
///
/// Passed in at construction rather than read from globals, so multiple
/// instances (production and tests alike) never interfere.
#[derive(Debug, Clone)]
pub struct KeySpace {
    nft: String,
    balance: String,
    approval: String,
    name_key: String,
    symbol_key: String,
}

impl KeySpace {
    /// A key space with explicit prefixes.
    pub fn new(
        nft: impl Into<String>,
        balance: impl Into<String>,
        approval: impl Into<String>,
        name_key: impl Into<String>,
        symbol_key: impl Into<String>,
    ) -> Self {
        Self {
            nft: nft.into(),
            balance: balance.into(),
            approval: approval.into(),
            name_key: name_key.into(),
            symbol_key: symbol_key.into(),
        }
    }

    fn nft_key(&self, token_id: &str) -> LedgerResult<String> {
        composite_key(&self.nft, &[token_id])
    }

    fn nft_scan_prefix(&self) -> LedgerResult<String> {
        composite_prefix(&self.nft, &[])
    }

    fn balance_key(&self, owner: &str, token_id: &str) -> LedgerResult<String> {
        composite_key(&self.balance, &[owner, token_id])
    }

    fn balance_scan_prefix(&self, owner: &str) -> LedgerResult<String> {
        composite_prefix(&self.balance, &[owner])
    }

    fn approval_key(&self, owner: &str, operator: &str) -> LedgerResult<String> {
        composite_key(&self.approval, &[owner, operator])
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new(
            config::NFT_PREFIX,
            config::BALANCE_PREFIX,
            config::APPROVAL_PREFIX,
            config::NAME_KEY,
            config::SYMBOL_KEY,
        )
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// The non-fungible-token contract.
///
/// Stateless between invocations: all durable state lives in world state,
/// reached through the [`TransactionContext`] each operation receives.
#[derive(Debug, Clone)]
pub struct NftContract {
    keys: KeySpace,
    issuer_org: String,
}

impl NftContract {
    /// Contract with the default key space, gated on `issuer_org` for mint
    /// and metadata operations.
    pub fn new(issuer_org: impl Into<String>) -> Self {
        Self::with_keyspace(issuer_org, KeySpace::default())
    }

    /// Contract over an explicit key space.
    pub fn with_keyspace(issuer_org: impl Into<String>, keys: KeySpace) -> Self {
        Self {
            keys,
            issuer_org: issuer_org.into(),
        }
    }

    // -- Queries ------------------------------------------------------------

    /// Count of tokens assigned to `owner`. Zero for an owner that has
    /// never held a token — never an error.
    pub fn balance_of<S: StateStore>(
        &self,
        ctx: &TransactionContext<'_, S>,
        owner: &str,
    ) -> LedgerResult<u64> {
        let prefix = self.keys.balance_scan_prefix(owner)?;
        Ok(ctx.scan_prefix(&prefix)?.len() as u64)
    }

    /// The owner of `token_id`. Fails `NotFound` for an absent token and
    /// `Storage` for a record with no owner assigned (corruption guard).
    pub fn owner_of<S: StateStore>(
        &self,
        ctx: &TransactionContext<'_, S>,
        token_id: &str,
    ) -> LedgerResult<String> {
        let nft = self.read_token(ctx, token_id)?;
        if nft.owner.is_empty() {
            return Err(LedgerError::corrupt(format!(
                "token {token_id} has no owner assigned"
            )));
        }
        Ok(nft.owner)
    }

    /// Count of all live tokens.
    pub fn total_supply<S: StateStore>(
        &self,
        ctx: &TransactionContext<'_, S>,
    ) -> LedgerResult<u64> {
        let prefix = self.keys.nft_scan_prefix()?;
        Ok(ctx.scan_prefix(&prefix)?.len() as u64)
    }

    /// The approved spender for `token_id`, or empty if none is set.
    /// Fails `NotFound` for an unminted token.
    pub fn get_approved<S: StateStore>(
        &self,
        ctx: &TransactionContext<'_, S>,
        token_id: &str,
    ) -> LedgerResult<String> {
        Ok(self.read_token(ctx, token_id)?.approved)
    }

    /// Whether `operator` holds a blanket approval over `owner`'s tokens.
    pub fn is_approved_for_all<S: StateStore>(
        &self,
        ctx: &TransactionContext<'_, S>,
        owner: &str,
        operator: &str,
    ) -> LedgerResult<bool> {
        let key = self.keys.approval_key(owner, operator)?;
        match ctx.get_state(&key)? {
            Some(bytes) => Ok(from_bytes::<OperatorApproval>(&key, &bytes)?.approved),
            None => Ok(false),
        }
    }

    /// Collection name, or empty if the issuer has not set one.
    pub fn name<S: StateStore>(&self, ctx: &TransactionContext<'_, S>) -> LedgerResult<String> {
        self.read_metadata(ctx, &self.keys.name_key)
    }

    /// Collection symbol, or empty if the issuer has not set one.
    pub fn symbol<S: StateStore>(&self, ctx: &TransactionContext<'_, S>) -> LedgerResult<String> {
        self.read_metadata(ctx, &self.keys.symbol_key)
    }

    /// Metadata URI of `token_id`. Fails `NotFound` for an absent token.
    pub fn token_uri<S: StateStore>(
        &self,
        ctx: &TransactionContext<'_, S>,
        token_id: &str,
    ) -> LedgerResult<String> {
        Ok(self.read_token(ctx, token_id)?.token_uri)
    }

    /// The calling client's own token count.
    pub fn client_account_balance<S: StateStore>(
        &self,
        ctx: &TransactionContext<'_, S>,
    ) -> LedgerResult<u64> {
        let owner = ctx.client().id.clone();
        self.balance_of(ctx, &owner)
    }

    /// The calling client's own account id, usable as a payment address.
    pub fn client_account_id<S: StateStore>(&self, ctx: &TransactionContext<'_, S>) -> String {
        ctx.client().id.clone()
    }

    // -- Mutations ----------------------------------------------------------

    /// Mint a new token owned by the caller.
    ///
    /// Issuer-organization only. `token_id` must be a decimal integer not
    /// already minted. Emits `Transfer{from: "0x0", to: minter, tokenId}`.
    pub fn mint_with_token_uri<S: StateStore>(
        &self,
        ctx: &mut TransactionContext<'_, S>,
        token_id: &str,
        token_uri: &str,
    ) -> LedgerResult<TokenRecord> {
        self.require_issuer(ctx.client(), "mint new tokens")?;
        let minter = ctx.client().id.clone();

        let nft_key = self.keys.nft_key(token_id)?;
        if ctx.get_state(&nft_key)?.is_some() {
            return Err(LedgerError::AlreadyExists(format!(
                "token {token_id} is already minted"
            )));
        }

        let numeric_id: u64 = token_id.parse().map_err(|_| {
            LedgerError::InvalidArgument(format!(
                "token id {token_id:?} is invalid: must be a decimal integer"
            ))
        })?;

        let record = TokenRecord {
            token_id: numeric_id,
            owner: minter.clone(),
            token_uri: token_uri.to_string(),
            approved: String::new(),
        };
        ctx.put_state(&nft_key, to_bytes(&record)?);

        // Index entry under the minter; the marker byte keeps the value
        // non-empty (an empty value would read as a delete in some stores).
        let balance_key = self.keys.balance_key(&minter, token_id)?;
        ctx.put_state(&balance_key, config::BALANCE_MARKER.to_vec());

        ctx.set_event(LedgerEvent::Transfer {
            from: config::NONE_IDENTITY.to_string(),
            to: minter,
            token_id: numeric_id,
        });
        debug!(token_id, "token minted");
        Ok(record)
    }

    /// Transfer `token_id` from its current owner to `to`.
    ///
    /// The caller must be the owner, the token's approved spender, or an
    /// approved operator of the owner; `from` must match the current owner.
    /// The per-token approval is cleared and the balance index entry moves
    /// with the token. Emits `Transfer{from, to, tokenId}`.
    pub fn transfer_from<S: StateStore>(
        &self,
        ctx: &mut TransactionContext<'_, S>,
        from: &str,
        to: &str,
        token_id: &str,
    ) -> LedgerResult<()> {
        let mut nft = self.read_token(ctx, token_id)?;
        let sender = ctx.client().id.clone();

        // Owner, approved spender, and operator approval are equivalent
        // authorization paths; checked in preference order.
        let authorized = nft.owner == sender
            || nft.approved == sender
            || self.is_approved_for_all(ctx, &nft.owner, &sender)?;
        if !authorized {
            warn!(token_id, "transfer rejected: caller not authorized");
            return Err(LedgerError::Unauthorized(format!(
                "caller is not the owner, approved spender, or operator of token {token_id}"
            )));
        }
        if nft.owner != from {
            warn!(token_id, from, "transfer rejected: from mismatch");
            return Err(LedgerError::Unauthorized(format!(
                "{from} is not the current owner of token {token_id}"
            )));
        }

        nft.approved.clear();
        nft.owner = to.to_string();
        ctx.put_state(&self.keys.nft_key(token_id)?, to_bytes(&nft)?);

        // Move the balance index entry in the same staged write set.
        ctx.delete_state(&self.keys.balance_key(from, token_id)?);
        ctx.put_state(
            &self.keys.balance_key(to, token_id)?,
            config::BALANCE_MARKER.to_vec(),
        );

        ctx.set_event(LedgerEvent::Transfer {
            from: from.to_string(),
            to: to.to_string(),
            token_id: nft.token_id,
        });
        debug!(token_id, from, to, "token transferred");
        Ok(())
    }

    /// Set or reaffirm the approved spender for one token.
    ///
    /// The caller must be the current owner or an approved operator of the
    /// owner. Emits `Approval{owner, approved, tokenId}`.
    pub fn approve<S: StateStore>(
        &self,
        ctx: &mut TransactionContext<'_, S>,
        spender: &str,
        token_id: &str,
    ) -> LedgerResult<()> {
        let mut nft = self.read_token(ctx, token_id)?;
        let sender = ctx.client().id.clone();

        if nft.owner != sender && !self.is_approved_for_all(ctx, &nft.owner, &sender)? {
            warn!(token_id, "approve rejected: caller not authorized");
            return Err(LedgerError::Unauthorized(format!(
                "caller is neither the owner of token {token_id} nor an authorized operator"
            )));
        }

        let owner = nft.owner.clone();
        nft.approved = spender.to_string();
        ctx.put_state(&self.keys.nft_key(token_id)?, to_bytes(&nft)?);

        ctx.set_event(LedgerEvent::Approval {
            owner,
            approved: spender.to_string(),
            token_id: nft.token_id,
        });
        Ok(())
    }

    /// Grant or revoke a blanket operator approval over all of the caller's
    /// tokens. Unconditional: any caller may manage their own namespace.
    /// Emits `ApprovalForAll{owner, operator, approved}`.
    pub fn set_approval_for_all<S: StateStore>(
        &self,
        ctx: &mut TransactionContext<'_, S>,
        operator: &str,
        approved: bool,
    ) -> LedgerResult<()> {
        let sender = ctx.client().id.clone();

        let record = OperatorApproval {
            owner: sender.clone(),
            operator: operator.to_string(),
            approved,
        };
        ctx.put_state(&self.keys.approval_key(&sender, operator)?, to_bytes(&record)?);

        ctx.set_event(LedgerEvent::ApprovalForAll {
            owner: sender,
            operator: operator.to_string(),
            approved,
        });
        Ok(())
    }

    /// Set the collection name and symbol. Issuer-organization only.
    pub fn set_option<S: StateStore>(
        &self,
        ctx: &mut TransactionContext<'_, S>,
        name: &str,
        symbol: &str,
    ) -> LedgerResult<()> {
        self.require_issuer(ctx.client(), "set the collection name and symbol")?;
        ctx.put_state(&self.keys.name_key, name.as_bytes().to_vec());
        ctx.put_state(&self.keys.symbol_key, symbol.as_bytes().to_vec());
        Ok(())
    }

    /// Destroy a token. Owner only — no operator or approved-spender
    /// bypass. Removes the record and its balance index entry, and emits
    /// `Transfer{from: owner, to: "0x0", tokenId}`. The id is never reused.
    pub fn burn<S: StateStore>(
        &self,
        ctx: &mut TransactionContext<'_, S>,
        token_id: &str,
    ) -> LedgerResult<()> {
        let nft = self.read_token(ctx, token_id)?;
        let sender = ctx.client().id.clone();
        if nft.owner != sender {
            warn!(token_id, "burn rejected: caller is not the owner");
            return Err(LedgerError::Unauthorized(format!(
                "token {token_id} is not owned by the caller"
            )));
        }

        ctx.delete_state(&self.keys.nft_key(token_id)?);
        ctx.delete_state(&self.keys.balance_key(&sender, token_id)?);

        ctx.set_event(LedgerEvent::Transfer {
            from: sender,
            to: config::NONE_IDENTITY.to_string(),
            token_id: nft.token_id,
        });
        debug!(token_id, "token burned");
        Ok(())
    }

    // -- Internals ----------------------------------------------------------

    fn read_token<S: StateStore>(
        &self,
        ctx: &TransactionContext<'_, S>,
        token_id: &str,
    ) -> LedgerResult<TokenRecord> {
        let key = self.keys.nft_key(token_id)?;
        let bytes = ctx
            .get_state(&key)?
            .filter(|b| !b.is_empty())
            .ok_or_else(|| LedgerError::NotFound(format!("token {token_id} does not exist")))?;
        from_bytes(&key, &bytes)
    }

    fn read_metadata<S: StateStore>(
        &self,
        ctx: &TransactionContext<'_, S>,
        key: &str,
    ) -> LedgerResult<String> {
        match ctx.get_state(key)? {
            Some(bytes) => String::from_utf8(bytes)
                .map_err(|_| LedgerError::corrupt(format!("metadata at {key:?} is not UTF-8"))),
            None => Ok(String::new()),
        }
    }

    fn require_issuer(&self, client: &ClientIdentity, action: &str) -> LedgerResult<()> {
        if !client.issued_by(&self.issuer_org) {
            warn!(org = %client.org, "issuer-gated operation rejected");
            return Err(LedgerError::Unauthorized(format!(
                "client organization is not authorized to {action}"
            )));
        }
        Ok(())
    }
}

fn to_bytes<T: Serialize>(value: &T) -> LedgerResult<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| LedgerError::Storage(StateError::Backend(format!("serialize record: {e}"))))
}

fn from_bytes<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> LedgerResult<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| LedgerError::corrupt(format!("record at {key:?} failed to decode: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use carta_ledger::state::MemoryStore;

    fn issuer() -> ClientIdentity {
        ClientIdentity::new("minter", "Org1MSP")
    }

    fn contract() -> NftContract {
        NftContract::new("Org1MSP")
    }

    #[test]
    fn token_record_uses_wire_field_names() {
        let record = TokenRecord {
            token_id: 7,
            owner: "alice".into(),
            token_uri: "ipfs://x".into(),
            approved: String::new(),
        };
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tokenId": 7,
                "owner": "alice",
                "tokenURI": "ipfs://x",
                "approved": ""
            })
        );
        // And the original chaincode's bytes decode back into the record.
        let decoded: TokenRecord = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn mint_stages_record_index_and_event() {
        let store = MemoryStore::new();
        let mut ctx = TransactionContext::new(&store, issuer());
        let record = contract()
            .mint_with_token_uri(&mut ctx, "1", "ipfs://x")
            .unwrap();

        assert_eq!(record.owner, "minter");
        assert_eq!(record.token_id, 1);
        assert_eq!(record.approved, "");
        assert_eq!(ctx.events().len(), 1);
        assert_eq!(ctx.events()[0].name(), "Transfer");

        // Record and index entry are both visible within the invocation.
        let c = contract();
        assert_eq!(c.owner_of(&ctx, "1").unwrap(), "minter");
        assert_eq!(c.balance_of(&ctx, "minter").unwrap(), 1);
        assert_eq!(c.total_supply(&ctx).unwrap(), 1);

        // Nothing reached the backing store yet.
        assert!(store.is_empty());
    }

    #[test]
    fn mint_rejects_non_integer_token_id() {
        let store = MemoryStore::new();
        let mut ctx = TransactionContext::new(&store, issuer());
        let err = contract()
            .mint_with_token_uri(&mut ctx, "abc", "uri")
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
        assert!(ctx.events().is_empty());
    }

    #[test]
    fn mint_rejects_foreign_organization() {
        let store = MemoryStore::new();
        let mut ctx =
            TransactionContext::new(&store, ClientIdentity::new("outsider", "Org2MSP"));
        let err = contract()
            .mint_with_token_uri(&mut ctx, "1", "uri")
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized(_)));
        let (writes, events) = ctx.finish();
        assert!(writes.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn queries_on_absent_token() {
        let store = MemoryStore::new();
        let ctx = TransactionContext::new(&store, issuer());
        let c = contract();
        assert!(matches!(c.owner_of(&ctx, "9"), Err(LedgerError::NotFound(_))));
        assert!(matches!(c.get_approved(&ctx, "9"), Err(LedgerError::NotFound(_))));
        assert!(matches!(c.token_uri(&ctx, "9"), Err(LedgerError::NotFound(_))));
        // Balance and supply never error on emptiness.
        assert_eq!(c.balance_of(&ctx, "nobody").unwrap(), 0);
        assert_eq!(c.total_supply(&ctx).unwrap(), 0);
    }

    #[test]
    fn owner_of_flags_corrupt_record() {
        let mut store = MemoryStore::new();
        let c = contract();
        // Plant a record with an empty owner field directly in world state.
        let key = c.keys.nft_key("5").unwrap();
        let record = TokenRecord {
            token_id: 5,
            owner: String::new(),
            token_uri: "uri".into(),
            approved: String::new(),
        };
        store.put(&key, serde_json::to_vec(&record).unwrap()).unwrap();

        let ctx = TransactionContext::new(&store, issuer());
        assert!(matches!(c.owner_of(&ctx, "5"), Err(LedgerError::Storage(_))));
    }

    #[test]
    fn metadata_defaults_to_empty_until_set() {
        let store = MemoryStore::new();
        let ctx = TransactionContext::new(&store, issuer());
        let c = contract();
        assert_eq!(c.name(&ctx).unwrap(), "");
        assert_eq!(c.symbol(&ctx).unwrap(), "");
    }

    #[test]
    fn set_option_is_issuer_gated() {
        let store = MemoryStore::new();
        let c = contract();

        let mut ctx =
            TransactionContext::new(&store, ClientIdentity::new("outsider", "Org2MSP"));
        assert!(matches!(
            c.set_option(&mut ctx, "Carta", "CRT"),
            Err(LedgerError::Unauthorized(_))
        ));

        let mut ctx = TransactionContext::new(&store, issuer());
        c.set_option(&mut ctx, "Carta", "CRT").unwrap();
        assert_eq!(c.name(&ctx).unwrap(), "Carta");
        assert_eq!(c.symbol(&ctx).unwrap(), "CRT");
    }

    #[test]
    fn distinct_keyspaces_do_not_interfere() {
        let store = MemoryStore::new();
        let a = NftContract::with_keyspace(
            "Org1MSP",
            KeySpace::new("a_nft", "a_balance", "a_approval", "a_name", "a_symbol"),
        );
        let b = NftContract::new("Org1MSP");

        let mut ctx = TransactionContext::new(&store, issuer());
        a.mint_with_token_uri(&mut ctx, "1", "uri").unwrap();
        assert_eq!(a.total_supply(&ctx).unwrap(), 1);
        assert_eq!(b.total_supply(&ctx).unwrap(), 0);
        assert_eq!(b.balance_of(&ctx, "minter").unwrap(), 0);
    }
}
