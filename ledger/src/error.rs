//! # Error Taxonomy
//!
//! One error enum shared by every ledger operation. The variants map 1:1 to
//! the externally observable failure classes: a host can translate them into
//! its own transaction-rejection codes without string matching.
//!
//! Propagation policy: errors surface immediately to the operation's caller
//! and are never retried internally — retry is a host-level
//! transaction-resubmission concern. A failed operation has emitted no event
//! and staged no write that the host will ever apply.

use crate::state::StateError;

/// Errors surfaced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The referenced token or record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller fails an authorization check. No state was mutated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Mint attempted on a token id that is already live.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Malformed input, e.g. a non-integer token id or a key component
    /// containing the composite-key delimiter.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Underlying state-store I/O failure, or a stored record that cannot
    /// be interpreted (corruption).
    #[error("state store failure: {0}")]
    Storage(#[from] StateError),
}

impl LedgerError {
    /// Classify a stored record that failed to decode. Corruption is a
    /// storage-class failure, not a caller mistake.
    pub fn corrupt(context: impl Into<String>) -> Self {
        LedgerError::Storage(StateError::Corrupt(context.into()))
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_error_converts_to_storage_variant() {
        fn fails() -> LedgerResult<()> {
            Err(StateError::Backend("disk on fire".into()))?
        }
        match fails() {
            Err(LedgerError::Storage(_)) => {}
            other => panic!("expected Storage, got {other:?}"),
        }
    }

    #[test]
    fn display_includes_detail() {
        let err = LedgerError::NotFound("token 7".into());
        assert_eq!(err.to_string(), "not found: token 7");
    }
}
