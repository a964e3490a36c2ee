//! # Client Identity
//!
//! The resolved caller of an invocation. Certificate parsing and signature
//! verification happen in the host before the contract runs; by the time a
//! `ClientIdentity` exists, both fields are trusted.

use serde::{Deserialize, Serialize};

/// The verified identity submitting a transaction.
///
/// `id` is the caller's unique identifier (stable across invocations and
/// usable as an ownership key in world state). `org` identifies the
/// organization that issued the caller's credentials; mint and metadata
/// policy is keyed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// Unique caller identifier.
    pub id: String,
    /// Issuing-organization identifier.
    pub org: String,
}

impl ClientIdentity {
    /// Construct a resolved identity.
    pub fn new(id: impl Into<String>, org: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            org: org.into(),
        }
    }

    /// Whether this caller's credentials were issued by `org`.
    pub fn issued_by(&self, org: &str) -> bool {
        self.org == org
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_by_matches_exactly() {
        let id = ClientIdentity::new("x509::alice", "Org1MSP");
        assert!(id.issued_by("Org1MSP"));
        assert!(!id.issued_by("Org2MSP"));
        assert!(!id.issued_by("Org1"));
    }
}
