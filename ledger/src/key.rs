//! # Composite Key Codec
//!
//! The world state is a flat byte-string keyspace, yet contracts need to
//! answer questions like "every token owned by X". The composite key codec
//! emulates a secondary index: a namespace plus an ordered tuple of string
//! components is encoded into one key such that a range scan over the
//! encoded prefix returns exactly the keys whose leading components match —
//! no false positives, no omissions, in byte-lexicographic order of the
//! remaining components.
//!
//! ## Encoding
//!
//! ```text
//! key = NUL ∥ namespace ∥ NUL ∥ c₁ ∥ NUL ∥ c₂ ∥ NUL ∥ … ∥ cₖ ∥ NUL
//! ```
//!
//! Every part, the namespace included, is terminated by `U+0000`. The
//! terminator is what makes boundaries unambiguous: `("balance", ["ab"])`
//! and `("balance", ["a", "b"])` encode to different keys, and a scan for
//! prefix `("nft")` can never pick up keys under a namespace that merely
//! starts with `nft`. The price is that neither the namespace nor any
//! component may itself contain `U+0000`; that is rejected up front.
//!
//! The leading `NUL` keeps the composite keyspace disjoint from flat keys
//! such as `name` and `symbol`, which never start with a control byte.

use crate::error::{LedgerError, LedgerResult};

/// Separator and terminator for composite key parts. The minimum code point,
/// so that a terminated part sorts before any longer part sharing its text.
pub const DELIMITER: char = '\u{0000}';

/// Encode a namespace and component tuple into a single composite key.
///
/// Fails with `InvalidArgument` if the namespace is empty or if any part
/// contains the delimiter.
pub fn composite_key(namespace: &str, components: &[&str]) -> LedgerResult<String> {
    if namespace.is_empty() {
        return Err(LedgerError::InvalidArgument(
            "composite key namespace must not be empty".into(),
        ));
    }
    validate_part(namespace)?;
    for component in components {
        validate_part(component)?;
    }

    let mut key = String::with_capacity(
        2 + namespace.len() + components.iter().map(|c| c.len() + 1).sum::<usize>(),
    );
    key.push(DELIMITER);
    key.push_str(namespace);
    key.push(DELIMITER);
    for component in components {
        key.push_str(component);
        key.push(DELIMITER);
    }
    Ok(key)
}

/// Encode the scan prefix for `namespace` with the first k components fixed.
///
/// The returned string is a byte prefix of exactly the composite keys whose
/// leading components equal `components`, and of nothing else.
pub fn composite_prefix(namespace: &str, components: &[&str]) -> LedgerResult<String> {
    // A full key and a prefix have the same shape: every fixed part is
    // terminated, so the trailing delimiter fences off longer components.
    composite_key(namespace, components)
}

/// Decode a composite key back into its namespace and components.
///
/// Only the parts the reader cares about need inspecting; values live at the
/// key, not in it. Fails with `InvalidArgument` on keys that were not
/// produced by [`composite_key`].
pub fn split_composite_key(key: &str) -> LedgerResult<(String, Vec<String>)> {
    let rest = key.strip_prefix(DELIMITER).ok_or_else(|| {
        LedgerError::InvalidArgument(format!("not a composite key: {key:?}"))
    })?;
    let rest = rest.strip_suffix(DELIMITER).ok_or_else(|| {
        LedgerError::InvalidArgument(format!("unterminated composite key: {key:?}"))
    })?;

    let mut parts = rest.split(DELIMITER);
    let namespace = parts
        .next()
        .filter(|ns| !ns.is_empty())
        .ok_or_else(|| {
            LedgerError::InvalidArgument(format!("composite key missing namespace: {key:?}"))
        })?
        .to_string();
    let components = parts.map(str::to_string).collect();
    Ok((namespace, components))
}

fn validate_part(part: &str) -> LedgerResult<()> {
    if part.contains(DELIMITER) {
        return Err(LedgerError::InvalidArgument(format!(
            "composite key part {part:?} contains the reserved delimiter U+0000"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_and_split_round_trip() {
        let key = composite_key("balance", &["alice", "42"]).unwrap();
        let (ns, parts) = split_composite_key(&key).unwrap();
        assert_eq!(ns, "balance");
        assert_eq!(parts, vec!["alice".to_string(), "42".to_string()]);
    }

    #[test]
    fn component_boundaries_are_unambiguous() {
        // "ab" as one component vs "a","b" as two must never collide.
        let one = composite_key("balance", &["ab"]).unwrap();
        let two = composite_key("balance", &["a", "b"]).unwrap();
        assert_ne!(one, two);
    }

    #[test]
    fn prefix_component_never_matches_longer_component() {
        // Owner "al" is a textual prefix of owner "alice"; the scan prefix
        // for "al" must not be a byte prefix of alice's keys.
        let alice_key = composite_key("balance", &["alice", "1"]).unwrap();
        let al_prefix = composite_prefix("balance", &["al"]).unwrap();
        assert!(!alice_key.starts_with(&al_prefix));

        let al_key = composite_key("balance", &["al", "1"]).unwrap();
        assert!(al_key.starts_with(&al_prefix));
    }

    #[test]
    fn namespace_prefix_never_matches_longer_namespace() {
        let nft_prefix = composite_prefix("nft", &[]).unwrap();
        let other = composite_key("nftmeta", &["1"]).unwrap();
        assert!(!other.starts_with(&nft_prefix));
    }

    #[test]
    fn namespaces_sort_disjointly() {
        // All keys of a namespace sort after every key of a lexicographically
        // smaller namespace and before every key of a larger one.
        let approval_hi = composite_key("approval", &["zzz", "zzz"]).unwrap();
        let balance_lo = composite_key("balance", &[]).unwrap();
        let balance_hi = composite_key("balance", &["\u{10FFFF}"]).unwrap();
        let nft_lo = composite_key("nft", &["0"]).unwrap();
        assert!(approval_hi < balance_lo);
        assert!(balance_hi < nft_lo);
    }

    #[test]
    fn remaining_components_scan_in_lexicographic_order() {
        let prefix = composite_prefix("balance", &["alice"]).unwrap();
        let mut keys = vec![
            composite_key("balance", &["alice", "10"]).unwrap(),
            composite_key("balance", &["alice", "1"]).unwrap(),
            composite_key("balance", &["alice", "2"]).unwrap(),
        ];
        keys.sort();
        assert!(keys.iter().all(|k| k.starts_with(&prefix)));
        // Byte-lexicographic, not numeric: "1" < "10" < "2".
        let ids: Vec<_> = keys
            .iter()
            .map(|k| split_composite_key(k).unwrap().1[1].clone())
            .collect();
        assert_eq!(ids, vec!["1", "10", "2"]);
    }

    #[test]
    fn delimiter_in_part_rejected() {
        assert!(matches!(
            composite_key("nft", &["a\u{0000}b"]),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            composite_key("bad\u{0000}ns", &[]),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty_namespace_rejected() {
        assert!(matches!(
            composite_key("", &["a"]),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn split_rejects_flat_keys() {
        assert!(split_composite_key("name").is_err());
        assert!(split_composite_key("").is_err());
    }
}
