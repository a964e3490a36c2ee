//! End-to-end tests of the world-state substrate: composite keys flowing
//! through the staged overlay into both store implementations, with
//! identical observable behavior.

use carta_ledger::key::{composite_key, composite_prefix, split_composite_key};
use carta_ledger::state::StateStore;
use carta_ledger::{invoke, ClientIdentity, LedgerError, MemoryStore, SledStore};

fn caller() -> ClientIdentity {
    ClientIdentity::new("client", "Org1MSP")
}

/// Stage a small index under a namespace, commit it, and verify the scan
/// sees exactly the namespace's keys in order.
fn index_scan_round_trip<S: StateStore>(store: &mut S) {
    invoke(store, caller(), |ctx| {
        for (owner, id) in [("alice", "2"), ("alice", "10"), ("bob", "1")] {
            let key = composite_key("balance", &[owner, id])?;
            ctx.put_state(&key, vec![0x00]);
        }
        // A neighboring namespace that must never leak into the scan.
        ctx.put_state(&composite_key("balances", &["alice", "9"])?, vec![0x00]);
        Ok(())
    })
    .unwrap();

    let prefix = composite_prefix("balance", &["alice"]).unwrap();
    let hits = store.scan_prefix(&prefix).unwrap();
    let ids: Vec<String> = hits
        .iter()
        .map(|(key, _)| split_composite_key(key).unwrap().1[1].clone())
        .collect();
    // Byte-lexicographic order of the remaining component.
    assert_eq!(ids, vec!["10", "2"]);
}

#[test]
fn memory_store_index_scan() {
    let mut store = MemoryStore::new();
    index_scan_round_trip(&mut store);
}

#[test]
fn sled_store_index_scan() {
    let mut store = SledStore::open_temporary().unwrap();
    index_scan_round_trip(&mut store);
}

#[test]
fn failed_invocation_is_invisible_on_both_stores() {
    fn attempt<S: StateStore>(store: &mut S) {
        let result = invoke(store, caller(), |ctx| {
            ctx.put_state(&composite_key("nft", &["1"])?, b"{}".to_vec());
            Err::<(), _>(LedgerError::Unauthorized("policy says no".into()))
        });
        assert!(result.is_err());
        let prefix = composite_prefix("nft", &[]).unwrap();
        assert!(store.scan_prefix(&prefix).unwrap().is_empty());
    }

    attempt(&mut MemoryStore::new());
    attempt(&mut SledStore::open_temporary().unwrap());
}

#[test]
fn durable_composite_keys_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let key = composite_key("nft", &["42"]).unwrap();
    {
        let mut store = SledStore::open(dir.path()).unwrap();
        invoke(&mut store, caller(), |ctx| {
            ctx.put_state(&key, b"record".to_vec());
            Ok(())
        })
        .unwrap();
        store.flush().unwrap();
    }

    let store = SledStore::open(dir.path()).unwrap();
    assert_eq!(store.get(&key).unwrap(), Some(b"record".to_vec()));
    let (namespace, components) = split_composite_key(&key).unwrap();
    assert_eq!(namespace, "nft");
    assert_eq!(components, vec!["42"]);
}
