//! End-to-end chain walks over a JSON snapshot behind the query cache,
//! wired the way the daemon wires them.

use eden_delegates::{CacheConfig, CachedStore, ChainConfig, DelegationChainResolver};
use eden_store::SnapshotStore;
use eden_types::Member;
use std::sync::Arc;

const SNAPSHOT: &str = r#"{
    "election": { "lead_representative": "pip", "board": ["pip", "egeon", "dorian"] },
    "members": [
        { "account": "pip",     "name": "Pip",     "representative": "pip",           "election_rank": 4 },
        { "account": "egeon",   "name": "Egeon",   "representative": "pip",           "election_rank": 3 },
        { "account": "dorian",  "name": "Dorian",  "representative": "pip",           "election_rank": 3 },
        { "account": "ada",     "name": "Ada",     "representative": "egeon",         "election_rank": 2 },
        { "account": "bruno",   "name": "Bruno",   "representative": "ada",           "election_rank": 1 },
        { "account": "celine",  "name": "Celine",  "representative": "",              "election_rank": 2 },
        { "account": "newbie",  "name": "Newbie",  "representative": "zzzzzzzzzzzzj", "election_rank": 0 },
        { "account": "drifter", "name": "Drifter", "representative": "celine",        "election_rank": 2 },
        { "account": "orphan",  "name": "Orphan",  "representative": "departed",      "election_rank": 2 }
    ]
}"#;

fn resolver() -> (Arc<CachedStore<SnapshotStore>>, DelegationChainResolver) {
    let store = SnapshotStore::from_json_str(SNAPSHOT).expect("snapshot parses");
    let cached = Arc::new(CachedStore::new(store, &CacheConfig::default()));
    let resolver = DelegationChainResolver::new(cached.clone(), cached.clone(), ChainConfig::default());
    (cached, resolver)
}

fn names(members: &[Member]) -> Vec<&str> {
    members.iter().map(|m| m.account.as_str()).collect()
}

#[tokio::test]
async fn low_rank_member_sees_full_chain_above() {
    let (_, resolver) = resolver();
    let chain = resolver.resolve_chain(Some("bruno")).await.unwrap();
    assert_eq!(names(&chain), vec!["ada", "egeon", "pip"]);
}

#[tokio::test]
async fn delegate_sees_itself_first() {
    let (_, resolver) = resolver();
    let chain = resolver.resolve_chain(Some("ada")).await.unwrap();
    assert_eq!(names(&chain), vec!["ada", "egeon", "pip"]);
}

#[tokio::test]
async fn failed_consensus_upstream_truncates() {
    let (_, resolver) = resolver();
    let chain = resolver.resolve_chain(Some("drifter")).await.unwrap();
    assert_eq!(names(&chain), vec!["drifter"]);
}

#[tokio::test]
async fn sentinel_members_have_no_chain() {
    let (_, resolver) = resolver();
    assert!(resolver.resolve_chain(Some("newbie")).await.unwrap().is_empty());
    assert!(resolver.resolve_chain(Some("celine")).await.unwrap().is_empty());
}

#[tokio::test]
async fn departed_representative_keeps_partial_chain() {
    let (_, resolver) = resolver();
    let chain = resolver.resolve_chain(Some("orphan")).await.unwrap();
    assert_eq!(names(&chain), vec!["orphan"]);
}

#[tokio::test]
async fn repeated_walks_are_served_from_cache() {
    let (cached, resolver) = resolver();
    let first = resolver.resolve_chain(Some("bruno")).await.unwrap();
    let misses = cached.stats().misses;

    let second = resolver.resolve_chain(Some("bruno")).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(cached.stats().misses, misses);
}

#[tokio::test]
async fn concurrent_walks_agree() {
    let (_, resolver) = resolver();
    let (a, b) = tokio::join!(
        resolver.resolve_chain(Some("bruno")),
        resolver.resolve_chain(Some("ada")),
    );
    assert_eq!(a.unwrap(), b.unwrap());
}

#[tokio::test]
async fn board_members_resolve_in_order() {
    let (_, resolver) = resolver();
    let chiefs = resolver.chief_delegate_members().await;
    assert_eq!(names(&chiefs), vec!["pip", "egeon", "dorian"]);
}
