use std::sync::Arc;

use proptest::prelude::*;
use uuid::Uuid;
use vref_core::{
    HashError, HashPair, HashStore, Hasher, NodeRef, NodeRefRadixHasher, NumericPathHasher,
    StoredPathHasher,
};

const STORES: [(&str, &str); 8] = [
    ("workspace", "SpacesStore"),
    ("workspace", "lightWeightVersionStore"),
    ("workspace", "version2Store"),
    ("archive", "SpacesStore"),
    ("user", "alfrescoUserStore"),
    ("system", "system"),
    ("user", "SpacesStore"),
    ("system", "version2Store"),
];

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    prop::array::uniform16(any::<u8>()).prop_map(Uuid::from_bytes)
}

fn arb_store() -> impl Strategy<Value = (&'static str, &'static str)> {
    prop::sample::select(STORES.to_vec())
}

fn stored() -> StoredPathHasher {
    let store = HashStore::from_entries([
        ("/org/alfresco/repo/virtual", "v"),
        ("/org/alfresco/repo/virtual/template", "t"),
        ("/Data Dictionary", "dd"),
    ])
    .unwrap();
    StoredPathHasher::new(Arc::new(store))
}

#[test]
fn radix_hash_is_shorter_than_uuid() {
    let node = NodeRef::from_parts(
        "workspace",
        "SpacesStore",
        "ffffffff-ffff-ffff-ffff-ffffffffffff",
    );
    let hash = NodeRefRadixHasher.hash(&node).unwrap();

    assert_eq!(hash.primary.as_deref(), Some("11"));
    assert_eq!(
        hash.secondary.as_deref(),
        Some("f5lxx1zz5pnorynqglhzmsp33")
    );
    assert_eq!(NodeRefRadixHasher.lookup(&hash).unwrap(), node);
}

#[test]
fn radix_hasher_rejects_foreign_stores_and_ids() {
    let uuid = "0d3b26ff-c4c1-4680-8622-8608ea7ab4b2";
    let cases = [
        NodeRef::from_parts("avm", "SpacesStore", uuid),
        NodeRef::from_parts("workspace", "site", uuid),
        NodeRef::from_parts("workspace", "SpacesStore", "0029-222-333-444"),
        NodeRef::from_parts("workspace", "SpacesStore", &uuid.to_uppercase()),
        NodeRef::from_parts("workspace", "SpacesStore", &uuid.replace('-', "")),
        NodeRef::from_parts("workspace", "SpacesStore", &format!("{{{uuid}}}")),
    ];
    for node in cases {
        assert!(NodeRefRadixHasher.hash(&node).is_err(), "{node}");
        assert!(!NodeRefRadixHasher.supports(&node));
    }
}

#[test]
fn radix_lookup_rejects_unknown_codes() {
    for hash in [
        HashPair::both("19", "1"),
        HashPair::both("91", "1"),
        HashPair::both("1", "1"),
        HashPair::both("111", "1"),
        HashPair::both("11", "01"),
        HashPair::both("11", "A"),
        HashPair::primary("11"),
    ] {
        assert!(
            matches!(
                NodeRefRadixHasher.lookup(&hash),
                Err(HashError::InvalidHash(_))
            ),
            "{hash:?}"
        );
    }
}

#[test]
fn numeric_hasher_boundaries() {
    let hasher = NumericPathHasher;
    assert_eq!(
        hasher.hash("/").unwrap(),
        HashPair::secondary("")
    );
    assert_eq!(hasher.hash(""), Err(HashError::EmptyPath));
    assert_eq!(
        hasher.hash("/12/7").unwrap(),
        HashPair::primary("12-7")
    );
    assert_eq!(hasher.lookup(&HashPair::primary("12-7")).unwrap(), "/12/7");
}

#[test]
fn stored_hasher_prefers_the_longest_prefix() {
    let hasher = stored();
    let hash = hasher
        .hash("/org/alfresco/repo/virtual/template/smartFolder.json")
        .unwrap();

    assert_eq!(hash.primary.as_deref(), Some("t"));
    assert_eq!(
        hasher.lookup(&hash).unwrap(),
        "/org/alfresco/repo/virtual/template/smartFolder.json"
    );
}

#[test]
fn stored_hasher_matches_whole_segments_only() {
    let hasher = stored();
    let hash = hasher.hash("/Data Dictionary2/x").unwrap();
    assert_eq!(hash.primary, None);
    assert_eq!(hasher.lookup(&hash).unwrap(), "/Data Dictionary2/x");
}

#[test]
fn stored_hasher_rejects_unknown_ids() {
    assert_eq!(
        stored().lookup(&HashPair::both("zz", "eA")),
        Err(HashError::UnknownId("zz".to_string()))
    );
    assert_eq!(stored().hash(""), Err(HashError::EmptyPath));
}

proptest! {
    #[test]
    fn radix_hasher_inverts_for_supported_stores(uuid in arb_uuid(), (protocol, store) in arb_store()) {
        let node = NodeRef::from_parts(protocol, store, uuid.to_string());
        let hash = NodeRefRadixHasher.hash(&node).unwrap();

        prop_assert_eq!(hash.primary.as_ref().map(String::len), Some(2));
        prop_assert!(hash.secondary.as_ref().map_or(0, String::len) <= 25);
        prop_assert_eq!(NodeRefRadixHasher.lookup(&hash).unwrap(), node);
    }

    #[test]
    fn radix_hasher_rejects_non_uuid_ids(id in "[a-z0-9-]{0,40}") {
        prop_assume!(Uuid::try_parse(&id).map(|u| u.to_string() != id).unwrap_or(true));
        let node = NodeRef::from_parts("workspace", "SpacesStore", id);
        prop_assert!(NodeRefRadixHasher.hash(&node).is_err());
    }

    #[test]
    fn numeric_hasher_inverts_normalized_paths(
        numbers in prop::collection::vec("[0-9]{1,6}", 0..4),
        names in prop::collection::vec("[A-Za-z0-9 _.-]{1,8}", 0..3),
    ) {
        let mut segments = numbers;
        segments.extend(names);
        prop_assume!(!segments.is_empty());
        let path = format!("/{}", segments.join("/"));

        let hasher = NumericPathHasher;
        prop_assert_eq!(hasher.lookup(&hasher.hash(&path).unwrap()).unwrap(), path);
    }

    #[test]
    fn stored_hasher_inverts_paths(suffix in "(/[A-Za-z0-9 _.-]{1,8}){0,3}") {
        let hasher = stored();
        for base in ["", "/org/alfresco/repo/virtual", "/org/alfresco/repo/virtual/template", "/Data Dictionary"] {
            let path = format!("{base}{suffix}");
            prop_assume!(!path.is_empty());
            prop_assert_eq!(hasher.lookup(&hasher.hash(&path).unwrap()).unwrap(), path);
        }
    }
}
