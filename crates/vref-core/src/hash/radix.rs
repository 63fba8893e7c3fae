use tracing::trace;
use uuid::Uuid;

use crate::error::HashError;
use crate::node_ref::NodeRef;

use super::{HashPair, Hasher};

const STORE_PROTOCOLS: [(&str, char); 4] = [
    ("workspace", '1'),
    ("archive", '2'),
    ("user", '3'),
    ("system", '4'),
];

const STORE_IDS: [(&str, char); 5] = [
    ("SpacesStore", '1'),
    ("lightWeightVersionStore", '2'),
    ("version2Store", '3'),
    ("alfrescoUserStore", '4'),
    ("system", '5'),
];

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Shortens UUID node ids of well-known stores.
///
/// The primary hash is a two character store code (protocol code followed by
/// store id code); the secondary is the UUID's 128-bit value in lowercase
/// radix 36 without leading zeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeRefRadixHasher;

impl NodeRefRadixHasher {
    pub const fn new() -> Self {
        Self
    }

    pub fn supports(&self, node: &NodeRef) -> bool {
        self.hash(node).is_ok()
    }
}

fn code_of(table: &[(&str, char)], name: &str) -> Option<char> {
    table.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
}

fn name_of(table: &[(&'static str, char)], code: char) -> Option<&'static str> {
    table.iter().find(|(_, c)| *c == code).map(|(n, _)| *n)
}

fn is_canonical_uuid(id: &str) -> bool {
    id.len() == 36
        && id.bytes().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => b.is_ascii_digit() || (b'a'..=b'f').contains(&b),
        })
}

#[allow(clippy::cast_possible_truncation)]
fn to_radix36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.iter().rev().map(|&d| char::from(d)).collect()
}

fn from_radix36(encoded: &str) -> Option<u128> {
    if encoded.is_empty() || (encoded.len() > 1 && encoded.starts_with('0')) {
        return None;
    }

    encoded.chars().try_fold(0u128, |acc, ch| {
        if ch.is_ascii_uppercase() {
            return None;
        }
        let digit = ch.to_digit(36)?;
        acc.checked_mul(36)?.checked_add(u128::from(digit))
    })
}

impl Hasher for NodeRefRadixHasher {
    type Value = NodeRef;

    fn hash(&self, node: &NodeRef) -> Result<HashPair, HashError> {
        let protocol = code_of(&STORE_PROTOCOLS, &node.store.protocol)
            .ok_or_else(|| HashError::UnsupportedStoreProtocol(node.store.protocol.clone()))?;
        let store = code_of(&STORE_IDS, &node.store.identifier)
            .ok_or_else(|| HashError::UnsupportedStoreId(node.store.identifier.clone()))?;

        if !is_canonical_uuid(&node.id) {
            return Err(HashError::InvalidNodeId(node.id.clone()));
        }
        let uuid =
            Uuid::try_parse(&node.id).map_err(|_| HashError::InvalidNodeId(node.id.clone()))?;

        let hashed = to_radix36(uuid.as_u128());
        trace!(node = %node, hashed = %hashed, "radix hashed node id");

        Ok(HashPair::both(format!("{protocol}{store}"), hashed))
    }

    fn lookup(&self, hash: &HashPair) -> Result<NodeRef, HashError> {
        let invalid = || HashError::InvalidHash(format!("{hash:?}"));

        let (Some(primary), Some(secondary)) = (&hash.primary, &hash.secondary) else {
            return Err(invalid());
        };

        let mut codes = primary.chars();
        let (Some(protocol), Some(store), None) = (codes.next(), codes.next(), codes.next())
        else {
            return Err(invalid());
        };
        let protocol = name_of(&STORE_PROTOCOLS, protocol).ok_or_else(invalid)?;
        let store = name_of(&STORE_IDS, store).ok_or_else(invalid)?;

        let value = from_radix36(secondary).ok_or_else(invalid)?;
        let id = Uuid::from_u128(value).hyphenated().to_string();

        Ok(NodeRef::from_parts(protocol, store, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "0d3b26ff-c4c1-4680-8622-8608ea7ab4b2";

    fn spaces(id: &str) -> NodeRef {
        NodeRef::from_parts("workspace", "SpacesStore", id)
    }

    #[test]
    fn hash_shortens_uuid() {
        let hash = NodeRefRadixHasher.hash(&spaces(ID)).unwrap();
        assert_eq!(hash.primary.as_deref(), Some("11"));
        let secondary = hash.secondary.unwrap();
        assert!(secondary.len() < 36);
        assert!(!secondary.starts_with('0'));
    }

    #[test]
    fn lookup_restores_node() {
        let hasher = NodeRefRadixHasher;
        let node = NodeRef::from_parts("archive", "SpacesStore", ID);
        assert_eq!(hasher.lookup(&hasher.hash(&node).unwrap()).unwrap(), node);
    }

    #[test]
    fn lookup_zero_pads() {
        let hasher = NodeRefRadixHasher;
        let node = spaces("00000000-0000-0000-0000-00000000002a");
        let hash = hasher.hash(&node).unwrap();
        assert_eq!(hash.secondary.as_deref(), Some("16"));
        assert_eq!(hasher.lookup(&hash).unwrap(), node);
    }

    #[test]
    fn nil_uuid_round_trips() {
        let hasher = NodeRefRadixHasher;
        let node = spaces("00000000-0000-0000-0000-000000000000");
        let hash = hasher.hash(&node).unwrap();
        assert_eq!(hash.secondary.as_deref(), Some("0"));
        assert_eq!(hasher.lookup(&hash).unwrap(), node);
    }

    #[test]
    fn max_uuid_round_trips() {
        let hasher = NodeRefRadixHasher;
        let node = spaces("ffffffff-ffff-ffff-ffff-ffffffffffff");
        assert_eq!(hasher.lookup(&hasher.hash(&node).unwrap()).unwrap(), node);
    }

    #[test]
    fn rejects_unsupported_store_protocol() {
        let node = NodeRef::from_parts("avm", "SpacesStore", ID);
        assert_eq!(
            NodeRefRadixHasher.hash(&node),
            Err(HashError::UnsupportedStoreProtocol("avm".to_string()))
        );
    }

    #[test]
    fn rejects_unsupported_store_id() {
        let node = NodeRef::from_parts("workspace", "MyStore", ID);
        assert_eq!(
            NodeRefRadixHasher.hash(&node),
            Err(HashError::UnsupportedStoreId("MyStore".to_string()))
        );
    }

    #[test]
    fn rejects_malformed_uuids() {
        for id in [
            "0029-222-333-444",
            "0d3b26ff-c4c1-4680-8622-8608ea7ab4b",
            "0d3b26ff-c4c1-4680-8622-8608ea7ab4b22",
            "0d3b26ffc-4c1-4680-8622-8608ea7ab4b2",
            "0d3b26ff-c4c1-4680-8622-8608ea7ab4g2",
            "0D3B26FF-C4C1-4680-8622-8608EA7AB4B2",
            "0d3b26ffc4c146808622-8608ea7ab4b2abcd",
            "",
        ] {
            assert_eq!(
                NodeRefRadixHasher.hash(&spaces(id)),
                Err(HashError::InvalidNodeId(id.to_string())),
                "{id}"
            );
        }
    }

    #[test]
    fn lookup_rejects_garbage() {
        let hasher = NodeRefRadixHasher;
        for hash in [
            HashPair::both("11", "00a"),
            HashPair::both("11", ""),
            HashPair::both("11", "ABC"),
            HashPair::both("91", "abc"),
            HashPair::both("1", "abc"),
            HashPair::both("111", "abc"),
            HashPair::both("11", "zzzzzzzzzzzzzzzzzzzzzzzzzzzzz"),
            HashPair::primary("11"),
            HashPair::secondary("abc"),
        ] {
            assert!(hasher.lookup(&hash).is_err(), "{hash:?}");
        }
    }
}
