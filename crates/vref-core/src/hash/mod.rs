//! Invertible compaction of node ids and paths for the Zero encoding.
//!
//! A [`Hasher`] maps a value to a [`HashPair`] and back. `lookup(hash(v)) == v`
//! must hold for every `v` the hasher accepts; anything outside its domain is
//! rejected with a [`HashError`] rather than approximated.

mod numeric;
mod radix;
mod stored;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::HashError;

pub use numeric::NumericPathHasher;
pub use radix::NodeRefRadixHasher;
pub use stored::{HashStore, StoredPathHasher};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HashPair {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

impl HashPair {
    pub fn new(primary: Option<String>, secondary: Option<String>) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(primary: impl Into<String>) -> Self {
        Self::new(Some(primary.into()), None)
    }

    pub fn secondary(secondary: impl Into<String>) -> Self {
        Self::new(None, Some(secondary.into()))
    }

    pub fn both(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self::new(Some(primary.into()), Some(secondary.into()))
    }
}

pub trait Hasher {
    type Value: ?Sized + ToOwned;

    fn hash(&self, value: &Self::Value) -> Result<HashPair, HashError>;

    fn lookup(&self, hash: &HashPair) -> Result<<Self::Value as ToOwned>::Owned, HashError>;
}

pub(crate) fn encode_segment(value: &str) -> String {
    URL_SAFE_NO_PAD.encode(value.as_bytes())
}

pub(crate) fn decode_segment(encoded: &str) -> Result<String, HashError> {
    let invalid = || HashError::InvalidBase64(encoded.to_string());
    let bytes = URL_SAFE_NO_PAD.decode(encoded).map_err(|_| invalid())?;
    String::from_utf8(bytes).map_err(|_| invalid())
}

/// Drops one trailing slash, leaving the root path alone.
pub(crate) fn normalize_path(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}
