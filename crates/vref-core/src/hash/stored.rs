use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::error::{ConfigError, HashError};

use super::{decode_segment, encode_segment, normalize_path, HashPair, Hasher};

/// Characters a stored id may not contain: they delimit Zero tokens.
const RESERVED_ID_CHARS: &[char] = &[':', '.', '/', '*', '~'];

/// Registered path prefixes and the short ids that stand in for them.
///
/// Filled while configuring, then shared read-only behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct HashStore {
    by_path: BTreeMap<String, String>,
    by_id: HashMap<String, String>,
}

impl HashStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, P, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<String>,
        S: Into<String>,
    {
        let mut store = Self::new();
        for (path, id) in entries {
            store.insert(path, id)?;
        }
        Ok(store)
    }

    /// Registers `path` under `id`, replacing any id the path had before.
    pub fn insert(
        &mut self,
        path: impl Into<String>,
        id: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let path = path.into();
        let id = id.into();
        let invalid = |reason| ConfigError::InvalidHashStoreEntry {
            path: path.clone(),
            id: id.clone(),
            reason,
        };

        if path.is_empty() {
            return Err(invalid("path must not be empty"));
        }
        if id.is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if id.contains(RESERVED_ID_CHARS) {
            return Err(invalid("id contains a reserved character"));
        }

        let normalized = normalize_path(&path).to_string();
        if let Some(existing) = self.by_id.get(&id) {
            if *existing != normalized {
                return Err(ConfigError::DuplicateHashStoreId(id));
            }
        }

        if let Some(previous) = self.by_path.insert(normalized.clone(), id.clone()) {
            self.by_id.remove(&previous);
        }
        debug!(path = %normalized, id = %id, "registered hash store entry");
        self.by_id.insert(id, normalized);
        Ok(())
    }

    pub fn id(&self, path: &str) -> Option<&str> {
        self.by_path.get(normalize_path(path)).map(String::as_str)
    }

    pub fn path(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Longest registered prefix of `path` that ends on a segment boundary.
    fn longest_prefix<'a>(&'a self, path: &str) -> Option<(&'a str, &'a str)> {
        let mut candidate = path;
        loop {
            if let Some((prefix, id)) = self.by_path.get_key_value(candidate) {
                return Some((prefix.as_str(), id.as_str()));
            }
            candidate = match candidate.rfind('/')? {
                0 if candidate == "/" => return None,
                0 => "/",
                index => &candidate[..index],
            };
        }
    }
}

/// Replaces the longest registered prefix of a path with its stored id.
#[derive(Debug, Clone, Default)]
pub struct StoredPathHasher {
    store: Arc<HashStore>,
}

impl StoredPathHasher {
    pub const fn new(store: Arc<HashStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &HashStore {
        &self.store
    }
}

impl Hasher for StoredPathHasher {
    type Value = str;

    fn hash(&self, path: &str) -> Result<HashPair, HashError> {
        if path.is_empty() {
            return Err(HashError::EmptyPath);
        }

        let path = normalize_path(path);
        if path == "/" {
            return Ok(HashPair::secondary(""));
        }

        match self.store.longest_prefix(path) {
            Some((prefix, id)) if prefix == path => Ok(HashPair::primary(id)),
            Some((prefix, id)) => {
                let skip = if prefix == "/" { 1 } else { prefix.len() + 1 };
                Ok(HashPair::both(id, encode_segment(&path[skip..])))
            }
            None => Ok(HashPair::secondary(encode_segment(path))),
        }
    }

    fn lookup(&self, hash: &HashPair) -> Result<String, HashError> {
        let stored = |id: &str| {
            self.store
                .path(id)
                .ok_or_else(|| HashError::UnknownId(id.to_string()))
        };

        match (hash.primary.as_deref(), hash.secondary.as_deref()) {
            (Some(id), None) => stored(id).map(str::to_string),
            (Some(id), Some(remainder)) => {
                let prefix = stored(id)?;
                let remainder = decode_segment(remainder)?;
                if prefix == "/" {
                    Ok(format!("/{remainder}"))
                } else {
                    Ok(format!("{prefix}/{remainder}"))
                }
            }
            (None, Some("")) => Ok("/".to_string()),
            (None, Some(whole)) => decode_segment(whole),
            (None, None) => Err(HashError::InvalidHash(format!("{hash:?}"))),
        }
    }
}
