use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub const WORKSPACE_PROTOCOL: &str = "workspace";
pub const SPACES_STORE_ID: &str = "SpacesStore";

/// A content store address, `protocol://identifier`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreRef {
    pub protocol: String,
    pub identifier: String,
}

impl StoreRef {
    pub fn new(protocol: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            identifier: identifier.into(),
        }
    }

    /// `workspace://SpacesStore`, the store disguised references live in.
    pub fn workspace_spaces_store() -> Self {
        Self::new(WORKSPACE_PROTOCOL, SPACES_STORE_ID)
    }

    pub fn is_workspace_spaces_store(&self) -> bool {
        self.protocol == WORKSPACE_PROTOCOL && self.identifier == SPACES_STORE_ID
    }
}

impl fmt::Display for StoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.protocol, self.identifier)
    }
}

/// Repository node identifier, `protocol://identifier/id`.
///
/// The id is opaque: everything after the store's trailing `/` belongs to it,
/// slashes included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    pub store: StoreRef,
    pub id: String,
}

impl NodeRef {
    pub fn new(store: StoreRef, id: impl Into<String>) -> Self {
        Self {
            store,
            id: id.into(),
        }
    }

    pub fn from_parts(
        protocol: impl Into<String>,
        identifier: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self::new(StoreRef::new(protocol, identifier), id)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.store, self.id)
    }
}

impl FromStr for NodeRef {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseError::Malformed {
            what: "node reference",
            token: s.to_string(),
        };

        let (protocol, rest) = s.split_once("://").ok_or_else(malformed)?;
        let (identifier, id) = rest.split_once('/').ok_or_else(malformed)?;
        if protocol.is_empty() || identifier.is_empty() {
            return Err(malformed());
        }

        Ok(Self::from_parts(protocol, identifier, id))
    }
}
