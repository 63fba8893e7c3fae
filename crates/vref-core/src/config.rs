use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "VREF_CONFIG";

/// Encoding configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrefConfig {
    /// Path prefixes the Zero encoding may replace with a short id,
    /// keyed by path.
    #[serde(default)]
    pub hash_store: BTreeMap<String, String>,

    /// Radix hash UUID node ids of well-known stores in Zero tokens.
    #[serde(default = "default_true")]
    pub hash_node_ids: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for VrefConfig {
    fn default() -> Self {
        Self {
            hash_store: BTreeMap::new(),
            hash_node_ids: true,
        }
    }
}

impl VrefConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Loads the file named by `VREF_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(&PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    #[must_use]
    pub fn with_hash_store_entry(mut self, path: impl Into<String>, id: impl Into<String>) -> Self {
        let path = path.into();
        let id = id.into();
        if let Some(previous) = self.hash_store.insert(path.clone(), id) {
            warn!(path = %path, previous = %previous, "hash store entry replaced");
        }
        self
    }
}
