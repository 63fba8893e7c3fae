//! Wire grammars for references.
//!
//! Both encodings share one abstract grammar,
//! `<protocol>[:<resource>](:<parameter>)*`, with nested reference parameters
//! closed by a `*` token. [`Encoding::Plain`] spells every tag out;
//! [`Encoding::Zero`] packs protocol and resource kind into one op-code and
//! shortens identifiers with the hashers in [`crate::hash`].

mod plain;
mod tokens;
mod zero;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::VrefConfig;
use crate::error::{ConfigError, EncodeError, ParseError, Result};
use crate::hash::HashStore;
use crate::node_ref::NodeRef;
use crate::reference::Reference;
use crate::resource::Resource;

pub use plain::PlainEncoding;
pub use tokens::{DELIMITER, SENTINEL};
pub use zero::ZeroEncoding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Verbose and readable, for debugging and logs.
    Plain,
    /// Compact op-codes and hashed identifiers.
    Zero,
}

impl Encoding {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Zero => "zero",
        }
    }

    /// Character identifying the encoding inside a disguised node id.
    pub const fn token(self) -> char {
        match self {
            Self::Plain => 'p',
            Self::Zero => '0',
        }
    }

    pub const fn from_token(token: char) -> Option<Self> {
        match token {
            'p' => Some(Self::Plain),
            '0' => Some(Self::Zero),
            _ => None,
        }
    }

    /// Zero tokens open with a numeric op-code, Plain ones with a protocol name.
    pub fn detect(encoded: &str) -> Self {
        if encoded.starts_with(|c: char| c.is_ascii_digit()) {
            Self::Zero
        } else {
            Self::Plain
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Turns a reference and each of its parts into encoded text.
///
/// Resources and parameters call back into the method for their own shape, so
/// a new shape only needs a new method here.
pub trait Stringifier: Send + Sync {
    fn encoding(&self) -> Encoding;

    fn stringify(&self, reference: &Reference) -> std::result::Result<String, EncodeError>;

    fn stringify_classpath(&self, path: &str) -> std::result::Result<String, EncodeError>;

    fn stringify_repository_node(&self, node: &NodeRef)
        -> std::result::Result<String, EncodeError>;

    fn stringify_repository_path(&self, path: &str) -> std::result::Result<String, EncodeError>;

    fn stringify_string_parameter(&self, value: &str)
        -> std::result::Result<String, EncodeError>;

    fn stringify_resource_parameter(
        &self,
        resource: &Resource,
    ) -> std::result::Result<String, EncodeError>;

    fn stringify_reference_parameter(
        &self,
        reference: &Reference,
    ) -> std::result::Result<String, EncodeError>;
}

pub trait Parser: Send + Sync {
    fn encoding(&self) -> Encoding;

    fn parse(&self, encoded: &str) -> std::result::Result<Reference, ParseError>;
}

/// The encodings available to encode and parse, built once and borrowed.
#[derive(Debug, Clone, Default)]
pub struct Encodings {
    plain: PlainEncoding,
    zero: ZeroEncoding,
}

impl Encodings {
    pub fn new(hash_store: Arc<HashStore>) -> Self {
        Self {
            plain: PlainEncoding,
            zero: ZeroEncoding::new(hash_store),
        }
    }

    pub fn from_config(config: &VrefConfig) -> std::result::Result<Self, ConfigError> {
        let store = HashStore::from_entries(&config.hash_store)?;
        debug!(
            entries = store.len(),
            hash_node_ids = config.hash_node_ids,
            "building encodings from config"
        );
        Ok(Self {
            plain: PlainEncoding,
            zero: ZeroEncoding::new(Arc::new(store)).with_node_hashing(config.hash_node_ids),
        })
    }

    pub fn stringifier(&self, encoding: Encoding) -> &dyn Stringifier {
        match encoding {
            Encoding::Plain => &self.plain,
            Encoding::Zero => &self.zero,
        }
    }

    pub fn parser(&self, encoding: Encoding) -> &dyn Parser {
        match encoding {
            Encoding::Plain => &self.plain,
            Encoding::Zero => &self.zero,
        }
    }

    pub const fn zero(&self) -> &ZeroEncoding {
        &self.zero
    }

    /// Parses with whichever encoding `encoded` is written in.
    pub fn parse(&self, encoded: &str) -> Result<Reference> {
        self.parse_as(Encoding::detect(encoded), encoded)
    }

    pub fn parse_as(&self, encoding: Encoding, encoded: &str) -> Result<Reference> {
        Ok(self.parser(encoding).parse(encoded)?)
    }

    /// Re-encodes a token in another encoding.
    pub fn transcode(&self, encoded: &str, to: Encoding) -> Result<String> {
        self.parse(encoded)?.encode_as(to, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Protocol;

    #[test]
    fn tokens_round_trip() {
        for encoding in [Encoding::Plain, Encoding::Zero] {
            assert_eq!(Encoding::from_token(encoding.token()), Some(encoding));
        }
        assert_eq!(Encoding::from_token('x'), None);
    }

    #[test]
    fn detect_encoding() {
        assert_eq!(Encoding::detect("5:/org/alfresco/"), Encoding::Zero);
        assert_eq!(
            Encoding::detect("virtual:classpath:/org/alfresco/"),
            Encoding::Plain
        );
    }

    #[test]
    fn parse_detects_encoding() {
        let encodings = Encodings::default();
        let zero = encodings.parse("5:/org/alfresco/").unwrap();
        let plain = encodings.parse("virtual:classpath:/org/alfresco/").unwrap();

        assert_eq!(zero, plain);
        assert_eq!(zero.encoding(), Encoding::Zero);
        assert_eq!(plain.encoding(), Encoding::Plain);
        assert_eq!(plain.protocol(), Protocol::Virtual);
    }

    #[test]
    fn transcode_between_encodings() {
        let encodings = Encodings::default();
        assert_eq!(
            encodings
                .transcode("virtual:repository:path:/Foo/Bar", Encoding::Zero)
                .unwrap(),
            "3:/Foo/Bar"
        );
        assert_eq!(
            encodings.transcode("3:/Foo/Bar", Encoding::Plain).unwrap(),
            "virtual:repository:path:/Foo/Bar"
        );
    }

    #[test]
    fn encoding_names_serialize() {
        assert_eq!(serde_json::to_string(&Encoding::Zero).unwrap(), "\"zero\"");
        assert_eq!(
            serde_json::from_str::<Encoding>("\"plain\"").unwrap(),
            Encoding::Plain
        );
    }
}
