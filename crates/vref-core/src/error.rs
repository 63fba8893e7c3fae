use thiserror::Error;

use crate::encoding::Encoding;
use crate::protocol::Protocol;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty reference token")]
    Empty,

    #[error("Unknown protocol '{0}'")]
    UnknownProtocol(String),

    #[error("Unknown resource tag '{0}'")]
    UnknownResourceTag(String),

    #[error("Unknown parameter tag '{0}'")]
    UnknownParameterTag(String),

    #[error("Unknown op-code '{0}'")]
    UnknownOpCode(String),

    #[error("Truncated {what}: expected another token after position {position}")]
    Truncated { what: &'static str, position: usize },

    #[error("Missing '*' sentinel closing nested reference started at position {position}")]
    MissingSentinel { position: usize },

    #[error("Unexpected '*' sentinel at position {position}")]
    UnexpectedSentinel { position: usize },

    #[error("Malformed {what} '{token}'")]
    Malformed { what: &'static str, token: String },

    #[error("Unknown encoding token '{0}'")]
    UnknownEncoding(char),

    #[error("Node reference '{0}' is not a virtual reference")]
    NotVirtual(String),

    #[error("Undecodable hashed token: {0}")]
    Hash(#[from] HashError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("{encoding} encoding cannot carry {what} '{value}': {reason}")]
    Unrepresentable {
        encoding: Encoding,
        what: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolMethodError {
    #[error("Parameter index {index} out of bounds for {len} parameters")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("{method} is not supported by the {protocol} protocol")]
    Unsupported {
        method: &'static str,
        protocol: Protocol,
    },

    #[error("{method} expected {expected} at parameter {index}")]
    UnexpectedParameter {
        method: &'static str,
        index: usize,
        expected: &'static str,
    },

    #[error("{method} expected the reference resource to be {expected}")]
    UnexpectedResource {
        method: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    #[error("Invalid node id '{0}': expected a lowercase dashed 36-character UUID")]
    InvalidNodeId(String),

    #[error("Unsupported store protocol '{0}'")]
    UnsupportedStoreProtocol(String),

    #[error("Unsupported store id '{0}'")]
    UnsupportedStoreId(String),

    #[error("Cannot hash an empty path")]
    EmptyPath,

    #[error("Invalid hash '{0}'")]
    InvalidHash(String),

    #[error("Unknown stored path id '{0}'")]
    UnknownId(String),

    #[error("Invalid base64 segment '{0}'")]
    InvalidBase64(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid hash store entry {path} => {id}: {reason}")]
    InvalidHashStoreEntry {
        path: String,
        id: String,
        reason: &'static str,
    },

    #[error("Duplicate hash store id '{0}'")]
    DuplicateHashStoreId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Protocol method error: {0}")]
    ProtocolMethod(#[from] ProtocolMethodError),

    #[error("Hash error: {0}")]
    Hash(#[from] HashError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
