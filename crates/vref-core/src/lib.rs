#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod node_ref;
pub mod parameter;
pub mod protocol;
pub mod reference;
pub mod resource;

pub use config::VrefConfig;
pub use encoding::{Encoding, Encodings, Parser, PlainEncoding, Stringifier, ZeroEncoding};
pub use error::{ConfigError, EncodeError, Error, HashError, ParseError, ProtocolMethodError, Result};
pub use hash::{HashPair, HashStore, Hasher, NodeRefRadixHasher, NumericPathHasher, StoredPathHasher};
pub use node_ref::{NodeRef, StoreRef};
pub use parameter::Parameter;
pub use protocol::{
    GetChildByIdMethod, GetParentMethod, GetTemplatePathMethod, NewReferenceMethod, Protocol,
    ProtocolMethod,
};
pub use reference::Reference;
pub use resource::Resource;
