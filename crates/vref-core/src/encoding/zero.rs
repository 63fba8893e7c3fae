use std::sync::Arc;

use tracing::trace;

use crate::error::{EncodeError, ParseError};
use crate::hash::{
    encode_segment, HashPair, HashStore, Hasher, NodeRefRadixHasher, NumericPathHasher,
    StoredPathHasher,
};
use crate::node_ref::{NodeRef, StoreRef};
use crate::parameter::Parameter;
use crate::protocol::Protocol;
use crate::reference::Reference;
use crate::resource::Resource;

use super::tokens::{check_value, parse_parameters, TokenCursor, DELIMITER, SENTINEL};
use super::{Encoding, Parser, Stringifier};

const STRING_PARAMETER: &str = "s";
const REFERENCE_PARAMETER: &str = "r";
const HASHED_NODE: char = '~';
const HASH_SEPARATOR: char = '.';
const STORE_SEPARATOR: char = '/';

/// Op-codes above this carry no resource.
const LAST_RESOURCE_OP_CODE: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceKind {
    RepositoryPath,
    RepositoryNode,
    Classpath,
}

impl ResourceKind {
    const ALL: [Self; 3] = [Self::RepositoryPath, Self::RepositoryNode, Self::Classpath];

    const fn of(resource: &Resource) -> Self {
        match resource {
            Resource::RepositoryPath(_) => Self::RepositoryPath,
            Resource::RepositoryNode(_) => Self::RepositoryNode,
            Resource::Classpath(_) => Self::Classpath,
        }
    }

    const fn code(self) -> u8 {
        match self {
            Self::RepositoryPath => 0,
            Self::RepositoryNode => 1,
            Self::Classpath => 2,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    const fn name(self) -> &'static str {
        match self {
            Self::RepositoryPath => "repository path",
            Self::RepositoryNode => "repository node",
            Self::Classpath => "classpath",
        }
    }
}

const fn protocol_base(protocol: Protocol) -> u8 {
    match protocol {
        Protocol::Vanilla => 0,
        Protocol::Virtual => 3,
        Protocol::Node => 6,
    }
}

fn op_code(protocol: Protocol, resource: Option<&Resource>) -> u8 {
    match resource {
        Some(resource) => protocol_base(protocol) + ResourceKind::of(resource).code(),
        None => LAST_RESOURCE_OP_CODE + 1 + protocol_base(protocol) / 3,
    }
}

fn decode_op_code(token: &str) -> Option<(Protocol, Option<ResourceKind>)> {
    let code: u8 = token.parse().ok()?;
    if code.to_string() != token {
        return None;
    }

    let (base, kind) = if code > LAST_RESOURCE_OP_CODE {
        ((code - LAST_RESOURCE_OP_CODE - 1) * 3, None)
    } else {
        (code - code % 3, Some(ResourceKind::from_code(code % 3)?))
    };
    let protocol = Protocol::ALL
        .into_iter()
        .find(|p| protocol_base(*p) == base)?;
    Some((protocol, kind))
}

/// Compact encoding, e.g. `4:0029-222-333-444` or `5:/org/alfresco/`.
///
/// The first token is an op-code combining protocol and resource kind. Node ids
/// of well-known stores are radix hashed, repository paths go through the
/// numeric-path hasher and classpaths through the stored-path hasher; a hashed
/// form is only written when it is shorter than the raw value and decodes back
/// to it exactly. The empty path is an empty body.
#[derive(Debug, Clone)]
pub struct ZeroEncoding {
    radix: NodeRefRadixHasher,
    numeric: NumericPathHasher,
    stored: StoredPathHasher,
    hash_node_ids: bool,
}

impl Default for ZeroEncoding {
    fn default() -> Self {
        Self::new(Arc::new(HashStore::new()))
    }
}

impl ZeroEncoding {
    pub const fn new(hash_store: Arc<HashStore>) -> Self {
        Self {
            radix: NodeRefRadixHasher::new(),
            numeric: NumericPathHasher::new(),
            stored: StoredPathHasher::new(hash_store),
            hash_node_ids: true,
        }
    }

    #[must_use]
    pub fn with_node_hashing(mut self, enabled: bool) -> Self {
        self.hash_node_ids = enabled;
        self
    }

    pub fn hash_store(&self) -> &HashStore {
        self.stored.store()
    }

    fn unrepresentable(what: &'static str, value: &str, reason: &'static str) -> EncodeError {
        EncodeError::Unrepresentable {
            encoding: Encoding::Zero,
            what,
            value: value.to_string(),
            reason,
        }
    }

    fn hashed_path_token(hash: &HashPair) -> String {
        let mut token = hash.primary.clone().unwrap_or_default();
        if let Some(secondary) = &hash.secondary {
            token.push(HASH_SEPARATOR);
            token.push_str(secondary);
        }
        token
    }

    /// A relative path that does not survive hashing is carried whole as
    /// `.<base64>`, which every path hasher decodes without normalizing.
    fn stringify_path<H>(
        what: &'static str,
        path: &str,
        hasher: &H,
    ) -> Result<String, EncodeError>
    where
        H: Hasher<Value = str>,
    {
        check_value(Encoding::Zero, what, path)?;
        if path.is_empty() {
            return Ok(String::new());
        }

        let hashed = hasher
            .hash(path)
            .ok()
            .filter(|hash| hasher.lookup(hash).as_deref() == Ok(path))
            .map(|hash| Self::hashed_path_token(&hash));
        let raw_usable = path.starts_with('/');

        match hashed {
            Some(token) if !raw_usable || token.len() < path.len() => {
                trace!(what, path, token = %token, "hashed path");
                Ok(token)
            }
            _ if raw_usable => Ok(path.to_string()),
            _ => Ok(format!("{HASH_SEPARATOR}{}", encode_segment(path))),
        }
    }

    fn parse_path<H>(token: &str, hasher: &H) -> Result<String, ParseError>
    where
        H: Hasher<Value = str>,
    {
        if token.is_empty() || token.starts_with('/') {
            return Ok(token.to_string());
        }

        let hash = match token.split_once(HASH_SEPARATOR) {
            Some((primary, secondary)) => HashPair::new(
                Some(primary.to_string()).filter(|p| !p.is_empty()),
                Some(secondary.to_string()),
            ),
            None => HashPair::primary(token),
        };
        Ok(hasher.lookup(&hash)?)
    }

    fn parse_node(&self, token: &str) -> Result<NodeRef, ParseError> {
        let malformed = || ParseError::Malformed {
            what: "node reference",
            token: token.to_string(),
        };

        if let Some(hashed) = token.strip_prefix(HASHED_NODE) {
            let primary = hashed.get(..2).ok_or_else(malformed)?;
            let secondary = hashed.get(2..).filter(|s| !s.is_empty()).ok_or_else(malformed)?;
            return Ok(self.radix.lookup(&HashPair::both(primary, secondary))?);
        }

        if token.contains(STORE_SEPARATOR) {
            let mut parts = token.splitn(3, STORE_SEPARATOR);
            let (Some(protocol), Some(identifier), Some(id)) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(malformed());
            };
            if protocol.is_empty() || identifier.is_empty() {
                return Err(malformed());
            }
            return Ok(NodeRef::from_parts(protocol, identifier, id));
        }

        Ok(NodeRef::new(StoreRef::workspace_spaces_store(), token))
    }

    fn parse_resource(
        &self,
        kind: ResourceKind,
        cursor: &mut TokenCursor<'_>,
    ) -> Result<Resource, ParseError> {
        let token = cursor.next(kind.name())?;
        match kind {
            ResourceKind::RepositoryPath => Ok(Resource::RepositoryPath(Self::parse_path(
                token,
                &self.numeric,
            )?)),
            ResourceKind::Classpath => Ok(Resource::Classpath(Self::parse_path(
                token,
                &self.stored,
            )?)),
            ResourceKind::RepositoryNode => Ok(Resource::RepositoryNode(self.parse_node(token)?)),
        }
    }

    fn reference(
        &self,
        cursor: &mut TokenCursor<'_>,
        nested_at: Option<usize>,
    ) -> Result<Reference, ParseError> {
        let token = cursor.next("op-code")?;
        let (protocol, kind) =
            decode_op_code(token).ok_or_else(|| ParseError::UnknownOpCode(token.to_string()))?;

        let resource = kind
            .map(|kind| self.parse_resource(kind, cursor))
            .transpose()?;
        let parameters = parse_parameters(cursor, nested_at, |c| self.parameter(c))?;

        Ok(Reference::new(Encoding::Zero, protocol, resource, parameters))
    }

    fn parameter(&self, cursor: &mut TokenCursor<'_>) -> Result<Parameter, ParseError> {
        let position = cursor.position();
        match cursor.next("parameter")? {
            STRING_PARAMETER => Ok(Parameter::string(cursor.next("string parameter")?)),
            REFERENCE_PARAMETER => Ok(Parameter::reference(
                self.reference(cursor, Some(position))?,
            )),
            tag => {
                let kind = tag
                    .parse()
                    .ok()
                    .filter(|code: &u8| code.to_string() == tag)
                    .and_then(ResourceKind::from_code)
                    .ok_or_else(|| ParseError::UnknownParameterTag(tag.to_string()))?;
                Ok(Parameter::Resource(self.parse_resource(kind, cursor)?))
            }
        }
    }
}

impl Stringifier for ZeroEncoding {
    fn encoding(&self) -> Encoding {
        Encoding::Zero
    }

    fn stringify(&self, reference: &Reference) -> Result<String, EncodeError> {
        let mut parts = vec![op_code(reference.protocol(), reference.resource()).to_string()];
        if let Some(resource) = reference.resource() {
            parts.push(resource.stringify(self)?);
        }
        for parameter in reference.parameters() {
            parts.push(parameter.stringify(self)?);
        }
        Ok(parts.join(&DELIMITER.to_string()))
    }

    fn stringify_classpath(&self, path: &str) -> Result<String, EncodeError> {
        Self::stringify_path("classpath", path, &self.stored)
    }

    fn stringify_repository_node(&self, node: &NodeRef) -> Result<String, EncodeError> {
        check_value(Encoding::Zero, "store protocol", &node.store.protocol)?;
        check_value(Encoding::Zero, "store id", &node.store.identifier)?;
        check_value(Encoding::Zero, "node id", &node.id)?;

        if self.hash_node_ids {
            if let Ok(HashPair {
                primary: Some(primary),
                secondary: Some(secondary),
            }) = self.radix.hash(node)
            {
                return Ok(format!("{HASHED_NODE}{primary}{secondary}"));
            }
        }

        if node.store.is_workspace_spaces_store()
            && !node.id.starts_with(HASHED_NODE)
            && !node.id.contains(STORE_SEPARATOR)
        {
            return Ok(node.id.clone());
        }

        if node.store.protocol.is_empty()
            || node.store.identifier.is_empty()
            || node.store.protocol.contains(STORE_SEPARATOR)
            || node.store.identifier.contains(STORE_SEPARATOR)
        {
            return Err(Self::unrepresentable(
                "store",
                &node.store.to_string(),
                "store protocol and id must be non-empty and free of '/'",
            ));
        }
        Ok(format!(
            "{}{STORE_SEPARATOR}{}{STORE_SEPARATOR}{}",
            node.store.protocol, node.store.identifier, node.id
        ))
    }

    fn stringify_repository_path(&self, path: &str) -> Result<String, EncodeError> {
        Self::stringify_path("repository path", path, &self.numeric)
    }

    fn stringify_string_parameter(&self, value: &str) -> Result<String, EncodeError> {
        Ok(format!(
            "{STRING_PARAMETER}{DELIMITER}{}",
            check_value(Encoding::Zero, "string parameter", value)?
        ))
    }

    fn stringify_resource_parameter(&self, resource: &Resource) -> Result<String, EncodeError> {
        Ok(format!(
            "{}{DELIMITER}{}",
            ResourceKind::of(resource).code(),
            resource.stringify(self)?
        ))
    }

    fn stringify_reference_parameter(&self, reference: &Reference) -> Result<String, EncodeError> {
        Ok(format!(
            "{REFERENCE_PARAMETER}{DELIMITER}{}{DELIMITER}{SENTINEL}",
            self.stringify(reference)?
        ))
    }
}

impl Parser for ZeroEncoding {
    fn encoding(&self) -> Encoding {
        Encoding::Zero
    }

    fn parse(&self, encoded: &str) -> Result<Reference, ParseError> {
        trace!(encoded, "parsing zero reference");
        let mut cursor = TokenCursor::new(encoded)?;
        self.reference(&mut cursor, None)
    }
}
