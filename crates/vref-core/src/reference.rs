use std::hash::{Hash, Hasher};

use crate::encoding::{Encoding, Encodings};
use crate::error::{ParseError, ProtocolMethodError, Result};
use crate::node_ref::{NodeRef, StoreRef};
use crate::parameter::Parameter;
use crate::protocol::{
    GetChildByIdMethod, GetParentMethod, GetTemplatePathMethod, Protocol, ProtocolMethod,
};
use crate::resource::Resource;

/// Marks a node id as a disguised virtual reference. Node ids are hex UUIDs,
/// so they never start with it.
pub const VIRTUAL_TOKEN: char = 'v';

/// A (possibly virtual) address: a protocol applied to an optional resource and
/// an ordered parameter list.
///
/// Equality and hashing ignore the encoding: a reference parsed from a Zero
/// token equals the same reference built for Plain.
#[derive(Debug, Clone)]
pub struct Reference {
    encoding: Encoding,
    protocol: Protocol,
    resource: Option<Resource>,
    parameters: Vec<Parameter>,
}

impl Reference {
    pub fn new(
        encoding: Encoding,
        protocol: Protocol,
        resource: Option<Resource>,
        parameters: Vec<Parameter>,
    ) -> Self {
        Self {
            encoding,
            protocol,
            resource,
            parameters,
        }
    }

    pub fn with_resource(encoding: Encoding, protocol: Protocol, resource: Resource) -> Self {
        Self::new(encoding, protocol, Some(resource), Vec::new())
    }

    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub const fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub const fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Same reference, serialized with another encoding from now on.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub(crate) fn with_parameters(&self, parameters: Vec<Parameter>) -> Self {
        Self {
            encoding: self.encoding,
            protocol: self.protocol,
            resource: self.resource.clone(),
            parameters,
        }
    }

    pub fn encode(&self, encodings: &Encodings) -> Result<String> {
        self.encode_as(self.encoding, encodings)
    }

    pub fn encode_as(&self, encoding: Encoding, encodings: &Encodings) -> Result<String> {
        Ok(encodings.stringifier(encoding).stringify(self)?)
    }

    pub fn execute<M: ProtocolMethod>(
        &self,
        method: &M,
    ) -> std::result::Result<M::Output, ProtocolMethodError> {
        method.execute(self)
    }

    pub fn parent(&self) -> std::result::Result<Option<Self>, ProtocolMethodError> {
        self.execute(&GetParentMethod)
    }

    pub fn child_by_id(&self, id: &str) -> std::result::Result<Self, ProtocolMethodError> {
        self.execute(&GetChildByIdMethod::new(id))
    }

    pub fn template_path(&self) -> std::result::Result<String, ProtocolMethodError> {
        self.execute(&GetTemplatePathMethod)
    }

    /// Disguises this reference as a plain repository identifier so it can pass
    /// through APIs that only know about node references.
    pub fn to_node_ref(&self, encodings: &Encodings) -> Result<NodeRef> {
        let encoded = self.encode(encodings)?;
        let id = format!("{VIRTUAL_TOKEN}{}{encoded}", self.encoding.token());
        Ok(NodeRef::new(StoreRef::workspace_spaces_store(), id))
    }

    pub fn from_node_ref(node: &NodeRef, encodings: &Encodings) -> Result<Self> {
        let mut chars = node.id.chars();
        if chars.next() != Some(VIRTUAL_TOKEN) {
            return Err(ParseError::NotVirtual(node.to_string()).into());
        }
        let token = chars
            .next()
            .ok_or_else(|| ParseError::NotVirtual(node.to_string()))?;
        let encoding = Encoding::from_token(token).ok_or(ParseError::UnknownEncoding(token))?;

        encodings.parse_as(encoding, chars.as_str())
    }

    /// Whether the node reference carries a disguised virtual reference.
    pub fn is_reference(node: &NodeRef) -> bool {
        let mut chars = node.id.chars();
        chars.next() == Some(VIRTUAL_TOKEN)
            && chars.next().and_then(Encoding::from_token).is_some()
            && !chars.as_str().is_empty()
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.protocol == other.protocol
            && self.resource == other.resource
            && self.parameters == other.parameters
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.protocol.hash(state);
        self.resource.hash(state);
        self.parameters.hash(state);
    }
}
