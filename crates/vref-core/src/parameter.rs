use crate::encoding::Stringifier;
use crate::error::EncodeError;
use crate::reference::Reference;
use crate::resource::Resource;

/// One positional argument of a reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Parameter {
    String(String),
    Resource(Resource),
    /// A complete nested reference, which is what makes references recursive.
    Reference(Box<Reference>),
}

impl Parameter {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn resource(resource: Resource) -> Self {
        Self::Resource(resource)
    }

    pub fn reference(reference: Reference) -> Self {
        Self::Reference(Box::new(reference))
    }

    pub fn stringify(&self, stringifier: &dyn Stringifier) -> Result<String, EncodeError> {
        match self {
            Self::String(value) => stringifier.stringify_string_parameter(value),
            Self::Resource(resource) => stringifier.stringify_resource_parameter(resource),
            Self::Reference(reference) => stringifier.stringify_reference_parameter(reference),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

impl From<Resource> for Parameter {
    fn from(resource: Resource) -> Self {
        Self::Resource(resource)
    }
}

impl From<Reference> for Parameter {
    fn from(reference: Reference) -> Self {
        Self::reference(reference)
    }
}
