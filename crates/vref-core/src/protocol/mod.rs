mod method;
pub mod path;

use std::fmt;

use crate::encoding::Encoding;
use crate::error::ProtocolMethodError;
use crate::node_ref::NodeRef;
use crate::parameter::Parameter;
use crate::reference::Reference;
use crate::resource::Resource;

pub use method::{
    GetChildByIdMethod, GetParentMethod, GetTemplatePathMethod, NewReferenceMethod,
    ProtocolMethod,
};

/// Virtual and vanilla references keep their template path here.
pub const TEMPLATE_PATH_PARAM: usize = 0;
/// Virtual and vanilla references keep the node the template is applied to here.
pub const ACTUAL_NODE_PARAM: usize = 1;
pub const VANILLA_TEMPLATE_PARAM: usize = 2;
/// Node references keep the concrete resource they overlay here.
pub const OVERLAID_RESOURCE_PARAM: usize = 0;
/// Node references list their ancestor references from here on, nearest first.
pub const ANCESTORS_PARAM: usize = 1;

/// How a reference's parameters are interpreted.
///
/// The set is closed. An operation a protocol does not define falls through
/// to an arm returning [`ProtocolMethodError::Unsupported`], which stands in
/// for a catch-all protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// A template applied to an actual node, navigated by template path.
    Virtual,
    /// A virtual template rendered by a processor script.
    Vanilla,
    /// A node materialized from a template inside a virtual tree.
    Node,
}

impl Protocol {
    pub const ALL: [Self; 3] = [Self::Virtual, Self::Vanilla, Self::Node];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Virtual => "virtual",
            Self::Vanilla => "vanilla",
            Self::Node => "node",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn parameter(
        self,
        reference: &Reference,
        index: usize,
    ) -> Result<&Parameter, ProtocolMethodError> {
        let parameters = reference.parameters();
        parameters
            .get(index)
            .ok_or(ProtocolMethodError::IndexOutOfBounds {
                index,
                len: parameters.len(),
            })
    }

    pub fn replace_parameter(
        self,
        reference: &Reference,
        index: usize,
        parameter: Parameter,
    ) -> Result<Reference, ProtocolMethodError> {
        let mut parameters = reference.parameters().to_vec();
        let len = parameters.len();
        let slot = parameters
            .get_mut(index)
            .ok_or(ProtocolMethodError::IndexOutOfBounds { index, len })?;
        *slot = parameter;
        Ok(reference.with_parameters(parameters))
    }

    #[must_use]
    pub fn add_parameter(self, reference: &Reference, parameter: Parameter) -> Reference {
        let mut parameters = reference.parameters().to_vec();
        parameters.push(parameter);
        reference.with_parameters(parameters)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Reference {
    /// A template resource applied to `actual_node`, positioned at `template_path`.
    pub fn new_virtual(
        encoding: Encoding,
        template: Resource,
        template_path: impl Into<String>,
        actual_node: NodeRef,
    ) -> Self {
        Self::new(
            encoding,
            Protocol::Virtual,
            Some(template),
            vec![
                Parameter::string(template_path),
                Parameter::resource(Resource::RepositoryNode(actual_node)),
            ],
        )
    }

    pub fn new_vanilla(
        encoding: Encoding,
        processor: impl Into<String>,
        template_path: impl Into<String>,
        actual_node: NodeRef,
        vanilla_template: NodeRef,
    ) -> Self {
        Self::new(
            encoding,
            Protocol::Vanilla,
            Some(Resource::classpath(processor)),
            vec![
                Parameter::string(template_path),
                Parameter::resource(Resource::RepositoryNode(actual_node)),
                Parameter::resource(Resource::RepositoryNode(vanilla_template)),
            ],
        )
    }

    /// A node materialized at `template_path` overlaying `actual`, below `ancestors`.
    pub fn new_node(
        encoding: Encoding,
        template_path: impl Into<String>,
        actual: Resource,
        ancestors: Vec<Self>,
    ) -> Self {
        let mut parameters = Vec::with_capacity(ancestors.len() + 1);
        parameters.push(Parameter::resource(actual));
        parameters.extend(ancestors.into_iter().map(Parameter::reference));

        Self::new(
            encoding,
            Protocol::Node,
            Some(Resource::repository_path(template_path)),
            parameters,
        )
    }

    /// Node a virtual or vanilla template is applied to.
    pub fn actual_node(&self) -> Option<&NodeRef> {
        match self.protocol() {
            Protocol::Virtual | Protocol::Vanilla => self
                .parameters()
                .get(ACTUAL_NODE_PARAM)?
                .as_resource()?
                .as_node_ref(),
            Protocol::Node => None,
        }
    }

    pub fn vanilla_template(&self) -> Option<&NodeRef> {
        match self.protocol() {
            Protocol::Vanilla => self
                .parameters()
                .get(VANILLA_TEMPLATE_PARAM)?
                .as_resource()?
                .as_node_ref(),
            Protocol::Virtual | Protocol::Node => None,
        }
    }

    /// Concrete resource a node reference stands in for.
    pub fn overlaid_resource(&self) -> Option<&Resource> {
        match self.protocol() {
            Protocol::Node => self.parameters().get(OVERLAID_RESOURCE_PARAM)?.as_resource(),
            Protocol::Virtual | Protocol::Vanilla => None,
        }
    }
}
