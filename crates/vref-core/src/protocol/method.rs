use tracing::trace;

use crate::error::ProtocolMethodError;
use crate::parameter::Parameter;
use crate::reference::Reference;
use crate::resource::Resource;

use super::path::{child_path, parent_path};
use super::{Protocol, ANCESTORS_PARAM, TEMPLATE_PATH_PARAM};

/// An operation whose behaviour depends on the reference's protocol.
///
/// Every implementation is a single `match` over [`Protocol`]; protocols an
/// operation does not apply to fail with [`ProtocolMethodError::Unsupported`].
pub trait ProtocolMethod {
    type Output;

    const NAME: &'static str;

    fn execute(&self, reference: &Reference) -> Result<Self::Output, ProtocolMethodError>;

    fn unsupported(&self, protocol: Protocol) -> ProtocolMethodError {
        ProtocolMethodError::Unsupported {
            method: Self::NAME,
            protocol,
        }
    }
}

fn template_path_parameter<'a>(
    method: &'static str,
    reference: &'a Reference,
) -> Result<&'a str, ProtocolMethodError> {
    reference
        .protocol()
        .parameter(reference, TEMPLATE_PATH_PARAM)?
        .as_str()
        .ok_or(ProtocolMethodError::UnexpectedParameter {
            method,
            index: TEMPLATE_PATH_PARAM,
            expected: "a string template path",
        })
}

fn with_template_path(
    reference: &Reference,
    path: String,
) -> Result<Reference, ProtocolMethodError> {
    reference
        .protocol()
        .replace_parameter(reference, TEMPLATE_PATH_PARAM, Parameter::String(path))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetParentMethod;

impl ProtocolMethod for GetParentMethod {
    type Output = Option<Reference>;

    const NAME: &'static str = "get-parent";

    fn execute(&self, reference: &Reference) -> Result<Self::Output, ProtocolMethodError> {
        match reference.protocol() {
            Protocol::Virtual | Protocol::Vanilla => {
                let path = template_path_parameter(Self::NAME, reference)?;
                parent_path(path)
                    .map(|parent| with_template_path(reference, parent))
                    .transpose()
            }
            Protocol::Node => match reference.parameters().get(ANCESTORS_PARAM) {
                None => Ok(None),
                Some(Parameter::Reference(parent)) => Ok(Some(parent.as_ref().clone())),
                Some(_) => Err(ProtocolMethodError::UnexpectedParameter {
                    method: Self::NAME,
                    index: ANCESTORS_PARAM,
                    expected: "an ancestor reference",
                }),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetChildByIdMethod {
    id: String,
}

impl GetChildByIdMethod {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl ProtocolMethod for GetChildByIdMethod {
    type Output = Reference;

    const NAME: &'static str = "get-child-by-id";

    fn execute(&self, reference: &Reference) -> Result<Self::Output, ProtocolMethodError> {
        match reference.protocol() {
            Protocol::Virtual | Protocol::Vanilla => {
                let path = template_path_parameter(Self::NAME, reference)?;
                with_template_path(reference, child_path(path, &self.id))
            }
            protocol @ Protocol::Node => Err(self.unsupported(protocol)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetTemplatePathMethod;

impl ProtocolMethod for GetTemplatePathMethod {
    type Output = String;

    const NAME: &'static str = "get-template-path";

    fn execute(&self, reference: &Reference) -> Result<Self::Output, ProtocolMethodError> {
        match reference.protocol() {
            Protocol::Virtual | Protocol::Vanilla => {
                template_path_parameter(Self::NAME, reference).map(str::to_string)
            }
            Protocol::Node => match reference.resource() {
                Some(Resource::RepositoryPath(path)) => Ok(path.clone()),
                _ => Err(ProtocolMethodError::UnexpectedResource {
                    method: Self::NAME,
                    expected: "a repository path",
                }),
            },
        }
    }
}

/// Materializes a node from the template of the reference it is executed on.
#[derive(Debug, Clone)]
pub struct NewReferenceMethod {
    template_path: String,
    actual: Resource,
}

impl NewReferenceMethod {
    pub fn new(template_path: impl Into<String>, actual: Resource) -> Self {
        Self {
            template_path: template_path.into(),
            actual,
        }
    }
}

impl ProtocolMethod for NewReferenceMethod {
    type Output = Reference;

    const NAME: &'static str = "new-reference";

    fn execute(&self, reference: &Reference) -> Result<Self::Output, ProtocolMethodError> {
        match reference.protocol() {
            Protocol::Virtual | Protocol::Vanilla => {
                trace!(
                    template_path = %self.template_path,
                    parent = %reference.protocol(),
                    "materializing node reference"
                );
                Ok(Reference::new_node(
                    reference.encoding(),
                    self.template_path.clone(),
                    self.actual.clone(),
                    vec![reference.clone()],
                ))
            }
            protocol @ Protocol::Node => Err(self.unsupported(protocol)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use crate::node_ref::NodeRef;

    fn virtual_at(path: &str) -> Reference {
        Reference::new_virtual(
            Encoding::Plain,
            Resource::classpath("/org/alfresco/smartFolder.json"),
            path,
            NodeRef::from_parts("workspace", "SpacesStore", "root"),
        )
    }

    fn template_path_of(reference: &Reference) -> &str {
        reference.parameters()[TEMPLATE_PATH_PARAM].as_str().unwrap()
    }

    #[test]
    fn virtual_parent() {
        let parent = virtual_at("/Media types/Images").parent().unwrap().unwrap();
        assert_eq!(template_path_of(&parent), "/Media types");
        assert_eq!(parent.resource(), virtual_at("/").resource());
    }

    #[test]
    fn virtual_parent_trailing_slash() {
        let parent = virtual_at("/Media types/Images/").parent().unwrap().unwrap();
        assert_eq!(template_path_of(&parent), "/Media types");
    }

    #[test]
    fn virtual_parent_of_top_level() {
        let parent = virtual_at("/Media types").parent().unwrap().unwrap();
        assert_eq!(template_path_of(&parent), "/");
    }

    #[test]
    fn virtual_root_has_no_parent() {
        assert_eq!(virtual_at("/").parent().unwrap(), None);
        assert_eq!(virtual_at("/ ").parent().unwrap(), None);
    }

    #[test]
    fn virtual_child() {
        let child = virtual_at("/root").child_by_id("aChild").unwrap();
        assert_eq!(template_path_of(&child), "/root/aChild");
        assert_eq!(child.protocol(), Protocol::Virtual);
        assert_eq!(child.parameters()[1], virtual_at("/root").parameters()[1]);
    }

    #[test]
    fn virtual_child_trims_path() {
        let child = virtual_at("  /root/   ").child_by_id("child").unwrap();
        assert_eq!(template_path_of(&child), "/root/child");
    }

    #[test]
    fn template_path_of_virtual() {
        assert_eq!(virtual_at("/a/b").template_path().unwrap(), "/a/b");
    }

    #[test]
    fn missing_template_path_is_reported() {
        let bare = Reference::with_resource(
            Encoding::Plain,
            Protocol::Virtual,
            Resource::classpath("/t.json"),
        );
        assert_eq!(
            bare.parent(),
            Err(ProtocolMethodError::IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    #[test]
    fn non_string_template_path_is_reported() {
        let odd = Reference::new(
            Encoding::Plain,
            Protocol::Vanilla,
            None,
            vec![Parameter::resource(Resource::classpath("/x"))],
        );
        assert!(matches!(
            odd.template_path(),
            Err(ProtocolMethodError::UnexpectedParameter { index: 0, .. })
        ));
    }

    #[test]
    fn new_reference_materializes_node() {
        let parent = virtual_at("/Media types");
        let actual =
            Resource::repository_node(NodeRef::from_parts("workspace", "SpacesStore", "doc"));
        let node = parent
            .execute(&NewReferenceMethod::new("/Media types/Images", actual.clone()))
            .unwrap();

        assert_eq!(node.protocol(), Protocol::Node);
        assert_eq!(node.template_path().unwrap(), "/Media types/Images");
        assert_eq!(node.parameters()[0].as_resource(), Some(&actual));
        assert_eq!(node.parent().unwrap(), Some(parent));
    }

    #[test]
    fn node_without_ancestors_has_no_parent() {
        let node = Reference::new_node(
            Encoding::Zero,
            "/a",
            Resource::repository_path("/Company Home/a"),
            vec![],
        );
        assert_eq!(node.parent().unwrap(), None);
    }

    #[test]
    fn node_does_not_support_children() {
        let node = Reference::new_node(
            Encoding::Plain,
            "/a",
            Resource::repository_path("/Company Home/a"),
            vec![virtual_at("/")],
        );
        assert_eq!(
            node.child_by_id("x"),
            Err(ProtocolMethodError::Unsupported {
                method: "get-child-by-id",
                protocol: Protocol::Node,
            })
        );
        assert!(matches!(
            node.execute(&NewReferenceMethod::new("/a/b", Resource::classpath("/c"))),
            Err(ProtocolMethodError::Unsupported { .. })
        ));
    }

    #[test]
    fn node_template_path_requires_repository_path() {
        let node = Reference::with_resource(
            Encoding::Plain,
            Protocol::Node,
            Resource::classpath("/x"),
        );
        assert!(matches!(
            node.template_path(),
            Err(ProtocolMethodError::UnexpectedResource { .. })
        ));
    }
}
