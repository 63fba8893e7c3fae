use crate::encoding::Stringifier;
use crate::error::EncodeError;
use crate::node_ref::NodeRef;

/// Leaf target of a reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    /// A resource bundled with the application, addressed by classpath.
    Classpath(String),
    /// A repository node addressed by its identifier.
    RepositoryNode(NodeRef),
    /// A repository node addressed by its path.
    RepositoryPath(String),
}

impl Resource {
    pub fn classpath(path: impl Into<String>) -> Self {
        Self::Classpath(path.into())
    }

    pub fn repository_node(node: NodeRef) -> Self {
        Self::RepositoryNode(node)
    }

    pub fn repository_path(path: impl Into<String>) -> Self {
        Self::RepositoryPath(path.into())
    }

    pub fn stringify(&self, stringifier: &dyn Stringifier) -> Result<String, EncodeError> {
        match self {
            Self::Classpath(path) => stringifier.stringify_classpath(path),
            Self::RepositoryNode(node) => stringifier.stringify_repository_node(node),
            Self::RepositoryPath(path) => stringifier.stringify_repository_path(path),
        }
    }

    pub fn as_node_ref(&self) -> Option<&NodeRef> {
        match self {
            Self::RepositoryNode(node) => Some(node),
            _ => None,
        }
    }
}

impl From<NodeRef> for Resource {
    fn from(node: NodeRef) -> Self {
        Self::RepositoryNode(node)
    }
}
