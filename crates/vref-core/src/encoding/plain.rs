use tracing::trace;

use crate::error::{EncodeError, ParseError};
use crate::node_ref::NodeRef;
use crate::parameter::Parameter;
use crate::protocol::Protocol;
use crate::reference::Reference;
use crate::resource::Resource;

use super::tokens::{check_value, parse_parameters, TokenCursor, DELIMITER, SENTINEL};
use super::{Encoding, Parser, Stringifier};

const CLASSPATH: &str = "classpath";
const REPOSITORY: &str = "repository";
const REPOSITORY_PATH: &str = "path";
const REPOSITORY_NODE: &str = "node";
const STRING_PARAMETER: &str = "s";
const RESOURCE_PARAMETER: &str = "r";
const REFERENCE_PARAMETER: &str = "ref";

/// Human-readable encoding, e.g.
/// `virtual:repository:node:workspace:SpacesStore:0029-222-333-444`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainEncoding;

impl PlainEncoding {
    fn value<'v>(what: &'static str, value: &'v str) -> Result<&'v str, EncodeError> {
        check_value(Encoding::Plain, what, value)
    }

    fn reference(
        &self,
        cursor: &mut TokenCursor<'_>,
        nested_at: Option<usize>,
    ) -> Result<Reference, ParseError> {
        let name = cursor.next("protocol")?;
        let protocol =
            Protocol::from_name(name).ok_or_else(|| ParseError::UnknownProtocol(name.to_string()))?;

        let resource = match cursor.peek() {
            Some(CLASSPATH | REPOSITORY) => Some(self.resource(cursor)?),
            _ => None,
        };
        let parameters = parse_parameters(cursor, nested_at, |c| self.parameter(c))?;

        Ok(Reference::new(
            Encoding::Plain,
            protocol,
            resource,
            parameters,
        ))
    }

    fn resource(&self, cursor: &mut TokenCursor<'_>) -> Result<Resource, ParseError> {
        match cursor.next("resource")? {
            CLASSPATH => Ok(Resource::classpath(cursor.next("classpath")?)),
            REPOSITORY => match cursor.next("repository resource")? {
                REPOSITORY_PATH => Ok(Resource::repository_path(
                    cursor.next("repository path")?,
                )),
                REPOSITORY_NODE => {
                    let protocol = cursor.next("store protocol")?;
                    let identifier = cursor.next("store id")?;
                    let id = cursor.next("node id")?;
                    Ok(Resource::RepositoryNode(NodeRef::from_parts(
                        protocol, identifier, id,
                    )))
                }
                other => Err(ParseError::UnknownResourceTag(format!(
                    "{REPOSITORY}{DELIMITER}{other}"
                ))),
            },
            other => Err(ParseError::UnknownResourceTag(other.to_string())),
        }
    }

    fn parameter(&self, cursor: &mut TokenCursor<'_>) -> Result<Parameter, ParseError> {
        let position = cursor.position();
        match cursor.next("parameter")? {
            STRING_PARAMETER => Ok(Parameter::string(cursor.next("string parameter")?)),
            RESOURCE_PARAMETER => Ok(Parameter::Resource(self.resource(cursor)?)),
            REFERENCE_PARAMETER => Ok(Parameter::reference(
                self.reference(cursor, Some(position))?,
            )),
            other => Err(ParseError::UnknownParameterTag(other.to_string())),
        }
    }
}

impl Stringifier for PlainEncoding {
    fn encoding(&self) -> Encoding {
        Encoding::Plain
    }

    fn stringify(&self, reference: &Reference) -> Result<String, EncodeError> {
        let mut parts = vec![reference.protocol().name().to_string()];
        if let Some(resource) = reference.resource() {
            parts.push(resource.stringify(self)?);
        }
        for parameter in reference.parameters() {
            parts.push(parameter.stringify(self)?);
        }
        Ok(parts.join(&DELIMITER.to_string()))
    }

    fn stringify_classpath(&self, path: &str) -> Result<String, EncodeError> {
        Ok(format!(
            "{CLASSPATH}{DELIMITER}{}",
            Self::value("classpath", path)?
        ))
    }

    fn stringify_repository_node(&self, node: &NodeRef) -> Result<String, EncodeError> {
        Ok([
            REPOSITORY,
            REPOSITORY_NODE,
            Self::value("store protocol", &node.store.protocol)?,
            Self::value("store id", &node.store.identifier)?,
            Self::value("node id", &node.id)?,
        ]
        .join(&DELIMITER.to_string()))
    }

    fn stringify_repository_path(&self, path: &str) -> Result<String, EncodeError> {
        Ok(format!(
            "{REPOSITORY}{DELIMITER}{REPOSITORY_PATH}{DELIMITER}{}",
            Self::value("repository path", path)?
        ))
    }

    fn stringify_string_parameter(&self, value: &str) -> Result<String, EncodeError> {
        Ok(format!(
            "{STRING_PARAMETER}{DELIMITER}{}",
            Self::value("string parameter", value)?
        ))
    }

    fn stringify_resource_parameter(&self, resource: &Resource) -> Result<String, EncodeError> {
        Ok(format!(
            "{RESOURCE_PARAMETER}{DELIMITER}{}",
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

impl Parser for PlainEncoding {
    fn encoding(&self) -> Encoding {
        Encoding::Plain
    }

    fn parse(&self, encoded: &str) -> Result<Reference, ParseError> {
        trace!(encoded, "parsing plain reference");
        let mut cursor = TokenCursor::new(encoded)?;
        self.reference(&mut cursor, None)
    }
}
