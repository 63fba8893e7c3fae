use crate::error::{EncodeError, ParseError};
use crate::parameter::Parameter;

use super::Encoding;

pub const DELIMITER: char = ':';
/// Closes the parameter list of a nested reference.
pub const SENTINEL: &str = "*";

/// Left-to-right view over the `:`-separated tokens of an encoded reference.
#[derive(Debug)]
pub struct TokenCursor<'a> {
    tokens: Vec<&'a str>,
    position: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(input: &'a str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self {
            tokens: input.split(DELIMITER).collect(),
            position: 0,
        })
    }

    pub const fn position(&self) -> usize {
        self.position
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.position).copied()
    }

    pub fn next(&mut self, what: &'static str) -> Result<&'a str, ParseError> {
        let token = self.peek().ok_or(ParseError::Truncated {
            what,
            position: self.position,
        })?;
        self.position += 1;
        Ok(token)
    }
}

/// Reads parameters up to the end of input, or up to the closing sentinel when
/// the list belongs to a nested reference opened at `nested_at`.
pub fn parse_parameters<'a, F>(
    cursor: &mut TokenCursor<'a>,
    nested_at: Option<usize>,
    mut parameter: F,
) -> Result<Vec<Parameter>, ParseError>
where
    F: FnMut(&mut TokenCursor<'a>) -> Result<Parameter, ParseError>,
{
    let mut parameters = Vec::new();
    loop {
        match (cursor.peek(), nested_at) {
            (None, None) => return Ok(parameters),
            (None, Some(position)) => return Err(ParseError::MissingSentinel { position }),
            (Some(SENTINEL), Some(_)) => {
                cursor.position += 1;
                return Ok(parameters);
            }
            (Some(SENTINEL), None) => {
                return Err(ParseError::UnexpectedSentinel {
                    position: cursor.position,
                })
            }
            (Some(_), _) => parameters.push(parameter(cursor)?),
        }
    }
}

/// Values travel as single tokens, so they cannot contain the delimiter.
pub fn check_value<'v>(
    encoding: Encoding,
    what: &'static str,
    value: &'v str,
) -> Result<&'v str, EncodeError> {
    if value.contains(DELIMITER) {
        return Err(EncodeError::Unrepresentable {
            encoding,
            what,
            value: value.to_string(),
            reason: "value contains the ':' delimiter",
        });
    }
    Ok(value)
}
