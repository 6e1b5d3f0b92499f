//! Parse type expressions into [`TypeRef`]s.
//!
//! Grammar:
//!
//! ```text
//! type    := '&' type | postfix
//! postfix := atom ( '?' | '[]' )*
//! atom    := '(' type ')' | '!' IDENT | 'void' | NAME
//! ```
//!
//! `NAME` is any builtin spelling from [`crate::names`]. Whitespace between tokens is ignored.
//!
//! ## Examples
//! ```rust
//! use typeforge_core::{TypeRef, parse_type_ref};
//!
//! assert_eq!(parse_type_ref("int32?").unwrap(), TypeRef::nullable(TypeRef::INT32));
//! assert_eq!(parse_type_ref("System.String[]").unwrap(), TypeRef::array(TypeRef::STRING));
//! ```

use std::fmt;

use crate::names;
use crate::types::TypeRef;

/// Error produced when a type expression cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTypeError {
    pub input: String,
    /// Byte offset into `input` where parsing stopped.
    pub position: usize,
    pub message: String,
}

impl fmt::Display for ParseTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid type expression `{}` at offset {}: {}",
            self.input, self.position, self.message
        )
    }
}

impl std::error::Error for ParseTypeError {}

/// Parse a type expression.
pub fn parse_type_ref(input: &str) -> Result<TypeRef, ParseTypeError> {
    let mut parser = Parser { input, pos: 0, depth: 0 };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos != input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

/// Deepest nesting of `&`, groups and suffixes a type expression may have.
pub const MAX_NESTING: usize = 64;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseTypeError {
        ParseTypeError {
            input: self.input.to_string(),
            position: self.pos,
            message: message.into(),
        }
    }

    fn nest(&mut self) -> Result<(), ParseTypeError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error("type expression nested too deeply"));
        }
        Ok(())
    }

    fn parse_type(&mut self) -> Result<TypeRef, ParseTypeError> {
        self.nest()?;
        let ty = if self.eat("&") {
            TypeRef::by_ref(self.parse_type()?)
        } else {
            self.parse_postfix()?
        };
        self.depth -= 1;
        Ok(ty)
    }

    fn parse_postfix(&mut self) -> Result<TypeRef, ParseTypeError> {
        let outer = self.depth;
        let mut ty = self.parse_atom()?;
        loop {
            if self.eat("?") {
                self.nest()?;
                ty = TypeRef::nullable(ty);
            } else if self.eat("[]") {
                self.nest()?;
                ty = TypeRef::array(ty);
            } else {
                self.depth = outer;
                return Ok(ty);
            }
        }
    }

    fn parse_atom(&mut self) -> Result<TypeRef, ParseTypeError> {
        if self.eat("(") {
            self.nest()?;
            let inner = self.parse_type()?;
            if !self.eat(")") {
                return Err(self.error("expected `)`"));
            }
            self.depth -= 1;
            return Ok(inner);
        }
        if self.eat("!") {
            let start = self.pos;
            let name = self.take_name();
            if !crate::is_identifier(name) {
                self.pos = start;
                return Err(self.error("expected generic parameter name after `!`"));
            }
            return Ok(TypeRef::generic_param(name));
        }

        self.skip_ws();
        let start = self.pos;
        let name = self.take_name();
        if name.is_empty() {
            return Err(self.error("expected a type name"));
        }
        if name == "void" {
            return Ok(TypeRef::Void);
        }
        match names::from_str(name) {
            Some(id) => Ok(TypeRef::Builtin(id)),
            None => {
                self.pos = start;
                Err(self.error(format!("unknown type name `{}`", name)))
            }
        }
    }

    fn take_name(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !(c.is_alphanumeric() || c == '_' || c == '.' || c == '-'))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        &rest[..len]
    }
}
