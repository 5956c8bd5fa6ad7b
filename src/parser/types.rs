//! Type parsing implementation.
//!
//! Type annotations are a single token: `int`, `bool`, or a class name.
//! They go through their own NUD table so that adding a new annotation form
//! only means registering a handler.

use std::collections::HashMap;

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Int, parse_primitive_type);
    parser.type_nud(TokenKind::Bool, parse_primitive_type);
    parser.type_nud(TokenKind::Identifier, parse_class_type);
}

pub fn parse_primitive_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.advance().clone();
    match token.kind {
        TokenKind::Int => Ok(Type::Int),
        TokenKind::Bool => Ok(Type::Bool),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken { token: token.value },
            token.line,
        )),
    }
}

/// A class name used as a type denotes references to its instances.
pub fn parse_class_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(Type::Ref(token.value))
}

pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let token_kind = parser.current_token_kind();
    match parser.get_type_nud_lookup().get(&token_kind).copied() {
        Some(nud) => nud(parser),
        None => Err(parser.unexpected("expected a type")),
    }
}
