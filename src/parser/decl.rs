use crate::{
    ast::{
        declarations::{ClassDecl, Decl, FieldDecl, FunDecl, MethodDecl, ParDecl, VarDecl},
        expressions::Expr,
        types::Type,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let handler = parser
        .get_decl_lookup()
        .get(&parser.current_token_kind())
        .copied();

    match handler {
        Some(handler) => handler(parser),
        None => Err(parser.unexpected("expected a var or fun declaration")),
    }
}

/// `var ID : type = exp ;`
pub fn parse_var_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let line = parser.advance().line;

    let error = parser.unexpected("expected identifier during variable declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    parser.expect(TokenKind::Colon)?;
    let ty = parse_type(parser)?;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Decl::Var(VarDecl {
        name,
        ty,
        value,
        line,
    }))
}

/// `fun ID : type ( params ) (let dec+ in)? exp ;`
pub fn parse_fun_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let function = parse_function(parser)?;

    Ok(Decl::Fun(FunDecl {
        name: function.name,
        return_type: function.return_type,
        parameters: function.parameters,
        declarations: function.declarations,
        body: function.body,
        line: function.line,
    }))
}

/// `class ID ( fields ) { methdec* }`
pub fn parse_class_decl(parser: &mut Parser) -> Result<ClassDecl, Error> {
    let line = parser.expect(TokenKind::Class)?.line;

    let error = parser.unexpected("expected class name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let fields = parse_typed_list(parser)?
        .into_iter()
        .map(|(name, ty, line)| FieldDecl { name, ty, line })
        .collect();

    parser.expect(TokenKind::OpenCurly)?;

    let mut methods = vec![];
    while parser.current_token_kind() == TokenKind::Fun {
        let method = parse_function(parser)?;
        methods.push(MethodDecl {
            name: method.name,
            return_type: method.return_type,
            parameters: method.parameters,
            declarations: method.declarations,
            body: method.body,
            line: method.line,
            offset: None,
        });
    }

    let error = parser.unexpected("expected a method declaration or `}`");
    parser.expect_error(TokenKind::CloseCurly, Some(error))?;

    Ok(ClassDecl {
        name,
        fields,
        methods,
        line,
    })
}

/// Shared shape of functions and methods.
struct FunctionParts {
    name: String,
    return_type: Type,
    parameters: Vec<ParDecl>,
    declarations: Vec<Decl>,
    body: Expr,
    line: u32,
}

fn parse_function(parser: &mut Parser) -> Result<FunctionParts, Error> {
    let line = parser.expect(TokenKind::Fun)?.line;

    let error = parser.unexpected("expected identifier during function declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    parser.expect(TokenKind::Colon)?;
    let return_type = parse_type(parser)?;

    let parameters = parse_typed_list(parser)?
        .into_iter()
        .map(|(name, ty, line)| ParDecl { name, ty, line })
        .collect();

    let mut declarations = vec![];
    if parser.current_token_kind() == TokenKind::Let {
        parser.advance();
        loop {
            declarations.push(parse_decl(parser)?);
            if parser.current_token_kind() == TokenKind::In {
                break;
            }
        }
        parser.expect(TokenKind::In)?;
    }

    let body = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(FunctionParts {
        name,
        return_type,
        parameters,
        declarations,
        body,
        line,
    })
}

/// `( ID : type (, ID : type)* )`, used for parameters and fields.
fn parse_typed_list(parser: &mut Parser) -> Result<Vec<(String, Type, u32)>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut entries = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let token = parser.expect(TokenKind::Identifier)?;
            parser.expect(TokenKind::Colon)?;
            let ty = parse_type(parser)?;
            entries.push((token.value, ty, token.line));

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(entries)
}
