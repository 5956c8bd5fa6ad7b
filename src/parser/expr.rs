use crate::{
    ast::expressions::{BinaryOperator, Expr, ExprKind, IfExpr},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_line(),
            ))
        }
    };

    let mut left = nud(parser)?;

    // While the next operator binds tighter than the current context, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => break,
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    match token.kind {
        TokenKind::Number => parse_number(&token.value, token.line),
        TokenKind::True => Ok(Expr::bool(true, token.line)),
        TokenKind::False => Ok(Expr::bool(false, token.line)),
        TokenKind::Null => Ok(Expr::new(ExprKind::Null, token.line)),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken { token: token.value },
            token.line,
        )),
    }
}

fn parse_number(literal: &str, line: u32) -> Result<Expr, Error> {
    literal
        .parse::<i32>()
        .map(|value| Expr::int(value, line))
        .map_err(|_| {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: String::from(literal),
                },
                line,
            )
        })
}

/// `-NUM`. Only literals may be negated.
pub fn parse_negative_number_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    if parser.current_token_kind() != TokenKind::Number {
        return Err(parser.unexpected("only number literals can be negated"));
    }

    let token = parser.advance().clone();
    parse_number(&format!("-{}", token.value), token.line)
}

/// `ID` or `ID(args)`.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    if parser.current_token_kind() == TokenKind::OpenParen {
        let arguments = parse_arguments(parser)?;
        return Ok(Expr::call(&token.value, arguments, token.line));
    }

    Ok(Expr::id(&token.value, token.line))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Plus => BinaryOperator::Plus,
        TokenKind::Dash => BinaryOperator::Minus,
        TokenKind::Star => BinaryOperator::Times,
        TokenKind::Slash => BinaryOperator::Div,
        TokenKind::Equals => BinaryOperator::Equal,
        TokenKind::LessEquals => BinaryOperator::LessEqual,
        TokenKind::GreaterEquals => BinaryOperator::GreaterEqual,
        TokenKind::And => BinaryOperator::And,
        TokenKind::Or => BinaryOperator::Or,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: operator_token.value,
                },
                operator_token.line,
            ))
        }
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::binary(operator, left, right, operator_token.line))
}

pub fn parse_not_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let line = parser.advance().line;
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::new(ExprKind::Not(Box::new(operand)), line))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// `new ID(args)`
pub fn parse_new_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();

    let error = parser.unexpected("expected class name after new");
    let class_name = parser.expect_error(TokenKind::Identifier, Some(error))?;
    let arguments = parse_arguments(parser)?;

    Ok(Expr::new_object(&class_name.value, arguments, class_name.line))
}

/// `if exp then { exp } else { exp }`
pub fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let line = parser.advance().line;

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Then)?;
    let then_branch = parse_braced_expr(parser)?;
    parser.expect(TokenKind::Else)?;
    let else_branch = parse_braced_expr(parser)?;

    Ok(Expr::new(
        ExprKind::If(IfExpr {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }),
        line,
    ))
}

fn parse_braced_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenCurly)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseCurly)?;

    Ok(expr)
}

/// `print(exp)`
pub fn parse_print_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let line = parser.advance().line;

    parser.expect(TokenKind::OpenParen)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::new(ExprKind::Print(Box::new(value)), line))
}

/// `receiver.ID(args)`
pub fn parse_method_call_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();

    let error = parser.unexpected("expected method name after `.`");
    let method = parser.expect_error(TokenKind::Identifier, Some(error))?;
    if parser.current_token_kind() != TokenKind::OpenParen {
        return Err(parser.unexpected("fields are not accessible with `.`, expected a method call"));
    }
    let arguments = parse_arguments(parser)?;

    Ok(Expr::method_call(left, &method.value, arguments, method.line))
}

/// `( exp (, exp)* )` with the parentheses.
pub fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            arguments.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(arguments)
}
