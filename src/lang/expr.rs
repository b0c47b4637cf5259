//! Expression span selection and structural parsing.
//!
//! ```text
//! expression := ('+'|'-')* term (('+'|'-') term)*
//! term       := factor (('*'|'/') factor)*
//! factor     := NUMBER | VARIABLE | FUNCTION '(' expression ')' | '(' expression ')'
//! ```
//!
//! The parser emits the tokens it accepted in their original order.
//! Nothing is folded or evaluated here.

use super::{token::*, Error};

type Result<T> = std::result::Result<T, Error>;

/// Counts the leading tokens from `start` that could belong to an
/// expression. Relational operators and anything that is not a number,
/// parenthesis, arithmetic operator, variable, or function call end the
/// span.
pub fn select(tokens: &[Token], start: usize) -> usize {
    let rest = match tokens.get(start..) {
        Some(rest) => rest,
        None => return 0,
    };
    rest.iter()
        .enumerate()
        .take_while(|(index, token)| match token {
            Token::Number(_) | Token::LParen | Token::RParen => true,
            Token::Operator(op) => op.is_arithmetic(),
            Token::Word(w) => {
                variable_name(w).is_some()
                    || (Function::from_name(w).is_some()
                        && rest.get(index + 1) == Some(&Token::LParen))
            }
            _ => false,
        })
        .count()
}

/// Validates `span` as one complete expression.
pub fn parse(span: &[Token]) -> Result<Token> {
    if span.is_empty() {
        return Err(error!(EmptyExpression));
    }
    let mut pos = 0;
    let mut out = vec![];
    expression(span, &mut pos, &mut out)?;
    if let Some(extra) = span.get(pos) {
        return Err(error!(UnexpectedToken; "unexpected token at the end: {}", extra));
    }
    Ok(Token::Expression(out))
}

fn expression(span: &[Token], pos: &mut usize, out: &mut Vec<Token>) -> Result<()> {
    while let Some(Token::Operator(op)) = span.get(*pos) {
        if !op.is_additive() {
            break;
        }
        out.push(Token::Operator(*op));
        *pos += 1;
    }
    term(span, pos, out)?;
    while let Some(Token::Operator(op)) = span.get(*pos) {
        if !op.is_additive() {
            break;
        }
        out.push(Token::Operator(*op));
        *pos += 1;
        term(span, pos, out)?;
    }
    Ok(())
}

fn term(span: &[Token], pos: &mut usize, out: &mut Vec<Token>) -> Result<()> {
    factor(span, pos, out)?;
    while let Some(Token::Operator(op)) = span.get(*pos) {
        if !op.is_multiplicative() {
            break;
        }
        out.push(Token::Operator(*op));
        *pos += 1;
        factor(span, pos, out)?;
    }
    Ok(())
}

fn factor(span: &[Token], pos: &mut usize, out: &mut Vec<Token>) -> Result<()> {
    let token = match span.get(*pos) {
        Some(token) => token,
        None => return Err(error!(UnexpectedToken; "expression ends unexpectedly")),
    };
    *pos += 1;
    match token {
        Token::Number(_) => out.push(token.clone()),
        Token::LParen => {
            out.push(Token::LParen);
            expression(span, pos, out)?;
            expect_rparen(span, pos)?;
            out.push(Token::RParen);
        }
        Token::Word(w) => {
            if variable_name(w).is_some() {
                out.push(token.clone());
            } else if let Some(func) = Function::from_name(w) {
                out.push(call(span, pos, func)?);
            } else {
                return Err(error!(InvalidVariable; "{}", w));
            }
        }
        _ => return Err(error!(UnexpectedToken; "{}", token)),
    }
    Ok(())
}

fn call(span: &[Token], pos: &mut usize, func: Function) -> Result<Token> {
    if span.get(*pos) != Some(&Token::LParen) {
        return Err(error!(UnexpectedToken; "expected ( after {}", func));
    }
    *pos += 1;
    let mut args = vec![];
    for index in 0..func.arity() {
        if index > 0 {
            if span.get(*pos) != Some(&Token::Comma) {
                return Err(error!(UnexpectedToken; "expected , in {} arguments", func));
            }
            *pos += 1;
        }
        let mut arg = vec![];
        expression(span, pos, &mut arg)?;
        args.push(Token::Expression(arg));
    }
    expect_rparen(span, pos)?;
    Ok(Token::Function(func, args))
}

fn expect_rparen(span: &[Token], pos: &mut usize) -> Result<()> {
    match span.get(*pos) {
        Some(Token::RParen) => {
            *pos += 1;
            Ok(())
        }
        Some(token) => Err(error!(UnexpectedToken; "expected ) but found {}", token)),
        None => Err(error!(UnexpectedToken; "unmatched (")),
    }
}
