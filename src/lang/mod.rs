/*!
# Rust Language Module

This Rust module provides lexical analysis and parsing of the TinyBasic language.

*/

#[macro_use]
mod error;
mod lex;
mod parse;

pub mod expr;
pub mod statement;
pub mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use error::ErrorKind;
pub use lex::lex;
pub use parse::parse_expression_list;
pub use parse::parse_line;
pub use statement::{Statement, StatementKind};
pub use token::Token;

/// Line number of a stored statement.
pub type Label = u16;

pub const MAX_LABEL: Label = 32767;

/// Tokenizes and parses a single line of source.
/// The text of a `REM` is kept exactly as typed.
pub fn parse_str(s: &str) -> Result<Statement, Error> {
    let (code, comment) = lex::split_comment(s);
    let tokens = lex(code)?;
    let mut pos = 0;
    let mut statement = parse_line(&tokens, &mut pos)?;
    if let Some(t) = tokens.get(pos) {
        return Err(
            error!(UnexpectedToken, statement.label; "only one line expected, found {}", t),
        );
    }
    if let Some(comment) = comment.map(str::trim).filter(|c| !c.is_empty()) {
        statement.args = vec![Token::Unknown(comment.to_string())];
    }
    Ok(statement)
}

#[cfg(test)]
mod tests;
