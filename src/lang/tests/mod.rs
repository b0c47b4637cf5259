use super::token::*;

mod lex_test;

fn word(s: &str) -> Token {
    Token::Word(s.to_string())
}

fn num(s: &str) -> Token {
    Token::Number(s.to_string())
}

fn op(op: Operator) -> Token {
    Token::Operator(op)
}
