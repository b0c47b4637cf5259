use super::super::{lex, ErrorCode, ErrorKind};
use super::*;

#[test]
fn test_let_line() {
    let v = lex("10 LET X = 5\n").unwrap();
    assert_eq!(
        v,
        [
            num("10"),
            word("LET"),
            word("X"),
            op(Operator::Equal),
            num("5"),
            Token::NewLine
        ]
    );
}

#[test]
fn test_two_char_operators() {
    let v = lex("1<>2><3<=4>=5<6>7=8").unwrap();
    let ops: Vec<&Token> = v.iter().filter(|t| matches!(t, Token::Operator(_))).collect();
    assert_eq!(
        ops,
        [
            &op(Operator::NotEqual),
            &op(Operator::NotEqual),
            &op(Operator::LessEqual),
            &op(Operator::GreaterEqual),
            &op(Operator::Less),
            &op(Operator::Greater),
            &op(Operator::Equal),
        ]
    );
}

#[test]
fn test_quoted_string() {
    let v = lex("PRINT \"HELLO, WORLD\",X").unwrap();
    assert_eq!(
        v,
        [
            word("PRINT"),
            Token::QuotedString("HELLO, WORLD".to_string()),
            Token::Comma,
            word("X")
        ]
    );
}

#[test]
fn test_unmatched_quotation() {
    let e = lex("PRINT \"HELLO\n").unwrap_err();
    assert_eq!(e.code(), ErrorCode::UnmatchedQuotation);
    assert_eq!(e.kind(), ErrorKind::Tokenization);
    assert!(e.to_string().contains("\"HELLO"));
    assert!(lex("PRINT \"OPEN").is_err());
}

#[test]
fn test_numbers_do_not_skip_spaces() {
    let v = lex("1 2").unwrap();
    assert_eq!(v, [num("1"), num("2")]);
}

#[test]
fn test_words_absorb_other_characters() {
    let v = lex("A1$ ;x(").unwrap();
    assert_eq!(v, [word("A1$"), word(";x"), Token::LParen]);
}

#[test]
fn test_parens_and_arithmetic() {
    let v = lex("(A+B)*-C/2").unwrap();
    assert_eq!(
        v,
        [
            Token::LParen,
            word("A"),
            op(Operator::Plus),
            word("B"),
            Token::RParen,
            op(Operator::Multiply),
            op(Operator::Minus),
            word("C"),
            op(Operator::Divide),
            num("2"),
        ]
    );
}
