use super::{token::*, Error};

type Result<T> = std::result::Result<T, Error>;

pub fn lex(s: &str) -> Result<Vec<Token>> {
    BasicLexer {
        chars: s.chars().peekable(),
    }
    .collect()
}

/// Splits `[label] REM text` after the keyword so the comment text is
/// never tokenized.
pub fn split_comment(s: &str) -> (&str, Option<&str>) {
    let body = s
        .trim_start_matches(is_basic_whitespace)
        .trim_start_matches(is_basic_digit)
        .trim_start_matches(is_basic_whitespace);
    match body.strip_prefix("REM") {
        Some(rest) if !rest.starts_with(|c: char| !is_basic_delimiter(c)) => {
            (&s[..s.len() - rest.len()], Some(rest))
        }
        _ => (s, None),
    }
}

fn is_basic_whitespace(c: char) -> bool {
    c != '\n' && c.is_whitespace()
}

fn is_basic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_basic_operator(c: char) -> bool {
    "()+-*/<>=".contains(c)
}

fn is_basic_delimiter(c: char) -> bool {
    c == '\n' || c == ',' || c == '"' || is_basic_whitespace(c) || is_basic_operator(c)
}

trait Tokenizers<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>>;

    fn whitespace(&mut self) {
        while let Some(pk) = self.chars().peek() {
            if !is_basic_whitespace(*pk) {
                break;
            }
            self.chars().next();
        }
    }

    fn number(&mut self) -> Token {
        let mut s = String::new();
        while let Some(pk) = self.chars().peek() {
            if !is_basic_digit(*pk) {
                break;
            }
            s.push(*pk);
            self.chars().next();
        }
        Token::Number(s)
    }

    fn string(&mut self) -> Result<Token> {
        let mut s = String::new();
        self.chars().next();
        loop {
            match self.chars().peek() {
                Some('"') => {
                    self.chars().next();
                    return Ok(Token::QuotedString(s));
                }
                Some('\n') | None => return Err(error!(UnmatchedQuotation; "\"{}", s)),
                Some(ch) => {
                    s.push(*ch);
                    self.chars().next();
                }
            }
        }
    }

    fn word(&mut self) -> Token {
        let mut s = String::new();
        while let Some(pk) = self.chars().peek() {
            if is_basic_delimiter(*pk) {
                break;
            }
            s.push(*pk);
            self.chars().next();
        }
        Token::Word(s)
    }

    fn operator(&mut self) -> Option<Token> {
        let ch = *self.chars().peek()?;
        let single = match ch {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '+' => Token::Operator(Operator::Plus),
            '-' => Token::Operator(Operator::Minus),
            '*' => Token::Operator(Operator::Multiply),
            '/' => Token::Operator(Operator::Divide),
            '=' => Token::Operator(Operator::Equal),
            '<' => Token::Operator(Operator::Less),
            '>' => Token::Operator(Operator::Greater),
            _ => return None,
        };
        self.chars().next();
        let pair = match (ch, self.chars().peek().copied()) {
            ('<', Some('>')) | ('>', Some('<')) => Operator::NotEqual,
            ('<', Some('=')) => Operator::LessEqual,
            ('>', Some('=')) => Operator::GreaterEqual,
            _ => return Some(single),
        };
        self.chars().next();
        Some(Token::Operator(pair))
    }
}

struct BasicLexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Tokenizers<'a> for BasicLexer<'a> {
    fn chars(&mut self) -> &mut std::iter::Peekable<std::str::Chars<'a>> {
        &mut self.chars
    }
}

impl<'a> Iterator for BasicLexer<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.whitespace();
        let pk = *self.chars.peek()?;
        if pk == '\n' {
            self.chars.next();
            return Some(Ok(Token::NewLine));
        }
        if pk == ',' {
            self.chars.next();
            return Some(Ok(Token::Comma));
        }
        if pk == '"' {
            return Some(self.string());
        }
        if let Some(token) = self.operator() {
            return Some(Ok(token));
        }
        if is_basic_digit(pk) {
            return Some(Ok(self.number()));
        }
        Some(Ok(self.word()))
    }
}
