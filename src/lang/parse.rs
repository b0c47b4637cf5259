use super::{expr, statement::*, token::*, Error, Label, MAX_LABEL};

type Result<T> = std::result::Result<T, Error>;

/// Parses one line starting at `pos` and leaves `pos` after its newline.
///
/// A bare label, or a label followed directly by the end of the line,
/// yields a `Newline` statement carrying that label.
pub fn parse_line(tokens: &[Token], pos: &mut usize) -> Result<Statement> {
    let start = *pos;
    let mut label = None;
    let result = line(tokens, pos, &mut label);
    result.map_err(|e| e.at(&partial(tokens, start, *pos)).in_label(label))
}

/// Parses a line of comma separated expressions, as typed at an INPUT prompt.
pub fn parse_expression_list(tokens: &[Token]) -> Result<Vec<Token>> {
    let mut pos = 0;
    let mut v = vec![];
    loop {
        v.push(expression(tokens, &mut pos)?);
        match tokens.get(pos) {
            Some(Token::Comma) => pos += 1,
            None | Some(Token::NewLine) => return Ok(v),
            Some(t) => {
                return Err(error!(UnexpectedToken; "expected , but found {}", t)
                    .at(&partial(tokens, 0, pos)))
            }
        }
    }
}

fn line(tokens: &[Token], pos: &mut usize, label: &mut Option<Label>) -> Result<Statement> {
    if let Some(Token::Number(s)) = tokens.get(*pos) {
        *label = Some(parse_label(s)?);
        *pos += 1;
    }
    let statement = match tokens.get(*pos) {
        None | Some(Token::NewLine) => Statement::new(StatementKind::Newline, vec![]),
        Some(_) => statement(tokens, pos)?,
    };
    match tokens.get(*pos) {
        None => {}
        Some(Token::NewLine) => *pos += 1,
        Some(t) => return Err(error!(UnexpectedToken; "unexpected token at the end: {}", t)),
    }
    Ok(statement.with_label(*label))
}

fn parse_label(s: &str) -> Result<Label> {
    match s.parse::<u32>() {
        Ok(n) if n >= 1 && n <= MAX_LABEL as u32 => Ok(n as Label),
        _ => Err(error!(InvalidLabel; "{} is not in 1..={}", s, MAX_LABEL)),
    }
}

/// Keyword dispatched statement without label or line end.
fn statement(tokens: &[Token], pos: &mut usize) -> Result<Statement> {
    let kind = match tokens.get(*pos) {
        Some(Token::Word(w)) => match StatementKind::from_keyword(w) {
            Some(kind) => kind,
            None => return Err(error!(UnexpectedToken; "unknown statement {}", w)),
        },
        Some(t) => return Err(error!(UnexpectedToken; "expected statement but found {}", t)),
        None => return Err(error!(UnexpectedToken; "expected statement")),
    };
    *pos += 1;
    use StatementKind::*;
    let args = match kind {
        Let => r#let(tokens, pos)?,
        Print => print(tokens, pos)?,
        Input => input(tokens, pos)?,
        If => r#if(tokens, pos)?,
        Goto | Gosub => vec![expression(tokens, pos)?],
        Rem => rem(tokens, pos),
        Return | Clear | List | Run | End | Newline => vec![],
    };
    Ok(Statement::new(kind, args))
}

fn r#let(tokens: &[Token], pos: &mut usize) -> Result<Vec<Token>> {
    let var = variable(tokens, pos)?;
    match tokens.get(*pos) {
        Some(Token::Operator(Operator::Equal)) => *pos += 1,
        _ => return Err(error!(UnexpectedToken; "expected = after {}", var)),
    }
    Ok(vec![var, expression(tokens, pos)?])
}

fn print(tokens: &[Token], pos: &mut usize) -> Result<Vec<Token>> {
    let mut v = vec![];
    loop {
        match tokens.get(*pos) {
            Some(Token::QuotedString(s)) => {
                *pos += 1;
                v.push(Token::QuotedString(s.clone()));
            }
            _ => v.push(expression(tokens, pos)?),
        }
        match tokens.get(*pos) {
            Some(Token::Comma) => *pos += 1,
            _ => return Ok(v),
        }
    }
}

fn input(tokens: &[Token], pos: &mut usize) -> Result<Vec<Token>> {
    let mut v = vec![variable(tokens, pos)?];
    while let Some(Token::Comma) = tokens.get(*pos) {
        *pos += 1;
        v.push(variable(tokens, pos)?);
    }
    Ok(v)
}

fn r#if(tokens: &[Token], pos: &mut usize) -> Result<Vec<Token>> {
    let lhs = expression(tokens, pos)?;
    let op = match tokens.get(*pos) {
        Some(Token::Operator(op)) if op.is_relational() => *op,
        _ => return Err(error!(UnexpectedToken; "expected comparison operator")),
    };
    *pos += 1;
    let rhs = expression(tokens, pos)?;
    match tokens.get(*pos) {
        Some(t) if t.is_word("THEN") => *pos += 1,
        _ => return Err(error!(UnexpectedToken; "expected THEN")),
    }
    let then = statement(tokens, pos)?;
    Ok(vec![
        lhs,
        Token::Operator(op),
        rhs,
        Token::Statement(Box::new(then)),
    ])
}

fn rem(tokens: &[Token], pos: &mut usize) -> Vec<Token> {
    let mut words = vec![];
    while let Some(t) = tokens.get(*pos) {
        if t.is_end_of_line() {
            break;
        }
        words.push(t.to_string());
        *pos += 1;
    }
    if words.is_empty() {
        vec![]
    } else {
        vec![Token::Unknown(words.join(" "))]
    }
}

fn variable(tokens: &[Token], pos: &mut usize) -> Result<Token> {
    match tokens.get(*pos) {
        Some(t) if t.variable().is_some() => {
            *pos += 1;
            Ok(t.clone())
        }
        Some(Token::Word(w)) => Err(error!(InvalidVariable; "{}", w)),
        Some(t) => Err(error!(UnexpectedToken; "expected variable but found {}", t)),
        None => Err(error!(UnexpectedToken; "expected variable")),
    }
}

fn expression(tokens: &[Token], pos: &mut usize) -> Result<Token> {
    let len = expr::select(tokens, *pos);
    let expr = expr::parse(&tokens[*pos..*pos + len])?;
    *pos += len;
    Ok(expr)
}

fn partial(tokens: &[Token], start: usize, pos: usize) -> String {
    let end = (pos + 1).min(tokens.len());
    tokens
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .filter(|t| !t.is_end_of_line())
        .map(|t| t.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}
