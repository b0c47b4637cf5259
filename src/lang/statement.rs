use super::{token::Token, Label};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StatementKind {
    Print,
    Let,
    If,
    Goto,
    Gosub,
    Input,
    Return,
    Clear,
    List,
    Run,
    End,
    Rem,
    Newline,
}

impl StatementKind {
    /// Keyword lookup. Keywords are case sensitive.
    pub fn from_keyword(word: &str) -> Option<StatementKind> {
        use StatementKind::*;
        match word {
            "PRINT" => Some(Print),
            "LET" => Some(Let),
            "IF" => Some(If),
            "GOTO" => Some(Goto),
            "GOSUB" => Some(Gosub),
            "INPUT" => Some(Input),
            "RETURN" => Some(Return),
            "CLEAR" => Some(Clear),
            "LIST" => Some(List),
            "RUN" => Some(Run),
            "END" => Some(End),
            "REM" => Some(Rem),
            _ => None,
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use StatementKind::*;
        match self {
            Print => write!(f, "PRINT"),
            Let => write!(f, "LET"),
            If => write!(f, "IF"),
            Goto => write!(f, "GOTO"),
            Gosub => write!(f, "GOSUB"),
            Input => write!(f, "INPUT"),
            Return => write!(f, "RETURN"),
            Clear => write!(f, "CLEAR"),
            List => write!(f, "LIST"),
            Run => write!(f, "RUN"),
            End => write!(f, "END"),
            Rem => write!(f, "REM"),
            Newline => Ok(()),
        }
    }
}

/// One parsed line.
///
/// Argument layout by kind:
/// - `Let`: `[Word(var), Expression]`
/// - `Print`: `QuotedString` or `Expression` per item
/// - `Input`: `Word(var)` per variable
/// - `If`: `[Expression, Operator, Expression, Statement]`
/// - `Goto`, `Gosub`: `[Expression]`
/// - `Rem`: `[Unknown(comment)]`
/// - everything else: empty
#[derive(Debug, PartialEq, Clone)]
pub struct Statement {
    pub kind: StatementKind,
    pub args: Vec<Token>,
    pub label: Option<Label>,
}

impl Statement {
    pub fn new(kind: StatementKind, args: Vec<Token>) -> Statement {
        Statement {
            kind,
            args,
            label: None,
        }
    }

    pub fn with_label(self, label: Option<Label>) -> Statement {
        Statement { label, ..self }
    }

    pub fn is_comment(&self) -> bool {
        self.kind == StatementKind::Rem
    }

    pub fn is_subroutine_call(&self) -> bool {
        self.kind == StatementKind::Gosub
    }
}

/// Renders the statement body without its label.
impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use StatementKind::*;
        write!(f, "{}", self.kind)?;
        match self.kind {
            Let => {
                if let [var, expr] = self.args.as_slice() {
                    write!(f, " {} = {}", var, expr)?;
                }
            }
            If => {
                if let [lhs, op, rhs, then] = self.args.as_slice() {
                    write!(f, " {} {} {} THEN {}", lhs, op, rhs, then)?;
                }
            }
            Print | Input => {
                for (index, arg) in self.args.iter().enumerate() {
                    let sep = if index == 0 { " " } else { ", " };
                    write!(f, "{}{}", sep, arg)?;
                }
            }
            Goto | Gosub | Rem => {
                for arg in &self.args {
                    write!(f, " {}", arg)?;
                }
            }
            Return | Clear | List | Run | End | Newline => {}
        }
        Ok(())
    }
}
