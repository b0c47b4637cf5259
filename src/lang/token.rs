use super::statement::Statement;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Unknown(String),
    Comma,
    NewLine,
    Number(String),
    /// Identifier or keyword; the parser decides which.
    Word(String),
    QuotedString(String),
    LParen,
    RParen,
    Operator(Operator),
    /// A validated expression in flat operator/operand order.
    Expression(Vec<Token>),
    /// A built-in function call; arguments are `Expression` tokens.
    Function(Function, Vec<Token>),
    /// The nested statement of an `IF ... THEN`.
    Statement(Box<Statement>),
}

impl Token {
    /// The memory slot name if this is a single-letter `A`-`Z` word.
    pub fn variable(&self) -> Option<char> {
        match self {
            Token::Word(w) => variable_name(w),
            _ => None,
        }
    }

    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Word(w) if w == word)
    }

    pub fn is_end_of_line(&self) -> bool {
        matches!(self, Token::NewLine)
    }
}

pub fn variable_name(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_uppercase() => Some(ch),
        _ => None,
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Unknown(s) => write!(f, "{}", s),
            Comma => write!(f, ","),
            NewLine => writeln!(f),
            Number(s) => write!(f, "{}", s),
            Word(s) => write!(f, "{}", s),
            QuotedString(s) => write!(f, "\"{}\"", s),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            Operator(op) => write!(f, "{}", op),
            Expression(tokens) => {
                for t in tokens {
                    write!(f, "{}", t)?;
                }
                Ok(())
            }
            Function(func, args) => {
                write!(f, "{}(", func)?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Statement(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl Operator {
    pub fn is_arithmetic(self) -> bool {
        use Operator::*;
        matches!(self, Plus | Minus | Multiply | Divide)
    }

    pub fn is_relational(self) -> bool {
        !self.is_arithmetic()
    }

    pub fn is_additive(self) -> bool {
        matches!(self, Operator::Plus | Operator::Minus)
    }

    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }

    /// Applies a relational operator.
    pub fn compare(self, lhs: i16, rhs: i16) -> bool {
        use Operator::*;
        match self {
            Equal => lhs == rhs,
            NotEqual => lhs != rhs,
            Less => lhs < rhs,
            LessEqual => lhs <= rhs,
            Greater => lhs > rhs,
            GreaterEqual => lhs >= rhs,
            Plus | Minus | Multiply | Divide => false,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            Equal => write!(f, "="),
            NotEqual => write!(f, "<>"),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Function {
    Rnd,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "RND" => Some(Function::Rnd),
            _ => None,
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Function::Rnd => 1,
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Function::Rnd => write!(f, "RND"),
        }
    }
}
