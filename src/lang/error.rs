use super::Label;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    label: Option<Label>,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $label:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_label($label)
    };
    ($err:ident; $($msg:tt)+) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message(format!($($msg)+))
    };
    ($err:ident, $label:expr; $($msg:tt)+) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_label($label)
            .message(format!($($msg)+))
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            label: None,
            message: String::new(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    pub fn label(&self) -> Option<Label> {
        self.label
    }

    pub fn detail(&self) -> &str {
        &self.message
    }

    pub fn is_direct(&self) -> bool {
        self.label.is_none()
    }

    /// Attaches a line label unless one is already present.
    /// Inner layers know the line best, so the first label wins.
    pub fn in_label(self, label: impl Into<Option<Label>>) -> Error {
        match self.label {
            Some(_) => self,
            None => Error {
                label: label.into(),
                ..self
            },
        }
    }

    /// Appends the source text the error was found in.
    pub fn at(self, context: &str) -> Error {
        let message = if self.message.is_empty() {
            format!("at \"{}\"", context)
        } else {
            format!("{} at \"{}\"", self.message, context)
        };
        Error { message, ..self }
    }

    pub fn message(self, message: impl Into<String>) -> Error {
        debug_assert!(self.message.is_empty());
        Error {
            message: message.into(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Tokenization,
    Parsing,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UnmatchedQuotation,
    EmptyExpression,
    UnexpectedToken,
    InvalidVariable,
    InvalidLabel,
    UninitializedVariable,
    DivisionByZero,
    ReturnWithoutGosub,
    UndefinedLabel,
    MissingEnd,
    MalformedInput,
    IllegalFunctionCall,
    IllegalDirect,
    OutOfMemory,
    Break,
    InternalError,
}

impl ErrorCode {
    pub fn kind(self) -> ErrorKind {
        use ErrorCode::*;
        match self {
            UnmatchedQuotation => ErrorKind::Tokenization,
            EmptyExpression | UnexpectedToken | InvalidVariable | InvalidLabel => {
                ErrorKind::Parsing
            }
            UninitializedVariable | DivisionByZero | ReturnWithoutGosub | UndefinedLabel
            | MissingEnd | MalformedInput | IllegalFunctionCall | IllegalDirect | OutOfMemory
            | Break | InternalError => ErrorKind::Runtime,
        }
    }

    fn description(self) -> &'static str {
        use ErrorCode::*;
        match self {
            UnmatchedQuotation => "unmatched quotation",
            EmptyExpression => "empty expression",
            UnexpectedToken => "unexpected or empty token",
            InvalidVariable => "invalid variable name",
            InvalidLabel => "invalid label",
            UninitializedVariable => "uninitialized variable",
            DivisionByZero => "division by zero",
            ReturnWithoutGosub => "tried to return without invoking a subroutine",
            UndefinedLabel => "label does not exist",
            MissingEnd => "missing END or RETURN",
            MalformedInput => "malformed input",
            IllegalFunctionCall => "illegal function call",
            IllegalDirect => "illegal direct",
            OutOfMemory => "out of memory",
            Break => "program terminated",
            InternalError => "internal error",
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if let Some(label) = self.label {
            write!(f, "Line {}: ", label)?;
        }
        match self.kind() {
            ErrorKind::Tokenization | ErrorKind::Parsing => write!(f, "Syntax error: ")?,
            ErrorKind::Runtime => write!(f, "Runtime error: ")?,
        }
        write!(f, "{}", self.code.description())?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}
