//! Error taxonomy.
//!
//! Runtime errors are classified per the language's `ErrorType` (`TYPE_ERROR`,
//! `NAME_ERROR`, `FAULT_ERROR`); syntax errors from the lexer/parser are a
//! separate, unclassified variant since malformed source text is outside the
//! evaluator's contract.

pub type Result<T> = std::result::Result<T, self::Error>;

/// Classification of a fatal runtime error, surfaced to the host via
/// [`crate::Interpreter::get_error_type_and_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operand type incompatible with the requested operation, a non-callable
    /// value invoked, an arity mismatch on a first-class call, or a
    /// non-boolean-coercible `if`/`while` condition.
    Type,
    /// Unknown variable, unknown function (arity included in the message),
    /// ambiguous function-as-value reference, or unsupported built-in arity.
    Name,
    /// Reserved for null object-reference dereference.
    Fault,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Type => "TYPE_ERROR",
            Self::Name => "NAME_ERROR",
            Self::Fault => "FAULT_ERROR",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
pub enum Error {
    /// A classified, fatal error raised while executing a parsed program.
    Runtime {
        kind: ErrorKind,
        message: String,
        line: Option<usize>,
    },
    /// A lexer or parser failure. Not one of the three semantic `ErrorKind`s;
    /// malformed source text never reaches the evaluator.
    Syntax {
        message: String,
        line: Option<usize>,
    },
}

impl Error {
    pub fn runtime(kind: ErrorKind, message: impl Into<String>, line: Option<usize>) -> Self {
        Self::Runtime {
            kind,
            message: message.into(),
            line,
        }
    }

    pub fn syntax(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::Syntax {
            message: message.into(),
            line,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Runtime { kind, .. } => Some(*kind),
            Self::Syntax { .. } => None,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Runtime { line, .. } => *line,
            Self::Syntax { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Runtime {
                kind,
                message,
                line,
            } => match line {
                Some(line) => write!(f, "{kind} on line {line}: {message}"),
                None => write!(f, "{kind}: {message}"),
            },
            Self::Syntax { message, line } => match line {
                Some(line) => write!(f, "syntax error on line {line}: {message}"),
                None => write!(f, "syntax error: {message}"),
            },
        }
    }
}

impl std::error::Error for Error {}
