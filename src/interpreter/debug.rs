use std::fmt;

use thiserror::Error;

use super::lexer::SourcePosition;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("{0}\nLexerError: {1}")]
    LexerError(ErrorLocation, LexerError),

    #[error("{0}\nParserError: {1}")]
    ParserError(ErrorLocation, ParserError),

    #[error("{0}\nRuntimeError: {1}")]
    RuntimeError(ErrorLocation, RuntimeError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexerError {
    #[error("unrecognized character: '{0}'")]
    UnrecognizedCharacter(String),

    #[error("lexeme \"{lexeme}\" is longer than {max} characters and was truncated.")]
    LexemeTruncated { lexeme: String, max: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserError {
    #[error("expected {expected} {context}.")]
    MissingToken { expected: String, context: String },

    #[error("expected a variable name after the type.")]
    MissingVariableName,

    #[error("invalid initial value: {0}. expected a string or number literal.")]
    InvalidInitialValue(String),

    #[error("invalid print argument: {0}. {1}")]
    InvalidPrintArgument(String, String),

    #[error("block is missing its closing '}}'.")]
    UnterminatedBlock,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("unknown variable: \"{0}\"")]
    UnknownVariable(String),

    #[error("\"{name}\" is of type {var_type}; comparisons only support int.")]
    UnsupportedComparisonType { name: String, var_type: String },

    #[error("unrecognized comparison operator: \"{0}\"")]
    UnrecognizedOperator(String),

    #[error("variable \"{0}\" is already declared.")]
    DuplicateVariable(String),

    #[error("cannot declare \"{name}\": the variable limit of {max} is reached.")]
    VariableLimitExceeded { name: String, max: usize },
}

/// Broad class of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntactic,
    Semantic,
    Resource,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::LexerError(..) => ErrorKind::Lexical,
            Error::ParserError(..) => ErrorKind::Syntactic,
            Error::RuntimeError(_, RuntimeError::VariableLimitExceeded { .. }) => {
                ErrorKind::Resource
            }
            Error::RuntimeError(..) => ErrorKind::Semantic,
        }
    }

    pub fn location(&self) -> &ErrorLocation {
        match self {
            Error::LexerError(l, _) | Error::ParserError(l, _) | Error::RuntimeError(l, _) => l,
        }
    }

    /// The message without the location prefix.
    pub fn message(&self) -> String {
        match self {
            Error::LexerError(_, e) => e.to_string(),
            Error::ParserError(_, e) => e.to_string(),
            Error::RuntimeError(_, e) => e.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FileOrOtherError {
    #[error("{0}")]
    OtherError(Error),

    #[error("{0}")]
    IOError(std::io::Error),
}

impl From<Error> for FileOrOtherError {
    fn from(value: Error) -> Self {
        Self::OtherError(value)
    }
}

impl From<std::io::Error> for FileOrOtherError {
    fn from(value: std::io::Error) -> Self {
        Self::IOError(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLocation {
    pub source_name: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "in {}, line {}, column {}:",
            self.source_name, self.line, self.column
        )
    }
}

#[derive(Debug, Clone)]
pub struct DebugInfo {
    pub source_name: String,
}

impl DebugInfo {
    pub fn new(source_name: String) -> DebugInfo {
        Self { source_name }
    }

    pub fn unknown() -> DebugInfo {
        Self::new("(unknown source)".to_string())
    }

    pub fn locate(&self, position: SourcePosition) -> ErrorLocation {
        ErrorLocation {
            source_name: self.source_name.clone(),
            line: position.line,
            column: position.column,
        }
    }
}

pub fn debug_char_repr(c: char) -> String {
    c.escape_debug().to_string().replace("\\\"", "\"")
}
