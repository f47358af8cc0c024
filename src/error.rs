use std::path::PathBuf;

use thiserror::Error;

/// Boxed error produced by a value conversion.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to read dotenv file '{}': {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid UTF-8 input: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("a dotenv path must not be empty")]
    EmptyPath,

    #[error("environment key must not be empty")]
    EmptyKey,

    #[error("`{key}` is not valid unicode")]
    NotUnicode { key: String },

    #[error("`{key}` cannot be found in environment")]
    MissingKey { key: String },

    #[error("failed to convert `{key}`: {source}")]
    Conversion { key: String, source: BoxError },
}

impl Error {
    /// Returns `true` when the error comes from a lookup of an absent key.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub line: u32,
    pub column: u32,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: u32, column: u32, kind: ParseErrorKind) -> Self {
        Self { line, column, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("invalid syntax")]
    InvalidSyntax,
    #[error("missing key")]
    MissingKey,
    #[error("invalid key")]
    InvalidKey,
    #[error("invalid value")]
    InvalidValue,
}
