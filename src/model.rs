use std::path::PathBuf;

use crate::error::Error;

/// A parsed `KEY=VALUE` entry from a `.env` file or input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub source: Option<PathBuf>,
    pub line: u32,
}

/// Summary of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped_existing: usize,
}

/// Result of a load that did not propagate its failure.
///
/// A quiet loader reports errors here instead of returning `Err`, so callers
/// can ignore a missing `.env` file and still inspect what went wrong.
#[derive(Debug)]
#[must_use]
pub enum LoadOutcome {
    Loaded(LoadReport),
    Failed(Error),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn report(&self) -> Option<&LoadReport> {
        match self {
            Self::Loaded(report) => Some(report),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Loaded(_) => None,
            Self::Failed(err) => Some(err),
        }
    }

    /// Convert into a `Result`, surfacing a captured failure as `Err`.
    pub fn into_result(self) -> Result<LoadReport, Error> {
        match self {
            Self::Loaded(report) => Ok(report),
            Self::Failed(err) => Err(err),
        }
    }
}

/// Key validation behavior for parser and loader entry parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyParsingMode {
    /// Conservative key characters (`[A-Za-z0-9_.-]+`).
    Strict,
    /// Any characters except whitespace, `=` and NUL.
    #[default]
    Permissive,
}
