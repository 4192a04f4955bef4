//! Error types for the parsepal library.
//!
//! Fatal extraction errors live in [`ParsePalError`]. Filter-level anomalies are
//! not errors: they surface as [`FilterWarning`] values next to the filtered
//! records so the pipeline keeps running.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or configuring a chat history.
#[derive(Error, Debug)]
pub enum ParsePalError {
    /// The requested application has no extraction rules
    #[error("Unsupported application: {0} (only WhatsApp is supported)")]
    UnsupportedApplication(String),

    /// The source database could not be opened, queried, or inspected
    #[error("Failed to extract messages from '{}': {source}", path.display())]
    ExtractionFailed {
        /// Database file that was being read
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: ExtractionCause,
    },

    /// File system errors with the associated path
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root cause of an [`ParsePalError::ExtractionFailed`].
#[derive(Error, Debug)]
pub enum ExtractionCause {
    /// SQLite refused to open, inspect, or read the database
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// The expected message table does not exist
    #[error("table '{0}' not found")]
    MissingTable(String),
}

impl ParsePalError {
    /// Wrap an extraction cause together with the source path.
    pub fn extraction(path: impl Into<PathBuf>, source: impl Into<ExtractionCause>) -> Self {
        Self::ExtractionFailed {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-friendly name of the error kind, used as a metrics label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedApplication(_) => "unsupported_application",
            Self::ExtractionFailed { .. } => "extraction_failed",
            Self::Io { .. } => "io",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Which end of a date range a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DateBound {
    /// Inclusive lower bound
    From,
    /// Inclusive upper bound
    To,
}

impl std::fmt::Display for DateBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::From => f.write_str("start"),
            Self::To => f.write_str("end"),
        }
    }
}

/// Non-fatal conditions raised while filtering.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FilterWarning {
    /// A date bound could not be parsed and was ignored
    #[error("Ignoring {bound} date '{value}': expected YYYY-MM-DD")]
    DateBoundUnparsable {
        /// Which bound was dropped
        bound: DateBound,
        /// The offending input
        value: String,
    },
}

/// Convenience type alias for Result with `ParsePalError`
pub type Result<T> = std::result::Result<T, ParsePalError>;
