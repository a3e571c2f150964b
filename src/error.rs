//! Error types for the correction pipeline.
//!
//! Every failure is a deterministic function of the input data, so there is
//! no retry machinery. The pre-run errors (`LookupFileMissing`,
//! `MalformedLookupRow`, `DuplicateIdentifier`) are fatal for the whole run;
//! the per-record errors abort the file they occur in on first occurrence.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProcessError>;

/// Failure taxonomy of the correction pipeline.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The schedule table file does not exist. Nothing can be validated
    /// without it, so the whole run stops.
    #[error("schedule table not found: {}", .path.display())]
    LookupFileMissing { path: PathBuf },

    /// A schedule row did not split into exactly `identifier;code`.
    #[error("malformed schedule row at line {line}: {row:?}")]
    MalformedLookupRow { line: usize, row: String },

    /// An identifier appeared more than once in the schedule table.
    #[error("duplicate identifier {id} in schedule table (line {line})")]
    DuplicateIdentifier { id: String, line: usize },

    /// A record is shorter than a field it must provide, or its length
    /// deviates from the file's record length.
    #[error("record is {len} bytes, need {needed}")]
    RecordTooShort { len: usize, needed: usize },

    /// The worker identifier field could not be parsed.
    #[error("malformed worker identifier {field:?}")]
    MalformedIdentifier { field: String },

    /// A syntactically valid identifier is absent from the schedule table.
    #[error("identifier {id} not present in the schedule table")]
    IdentifierNotFound { id: String },

    /// A computed value does not fit its field width. Truncating would
    /// corrupt downstream fixed-width consumers, so the file is abandoned.
    #[error("value {value:?} does not fit field {field} ({width} bytes)")]
    ValueTooLong {
        field: &'static str,
        value: String,
        width: usize,
    },

    /// Underlying filesystem failure.
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl ProcessError {
    pub(crate) fn io(path: &std::path::Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
