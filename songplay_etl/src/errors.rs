use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for the `songplay_etl` crate.
#[derive(Debug, Error)]
pub enum EtlError {
    /// An input file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line of an input file is not valid JSON or has the wrong shape.
    #[error("malformed JSON in {path} at line {line}")]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A song-metadata file contains no JSON value.
    #[error("{path} contains no record")]
    EmptyFile {
        /// File being parsed.
        path: PathBuf,
    },

    /// A song-play event lacks a field needed to build its rows.
    #[error("event at {path}:{line} is missing field `{field}`")]
    MissingField {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// JSON field name as it appears in the log.
        field: &'static str,
    },

    /// An epoch-millisecond timestamp outside the representable range.
    #[error("timestamp {ts} at {path}:{line} is out of range")]
    InvalidTimestamp {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Raw `ts` value.
        ts: i64,
    },

    /// A statement against the warehouse failed.
    #[error("database error")]
    Database(#[from] diesel::result::Error),

    /// The warehouse connection could not be established.
    #[error("database connection failed")]
    Connection(#[from] diesel::ConnectionError),

    /// The database URL names a backend this build does not support.
    #[error("unsupported database url: {0}")]
    UnsupportedDatabaseUrl(String),
}

/// Result type used throughout the crate.
pub type EtlResult<T> = Result<T, EtlError>;
