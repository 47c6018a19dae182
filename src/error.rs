//! Error types for the rawfile library.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while acquiring or operating on a [`crate::RawFile`].
#[derive(Error, Debug)]
pub enum FileError {
    /// A local resource (file path) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A malformed input: non-file path, invalid URL, bad destination.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No file extension could be determined and none was supplied.
    #[error("unable to determine the file extension: {0}")]
    TypeResolution(String),

    /// Malformed encoded input: bad base64, corrupt gzip data, or a missing
    /// archive member.
    #[error("decode error: {0}")]
    Decode(String),

    /// A remote or service call failed (network, auth, provider error).
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// An I/O error occurred while reading or writing locally.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bridge's bounded wait for an offloaded computation expired.
    #[error("bridged task did not complete within {0:?}")]
    Timeout(Duration),

    /// An acquisition path was invoked without its optional capability
    /// (cargo feature) compiled in.
    #[error("missing capability: the `{0}` feature is not enabled")]
    MissingCapability(&'static str),
}

/// Convenience type alias for Results using FileError.
pub type Result<T> = std::result::Result<T, FileError>;
