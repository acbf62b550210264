//! Error types for MARC stream decoding.
//!
//! Two kinds of failure are kept apart:
//!
//! - [`RecordError`] wraps a [`MarcError`] raised while decoding one complete
//!   record. It is recoverable: the stream keeps scanning for the next record.
//! - [`StreamError::Fatal`] carries a failure that ends the stream (I/O errors
//!   from the byte source, or an unterminated final record).

use thiserror::Error;

/// Error type for all MARC decoding operations.
#[derive(Error, Debug)]
pub enum MarcError {
    /// The 24-byte leader is missing or one of its fixed-width integers is malformed.
    #[error("Invalid leader: {0}")]
    InvalidLeader(String),

    /// The directory length or one of its entries is structurally invalid.
    #[error("invalid directory: {0}")]
    InvalidDirectory(String),

    /// A field value located through the directory is not followed by 0x1E.
    #[error("expected field terminator at end of field {tag} (byte {position})")]
    MissingFieldTerminator {
        /// Tag of the offending field.
        tag: String,
        /// Position, relative to the record start, where 0x1E was expected.
        position: usize,
    },

    /// A data field value has malformed indicators or subfield delimiters.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// The input ended while a record was still waiting for its 0x1D terminator.
    #[error("incomplete record: {pending} bytes starting at byte {offset} have no record terminator")]
    IncompleteRecord {
        /// Absolute stream offset of the first unterminated byte.
        offset: u64,
        /// Number of buffered bytes that never saw a terminator.
        pending: usize,
    },

    /// A text chunk holds characters its declared encoding cannot represent.
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// IO error from the underlying byte source.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`MarcError`].
pub type Result<T> = std::result::Result<T, MarcError>;

/// A single record that failed to decode, with its position in the stream.
#[derive(Error, Debug)]
#[error("record {index} at byte {offset} ({length} bytes) failed to decode: {source}")]
pub struct RecordError {
    /// Zero-based position of the record in the stream.
    pub index: usize,
    /// Absolute byte offset of the record's first byte.
    pub offset: u64,
    /// Length of the record's raw bytes, terminator included.
    pub length: usize,
    /// The structural failure.
    #[source]
    pub source: MarcError,
}

/// Error surfaced by the streaming and collecting entry points.
#[derive(Error, Debug)]
pub enum StreamError {
    /// One record failed to decode; the stream continues with the next record.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// The stream itself failed and yields nothing further.
    #[error(transparent)]
    Fatal(#[from] MarcError),
}

impl StreamError {
    /// Whether this error terminates the stream.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, StreamError::Fatal(_))
    }

    /// The underlying structural or I/O error.
    #[must_use]
    pub fn marc_error(&self) -> &MarcError {
        match self {
            StreamError::Record(err) => &err.source,
            StreamError::Fatal(err) => err,
        }
    }
}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        StreamError::Fatal(MarcError::IoError(err))
    }
}
