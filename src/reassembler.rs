//! Splitting a chunked byte stream into complete records.
//!
//! Records end with a 0x1D terminator. Chunks may cut a record anywhere, so
//! the [`Reassembler`] keeps the unterminated tail of the previous chunks and
//! joins it with the next terminator it finds. Terminators are located with
//! the SIMD-accelerated `memchr` crate.
//!
//! # Example
//!
//! ```
//! use marc_stream::reassembler::Reassembler;
//!
//! let mut reassembler = Reassembler::new();
//! assert!(reassembler.feed(b"first part, ").is_empty());
//!
//! let records = reassembler.feed(b"end\x1Dnext\x1Dtail");
//! assert_eq!(records.len(), 2);
//! assert_eq!(&records[0].bytes[..], b"first part, end\x1D");
//! assert_eq!(&records[1].bytes[..], b"next\x1D");
//! assert_eq!(reassembler.pending_len(), 4);
//!
//! assert!(reassembler.finish().is_err());
//! ```

use crate::charset;
use crate::error::{MarcError, Result};
use bytes::{Bytes, BytesMut};
use encoding_rs::Encoding;

/// The byte value that terminates MARC records.
pub const RECORD_TERMINATOR: u8 = 0x1D;

/// The bytes of one complete record, terminator included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Zero-based position of the record in the stream.
    pub index: usize,
    /// Absolute byte offset of the record's first byte in the stream.
    pub offset: u64,
    /// Record bytes, ending with 0x1D.
    pub bytes: Bytes,
}

/// Incremental record-boundary splitter.
///
/// Each stream owns exactly one `Reassembler`; it buffers nothing beyond the
/// bytes of the record currently waiting for its terminator.
#[derive(Debug, Default)]
pub struct Reassembler {
    /// Bytes after the last terminator seen, possibly spanning several chunks.
    pending: BytesMut,
    /// Stream offset of `pending[0]`.
    pending_offset: u64,
    /// Total bytes fed so far.
    consumed: u64,
    /// Records emitted so far.
    emitted: usize,
}

impl Reassembler {
    /// Create an empty reassembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes and return every record it completes.
    ///
    /// Each byte is copied once: into the pending tail if it belongs to an
    /// unterminated record, otherwise into the record that owns it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<RawRecord> {
        self.split(chunk, None)
    }

    /// Feed a text chunk, converting it to bytes with `encoding` first.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::EncodingError`] if `chunk` contains characters
    /// `encoding` cannot represent. Nothing is buffered in that case.
    pub fn feed_text(
        &mut self,
        chunk: &str,
        encoding: &'static Encoding,
    ) -> Result<Vec<RawRecord>> {
        if chunk.is_empty() {
            return Ok(Vec::new());
        }
        let bytes = charset::encode_text(chunk, encoding)?;
        Ok(self.feed_bytes(Bytes::from(bytes)))
    }

    /// Feed an owned chunk.
    ///
    /// Records that lie entirely inside `chunk` are returned as slices of it
    /// without copying.
    pub fn feed_bytes(&mut self, chunk: Bytes) -> Vec<RawRecord> {
        self.split(&chunk, Some(&chunk))
    }

    /// Scan `chunk` for terminators. `owned` is `chunk` itself when the caller
    /// handed over a `Bytes`, so whole records can be sliced out of it.
    fn split(&mut self, chunk: &[u8], owned: Option<&Bytes>) -> Vec<RawRecord> {
        if chunk.is_empty() {
            return Vec::new();
        }

        let chunk_offset = self.consumed;
        self.consumed += chunk.len() as u64;

        let mut records = Vec::new();
        let mut start = 0;
        for pos in memchr::memchr_iter(RECORD_TERMINATOR, chunk) {
            let (offset, bytes) = if self.pending.is_empty() {
                let bytes = match owned {
                    Some(owned) => owned.slice(start..=pos),
                    None => Bytes::copy_from_slice(&chunk[start..=pos]),
                };
                (chunk_offset + start as u64, bytes)
            } else {
                // Only the first terminator of a chunk can close a pending tail.
                let mut joined = std::mem::take(&mut self.pending);
                joined.extend_from_slice(&chunk[..=pos]);
                (self.pending_offset, joined.freeze())
            };
            records.push(RawRecord {
                index: self.emitted,
                offset,
                bytes,
            });
            self.emitted += 1;
            start = pos + 1;
        }

        if start < chunk.len() {
            if self.pending.is_empty() {
                self.pending_offset = chunk_offset + start as u64;
            }
            self.pending.extend_from_slice(&chunk[start..]);
            tracing::debug!(
                pending = self.pending.len(),
                offset = self.pending_offset,
                "carrying unterminated record into next chunk"
            );
        }

        records
    }

    /// Signal end of input.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::IncompleteRecord`] if bytes are still waiting for a
    /// record terminator. The pending bytes are discarded either way.
    pub fn finish(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let pending = self.pending.len();
        self.pending.clear();
        Err(MarcError::IncompleteRecord {
            offset: self.pending_offset,
            pending,
        })
    }

    /// Whether an unterminated record is buffered.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of buffered bytes waiting for a terminator.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of complete records emitted so far.
    #[must_use]
    pub fn records_emitted(&self) -> usize {
        self.emitted
    }

    /// Total bytes fed so far.
    #[must_use]
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Drop all state and start a new stream.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
