//! Push-style parsing of a chunked MARC byte stream.
//!
//! [`MarcParser`] owns one [`Reassembler`] and one [`RecordDecoder`]. Every
//! chunk pushed in returns the records it completed, each either decoded or
//! paired with the [`RecordError`] that stopped it. A bad record never stops
//! the parser from finding the records after it.
//!
//! # Examples
//!
//! ```
//! use marc_stream::MarcParser;
//!
//! let mut parser = MarcParser::new();
//! let mut records = Vec::new();
//! for chunk in [&b"00044nam a2200037 i 4500001000600000"[..], &b"\x1eabcde\x1e\x1d"[..]] {
//!     for result in parser.push(chunk) {
//!         records.push(result?);
//!     }
//! }
//! parser.finish()?;
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].control_field("001"), Some("abcde"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::charset::{self, CharsetLookup};
use crate::decoder::RecordDecoder;
use crate::error::{RecordError, Result};
use crate::reassembler::{RawRecord, Reassembler};
use crate::record::{self, Record};
use bytes::Bytes;
use encoding_rs::Encoding;

/// Default read size used by [`MarcStream`](crate::stream::MarcStream).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Configuration shared by the parser, stream and collect entry points.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Bytes requested per read when pulling from an `io::Read` source.
    pub chunk_size: usize,
    /// Maps leader position 9 to the encoding of field values.
    pub charset_lookup: CharsetLookup,
    /// Decides whether a tag is a control field.
    pub control_tag: fn(&str) -> bool,
    /// Apply Unicode NFC normalization to decoded values.
    pub normalize_unicode: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            charset_lookup: charset::encoding_for_code,
            control_tag: record::is_control_tag,
            normalize_unicode: false,
        }
    }
}

impl ParserOptions {
    /// Set the read size for stream sources. Zero is raised to one byte.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Replace the charset lookup.
    #[must_use]
    pub fn with_charset_lookup(mut self, lookup: CharsetLookup) -> Self {
        self.charset_lookup = lookup;
        self
    }

    /// Replace the control-tag predicate.
    #[must_use]
    pub fn with_control_tag(mut self, predicate: fn(&str) -> bool) -> Self {
        self.control_tag = predicate;
        self
    }

    /// Enable or disable NFC normalization of field values.
    #[must_use]
    pub fn with_normalize_unicode(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }
}

/// Incremental MARC parser.
#[derive(Debug, Default)]
pub struct MarcParser {
    reassembler: Reassembler,
    decoder: RecordDecoder,
    records_decoded: usize,
    records_failed: usize,
}

impl MarcParser {
    /// Create a parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with the given options.
    #[must_use]
    pub fn with_options(options: &ParserOptions) -> Self {
        Self {
            decoder: RecordDecoder::from_options(options),
            ..Self::default()
        }
    }

    /// Push a chunk of bytes; returns the outcome of every record it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<std::result::Result<Record, RecordError>> {
        let raw = self.reassembler.feed(chunk);
        self.decode_all(raw)
    }

    /// Push an owned chunk without copying records that lie inside it.
    pub fn push_bytes(&mut self, chunk: Bytes) -> Vec<std::result::Result<Record, RecordError>> {
        let raw = self.reassembler.feed_bytes(chunk);
        self.decode_all(raw)
    }

    /// Push a text chunk, converting it to bytes with `encoding` first.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::EncodingError`](crate::MarcError::EncodingError)
    /// if `chunk` cannot be represented in `encoding`; the parser state is
    /// left as it was.
    pub fn push_str(
        &mut self,
        chunk: &str,
        encoding: &'static Encoding,
    ) -> Result<Vec<std::result::Result<Record, RecordError>>> {
        let raw = self.reassembler.feed_text(chunk, encoding)?;
        Ok(self.decode_all(raw))
    }

    /// Signal end of input.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::IncompleteRecord`](crate::MarcError::IncompleteRecord)
    /// if the last record never received its terminator.
    pub fn finish(&mut self) -> Result<()> {
        self.reassembler.finish()
    }

    /// Number of records decoded successfully so far.
    #[must_use]
    pub fn records_decoded(&self) -> usize {
        self.records_decoded
    }

    /// Number of records that failed to decode so far.
    #[must_use]
    pub fn records_failed(&self) -> usize {
        self.records_failed
    }

    /// The decoder this parser uses.
    #[must_use]
    pub fn decoder(&self) -> RecordDecoder {
        self.decoder
    }

    /// Whether part of a record is buffered waiting for more input.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.reassembler.has_pending()
    }

    fn decode_all(&mut self, raw: Vec<RawRecord>) -> Vec<std::result::Result<Record, RecordError>> {
        let results: Vec<_> = raw
            .into_iter()
            .map(|raw| decode_raw(&self.decoder, &raw))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        self.records_failed += failed;
        self.records_decoded += results.len() - failed;
        if !results.is_empty() {
            tracing::debug!(
                records = results.len(),
                failed,
                "decoded records from chunk"
            );
        }
        results
    }
}

/// Decode one raw record, attaching its stream position to any failure.
pub(crate) fn decode_raw(
    decoder: &RecordDecoder,
    raw: &RawRecord,
) -> std::result::Result<Record, RecordError> {
    decoder.decode(&raw.bytes).map_err(|source| {
        tracing::warn!(
            index = raw.index,
            offset = raw.offset,
            error = %source,
            "record failed to decode"
        );
        RecordError {
            index: raw.index,
            offset: raw.offset,
            length: raw.bytes.len(),
            source,
        }
    })
}
