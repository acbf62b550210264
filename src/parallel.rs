//! Parallel decoding of already-split records using Rayon.
//!
//! Boundary scanning is inherently sequential, but once a buffer has been cut
//! into [`RawRecord`]s each record decodes independently. This module fans
//! those records out over Rayon's work-stealing pool and returns results in
//! stream order.
//!
//! # Examples
//!
//! ```
//! use marc_stream::parallel::parse_parallel;
//! use marc_stream::ParserOptions;
//!
//! let data = b"00044nam a2200037 i 4500001000600000\x1eabcde\x1e\x1d".repeat(8);
//! let records = parse_parallel(data.into(), &ParserOptions::default())?;
//! assert_eq!(records.len(), 8);
//! # Ok::<(), marc_stream::StreamError>(())
//! ```

use crate::decoder::RecordDecoder;
use crate::error::{RecordError, StreamError};
use crate::parser::{decode_raw, ParserOptions};
use crate::reassembler::{RawRecord, Reassembler};
use crate::record::Record;
use bytes::Bytes;
use rayon::prelude::*;

/// Decode a batch of raw records in parallel.
///
/// The result at position `i` belongs to `records[i]`.
#[must_use]
pub fn decode_parallel(
    decoder: &RecordDecoder,
    records: &[RawRecord],
) -> Vec<Result<Record, RecordError>> {
    records
        .par_iter()
        .map(|raw| decode_raw(decoder, raw))
        .collect()
}

/// Split a complete buffer into records and decode them in parallel.
///
/// # Errors
///
/// Returns the first failing record in stream order, or
/// [`StreamError::Fatal`] if the buffer ends inside a record.
pub fn parse_parallel(data: Bytes, options: &ParserOptions) -> Result<Vec<Record>, StreamError> {
    let mut reassembler = Reassembler::new();
    let raw = reassembler.feed_bytes(data);
    let decoder = RecordDecoder::from_options(options);

    let records = decode_parallel(&decoder, &raw)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    reassembler.finish()?;
    Ok(records)
}
