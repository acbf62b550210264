//! Convenience wrappers that collect a whole input into a list of records.
//!
//! Unlike the streaming API these functions stop at the first failure, and
//! never return a partial list.

use crate::error::StreamError;
use crate::parser::{MarcParser, ParserOptions};
use crate::record::Record;
use crate::stream::MarcStream;
use encoding_rs::Encoding;
use std::io::Read;

/// Decode every record in an in-memory buffer.
///
/// # Errors
///
/// Returns the first per-record error, or [`StreamError::Fatal`] if the buffer
/// ends inside a record.
///
/// # Examples
///
/// ```
/// let data = b"00044nam a2200037 i 4500001000600000\x1eabcde\x1e\x1d";
/// let records = marc_stream::parse(data)?;
/// assert_eq!(records[0].control_field("001"), Some("abcde"));
///
/// assert!(marc_stream::parse(b"")?.is_empty());
/// # Ok::<(), marc_stream::StreamError>(())
/// ```
pub fn parse(data: &[u8]) -> Result<Vec<Record>, StreamError> {
    parse_with_options(data, &ParserOptions::default())
}

/// Decode every record in an in-memory buffer with the given options.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_options(
    data: &[u8],
    options: &ParserOptions,
) -> Result<Vec<Record>, StreamError> {
    let mut parser = MarcParser::with_options(options);
    let records = parser
        .push(data)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    parser.finish()?;
    Ok(records)
}

/// Decode every record in a text buffer, converting it to bytes with `encoding`.
///
/// # Errors
///
/// As [`parse`], plus a fatal
/// [`MarcError::EncodingError`](crate::MarcError::EncodingError) if `text`
/// cannot be represented in `encoding`.
pub fn parse_str(text: &str, encoding: &'static Encoding) -> Result<Vec<Record>, StreamError> {
    let mut parser = MarcParser::new();
    let records = parser
        .push_str(text, encoding)?
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    parser.finish()?;
    Ok(records)
}

/// Read a source to the end and decode every record in it.
///
/// # Errors
///
/// Returns the first per-record error, the first I/O error, or an
/// incomplete-record error.
pub fn read_all<R: Read>(reader: R, options: &ParserOptions) -> Result<Vec<Record>, StreamError> {
    MarcStream::with_options(reader, options).collect()
}

/// Decode a buffer and hand the outcome to `callback`.
///
/// The callback runs exactly once, with either the full list of records or the
/// first error.
///
/// ```
/// let data = b"00044nam a2200037 i 4500001000600000\x1eabcde\x1e\x1d";
/// let mut count = 0;
/// marc_stream::parse_with_callback(data, &Default::default(), |result| {
///     count = result.map(|records| records.len()).unwrap_or(0);
/// });
/// assert_eq!(count, 1);
/// ```
pub fn parse_with_callback<F>(data: &[u8], options: &ParserOptions, callback: F)
where
    F: FnOnce(Result<Vec<Record>, StreamError>),
{
    callback(parse_with_options(data, options));
}
