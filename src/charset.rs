//! Character set selection for field values.
//!
//! Position 9 of the leader names the character coding scheme of a record's
//! field data:
//! - `a` = UCS/Unicode, decoded as UTF-8
//! - space = MARC-8, decoded by [`decode_marc8_basic`]
//!
//! The lookup is a plain function so callers can inject their own mapping
//! through [`ParserOptions`](crate::parser::ParserOptions).

use crate::error::{MarcError, Result};
use encoding_rs::{Encoding, UTF_8};
use unicode_normalization::UnicodeNormalization;

const ESC: u8 = 0x1B;
const REPLACEMENT: char = '\u{FFFD}';

/// Encoding of a record's field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEncoding {
    /// MARC-8: only the Basic Latin G0 set is decoded.
    Marc8,
    /// Any encoding known to `encoding_rs`.
    Encoding(&'static Encoding),
}

impl From<&'static Encoding> for FieldEncoding {
    fn from(encoding: &'static Encoding) -> Self {
        FieldEncoding::Encoding(encoding)
    }
}

/// Maps a leader character-coding code to the encoding of field values.
pub type CharsetLookup = fn(char) -> FieldEncoding;

/// Default charset lookup.
///
/// `' '` selects MARC-8, which is decoded without its extended character
/// sets: ASCII passes through and every ANSEL, diacritic or non-Latin byte
/// becomes U+FFFD. Unknown codes fall back to UTF-8.
///
/// # Examples
///
/// ```
/// use marc_stream::charset::{encoding_for_code, FieldEncoding};
///
/// assert_eq!(encoding_for_code('a'), FieldEncoding::Encoding(encoding_rs::UTF_8));
/// assert_eq!(encoding_for_code(' '), FieldEncoding::Marc8);
/// ```
#[must_use]
pub fn encoding_for_code(code: char) -> FieldEncoding {
    match code {
        'a' => FieldEncoding::Encoding(UTF_8),
        ' ' => FieldEncoding::Marc8,
        other => {
            tracing::warn!(code = ?other, "unknown character coding scheme, using UTF-8");
            FieldEncoding::Encoding(UTF_8)
        },
    }
}

/// Decode field bytes to text with the given encoding.
///
/// Malformed or unsupported sequences are replaced with U+FFFD rather than
/// failing the record.
#[must_use]
pub fn decode_text(bytes: &[u8], encoding: FieldEncoding) -> String {
    match encoding {
        FieldEncoding::Marc8 => decode_marc8_basic(bytes),
        FieldEncoding::Encoding(encoding) => {
            let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
            if had_errors {
                tracing::debug!(
                    encoding = encoding.name(),
                    len = bytes.len(),
                    "malformed byte sequence replaced while decoding field"
                );
            }
            text.into_owned()
        },
    }
}

/// Decode MARC-8 restricted to the Basic Latin G0 set.
///
/// Escape sequences are consumed. While G0 is designated to anything other
/// than Basic Latin, and for every byte at or above 0x80, U+FFFD is emitted.
#[must_use]
pub fn decode_marc8_basic(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut basic_g0 = true;
    let mut replaced = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if byte == ESC {
            match bytes.get(i + 1) {
                // ESC s - reset G0 to Basic Latin
                Some(b's') => {
                    basic_g0 = true;
                    i += 2;
                },
                // ESC ( F / ESC , F - designate G0
                Some(b'(' | b',') => {
                    basic_g0 = matches!(bytes.get(i + 2), Some(b'B'));
                    i += 3;
                },
                // ESC ) F / ESC - F - designate G1
                Some(b')' | b'-') => i += 3,
                // ESC $ [intermediate] F - multibyte set
                Some(b'$') => {
                    basic_g0 = false;
                    i += if matches!(bytes.get(i + 2), Some(b'(' | b',' | b')' | b'-')) {
                        4
                    } else {
                        3
                    };
                },
                // Locking shifts (ESC g, ESC b, ESC p, ...) leave Basic Latin
                Some(_) => {
                    basic_g0 = false;
                    i += 2;
                },
                None => {
                    out.push(REPLACEMENT);
                    replaced += 1;
                    i += 1;
                },
            }
            continue;
        }

        if byte < 0x80 && (basic_g0 || !(0x21..=0x7E).contains(&byte)) {
            out.push(byte as char);
        } else {
            out.push(REPLACEMENT);
            replaced += 1;
        }
        i += 1;
    }

    if replaced > 0 {
        tracing::debug!(
            replaced,
            len = bytes.len(),
            "MARC-8 characters outside Basic Latin replaced"
        );
    }
    out
}

/// Encode a text chunk to bytes before boundary scanning.
///
/// # Errors
///
/// Returns [`MarcError::EncodingError`] if the text holds characters the
/// encoding cannot represent.
pub fn encode_text(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>> {
    let (bytes, _, had_unmappable) = encoding.encode(text);
    if had_unmappable {
        return Err(MarcError::EncodingError(format!(
            "text chunk has characters not representable in {}",
            encoding.name()
        )));
    }
    Ok(bytes.into_owned())
}

/// Apply Unicode NFC normalization.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.nfc().collect()
}
