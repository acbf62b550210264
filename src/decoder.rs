//! Decoding a single complete ISO 2709 record.
//!
//! [`RecordDecoder::decode`] takes the bytes of exactly one record (as produced
//! by the [`Reassembler`](crate::reassembler::Reassembler)) and returns a
//! populated [`Record`]:
//!
//! 1. the leader is decoded from bytes 0-23 and its lengths checked;
//! 2. the field encoding is chosen from leader position 9;
//! 3. the directory (bytes 24 up to `base_address - 1`) is read as 12-byte
//!    entries of tag, length and start position;
//! 4. each field value is decoded, checked for its 0x1E terminator, and
//!    appended as a control field or data field.

use crate::charset::{self, CharsetLookup};
use crate::error::{MarcError, Result};
use crate::leader::{Leader, LEADER_LEN};
use crate::parser::ParserOptions;
use crate::record::{ControlField, DataField, Field, Record};
use nom::bytes::complete::{take, take_while_m_n};
use nom::character::is_digit;
use nom::sequence::tuple;
use nom::IResult;

/// Byte that ends each variable field.
pub const FIELD_TERMINATOR: u8 = 0x1E;

/// Size of one directory entry in bytes.
pub const DIRECTORY_ENTRY_LEN: usize = 12;

/// One 12-byte directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirectoryEntry<'a> {
    tag: &'a [u8],
    /// Stored length, terminator included.
    length: usize,
    /// Start position relative to the base address.
    start: usize,
}

fn ascii_decimal(digits: &[u8]) -> usize {
    digits
        .iter()
        .fold(0, |acc, &d| acc * 10 + usize::from(d - b'0'))
}

fn directory_entry(input: &[u8]) -> IResult<&[u8], DirectoryEntry<'_>> {
    let (rest, (tag, length, start)) = tuple((
        take(3usize),
        take_while_m_n(4, 4, is_digit),
        take_while_m_n(5, 5, is_digit),
    ))(input)?;
    Ok((
        rest,
        DirectoryEntry {
            tag,
            length: ascii_decimal(length),
            start: ascii_decimal(start),
        },
    ))
}

/// Decoder for one complete record's bytes.
///
/// Holds only the injected collaborators, so it is `Copy` and can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct RecordDecoder {
    charset_lookup: CharsetLookup,
    control_tag: fn(&str) -> bool,
    normalize_unicode: bool,
}

impl Default for RecordDecoder {
    fn default() -> Self {
        Self::from_options(&ParserOptions::default())
    }
}

impl RecordDecoder {
    /// Create a decoder with the default charset lookup and control-tag predicate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder using the collaborators configured in `options`.
    #[must_use]
    pub fn from_options(options: &ParserOptions) -> Self {
        RecordDecoder {
            charset_lookup: options.charset_lookup,
            control_tag: options.control_tag,
            normalize_unicode: options.normalize_unicode,
        }
    }

    /// Decode one record.
    ///
    /// `bytes` normally ends with the 0x1D record terminator, but only the
    /// leader, directory and the located field values are inspected.
    ///
    /// # Errors
    ///
    /// - [`MarcError::InvalidLeader`] if the leader is short or malformed, or its
    ///   record length or base address is below 24
    /// - [`MarcError::InvalidDirectory`] if the directory length is not a
    ///   multiple of 12, an entry holds non-digit lengths, or a field lies
    ///   outside the record
    /// - [`MarcError::MissingFieldTerminator`] if a field value is not followed by 0x1E
    /// - [`MarcError::InvalidField`] if a data field's subfields are malformed
    pub fn decode(&self, bytes: &[u8]) -> Result<Record> {
        let leader = Leader::from_bytes(bytes)?;
        leader.validate_for_reading()?;
        let encoding = (self.charset_lookup)(leader.character_coding);

        let directory_length = leader.directory_length().ok_or_else(|| {
            MarcError::InvalidDirectory(format!(
                "base address {} leaves no room for a directory",
                leader.data_base_address
            ))
        })?;
        if directory_length % DIRECTORY_ENTRY_LEN != 0 {
            return Err(MarcError::InvalidDirectory(format!(
                "length {directory_length} is not a multiple of {DIRECTORY_ENTRY_LEN}"
            )));
        }
        let base_address = LEADER_LEN + 1 + directory_length;
        if bytes.len() < base_address {
            return Err(MarcError::InvalidDirectory(format!(
                "record of {} bytes is shorter than its base address {base_address}",
                bytes.len()
            )));
        }

        let entry_count = directory_length / DIRECTORY_ENTRY_LEN;
        let mut fields = Vec::with_capacity(entry_count);

        for i in 0..entry_count {
            let offset = LEADER_LEN + i * DIRECTORY_ENTRY_LEN;
            let raw_entry = &bytes[offset..offset + DIRECTORY_ENTRY_LEN];
            let (_, entry) = directory_entry(raw_entry).map_err(|_| {
                MarcError::InvalidDirectory(format!(
                    "entry {i} at byte {offset} is malformed: '{}'",
                    String::from_utf8_lossy(raw_entry)
                ))
            })?;
            let tag = String::from_utf8_lossy(entry.tag).into_owned();

            let field_len = entry.length.checked_sub(1).ok_or_else(|| {
                MarcError::InvalidDirectory(format!("field {tag} has length 0"))
            })?;
            let field_start = entry.start + base_address;
            let field_end = field_start + field_len;
            if field_end >= bytes.len() {
                return Err(MarcError::InvalidDirectory(format!(
                    "field {tag} at byte {field_start} with length {} runs past the end of a {}-byte record",
                    entry.length,
                    bytes.len()
                )));
            }

            tracing::trace!(%tag, start = field_start, len = field_len, "directory entry");

            let mut value = charset::decode_text(&bytes[field_start..field_end], encoding);
            if bytes[field_end] != FIELD_TERMINATOR {
                return Err(MarcError::MissingFieldTerminator {
                    tag,
                    position: field_end,
                });
            }
            if self.normalize_unicode {
                value = charset::normalize(&value);
            }

            let field = if (self.control_tag)(&tag) {
                Field::Control(ControlField { tag, value })
            } else {
                Field::Data(DataField::unmarshal(tag, &value)?)
            };
            fields.push(field);
        }

        let mut record = Record::new(leader);
        for field in fields {
            record.add_field(field);
        }
        Ok(record)
    }
}
