//! MARC record leader decoding.
//!
//! The leader is the fixed 24-byte header at the start of every record.
//!
//! # Structure
//!
//! - Positions 0-4: Record length (5 digits)
//! - Position 5: Record status
//! - Position 6: Record type
//! - Position 7: Bibliographic level
//! - Position 8: Control record type
//! - Position 9: Character coding scheme (space = MARC-8, a = UCS/Unicode)
//! - Position 10: Indicator count (1 digit)
//! - Position 11: Subfield code count (1 digit)
//! - Positions 12-16: Base address of data (5 digits)
//! - Positions 17-19: Encoding level, cataloging form, multipart level
//! - Positions 20-23: Entry map (usually "4500")

use crate::error::{MarcError, Result};
use serde::{Deserialize, Serialize};

/// Length of the leader in bytes.
pub const LEADER_LEN: usize = 24;

// Smallest record length or base address that still covers the leader.
const MIN_LENGTH: u32 = 24;

/// MARC Leader decoded from the first 24 bytes of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    /// Record length (5 digits) - positions 0-4
    pub record_length: u32,
    /// Record status (1 char) - position 5
    pub record_status: char,
    /// Type of record (1 char) - position 6
    pub record_type: char,
    /// Bibliographic level (1 char) - position 7
    pub bibliographic_level: char,
    /// Type of control record (1 char) - position 8
    pub control_record_type: char,
    /// Character coding scheme (1 char) - position 9
    pub character_coding: char,
    /// Indicator count (1 digit) - position 10
    pub indicator_count: u8,
    /// Subfield code count (1 digit) - position 11
    pub subfield_code_count: u8,
    /// Base address of data (5 digits) - positions 12-16
    pub data_base_address: u32,
    /// Encoding level (1 char) - position 17
    pub encoding_level: char,
    /// Descriptive cataloging form (1 char) - position 18
    pub cataloging_form: char,
    /// Multipart resource record level (1 char) - position 19
    pub multipart_level: char,
    /// Entry map (4 chars) - positions 20-23
    pub entry_map: String,
}

impl Default for Leader {
    fn default() -> Self {
        Leader {
            record_length: 0,
            record_status: 'n',
            record_type: 'a',
            bibliographic_level: 'm',
            control_record_type: ' ',
            character_coding: 'a',
            indicator_count: 2,
            subfield_code_count: 2,
            data_base_address: 0,
            encoding_level: ' ',
            cataloging_form: ' ',
            multipart_level: ' ',
            entry_map: "4500".to_string(),
        }
    }
}

impl Leader {
    /// Decode a leader from the first 24 bytes of `bytes`.
    ///
    /// Extra bytes past position 23 are ignored, so a whole record may be passed.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidLeader`] if fewer than 24 bytes are given or
    /// a fixed-width integer field contains anything other than ASCII digits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < LEADER_LEN {
            return Err(MarcError::InvalidLeader(format!(
                "Leader must be at least {LEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Leader {
            record_length: parse_digits(&bytes[0..5], "record length")?,
            record_status: bytes[5] as char,
            record_type: bytes[6] as char,
            bibliographic_level: bytes[7] as char,
            control_record_type: bytes[8] as char,
            character_coding: bytes[9] as char,
            indicator_count: parse_count(bytes[10], 10, "indicator count")?,
            subfield_code_count: parse_count(bytes[11], 11, "subfield code count")?,
            data_base_address: parse_digits(&bytes[12..17], "base address of data")?,
            encoding_level: bytes[17] as char,
            cataloging_form: bytes[18] as char,
            multipart_level: bytes[19] as char,
            entry_map: bytes[20..24].iter().map(|&b| b as char).collect(),
        })
    }

    /// Length of the directory in bytes, derived from the base address.
    ///
    /// The directory runs from byte 24 up to the directory terminator that
    /// precedes the data area, so its length is `base_address - 25`. Returns
    /// `None` when the base address is too small to hold a terminator.
    #[must_use]
    pub fn directory_length(&self) -> Option<usize> {
        (self.data_base_address as usize).checked_sub(LEADER_LEN + 1)
    }

    /// Check the leader's lengths before the record body is read.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidLeader`] if the record length or the base
    /// address of data is smaller than the leader itself.
    pub fn validate_for_reading(&self) -> Result<()> {
        if self.record_length < MIN_LENGTH {
            return Err(MarcError::InvalidLeader(format!(
                "Record length must be at least {MIN_LENGTH}, got {}",
                self.record_length
            )));
        }
        if self.data_base_address < MIN_LENGTH {
            return Err(MarcError::InvalidLeader(format!(
                "Base address of data must be at least {MIN_LENGTH}, got {}",
                self.data_base_address
            )));
        }
        Ok(())
    }
}

fn parse_digits(bytes: &[u8], what: &str) -> Result<u32> {
    bytes.iter().try_fold(0u32, |acc, &b| {
        if b.is_ascii_digit() {
            Ok(acc * 10 + u32::from(b - b'0'))
        } else {
            Err(MarcError::InvalidLeader(format!(
                "Invalid {what}: '{}'",
                String::from_utf8_lossy(bytes)
            )))
        }
    })
}

fn parse_count(byte: u8, position: usize, what: &str) -> Result<u8> {
    if byte.is_ascii_digit() {
        Ok(byte - b'0')
    } else {
        Err(MarcError::InvalidLeader(format!(
            "Invalid {what} at position {position}: {}",
            byte as char
        )))
    }
}
