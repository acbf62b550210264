//! Common test helpers for building binary MARC records.

#![allow(dead_code)]

pub const FIELD_TERMINATOR: u8 = 0x1E;
pub const RECORD_TERMINATOR: u8 = 0x1D;
pub const SUBFIELD_DELIMITER: u8 = 0x1F;

/// Builds one ISO 2709 record from tags and raw field values.
///
/// Values are written as given; the builder adds each field terminator, the
/// directory terminator, and the record terminator.
#[derive(Debug, Clone)]
pub struct RecordBytes {
    coding: u8,
    fields: Vec<(String, Vec<u8>)>,
}

impl RecordBytes {
    pub fn new() -> Self {
        RecordBytes {
            coding: b'a',
            fields: Vec::new(),
        }
    }

    /// Set leader position 9.
    pub fn coding(mut self, coding: u8) -> Self {
        self.coding = coding;
        self
    }

    pub fn control(mut self, tag: &str, value: &str) -> Self {
        self.fields.push((tag.to_string(), value.as_bytes().to_vec()));
        self
    }

    pub fn data(mut self, tag: &str, indicators: &str, subfields: &[(char, &str)]) -> Self {
        let mut value = indicators.as_bytes().to_vec();
        for (code, text) in subfields {
            value.push(SUBFIELD_DELIMITER);
            let mut buf = [0u8; 4];
            value.extend_from_slice(code.encode_utf8(&mut buf).as_bytes());
            value.extend_from_slice(text.as_bytes());
        }
        self.fields.push((tag.to_string(), value));
        self
    }

    pub fn raw(mut self, tag: &str, value: &[u8]) -> Self {
        self.fields.push((tag.to_string(), value.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut directory = Vec::new();
        let mut data = Vec::new();
        for (tag, value) in &self.fields {
            directory.extend_from_slice(tag.as_bytes());
            directory.extend_from_slice(format!("{:04}", value.len() + 1).as_bytes());
            directory.extend_from_slice(format!("{:05}", data.len()).as_bytes());
            data.extend_from_slice(value);
            data.push(FIELD_TERMINATOR);
        }
        directory.push(FIELD_TERMINATOR);

        let base_address = 24 + directory.len();
        let record_length = base_address + data.len() + 1;

        let mut bytes = Vec::with_capacity(record_length);
        bytes.extend_from_slice(format!("{record_length:05}").as_bytes());
        bytes.extend_from_slice(b"nam ");
        bytes.push(self.coding);
        bytes.extend_from_slice(b"22");
        bytes.extend_from_slice(format!("{base_address:05}").as_bytes());
        bytes.extend_from_slice(b" i 4500");
        bytes.extend_from_slice(&directory);
        bytes.extend_from_slice(&data);
        bytes.push(RECORD_TERMINATOR);
        bytes
    }
}

/// A realistic bibliographic record with control and data fields interleaved.
pub fn book_record(control_number: &str) -> Vec<u8> {
    RecordBytes::new()
        .control("001", control_number)
        .control("003", "DLC")
        .control("008", "040520s2004    nyu           000 1 eng  ")
        .data("020", "  ", &[('a', "9780743273565")])
        .data("100", "1 ", &[('a', "Fitzgerald, F. Scott,"), ('d', "1896-1940.")])
        .data(
            "245",
            "14",
            &[('a', "The great Gatsby /"), ('c', "F. Scott Fitzgerald.")],
        )
        .data("650", " 0", &[('a', "Rich people"), ('z', "New York (State)"), ('v', "Fiction.")])
        .data("650", " 0", &[('a', "Long Island (N.Y.)"), ('v', "Fiction.")])
        .build()
}

/// The minimal single-control-field record: base address 37, field 001 = "abcde".
pub fn minimal_record() -> Vec<u8> {
    RecordBytes::new().control("001", "abcde").build()
}

/// A record whose base address implies a 13-byte directory.
pub fn bad_directory_record() -> Vec<u8> {
    let mut bytes = minimal_record();
    bytes[12..17].copy_from_slice(b"00038");
    bytes
}
