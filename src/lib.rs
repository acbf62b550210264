#![warn(missing_docs)]

//! # marc-stream: incremental MARC decoding
//!
//! Decodes MARC bibliographic records in ISO 2709 binary format from a stream
//! of bytes that arrives in chunks of any size. Records may be cut anywhere by
//! chunk boundaries; the decoded result never depends on where the cuts fall.
//!
//! ## Quick Start
//!
//! ### Pushing chunks as they arrive
//!
//! ```
//! use marc_stream::MarcParser;
//!
//! let bytes = b"00044nam a2200037 i 4500001000600000\x1eabcde\x1e\x1d";
//! let mut parser = MarcParser::new();
//!
//! let mut records = Vec::new();
//! for chunk in bytes.chunks(10) {
//!     for result in parser.push(chunk) {
//!         match result {
//!             Ok(record) => records.push(record),
//!             Err(e) => eprintln!("bad record: {e}"),
//!         }
//!     }
//! }
//! parser.finish()?;
//! assert_eq!(records[0].control_field("001"), Some("abcde"));
//! # Ok::<(), marc_stream::MarcError>(())
//! ```
//!
//! ### Pulling from a reader
//!
//! ```no_run
//! use marc_stream::MarcStream;
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! for record in MarcStream::new(File::open("records.mrc")?) {
//!     let record = record?;
//!     println!("{} fields", record.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Collecting a buffer
//!
//! ```
//! let records = marc_stream::parse(b"")?;
//! assert!(records.is_empty());
//! # Ok::<(), marc_stream::StreamError>(())
//! ```
//!
//! ## Modules
//!
//! - [`reassembler`] — Splitting chunked input at 0x1D record terminators
//! - [`decoder`] — Decoding one record's leader, directory and fields
//! - [`parser`] — Push API combining the two, plus [`ParserOptions`]
//! - [`stream`] — Iterator over records read from any [`std::io::Read`]
//! - [`collect`] — One-shot helpers returning `Vec<Record>`
//! - [`parallel`] — Rayon-backed decoding of already-split records
//! - [`record`] — `Record`, `Field`, `ControlField`, `DataField`, `Subfield`
//! - [`leader`] — The 24-byte record leader
//! - [`charset`] — Leader charset code to text encoding
//! - [`error`] — Error types and result type

pub mod charset;
pub mod collect;
pub mod decoder;
pub mod error;
pub mod leader;
pub mod parallel;
pub mod parser;
pub mod reassembler;
/// Core MARC record structures (`Record`, `Field`, `Subfield`)
pub mod record;
pub mod stream;

pub use charset::FieldEncoding;
pub use collect::{parse, parse_str, parse_with_callback, parse_with_options, read_all};
pub use decoder::{RecordDecoder, DIRECTORY_ENTRY_LEN, FIELD_TERMINATOR};
pub use error::{MarcError, RecordError, Result, StreamError};
pub use leader::{Leader, LEADER_LEN};
pub use parser::{MarcParser, ParserOptions};
pub use reassembler::{RawRecord, Reassembler, RECORD_TERMINATOR};
pub use record::{ControlField, DataField, Field, Record, Subfield, SUBFIELD_DELIMITER};
pub use stream::MarcStream;
