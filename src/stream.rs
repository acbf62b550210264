//! Pull-style decoding from any [`std::io::Read`] source.
//!
//! [`MarcStream`] reads fixed-size chunks, feeds them through a
//! [`MarcParser`], and yields records in arrival order. A record that fails
//! to decode is yielded as [`StreamError::Record`] and iteration continues;
//! an I/O failure or an unterminated final record is yielded once as
//! [`StreamError::Fatal`] and ends the stream.
//!
//! # Examples
//!
//! ```no_run
//! use marc_stream::MarcStream;
//! use std::fs::File;
//!
//! let file = File::open("records.mrc")?;
//! for result in MarcStream::new(file) {
//!     match result {
//!         Ok(record) => println!("{:?}", record.control_field("001")),
//!         Err(e) if e.is_fatal() => return Err(e.into()),
//!         Err(e) => eprintln!("skipping: {e}"),
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::StreamError;
use crate::parser::{MarcParser, ParserOptions};
use crate::record::Record;
use std::collections::VecDeque;
use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;

/// Iterator of records decoded from a byte source.
#[derive(Debug)]
pub struct MarcStream<R> {
    reader: R,
    parser: MarcParser,
    buffer: Vec<u8>,
    ready: VecDeque<Result<Record, StreamError>>,
    done: bool,
}

impl<R: Read> MarcStream<R> {
    /// Create a stream with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, &ParserOptions::default())
    }

    /// Create a stream with the given options.
    pub fn with_options(reader: R, options: &ParserOptions) -> Self {
        MarcStream {
            reader,
            parser: MarcParser::with_options(options),
            buffer: vec![0u8; options.chunk_size.max(1)],
            ready: VecDeque::new(),
            done: false,
        }
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the next per-record or fatal error, in stream order.
    pub fn read_record(&mut self) -> Result<Option<Record>, StreamError> {
        self.next().transpose()
    }

    /// Number of records decoded successfully so far.
    #[must_use]
    pub fn records_decoded(&self) -> usize {
        self.parser.records_decoded()
    }

    /// Number of records that failed to decode so far.
    #[must_use]
    pub fn records_failed(&self) -> usize {
        self.parser.records_failed()
    }

    /// Recover the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> Option<StreamError> {
        match self.reader.read(&mut self.buffer) {
            Ok(0) => {
                self.done = true;
                self.parser.finish().err().map(StreamError::Fatal)
            },
            Ok(n) => {
                let results = self.parser.push(&self.buffer[..n]);
                self.ready
                    .extend(results.into_iter().map(|r| r.map_err(StreamError::from)));
                None
            },
            Err(e) if e.kind() == ErrorKind::Interrupted => None,
            Err(e) => {
                self.done = true;
                Some(e.into())
            },
        }
    }
}

impl<R: Read> Iterator for MarcStream<R> {
    type Item = Result<Record, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.ready.pop_front() {
                return Some(item);
            }
            if self.done {
                return None;
            }
            if let Some(err) = self.fill() {
                return Some(Err(err));
            }
        }
    }
}

impl<R: Read> FusedIterator for MarcStream<R> {}
