// SPDX-License-Identifier: Apache-2.0

//! Bounded-memory extraction from streamed JSON.
//!
//! `sipjson` pulls individual values and short lists of records out of
//! large JSON responses without ever holding the whole document. Input
//! arrives through a [`Reader`] in small chunks and is kept in a
//! caller-supplied scratch slice, so peak memory is the size of that slice
//! plus the decoded output.
//!
//! Two extraction modes are provided:
//!
//! - [`extract_first_value`] finds the first `"key": value` pair matching a
//!   [`Pattern`], optionally filtered by a substring of the value.
//! - [`extract_bounded_records`] walks the objects of a named array and
//!   returns at most a fixed number of [`Record`]s per category.
//!
//! ```rust
//! use sipjson::{extract_first_value, ChunkReader, Pattern, Scalar};
//!
//! let json = br#"{"features":[{"id":"https://example.org/zones/WAZ558"},
//!                  {"id":"https://example.org/stations/KSEA"}]}"#;
//! let mut buffer = [0u8; 256];
//! let pattern = Pattern::string("id").containing("/stations/");
//!
//! let id = extract_first_value(ChunkReader::new(json, 16), &mut buffer, &pattern);
//! assert_eq!(id, Ok(Scalar::from("https://example.org/stations/KSEA")));
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

// Compile-time configuration validation
mod config_check;

mod chunk_reader;
pub use chunk_reader::ChunkReader;

mod extract_error;
pub use extract_error::{BufferError, ExtractError, ValueError};

mod int_parser;

mod unescape;

mod scalar;
pub use scalar::{last_path_segment, Integer, Scalar};

mod pattern;
pub use pattern::{Pattern, Shape};

mod rolling_buffer;
pub use rolling_buffer::RollingBuffer;

mod object_bounds;

mod field_matcher;

mod record;
pub use record::{CategoryCaps, Record, RecordBatch, RecordQuery, StopReason};

mod session;
pub use session::{
    ExtractionSession, Reader, SessionConfig, DEFAULT_BUFFER_CAPACITY, DEFAULT_CHUNK_SIZE,
};

/// Stream `source` until the first value matching `pattern` is found.
///
/// `buffer` bounds the memory used for look-back; see
/// [`DEFAULT_BUFFER_CAPACITY`]. The source is read in
/// [`DEFAULT_CHUNK_SIZE`] chunks.
pub fn extract_first_value<R: Reader>(
    source: R,
    buffer: &mut [u8],
    pattern: &Pattern<'_>,
) -> Result<Scalar, ExtractError> {
    ExtractionSession::new(source, buffer).first_value(pattern)
}

/// Stream `source` and collect the records described by `query`.
///
/// Never fails: the returned [`RecordBatch`] carries whatever was collected
/// together with the reason extraction stopped.
pub fn extract_bounded_records<R: Reader>(
    source: R,
    buffer: &mut [u8],
    query: &RecordQuery<'_>,
) -> RecordBatch {
    ExtractionSession::new(source, buffer).bounded_records(query)
}
