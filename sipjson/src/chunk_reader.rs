// SPDX-License-Identifier: Apache-2.0

//! A convenience Reader implementation for in-memory documents.
//!
//! This module provides [`ChunkReader`], a [`Reader`] over a byte slice. It
//! can hand out the whole document at once or simulate a network response
//! by capping every read to a fixed chunk size.
//!
//! On a device you'll typically implement [`Reader`] for the HTTP client's
//! response body instead:
//!
//! - **Sockets**: `impl Reader for TcpStream` or the TLS stream wrapping it
//! - **HTTP clients**: a thin adapter over the client's body reader
//! - **Host tools**: an adapter over `std::io::Read` (see the `demos` crate)
//!
//! # Examples
//!
//! ```rust
//! use sipjson::{extract_first_value, ChunkReader, Pattern, Scalar};
//!
//! let json = br#"{"properties": {"temperature": 72, "windSpeed": "5 mph"}}"#;
//! let mut buffer = [0u8; 128];
//! let reader = ChunkReader::new(json, 7); // Deliver the body 7 bytes at a time
//!
//! let value = extract_first_value(reader, &mut buffer, &Pattern::number("temperature"));
//! assert_eq!(value, Ok(Scalar::Integer(72)));
//! ```

use core::convert::Infallible;

use crate::Reader;

/// A [`Reader`] that reads from a byte slice, optionally in fixed-size chunks.
///
/// 1.  **Full Slice Reading**: [`ChunkReader::full_slice()`] returns as much
///     as the destination buffer can hold on every call.
///
/// 2.  **Chunked Reading**: [`ChunkReader::new()`] limits each `read()` to
///     `chunk_size` bytes. Tests use this to split documents at every
///     possible boundary.
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
}

impl<'a> ChunkReader<'a> {
    /// Create a new chunked reader from a byte slice.
    ///
    /// Each call to `read()` will return at most `chunk_size` bytes
    /// (minimum 1), even if more data is available.
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1), // Ensure at least 1 byte per read
        }
    }

    /// Create a new reader that consumes the entire byte slice at once.
    pub fn full_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: usize::MAX,
        }
    }

    /// Number of bytes handed out so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or(&[])
    }
}

impl Reader for ChunkReader<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.remaining();
        let to_copy = remaining.len().min(buf.len()).min(self.chunk_size);

        if let (Some(dest), Some(src)) = (buf.get_mut(..to_copy), remaining.get(..to_copy)) {
            dest.copy_from_slice(src);
            self.pos = self.pos.saturating_add(to_copy);
            Ok(to_copy)
        } else {
            Ok(0)
        }
    }
}
