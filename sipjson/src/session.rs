// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

use log::{debug, trace, warn};

use crate::field_matcher::{find_field, locate_key, skip_separators, FieldScan, KeyScan};
use crate::object_bounds::{find_object_end, find_object_start, last_open_brace};
use crate::record::CategoryCounters;
use crate::{
    ExtractError, Pattern, Record, RecordBatch, RecordQuery, RollingBuffer, Scalar, StopReason,
};

/// Bytes requested from the [`Reader`] per read.
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Suggested scratch buffer length; it must hold the largest record (or
/// parent object) being extracted plus one chunk.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;

/// Trait for input sources that can provide data to the extractor.
pub trait Reader {
    /// The error type returned by read operations
    type Error;

    /// Read data into the provided buffer.
    /// Returns the number of bytes read, or an error.
    ///
    /// # Contract
    /// - A return value of 0 **MUST** indicate true end of stream
    /// - Implementations **MUST NOT** return 0 unless no more data will ever be available
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Lets a session borrow a reader the caller keeps using afterwards.
impl<R: Reader + ?Sized> Reader for &mut R {
    type Error = R::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
}

/// Run-time settings for an [`ExtractionSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound on the bytes requested per read (at least 1).
    pub chunk_size: usize,
}

impl SessionConfig {
    pub const fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: if chunk_size == 0 { 1 } else { chunk_size },
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

/// Position within the record array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayScan {
    /// Looking for `"<array_key>": [`
    SeekingArray,
    /// Between array elements
    Boundary,
    /// Inside an element, looking for its anchor key
    SeekingAnchor,
}

/// Outcome of one attempt to pull a record out of the current window.
#[derive(Debug)]
enum Step {
    Record(Record),
    /// The window holds nothing more; read another chunk.
    Pending,
    Stop(StopReason),
}

/// One extraction over one byte stream.
///
/// The session owns the rolling buffer and all matching state. Both entry
/// points consume it, so nothing carries over between extractions; pass
/// `&mut reader` to keep the reader afterwards.
pub struct ExtractionSession<'b, R: Reader> {
    reader: R,
    buffer: RollingBuffer<'b>,
    config: SessionConfig,
    /// The reader reported end of stream
    finished: bool,
    /// Search offset at or after the cursor, re-based on every trim
    scan: usize,
}

impl<'b, R: Reader> ExtractionSession<'b, R> {
    pub fn new(reader: R, buffer: &'b mut [u8]) -> Self {
        Self::with_config(reader, buffer, SessionConfig::default())
    }

    pub fn with_config(reader: R, buffer: &'b mut [u8], config: SessionConfig) -> Self {
        Self {
            reader,
            buffer: RollingBuffer::new(buffer),
            config,
            finished: false,
            scan: 0,
        }
    }

    /// Read the next chunk into the window.
    ///
    /// Consumed bytes are trimmed first when the chunk would not fit.
    fn fill(&mut self) -> Result<(), ExtractError> {
        let removed = self.buffer.make_room(self.config.chunk_size);
        if removed > 0 {
            trace!("trimmed {} consumed bytes", removed);
            self.scan = self.scan.saturating_sub(removed);
        }

        let Some(fill_slice) = self.buffer.fill_slice(self.config.chunk_size) else {
            return Err(ExtractError::BufferFull);
        };
        let requested = fill_slice.len();
        let bytes_read = self
            .reader
            .read(fill_slice)
            .map_err(|_| ExtractError::ReaderError)?;
        if bytes_read > requested {
            return Err(ExtractError::ReaderError);
        }
        self.buffer.mark_filled(bytes_read)?;

        if bytes_read == 0 {
            trace!("end of stream, {} bytes in window", self.buffer.len());
            self.finished = true;
        } else {
            trace!("read {} bytes, {} in window", bytes_read, self.buffer.len());
        }
        Ok(())
    }

    /// Mark everything before `pos` consumed and resume scanning there.
    fn consume_to(&mut self, pos: usize) {
        self.buffer.advance_cursor_to(pos);
        self.scan = self.buffer.cursor();
    }

    /// Stream until the first value matching `pattern` is found.
    pub fn first_value(mut self, pattern: &Pattern<'_>) -> Result<Scalar, ExtractError> {
        loop {
            let complete = self.finished;
            match find_field(self.buffer.data(), self.buffer.cursor(), pattern, complete) {
                FieldScan::Accepted { value, end } => {
                    debug!("matched \"{}\" ending at {}", pattern.key(), end);
                    return Ok(value);
                }
                FieldScan::Failed { error, .. } => {
                    debug!("matched \"{}\" but value is unusable: {}", pattern.key(), error);
                    return Err(error.into());
                }
                FieldScan::NeedMore { .. } if complete => return Err(ExtractError::NotFound),
                FieldScan::NeedMore { keep_from } => self.buffer.advance_cursor_to(keep_from),
                FieldScan::Missing => return Err(ExtractError::NotFound),
            }

            if let Err(err) = self.fill() {
                warn!("\"{}\" search stopped: {}", pattern.key(), err);
                return Err(err);
            }
        }
    }

    /// Stream the objects of `query`'s array and collect them as records.
    ///
    /// Extraction stops before reading further input once every category
    /// cap is reached. Records accepted before a failure are always
    /// returned, together with the reason extraction stopped.
    pub fn bounded_records(mut self, query: &RecordQuery<'_>) -> RecordBatch {
        let mut records = Vec::new();
        let stop = self.collect_records(query, &mut records);

        match stop {
            StopReason::IncompleteObject | StopReason::BufferFull | StopReason::ReaderError => {
                warn!(
                    "\"{}\" extraction stopped early ({:?}) after {} records",
                    query.array_key(),
                    stop,
                    records.len()
                );
            }
            _ => debug!(
                "\"{}\" extraction finished ({:?}) with {} records",
                query.array_key(),
                stop,
                records.len()
            ),
        }

        RecordBatch { records, stop }
    }

    fn collect_records(&mut self, query: &RecordQuery<'_>, records: &mut Vec<Record>) -> StopReason {
        let mut counters = query
            .classifier()
            .map(|(_, caps)| CategoryCounters::new(caps));
        if counters.as_ref().is_some_and(CategoryCounters::saturated) {
            return StopReason::CapsReached;
        }

        let mut state = ArrayScan::SeekingArray;
        loop {
            match self.next_record(query, &mut state) {
                Step::Record(record) => {
                    let accepted = match (counters.as_mut(), query.category_of(&record)) {
                        (Some(counters), Some(category)) => counters.admit(category),
                        _ => true,
                    };
                    if accepted {
                        debug!("accepted record {:?}", record);
                        records.push(record);
                    } else {
                        debug!("skipped record over its category cap");
                    }
                    if counters.as_ref().is_some_and(CategoryCounters::saturated) {
                        return StopReason::CapsReached;
                    }
                }
                Step::Stop(reason) => return reason,
                Step::Pending if self.finished => return StopReason::EndOfStream,
                Step::Pending => match self.fill() {
                    Ok(()) => {}
                    Err(ExtractError::BufferFull) => return StopReason::BufferFull,
                    Err(_) => return StopReason::ReaderError,
                },
            }
        }
    }

    /// Byte index of the `}` closing an object that starts at the cursor.
    fn closed_object_at_cursor(&self) -> Option<usize> {
        let data = self.buffer.data();
        let cursor = self.buffer.cursor();
        if data.get(cursor) != Some(&b'{') {
            return None;
        }
        find_object_end(data, cursor)
    }

    fn next_record(&mut self, query: &RecordQuery<'_>, state: &mut ArrayScan) -> Step {
        let complete = self.finished;
        loop {
            let data = self.buffer.data();
            match *state {
                ArrayScan::SeekingArray => {
                    match locate_key(data, self.scan, query.array_key(), complete) {
                        KeyScan::Found {
                            key_start,
                            value_start,
                        } => {
                            if data.get(value_start) == Some(&b'[') {
                                debug!("\"{}\" array opens at {}", query.array_key(), value_start);
                                self.consume_to(value_start.saturating_add(1));
                                *state = ArrayScan::Boundary;
                            } else {
                                self.scan = key_start.saturating_add(1);
                            }
                        }
                        KeyScan::NeedMore { keep_from } => {
                            self.consume_to(keep_from);
                            return Step::Pending;
                        }
                        KeyScan::Missing => return Step::Stop(StopReason::ArrayNotFound),
                    }
                }

                ArrayScan::Boundary => {
                    let pos = skip_separators(data, self.scan);
                    match data.get(pos) {
                        Some(b']') => return Step::Stop(StopReason::ArrayEnd),
                        Some(_) => {
                            self.consume_to(pos);
                            *state = ArrayScan::SeekingAnchor;
                        }
                        None if complete => return Step::Stop(StopReason::EndOfStream),
                        None => {
                            self.consume_to(pos);
                            return Step::Pending;
                        }
                    }
                }

                ArrayScan::SeekingAnchor => {
                    let cursor = self.buffer.cursor();
                    let element_close = self.closed_object_at_cursor();
                    let (key_start, keep_from) =
                        match locate_key(data, self.scan, query.anchor_key(), complete) {
                            KeyScan::Found { key_start, .. } => (Some(key_start), None),
                            KeyScan::NeedMore { keep_from } => (None, Some(keep_from)),
                            KeyScan::Missing => (None, None),
                        };
                    // Only the element at the cursor may supply the anchor
                    let key_start =
                        key_start.filter(|&key| element_close.map_or(true, |close| key < close));

                    let Some(key_start) = key_start else {
                        // An element that closed without the anchor is not a record
                        if let Some(close) = element_close {
                            debug!("skipping element without \"{}\"", query.anchor_key());
                            self.consume_to(close.saturating_add(1));
                            *state = ArrayScan::Boundary;
                            continue;
                        }
                        let Some(keep_from) = keep_from else {
                            return Step::Stop(StopReason::EndOfStream);
                        };
                        // The element start stays pinned while it is still open
                        if data.get(cursor) != Some(&b'{') {
                            let keep = last_open_brace(data, cursor, keep_from).unwrap_or(keep_from);
                            self.buffer.advance_cursor_to(keep);
                        }
                        self.scan = keep_from.max(self.buffer.cursor());
                        return Step::Pending;
                    };

                    let open = if data.get(cursor) == Some(&b'{') {
                        cursor
                    } else {
                        match find_object_start(data, cursor, key_start) {
                            Some(open) => open,
                            None => {
                                debug!(
                                    "\"{}\" at {} is outside any object",
                                    query.anchor_key(),
                                    key_start
                                );
                                self.scan = key_start.saturating_add(1);
                                continue;
                            }
                        }
                    };

                    match find_object_end(data, open) {
                        Some(close) => {
                            let record = data
                                .get(open..=close)
                                .map(|span| Record::from_span(span, query))
                                .unwrap_or_default();
                            self.consume_to(close.saturating_add(1));
                            *state = ArrayScan::Boundary;
                            return Step::Record(record);
                        }
                        None if complete => return Step::Stop(StopReason::IncompleteObject),
                        None => {
                            // Retry the same span once more bytes arrive
                            self.buffer.advance_cursor_to(open.min(key_start));
                            self.scan = self.scan.max(self.buffer.cursor());
                            return Step::Pending;
                        }
                    }
                }
            }
        }
    }
}
