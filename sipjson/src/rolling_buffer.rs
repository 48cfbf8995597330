// SPDX-License-Identifier: Apache-2.0

use crate::BufferError;

/// A capped byte window over a caller-supplied slice.
///
/// Key design principles:
/// - Reader fills the unused tail of the slice directly
/// - `buffer[0..data_end]` is the current window; offsets are relative to it
/// - Bytes before the cursor are consumed and may be released by trimming
/// - Bytes at or after the cursor are never discarded
///
/// The capacity is the length of the slice, so the window can never exceed
/// it. When nothing before the cursor is left to release, a full buffer is
/// reported as [`BufferError::BufferFull`] instead of dropping live bytes.
pub struct RollingBuffer<'b> {
    /// The entire buffer slice
    buffer: &'b mut [u8],
    /// End of valid data (buffer[0..data_end] contains valid data)
    data_end: usize,
    /// Last confirmed-consumed position
    cursor: usize,
}

impl<'b> RollingBuffer<'b> {
    /// Create a new, empty RollingBuffer over the given slice
    pub fn new(buffer: &'b mut [u8]) -> Self {
        Self {
            buffer,
            data_end: 0,
            cursor: 0,
        }
    }

    /// Maximum number of bytes the window can hold
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of valid bytes in the window
    pub fn len(&self) -> usize {
        self.data_end
    }

    pub fn is_empty(&self) -> bool {
        self.data_end == 0
    }

    /// Bytes that can be filled without trimming
    pub fn free_space(&self) -> usize {
        self.buffer.len().saturating_sub(self.data_end)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The whole current window
    pub fn data(&self) -> &[u8] {
        self.buffer.get(..self.data_end).unwrap_or(&[])
    }

    /// The part of the window at or after the cursor
    pub fn unconsumed(&self) -> &[u8] {
        self.buffer.get(self.cursor..self.data_end).unwrap_or(&[])
    }

    /// Move the cursor forward to `pos`.
    ///
    /// The cursor never moves backwards and never passes the end of the
    /// window; out-of-range positions are clamped.
    pub fn advance_cursor_to(&mut self, pos: usize) {
        self.cursor = pos.max(self.cursor).min(self.data_end);
    }

    /// Release every byte before the cursor.
    ///
    /// Returns the number of bytes removed; the cursor and any offsets the
    /// caller holds into the window must be decremented by that amount.
    pub fn trim_to_cursor(&mut self) -> usize {
        let removed = self.cursor;
        if removed == 0 {
            return 0;
        }

        if removed < self.data_end {
            // copy_within cannot panic: both ranges lie inside the slice
            if let Some(window) = self.buffer.get_mut(..self.data_end) {
                window.copy_within(removed.., 0);
            }
        }

        self.data_end = self.data_end.saturating_sub(removed);
        self.cursor = 0;
        removed
    }

    /// Trim if fewer than `wanted` bytes are free.
    ///
    /// Returns the number of bytes removed from the front.
    pub fn make_room(&mut self, wanted: usize) -> usize {
        if self.free_space() >= wanted {
            return 0;
        }
        self.trim_to_cursor()
    }

    /// Get slice for a Reader to fill with at most `max_len` new bytes.
    /// Returns None if no space available
    pub fn fill_slice(&mut self, max_len: usize) -> Option<&mut [u8]> {
        let end = self
            .data_end
            .saturating_add(max_len)
            .min(self.buffer.len());
        if end <= self.data_end {
            return None;
        }
        self.buffer.get_mut(self.data_end..end)
    }

    /// Mark that a Reader filled `bytes_read` bytes of the fill slice
    pub fn mark_filled(&mut self, bytes_read: usize) -> Result<(), BufferError> {
        let new_data_end = self.data_end.saturating_add(bytes_read);
        if new_data_end > self.buffer.len() {
            return Err(BufferError::InvalidSliceBounds);
        }
        self.data_end = new_data_end;
        Ok(())
    }

    /// Copy `chunk` onto the end of the window, trimming first if needed.
    ///
    /// Returns the number of bytes trimmed from the front. Nothing is
    /// appended when the chunk does not fit even after trimming.
    pub fn append(&mut self, chunk: &[u8]) -> Result<usize, BufferError> {
        let live = self.data_end.saturating_sub(self.cursor);
        if chunk.len() > self.buffer.len().saturating_sub(live) {
            return Err(BufferError::BufferFull);
        }
        let removed = self.make_room(chunk.len());
        let dest = self
            .fill_slice(chunk.len())
            .ok_or(BufferError::BufferFull)?;
        if dest.len() != chunk.len() {
            return Err(BufferError::BufferFull);
        }
        dest.copy_from_slice(chunk);
        self.mark_filled(chunk.len())?;
        Ok(removed)
    }
}
