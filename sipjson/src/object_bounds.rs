// SPDX-License-Identifier: Apache-2.0

//! Object boundary detection over a byte span.
//!
//! These are pure functions with an explicit depth counter; they know
//! nothing about the rolling buffer and work on any slice, complete or not.
//! A `None` result means "not in this span yet".

/// Index of the quote that closes the string opened at `open`.
///
/// Backslash escapes are skipped, so `\"` does not terminate the string.
pub(crate) fn string_end(span: &[u8], open: usize) -> Option<usize> {
    let mut i = open.checked_add(1)?;
    while let Some(&byte) = span.get(i) {
        match byte {
            b'\\' => i = i.saturating_add(2),
            b'"' => return Some(i),
            _ => i = i.saturating_add(1),
        }
    }
    None
}

/// Index of the `}` that closes the object opened at `open`.
///
/// Depth goes up by one per `{` and down by one per `}`; the object is
/// closed when it returns to zero. Braces inside quoted strings do not
/// count. Closing braces seen before the first `{` are ignored.
pub(crate) fn find_object_end(span: &[u8], open: usize) -> Option<usize> {
    let mut depth: usize = 0;
    let mut i = open;
    while let Some(&byte) = span.get(i) {
        match byte {
            b'{' => depth = depth.saturating_add(1),
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'"' => i = string_end(span, i)?,
            _ => {}
        }
        i = i.saturating_add(1);
    }
    None
}

/// Index of the last `{` in `span[floor..limit]`.
pub(crate) fn last_open_brace(span: &[u8], floor: usize, limit: usize) -> Option<usize> {
    span.get(floor..limit)?
        .iter()
        .rposition(|&b| b == b'{')
        .map(|i| floor.saturating_add(i))
}

/// Locate the `{` opening the record that contains the key at `anchor`.
///
/// The nearest brace in `[floor, anchor)` whose object is still open at the
/// anchor wins, so nested objects preceding the anchor are stepped over.
/// When there is none the first brace after the anchor is used, treating
/// the object as starting there.
pub(crate) fn find_object_start(span: &[u8], floor: usize, anchor: usize) -> Option<usize> {
    let mut limit = anchor;
    while let Some(open) = last_open_brace(span, floor, limit) {
        match find_object_end(span, open) {
            Some(close) if close < anchor => limit = open,
            _ => return Some(open),
        }
    }

    span.get(anchor..)?
        .iter()
        .position(|&b| b == b'{')
        .map(|i| anchor.saturating_add(i))
}
