// SPDX-License-Identifier: Apache-2.0

//! Single-field matching over a byte span.
//!
//! Everything here is stateless: the caller passes the span, the offset to
//! search from and whether the span is `complete` (the stream has ended, or
//! the span is a closed object). On an incomplete span a match that runs
//! into the end of the span is reported as [`FieldScan::NeedMore`] with the
//! earliest offset that must be kept, never as a partial value.

use log::debug;

use crate::object_bounds::{find_object_end, string_end};
use crate::unescape::unescape;
use crate::{Pattern, Scalar, Shape, ValueError};

/// Kind of a scalar token, before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueKind {
    String,
    Number,
    Bool,
    Null,
}

/// Result of looking for `"<key>":`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum KeyScan {
    /// Key found; its value starts at `value_start`.
    Found { key_start: usize, value_start: usize },
    /// Not decidable yet; bytes from `keep_from` on must be retained.
    NeedMore { keep_from: usize },
    /// The complete span has no such key.
    Missing,
}

/// Result of scanning the value token at a given offset.
#[derive(Debug, PartialEq, Eq)]
enum ValueScan<'s> {
    Complete {
        kind: ValueKind,
        raw: &'s [u8],
        end: usize,
    },
    Incomplete,
    NotScalar,
}

/// Result of a full pattern match.
#[derive(Debug, PartialEq)]
pub(crate) enum FieldScan {
    /// First value satisfying the pattern; `end` is one past its last byte.
    Accepted { value: Scalar, end: usize },
    /// The key matched but its value could not be decoded.
    Failed { error: ValueError, end: usize },
    NeedMore { keep_from: usize },
    Missing,
}

fn is_json_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_number_byte(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
}

fn skip_while(span: &[u8], from: usize, pred: impl Fn(u8) -> bool) -> usize {
    span.get(from..).map_or(from, |tail| {
        from.saturating_add(tail.iter().take_while(|&&b| pred(b)).count())
    })
}

pub(crate) fn skip_whitespace(span: &[u8], from: usize) -> usize {
    skip_while(span, from, is_json_whitespace)
}

/// Skip whitespace and the commas between array elements.
pub(crate) fn skip_separators(span: &[u8], from: usize) -> usize {
    skip_while(span, from, |b| is_json_whitespace(b) || b == b',')
}

fn is_quoted_key(window: &[u8], key: &[u8]) -> bool {
    match window {
        [b'"', inner @ .., b'"'] => inner == key,
        _ => false,
    }
}

/// Offset of the first `"<key>"` at or after `from`.
fn find_quoted(span: &[u8], from: usize, key: &[u8]) -> Option<usize> {
    let needle_len = key.len().checked_add(2)?;
    span.get(from..)?
        .windows(needle_len)
        .position(|window| is_quoted_key(window, key))
        .map(|i| from.saturating_add(i))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

/// Find the next `"<key>"`, whitespace, `:`, whitespace, value start.
///
/// Occurrences of the quoted key that are not followed by `:` (the same
/// text used as a string value) are skipped.
pub(crate) fn locate_key(span: &[u8], from: usize, key: &str, complete: bool) -> KeyScan {
    let key = key.as_bytes();
    let mut pos = from;
    let need_more = |keep_from: usize| {
        if complete {
            KeyScan::Missing
        } else {
            KeyScan::NeedMore { keep_from }
        }
    };

    loop {
        let Some(key_start) = find_quoted(span, pos, key) else {
            // A key split across reads can only start in the last
            // `"key"`.len() - 1 bytes
            let keep_from = span
                .len()
                .saturating_sub(key.len().saturating_add(1))
                .max(pos)
                .min(span.len());
            return need_more(keep_from);
        };

        let colon = skip_whitespace(span, key_start.saturating_add(key.len()).saturating_add(2));
        match span.get(colon) {
            Some(b':') => {
                let value_start = skip_whitespace(span, colon.saturating_add(1));
                if value_start < span.len() {
                    return KeyScan::Found {
                        key_start,
                        value_start,
                    };
                }
                return need_more(key_start);
            }
            Some(_) => pos = key_start.saturating_add(1),
            None => return need_more(key_start),
        }
    }
}

fn literal<'s>(span: &'s [u8], start: usize, text: &[u8], kind: ValueKind) -> ValueScan<'s> {
    let tail = span.get(start..).unwrap_or(&[]);
    if tail.starts_with(text) {
        let end = start.saturating_add(text.len());
        ValueScan::Complete {
            kind,
            raw: span.get(start..end).unwrap_or(&[]),
            end,
        }
    } else if text.starts_with(tail) {
        ValueScan::Incomplete
    } else {
        ValueScan::NotScalar
    }
}

/// Scan the scalar token starting at `start`.
///
/// Numbers are only complete once a delimiter follows them, since the next
/// read could still extend the digits.
fn scan_value(span: &[u8], start: usize, complete: bool) -> ValueScan<'_> {
    let Some(&first) = span.get(start) else {
        return ValueScan::Incomplete;
    };

    match first {
        b'"' => match string_end(span, start) {
            Some(close) => ValueScan::Complete {
                kind: ValueKind::String,
                raw: span.get(start.saturating_add(1)..close).unwrap_or(&[]),
                end: close.saturating_add(1),
            },
            None => ValueScan::Incomplete,
        },
        b'-' | b'0'..=b'9' => {
            let end = skip_while(span, start, is_number_byte);
            if end >= span.len() && !complete {
                return ValueScan::Incomplete;
            }
            ValueScan::Complete {
                kind: ValueKind::Number,
                raw: span.get(start..end).unwrap_or(&[]),
                end,
            }
        }
        b't' => literal(span, start, b"true", ValueKind::Bool),
        b'f' => literal(span, start, b"false", ValueKind::Bool),
        b'n' => literal(span, start, b"null", ValueKind::Null),
        _ => ValueScan::NotScalar,
    }
}

fn accepts(shape: Shape, kind: ValueKind) -> bool {
    match (shape, kind) {
        (_, ValueKind::Null) => false,
        (Shape::Any, _) => true,
        (Shape::String, ValueKind::String)
        | (Shape::Number, ValueKind::Number)
        | (Shape::Bool, ValueKind::Bool) => true,
        _ => false,
    }
}

fn decode(kind: ValueKind, raw: &[u8]) -> Result<Scalar, ValueError> {
    match kind {
        ValueKind::String => unescape(raw).map(Scalar::String),
        ValueKind::Number => Scalar::from_number(raw),
        ValueKind::Bool => Ok(Scalar::Bool(raw == b"true")),
        ValueKind::Null => Ok(Scalar::Null),
    }
}

fn passes_filter(filter: Option<&str>, value: &Scalar, raw: &[u8]) -> bool {
    let Some(needle) = filter else {
        return true;
    };
    match value {
        Scalar::String(s) => s.contains(needle),
        _ => contains(raw, needle.as_bytes()),
    }
}

/// Find the first value in `span[from..]` that satisfies `pattern`.
pub(crate) fn find_field(
    span: &[u8],
    from: usize,
    pattern: &Pattern<'_>,
    complete: bool,
) -> FieldScan {
    match pattern.parent() {
        Some(parent) => find_nested(span, from, parent, pattern, complete),
        None => find_plain(span, from, pattern, complete),
    }
}

fn find_plain(span: &[u8], from: usize, pattern: &Pattern<'_>, complete: bool) -> FieldScan {
    let mut pos = from;
    loop {
        let (key_start, value_start) = match locate_key(span, pos, pattern.key(), complete) {
            KeyScan::Found {
                key_start,
                value_start,
            } => (key_start, value_start),
            KeyScan::NeedMore { keep_from } => return FieldScan::NeedMore { keep_from },
            KeyScan::Missing => return FieldScan::Missing,
        };

        match scan_value(span, value_start, complete) {
            // Unterminated at end of stream: nothing can follow it
            ValueScan::Incomplete if complete => return FieldScan::Missing,
            ValueScan::Incomplete => {
                return FieldScan::NeedMore {
                    keep_from: key_start,
                }
            }
            ValueScan::NotScalar => pos = key_start.saturating_add(1),
            ValueScan::Complete { kind, raw, end } => {
                if !accepts(pattern.shape(), kind) {
                    debug!(
                        "skipping \"{}\" at {}: {:?} value, {:?} wanted",
                        pattern.key(),
                        key_start,
                        kind,
                        pattern.shape()
                    );
                    pos = end;
                    continue;
                }
                match decode(kind, raw) {
                    // An undecodable candidate cannot contain the filter text
                    Err(error) if pattern.filter().is_some() => {
                        debug!("rejected \"{}\" at {}: {}", pattern.key(), key_start, error);
                        pos = end;
                    }
                    Err(error) => return FieldScan::Failed { error, end },
                    Ok(value) if passes_filter(pattern.filter(), &value, raw) => {
                        return FieldScan::Accepted { value, end }
                    }
                    Ok(value) => {
                        debug!(
                            "rejected \"{}\" = {:?}: filter {:?} not present",
                            pattern.key(),
                            value,
                            pattern.filter()
                        );
                        pos = end;
                    }
                }
            }
        }
    }
}

fn find_nested(
    span: &[u8],
    from: usize,
    parent: &str,
    pattern: &Pattern<'_>,
    complete: bool,
) -> FieldScan {
    let mut pos = from;
    loop {
        let (key_start, value_start) = match locate_key(span, pos, parent, complete) {
            KeyScan::Found {
                key_start,
                value_start,
            } => (key_start, value_start),
            KeyScan::NeedMore { keep_from } => return FieldScan::NeedMore { keep_from },
            KeyScan::Missing => return FieldScan::Missing,
        };

        if span.get(value_start) != Some(&b'{') {
            pos = key_start.saturating_add(1);
            continue;
        }

        let Some(close) = find_object_end(span, value_start) else {
            return if complete {
                FieldScan::Missing
            } else {
                FieldScan::NeedMore {
                    keep_from: key_start,
                }
            };
        };

        let end = close.saturating_add(1);
        let body = span.get(value_start..end).unwrap_or(&[]);
        match find_plain(body, 0, pattern, true) {
            FieldScan::Accepted { value, .. } => return FieldScan::Accepted { value, end },
            FieldScan::Failed { error, .. } => return FieldScan::Failed { error, end },
            FieldScan::NeedMore { .. } | FieldScan::Missing => {
                debug!("\"{}\" object has no \"{}\"", parent, pattern.key());
                pos = end;
            }
        }
    }
}

/// Look up one field inside a closed object; unusable values become `Null`.
pub(crate) fn lookup(span: &[u8], pattern: &Pattern<'_>) -> Scalar {
    match find_field(span, 0, pattern, true) {
        FieldScan::Accepted { value, .. } => value,
        FieldScan::Failed { error, .. } => {
            debug!("field \"{}\" unusable: {}", pattern.key(), error);
            Scalar::Null
        }
        FieldScan::NeedMore { .. } | FieldScan::Missing => Scalar::Null,
    }
}
