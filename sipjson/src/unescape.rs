// SPDX-License-Identifier: Apache-2.0

//! Decoding of JSON string bodies.
//!
//! The matcher hands over the raw bytes between a value's quotes; this
//! module turns them into an owned `String`, resolving simple escapes and
//! `\uXXXX` sequences including UTF-16 surrogate pairs.

use alloc::string::String;
use alloc::vec::Vec;

use crate::ValueError;

/// Decode the raw body of a quoted JSON string (quotes excluded).
pub(crate) fn unescape(raw: &[u8]) -> Result<String, ValueError> {
    if !raw.contains(&b'\\') {
        return Ok(String::from(core::str::from_utf8(raw)?));
    }

    let mut out = Vec::with_capacity(raw.len());
    let mut rest = raw;
    let mut pending_high_surrogate: Option<u32> = None;

    while let Some((&byte, tail)) = rest.split_first() {
        rest = tail;
        if byte != b'\\' {
            if pending_high_surrogate.is_some() {
                return Err(ValueError::InvalidEscape);
            }
            out.push(byte);
            continue;
        }

        let (&escape, tail) = rest.split_first().ok_or(ValueError::InvalidEscape)?;
        rest = tail;

        if escape != b'u' {
            if pending_high_surrogate.is_some() {
                return Err(ValueError::InvalidEscape);
            }
            out.push(simple_escape(escape)?);
            continue;
        }

        let hex = rest.get(..4).ok_or(ValueError::InvalidEscape)?;
        rest = rest.get(4..).unwrap_or(&[]);
        let codepoint = hex_codepoint(hex)?;

        let ch = match pending_high_surrogate.take() {
            Some(high) if is_low_surrogate(codepoint) => {
                combine_surrogate_pair(high, codepoint)
            }
            Some(_) => return Err(ValueError::InvalidEscape),
            None if is_high_surrogate(codepoint) => {
                pending_high_surrogate = Some(codepoint);
                continue;
            }
            None => char::from_u32(codepoint),
        }
        .ok_or(ValueError::InvalidEscape)?;

        let mut utf8 = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
    }

    if pending_high_surrogate.is_some() {
        return Err(ValueError::InvalidEscape);
    }

    String::from_utf8(out).map_err(|e| ValueError::InvalidUtf8(e.utf8_error()))
}

/// Map the character after a backslash to the byte it stands for.
fn simple_escape(escape_char: u8) -> Result<u8, ValueError> {
    match escape_char {
        b'n' => Ok(b'\n'),
        b't' => Ok(b'\t'),
        b'r' => Ok(b'\r'),
        b'\\' => Ok(b'\\'),
        b'"' => Ok(b'"'),
        b'/' => Ok(b'/'),
        b'b' => Ok(0x08), // Backspace
        b'f' => Ok(0x0C), // Form feed
        _ => Err(ValueError::InvalidEscape),
    }
}

fn hex_digit(byte: u8) -> Result<u32, ValueError> {
    match byte {
        b'0'..=b'9' => Ok(u32::from(byte - b'0')),
        b'a'..=b'f' => Ok(u32::from(byte - b'a') + 10),
        b'A'..=b'F' => Ok(u32::from(byte - b'A') + 10),
        _ => Err(ValueError::InvalidEscape),
    }
}

fn hex_codepoint(hex: &[u8]) -> Result<u32, ValueError> {
    hex.iter()
        .try_fold(0u32, |acc, &byte| -> Result<u32, ValueError> {
            Ok((acc << 4) | hex_digit(byte)?)
        })
}

fn is_high_surrogate(codepoint: u32) -> bool {
    (0xD800..=0xDBFF).contains(&codepoint)
}

fn is_low_surrogate(codepoint: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&codepoint)
}

fn combine_surrogate_pair(high: u32, low: u32) -> Option<char> {
    char::from_u32(0x10000 + ((high & 0x3FF) << 10) + (low & 0x3FF))
}
