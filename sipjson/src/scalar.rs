// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

use crate::ValueError;

#[cfg(feature = "int32")]
use crate::int_parser::parse_i32 as parse_configured_int;
#[cfg(feature = "int64")]
use crate::int_parser::parse_i64 as parse_configured_int;
use crate::int_parser::IntParseError;

/// The integer type selected by the `int32` / `int64` features.
#[cfg(feature = "int32")]
pub type Integer = i32;
/// The integer type selected by the `int32` / `int64` features.
#[cfg(feature = "int64")]
pub type Integer = i64;

/// A decoded JSON scalar.
///
/// Absent, malformed and `null` values inside a record all surface as
/// [`Scalar::Null`]; downstream code treats it as "data unavailable".
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// No usable value.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// An integer that fits the configured width.
    Integer(Integer),
    /// A decimal number (only available with the `float` feature).
    #[cfg(feature = "float")]
    Float(f64),
    /// A decoded string.
    String(String),
}

impl Scalar {
    /// Decode a bare number token.
    ///
    /// Tokens without `.`, `e` or `E` are integers. Decimals become
    /// [`Scalar::Float`] with the `float` feature, are truncated with
    /// `float-truncate`, and are rejected otherwise.
    pub(crate) fn from_number(raw: &[u8]) -> Result<Scalar, ValueError> {
        if is_integer(raw) {
            return parse_integer(raw).map(Scalar::Integer);
        }

        #[cfg(feature = "float")]
        {
            let text = core::str::from_utf8(raw).map_err(|_| ValueError::InvalidNumber)?;
            text.parse::<f64>()
                .map(Scalar::Float)
                .map_err(|_| ValueError::InvalidNumber)
        }
        #[cfg(all(not(feature = "float"), feature = "float-truncate"))]
        {
            truncate_decimal(raw).map(Scalar::Integer)
        }
        #[cfg(not(any(feature = "float", feature = "float-truncate")))]
        {
            Err(ValueError::InvalidNumber)
        }
    }

    /// Returns `true` for [`Scalar::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<Integer> {
        match self {
            Scalar::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the number as an f64. Integers are converted.
    #[cfg(feature = "float")]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            Scalar::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(String::from(s))
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<Integer> for Scalar {
    fn from(i: Integer) -> Self {
        Scalar::Integer(i)
    }
}

/// The text after the last `/` of an identifier URL.
///
/// Observation stations are identified by values such as
/// `https://api.weather.gov/stations/KSEA`; the station code is the final
/// path segment. Text without a `/` is returned unchanged.
pub fn last_path_segment(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

fn is_integer(raw: &[u8]) -> bool {
    !raw.iter().any(|b| matches!(b, b'.' | b'e' | b'E'))
}

fn parse_integer(raw: &[u8]) -> Result<Integer, ValueError> {
    parse_configured_int(raw).map_err(|e| match e {
        IntParseError::Overflow => ValueError::NumericOverflow,
        IntParseError::NoDigits | IntParseError::InvalidDigit => ValueError::InvalidNumber,
    })
}

#[cfg(all(not(feature = "float"), feature = "float-truncate"))]
fn truncate_decimal(raw: &[u8]) -> Result<Integer, ValueError> {
    // Exponents would need real float math to truncate correctly
    if raw.iter().any(|b| matches!(b, b'e' | b'E')) {
        return Err(ValueError::InvalidNumber);
    }
    let int_part = raw.split(|&b| b == b'.').next().unwrap_or(raw);
    parse_integer(int_part)
}
