// SPDX-License-Identifier: Apache-2.0

//! Panic-free parsing of JSON integer tokens.
//!
//! Only what JSON allows is accepted: an optional leading `-` and ASCII
//! digits. A leading `+` is an invalid digit.

/// Why an integer token could not be parsed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum IntParseError {
    /// No digits, either an empty token or a bare `-`.
    NoDigits,
    /// A byte other than an ASCII digit.
    InvalidDigit,
    /// Outside the configured integer range.
    Overflow,
}

macro_rules! define_int_parser {
    ($fn_name:ident, $int_ty:ty) => {
        #[doc = concat!("Parse a JSON integer token as `", stringify!($int_ty), "`.")]
        pub(crate) fn $fn_name(token: &[u8]) -> Result<$int_ty, IntParseError> {
            let (negative, digits) = match token {
                [b'-', digits @ ..] => (true, digits),
                digits => (false, digits),
            };
            if digits.is_empty() {
                return Err(IntParseError::NoDigits);
            }

            digits.iter().try_fold(0, |acc: $int_ty, &byte| {
                if !byte.is_ascii_digit() {
                    return Err(IntParseError::InvalidDigit);
                }
                let digit = <$int_ty>::from(byte - b'0');
                let scaled = acc.checked_mul(10);
                // Negatives accumulate downwards so MIN stays representable
                let next = if negative {
                    scaled.and_then(|v| v.checked_sub(digit))
                } else {
                    scaled.and_then(|v| v.checked_add(digit))
                };
                next.ok_or(IntParseError::Overflow)
            })
        }
    };
}

#[cfg(feature = "int32")]
define_int_parser!(parse_i32, i32);
#[cfg(feature = "int64")]
define_int_parser!(parse_i64, i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "int64")]
    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(b"75"), Ok(75));
        assert_eq!(parse_i64(b"-12"), Ok(-12));
        assert_eq!(parse_i64(b"0"), Ok(0));
        assert_eq!(parse_i64(b"-9223372036854775808"), Ok(i64::MIN));
        assert_eq!(
            parse_i64(b"9223372036854775808"),
            Err(IntParseError::Overflow)
        );
        assert_eq!(parse_i64(b""), Err(IntParseError::NoDigits));
        assert_eq!(parse_i64(b"-"), Err(IntParseError::NoDigits));
        assert_eq!(parse_i64(b"1-2"), Err(IntParseError::InvalidDigit));
    }

    #[cfg(feature = "int64")]
    #[test]
    fn test_leading_plus_rejected() {
        assert_eq!(parse_i64(b"+3"), Err(IntParseError::InvalidDigit));
        assert_eq!(parse_i64(b"-+3"), Err(IntParseError::InvalidDigit));
    }

    #[cfg(feature = "int32")]
    #[test]
    fn test_parse_i32() {
        assert_eq!(parse_i32(b"2147483647"), Ok(i32::MAX));
        assert_eq!(parse_i32(b"-2147483648"), Ok(i32::MIN));
        assert_eq!(parse_i32(b"2147483648"), Err(IntParseError::Overflow));
        assert_eq!(parse_i32(b"+1"), Err(IntParseError::InvalidDigit));
    }
}
