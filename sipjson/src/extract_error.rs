// SPDX-License-Identifier: Apache-2.0

/// Errors reported by the extraction entry points.
///
/// None of these are fatal to the caller; every variant means "the data is
/// unavailable", and the variants only differ in why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    /// The pattern never matched before the stream ended.
    NotFound,
    /// A matched number or literal could not be decoded.
    MalformedValue,
    /// An object's closing brace never arrived before the stream ended.
    IncompleteObject,
    /// Content still being matched does not fit in the scratch buffer.
    BufferFull,
    /// The underlying reader failed or reported more bytes than it was given.
    ReaderError,
}

/// Error types for RollingBuffer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Buffer is full and no consumed bytes can be released
    BufferFull,
    /// Reported fill length runs past the end of the buffer
    InvalidSliceBounds,
}

/// Errors from decoding a matched value's raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueError {
    /// A string value was not valid UTF-8.
    InvalidUtf8(core::str::Utf8Error),
    /// Invalid escape sequence or `\u` code point in a string value.
    InvalidEscape,
    /// A number string could not be parsed.
    InvalidNumber,
    /// The integer does not fit the configured integer width.
    NumericOverflow,
}

impl From<BufferError> for ExtractError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::BufferFull => ExtractError::BufferFull,
            // Only a reader over-reporting its byte count gets here
            BufferError::InvalidSliceBounds => ExtractError::ReaderError,
        }
    }
}

impl From<ValueError> for ExtractError {
    fn from(err: ValueError) -> Self {
        match err {
            // Undecodable text is indistinguishable from a missing field
            ValueError::InvalidUtf8(_) | ValueError::InvalidEscape => ExtractError::NotFound,
            ValueError::InvalidNumber | ValueError::NumericOverflow => {
                ExtractError::MalformedValue
            }
        }
    }
}

impl From<core::str::Utf8Error> for ValueError {
    fn from(err: core::str::Utf8Error) -> Self {
        ValueError::InvalidUtf8(err)
    }
}

impl core::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ExtractError::NotFound => f.write_str("value not found in stream"),
            ExtractError::MalformedValue => f.write_str("matched value could not be decoded"),
            ExtractError::IncompleteObject => f.write_str("stream ended inside an object"),
            ExtractError::BufferFull => f.write_str("scratch buffer too small for pending match"),
            ExtractError::ReaderError => f.write_str("reader failed"),
        }
    }
}

impl core::fmt::Display for ValueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValueError::InvalidUtf8(e) => write!(f, "Invalid UTF-8: {e}"),
            _ => write!(f, "{self:?}"),
        }
    }
}

impl core::error::Error for ExtractError {}

impl core::error::Error for ValueError {}
