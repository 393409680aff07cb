//! Error types for directive parsing and argument decoding.

use thiserror::Error;

/// Error type for format-spec parsing and argument decoding.
///
/// Decode failures are ordinary data: the message decoder records them per
/// directive in a [`FormattedMessage`](crate::FormattedMessage) instead of
/// aborting. Malformed payloads are an expected input, not an exceptional
/// one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("varint missing terminator within argument width")]
    InvalidVarint,
    #[error("argument bytes are not valid UTF-8")]
    InvalidUtf8(Vec<u8>),
    #[error("{0} is not a valid character code")]
    InvalidChar(i64),
    #[error("unsupported conversion '%{0}'")]
    UnsupportedConversion(char),
    #[error("invalid format specifier {0:?}")]
    InvalidSpec(String),
}
