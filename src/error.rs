use std::fmt::Display;
use std::str::Utf8Error;

use thiserror::Error;

/// Errors returned while parsing, building or extracting query strings.
///
/// Every operation is all-or-nothing: when one of these is returned, no
/// partial output has been produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The encoding rule is not accepted by the requested operation, or a
    /// name/number could not be converted into an [`Encoding`](crate::Encoding).
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// The raw query string contains a control character.
    #[error("malformed query string: control character {byte:#04x} at position {position}")]
    MalformedInput { byte: u8, position: usize },

    /// The value passed as a query string is neither absent, a scalar, nor
    /// a string.
    #[error("type mismatch: expected a string, a scalar or nothing, found {0}")]
    TypeMismatch(&'static str),

    /// An element passed to the builder is not a `(key, value)` pair of
    /// scalars.
    #[error("invalid pair: {0}")]
    InvalidPair(String),

    /// Percent-decoding produced bytes that are not valid UTF-8.
    #[error(transparent)]
    Utf8(#[from] Utf8Error),

    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Generate an error for a control character found in the raw input.
    pub fn malformed(byte: u8, position: usize) -> Self {
        Error::MalformedInput { byte, position }
    }

    /// Generate an `InvalidPair` error from any displayable message.
    pub fn invalid_pair<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::InvalidPair(msg.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
