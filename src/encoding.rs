//! Percent-encoding rules shared by the parser and the builder.

mod decode;
mod encode;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub use decode::{decode, decode_str, normalize};
pub use encode::encode;

/// The convention used to percent-encode keys and values.
///
/// The parser and the extractor only understand [`Encoding::Rfc3986`] and
/// [`Encoding::Rfc1738`]; the builder accepts all four.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Percent-encode everything outside the unreserved characters and
    /// sub-delimiters. Spaces become `%20`.
    #[default]
    Rfc3986,
    /// `application/x-www-form-urlencoded`: like RFC 3986, but spaces are
    /// written as `+` and a literal `+` is always escaped.
    Rfc1738,
    /// IRI encoding: only control characters, `#` and the separator are
    /// escaped. Non-ASCII text is kept as UTF-8.
    Rfc3987,
    /// No encoding at all.
    Raw,
}

impl Encoding {
    /// Numeric identifiers, compatible with PHP's `PHP_QUERY_RFC1738` and
    /// `PHP_QUERY_RFC3986` constants.
    pub const RAW: u8 = 0;
    pub const RFC1738: u8 = 1;
    pub const RFC3986: u8 = 2;
    pub const RFC3987: u8 = 3;

    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Rfc3986 => "RFC3986",
            Encoding::Rfc1738 => "RFC1738",
            Encoding::Rfc3987 => "RFC3987",
            Encoding::Raw => "RAW",
        }
    }

    /// Whether `+` stands for a space in this encoding.
    pub const fn is_form(self) -> bool {
        matches!(self, Encoding::Rfc1738)
    }

    /// Rejects encodings that cannot be used to decode a query string.
    pub(crate) fn ensure_decodable(self) -> Result<()> {
        match self {
            Encoding::Rfc3986 | Encoding::Rfc1738 => Ok(()),
            Encoding::Rfc3987 | Encoding::Raw => {
                tracing::debug!(encoding = self.name(), "encoding cannot be used for decoding");
                Err(Error::UnknownEncoding(format!(
                    "{} is not supported for decoding query strings",
                    self.name()
                )))
            }
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let encoding = match s.to_ascii_uppercase().as_str() {
            "RFC3986" => Encoding::Rfc3986,
            "RFC1738" | "FORM" => Encoding::Rfc1738,
            "RFC3987" | "IRI" => Encoding::Rfc3987,
            "RAW" => Encoding::Raw,
            _ => return Err(Error::UnknownEncoding(s.to_string())),
        };
        Ok(encoding)
    }
}

impl TryFrom<u8> for Encoding {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            Self::RAW => Ok(Encoding::Raw),
            Self::RFC1738 => Ok(Encoding::Rfc1738),
            Self::RFC3986 => Ok(Encoding::Rfc3986),
            Self::RFC3987 => Ok(Encoding::Rfc3987),
            _ => Err(Error::UnknownEncoding(value.to_string())),
        }
    }
}

/// Which side of a pair is being encoded.
///
/// Keys additionally escape `=` since the first `=` in a pair always ends
/// the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Part {
    Key,
    Value,
}

/// Returns `true` if `bytes` starts with `%` followed by two hex digits.
#[inline]
pub(crate) fn is_triplet(bytes: &[u8]) -> bool {
    matches!(bytes, [b'%', h, l, ..] if h.is_ascii_hexdigit() && l.is_ascii_hexdigit())
}
