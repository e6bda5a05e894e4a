use serde::Serialize;

use crate::error::Result;
use crate::scalar::Scalar;
use crate::value::NestedMap;
use crate::{Encoding, Pair};

/// Configuration for parsing, building and extracting query strings.
///
/// A `Config` holds the pair separator, the percent-encoding rule, and the
/// array format used when flattening nested values back into pairs.
///
/// Default values: `separator = "&"`, `encoding = Encoding::Rfc3986` (or
/// `Encoding::Rfc1738` with the `default_to_form_encoding` feature),
/// `array_format = ArrayFormat::Indexed`.
///
/// ```
/// use qs_codec::{Config, Encoding};
///
/// let config = Config::new().separator(";").encoding(Encoding::Rfc1738);
/// let pairs = config.parse(Some("a=b+c;d")).unwrap();
/// assert_eq!(
///     pairs,
///     vec![("a".to_string(), Some("b c".to_string())), ("d".to_string(), None)]
/// );
/// assert_eq!(config.build(pairs).as_deref(), Some("a=b+c;d"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config<'s> {
    pub(crate) separator: &'s str,
    pub(crate) encoding: Encoding,
    pub(crate) array_format: ArrayFormat,
}

/// How list entries of a [`NestedMap`] are written by
/// [`Config::build_nested`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayFormat {
    /// Use the `a[0]=1&a[1]=2` format.
    Indexed,
    /// Use the `a[]=1&a[]=2` format.
    EmptyIndexed,
    /// Use the `a=1&a=2` format.
    Unindexed,
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s> Config<'s> {
    pub const fn new() -> Self {
        Self {
            separator: "&",
            encoding: if cfg!(feature = "default_to_form_encoding") {
                Encoding::Rfc1738
            } else {
                Encoding::Rfc3986
            },
            array_format: ArrayFormat::Indexed,
        }
    }

    /// The string delimiting pairs. Default is `&`.
    ///
    /// The separator may be longer than one character (e.g. `&amp;`). When
    /// building, every character of its HTML-decoded form, and every
    /// non-alphanumeric character of the separator itself, is percent-encoded
    /// inside keys and values.
    ///
    /// Only these HTML entities are decoded: `&amp;`, `&semi;`, `&lt;`,
    /// `&gt;`, `&quot;`, `&apos;`, `&verbar;`/`&vert;`, `&comma;`, `&colon;`
    /// and numeric references (`&#59;`, `&#x3B;`). Any other entity is taken
    /// as its raw characters.
    ///
    /// Escapes are written with uppercase hex digits, so separators
    /// containing `%`, a digit or one of `A`-`F` clash with them and cannot
    /// be parsed back reliably.
    pub const fn separator(mut self, separator: &'s str) -> Self {
        self.separator = separator;
        self
    }

    /// The percent-encoding rule. Default is [`Encoding::Rfc3986`].
    ///
    /// Only [`Encoding::Rfc3986`] and [`Encoding::Rfc1738`] can be used to
    /// parse or extract; the other rules fail with
    /// [`Error::UnknownEncoding`](crate::Error::UnknownEncoding).
    pub const fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Specifies how lists are written by [`Config::build_nested`].
    ///
    /// The default is `Indexed`, which results in keys like `a[0]=1&a[1]=2`.
    pub const fn array_format(mut self, array_format: ArrayFormat) -> Self {
        self.array_format = array_format;
        self
    }

    pub const fn get_separator(&self) -> &'s str {
        self.separator
    }

    pub const fn get_encoding(&self) -> Encoding {
        self.encoding
    }

    /// Parses a query string into ordered pairs using this `Config`.
    pub fn parse(self, query: Option<&str>) -> Result<Vec<Pair>> {
        crate::parse::parse_query(query, self)
    }

    /// Parses any scalar-like value as a query string using this `Config`.
    ///
    /// Booleans become `"1"`/`"0"`, numbers their decimal form, `None` and
    /// `()` mean "no query". Anything else fails with
    /// [`Error::TypeMismatch`](crate::Error::TypeMismatch).
    pub fn parse_value<T>(self, query: &T) -> Result<Vec<Pair>>
    where
        T: Serialize + ?Sized,
    {
        self.encoding.ensure_decodable()?;
        let query = crate::ser::query_input(query)?;
        crate::parse::parse_query(query.as_deref(), self)
    }

    /// Builds a query string from ordered pairs using this `Config`.
    pub fn build<'a, I, K, V>(self, pairs: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<Scalar<'a>>,
        V: Into<Scalar<'a>>,
    {
        crate::build::build_query(pairs, self)
    }

    /// Builds a query string from a loosely-typed list of pairs using this
    /// `Config`.
    ///
    /// Every element must serialize as a sequence of exactly two scalars,
    /// the second of which may be `None`. Other shapes fail with
    /// [`Error::InvalidPair`](crate::Error::InvalidPair).
    pub fn build_value<T>(self, pairs: &T) -> Result<Option<String>>
    where
        T: Serialize + ?Sized,
    {
        let mut writer = crate::build::PairWriter::new(self);
        crate::ser::write_pairs(pairs, &mut writer)?;
        Ok(writer.finish())
    }

    /// Parses a query string into nested values using this `Config`.
    pub fn extract(self, query: Option<&str>) -> Result<NestedMap> {
        crate::extract::extract_query(query, self)
    }

    /// Flattens nested values into bracket-path pairs and builds them using
    /// this `Config`.
    pub fn build_nested(self, values: &NestedMap) -> Option<String> {
        self.build(values.to_pairs(self.array_format))
    }
}
