//! Ordered key/value pairs for URI query strings
//!
//! Query strings are not formally defined. This library takes the
//! conservative view that a query string is an *ordered list of pairs*:
//! keys may repeat, a key may come without a value (`flag` is not the same
//! as `flag=`), and the order of the pairs matters.
//!
//! Three operations are provided:
//!
//! - [`parse`]: raw query string → `Vec<(String, Option<String>)>`,
//! - [`build`]: pairs → query string,
//! - [`extract`]: raw query string → nested values, following the
//!   `a[b][]=c` bracket syntax of PHP's `parse_str` (without renaming keys
//!   that contain dots or spaces).
//!
//! The separator and the percent-encoding rule ([`Encoding`]) are set on a
//! [`Config`]. The free functions use the defaults: `&` and RFC 3986.
//!
//! ## Usage
//!
//! ```
//! use qs_codec::{Config, Encoding};
//!
//! let pairs = qs_codec::parse(Some("a=1&a=2&flag&name=J%C3%B6rg")).unwrap();
//! assert_eq!(
//!     pairs,
//!     vec![
//!         ("a".to_string(), Some("1".to_string())),
//!         ("a".to_string(), Some("2".to_string())),
//!         ("flag".to_string(), None),
//!         ("name".to_string(), Some("Jörg".to_string())),
//!     ]
//! );
//! assert_eq!(
//!     qs_codec::build(pairs).as_deref(),
//!     Some("a=1&a=2&flag&name=J%C3%B6rg")
//! );
//!
//! // form encoding
//! let form = Config::new().encoding(Encoding::Rfc1738);
//! assert_eq!(
//!     form.build([("to to", Some("foo+bar"))]).as_deref(),
//!     Some("to+to=foo%2Bbar")
//! );
//!
//! // bracket paths
//! let values = qs_codec::extract(Some("foo[]=bar&foo[]=baz&a.b=c")).unwrap();
//! assert_eq!(
//!     serde_json::to_value(&values).unwrap(),
//!     serde_json::json!({"foo": ["bar", "baz"], "a.b": "c"})
//! );
//! ```
//!
//! ## Loosely-typed inputs
//!
//! [`parse_value`] and [`build_value`] accept anything implementing
//! `serde::Serialize` and check its shape at runtime, which is handy for
//! data coming from JSON and the like:
//!
//! ```
//! use serde_json::json;
//!
//! assert_eq!(
//!     qs_codec::build_value(&json!([["a", 1], ["b", null], ["c", true]])).unwrap().as_deref(),
//!     Some("a=1&b&c=1")
//! );
//! assert!(qs_codec::build_value(&json!([["foo", {"boo": "bar"}]])).is_err());
//! assert_eq!(
//!     qs_codec::parse_value(&true).unwrap(),
//!     vec![("1".to_string(), None)]
//! );
//! ```

mod build;
mod config;
pub mod encoding;
mod error;
mod extract;
mod parse;
mod scalar;
mod ser;
mod value;

use serde::Serialize;

#[doc(inline)]
pub use config::{ArrayFormat, Config};
#[doc(inline)]
pub use encoding::Encoding;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use extract::convert;
#[doc(inline)]
pub use scalar::Scalar;
#[doc(inline)]
pub use value::{NestedMap, NestedValue};

/// A single `key=value` unit of a query string.
///
/// The value is `None` when the key appears without `=`.
pub type Pair = (String, Option<String>);

/// Parses a query string into ordered pairs, splitting on `&` and decoding
/// with RFC 3986 rules.
///
/// ```
/// assert_eq!(qs_codec::parse(None).unwrap(), vec![]);
/// assert_eq!(qs_codec::parse(Some("")).unwrap(), vec![(String::new(), None)]);
/// ```
pub fn parse(query: Option<&str>) -> Result<Vec<Pair>> {
    Config::default().parse(query)
}

/// Parses a scalar value (string, number, boolean or nothing) as a query
/// string.
pub fn parse_value<T>(query: &T) -> Result<Vec<Pair>>
where
    T: Serialize + ?Sized,
{
    Config::default().parse_value(query)
}

/// Builds a query string from ordered pairs, joined with `&` and encoded
/// with RFC 3986 rules.
///
/// Returns `None` when there are no pairs at all.
///
/// ```
/// assert_eq!(
///     qs_codec::build([("a", Some(1)), ("b", None), ("c d", Some(2))]).as_deref(),
///     Some("a=1&b&c%20d=2")
/// );
/// assert_eq!(qs_codec::build(Vec::<(&str, Option<&str>)>::new()), None);
/// ```
pub fn build<'a, I, K, V>(pairs: I) -> Option<String>
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: Into<Scalar<'a>>,
    V: Into<Scalar<'a>>,
{
    Config::default().build(pairs)
}

/// Builds a query string from a loosely-typed list of pairs.
pub fn build_value<T>(pairs: &T) -> Result<Option<String>>
where
    T: Serialize + ?Sized,
{
    Config::default().build_value(pairs)
}

/// Parses a query string into nested values.
pub fn extract(query: Option<&str>) -> Result<NestedMap> {
    Config::default().extract(query)
}
