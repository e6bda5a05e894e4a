//! Parsing of raw query strings into ordered pairs.

use std::borrow::Cow;

use crate::Pair;
use crate::config::Config;
use crate::encoding::decode_str;
use crate::error::{Error, Result};

/// Parses a query string into its pairs.
///
/// `None` is "no query at all" and yields no pairs, while the empty string is
/// a query with a single empty key: `[("", None)]`.
pub fn parse_query(query: Option<&str>, config: Config<'_>) -> Result<Vec<Pair>> {
    config.encoding.ensure_decodable()?;
    match query {
        None => Ok(Vec::new()),
        Some(query) => parse_str(query, config),
    }
}

/// The parsing work proper, once the encoding has been validated.
pub(crate) fn parse_str(query: &str, config: Config<'_>) -> Result<Vec<Pair>> {
    if let Some(position) = query.bytes().position(|b| b.is_ascii_control()) {
        let byte = query.as_bytes()[position];
        tracing::debug!(position, byte, "rejecting query string with a control character");
        return Err(Error::malformed(byte, position));
    }

    if query.is_empty() {
        return Ok(vec![(String::new(), None)]);
    }

    // form encoding: `+` is a space, and a literal `+` was sent as `%2B`
    let query = if config.encoding.is_form() && query.contains('+') {
        Cow::Owned(query.replace('+', " "))
    } else {
        Cow::Borrowed(query)
    };

    let pairs = tokens(&query, config.separator)
        .into_iter()
        .map(parse_pair)
        .collect::<Result<Vec<_>>>()?;

    tracing::trace!(
        len = query.len(),
        pairs = pairs.len(),
        separator = config.separator,
        encoding = %config.encoding,
        "parsed query string"
    );
    Ok(pairs)
}

/// Splits the query on every occurrence of the separator.
///
/// An empty separator splits the query into single characters.
fn tokens<'qs>(query: &'qs str, separator: &str) -> Vec<&'qs str> {
    if separator.is_empty() {
        query
            .char_indices()
            .map(|(idx, ch)| &query[idx..idx + ch.len_utf8()])
            .collect()
    } else {
        query.split(separator).collect()
    }
}

/// Splits a single token on its first `=` and decodes both sides.
fn parse_pair(token: &str) -> Result<Pair> {
    match token.split_once('=') {
        Some((key, value)) => Ok((
            decode_str(key)?.into_owned(),
            Some(decode_str(value)?.into_owned()),
        )),
        None => Ok((decode_str(token)?.into_owned(), None)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::Encoding;

    use pretty_assertions::assert_eq;

    static DEFAULT_CONFIG: Config<'static> = Config::new().encoding(Encoding::Rfc3986);
    static FORM_ENCODING_CONFIG: Config<'static> = Config::new().encoding(Encoding::Rfc1738);

    fn pairs(items: &[(&str, Option<&str>)]) -> Vec<Pair> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn parse_none() {
        assert_eq!(parse_query(None, DEFAULT_CONFIG).unwrap(), vec![]);
    }

    #[test]
    fn parse_empty() {
        assert_eq!(parse_str("", DEFAULT_CONFIG).unwrap(), pairs(&[("", None)]));
    }

    #[test]
    fn parse_no_value_and_empty_value() {
        assert_eq!(
            parse_str("abc&def=&=ghi&", DEFAULT_CONFIG).unwrap(),
            pairs(&[("abc", None), ("def", Some("")), ("", Some("ghi")), ("", None)])
        );
    }

    #[test]
    fn parse_splits_on_first_equals() {
        assert_eq!(
            parse_str("a=b=c", DEFAULT_CONFIG).unwrap(),
            pairs(&[("a", Some("b=c"))])
        );
    }

    #[test]
    fn parse_keeps_brackets() {
        assert_eq!(
            parse_str("a[b]=1&a%5Bc%5D=2", DEFAULT_CONFIG).unwrap(),
            pairs(&[("a[b]", Some("1")), ("a[c]", Some("2"))])
        );
    }

    #[test]
    fn parse_form_encoding() {
        assert_eq!(
            parse_str("to+to=foo%2bbar", FORM_ENCODING_CONFIG).unwrap(),
            pairs(&[("to to", Some("foo+bar"))])
        );
        assert_eq!(
            parse_str("to+to=foo%2bbar", DEFAULT_CONFIG).unwrap(),
            pairs(&[("to+to", Some("foo+bar"))])
        );
    }

    #[test]
    fn parse_multichar_separator() {
        assert_eq!(
            parse_str("a=1&amp;b=2", DEFAULT_CONFIG.separator("&amp;")).unwrap(),
            pairs(&[("a", Some("1")), ("b", Some("2"))])
        );
    }

    #[test]
    fn parse_empty_separator() {
        assert_eq!(
            parse_str("a=é", DEFAULT_CONFIG.separator("")).unwrap(),
            pairs(&[("a", None), ("", Some("")), ("é", None)])
        );
    }

    #[test]
    fn parse_control_characters() {
        let err = parse_str("foo=bar\u{7f}", DEFAULT_CONFIG).unwrap_err();
        assert_eq!(err, Error::MalformedInput { byte: 0x7f, position: 7 });
    }

    #[test]
    fn parse_unknown_encoding_first() {
        // the encoding is validated before the input
        let err = parse_query(Some("a\0"), DEFAULT_CONFIG.encoding(Encoding::Raw)).unwrap_err();
        assert!(matches!(err, Error::UnknownEncoding(_)), "got: {err}");
    }

    #[test]
    fn parse_invalid_utf8() {
        let err = parse_str("a=%C3%28", DEFAULT_CONFIG).unwrap_err();
        assert!(matches!(err, Error::Utf8(_)), "got: {err}");
    }
}
