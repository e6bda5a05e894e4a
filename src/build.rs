//! Serialization of ordered pairs into query strings.

use crate::config::Config;
use crate::encoding::{Part, encode};
use crate::scalar::Scalar;

/// Builds a query string from `(key, value)` pairs.
///
/// A `None` value writes the bare key. No pairs at all gives `None`, which
/// is distinct from the empty query `Some("")` built from `[("", None)]`.
pub fn build_query<'a, I, K, V>(pairs: I, config: Config<'_>) -> Option<String>
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: Into<Scalar<'a>>,
    V: Into<Scalar<'a>>,
{
    let mut writer = PairWriter::new(config);
    for (key, value) in pairs {
        let key = key.into();
        let value = value.map(Into::into);
        writer.write_pair(&key.to_query_string(), value.as_ref().map(Scalar::to_query_string).as_deref());
    }
    writer.finish()
}

/// Accumulates encoded pairs.
///
/// Keeps track of whether a pair was written at all, so that an empty
/// input can be told apart from a single empty key.
pub(crate) struct PairWriter<'c> {
    output: String,
    first_kv: bool,
    config: Config<'c>,
}

impl<'c> PairWriter<'c> {
    pub(crate) fn new(config: Config<'c>) -> Self {
        // initialize the buffer with 128 bytes
        // this is a guess based on what `serde_json` does
        Self {
            output: String::with_capacity(128),
            first_kv: true,
            config,
        }
    }

    pub(crate) fn write_pair(&mut self, key: &str, value: Option<&str>) {
        if self.first_kv {
            self.first_kv = false;
        } else {
            self.output.push_str(self.config.separator);
        }

        self.output
            .push_str(&encode(key, self.config.encoding, self.config.separator, Part::Key));
        if let Some(value) = value {
            self.output.push('=');
            self.output
                .push_str(&encode(value, self.config.encoding, self.config.separator, Part::Value));
        }
    }

    pub(crate) fn finish(self) -> Option<String> {
        if self.first_kv {
            tracing::trace!("no pairs to build");
            return None;
        }
        tracing::trace!(
            len = self.output.len(),
            encoding = %self.config.encoding,
            "built query string"
        );
        Some(self.output)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::Encoding;

    use pretty_assertions::assert_eq;

    static DEFAULT_CONFIG: Config<'static> = Config::new().encoding(Encoding::Rfc3986);

    #[test]
    fn build_empty() {
        let pairs: Vec<(&str, Option<&str>)> = vec![];
        assert_eq!(build_query(pairs, DEFAULT_CONFIG), None);
    }

    #[test]
    fn build_empty_key() {
        assert_eq!(build_query([("", None::<&str>)], DEFAULT_CONFIG).as_deref(), Some(""));
    }

    #[test]
    fn build_pairs_in_order() {
        let built = build_query(
            [("a", Some("1")), ("b", None), ("a", Some("2")), ("c", Some(""))],
            DEFAULT_CONFIG,
        );
        assert_eq!(built.as_deref(), Some("a=1&b&a=2&c="));
    }

    #[test]
    fn build_scalars() {
        let built = build_query(
            [
                (Scalar::from("flag"), Some(Scalar::from(true))),
                (Scalar::from(3u8), Some(Scalar::from(-1.5f64))),
                (Scalar::from(false), None),
            ],
            DEFAULT_CONFIG,
        );
        assert_eq!(built.as_deref(), Some("flag=1&3=-1.5&0"));
    }

    #[test]
    fn build_escapes_structure() {
        let built = build_query([("a=b", Some("c=d&e"))], DEFAULT_CONFIG);
        assert_eq!(built.as_deref(), Some("a%3Db=c=d%26e"));

        let built = build_query([("a", Some("b;c&d"))], DEFAULT_CONFIG.separator(";"));
        assert_eq!(built.as_deref(), Some("a=b%3Bc&d"));
    }

    #[test]
    fn build_form_encoding() {
        let built = build_query(
            [("to to", Some("foo+bar"))],
            DEFAULT_CONFIG.encoding(Encoding::Rfc1738),
        );
        assert_eq!(built.as_deref(), Some("to+to=foo%2Bbar"));
    }

    #[test]
    fn build_raw() {
        let built = build_query([("a b", Some("c+d %zz"))], DEFAULT_CONFIG.encoding(Encoding::Raw));
        assert_eq!(built.as_deref(), Some("a b=c+d %zz"));
    }

    #[test]
    fn build_iri() {
        let built = build_query(
            [("clé", Some("été #1"))],
            DEFAULT_CONFIG.encoding(Encoding::Rfc3987),
        );
        assert_eq!(built.as_deref(), Some("clé=été %231"));
    }
}
