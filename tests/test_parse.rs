use pretty_assertions::assert_eq;
use qs_codec::{Config, Encoding, Error, Pair};

fn pairs(items: &[(&str, Option<&str>)]) -> Vec<Pair> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
        .collect()
}

#[test]
fn parse_keeps_duplicates_in_order() {
    assert_eq!(
        qs_codec::parse(Some("a=1&a=2")).unwrap(),
        pairs(&[("a", Some("1")), ("a", Some("2"))])
    );
    assert_eq!(
        qs_codec::parse(Some("b=1&a=2&b=3&a")).unwrap(),
        pairs(&[("b", Some("1")), ("a", Some("2")), ("b", Some("3")), ("a", None)])
    );
}

#[test]
fn parse_absent_and_empty() {
    assert_eq!(qs_codec::parse(None).unwrap(), vec![]);
    assert_eq!(qs_codec::parse(Some("")).unwrap(), pairs(&[("", None)]));
    assert_eq!(qs_codec::parse(Some("&")).unwrap(), pairs(&[("", None), ("", None)]));
}

#[test]
fn parse_separator_sensitivity() {
    let config = Config::new().separator(";");
    assert_eq!(
        config.parse(Some("a=0;b=0&c=4")).unwrap(),
        pairs(&[("a", Some("0")), ("b", Some("0&c=4"))])
    );
}

#[test]
fn parse_decodes_keys_and_values() {
    assert_eq!(
        qs_codec::parse(Some("k%C3%A9y=v%26lue&%3D=%3D&plus=a+b")).unwrap(),
        pairs(&[("kéy", Some("v&lue")), ("=", Some("=")), ("plus", Some("a+b"))])
    );
}

#[test]
fn parse_leaves_malformed_percent_sequences() {
    assert_eq!(
        qs_codec::parse(Some("a=100%&b=%zz&c=%4")).unwrap(),
        pairs(&[("a", Some("100%")), ("b", Some("%zz")), ("c", Some("%4"))])
    );
}

#[test]
fn parse_form_encoding() {
    let form = Config::new().encoding(Encoding::Rfc1738);
    assert_eq!(
        form.parse(Some("to+to=foo%2bbar")).unwrap(),
        pairs(&[("to to", Some("foo+bar"))])
    );
    assert_eq!(
        form.parse(Some("a=%20+%2B")).unwrap(),
        pairs(&[("a", Some("  +"))])
    );
}

#[test]
fn parse_rejects_control_characters() {
    let err = qs_codec::parse(Some("foo=bar\0")).unwrap_err();
    assert_eq!(err, Error::MalformedInput { byte: 0, position: 7 });

    let err = qs_codec::parse(Some("foo\n=bar")).unwrap_err();
    assert_eq!(err, Error::MalformedInput { byte: b'\n', position: 3 });

    // encoded control characters are fine
    assert_eq!(
        qs_codec::parse(Some("foo=bar%00")).unwrap(),
        pairs(&[("foo", Some("bar\0"))])
    );
}

#[test]
fn parse_rejects_encodings_without_decoding() {
    for encoding in [Encoding::Rfc3987, Encoding::Raw] {
        let err = Config::new().encoding(encoding).parse(Some("a=b")).unwrap_err();
        assert!(matches!(err, Error::UnknownEncoding(_)), "got: {err}");
    }
}

#[test]
fn parse_invalid_utf8() {
    let err = qs_codec::parse(Some("a=%FF")).unwrap_err();
    assert!(matches!(err, Error::Utf8(_)), "got: {err}");
}

#[test]
fn parse_scalar_values() {
    assert_eq!(qs_codec::parse_value(&true).unwrap(), pairs(&[("1", None)]));
    assert_eq!(qs_codec::parse_value(&false).unwrap(), pairs(&[("0", None)]));
    assert_eq!(qs_codec::parse_value(&42).unwrap(), pairs(&[("42", None)]));
    assert_eq!(qs_codec::parse_value(&1.5).unwrap(), pairs(&[("1.5", None)]));
    assert_eq!(qs_codec::parse_value(&None::<String>).unwrap(), vec![]);
    assert_eq!(
        qs_codec::parse_value("a=b&c").unwrap(),
        pairs(&[("a", Some("b")), ("c", None)])
    );
    assert_eq!(
        qs_codec::parse_value(&serde_json::json!("x=1")).unwrap(),
        pairs(&[("x", Some("1"))])
    );
}

#[test]
fn parse_value_type_mismatch() {
    #[derive(serde::Serialize)]
    struct Query {
        a: u8,
    }

    assert_eq!(
        qs_codec::parse_value(&Query { a: 1 }).unwrap_err(),
        Error::TypeMismatch("a struct")
    );
    assert_eq!(
        qs_codec::parse_value(&serde_json::json!(["a=b"])).unwrap_err(),
        Error::TypeMismatch("a sequence")
    );
}

#[test]
fn parse_value_checks_control_characters() {
    let err = qs_codec::parse_value(&String::from("a\u{1f}")).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { byte: 0x1f, .. }), "got: {err}");
}
