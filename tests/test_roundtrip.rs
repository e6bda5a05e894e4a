use pretty_assertions::assert_eq;
use qs_codec::encoding::{Part, decode_str, encode};
use qs_codec::{Config, Encoding, Pair};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Characters that exercise every escaping rule: separators, `=`, `+`,
/// `%` (alone and as part of triplets), brackets, controls and non-ASCII.
const ALPHABET: &[char] = &[
    'a', 'b', 'x', 'Z', '0', '2', 'F', ' ', '+', '%', '&', '=', ';', '~', '.', '-', '_', '[', ']',
    '#', '/', '?', '|', '\t', '\u{7f}', 'é', '€', '🦀',
];

fn random_string(rng: &mut StdRng) -> String {
    let len = rng.random_range(0..12);
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect()
}

fn random_pairs(rng: &mut StdRng) -> Vec<Pair> {
    let len = rng.random_range(1..6);
    (0..len)
        .map(|_| {
            let key = random_string(rng);
            let value = rng.random_bool(0.8).then(|| random_string(rng));
            (key, value)
        })
        .collect()
}

/// macro for testing that building and then parsing gives the pairs back
///
/// This is a macro so that failures point at the test that owns the data
macro_rules! roundtrip_test {
    (
        $pairs:expr
    ) => {
        let pairs: Vec<Pair> = $pairs;

        for separator in ["&", ";", "&amp;", "|", "::", "x", "and"] {
            for encoding in [Encoding::Rfc3986, Encoding::Rfc1738] {
                let config = Config::new().separator(separator).encoding(encoding);
                let built = config.build(pairs.clone());
                let parsed = config.parse(built.as_deref()).expect("parse");

                // check we get the same pairs back
                assert_eq!(pairs, parsed, "separator {separator:?}, {encoding}: {built:?}");
            }
        }
    };
}

fn owned(items: &[(&str, Option<&str>)]) -> Vec<Pair> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
        .collect()
}

#[test]
fn simple_pairs() {
    roundtrip_test!(owned(&[("a", Some("1")), ("b", Some("2"))]));
}

#[test]
fn duplicates_and_flags() {
    roundtrip_test!(owned(&[("a", Some("1")), ("flag", None), ("a", Some("")), ("", None)]));
}

#[test]
fn reserved_characters() {
    roundtrip_test!(owned(&[
        ("a=b", Some("c=d")),
        ("x&y;z", Some("1+1 = 2")),
        ("100%", Some("%41%zz%")),
        ("to to", Some("foo+bar")),
    ]));
}

#[test]
fn bracket_keys() {
    roundtrip_test!(owned(&[("user[name]", Some("Ann")), ("user[tags][]", Some("x"))]));
}

#[test]
fn unicode() {
    roundtrip_test!(owned(&[("clé", Some("été")), ("🦀", Some("€ 5"))]));
}

#[test]
fn no_pairs() {
    roundtrip_test!(Vec::new());
}

#[test]
fn coerced_scalars() {
    let built = qs_codec::build([(true, None::<bool>), (false, Some(true))]);
    assert_eq!(qs_codec::parse(built.as_deref()).unwrap(), owned(&[("1", None), ("0", Some("1"))]));

    let built = qs_codec::build([(1.0, Some(-0.25)), (1e21, None)]);
    assert_eq!(
        qs_codec::parse(built.as_deref()).unwrap(),
        owned(&[("1", Some("-0.25")), ("1e21", None)])
    );
}

#[test]
fn random_pairs_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..500 {
        roundtrip_test!(random_pairs(&mut rng));
    }
}

#[test]
fn decode_inverts_encode() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..2000 {
        let input = random_string(&mut rng);
        for encoding in [Encoding::Rfc3986, Encoding::Rfc3987] {
            for part in [Part::Key, Part::Value] {
                let encoded = encode(&input, encoding, "&", part);
                assert_eq!(decode_str(&encoded).unwrap(), input, "{encoding}: {encoded}");
            }
        }
    }
}

#[test]
fn built_queries() {
    let pairs = owned(&[("q", Some("rust lang")), ("tags[]", Some("a&b")), ("flag", None)]);

    insta::assert_snapshot!(
        Config::new().build(pairs.clone()).unwrap(),
        @"q=rust%20lang&tags%5B%5D=a%26b&flag"
    );
    insta::assert_snapshot!(
        Config::new().encoding(Encoding::Rfc1738).build(pairs.clone()).unwrap(),
        @"q=rust+lang&tags%5B%5D=a%26b&flag"
    );
    insta::assert_snapshot!(
        Config::new().encoding(Encoding::Rfc3987).separator(";").build(pairs).unwrap(),
        @"q=rust lang;tags[]=a&b;flag"
    );
}
