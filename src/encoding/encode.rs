use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, percent_encode, percent_encode_byte};

use super::{Encoding, Part, is_triplet};

/// RFC 3986 values: everything but the unreserved characters and the
/// sub-delimiters `!$'()*+,;=:@?/&%` is escaped.
const RFC3986_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'-')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'$')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@')
    .remove(b'?')
    .remove(b'/')
    .remove(b'&')
    .remove(b'%');

const RFC3986_KEY_SET: &AsciiSet = &RFC3986_VALUE_SET.add(b'=');

/// Form encoding reserves `+` for spaces. Spaces are escaped as `%20` and
/// then written as `+`.
const RFC1738_VALUE_SET: &AsciiSet = &RFC3986_VALUE_SET.add(b'+').add(b'~');

const RFC1738_KEY_SET: &AsciiSet = &RFC1738_VALUE_SET.add(b'=');

/// IRI encoding only escapes control characters and the fragment delimiter.
const RFC3987_VALUE_SET: &AsciiSet = &CONTROLS.add(b'#');

const RFC3987_KEY_SET: &AsciiSet = &RFC3987_VALUE_SET.add(b'=');

/// ASCII bytes escaped on top of a static set, computed per call from the
/// separator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Reserved(u128);

impl Reserved {
    const fn add(self, byte: u8) -> Self {
        if byte.is_ascii() {
            Reserved(self.0 | 1u128 << byte)
        } else {
            self
        }
    }

    const fn contains(self, byte: u8) -> bool {
        byte.is_ascii() && self.0 & (1u128 << byte) != 0
    }
}

/// The bytes that could be mistaken for the separator once written out.
///
/// Every byte of the HTML-decoded separator is reserved. Alphanumeric bytes
/// of the raw separator that only appear inside an entity (the `amp` of
/// `&amp;`) are not: the entity starts with a reserved `&`.
fn reserved_for(separator: &str, decoded_separator: &str) -> Reserved {
    let decoded = decoded_separator
        .bytes()
        .fold(Reserved::default(), Reserved::add);
    separator
        .bytes()
        .filter(|b| !b.is_ascii_alphanumeric())
        .fold(decoded, Reserved::add)
}

/// Percent-encodes a key or a value.
///
/// The separator is always removed from the characters left unescaped, so
/// that the output can never be split in the wrong place. A literal `%` is
/// escaped whenever the input contains something that would otherwise be
/// decoded as a `%XX` triplet, which keeps `decode(encode(x)) == x`.
///
/// [`Encoding::Raw`] returns the input as is.
pub fn encode<'a>(input: &'a str, encoding: Encoding, separator: &str, part: Part) -> Cow<'a, str> {
    let set = match (encoding, part) {
        (Encoding::Raw, _) => return Cow::Borrowed(input),
        (Encoding::Rfc3986, Part::Key) => RFC3986_KEY_SET,
        (Encoding::Rfc3986, Part::Value) => RFC3986_VALUE_SET,
        (Encoding::Rfc1738, Part::Key) => RFC1738_KEY_SET,
        (Encoding::Rfc1738, Part::Value) => RFC1738_VALUE_SET,
        (Encoding::Rfc3987, Part::Key) => RFC3987_KEY_SET,
        (Encoding::Rfc3987, Part::Value) => RFC3987_VALUE_SET,
    };

    let decoded_separator = html_decode(separator);
    let mut reserved = reserved_for(separator, &decoded_separator);
    let bytes = input.as_bytes();
    if (0..bytes.len()).any(|idx| is_triplet(&bytes[idx..])) {
        reserved = reserved.add(b'%');
    }

    if bytes
        .iter()
        .all(|b| (b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_')) && !reserved.contains(*b))
    {
        // nothing to escape in any encoding
        return Cow::Borrowed(input);
    }

    let keep_unicode = encoding == Encoding::Rfc3987;
    let form = encoding.is_form();
    let mut encoded = String::with_capacity(input.len() + input.len() / 2);
    let mut last_segment = 0;

    for (idx, ch) in input.char_indices() {
        let escape = if ch.is_ascii() {
            reserved.contains(ch as u8)
        } else {
            keep_unicode && (separator.contains(ch) || decoded_separator.contains(ch))
        };
        // the static sets escape non-ASCII bytes, except in IRIs
        let pass_through = keep_unicode && !ch.is_ascii() && !escape;
        if !escape && !pass_through {
            continue;
        }

        push_encoded(&mut encoded, &input[last_segment..idx], set, form);
        if escape {
            let mut buffer = [0; 4];
            for b in ch.encode_utf8(&mut buffer).bytes() {
                encoded.push_str(percent_encode_byte(b));
            }
        } else {
            // non-ASCII text passes through in IRIs
            encoded.push(ch);
        }
        last_segment = idx + ch.len_utf8();
    }
    push_encoded(&mut encoded, &input[last_segment..], set, form);

    Cow::Owned(encoded)
}

fn push_encoded(output: &mut String, segment: &str, set: &'static AsciiSet, form: bool) {
    for chunk in percent_encode(segment.as_bytes(), set) {
        if form && chunk == "%20" {
            output.push('+');
        } else {
            output.push_str(chunk);
        }
    }
}

/// Decodes the handful of HTML entities a separator is likely to be written
/// with (`&amp;`, `&semi;`, numeric references, ...).
fn html_decode(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut decoded = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match candidate.find(';').and_then(|end| Some((entity(&candidate[1..end])?, end))) {
            Some((ch, end)) => {
                decoded.push(ch);
                rest = &candidate[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = &candidate[1..];
            }
        }
    }
    decoded.push_str(rest);
    Cow::Owned(decoded)
}

fn entity(name: &str) -> Option<char> {
    match name {
        "amp" | "AMP" => Some('&'),
        "semi" => Some(';'),
        "lt" | "LT" => Some('<'),
        "gt" | "GT" => Some('>'),
        "quot" | "QUOT" => Some('"'),
        "apos" => Some('\''),
        "verbar" | "vert" => Some('|'),
        "comma" => Some(','),
        "colon" => Some(':'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
