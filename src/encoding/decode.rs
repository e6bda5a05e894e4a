use std::borrow::Cow;

use crate::error::Result;

use super::is_triplet;

#[inline(always)]
fn char_to_digit(c: u8) -> u8 {
    // only called on bytes already checked by `is_triplet`
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => c - b'A' + 10,
    }
}

#[inline(always)]
fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

/// Decodes every well-formed `%XX` triplet in the input.
///
/// Malformed or truncated sequences (`%`, `%4`, `%zz`) are copied through
/// untouched. `+` is *not* treated as a space here: form decoding applies
/// that substitution to the whole query before splitting.
///
/// Borrows the input when it contains no `%`.
pub fn decode(input: &[u8]) -> Cow<'_, [u8]> {
    if !input.contains(&b'%') {
        return Cow::Borrowed(input);
    }

    let mut decoded = Vec::with_capacity(input.len());
    let mut last_segment = 0;
    let mut idx = 0;

    while idx < input.len() {
        if is_triplet(&input[idx..]) {
            decoded.extend_from_slice(&input[last_segment..idx]);
            decoded.push(char_to_digit(input[idx + 1]) * 0x10 + char_to_digit(input[idx + 2]));
            idx += 3;
            last_segment = idx;
        } else {
            idx += 1;
        }
    }

    decoded.extend_from_slice(&input[last_segment..]);
    Cow::Owned(decoded)
}

/// Percent-decodes a string, failing if the decoded bytes are not UTF-8.
pub fn decode_str(input: &str) -> Result<Cow<'_, str>> {
    Ok(match decode(input.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(input),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8(bytes).map_err(|e| e.utf8_error())?),
    })
}

/// Canonicalizes the percent-encoded triplets of a string.
///
/// A triplet encoding an unreserved character (`A-Z a-z 0-9 - . _ ~`) is
/// replaced by that character. Every other well-formed triplet is rewritten
/// with uppercase hex digits. Everything else is left as is, so applying
/// this twice gives the same result as applying it once.
pub fn normalize(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    if !bytes.contains(&b'%') {
        return Cow::Borrowed(input);
    }

    let mut normalized = String::with_capacity(input.len());
    let mut last_segment = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        if is_triplet(&bytes[idx..]) {
            normalized.push_str(&input[last_segment..idx]);
            let byte = char_to_digit(bytes[idx + 1]) * 0x10 + char_to_digit(bytes[idx + 2]);
            if is_unreserved(byte) {
                normalized.push(byte as char);
            } else {
                normalized.push_str(percent_encoding::percent_encode_byte(byte));
            }
            idx += 3;
            last_segment = idx;
        } else {
            idx += 1;
        }
    }

    normalized.push_str(&input[last_segment..]);
    Cow::Owned(normalized)
}
