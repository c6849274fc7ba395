//! Decoding of JSON string literals.
//!
//! Both entry points take the raw token, quotes included, and return `None`
//! when the literal is malformed: missing quotes, a raw control byte or bare
//! quote inside, an unknown escape, or a truncated `\u`. Literals without
//! escapes are returned borrowed.
//!
//! `\uXXXX` escapes are combined into surrogate pairs where possible; an
//! unpaired surrogate decodes to U+FFFD, as do invalid UTF-8 bytes.

use std::borrow::Cow;

use bstr::ByteSlice;

/// Decodes a string literal into text.
#[must_use]
pub fn unquote(raw: &[u8]) -> Option<Cow<'_, str>> {
    let interior = interior(raw)?;
    if !interior.iter().any(|&b| needs_decoding(b)) {
        if let Ok(text) = std::str::from_utf8(interior) {
            return Some(Cow::Borrowed(text));
        }
    }
    let mut out = String::with_capacity(interior.len());
    decode_into(interior, &mut out).then_some(Cow::Owned(out))
}

/// Decodes a string literal into its UTF-8 bytes.
#[must_use]
pub fn unquote_bytes(raw: &[u8]) -> Option<Cow<'_, [u8]>> {
    Some(match unquote(raw)? {
        Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
        Cow::Owned(text) => Cow::Owned(text.into_bytes()),
    })
}

/// The bytes between the quotes, copied verbatim.
pub(crate) fn interior(raw: &[u8]) -> Option<&[u8]> {
    match raw {
        [b'"', inner @ .., b'"'] => Some(inner),
        _ => None,
    }
}

#[inline]
fn needs_decoding(b: u8) -> bool {
    b == b'\\' || b == b'"' || b < 0x20
}

/// Convert a single ASCII hex digit into its 0..=15 value.
#[inline]
fn hex_val(b: u8) -> Option<u16> {
    match b {
        b'0'..=b'9' => Some(u16::from(b - b'0')),
        b'a'..=b'f' => Some(u16::from(b - b'a' + 10)),
        b'A'..=b'F' => Some(u16::from(b - b'A' + 10)),
        _ => None,
    }
}

fn hex4(input: &[u8]) -> Option<u16> {
    input
        .get(..4)?
        .iter()
        .try_fold(0u16, |acc, &b| Some((acc << 4) | hex_val(b)?))
}

fn decode_into(mut rest: &[u8], out: &mut String) -> bool {
    while !rest.is_empty() {
        let plain = rest
            .iter()
            .position(|&b| needs_decoding(b))
            .unwrap_or(rest.len());
        if plain > 0 {
            out.push_str(&rest[..plain].to_str_lossy());
            rest = &rest[plain..];
            continue;
        }
        if rest[0] != b'\\' {
            return false;
        }
        let Some(&escape) = rest.get(1) else {
            return false;
        };
        rest = &rest[2..];
        let ch = match escape {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let Some(unit) = hex4(rest) else {
                    return false;
                };
                rest = &rest[4..];
                decode_utf16(unit, &mut rest)
            }
            _ => return false,
        };
        out.push(ch);
    }
    true
}

/// Resolves one UTF-16 code unit, consuming a following `\uXXXX` low
/// surrogate from `rest` when `unit` is a high surrogate.
fn decode_utf16(unit: u16, rest: &mut &[u8]) -> char {
    match unit {
        0xD800..=0xDBFF => {
            let current: &[u8] = *rest;
            if let [b'\\', b'u', tail @ ..] = current {
                if let Some(low @ 0xDC00..=0xDFFF) = hex4(tail) {
                    *rest = &tail[4..];
                    let code =
                        0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    return char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
                }
            }
            char::REPLACEMENT_CHARACTER
        }
        0xDC00..=0xDFFF => char::REPLACEMENT_CHARACTER,
        _ => char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER),
    }
}
