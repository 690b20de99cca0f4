//! Decoding of constant spellings as they appear in the parse tree.
//!
//! Constants arrive with their source spelling intact (`'A'`, `L"wide"`,
//! `0x1Fu`), so the prefix, quotes and escapes are handled here.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IntegerSuffix {
    L,
    LL,
    U,
    UL,
    ULL,
}

/// Strip integer literal suffix (u, l, ll, ul, ull, etc.)
pub fn strip_integer_suffix(text: &str) -> (&str, Option<IntegerSuffix>) {
    let bytes = text.as_bytes();
    let len = bytes.len();

    if len >= 3 {
        let last3 = (
            bytes[len - 3].to_ascii_lowercase(),
            bytes[len - 2].to_ascii_lowercase(),
            bytes[len - 1].to_ascii_lowercase(),
        );
        if matches!(last3, (b'u', b'l', b'l') | (b'l', b'l', b'u')) {
            return (&text[..len - 3], Some(IntegerSuffix::ULL));
        }
    }

    if len >= 2 {
        let last2 = (bytes[len - 2].to_ascii_lowercase(), bytes[len - 1].to_ascii_lowercase());
        if matches!(last2, (b'u', b'l') | (b'l', b'u')) {
            return (&text[..len - 2], Some(IntegerSuffix::UL));
        } else if matches!(last2, (b'l', b'l')) {
            return (&text[..len - 2], Some(IntegerSuffix::LL));
        }
    }

    if len >= 1 {
        match bytes[len - 1].to_ascii_lowercase() {
            b'u' => return (&text[..len - 1], Some(IntegerSuffix::U)),
            b'l' => return (&text[..len - 1], Some(IntegerSuffix::L)),
            _ => {}
        }
    }

    (text, None)
}

/// Parse C11 integer literal syntax
/// Returns (value, suffix)
pub fn parse_c11_integer_literal(text: &str) -> Result<(u64, Option<IntegerSuffix>), ()> {
    let (number_part, suffix) = strip_integer_suffix(text);

    if number_part == "0" {
        return Ok((0, suffix));
    }

    let (base, digits) = if let Some(hex) = number_part
        .strip_prefix("0x")
        .or_else(|| number_part.strip_prefix("0X"))
    {
        (16, hex)
    } else if let Some(octal) = number_part.strip_prefix('0') {
        (8, octal)
    } else {
        (10, number_part)
    };

    if digits.is_empty() {
        return Err(());
    }

    let mut result: u64 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(base).ok_or(())?;
        result = result.checked_mul(base as u64).ok_or(())?;
        result = result.checked_add(digit as u64).ok_or(())?;
    }

    Ok((result, suffix))
}

/// Unescape C11 string literal content. Fails on an escape that names no
/// Unicode scalar value (a surrogate or anything above `0x10FFFF`).
pub fn unescape_string(s: &str) -> Result<String, ()> {
    if !s.contains('\\') {
        return Ok(s.to_string());
    }

    let mut result = String::with_capacity(s.len());
    unescape_string_into(s, &mut result)?;
    Ok(result)
}

/// Unescape C11 string literal content into a buffer
pub fn unescape_string_into(s: &str, result: &mut String) -> Result<(), ()> {
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some(simple @ ('n' | 't' | 'r' | 'b' | 'f' | 'v' | 'a' | '\\' | '\'' | '"' | '?')) => {
                chars.next();
                result.push(match simple {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    'b' => '\u{0008}',
                    'f' => '\u{000C}',
                    'v' => '\u{000B}',
                    'a' => '\u{0007}',
                    other => other,
                });
            }
            Some('x') => {
                chars.next();
                let mut val: u64 = 0;
                let mut has_digits = false;
                while let Some(digit) = chars.peek().and_then(|ch| ch.to_digit(16)) {
                    val = val.saturating_mul(16).saturating_add(digit as u64);
                    has_digits = true;
                    chars.next();
                }
                if has_digits {
                    let scalar = u32::try_from(val).ok().and_then(char::from_u32).ok_or(())?;
                    result.push(scalar);
                } else {
                    // \x with no digits: keep as written
                    result.push_str("\\x");
                }
            }
            Some(c) if c.is_digit(8) => {
                // up to 3 octal digits
                let mut val = 0u32;
                for _ in 0..3 {
                    match chars.peek().and_then(|ch| ch.to_digit(8)) {
                        Some(digit) => {
                            val = val * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                result.push(char::from_u32(val).ok_or(())?);
            }
            Some(c) => {
                // unknown escape: GCC keeps the character
                result.push(c);
                chars.next();
            }
            None => result.push('\\'),
        }
    }
    Ok(())
}

/// Parse a character literal content (e.g. "a", "\n", "\x41") into a codepoint
pub fn parse_char_literal(s: &str) -> Result<u32, ()> {
    unescape_string(s)?.chars().next().map(|c| c as u32).ok_or(())
}

/// Drop an encoding prefix (`L`, `u`, `U`, `u8`) and the surrounding quotes.
fn strip_quoted(text: &str, quote: char) -> Option<&str> {
    let body = ["u8", "L", "u", "U"]
        .iter()
        .find_map(|prefix| text.strip_prefix(prefix).filter(|rest| rest.starts_with(quote)))
        .unwrap_or(text);
    body.strip_prefix(quote)?.strip_suffix(quote)
}

/// Codepoint of a character constant spelled like `'A'` or `L'\n'`.
pub fn decode_char_constant(text: &str) -> Option<u32> {
    parse_char_literal(strip_quoted(text, '\'')?).ok()
}

/// Contents of a string constant spelled like `"hi"` or `u8"x\ty"`.
pub fn decode_string_constant(text: &str) -> Option<String> {
    strip_quoted(text, '"').and_then(|body| unescape_string(body).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_literals_in_all_bases() {
        assert_eq!(parse_c11_integer_literal("42"), Ok((42, None)));
        assert_eq!(parse_c11_integer_literal("0x1F"), Ok((31, None)));
        assert_eq!(parse_c11_integer_literal("017"), Ok((15, None)));
        assert_eq!(parse_c11_integer_literal("10ul"), Ok((10, Some(IntegerSuffix::UL))));
        assert!(parse_c11_integer_literal("09").is_err());
    }

    #[test]
    fn char_constants() {
        assert_eq!(decode_char_constant("'A'"), Some(65));
        assert_eq!(decode_char_constant("'\\n'"), Some(10));
        assert_eq!(decode_char_constant("L'\\x41'"), Some(65));
        assert_eq!(decode_char_constant("'é'"), Some(0xE9));
        assert_eq!(decode_char_constant("A"), None);
    }

    #[test]
    fn escapes_outside_unicode_are_rejected() {
        assert_eq!(decode_char_constant("'\\x110000'"), None);
        assert_eq!(decode_char_constant("'\\xD800'"), None);
        assert_eq!(decode_string_constant("\"a\\xDFFF\""), None);
        assert_eq!(decode_char_constant("'\\x10FFFF'"), Some(0x10FFFF));
    }

    #[test]
    fn string_constants() {
        assert_eq!(decode_string_constant("\"hi\""), Some("hi".to_string()));
        assert_eq!(decode_string_constant("u8\"a\\tb\""), Some("a\tb".to_string()));
        assert_eq!(decode_string_constant("L\"\\101\""), Some("A".to_string()));
    }
}
