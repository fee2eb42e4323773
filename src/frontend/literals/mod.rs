//! Value helpers for Beef string and character literal tokens.

mod escape;

pub use escape::{LiteralError, LiteralErrorKind, decode_escape, escape_len};

/// Delimiter style of a string literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringLiteralKind {
    Regular,
    Verbatim,
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedString {
    pub kind: StringLiteralKind,
    pub value: String,
    /// The literal carried a `u8` suffix.
    pub utf8: bool,
    pub errors: Vec<LiteralError>,
}

/// Decode the value of a complete string literal lexeme, delimiters included.
///
/// Accepts `"..."`, `@"..."` and `"""..."""` forms with an optional `u8`
/// suffix. Unterminated lexemes decode up to the end of the text.
#[must_use]
pub fn decode_string_literal(lexeme: &str) -> DecodedString {
    let (body, utf8) = match lexeme
        .strip_suffix("u8")
        .or_else(|| lexeme.strip_suffix("U8"))
    {
        Some(body) => (body, true),
        None => (lexeme, false),
    };
    if let Some(rest) = body.strip_prefix('@') {
        let inner = strip_quotes(rest, 1);
        return DecodedString {
            kind: StringLiteralKind::Verbatim,
            value: inner.replace("\"\"", "\""),
            utf8,
            errors: Vec::new(),
        };
    }
    let fence = body.bytes().take_while(|byte| *byte == b'"').count();
    if fence >= 3 {
        return DecodedString {
            kind: StringLiteralKind::Raw,
            value: raw_string_content(strip_quotes(body, fence)),
            utf8,
            errors: Vec::new(),
        };
    }
    let inner = strip_quotes(body, 1);
    let (value, errors) = decode_escaped(inner);
    DecodedString {
        kind: StringLiteralKind::Regular,
        value,
        utf8,
        errors,
    }
}

/// Decode a regular string body, collecting escape errors.
#[must_use]
pub fn decode_escaped(body: &str) -> (String, Vec<LiteralError>) {
    let mut value = String::with_capacity(body.len());
    let mut errors = Vec::new();
    let mut index = 0;
    while let Some(ch) = body[index..].chars().next() {
        if ch != '\\' {
            value.push(ch);
            index += ch.len_utf8();
            continue;
        }
        match decode_escape(body, index) {
            Ok((code, len)) => {
                value.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                index += len;
            }
            Err(error) => {
                index += error.length.max(1);
                errors.push(error);
            }
        }
    }
    (value, errors)
}

/// Value of a raw string body.
///
/// A multi-line body whose first and last lines are blank drops those lines
/// and removes the closing line's indentation from every remaining line.
#[must_use]
pub fn raw_string_content(body: &str) -> String {
    let Some(first_break) = body.find('\n') else {
        return body.to_string();
    };
    let Some(last_break) = body.rfind('\n') else {
        return body.to_string();
    };
    let first_line = &body[..first_break];
    let last_line = &body[last_break + 1..];
    if first_break == last_break
        || !first_line.trim().is_empty()
        || !last_line.trim().is_empty()
    {
        return body.to_string();
    }
    let indent = last_line;
    let inner = &body[first_break + 1..last_break];
    let inner = inner.strip_suffix('\r').unwrap_or(inner);
    inner
        .split('\n')
        .map(|line| line.strip_prefix(indent).unwrap_or(line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode a character literal lexeme such as `'a'` or `'\n'`.
#[must_use]
pub fn decode_char_literal(lexeme: &str) -> Option<char> {
    let inner = lexeme.strip_prefix('\'')?.strip_suffix('\'')?;
    if inner.starts_with('\\') {
        let (code, len) = decode_escape(inner, 0).ok()?;
        return (len == inner.len()).then(|| char::from_u32(code)).flatten();
    }
    let mut chars = inner.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}

fn strip_quotes(text: &str, width: usize) -> &str {
    let open = text.bytes().take_while(|byte| *byte == b'"').count().min(width);
    let text = &text[open..];
    let close = text
        .bytes()
        .rev()
        .take_while(|byte| *byte == b'"')
        .count()
        .min(width);
    &text[..text.len() - close]
}
