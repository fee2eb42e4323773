/// Error produced when decoding a literal escape sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub kind: LiteralErrorKind,
    /// Byte offset of the backslash within the scanned text.
    pub offset: usize,
    /// Length of the offending fragment in bytes.
    pub length: usize,
}

impl LiteralError {
    #[must_use]
    pub fn new(kind: LiteralErrorKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            LiteralErrorKind::UnexpectedEnd => "escape sequence is cut off by the end of input".into(),
            LiteralErrorKind::InvalidEscape(ch) => format!("unknown escape sequence `\\{ch}`"),
            LiteralErrorKind::InvalidHexDigit(ch) => {
                format!("invalid hexadecimal digit `{ch}` in escape sequence")
            }
            LiteralErrorKind::InvalidUnicodeLen { expected, actual } => format!(
                "unicode escape expects {expected} hexadecimal digits, found {actual}"
            ),
            LiteralErrorKind::InvalidCodepoint(value) => {
                format!("escape sequence value U+{value:X} is not a valid code point")
            }
            LiteralErrorKind::MissingHexDigits => "`\\x` escape requires at least one hexadecimal digit".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralErrorKind {
    UnexpectedEnd,
    InvalidEscape(char),
    InvalidHexDigit(char),
    InvalidUnicodeLen { expected: usize, actual: usize },
    InvalidCodepoint(u32),
    MissingHexDigits,
}

/// Single-character escapes after a backslash.
fn decode_basic_escape(marker: char) -> Option<char> {
    Some(match marker {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'e' => '\u{1B}',
        'f' => '\u{0C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0B}',
        '\'' => '\'',
        '"' => '"',
        '\\' => '\\',
        '?' => '?',
        '0' => '\0',
        _ => return None,
    })
}

/// Decode the escape sequence starting with the backslash at `start`.
///
/// Returns the decoded code point and the number of bytes consumed. On
/// failure the error still reports how far the malformed sequence extends.
pub fn decode_escape(text: &str, start: usize) -> Result<(u32, usize), LiteralError> {
    let bytes = text.as_bytes();
    let mut index = start + 1;
    let Some(marker) = text.get(index..).and_then(|rest| rest.chars().next()) else {
        return Err(LiteralError::new(LiteralErrorKind::UnexpectedEnd, start, 1));
    };
    index += marker.len_utf8();
    if let Some(decoded) = decode_basic_escape(marker) {
        return Ok((decoded as u32, index - start));
    }
    match marker {
        'u' => decode_fixed_length_escape(bytes, start, index, 4),
        'U' => decode_fixed_length_escape(bytes, start, index, 8),
        'x' => decode_variable_length_escape(bytes, start, index, 1, 4),
        other => Err(LiteralError::new(
            LiteralErrorKind::InvalidEscape(other),
            start,
            index - start,
        )),
    }
}

/// Byte length of the escape at `start`, whether or not it is valid.
#[must_use]
pub fn escape_len(text: &str, start: usize) -> usize {
    match decode_escape(text, start) {
        Ok((_, len)) => len,
        Err(error) => error.length.max(1),
    }
}

fn decode_fixed_length_escape(
    bytes: &[u8],
    start: usize,
    index: usize,
    width: usize,
) -> Result<(u32, usize), LiteralError> {
    let available = bytes[index..]
        .iter()
        .take(width)
        .take_while(|byte| byte.is_ascii_hexdigit())
        .count();
    if available < width {
        return Err(match bytes.get(index + available) {
            Some(&byte) if byte.is_ascii_alphanumeric() => LiteralError::new(
                LiteralErrorKind::InvalidHexDigit(byte as char),
                start,
                index + available - start,
            ),
            _ => LiteralError::new(
                LiteralErrorKind::InvalidUnicodeLen {
                    expected: width,
                    actual: available,
                },
                start,
                index + available - start,
            ),
        });
    }
    let value = parse_hex(&bytes[index..index + width]);
    let consumed = index + width - start;
    if value > 0x0010_FFFF {
        return Err(LiteralError::new(
            LiteralErrorKind::InvalidCodepoint(value),
            start,
            consumed,
        ));
    }
    Ok((value, consumed))
}

fn decode_variable_length_escape(
    bytes: &[u8],
    start: usize,
    index: usize,
    min: usize,
    max: usize,
) -> Result<(u32, usize), LiteralError> {
    let consumed = bytes[index..]
        .iter()
        .take(max)
        .take_while(|byte| byte.is_ascii_hexdigit())
        .count();
    if consumed < min {
        return Err(LiteralError::new(
            LiteralErrorKind::MissingHexDigits,
            start,
            index - start,
        ));
    }
    Ok((parse_hex(&bytes[index..index + consumed]), index + consumed - start))
}

fn parse_hex(digits: &[u8]) -> u32 {
    digits.iter().fold(0u32, |value, &byte| {
        (value << 4) | char::from(byte).to_digit(16).unwrap_or(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_and_hex_escapes() {
        assert_eq!(decode_escape(r"\n", 0), Ok(('\n' as u32, 2)));
        assert_eq!(decode_escape(r"\e", 0), Ok((0x1B, 2)));
        assert_eq!(decode_escape(r"\x41z", 0), Ok((0x41, 4)));
        assert_eq!(decode_escape(r"\x1234F", 0), Ok((0x1234, 6)));
        assert_eq!(decode_escape("\\u00E9", 0), Ok((0xE9, 6)));
        assert_eq!(decode_escape(r"\U0001F600", 0), Ok((0x1F600, 10)));
    }

    #[test]
    fn reports_malformed_escapes_with_extent() {
        let err = decode_escape(r"\q", 0).unwrap_err();
        assert_eq!(err.kind, LiteralErrorKind::InvalidEscape('q'));
        assert_eq!(err.length, 2);
        assert!(err.message().contains("`\\q`"));

        let err = decode_escape(r"\u12", 0).unwrap_err();
        assert_eq!(
            err.kind,
            LiteralErrorKind::InvalidUnicodeLen {
                expected: 4,
                actual: 2
            }
        );
        assert_eq!(escape_len(r"\u12", 0), 4);

        let err = decode_escape(r"\xg", 0).unwrap_err();
        assert_eq!(err.kind, LiteralErrorKind::MissingHexDigits);

        let err = decode_escape(r"\UFFFFFFFF", 0).unwrap_err();
        assert_eq!(err.kind, LiteralErrorKind::InvalidCodepoint(0xFFFF_FFFF));
    }

    #[test]
    fn trailing_backslash_is_unexpected_end() {
        let err = decode_escape("\\", 0).unwrap_err();
        assert_eq!(err.kind, LiteralErrorKind::UnexpectedEnd);
    }
}
