use super::state::{Lexer, is_identifier_continue};
use super::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericBase {
    Binary,
    Decimal,
    Hexadecimal,
}

impl NumericBase {
    fn name(self) -> &'static str {
        match self {
            NumericBase::Binary => "binary",
            NumericBase::Decimal => "decimal",
            NumericBase::Hexadecimal => "hexadecimal",
        }
    }

    fn accepts(self, ch: char) -> bool {
        match self {
            NumericBase::Binary => matches!(ch, '0' | '1'),
            NumericBase::Decimal => ch.is_ascii_digit(),
            NumericBase::Hexadecimal => ch.is_ascii_hexdigit(),
        }
    }
}

impl<'a> Lexer<'a> {
    /// Integer or real literal, including its suffix.
    ///
    /// `1..5` and `1...5` stay integers followed by a range operator.
    pub(super) fn scan_number(&mut self) -> Token {
        let start = self.pos;
        let rest = self.rest();
        let base = if rest.starts_with("0x") || rest.starts_with("0X") {
            NumericBase::Hexadecimal
        } else if rest.starts_with("0b") || rest.starts_with("0B") {
            NumericBase::Binary
        } else {
            NumericBase::Decimal
        };

        let mut real = false;
        if base == NumericBase::Decimal {
            self.eat_digits(base);
            if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
                self.eat_digits(base);
                real = true;
            }
            if self.eat_exponent() {
                real = true;
            }
        } else {
            self.pos += 2;
            if self.eat_digits(base) == 0 {
                self.error(
                    format!("{} literal has no digits", base.name()),
                    self.span(start, self.pos),
                );
            }
        }

        let suffix_start = self.pos;
        let suffix = self.rest();
        if base == NumericBase::Decimal
            && let Some(ch) = suffix.chars().next()
            && matches!(ch, 'f' | 'F' | 'd' | 'D' | 'm' | 'M')
            && !suffix[1..].starts_with(is_identifier_continue)
        {
            self.bump();
            real = true;
        } else {
            let len = integer_suffix_len(suffix);
            if len > 0 {
                if real {
                    self.error(
                        "integer suffix on a real literal",
                        self.span(suffix_start, suffix_start + len),
                    );
                }
                self.pos += len;
            }
        }

        if self.peek().is_some_and(is_identifier_continue) {
            let bad_start = self.pos;
            while self.peek().is_some_and(is_identifier_continue) {
                self.bump();
            }
            self.error(
                format!(
                    "invalid suffix `{}` on numeric literal",
                    &self.source[suffix_start..self.pos]
                ),
                self.span(bad_start, self.pos),
            );
        }

        let kind = if real {
            TokenKind::RealLiteral
        } else {
            TokenKind::IntegerLiteral
        };
        self.make(kind, start)
    }

    /// Digits and `_` separators; returns the number of digits.
    fn eat_digits(&mut self, base: NumericBase) -> usize {
        let mut digits = 0;
        while let Some(ch) = self.peek() {
            if base.accepts(ch) {
                digits += 1;
            } else if ch != '_' {
                break;
            }
            self.bump();
        }
        digits
    }

    fn eat_exponent(&mut self) -> bool {
        if !matches!(self.peek(), Some('e' | 'E')) {
            return false;
        }
        let digit_at = match self.peek_nth(1) {
            Some('+' | '-') => 2,
            _ => 1,
        };
        if !self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
            return false;
        }
        self.pos += digit_at;
        self.eat_digits(NumericBase::Decimal);
        true
    }
}

/// `[uU][lL]?` or `[lL][uU]?`.
fn integer_suffix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b'u' | b'U') => 1 + usize::from(matches!(bytes.get(1), Some(b'l' | b'L'))),
        Some(b'l' | b'L') => 1 + usize::from(matches!(bytes.get(1), Some(b'u' | b'U'))),
        _ => 0,
    }
}
