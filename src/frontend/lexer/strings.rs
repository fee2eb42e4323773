use super::modes::{Frame, InterpolationFrame, InterpolationKind, InterpolationMode, RawPhase};
use super::state::Lexer;
use super::{Token, TokenFlags, TokenKind};

impl<'a> Lexer<'a> {
    /// `"` in code: a raw string fence (three or more quotes) or a regular string.
    pub(super) fn scan_quote(&mut self) -> Token {
        let start = self.pos;
        let fence = self.run_length('"');
        if fence >= 3 {
            let frame = Frame::RawString {
                fence,
                phase: RawPhase::Content,
                start,
            };
            if let Err(fault) = self.push_frame(frame, start) {
                return fault;
            }
            self.pos += fence;
            return self.make(TokenKind::RawStringStart, start);
        }

        self.bump();
        let mut flags = TokenFlags::NONE;
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => self.eat_escape(),
                Some('\n' | '\r') | None => {
                    flags = TokenFlags::UNTERMINATED;
                    self.unterminated("string literal", self.span(start, start + 1));
                    break;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        if !flags.contains(TokenFlags::UNTERMINATED) {
            self.eat_utf8_suffix();
        }
        self.make_flagged(TokenKind::StringLiteral, start, flags)
    }

    /// `@"..."`: doubled quotes only, line breaks allowed.
    pub(super) fn scan_verbatim_string(&mut self) -> Token {
        let start = self.pos;
        self.pos += 2;
        loop {
            match self.peek() {
                Some('"') if self.peek_nth(1) == Some('"') => self.pos += 2,
                Some('"') => {
                    self.bump();
                    self.eat_utf8_suffix();
                    return self.make(TokenKind::VerbatimStringLiteral, start);
                }
                Some(_) => {
                    self.bump();
                }
                None => {
                    self.unterminated("verbatim string literal", self.span(start, start + 2));
                    return self.make_flagged(
                        TokenKind::VerbatimStringLiteral,
                        start,
                        TokenFlags::UNTERMINATED,
                    );
                }
            }
        }
    }

    pub(super) fn scan_char_literal(&mut self) -> Token {
        let start = self.pos;
        self.bump();
        match self.peek() {
            Some('\'') => {
                self.bump();
                self.error("empty character literal", self.span(start, self.pos));
                return self.make(TokenKind::CharLiteral, start);
            }
            Some('\\') => self.eat_escape(),
            Some('\n' | '\r') | None => {}
            Some(_) => {
                self.bump();
            }
        }
        if !self.eat('\'') {
            let extra = self
                .rest()
                .find(['\'', '\n', '\r'])
                .filter(|idx| self.rest()[*idx..].starts_with('\''));
            if let Some(idx) = extra {
                self.pos += idx + 1;
                self.error(
                    "character literal contains more than one character",
                    self.span(start, self.pos),
                );
                return self.make(TokenKind::CharLiteral, start);
            }
            self.unterminated("character literal", self.span(start, start + 1));
            return self.make_flagged(TokenKind::CharLiteral, start, TokenFlags::UNTERMINATED);
        }
        self.make(TokenKind::CharLiteral, start)
    }

    fn eat_utf8_suffix(&mut self) {
        let rest = self.rest();
        if (rest.starts_with("u8") || rest.starts_with("U8"))
            && !rest[2..].starts_with(super::state::is_identifier_continue)
        {
            self.pos += 2;
        }
    }

    /// `$` in code: the start of an interpolated string, or a stray character.
    pub(super) fn scan_dollar(&mut self) -> Token {
        let dollars = self.run_length('$');
        let after = self.rest()[dollars..].chars().next();
        if matches!(after, Some('"' | '@')) {
            return self.scan_interpolation_start();
        }
        let start = self.pos;
        self.bump();
        self.error("`$` must start an interpolated string", self.span(start, self.pos));
        self.make(TokenKind::Unknown, start)
    }

    /// `$"`, `$@"`, `@$"` or `$$"""`; pushes the interpolation frame.
    pub(super) fn scan_interpolation_start(&mut self) -> Token {
        let start = self.pos;
        let mut verbatim = self.eat('@');
        let dollars = self.run_length('$');
        self.pos += dollars;
        verbatim |= self.eat('@');
        if self.peek() != Some('"') {
            self.error(
                "expected `\"` after interpolated string prefix",
                self.span(start, self.pos),
            );
            return self.make(TokenKind::Unknown, start);
        }
        let quotes = self.run_length('"');
        let kind = if verbatim {
            if dollars > 1 {
                self.error(
                    "verbatim interpolated strings take a single `$`",
                    self.span(start, self.pos),
                );
            }
            InterpolationKind::Verbatim
        } else if quotes >= 3 {
            InterpolationKind::Raw { dollars, quotes }
        } else {
            if dollars > 1 {
                self.error(
                    "multiple `$` require a raw interpolated string",
                    self.span(start, self.pos),
                );
            }
            InterpolationKind::Regular
        };
        let frame = Frame::Interpolation(InterpolationFrame {
            kind,
            mode: InterpolationMode::OpenQuote,
            brace_depth: 0,
            paren_depth: 0,
            start,
            hole_start: start,
        });
        if let Err(fault) = self.push_frame(frame, start) {
            return fault;
        }
        self.make(TokenKind::InterpolationStart, start)
    }

    /// Content or closing fence of the raw string on top of the stack.
    pub(super) fn scan_raw_piece(&mut self) -> Token {
        let Some(Frame::RawString { fence, phase, start }) = self.state.top().copied() else {
            return self.make(TokenKind::EndOfFile, self.pos);
        };
        let piece_start = self.pos;
        match phase {
            RawPhase::Content => {
                while let Some(ch) = self.peek() {
                    if ch == '"' {
                        let run = self.run_length('"');
                        if run == fence {
                            break;
                        }
                        self.pos += run;
                    } else {
                        self.bump();
                    }
                }
                if let Some(Frame::RawString { phase, .. }) = self.state.top_mut() {
                    *phase = RawPhase::End;
                }
                self.make_flagged(TokenKind::RawStringContent, piece_start, TokenFlags::RAW_CONTENT)
            }
            RawPhase::End => {
                self.state.pop();
                if self.run_length('"') == fence {
                    self.pos += fence;
                    self.eat_utf8_suffix();
                    return self.make(TokenKind::RawStringEnd, piece_start);
                }
                self.unterminated("raw string literal", self.span(start, start + fence));
                self.missing(TokenKind::RawStringEnd, TokenFlags::UNTERMINATED)
            }
        }
    }

    /// Quote, content, format or closing brace inside an interpolated string.
    pub(super) fn scan_interpolation_piece(&mut self) -> Token {
        let Some(Frame::Interpolation(frame)) = self.state.top().copied() else {
            return self.make(TokenKind::EndOfFile, self.pos);
        };
        let start = self.pos;
        match frame.mode {
            InterpolationMode::OpenQuote => {
                self.pos += frame.kind.quote_width().min(self.run_length('"'));
                self.set_mode(InterpolationMode::Content);
                self.make(TokenKind::InterpolationStartQuote, start)
            }
            InterpolationMode::Format => {
                let width = frame.kind.brace_width();
                self.set_mode(InterpolationMode::Content);
                if self.run_length('}') >= width {
                    self.pos += width;
                    return self.make_flagged(
                        TokenKind::InterpolationCloseBrace,
                        start,
                        TokenFlags::INTERPOLATION_BRACE,
                    );
                }
                self.error(
                    "expected `}` after interpolation format",
                    self.span(frame.hole_start, frame.hole_start + width),
                );
                self.missing(TokenKind::InterpolationCloseBrace, TokenFlags::INTERPOLATION_BRACE)
            }
            InterpolationMode::Content | InterpolationMode::Expression => {
                self.scan_interpolation_content(frame)
            }
        }
    }

    fn scan_interpolation_content(&mut self, frame: InterpolationFrame) -> Token {
        let start = self.pos;
        let braces = frame.kind.brace_width();
        let end_of_string = match self.peek() {
            None => true,
            Some('\n' | '\r') => frame.kind == InterpolationKind::Regular,
            _ => false,
        };
        if end_of_string {
            self.state.pop();
            self.unterminated(
                "interpolated string",
                self.span(frame.start, frame.start + 1),
            );
            return self.missing(TokenKind::InterpolationEndQuote, TokenFlags::UNTERMINATED);
        }
        if self.at_closing_quote(frame.kind) {
            self.state.pop();
            self.pos += frame.kind.quote_width();
            return self.make(TokenKind::InterpolationEndQuote, start);
        }
        if self.at_hole_opening(frame.kind) {
            self.pos += braces;
            if let Some(Frame::Interpolation(top)) = self.state.top_mut() {
                top.mode = InterpolationMode::Expression;
                top.brace_depth = 1;
                top.paren_depth = 0;
                top.hole_start = start;
            }
            return self.make_flagged(
                TokenKind::InterpolationOpenBrace,
                start,
                TokenFlags::INTERPOLATION_BRACE,
            );
        }

        while let Some(ch) = self.peek() {
            match (frame.kind, ch) {
                (InterpolationKind::Regular, '\n' | '\r') => break,
                (InterpolationKind::Regular, '\\') => self.eat_escape(),
                (InterpolationKind::Verbatim, '"') if self.peek_nth(1) == Some('"') => {
                    self.pos += 2;
                }
                (InterpolationKind::Raw { dollars, .. }, '{') => {
                    let run = self.run_length('{');
                    if run >= dollars {
                        self.pos += run - dollars;
                        break;
                    }
                    self.pos += run;
                }
                (InterpolationKind::Raw { quotes, .. }, '"') => {
                    let run = self.run_length('"');
                    if run == quotes {
                        break;
                    }
                    self.pos += run;
                }
                (InterpolationKind::Raw { .. }, _) => {
                    self.bump();
                }
                (_, '"') => break,
                (_, '{' | '}') if self.peek_nth(1) == Some(ch) => self.pos += 2,
                (_, '{') => break,
                (_, '}') => {
                    let brace = self.pos;
                    self.bump();
                    self.error(
                        "unmatched `}` in interpolated string; write `}}` for a literal brace",
                        self.span(brace, self.pos),
                    );
                }
                _ => {
                    self.bump();
                }
            }
        }
        self.make(TokenKind::InterpolationStringContent, start)
    }

    fn at_closing_quote(&self, kind: InterpolationKind) -> bool {
        match kind {
            InterpolationKind::Regular => self.peek() == Some('"'),
            InterpolationKind::Verbatim => {
                self.peek() == Some('"') && self.peek_nth(1) != Some('"')
            }
            InterpolationKind::Raw { quotes, .. } => self.run_length('"') == quotes,
        }
    }

    fn at_hole_opening(&self, kind: InterpolationKind) -> bool {
        match kind {
            InterpolationKind::Raw { dollars, .. } => self.run_length('{') == dollars,
            _ => self.peek() == Some('{') && self.peek_nth(1) != Some('{'),
        }
    }

    fn set_mode(&mut self, mode: InterpolationMode) {
        if let Some(Frame::Interpolation(frame)) = self.state.top_mut() {
            frame.mode = mode;
        }
    }

    /// Braces, brackets and format colons inside an interpolation hole.
    ///
    /// Returns `None` when the character is an ordinary token.
    pub(super) fn scan_hole_delimiter(&mut self, ch: char) -> Option<Token> {
        let start = self.pos;
        let second = self.peek_nth(1);
        let close_run = self.run_length('}');
        let Some(Frame::Interpolation(frame)) = self.state.top_mut() else {
            return None;
        };
        match ch {
            '{' => frame.brace_depth += 1,
            '(' | '[' => frame.paren_depth += 1,
            ')' | ']' => frame.paren_depth = frame.paren_depth.saturating_sub(1),
            '}' if frame.brace_depth > 1 => frame.brace_depth -= 1,
            '}' => {
                let width = frame.kind.brace_width();
                let hole = frame.hole_start;
                if close_run >= width {
                    frame.mode = InterpolationMode::Content;
                    self.pos += width;
                    return Some(self.make_flagged(
                        TokenKind::InterpolationCloseBrace,
                        start,
                        TokenFlags::INTERPOLATION_BRACE,
                    ));
                }
                self.bump();
                self.error(
                    format!("interpolation opened here closes with {width} `}}`"),
                    self.span(hole, hole + width),
                );
                return Some(self.make(TokenKind::Punctuation('}'), start));
            }
            ':' if frame.paren_depth == 0
                && frame.brace_depth == 1
                && second != Some(':') =>
            {
                let regular = frame.kind == InterpolationKind::Regular;
                frame.mode = InterpolationMode::Format;
                self.bump();
                while let Some(next) = self.peek() {
                    if matches!(next, '}' | '"') || (regular && matches!(next, '\n' | '\r')) {
                        break;
                    }
                    self.bump();
                }
                return Some(self.make(TokenKind::InterpolationFormat, start));
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::{TokenFlags, TokenKind, lex};

    fn pieces(source: &str) -> Vec<(TokenKind, String)> {
        lex(source)
            .tokens
            .into_iter()
            .map(|token| (token.kind, token.lexeme))
            .collect()
    }

    #[test]
    fn raw_string_keeps_shorter_quote_runs_as_content() {
        let output = lex(r#""""hello "world" bye""""#);
        let kinds: Vec<TokenKind> = output.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::RawStringStart,
                TokenKind::RawStringContent,
                TokenKind::RawStringEnd,
                TokenKind::EndOfFile,
            ]
        );
        assert_eq!(output.tokens[1].lexeme, r#"hello "world" bye"#);
        assert!(output.tokens[1].flags.contains(TokenFlags::RAW_CONTENT));
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn raw_string_longer_runs_are_content() {
        let output = lex(r#""""a """" b""""#);
        assert_eq!(output.tokens[1].lexeme, r#"a """" b"#);
        assert_eq!(output.tokens[2].lexeme, r#"""""#);
    }

    #[test]
    fn unterminated_raw_string_gets_missing_end() {
        let output = lex(r#"x = """never closed"#);
        let end = output
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::RawStringEnd)
            .expect("end token");
        assert!(end.is_missing());
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.text(), r#"x = """never closed"#);
    }

    #[test]
    fn interpolation_with_nested_braces_and_format() {
        let source = r#"$"v={new int[] { 1, 2 }.Count:X4} {{lit}}""#;
        let kinds: Vec<TokenKind> = lex(source).tokens.iter().map(|t| t.kind).collect();
        let opens = kinds
            .iter()
            .filter(|k| **k == TokenKind::InterpolationOpenBrace)
            .count();
        let closes = kinds
            .iter()
            .filter(|k| **k == TokenKind::InterpolationCloseBrace)
            .count();
        assert_eq!((opens, closes), (1, 1));
        assert!(kinds.contains(&TokenKind::InterpolationFormat));
        assert_eq!(lex(source).text(), source);
        let tail = pieces(source);
        assert!(tail.contains(&(TokenKind::InterpolationStringContent, " {{lit}}".to_string())));
    }

    #[test]
    fn nested_interpolated_strings() {
        let source = r#"$"a{$"b{c}"}d""#;
        let output = lex(source);
        let starts = output
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::InterpolationStart)
            .count();
        assert_eq!(starts, 2);
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.text(), source);
    }

    #[test]
    fn raw_interpolation_uses_dollar_count() {
        let source = r#"$$"""{x} {{y}} {{{z}}}""""#;
        let output = lex(source);
        let got: Vec<(TokenKind, String)> = output
            .tokens
            .iter()
            .map(|t| (t.kind, t.lexeme.clone()))
            .collect();
        assert_eq!(
            got,
            vec![
                (TokenKind::InterpolationStart, "$$".into()),
                (TokenKind::InterpolationStartQuote, "\"\"\"".into()),
                (TokenKind::InterpolationStringContent, "{x} ".into()),
                (TokenKind::InterpolationOpenBrace, "{{".into()),
                (TokenKind::Identifier, "y".into()),
                (TokenKind::InterpolationCloseBrace, "}}".into()),
                (TokenKind::InterpolationStringContent, " {".into()),
                (TokenKind::InterpolationOpenBrace, "{{".into()),
                (TokenKind::Identifier, "z".into()),
                (TokenKind::InterpolationCloseBrace, "}}".into()),
                (TokenKind::InterpolationStringContent, "}".into()),
                (TokenKind::InterpolationEndQuote, "\"\"\"".into()),
                (TokenKind::EndOfFile, String::new()),
            ]
        );
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn verbatim_interpolation_allows_newlines_and_doubled_quotes() {
        let source = "$@\"line \"\"one\"\"\n{x}\"";
        let output = lex(source);
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.text(), source);
    }

    #[test]
    fn unterminated_interpolation_hole_closes_both_frames() {
        let output = lex(r#"$"a{b"#);
        let missing: Vec<TokenKind> = output
            .tokens
            .iter()
            .filter(|t| t.is_missing())
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            missing,
            vec![
                TokenKind::InterpolationCloseBrace,
                TokenKind::InterpolationEndQuote,
            ]
        );
        assert_eq!(output.diagnostics.len(), 2);
    }

    #[test]
    fn regular_string_stops_at_newline() {
        let output = lex("\"abc\nx");
        assert!(output.tokens[0].flags.contains(TokenFlags::UNTERMINATED));
        assert_eq!(output.tokens[0].lexeme, "\"abc");
        assert_eq!(output.tokens[1].lexeme, "x");
    }

    #[test]
    fn utf8_suffix_and_char_literals() {
        assert_eq!(
            pieces(r#""abc"u8 'x' '\n'"#)[..3],
            [
                (TokenKind::StringLiteral, r#""abc"u8"#.to_string()),
                (TokenKind::CharLiteral, "'x'".to_string()),
                (TokenKind::CharLiteral, r"'\n'".to_string()),
            ]
        );
    }

    #[test]
    fn empty_strings() {
        let output = lex(r#""" $"""#);
        assert_eq!(output.tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(output.tokens[0].lexeme, r#""""#);
        assert!(output.diagnostics.is_empty());
    }
}
