use super::modes::{Frame, InterpolationMode, ScannerState};
use super::{Keyword, Token, TokenFlags, TokenKind};
use crate::diagnostics::{Diagnostic, DiagnosticSink, ErrorKind, FileId, Span};

/// Multi-character operators first so the longest match wins. `>` is never
/// combined with a following `>`; the parser merges shift operators.
const OPERATORS: &[&str] = &[
    "??=", "<<=", "...", "..<", "??", "::", "++", "--", "&&", "||", "==", "!=", "<=", ">=", "+=",
    "-=", "*=", "/=", "%=", "&=", "^=", "|=", "<<", "=>", "->", "..", "+", "-", "*", "/", "%", "^",
    "&", "|", "~", "!", "=", "<", ">", "?",
];

const PUNCTUATION: &[char] = &['(', ')', '[', ']', '{', '}', ';', ',', '.', ':'];

/// Pull-based scanner over one source string.
///
/// Every call to [`Lexer::next_token`] returns one token with its leading
/// trivia attached. The mode stack in [`ScannerState`] decides whether the
/// next piece is ordinary code, string content, or a directive line.
pub(crate) struct Lexer<'a> {
    pub(super) source: &'a str,
    pub(super) pos: usize,
    pub(super) state: ScannerState,
    pub(super) file_id: FileId,
    pub(super) diagnostics: DiagnosticSink,
    max_depth: usize,
    faulted: bool,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(source: &'a str, file_id: FileId, max_depth: usize) -> Self {
        Self::resume(source, file_id, max_depth, 0, ScannerState::new())
    }

    /// Continue scanning at `pos` with a previously captured mode stack.
    pub(crate) fn resume(
        source: &'a str,
        file_id: FileId,
        max_depth: usize,
        pos: usize,
        state: ScannerState,
    ) -> Self {
        Self {
            source,
            pos: pos.min(source.len()),
            state,
            file_id,
            diagnostics: DiagnosticSink::for_kind(ErrorKind::Lexical),
            max_depth: max_depth.max(1),
            faulted: false,
        }
    }

    pub(crate) fn state(&self) -> &ScannerState {
        &self.state
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn file_id(&self) -> FileId {
        self.file_id
    }

    pub(crate) fn faulted(&self) -> bool {
        self.faulted
    }

    /// Diagnostics reported so far.
    pub(crate) fn diagnostic_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub(crate) fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::replace(
            &mut self.diagnostics,
            DiagnosticSink::for_kind(ErrorKind::Lexical),
        )
        .into_vec()
    }

    pub(crate) fn next_token(&mut self) -> Token {
        match self.state.top() {
            Some(Frame::RawString { .. }) => return self.scan_raw_piece(),
            Some(Frame::Interpolation(frame)) if frame.mode != InterpolationMode::Expression => {
                return self.scan_interpolation_piece();
            }
            _ => {}
        }
        let leading = self.scan_trivia();
        let mut token = self.scan_token();
        token.leading = leading;
        token
    }

    fn scan_token(&mut self) -> Token {
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return self.scan_end_of_input();
        };

        if self.state.in_directive_line() && matches!(ch, '\n' | '\r') {
            if self.bump() == Some('\r') && self.peek() == Some('\n') {
                self.bump();
            }
            self.state.pop();
            return self.make(TokenKind::DirectiveEnd, start);
        }

        if self.state.interpolation_hole().is_some()
            && let Some(token) = self.scan_hole_delimiter(ch)
        {
            return token;
        }

        match ch {
            '"' => return self.scan_quote(),
            '\'' => return self.scan_char_literal(),
            '$' => return self.scan_dollar(),
            '@' => match self.peek_nth(1) {
                Some('"') => return self.scan_verbatim_string(),
                Some('$') => return self.scan_interpolation_start(),
                Some(next) if is_identifier_start(next) => {
                    self.bump();
                    self.eat_identifier_tail();
                    return self.make(TokenKind::Identifier, start);
                }
                _ => {}
            },
            '#' => {
                if let Some(token) = self.scan_branch_directive() {
                    return token;
                }
            }
            c if c.is_ascii_digit() => return self.scan_number(),
            '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
                && !self.follows_operand(start) =>
            {
                return self.scan_number();
            }
            c if is_identifier_start(c) => return self.scan_identifier(),
            _ => {}
        }

        let rest = self.rest();
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            self.pos += op.len();
            return self.make(TokenKind::Operator(op), start);
        }
        if PUNCTUATION.contains(&ch) {
            self.bump();
            return self.make(TokenKind::Punctuation(ch), start);
        }

        self.bump();
        self.error(
            format!("unexpected character `{}`", ch.escape_debug()),
            Span::new(start, self.pos),
        );
        self.make(TokenKind::Unknown, start)
    }

    /// End of input while frames may still be open.
    fn scan_end_of_input(&mut self) -> Token {
        match self.state.top_mut() {
            Some(Frame::Directive) => {
                self.state.pop();
                self.make(TokenKind::DirectiveEnd, self.pos)
            }
            Some(Frame::Interpolation(frame)) => {
                frame.mode = InterpolationMode::Content;
                let hole = frame.hole_start;
                let width = frame.kind.brace_width();
                self.error(
                    "unterminated interpolation: expected `}`",
                    Span::new(hole, hole + width),
                );
                self.missing(TokenKind::InterpolationCloseBrace, TokenFlags::INTERPOLATION_BRACE)
            }
            _ => self.make(TokenKind::EndOfFile, self.pos),
        }
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        self.eat_identifier_tail();
        let text = &self.source[start..self.pos];
        let kind = Keyword::from_ident(text).map_or(TokenKind::Identifier, TokenKind::Keyword);
        self.make(kind, start)
    }

    pub(super) fn eat_identifier_tail(&mut self) {
        while self.peek().is_some_and(is_identifier_continue) {
            self.bump();
        }
    }

    /// A `.5` right after an operand is member access, not a real literal.
    fn follows_operand(&self, offset: usize) -> bool {
        self.source[..offset]
            .chars()
            .next_back()
            .is_some_and(|prev| is_identifier_continue(prev) || matches!(prev, ')' | ']'))
    }

    /// Push a frame, or fault when the stack is already at its limit.
    ///
    /// On fault the returned token covers everything from `start` to the
    /// end of input and the stack is cleared.
    pub(super) fn push_frame(&mut self, frame: Frame, start: usize) -> Result<(), Token> {
        if self.state.depth() >= self.max_depth {
            tracing::warn!(
                target: "parser",
                stage = "scanner.fault",
                depth = self.state.depth(),
                offset = start,
                "scanner mode stack overflow"
            );
            self.error(
                format!(
                    "string literals nested deeper than {} levels; the rest of the file is not scanned",
                    self.max_depth
                ),
                Span::new(start, self.source.len()),
            );
            self.state.clear();
            self.pos = self.source.len();
            self.faulted = true;
            return Err(self.make(TokenKind::ScannerFault, start));
        }
        self.state.push(frame);
        Ok(())
    }

    pub(super) fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub(super) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(super) fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub(super) fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    pub(super) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Length of the run of `ch` starting at the cursor.
    pub(super) fn run_length(&self, ch: char) -> usize {
        self.rest().chars().take_while(|c| *c == ch).count()
    }

    pub(super) fn span(&self, start: usize, end: usize) -> Span {
        Span::in_file(self.file_id, start, end)
    }

    pub(super) fn make(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(
            kind,
            &self.source[start..self.pos],
            self.span(start, self.pos),
        )
    }

    pub(super) fn make_flagged(&self, kind: TokenKind, start: usize, flags: TokenFlags) -> Token {
        let mut token = self.make(kind, start);
        token.flags = flags;
        token
    }

    pub(super) fn missing(&self, kind: TokenKind, extra: TokenFlags) -> Token {
        let mut token = Token::missing(kind, self.span(self.pos, self.pos));
        token.flags.insert(extra);
        token
    }
}

pub(super) fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

pub(super) fn is_identifier_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(source: &str, max_depth: usize) -> (Vec<Token>, Vec<Diagnostic>, bool) {
        let mut lexer = Lexer::new(source, FileId::UNKNOWN, max_depth);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::EndOfFile;
            tokens.push(token);
            if done {
                break;
            }
        }
        let faulted = lexer.faulted();
        (tokens, lexer.take_diagnostics(), faulted)
    }

    #[test]
    fn longest_operator_wins() {
        let (tokens, diagnostics, _) = scan_all("a ??= b ?? c :: d", 8);
        let ops: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::Operator(op) => Some(op),
                _ => None,
            })
            .collect();
        assert_eq!(ops, vec!["??=", "??", "::"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn member_access_on_call_result_is_not_a_real() {
        let (tokens, _, _) = scan_all("f().5", 8);
        assert_eq!(tokens[3].kind, TokenKind::Punctuation('.'));
        assert_eq!(tokens[4].kind, TokenKind::IntegerLiteral);
    }

    #[test]
    fn deep_nesting_faults_once_then_stops() {
        let source = r#"$"{ $"{ $"{ x }" }" }" + rest"#;
        let (tokens, diagnostics, faulted) = scan_all(source, 2);
        assert!(faulted);
        let fault = tokens
            .iter()
            .find(|t| t.kind == TokenKind::ScannerFault)
            .expect("fault token");
        assert_eq!(fault.span.end, source.len());
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfFile));
        assert_eq!(diagnostics.len(), 1);
        let text: String = tokens
            .iter()
            .map(|t| {
                let mut out = String::new();
                t.write_full_text(&mut out);
                out
            })
            .collect();
        assert_eq!(text, source);
    }

    #[test]
    fn resume_continues_with_saved_state() {
        let source = r#"x = $"a{b}c";"#;
        let mut lexer = Lexer::new(source, FileId::UNKNOWN, 8);
        let mut seen = Vec::new();
        while seen.len() < 4 {
            seen.push(lexer.next_token());
        }
        let state = lexer.state().clone();
        let pos = lexer.position();
        let mut resumed = Lexer::resume(source, FileId::UNKNOWN, 8, pos, state);
        let next = resumed.next_token();
        assert_eq!(next.kind, TokenKind::InterpolationStringContent);
        assert_eq!(next.lexeme, "a");
    }
}
