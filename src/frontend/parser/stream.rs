//! Pull-based token buffer between the scanner and the parser.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::diagnostics::{Diagnostic, FileId, Span};
use crate::frontend::lexer::{Lexer, ScannerState, Token, TokenKind};

/// A scanned token plus the scanner position and mode stack it was scanned from.
#[derive(Debug, Clone)]
struct Buffered {
    token: Token,
    offset: usize,
    state: ScannerState,
    /// Scanner diagnostics reported before this token was scanned.
    lexical: usize,
}

/// Resumable scan position captured in front of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScanPoint {
    pub offset: usize,
    pub state: ScannerState,
    pub lexical: usize,
}

pub(crate) struct TokenStream<'a> {
    lexer: Lexer<'a>,
    buffer: VecDeque<Buffered>,
    cancel: Option<Arc<AtomicBool>>,
    /// Scanner diagnostics carried over from an earlier parse.
    carried: Vec<Diagnostic>,
    cancelled: bool,
    eof_emitted: bool,
    pulled: usize,
    consumed: usize,
}

impl<'a> TokenStream<'a> {
    pub(crate) fn new(lexer: Lexer<'a>, cancel: Option<Arc<AtomicBool>>) -> Self {
        Self {
            lexer,
            buffer: VecDeque::new(),
            cancel,
            carried: Vec::new(),
            cancelled: false,
            eof_emitted: false,
            pulled: 0,
            consumed: 0,
        }
    }

    /// Starts with scanner diagnostics of a reused prefix.
    pub(crate) fn with_carried(mut self, carried: Vec<Diagnostic>) -> Self {
        self.carried = carried;
        self
    }

    /// The token `n` positions ahead; end of input repeats forever.
    pub(crate) fn nth(&mut self, n: usize) -> &Token {
        self.fill(n);
        &self.buffer[n].token
    }

    pub(crate) fn peek(&mut self) -> &Token {
        self.nth(0)
    }

    pub(crate) fn bump(&mut self) -> Token {
        self.fill(0);
        self.consumed += 1;
        match self.buffer.pop_front() {
            Some(buffered) => buffered.token,
            None => Token::default(),
        }
    }

    /// Where scanning has to restart to reproduce the next token.
    pub(crate) fn scan_point(&mut self) -> ScanPoint {
        self.fill(0);
        let front = &self.buffer[0];
        ScanPoint {
            offset: front.offset,
            state: front.state.clone(),
            lexical: front.lexical,
        }
    }

    pub(crate) fn cancelled(&self) -> bool {
        self.cancelled
    }

    pub(crate) fn faulted(&self) -> bool {
        self.lexer.faulted()
    }

    /// Number of tokens requested from the scanner so far.
    pub(crate) fn pulled(&self) -> usize {
        self.pulled
    }

    /// Number of tokens handed to the parser; progress checks compare it.
    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }

    pub(crate) fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        let mut diagnostics = std::mem::take(&mut self.carried);
        diagnostics.extend(self.lexer.take_diagnostics());
        diagnostics
    }

    fn fill(&mut self, n: usize) {
        while self.buffer.len() <= n {
            let offset = self.lexer.position();
            let state = self.lexer.state().clone();
            let lexical = self.carried.len() + self.lexer.diagnostic_count();
            let token = self.pull(offset);
            self.buffer.push_back(Buffered {
                token,
                offset,
                state,
                lexical,
            });
        }
    }

    fn pull(&mut self, offset: usize) -> Token {
        if !self.cancelled
            && self
                .cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            tracing::debug!(target: "parser", stage = "parse.cancelled", offset, "cancellation observed");
            self.cancelled = true;
        }
        if self.cancelled || self.eof_emitted {
            return bare_end_of_file(self.lexer.file_id(), offset);
        }
        self.pulled += 1;
        let token = self.lexer.next_token();
        if token.kind == TokenKind::EndOfFile {
            self.eof_emitted = true;
        }
        token
    }
}

/// End of input without trivia, handed out after the real end-of-file token
/// so lookahead past the end never duplicates trailing text.
fn bare_end_of_file(file_id: FileId, offset: usize) -> Token {
    Token::new(
        TokenKind::EndOfFile,
        "",
        Span::in_file(file_id, offset, offset),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Keyword;

    fn stream(source: &str) -> TokenStream<'_> {
        TokenStream::new(Lexer::new(source, FileId::UNKNOWN, 8), None)
    }

    #[test]
    fn lookahead_does_not_consume() {
        let mut tokens = stream("class C {}");
        assert!(tokens.nth(2).is_punct('{'));
        assert!(tokens.peek().is_keyword(Keyword::Class));
        assert!(tokens.bump().is_keyword(Keyword::Class));
        assert_eq!(tokens.bump().lexeme, "C");
    }

    #[test]
    fn end_of_input_repeats_without_trivia() {
        let mut tokens = stream("x  ");
        tokens.bump();
        let eof = tokens.bump();
        assert_eq!(eof.kind, TokenKind::EndOfFile);
        assert!(eof.has_leading_trivia());
        let again = tokens.bump();
        assert_eq!(again.kind, TokenKind::EndOfFile);
        assert!(!again.has_leading_trivia());
    }

    #[test]
    fn cancellation_turns_the_stream_into_end_of_input() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut tokens = TokenStream::new(
            Lexer::new("a b c", FileId::UNKNOWN, 8),
            Some(Arc::clone(&flag)),
        );
        assert_eq!(tokens.bump().lexeme, "a");
        flag.store(true, Ordering::Relaxed);
        assert_eq!(tokens.bump().kind, TokenKind::EndOfFile);
        assert!(tokens.cancelled());
    }

    #[test]
    fn scan_point_records_offset_before_trivia() {
        let mut tokens = stream("a  b");
        tokens.bump();
        let point = tokens.scan_point();
        assert_eq!(point.offset, 1);
        assert!(point.state.is_top_level());
    }
}
