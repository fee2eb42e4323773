use super::*;

parser_impl! {
    pub(in crate::frontend::parser) fn peek(&mut self) -> &Token {
        self.stream.peek()
    }

    pub(in crate::frontend::parser) fn nth(&mut self, offset: usize) -> &Token {
        self.stream.nth(offset)
    }

    pub(in crate::frontend::parser) fn peek_kind(&mut self) -> TokenKind {
        self.stream.peek().kind
    }

    pub(in crate::frontend::parser) fn nth_kind(&mut self, offset: usize) -> TokenKind {
        self.stream.nth(offset).kind
    }

    /// End of input, or the remainder swallowed by a scanner fault.
    pub(in crate::frontend::parser) fn at_end(&mut self) -> bool {
        matches!(self.peek_kind(), TokenKind::EndOfFile | TokenKind::ScannerFault)
    }

    pub(in crate::frontend::parser) fn nth_at_end(&mut self, offset: usize) -> bool {
        matches!(
            self.nth_kind(offset),
            TokenKind::EndOfFile | TokenKind::ScannerFault
        )
    }

    pub(in crate::frontend::parser) fn check_punctuation(&mut self, expected: char) -> bool {
        self.peek_kind() == TokenKind::Punctuation(expected)
    }

    pub(in crate::frontend::parser) fn peek_punctuation_n(&mut self, offset: usize, expected: char) -> bool {
        self.nth_kind(offset) == TokenKind::Punctuation(expected)
    }

    pub(in crate::frontend::parser) fn check_operator(&mut self, symbol: &str) -> bool {
        self.peek().is_op(symbol)
    }

    pub(in crate::frontend::parser) fn peek_operator_n(&mut self, offset: usize, symbol: &str) -> bool {
        self.nth(offset).is_op(symbol)
    }

    pub(in crate::frontend::parser) fn check_keyword(&mut self, keyword: Keyword) -> bool {
        self.peek_kind() == TokenKind::Keyword(keyword)
    }

    pub(in crate::frontend::parser) fn peek_keyword_n(&mut self, offset: usize, keyword: Keyword) -> bool {
        self.nth_kind(offset) == TokenKind::Keyword(keyword)
    }

    /// Contextual keyword spelled as an identifier (`get`, `where`, `var`, ...).
    pub(in crate::frontend::parser) fn peek_identifier(&mut self, expected: &str) -> bool {
        self.peek().is_word(expected)
    }

    pub(in crate::frontend::parser) fn peek_identifier_n(&mut self, offset: usize, expected: &str) -> bool {
        self.nth(offset).is_word(expected)
    }

    /// `#elif`, `#else` or `#endif`.
    pub(in crate::frontend::parser) fn at_branch_continuation(&mut self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::DirectiveElif | TokenKind::DirectiveElse | TokenKind::DirectiveEndif
        )
    }

    /// Whether token `offset + 1` starts exactly where token `offset` ends.
    pub(in crate::frontend::parser) fn adjacent_n(&mut self, offset: usize) -> bool {
        let end = self.nth(offset).span.end;
        let next = self.nth(offset + 1);
        !next.has_leading_trivia() && next.span.start == end
    }

    /// Moves the current token into the tree.
    pub(in crate::frontend::parser) fn bump(&mut self) {
        let token = self.stream.bump();
        self.builder.token(token);
    }

    pub(in crate::frontend::parser) fn bump_labeled(&mut self, field: Field) {
        let token = self.stream.bump();
        self.builder.labeled_token(field, token);
    }

    /// Moves a keyword into the tree as a plain identifier.
    pub(in crate::frontend::parser) fn bump_as_identifier(&mut self) {
        let mut token = self.stream.bump();
        if matches!(token.kind, TokenKind::Keyword(_)) {
            token.flags.insert(TokenFlags::CONTEXTUAL_IDENTIFIER);
        }
        self.builder.token(token);
    }

    /// Joins `count` adjacent tokens into one operator token (`>` `>` into `>>`).
    pub(in crate::frontend::parser) fn bump_joined(&mut self, symbol: &'static str, count: usize, field: Field) {
        let mut joined = self.stream.bump();
        for _ in 1..count {
            let next = self.stream.bump();
            joined.lexeme.push_str(&next.lexeme);
            joined.span = joined.span.cover(next.span);
        }
        joined.kind = TokenKind::Operator(symbol);
        self.builder.labeled_token(field, joined);
    }

    pub(in crate::frontend::parser) fn consume_punctuation(&mut self, expected: char) -> bool {
        if self.check_punctuation(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(in crate::frontend::parser) fn consume_operator(&mut self, symbol: &str) -> bool {
        if self.check_operator(symbol) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(in crate::frontend::parser) fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(in crate::frontend::parser) fn expect_punctuation(&mut self, expected: char) -> bool {
        if self.consume_punctuation(expected) {
            return true;
        }
        self.missing(TokenKind::Punctuation(expected));
        false
    }

    pub(in crate::frontend::parser) fn expect_operator(&mut self, symbol: &'static str) -> bool {
        if self.consume_operator(symbol) {
            return true;
        }
        self.missing(TokenKind::Operator(symbol));
        false
    }

    pub(in crate::frontend::parser) fn expect_keyword(&mut self, keyword: Keyword) -> bool {
        if self.match_keyword(keyword) {
            return true;
        }
        self.missing(TokenKind::Keyword(keyword));
        false
    }

    /// An `identifier` node. Reserved keywords are accepted when
    /// `allow_reserved` is set (declarator and member names).
    pub(in crate::frontend::parser) fn parse_identifier(&mut self, allow_reserved: bool) -> bool {
        match self.peek_kind() {
            TokenKind::Identifier => {
                self.builder.start_node(SyntaxKind::Identifier);
                self.bump();
                self.builder.finish_node();
                true
            }
            TokenKind::Keyword(keyword) if allow_reserved && keyword.is_reserved_identifier() => {
                self.builder.start_node(SyntaxKind::Identifier);
                self.bump_as_identifier();
                self.builder.finish_node();
                true
            }
            _ => {
                self.missing(TokenKind::Identifier);
                false
            }
        }
    }

    /// Runs `parse` and labels the first child it emitted with `field`.
    pub(in crate::frontend::parser) fn labeled<R>(
        &mut self,
        field: Field,
        parse: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let checkpoint = self.builder.checkpoint();
        let result = parse(self);
        self.builder.label_at(checkpoint, field);
        result
    }

    /// Opens a node of `kind` around `parse`.
    pub(in crate::frontend::parser) fn node<R>(
        &mut self,
        kind: SyntaxKind,
        parse: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.builder.start_node(kind);
        let result = parse(self);
        self.builder.finish_node();
        result
    }

    /// Opens `kind` around everything emitted since `checkpoint`, labeling
    /// the first of those children with `field`.
    pub(in crate::frontend::parser) fn wrap(&mut self, checkpoint: Checkpoint, field: Field, kind: SyntaxKind) {
        self.builder.label_at(checkpoint, field);
        self.builder.start_node_at(checkpoint, kind);
    }

    /// Enters one level of syntactic nesting; false once the limit is hit.
    pub(in crate::frontend::parser) fn enter_nesting(&mut self) -> bool {
        if self.nesting >= MAX_NESTING {
            if !self.nesting_exceeded {
                self.nesting_exceeded = true;
                let span = self.peek().span;
                tracing::warn!(
                    target: "parser",
                    stage = "parse.nesting",
                    offset = span.start,
                    "nesting limit reached"
                );
                self.report(format!("syntax nested deeper than {MAX_NESTING} levels"), span);
            }
            return false;
        }
        self.nesting += 1;
        true
    }

    pub(in crate::frontend::parser) fn leave_nesting(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    pub(in crate::frontend::parser) fn span_here(&mut self) -> Span {
        self.peek().span
    }
}
