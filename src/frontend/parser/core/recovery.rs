use super::*;

parser_impl! {
    /// Records a syntax error unless one was already reported at the same offset.
    pub(in crate::frontend::parser) fn report(&mut self, message: impl Into<String>, span: Span) {
        let span = span.with_file(self.file_id);
        self.report_diagnostic(Diagnostic::error(message, Some(span)));
    }

    /// Pushes `diagnostic` unless an error already sits at its offset.
    /// Returns whether it was recorded.
    pub(in crate::frontend::parser) fn report_diagnostic(&mut self, diagnostic: Diagnostic) -> bool {
        let Some(start) = diagnostic.offset() else {
            self.syntax.push(diagnostic);
            return true;
        };
        if self.last_error_offset == Some(start) {
            return false;
        }
        self.last_error_offset = Some(start);
        self.syntax.push(diagnostic);
        true
    }

    /// Error pointing at the next token.
    pub(in crate::frontend::parser) fn error_here(&mut self, message: impl Into<String>) {
        let span = self.span_here();
        self.report(message, span);
    }

    /// Reports `found` against what was expected, naming the offending token.
    pub(in crate::frontend::parser) fn error_expected(&mut self, expected: &str) {
        let found = self.peek().kind.describe();
        let span = self.span_here();
        self.report(format!("expected {expected}, found {found}"), span);
    }

    /// Synthesizes a zero-width token of `kind` and reports it.
    ///
    /// Kinds with a fixed spelling carry an insertion suggestion. A fresh
    /// report at end of input wraps the token in an `ERROR` node.
    pub(in crate::frontend::parser) fn missing(&mut self, kind: TokenKind) {
        let at = self.builder.offset();
        let found = self.peek().kind.describe();
        let here = self.span_here().with_file(self.file_id);
        let mut diagnostic =
            Diagnostic::error(format!("expected {}, found {found}", kind.describe()), Some(here));
        if let Some(text) = kind.fixed_text() {
            diagnostic = diagnostic.with_suggestion(Suggestion::new(
                format!("insert `{text}`"),
                Some(Span::in_file(self.file_id, at, at)),
                Some(text),
            ));
        }
        let fresh = self.report_diagnostic(diagnostic);
        let token = Token::missing(kind, Span::in_file(self.file_id, at, at));
        if let Some(telemetry) = self.telemetry.as_mut() {
            telemetry.record(RecoveryTelemetryKind::MissingToken, Some(&token));
        }
        tracing::trace!(
            target: "parser",
            stage = "recovery.missing",
            offset = at,
            expected = %kind.describe(),
            "inserted missing token"
        );
        if fresh && self.at_end() {
            self.builder.start_node(SyntaxKind::Error);
            self.builder.token(token);
            self.builder.finish_node();
        } else {
            self.builder.token(token);
        }
    }

    /// Missing token without a diagnostic of its own; used right after an
    /// error was already reported for the same construct.
    pub(in crate::frontend::parser) fn missing_silent(&mut self, kind: TokenKind) {
        let at = self.builder.offset();
        let token = Token::missing(kind, Span::in_file(self.file_id, at, at));
        self.builder.token(token);
    }

    /// Skips tokens into an `ERROR` node.
    ///
    /// At least one token is consumed unless input is exhausted. Skipping
    /// stops at depth zero in front of a closing bracket, a branch
    /// directive, or any token accepted by `stop`; a `;` at depth zero is
    /// consumed and ends the node.
    pub(in crate::frontend::parser) fn skip_into_error(&mut self, stop: impl Fn(&Token) -> bool) {
        if self.at_end() {
            return;
        }
        let first = self.peek().clone();
        if let Some(telemetry) = self.telemetry.as_mut() {
            telemetry.record(RecoveryTelemetryKind::Synchronize, Some(&first));
        }
        self.builder.start_node(SyntaxKind::Error);
        let mut depth = 0usize;
        let mut skipped = 0usize;
        while !self.at_end() {
            let token = self.peek();
            let kind = token.kind;
            let closer = matches!(kind, TokenKind::Punctuation(')' | ']' | '}'));
            if skipped > 0 && depth == 0 && (closer || kind.is_branch_directive() || stop(token)) {
                break;
            }
            match kind {
                TokenKind::Punctuation('(' | '[' | '{') => depth += 1,
                TokenKind::Punctuation(')' | ']' | '}') => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
            skipped += 1;
            let lone = skipped == 1 && (closer || kind.is_branch_directive());
            if depth == 0 && (lone || kind == TokenKind::Punctuation(';')) {
                break;
            }
        }
        self.builder.finish_node();
        if let Some(telemetry) = self.telemetry.as_mut() {
            telemetry.record_skipped(skipped);
        }
        tracing::trace!(
            target: "parser",
            stage = "recovery.synchronize",
            offset = first.span.start,
            skipped,
            "skipped tokens into error node"
        );
    }

    /// Wraps exactly the next token in an `ERROR` node.
    pub(in crate::frontend::parser) fn bump_error(&mut self) {
        if self.at_end() {
            return;
        }
        let token = self.peek().clone();
        if let Some(telemetry) = self.telemetry.as_mut() {
            telemetry.record(RecoveryTelemetryKind::Synchronize, Some(&token));
            telemetry.record_skipped(1);
        }
        self.builder.start_node(SyntaxKind::Error);
        self.bump();
        self.builder.finish_node();
    }

    /// Error recovery inside statement lists: report and skip to the next
    /// statement boundary.
    pub(in crate::frontend::parser) fn recover_statement(&mut self, message: &str) {
        self.error_expected(message);
        self.skip_into_error(starts_statement_or_declaration);
    }

    /// Error recovery inside declaration lists.
    pub(in crate::frontend::parser) fn recover_member(&mut self, message: &str) {
        self.error_expected(message);
        self.skip_into_error(starts_member);
    }
}

/// Synchronizing tokens for statement-level recovery.
pub(in crate::frontend::parser) fn starts_statement_or_declaration(token: &Token) -> bool {
    match token.kind {
        TokenKind::Keyword(keyword) => keyword.starts_statement() || keyword.starts_declaration(),
        TokenKind::Punctuation('{') => true,
        _ => false,
    }
}

/// Synchronizing tokens for member-level recovery.
pub(in crate::frontend::parser) fn starts_member(token: &Token) -> bool {
    match token.kind {
        TokenKind::Keyword(keyword) => keyword.starts_declaration() || keyword.is_predefined_type(),
        TokenKind::Punctuation('[') => true,
        _ => false,
    }
}
