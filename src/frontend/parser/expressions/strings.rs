//! String forms assembled from scanner sub-tokens.
//!
//! The scanner already balances interpolation braces and raw-string fences
//! and synthesizes missing closers, so these routines only arrange tokens.

use super::*;

parser_impl! {
    /// `"""..."""` with an optional `u8` suffix on the end token.
    pub(in crate::frontend::parser) fn parse_raw_string(&mut self) {
        self.node(SyntaxKind::RawStringLiteral, |p| {
            p.bump();
            if p.peek_kind() == TokenKind::RawStringContent {
                p.bump_labeled(Field::Content);
            }
            if p.peek_kind() == TokenKind::RawStringEnd {
                p.bump();
            } else {
                p.missing(TokenKind::RawStringEnd);
            }
        });
    }

    /// `[new] $"..."`, `$@"..."`, `$$"""..."""`.
    pub(in crate::frontend::parser) fn parse_interpolated_string(&mut self) {
        self.node(SyntaxKind::InterpolatedStringExpression, |p| {
            if matches!(
                p.peek_kind(),
                TokenKind::Keyword(Keyword::New | Keyword::Scope)
            ) {
                p.parse_allocation_prefix();
            }
            p.bump();
            if p.peek_kind() == TokenKind::InterpolationStartQuote {
                p.bump();
            }
            loop {
                match p.peek_kind() {
                    TokenKind::InterpolationStringContent => p.bump(),
                    TokenKind::InterpolationOpenBrace => p.parse_interpolation(),
                    TokenKind::InterpolationEndQuote => {
                        p.bump();
                        break;
                    }
                    _ => {
                        p.missing(TokenKind::InterpolationEndQuote);
                        break;
                    }
                }
            }
        });
    }

    /// `{ expr [, alignment] [:format] }`
    fn parse_interpolation(&mut self) {
        self.node(SyntaxKind::Interpolation, |p| {
            p.bump();
            p.labeled(Field::Expression, Self::parse_expression);
            if p.check_punctuation(',') {
                p.node(SyntaxKind::InterpolationAlignmentClause, |p| {
                    p.bump();
                    p.parse_expression();
                });
            }
            if p.peek_kind() == TokenKind::InterpolationFormat {
                p.node(SyntaxKind::InterpolationFormatClause, Self::bump);
            }
            if !p.at_interpolation_close() {
                p.error_expected("'}'");
                while !p.at_interpolation_close() && !p.at_end() {
                    p.skip_into_error(|token| {
                        matches!(
                            token.kind,
                            TokenKind::InterpolationCloseBrace | TokenKind::InterpolationEndQuote
                        )
                    });
                }
            }
            if p.peek_kind() == TokenKind::InterpolationCloseBrace {
                p.bump();
            } else {
                p.missing_silent(TokenKind::InterpolationCloseBrace);
            }
        });
    }

    fn at_interpolation_close(&mut self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::InterpolationCloseBrace | TokenKind::InterpolationEndQuote
        )
    }
}
