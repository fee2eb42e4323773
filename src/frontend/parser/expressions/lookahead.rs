//! Named lookahead predicates, one per ambiguous expression prefix.
//!
//! All of them only peek; none opens a node or consumes a token.

use super::*;

/// What a `(` in expression position turns out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::frontend::parser) enum ParenShape {
    Parenthesized,
    Tuple,
    Cast,
    /// `(.)value`
    InferredCast,
    /// Parameter list of a lambda.
    Lambda,
}

parser_impl! {
    /// Classifies the parenthesized group opening at `at` by scanning to its
    /// matching `)`.
    pub(in crate::frontend::parser) fn classify_paren(&mut self, at: usize) -> ParenShape {
        let Some(close) = self.skip_balanced(at) else {
            return ParenShape::Parenthesized;
        };
        if self.peek_operator_n(close, "=>") {
            return ParenShape::Lambda;
        }
        if self.peek_punctuation_n(at + 1, '.') && close == at + 3 {
            return ParenShape::InferredCast;
        }
        if let Some(scan) = self.scan_type(at + 1, TypeContext::Plain)
            && scan.end + 1 == close
            && self.cast_follows(close, scan.unambiguous)
        {
            return ParenShape::Cast;
        }
        if self.has_top_level_comma(at, close) {
            ParenShape::Tuple
        } else {
            ParenShape::Parenthesized
        }
    }

    /// Whether the token at `index` can be the operand of a cast.
    fn cast_follows(&mut self, index: usize, unambiguous: bool) -> bool {
        match self.nth_kind(index) {
            TokenKind::Operator("~" | "!") | TokenKind::Punctuation('(') => true,
            TokenKind::Operator("+" | "-" | "&" | "*" | "^" | "++" | "--") => unambiguous,
            TokenKind::Identifier => {
                let word = self.nth(index).lexeme.as_str();
                !matches!(word, "with" | "when" | "and" | "or")
            }
            kind if kind.is_literal() => true,
            TokenKind::Keyword(keyword) => !matches!(
                keyword,
                Keyword::Is | Keyword::As | Keyword::Switch | Keyword::In
            ),
            _ => false,
        }
    }

    /// A `,` directly inside the group `open..close`.
    pub(in crate::frontend::parser) fn has_top_level_comma(&mut self, open: usize, close: usize) -> bool {
        let mut depth = 0usize;
        for index in open + 1..close.saturating_sub(1) {
            match self.nth_kind(index) {
                TokenKind::Punctuation('(' | '[' | '{') => depth += 1,
                TokenKind::Punctuation(')' | ']' | '}') => depth = depth.saturating_sub(1),
                TokenKind::Punctuation(',') if depth == 0 => return true,
                _ => {}
            }
        }
        false
    }

    /// `Name<...>` in expression position: the argument list must close and
    /// be followed by a token that cannot continue a comparison.
    pub(in crate::frontend::parser) fn generic_name_ahead(&mut self, at: usize) -> bool {
        if self.nth_kind(at) != TokenKind::Identifier || !self.peek_operator_n(at + 1, "<") {
            return false;
        }
        let Some(end) = self.scan_type_arguments(at + 1) else {
            return false;
        };
        match self.nth_kind(end) {
            TokenKind::Punctuation('(' | ')' | ']' | '}' | ':' | ';' | ',' | '.' | '[')
            | TokenKind::InterpolationCloseBrace
            | TokenKind::InterpolationFormat
            | TokenKind::EndOfFile
            | TokenKind::ScannerFault => true,
            TokenKind::Operator(op) => {
                matches!(op, "?" | "==" | "!=" | "|" | "^" | "&&" | "||" | "&" | "->")
            }
            _ => false,
        }
    }

    /// Whether the token `offset` ahead can begin an expression.
    pub(in crate::frontend::parser) fn can_start_expression_n(&mut self, offset: usize) -> bool {
        match self.nth_kind(offset) {
            TokenKind::Identifier | TokenKind::DirectiveIf => true,
            kind if kind.is_literal() => true,
            TokenKind::Keyword(keyword) => {
                keyword.is_predefined_type()
                    || keyword.is_type_operator()
                    || matches!(
                        keyword,
                        Keyword::This
                            | Keyword::Base
                            | Keyword::New
                            | Keyword::Scope
                            | Keyword::Default
                            | Keyword::Delegate
                            | Keyword::Static
                            | Keyword::Checked
                            | Keyword::Unchecked
                    )
            }
            TokenKind::Punctuation('(' | '[') => true,
            TokenKind::Punctuation('.') => self.nth_kind(offset + 1) == TokenKind::Identifier,
            TokenKind::Operator(op) => is_prefix_operator(op),
            _ => false,
        }
    }

    /// `Type name` followed by `,` or `)`: an out-variable or tuple element
    /// declaration.
    pub(in crate::frontend::parser) fn declaration_expression_ahead(&mut self) -> bool {
        let Some(scan) = self.scan_type(0, TypeContext::Plain) else {
            return false;
        };
        self.nth_kind(scan.end) == TokenKind::Identifier
            && matches!(
                self.nth_kind(scan.end + 1),
                TokenKind::Punctuation(',' | ')')
            )
    }

    /// `[captures] [attributes] static (params) =>` starting at `at`.
    pub(in crate::frontend::parser) fn lambda_after_brackets(&mut self, at: usize) -> bool {
        let mut index = at;
        while self.peek_punctuation_n(index, '[') {
            match self.skip_balanced(index) {
                Some(end) => index = end,
                None => return false,
            }
        }
        while self.peek_keyword_n(index, Keyword::Static) {
            index += 1;
        }
        self.lambda_parameters_ahead(index)
    }

    /// `x =>` or `(...) =>` at `at`.
    pub(in crate::frontend::parser) fn lambda_parameters_ahead(&mut self, at: usize) -> bool {
        match self.nth_kind(at) {
            TokenKind::Identifier => self.peek_operator_n(at + 1, "=>"),
            TokenKind::Punctuation('(') => self
                .skip_balanced(at)
                .is_some_and(|end| self.peek_operator_n(end, "=>")),
            _ => false,
        }
    }

    /// After `is`, whether a bare type test follows rather than a pattern.
    pub(in crate::frontend::parser) fn is_type_test_ahead(&mut self, at: usize) -> bool {
        if self.peek_identifier_n(at, "not") && !self.type_can_end_before(at + 1) {
            return false;
        }
        let Some(scan) = self.scan_type(at, TypeContext::IsAs) else {
            return false;
        };
        !matches!(
            self.nth_kind(scan.end),
            TokenKind::Identifier | TokenKind::Punctuation('(' | '{')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ParenShape;
    use crate::config::ParseOptions;
    use crate::frontend::parser::Parser;

    fn shape(source: &str) -> ParenShape {
        let options = ParseOptions::default();
        let mut parser = Parser::new(source, &options);
        parser.classify_paren(0)
    }

    #[test]
    fn paren_shapes() {
        assert_eq!(shape("(int)x"), ParenShape::Cast);
        assert_eq!(shape("(Foo)x"), ParenShape::Cast);
        assert_eq!(shape("(Foo) - x"), ParenShape::Parenthesized);
        assert_eq!(shape("(int) - x"), ParenShape::Cast);
        assert_eq!(shape("(Foo*) &x"), ParenShape::Cast);
        assert_eq!(shape("(a, b)"), ParenShape::Tuple);
        assert_eq!(shape("(a, b) => a"), ParenShape::Lambda);
        assert_eq!(shape("(.)x"), ParenShape::InferredCast);
        assert_eq!(shape("(a + b) * c"), ParenShape::Parenthesized);
        assert_eq!(shape("(Dictionary<int, int>)x"), ParenShape::Cast);
    }

    #[test]
    fn generic_name_needs_a_closing_follow_token() {
        let options = ParseOptions::default();
        let mut parser = Parser::new("F<A, B>(x)", &options);
        assert!(parser.generic_name_ahead(0));
        let mut parser = Parser::new("a < b > c", &options);
        assert!(!parser.generic_name_ahead(0));
        let mut parser = Parser::new("a < b", &options);
        assert!(!parser.generic_name_ahead(0));
    }

    #[test]
    fn declaration_expressions_in_argument_position() {
        let options = ParseOptions::default();
        let mut parser = Parser::new("int value)", &options);
        assert!(parser.declaration_expression_ahead());
        let mut parser = Parser::new("value)", &options);
        assert!(!parser.declaration_expression_ahead());
    }
}
