//! Expression parsing: a Pratt loop over [`Precedence`] levels.
//!
//! Operands come from `primary.rs`; every ambiguous prefix (casts, tuples,
//! lambdas, generic names) is settled in `lookahead.rs` before a node opens.

use super::*;

mod lambda;
mod lookahead;
mod primary;
mod strings;

pub(in crate::frontend::parser) use lookahead::ParenShape;

/// Which expression forms are allowed at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::frontend::parser) enum ExprMode {
    Normal,
    /// Constant pattern: bitwise-or and tighter operators only; no
    /// assignment, conditional, `is`/`as`, switch, with, lambda or creation.
    Constant,
}

parser_impl! {
    pub(in crate::frontend::parser) fn parse_expression(&mut self) -> bool {
        self.parse_expression_in(Precedence::Select, ExprMode::Normal)
    }

    pub(in crate::frontend::parser) fn parse_constant_expression(&mut self) -> bool {
        self.parse_expression_in(Precedence::Select, ExprMode::Constant)
    }

    /// Parses an expression whose operators all bind at least as tightly as `min`.
    pub(in crate::frontend::parser) fn parse_expression_in(
        &mut self,
        min: Precedence,
        mode: ExprMode,
    ) -> bool {
        if !self.enter_nesting() {
            self.missing_silent(TokenKind::Identifier);
            return false;
        }
        let checkpoint = self.builder.checkpoint();
        let parsed = self.parse_unary(mode);
        if parsed {
            while self.parse_operator(checkpoint, min, mode) {}
        }
        self.leave_nesting();
        parsed
    }

    fn parse_unary(&mut self, mode: ExprMode) -> bool {
        match self.peek_kind() {
            TokenKind::Operator(op) if is_prefix_operator(op) => {
                self.node(SyntaxKind::PrefixUnaryExpression, |p| {
                    p.bump_labeled(Field::Operator);
                    p.parse_expression_in(Precedence::Unary, mode);
                });
                true
            }
            TokenKind::Operator("..." | "..<") if mode == ExprMode::Normal => {
                self.node(SyntaxKind::RangeExpression, |p| {
                    p.bump_labeled(Field::Operator);
                    if p.can_start_expression_n(0) {
                        p.labeled(Field::Right, |p| p.parse_expression_in(Precedence::Range, mode));
                    }
                });
                true
            }
            TokenKind::Punctuation('(') => match self.classify_paren(0) {
                shape @ (ParenShape::Cast | ParenShape::InferredCast) => {
                    self.parse_cast(shape, mode);
                    true
                }
                _ => self.parse_primary(mode),
            },
            _ => self.parse_primary(mode),
        }
    }

    fn parse_cast(&mut self, shape: ParenShape, mode: ExprMode) {
        self.node(SyntaxKind::CastExpression, |p| {
            p.bump();
            if shape == ParenShape::InferredCast {
                p.bump();
            } else {
                p.labeled(Field::Type, Self::parse_type);
            }
            p.expect_punctuation(')');
            p.labeled(Field::Value, |p| p.parse_expression_in(Precedence::Cast, mode));
        });
    }

    /// Applies one operator to the operand emitted since `checkpoint`.
    /// Returns false when the next token is not an operator allowed here.
    fn parse_operator(&mut self, checkpoint: Checkpoint, min: Precedence, mode: ExprMode) -> bool {
        let normal = mode == ExprMode::Normal;
        if normal
            && min <= Precedence::Assignment
            && let Some((symbol, width)) = self.assignment_operator_ahead()
        {
            self.wrap(checkpoint, Field::Left, SyntaxKind::AssignmentExpression);
            self.bump_joined(symbol, width, Field::Operator);
            self.labeled(Field::Right, |p| {
                p.parse_expression_in(Precedence::Assignment, mode)
            });
            self.builder.finish_node();
            return true;
        }
        if normal && min <= Precedence::Conditional && self.check_operator("?") {
            self.wrap(checkpoint, Field::Condition, SyntaxKind::ConditionalExpression);
            self.bump();
            self.labeled(Field::Consequence, |p| {
                p.parse_expression_in(Precedence::Assignment, mode)
            });
            self.expect_punctuation(':');
            self.labeled(Field::Alternative, |p| {
                p.parse_expression_in(Precedence::Conditional, mode)
            });
            self.builder.finish_node();
            return true;
        }
        if normal && min <= Precedence::Relational {
            if self.check_keyword(Keyword::Is) {
                self.parse_is(checkpoint);
                return true;
            }
            if self.check_keyword(Keyword::As) {
                self.wrap(checkpoint, Field::Left, SyntaxKind::AsExpression);
                self.bump_labeled(Field::Operator);
                self.labeled(Field::Right, |p| p.parse_type_in(TypeContext::IsAs));
                self.builder.finish_node();
                return true;
            }
        }
        if normal
            && min <= Precedence::With
            && self.peek_identifier("with")
            && self.peek_punctuation_n(1, '{')
        {
            self.wrap(checkpoint, Field::Expression, SyntaxKind::WithExpression);
            self.bump();
            self.labeled(Field::Initializer, Self::parse_initializer_expression);
            self.builder.finish_node();
            return true;
        }
        if normal
            && min <= Precedence::Switch
            && self.check_keyword(Keyword::Switch)
            && self.peek_punctuation_n(1, '{')
        {
            self.wrap(checkpoint, Field::Value, SyntaxKind::SwitchExpression);
            self.parse_switch_expression_body();
            self.builder.finish_node();
            return true;
        }
        if normal
            && min <= Precedence::Range
            && matches!(self.peek_kind(), TokenKind::Operator("..." | "..<"))
        {
            self.wrap(checkpoint, Field::Left, SyntaxKind::RangeExpression);
            self.bump_labeled(Field::Operator);
            if self.can_start_expression_n(0) {
                self.labeled(Field::Right, |p| p.parse_expression_in(Precedence::Range, mode));
            }
            self.builder.finish_node();
            return true;
        }
        let Some((symbol, width)) = self.binary_operator_ahead() else {
            return false;
        };
        let Some((precedence, associativity)) = binary_precedence(symbol) else {
            return false;
        };
        if precedence < min || (!normal && !allowed_in_constant_pattern(precedence)) {
            return false;
        }
        self.wrap(checkpoint, Field::Left, SyntaxKind::BinaryExpression);
        self.bump_joined(symbol, width, Field::Operator);
        let right = match associativity {
            Associativity::Left => precedence.tighter(),
            Associativity::Right => precedence,
        };
        self.labeled(Field::Right, |p| p.parse_expression_in(right, mode));
        self.builder.finish_node();
        true
    }

    /// `x is T` when a bare type follows, otherwise `x is <pattern>`.
    fn parse_is(&mut self, checkpoint: Checkpoint) {
        if self.is_type_test_ahead(1) {
            self.wrap(checkpoint, Field::Left, SyntaxKind::IsExpression);
            self.bump_labeled(Field::Operator);
            self.labeled(Field::Right, |p| p.parse_type_in(TypeContext::IsAs));
        } else {
            self.wrap(checkpoint, Field::Expression, SyntaxKind::IsPatternExpression);
            self.bump();
            self.labeled(Field::Pattern, |p| p.parse_pattern(PatternContext::Expression));
        }
        self.builder.finish_node();
    }

    /// `switch { pattern [when cond] => value, ... }` after the governing expression.
    fn parse_switch_expression_body(&mut self) {
        self.bump();
        self.bump();
        let scope = self.enter_scope();
        while !self.check_punctuation('}') && !self.at_end() {
            let before = self.stream.consumed();
            self.node(SyntaxKind::SwitchExpressionArm, |p| {
                p.labeled(Field::Pattern, |p| p.parse_pattern(PatternContext::SwitchArm));
                if p.peek_identifier("when") {
                    p.parse_when_clause();
                }
                p.expect_operator("=>");
                p.labeled(Field::Value, Self::parse_expression);
            });
            if self.consume_punctuation(',') || self.check_punctuation('}') {
                continue;
            }
            if self.stream.consumed() == before {
                self.recover_member("switch expression arm");
            } else {
                self.expect_punctuation(',');
            }
        }
        self.close_scope(scope);
        self.expect_punctuation('}');
    }

    /// `{ a, b = 1, ... }` as a value or object initializer.
    pub(in crate::frontend::parser) fn parse_initializer_expression(&mut self) {
        self.node(SyntaxKind::InitializerExpression, |p| {
            p.bump();
            while !p.check_punctuation('}') && !p.at_end() {
                p.parse_expression();
                if !p.consume_punctuation(',') {
                    break;
                }
            }
            p.expect_punctuation('}');
        });
    }

    pub(in crate::frontend::parser) fn parse_argument_list(&mut self) {
        self.node(SyntaxKind::ArgumentList, |p| {
            p.expect_punctuation('(');
            if !p.check_punctuation(')') {
                loop {
                    p.parse_argument();
                    if !p.consume_punctuation(',') {
                        break;
                    }
                }
            }
            p.expect_punctuation(')');
        });
    }

    /// `[a, b]`; emitted as `kind` so element bindings reuse it.
    pub(in crate::frontend::parser) fn parse_bracketed_arguments(&mut self, kind: SyntaxKind) {
        self.node(kind, |p| {
            p.bump();
            while !p.check_punctuation(']') && !p.at_end() {
                p.parse_argument();
                if !p.consume_punctuation(',') {
                    break;
                }
            }
            p.expect_punctuation(']');
        });
    }

    pub(in crate::frontend::parser) fn parse_argument(&mut self) {
        self.node(SyntaxKind::Argument, |p| {
            if p.peek_kind() == TokenKind::Identifier && p.peek_punctuation_n(1, ':') {
                p.labeled(Field::Name, |p| p.parse_identifier(false));
                p.bump();
            }
            if matches!(
                p.peek_kind(),
                TokenKind::Keyword(Keyword::Ref | Keyword::Out | Keyword::In)
            ) {
                p.bump();
            }
            if p.declaration_expression_ahead() {
                p.node(SyntaxKind::DeclarationExpression, |p| {
                    p.labeled(Field::Type, Self::parse_type);
                    p.labeled(Field::Name, |p| p.parse_identifier(true));
                });
            } else {
                p.parse_expression();
            }
        });
    }

    fn binary_operator_ahead(&mut self) -> Option<(&'static str, usize)> {
        match self.peek_kind() {
            TokenKind::Operator(">") => {
                if self.peek_operator_n(1, ">") && self.adjacent_n(0) {
                    if self.peek_operator_n(2, ">") && self.adjacent_n(1) {
                        return Some((">>>", 3));
                    }
                    return Some((">>", 2));
                }
                if self.peek_operator_n(1, ">=") && self.adjacent_n(0) {
                    return None;
                }
                Some((">", 1))
            }
            TokenKind::Operator(op) if binary_precedence(op).is_some() => Some((op, 1)),
            _ => None,
        }
    }

    fn assignment_operator_ahead(&mut self) -> Option<(&'static str, usize)> {
        match self.peek_kind() {
            TokenKind::Operator(">") if self.peek_operator_n(1, ">=") && self.adjacent_n(0) => {
                Some((">>=", 2))
            }
            TokenKind::Operator(op) if is_assignment_operator(op) => Some((op, 1)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_expression;

    fn sexp(source: &str) -> String {
        let result = parse_expression(source);
        assert!(
            result.diagnostics.is_empty(),
            "{source}: {:?}",
            result.diagnostics
        );
        result.tree.child_nodes().next().map(|node| node.to_sexp()).unwrap_or_default()
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            sexp("1 + 2 * 3"),
            r#"(binary_expression left: (integer_literal "1") operator: "+" right: (binary_expression left: (integer_literal "2") operator: "*" right: (integer_literal "3")))"#
        );
    }

    #[test]
    fn coalescing_is_right_associative() {
        assert_eq!(
            sexp("a ?? b ?? c"),
            r#"(binary_expression left: (identifier "a") operator: "??" right: (binary_expression left: (identifier "b") operator: "??" right: (identifier "c")))"#
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(
            sexp("a - b - c"),
            r#"(binary_expression left: (binary_expression left: (identifier "a") operator: "-" right: (identifier "b")) operator: "-" right: (identifier "c"))"#
        );
    }

    #[test]
    fn postfix_increment_is_an_operand() {
        assert_eq!(
            sexp("x++ + 1"),
            r#"(binary_expression left: (postfix_unary_expression (identifier "x") operator: "++") operator: "+" right: (integer_literal "1"))"#
        );
    }

    #[test]
    fn adjacent_greater_than_tokens_join_into_shifts() {
        assert_eq!(
            sexp("a >> 2"),
            r#"(binary_expression left: (identifier "a") operator: ">>" right: (integer_literal "2"))"#
        );
        assert_eq!(
            sexp("a >>> 2"),
            r#"(binary_expression left: (identifier "a") operator: ">>>" right: (integer_literal "2"))"#
        );
        assert_eq!(
            sexp("a >>= 2"),
            r#"(assignment_expression left: (identifier "a") operator: ">>=" right: (integer_literal "2"))"#
        );
    }

    #[test]
    fn assignment_and_conditional_are_right_associative() {
        assert_eq!(
            sexp("a = b = c"),
            r#"(assignment_expression left: (identifier "a") operator: "=" right: (assignment_expression left: (identifier "b") operator: "=" right: (identifier "c")))"#
        );
        assert_eq!(
            sexp("a ? b : c ? d : e"),
            r#"(conditional_expression condition: (identifier "a") consequence: (identifier "b") alternative: (conditional_expression condition: (identifier "c") consequence: (identifier "d") alternative: (identifier "e")))"#
        );
    }

    #[test]
    fn ranges_take_optional_operands() {
        assert_eq!(
            sexp("0...10"),
            r#"(range_expression left: (integer_literal "0") operator: "..." right: (integer_literal "10"))"#
        );
        assert_eq!(
            sexp("..<n"),
            r#"(range_expression operator: "..<" right: (identifier "n"))"#
        );
    }

    #[test]
    fn is_with_bare_type_versus_pattern() {
        assert_eq!(
            sexp("x is Foo"),
            r#"(is_expression left: (identifier "x") operator: "is" right: (identifier "Foo"))"#
        );
        assert_eq!(
            sexp("x is Foo f"),
            r#"(is_pattern_expression expression: (identifier "x") pattern: (declaration_pattern type: (identifier "Foo") name: (identifier "f")))"#
        );
        assert_eq!(
            sexp("x is int ? a : b"),
            r#"(conditional_expression condition: (is_expression left: (identifier "x") operator: "is" right: (predefined_type "int")) consequence: (identifier "a") alternative: (identifier "b"))"#
        );
    }
}
