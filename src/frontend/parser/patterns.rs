//! Pattern subgrammar for `is`, `case` labels and switch expression arms.
//!
//! `or` binds loosest, then `and`, then negation. The symbolic spellings
//! `||`/`&&` are combinators only where a pattern cannot be followed by a
//! boolean operator: case labels and switch arms.

use super::*;

/// Where a pattern appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PatternContext {
    /// Right of `is`.
    Expression,
    CaseLabel,
    SwitchArm,
}

impl PatternContext {
    fn symbolic_combinators(self) -> bool {
        self != PatternContext::Expression
    }
}

/// What precedes the clauses of a recursive pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecursiveHead {
    None,
    Type,
    /// `.Case(...)` on an enum with payloads.
    DotCase,
}

parser_impl! {
    pub(super) fn parse_pattern(&mut self, context: PatternContext) -> bool {
        if !self.enter_nesting() {
            self.missing_silent(TokenKind::Identifier);
            return false;
        }
        let checkpoint = self.builder.checkpoint();
        let parsed = self.parse_and_pattern(context);
        while self.combinator_ahead("or", "||", context) {
            self.wrap(checkpoint, Field::Left, SyntaxKind::OrPattern);
            self.bump_labeled(Field::Operator);
            self.labeled(Field::Right, |p| p.parse_and_pattern(context));
            self.builder.finish_node();
        }
        self.leave_nesting();
        parsed
    }

    fn parse_and_pattern(&mut self, context: PatternContext) -> bool {
        let checkpoint = self.builder.checkpoint();
        let parsed = self.parse_negated_pattern(context);
        while self.combinator_ahead("and", "&&", context) {
            self.wrap(checkpoint, Field::Left, SyntaxKind::AndPattern);
            self.bump_labeled(Field::Operator);
            self.labeled(Field::Right, |p| p.parse_negated_pattern(context));
            self.builder.finish_node();
        }
        parsed
    }

    fn combinator_ahead(&mut self, word: &str, symbol: &str, context: PatternContext) -> bool {
        (self.peek_identifier(word) && self.can_start_pattern_n(1))
            || (context.symbolic_combinators() && self.check_operator(symbol))
    }

    fn parse_negated_pattern(&mut self, context: PatternContext) -> bool {
        let negation = self.check_operator("!")
            || (self.peek_identifier("not") && self.can_start_pattern_n(1));
        if !negation {
            return self.parse_primary_pattern(context);
        }
        self.node(SyntaxKind::NegatedPattern, |p| {
            p.bump_labeled(Field::Operator);
            p.labeled(Field::Pattern, |p| p.parse_negated_pattern(context))
        })
    }

    fn parse_primary_pattern(&mut self, context: PatternContext) -> bool {
        match self.peek_kind() {
            TokenKind::Operator(op) if is_relational_pattern_operator(op) => {
                self.node(SyntaxKind::RelationalPattern, |p| {
                    p.bump_labeled(Field::Operator);
                    p.labeled(Field::Value, |p| {
                        p.parse_expression_in(Precedence::Shift, ExprMode::Constant)
                    })
                })
            }
            TokenKind::Operator("?") => {
                self.node(SyntaxKind::Discard, Self::bump);
                true
            }
            TokenKind::Identifier if self.peek_identifier("_") && self.pattern_can_end_at(1) => {
                self.node(SyntaxKind::Discard, Self::bump);
                true
            }
            TokenKind::Identifier
                if (self.peek_identifier("var") || self.peek_identifier("let"))
                    && (self.designation_at(1) || self.peek_punctuation_n(1, '(')) =>
            {
                self.node(SyntaxKind::VarPattern, |p| {
                    p.bump();
                    p.labeled(Field::Name, Self::parse_designation);
                });
                true
            }
            TokenKind::Punctuation('(') => {
                if self.positional_clause_ahead() {
                    self.parse_recursive_pattern(RecursiveHead::None, context);
                } else {
                    self.node(SyntaxKind::ParenthesizedPattern, |p| {
                        p.bump();
                        p.labeled(Field::Pattern, |p| p.parse_pattern(context));
                        p.expect_punctuation(')');
                    });
                }
                true
            }
            TokenKind::Punctuation('{') => {
                self.parse_recursive_pattern(RecursiveHead::None, context);
                true
            }
            TokenKind::Punctuation('.')
                if self.nth_kind(1) == TokenKind::Identifier
                    && matches!(self.nth_kind(2), TokenKind::Punctuation('(' | '{')) =>
            {
                self.parse_recursive_pattern(RecursiveHead::DotCase, context);
                true
            }
            _ => self.parse_type_led_pattern(context),
        }
    }

    /// Declaration, recursive, type or constant pattern, decided by what
    /// follows a leading type.
    fn parse_type_led_pattern(&mut self, context: PatternContext) -> bool {
        let Some(scan) = self.scan_type(0, TypeContext::IsAs) else {
            return self.parse_constant_pattern();
        };
        match self.nth_kind(scan.end) {
            TokenKind::Punctuation('(' | '{') => {
                self.parse_recursive_pattern(RecursiveHead::Type, context);
                true
            }
            _ if self.designation_at(scan.end) => {
                self.node(SyntaxKind::DeclarationPattern, |p| {
                    p.labeled(Field::Type, |p| p.parse_type_in(TypeContext::IsAs));
                    p.labeled(Field::Name, Self::parse_designation);
                });
                true
            }
            _ if scan.unambiguous && self.pattern_can_end_at(scan.end) => {
                self.node(SyntaxKind::TypePattern, |p| {
                    p.labeled(Field::Type, |p| p.parse_type_in(TypeContext::IsAs))
                })
            }
            _ => self.parse_constant_pattern(),
        }
    }

    fn parse_constant_pattern(&mut self) -> bool {
        self.node(SyntaxKind::ConstantPattern, Self::parse_constant_expression)
    }

    fn parse_recursive_pattern(&mut self, head: RecursiveHead, context: PatternContext) {
        self.node(SyntaxKind::RecursivePattern, |p| {
            match head {
                RecursiveHead::Type => {
                    p.labeled(Field::Type, |p| p.parse_type_in(TypeContext::IsAs));
                }
                RecursiveHead::DotCase => {
                    p.bump();
                    p.labeled(Field::Name, |p| p.parse_identifier(true));
                }
                RecursiveHead::None => {}
            }
            if p.check_punctuation('(') {
                p.parse_subpattern_clause(SyntaxKind::PositionalPatternClause, ')', context);
            }
            if p.check_punctuation('{') {
                p.parse_subpattern_clause(SyntaxKind::PropertyPatternClause, '}', context);
            }
            if p.designation_at(0) {
                p.parse_designation();
            }
        });
    }

    fn parse_subpattern_clause(&mut self, kind: SyntaxKind, close: char, context: PatternContext) {
        self.node(kind, |p| {
            p.bump();
            while !p.check_punctuation(close) && !p.at_end() {
                p.node(SyntaxKind::Subpattern, |p| {
                    if p.peek_kind() == TokenKind::Identifier && p.peek_punctuation_n(1, ':') {
                        p.labeled(Field::Name, |p| p.parse_identifier(false));
                        p.bump();
                    }
                    p.labeled(Field::Pattern, |p| p.parse_pattern(context));
                });
                if !p.consume_punctuation(',') {
                    break;
                }
            }
            p.expect_punctuation(close);
        });
    }

    /// Identifier, `_`, or `(a, b)` after `var`.
    fn parse_designation(&mut self) {
        match self.peek_kind() {
            TokenKind::Punctuation('(') => {
                self.node(SyntaxKind::ParenthesizedVariableDesignation, |p| {
                    p.bump();
                    while !p.check_punctuation(')') && !p.at_end() {
                        p.parse_designation();
                        if !p.consume_punctuation(',') {
                            break;
                        }
                    }
                    p.expect_punctuation(')');
                });
            }
            TokenKind::Identifier if self.peek_identifier("_") => {
                self.node(SyntaxKind::Discard, Self::bump);
            }
            _ => {
                self.parse_identifier(false);
            }
        }
    }

    /// `when condition` after a case pattern or switch arm.
    pub(super) fn parse_when_clause(&mut self) {
        self.node(SyntaxKind::WhenClause, |p| {
            p.bump();
            p.labeled(Field::Condition, Self::parse_expression);
        });
    }

    /// An identifier usable as a variable name in a pattern.
    fn designation_at(&mut self, index: usize) -> bool {
        self.nth_kind(index) == TokenKind::Identifier
            && !matches!(self.nth(index).lexeme.as_str(), "when" | "and" | "or")
    }

    /// A group with a top-level comma or no content: `(a, b)`, `()`.
    fn positional_clause_ahead(&mut self) -> bool {
        match self.skip_balanced(0) {
            Some(2) => true,
            Some(end) => self.has_top_level_comma(0, end),
            None => false,
        }
    }

    fn pattern_can_end_at(&mut self, index: usize) -> bool {
        self.type_can_end_before(index)
            || matches!(self.nth_kind(index), TokenKind::Operator("=>"))
            || (self.nth_kind(index) == TokenKind::Identifier
                && matches!(self.nth(index).lexeme.as_str(), "when" | "and" | "or"))
    }

    fn can_start_pattern_n(&mut self, offset: usize) -> bool {
        match self.nth_kind(offset) {
            TokenKind::Operator(op) if is_relational_pattern_operator(op) || op == "?" => true,
            TokenKind::Punctuation('{') => true,
            _ => self.can_start_expression_n(offset),
        }
    }
}
