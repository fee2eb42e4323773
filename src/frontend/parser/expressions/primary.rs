//! Operands and the postfix chain that follows them.

use super::*;

parser_impl! {
    pub(in crate::frontend::parser) fn parse_primary(&mut self, mode: ExprMode) -> bool {
        let checkpoint = self.builder.checkpoint();
        if !self.parse_primary_head(mode) {
            return false;
        }
        self.parse_postfix(checkpoint);
        true
    }

    #[expect(clippy::too_many_lines, reason = "one arm per operand form")]
    fn parse_primary_head(&mut self, mode: ExprMode) -> bool {
        let normal = mode == ExprMode::Normal;
        match self.peek_kind() {
            TokenKind::IntegerLiteral => self.node(SyntaxKind::IntegerLiteral, Self::bump),
            TokenKind::RealLiteral => self.node(SyntaxKind::RealLiteral, Self::bump),
            TokenKind::CharLiteral => self.node(SyntaxKind::CharacterLiteral, Self::bump),
            TokenKind::StringLiteral => self.node(SyntaxKind::StringLiteral, Self::bump),
            TokenKind::VerbatimStringLiteral => {
                self.node(SyntaxKind::VerbatimStringLiteral, Self::bump);
            }
            TokenKind::RawStringStart => self.parse_raw_string(),
            TokenKind::InterpolationStart => self.parse_interpolated_string(),
            TokenKind::Keyword(Keyword::True | Keyword::False) => {
                self.node(SyntaxKind::BooleanLiteral, Self::bump);
            }
            TokenKind::Keyword(Keyword::Null) => self.node(SyntaxKind::NullLiteral, Self::bump),
            TokenKind::Keyword(Keyword::This | Keyword::Base) => self.bump(),
            TokenKind::Identifier => {
                if normal && self.peek_operator_n(1, "=>") {
                    self.parse_lambda();
                } else if self.peek_identifier("nameof") && self.nameof_operator_ahead() {
                    self.parse_type_operator();
                } else if self.generic_name_ahead(0) {
                    self.node(SyntaxKind::GenericName, |p| {
                        p.parse_identifier(false);
                        p.parse_type_argument_list();
                    });
                } else {
                    self.parse_identifier(false);
                }
            }
            TokenKind::Keyword(keyword) if keyword.is_predefined_type() => {
                self.node(SyntaxKind::PredefinedType, Self::bump);
            }
            TokenKind::Keyword(Keyword::New | Keyword::Scope) if normal => self.parse_allocation(),
            TokenKind::Keyword(Keyword::Delegate) if normal => self.parse_anonymous_method(),
            TokenKind::Keyword(Keyword::Static) if normal && self.lambda_after_brackets(0) => {
                self.parse_lambda();
            }
            TokenKind::Keyword(Keyword::Static)
                if normal && self.static_anonymous_method_ahead() =>
            {
                self.parse_anonymous_method();
            }
            TokenKind::Punctuation('[') if normal && self.lambda_after_brackets(0) => {
                self.parse_lambda();
            }
            TokenKind::Punctuation('(') => match self.classify_paren(0) {
                ParenShape::Lambda if normal => self.parse_lambda(),
                ParenShape::Tuple => self.parse_tuple_expression(),
                _ => self.node(SyntaxKind::ParenthesizedExpression, |p| {
                    p.bump();
                    p.parse_expression();
                    p.expect_punctuation(')');
                }),
            },
            TokenKind::Punctuation('{') if normal => self.parse_initializer_expression(),
            TokenKind::Punctuation('.') if self.nth_kind(1) == TokenKind::Identifier => {
                self.node(SyntaxKind::MemberAccessExpression, |p| {
                    p.bump();
                    p.labeled(Field::Name, Self::parse_member_name);
                });
            }
            TokenKind::Keyword(Keyword::Default) => {
                self.node(SyntaxKind::DefaultExpression, |p| {
                    p.bump();
                    if p.check_punctuation('(') {
                        p.bump();
                        p.labeled(Field::Type, Self::parse_type);
                        p.expect_punctuation(')');
                    }
                });
            }
            TokenKind::Keyword(keyword) if keyword.is_type_operator() => {
                self.parse_type_operator();
            }
            TokenKind::Keyword(Keyword::Checked | Keyword::Unchecked) => {
                self.node(SyntaxKind::CheckedExpression, |p| {
                    p.bump();
                    p.expect_punctuation('(');
                    p.parse_expression();
                    p.expect_punctuation(')');
                });
            }
            TokenKind::DirectiveIf => self.parse_preproc_if(ContentKind::Expression),
            _ => {
                self.error_expected("expression");
                self.missing_silent(TokenKind::Identifier);
                return false;
            }
        }
        true
    }

    /// Member name after `.`, `->` or `?.`; keywords are allowed.
    fn parse_member_name(&mut self) {
        if self.generic_name_ahead(0) {
            self.node(SyntaxKind::GenericName, |p| {
                p.parse_identifier(false);
                p.parse_type_argument_list();
            });
        } else {
            self.parse_identifier(true);
        }
    }

    fn parse_postfix(&mut self, checkpoint: Checkpoint) {
        loop {
            match self.peek_kind() {
                TokenKind::Punctuation('.') | TokenKind::Operator("->") => {
                    self.wrap(checkpoint, Field::Expression, SyntaxKind::MemberAccessExpression);
                    self.bump();
                    self.labeled(Field::Name, Self::parse_member_name);
                }
                TokenKind::Punctuation('(') => {
                    self.wrap(checkpoint, Field::Function, SyntaxKind::InvocationExpression);
                    self.labeled(Field::Arguments, Self::parse_argument_list);
                }
                TokenKind::Operator("!") if self.adjacent_n(0) && self.peek_punctuation_n(1, '(') => {
                    self.wrap(checkpoint, Field::Function, SyntaxKind::InvocationExpression);
                    self.bump();
                    self.labeled(Field::Arguments, Self::parse_argument_list);
                }
                TokenKind::Punctuation('[') => {
                    self.wrap(checkpoint, Field::Expression, SyntaxKind::ElementAccessExpression);
                    self.labeled(Field::Subscript, |p| {
                        p.parse_bracketed_arguments(SyntaxKind::BracketedArgumentList);
                    });
                }
                TokenKind::Operator("?")
                    if self.adjacent_n(0)
                        && matches!(self.nth_kind(1), TokenKind::Punctuation('.' | '[')) =>
                {
                    self.wrap(
                        checkpoint,
                        Field::Condition,
                        SyntaxKind::ConditionalAccessExpression,
                    );
                    self.bump();
                    if self.check_punctuation('.') {
                        self.node(SyntaxKind::MemberBindingExpression, |p| {
                            p.bump();
                            p.labeled(Field::Name, Self::parse_member_name);
                        });
                    } else {
                        self.node(SyntaxKind::ElementBindingExpression, |p| {
                            p.parse_bracketed_arguments(SyntaxKind::BracketedArgumentList);
                        });
                    }
                }
                TokenKind::Operator("++" | "--") => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::PostfixUnaryExpression);
                    self.bump_labeled(Field::Operator);
                }
                _ => break,
            }
            self.builder.finish_node();
        }
    }

    /// `sizeof(T)`, `decltype(expr)`, `offsetof(T, field)`, `nameof(T, member)`.
    pub(in crate::frontend::parser) fn parse_type_operator(&mut self) {
        self.node(SyntaxKind::TypeOperatorExpression, |p| {
            let operator = p.peek_kind();
            p.bump_labeled(Field::Operator);
            p.expect_punctuation('(');
            match operator {
                TokenKind::Keyword(Keyword::Comptype | Keyword::Decltype) => {
                    p.labeled(Field::Expression, Self::parse_expression);
                }
                TokenKind::Keyword(Keyword::Offsetof) | TokenKind::Identifier => {
                    p.labeled(Field::Type, Self::parse_type);
                    p.expect_punctuation(',');
                    p.labeled(Field::Name, |p| p.parse_identifier(true));
                }
                _ => {
                    p.labeled(Field::Type, Self::parse_type);
                }
            }
            p.expect_punctuation(')');
        });
    }

    /// `nameof(T, member)`; a single-argument `nameof(x)` stays an invocation.
    fn nameof_operator_ahead(&mut self) -> bool {
        if !self.peek_punctuation_n(1, '(') {
            return false;
        }
        match self.skip_balanced(1) {
            Some(end) => self.has_top_level_comma(1, end),
            None => false,
        }
    }

    fn static_anonymous_method_ahead(&mut self) -> bool {
        let mut index = 0;
        while self.peek_keyword_n(index, Keyword::Static) {
            index += 1;
        }
        self.peek_keyword_n(index, Keyword::Delegate)
    }

    fn parse_tuple_expression(&mut self) {
        self.node(SyntaxKind::TupleExpression, |p| {
            p.bump();
            loop {
                p.parse_argument();
                if !p.consume_punctuation(',') {
                    break;
                }
            }
            p.expect_punctuation(')');
        });
    }

    /// Token count of `new`/`scope` plus its allocator suffix
    /// (`::`, `:name`, `:(expr)`), starting at `at`.
    pub(in crate::frontend::parser) fn allocation_prefix_len(&mut self, at: usize) -> usize {
        if self.peek_operator_n(at + 1, "::") {
            return 2;
        }
        if !self.peek_punctuation_n(at + 1, ':') {
            return 1;
        }
        match self.nth_kind(at + 2) {
            TokenKind::Punctuation(':') | TokenKind::Identifier => 3,
            TokenKind::Punctuation('(') => self
                .skip_balanced(at + 2)
                .map_or(1, |end| end - at),
            _ => 1,
        }
    }

    pub(in crate::frontend::parser) fn parse_allocation_prefix(&mut self) {
        self.bump();
        if self.consume_operator("::") || !self.consume_punctuation(':') {
            return;
        }
        match self.peek_kind() {
            TokenKind::Punctuation(':') => self.bump(),
            TokenKind::Punctuation('(') => self.node(SyntaxKind::ParenthesizedExpression, |p| {
                p.bump();
                p.parse_expression();
                p.expect_punctuation(')');
            }),
            _ => {
                self.parse_identifier(false);
            }
        }
    }

    /// `new`/`scope` followed by an interpolated string, a lambda, or a
    /// type to create.
    fn parse_allocation(&mut self) {
        let prefix = self.allocation_prefix_len(0);
        if self.nth_kind(prefix) == TokenKind::InterpolationStart {
            self.parse_interpolated_string();
            return;
        }
        if self.lambda_after_brackets(prefix) {
            self.parse_lambda();
            return;
        }
        let checkpoint = self.builder.checkpoint();
        self.parse_allocation_prefix();
        let type_at = self.builder.checkpoint();
        if self.check_punctuation('.') {
            self.bump_labeled(Field::Type);
        } else {
            self.labeled(Field::Type, Self::parse_type);
        }
        let kind = if self.builder.node_kind_at(type_at) == Some(SyntaxKind::ArrayType) {
            SyntaxKind::ArrayCreationExpression
        } else {
            if self.check_punctuation('(') {
                self.labeled(Field::Arguments, Self::parse_argument_list);
            }
            SyntaxKind::ObjectCreationExpression
        };
        if self.check_punctuation('{') {
            self.labeled(Field::Initializer, Self::parse_initializer_expression);
        }
        self.builder.start_node_at(checkpoint, kind);
        self.builder.finish_node();
    }
}
