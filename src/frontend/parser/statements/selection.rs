use super::*;

parser_impl! {
    pub(super) fn parse_if_statement(&mut self) {
        self.node(SyntaxKind::IfStatement, |p| {
            p.bump();
            p.parse_parenthesized_condition();
            p.labeled(Field::Consequence, Self::parse_embedded_statement);
            if p.check_keyword(Keyword::Else) {
                p.bump();
                p.labeled(Field::Alternative, Self::parse_embedded_statement);
            }
        });
    }

    /// `switch (value) { sections }`. A tuple value keeps its own parens:
    /// `switch (a, b)`.
    pub(super) fn parse_switch_statement(&mut self) {
        self.node(SyntaxKind::SwitchStatement, |p| {
            p.bump();
            if p.classify_paren(0) == ParenShape::Tuple {
                p.labeled(Field::Value, Self::parse_expression);
            } else {
                p.expect_punctuation('(');
                p.labeled(Field::Value, Self::parse_expression);
                p.expect_punctuation(')');
            }
            p.labeled(Field::Body, Self::parse_switch_body);
        });
    }

    fn parse_switch_body(&mut self) {
        self.node(SyntaxKind::SwitchBody, |p| {
            if !p.expect_punctuation('{') {
                return;
            }
            let scope = p.enter_scope();
            while !p.check_punctuation('}') && !p.at_end() {
                if p.at_branch_continuation() {
                    p.parse_stray_directive();
                } else if p.at_switch_label() {
                    p.parse_switch_section();
                } else if p.peek_kind() == TokenKind::DirectiveIf {
                    p.parse_preproc_if(ContentKind::TopLevel);
                } else {
                    p.recover_statement("`case` or `default`");
                }
            }
            p.close_scope(scope);
            p.expect_punctuation('}');
        });
    }

    fn at_switch_label(&mut self) -> bool {
        self.check_keyword(Keyword::Case)
            || (self.check_keyword(Keyword::Default) && self.peek_punctuation_n(1, ':'))
            || (self.peek_identifier("when") && self.can_start_expression_n(1))
    }

    /// One label, then the statements up to the next label.
    fn parse_switch_section(&mut self) {
        self.node(SyntaxKind::SwitchSection, |p| {
            match p.peek_kind() {
                TokenKind::Keyword(Keyword::Case) => {
                    p.bump();
                    loop {
                        p.labeled(Field::Pattern, |p| p.parse_pattern(PatternContext::CaseLabel));
                        if !p.consume_punctuation(',') {
                            break;
                        }
                    }
                    if p.peek_identifier("when") {
                        p.parse_when_clause();
                    }
                }
                TokenKind::Keyword(Keyword::Default) => p.bump(),
                _ => p.parse_when_clause(),
            }
            p.expect_punctuation(':');
            p.parse_statement_list(Self::at_switch_label);
        });
    }
}
