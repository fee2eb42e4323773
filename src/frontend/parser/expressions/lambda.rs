use super::*;

parser_impl! {
    /// `[new] [captures] [attrs] [static] params => body`.
    pub(in crate::frontend::parser) fn parse_lambda(&mut self) {
        self.node(SyntaxKind::LambdaExpression, |p| {
            if matches!(
                p.peek_kind(),
                TokenKind::Keyword(Keyword::New | Keyword::Scope)
            ) {
                p.parse_allocation_prefix();
            }
            if p.check_punctuation('[') && matches!(p.nth_kind(1), TokenKind::Operator("=" | "&")) {
                p.parse_capture_list();
            }
            p.parse_attribute_lists();
            while p.check_keyword(Keyword::Static) {
                p.node(SyntaxKind::Modifier, Self::bump);
            }
            p.labeled(Field::Parameters, |p| {
                if p.check_punctuation('(') {
                    p.parse_lambda_parameter_list();
                } else if p.peek_kind() == TokenKind::Identifier {
                    p.node(SyntaxKind::ImplicitParameter, Self::bump);
                } else {
                    p.missing(TokenKind::Identifier);
                }
            });
            p.expect_operator("=>");
            p.labeled(Field::Body, Self::parse_lambda_body);
        });
    }

    /// `[=, &x, =y]`
    fn parse_capture_list(&mut self) {
        self.bump();
        loop {
            if !self.consume_operator("=") && !self.consume_operator("&") {
                self.missing(TokenKind::Operator("="));
            }
            if self.peek_kind() == TokenKind::Identifier {
                self.parse_identifier(false);
            }
            if !self.consume_punctuation(',') {
                break;
            }
        }
        self.expect_punctuation(']');
    }

    fn parse_lambda_body(&mut self) {
        if self.check_punctuation('{') {
            self.parse_block();
        } else {
            self.parse_expression();
        }
    }

    /// `[static] delegate [(params)] { ... }`
    pub(in crate::frontend::parser) fn parse_anonymous_method(&mut self) {
        self.node(SyntaxKind::AnonymousMethodExpression, |p| {
            while p.check_keyword(Keyword::Static) {
                p.node(SyntaxKind::Modifier, Self::bump);
            }
            p.expect_keyword(Keyword::Delegate);
            if p.check_punctuation('(') {
                p.labeled(Field::Parameters, Self::parse_parameter_list);
            }
            if p.check_punctuation('{') {
                p.parse_block();
            } else {
                p.error_expected("'{'");
                p.missing_silent(TokenKind::Punctuation('{'));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use crate::parse_expression;

    fn sexp(source: &str) -> String {
        let result = parse_expression(source);
        assert!(
            result.diagnostics.is_empty(),
            "{source}: {:?}",
            result.diagnostics
        );
        result
            .tree
            .child_nodes()
            .next()
            .map(|node| node.to_sexp())
            .unwrap_or_default()
    }

    #[test]
    fn implicit_and_parenthesized_parameters() {
        expect![[r#"(lambda_expression parameters: (implicit_parameter "x") body: (binary_expression left: (identifier "x") operator: "+" right: (integer_literal "1")))"#]]
            .assert_eq(&sexp("x => x + 1"));
        expect![[r#"(lambda_expression parameters: (parameter_list (parameter name: (identifier "a")) (parameter name: (identifier "b"))) body: (identifier "a"))"#]]
            .assert_eq(&sexp("(a, b) => a"));
    }

    #[test]
    fn captures_and_allocation_prefix() {
        expect![[r#"(lambda_expression parameters: (parameter_list) body: (block))"#]]
            .assert_eq(&sexp("new [&] () => { }"));
        expect![[r#"(lambda_expression (identifier "total") parameters: (implicit_parameter "v") body: (assignment_expression left: (identifier "total") operator: "+=" right: (identifier "v")))"#]]
            .assert_eq(&sexp("[&total] v => total += v"));
    }

    #[test]
    fn anonymous_method() {
        expect![[r#"(anonymous_method_expression parameters: (parameter_list (parameter type: (predefined_type "int") name: (identifier "x"))) (block))"#]]
            .assert_eq(&sexp("delegate (int x) { }"));
    }
}
