use super::*;

parser_impl! {
    /// `using (declaration-or-expression) body`
    pub(super) fn parse_using_statement(&mut self) {
        self.node(SyntaxKind::UsingStatement, |p| {
            p.bump();
            p.expect_punctuation('(');
            if p.using_declaration_ahead() {
                p.parse_variable_declaration();
            } else {
                p.parse_expression();
            }
            p.expect_punctuation(')');
            p.labeled(Field::Body, Self::parse_embedded_statement);
        });
    }

    fn using_declaration_ahead(&mut self) -> bool {
        let Some(scan) = self.scan_type(0, TypeContext::Plain) else {
            return false;
        };
        self.nth_kind(scan.end) == TokenKind::Identifier
            && matches!(
                self.nth_kind(scan.end + 1),
                TokenKind::Operator("=") | TokenKind::Punctuation(')' | ',')
            )
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::super::tests::statement;

    #[test]
    fn using_with_declaration_or_expression() {
        expect![[r#"(using_statement (variable_declaration type: (implicit_type "var") (variable_declarator name: (identifier "file") (invocation_expression function: (identifier "Open") arguments: (argument_list)))) body: (block))"#]]
            .assert_eq(&statement("using (var file = Open()) { }"));
        expect![[r#"(using_statement (identifier "handle") body: (empty_statement))"#]]
            .assert_eq(&statement("using (handle);"));
    }
}
