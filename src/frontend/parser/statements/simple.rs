//! Jumps, returns, expression statements and the Beef-specific `defer` and
//! `delete`.

use super::*;

parser_impl! {
    /// `break;` and `continue;`
    pub(super) fn parse_jump(&mut self, kind: SyntaxKind) {
        self.node(kind, |p| {
            p.bump();
            p.expect_punctuation(';');
        });
    }

    pub(super) fn parse_return_statement(&mut self) {
        self.node(SyntaxKind::ReturnStatement, |p| {
            p.bump();
            if !p.check_punctuation(';') && p.can_start_expression_n(0) {
                p.parse_expression();
            }
            p.expect_punctuation(';');
        });
    }

    pub(super) fn parse_expression_statement(&mut self) {
        if !self.can_start_expression_n(0) {
            self.recover_statement("statement");
            return;
        }
        self.node(SyntaxKind::ExpressionStatement, |p| {
            p.parse_expression();
            p.expect_punctuation(';');
        });
    }

    /// `defer stmt`, `defer:: stmt`, `defer:scope stmt`
    pub(super) fn parse_defer_statement(&mut self) {
        self.node(SyntaxKind::DeferStatement, |p| {
            p.bump();
            if !p.consume_operator("::") && p.consume_punctuation(':') {
                p.labeled(Field::Target, |p| p.parse_identifier(true));
            }
            p.labeled(Field::Body, Self::parse_embedded_statement);
        });
    }

    /// `delete value;`, `delete:alloc value;`
    pub(super) fn parse_delete_statement(&mut self) {
        self.node(SyntaxKind::DeleteStatement, |p| {
            p.bump();
            if p.consume_punctuation(':') {
                p.labeled(Field::Target, |p| p.parse_identifier(true));
            }
            p.labeled(Field::Expression, Self::parse_expression);
            p.expect_punctuation(';');
        });
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::super::tests::statement;

    #[test]
    fn jumps_and_returns() {
        expect![[r#"(break_statement "break")"#]].assert_eq(&statement("break;"));
        expect![[r#"(return_statement (integer_literal "0"))"#]].assert_eq(&statement("return 0;"));
        expect![[r#"(return_statement "return")"#]].assert_eq(&statement("return;"));
    }

    #[test]
    fn defer_and_delete() {
        expect![[r#"(defer_statement body: (delete_statement expression: (identifier "list")))"#]]
            .assert_eq(&statement("defer delete list;"));
        expect![[r#"(defer_statement target: (identifier "outer") body: (expression_statement (invocation_expression function: (identifier "Close") arguments: (argument_list))))"#]]
            .assert_eq(&statement("defer:outer Close();"));
        expect![[r#"(delete_statement target: (identifier "alloc") expression: (identifier "ptr"))"#]]
            .assert_eq(&statement("delete:alloc ptr;"));
    }
}
