//! Local declarations and local functions, plus the variable declaration
//! pieces fields share with them.

use super::*;

parser_impl! {
    /// `[modifiers] Type a = 1, b;`
    pub(super) fn parse_local_declaration_statement(&mut self) {
        self.node(SyntaxKind::LocalDeclarationStatement, |p| {
            p.parse_modifiers();
            p.parse_variable_declaration();
            p.expect_punctuation(';');
        });
    }

    /// `[attrs] [modifiers] Type Name<T>(params) where ... body`
    pub(super) fn parse_local_function_statement(&mut self) {
        self.node(SyntaxKind::LocalFunctionStatement, |p| {
            p.parse_attribute_lists();
            p.parse_modifiers();
            p.labeled(Field::Type, Self::parse_type);
            p.labeled(Field::Name, |p| p.parse_identifier(true));
            if p.check_operator("<") {
                p.labeled(Field::TypeParameters, Self::parse_type_parameter_list);
            }
            p.labeled(Field::Parameters, Self::parse_parameter_list);
            p.parse_constraint_clauses();
            p.parse_function_body();
        });
    }

    /// `Type declarator, declarator, ...`
    pub(in crate::frontend::parser) fn parse_variable_declaration(&mut self) {
        self.node(SyntaxKind::VariableDeclaration, |p| {
            p.labeled(Field::Type, Self::parse_type);
            loop {
                p.parse_variable_declarator();
                if !p.consume_punctuation(',') {
                    break;
                }
            }
        });
    }

    /// `name [= value]`, `name[size]`, or `(a, b) = value` after `var`.
    fn parse_variable_declarator(&mut self) {
        self.node(SyntaxKind::VariableDeclarator, |p| {
            if p.check_punctuation('(') {
                p.parse_tuple_pattern();
            } else {
                p.labeled(Field::Name, |p| p.parse_identifier(true));
            }
            if p.check_punctuation('[') {
                p.parse_bracketed_arguments(SyntaxKind::BracketedArgumentList);
            }
            if p.consume_operator("=") {
                p.parse_expression();
            }
        });
    }

    /// `(a, _, (b, c))`
    pub(in crate::frontend::parser) fn parse_tuple_pattern(&mut self) {
        self.node(SyntaxKind::TuplePattern, |p| {
            p.bump();
            loop {
                match p.peek_kind() {
                    TokenKind::Punctuation('(') => p.parse_tuple_pattern(),
                    TokenKind::Identifier if p.peek_identifier("_") => {
                        p.node(SyntaxKind::Discard, Self::bump);
                    }
                    _ => {
                        p.labeled(Field::Name, |p| p.parse_identifier(true));
                    }
                }
                if !p.consume_punctuation(',') {
                    break;
                }
            }
            p.expect_punctuation(')');
        });
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::super::tests::statement;

    #[test]
    fn declarations_with_modifiers_and_several_declarators() {
        expect![[r#"(local_declaration_statement (modifier "const") (variable_declaration type: (predefined_type "int") (variable_declarator name: (identifier "a") (integer_literal "1")) (variable_declarator name: (identifier "b") (integer_literal "2"))))"#]]
            .assert_eq(&statement("const int a = 1, b = 2;"));
    }

    #[test]
    fn tuple_deconstruction_and_sized_buffers() {
        expect![[r#"(local_declaration_statement (variable_declaration type: (implicit_type "var") (variable_declarator (tuple_pattern name: (identifier "x") (discard "_")) (identifier "pair"))))"#]]
            .assert_eq(&statement("var (x, _) = pair;"));
        expect![[r#"(local_declaration_statement (variable_declaration type: (identifier "char8") (variable_declarator name: (identifier "buffer") (bracketed_argument_list (argument (integer_literal "64"))))))"#]]
            .assert_eq(&statement("char8 buffer[64];"));
    }

    #[test]
    fn generic_local_function() {
        expect![[r#"(local_function_statement (modifier "static") type: (identifier "T") name: (identifier "Id") type_parameters: (type_parameter_list (type_parameter name: (identifier "T"))) parameters: (parameter_list (parameter type: (identifier "T") name: (identifier "v"))) body: (block (return_statement (identifier "v"))))"#]]
            .assert_eq(&statement("static T Id<T>(T v) { return v; }"));
    }
}
