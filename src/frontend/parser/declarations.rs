//! Type declarations, namespaces and `using` directives.

use super::*;

parser_impl! {
    /// `class`, `struct`, `interface`, `enum` or `delegate`, with leading
    /// attributes and modifiers.
    pub(super) fn parse_type_declaration(&mut self) {
        let Some(keyword) = self.type_keyword_ahead() else {
            self.recover_member("type declaration");
            return;
        };
        let kind = match keyword {
            Keyword::Class => SyntaxKind::ClassDeclaration,
            Keyword::Struct => SyntaxKind::StructDeclaration,
            Keyword::Interface => SyntaxKind::InterfaceDeclaration,
            Keyword::Enum => SyntaxKind::EnumDeclaration,
            _ => SyntaxKind::DelegateDeclaration,
        };
        self.node(kind, |p| {
            p.parse_attribute_lists();
            p.parse_modifiers();
            p.bump();
            match keyword {
                Keyword::Class | Keyword::Struct => p.parse_class_like_tail(),
                Keyword::Interface => p.parse_interface_tail(),
                Keyword::Enum => p.parse_enum_tail(),
                _ => p.parse_delegate_tail(),
            }
        });
    }

    /// The declaration keyword after attributes and modifiers.
    fn type_keyword_ahead(&mut self) -> Option<Keyword> {
        let mut index = self.skip_attribute_prefix(0)?;
        while let TokenKind::Keyword(keyword) = self.nth_kind(index)
            && keyword.is_modifier()
        {
            index += 1;
        }
        match self.nth_kind(index) {
            TokenKind::Keyword(
                keyword @ (Keyword::Class
                | Keyword::Struct
                | Keyword::Interface
                | Keyword::Enum
                | Keyword::Delegate),
            ) => Some(keyword),
            _ => None,
        }
    }

    /// `Name` then any mix of type parameters, primary-constructor
    /// parameters and base lists, constraints and the body.
    fn parse_class_like_tail(&mut self) {
        self.labeled(Field::Name, |p| p.parse_identifier(false));
        loop {
            if self.check_operator("<") {
                self.labeled(Field::TypeParameters, Self::parse_type_parameter_list);
            } else if self.check_punctuation('(') {
                self.labeled(Field::Parameters, Self::parse_parameter_list);
            } else if self.check_punctuation(':') {
                self.parse_base_list();
            } else {
                break;
            }
        }
        self.parse_constraint_clauses();
        self.parse_type_body();
    }

    fn parse_interface_tail(&mut self) {
        self.labeled(Field::Name, |p| p.parse_identifier(false));
        if self.check_operator("<") {
            self.labeled(Field::TypeParameters, Self::parse_type_parameter_list);
        }
        if self.check_punctuation(':') {
            self.parse_base_list();
        }
        self.parse_constraint_clauses();
        self.parse_type_body();
    }

    /// `{ members } [;]` or a bare `;`.
    fn parse_type_body(&mut self) {
        if self.check_punctuation('{') {
            self.labeled(Field::Body, Self::parse_declaration_list);
            self.consume_punctuation(';');
        } else if !self.consume_punctuation(';') {
            self.error_expected("'{' or ';'");
            self.missing_silent(TokenKind::Punctuation('{'));
        }
    }

    fn parse_delegate_tail(&mut self) {
        self.labeled(Field::Type, Self::parse_type);
        self.labeled(Field::Name, |p| p.parse_identifier(false));
        if self.check_operator("<") {
            self.labeled(Field::TypeParameters, Self::parse_type_parameter_list);
        }
        self.labeled(Field::Parameters, Self::parse_parameter_list);
        self.parse_constraint_clauses();
        self.expect_punctuation(';');
    }

    /// `: Base, IFace, Base(args)`
    fn parse_base_list(&mut self) {
        self.node(SyntaxKind::BaseList, |p| {
            p.bump();
            loop {
                let with_arguments = p
                    .scan_type(0, TypeContext::Plain)
                    .is_some_and(|scan| p.peek_punctuation_n(scan.end, '('));
                if with_arguments {
                    p.node(SyntaxKind::PrimaryConstructorBaseType, |p| {
                        p.labeled(Field::Type, Self::parse_type);
                        p.labeled(Field::Arguments, Self::parse_argument_list);
                    });
                } else {
                    p.parse_type();
                }
                if !p.consume_punctuation(',') {
                    break;
                }
            }
        });
    }

    /// `{ member* }`
    pub(super) fn parse_declaration_list(&mut self) {
        self.node(SyntaxKind::DeclarationList, |p| {
            p.bump();
            let scope = p.enter_scope();
            while !p.check_punctuation('}') && !p.at_end() {
                if p.at_branch_continuation() {
                    p.parse_stray_directive();
                    continue;
                }
                let before = p.stream.consumed();
                p.parse_member();
                if p.stream.consumed() == before {
                    p.recover_member("member declaration");
                }
            }
            p.close_scope(scope);
            p.expect_punctuation('}');
        });
    }

    fn parse_enum_tail(&mut self) {
        self.labeled(Field::Name, |p| p.parse_identifier(false));
        if self.check_punctuation(':') {
            self.parse_base_list();
        }
        if self.check_punctuation('{') {
            self.labeled(Field::Body, Self::parse_enum_member_list);
            self.consume_punctuation(';');
        } else if !self.consume_punctuation(';') {
            self.error_expected("'{' or ';'");
            self.missing_silent(TokenKind::Punctuation('{'));
        }
    }

    /// `{ A, B = 2, #if X C, #endif }`; a conditional region may stand in
    /// for a member and carries its own comma.
    fn parse_enum_member_list(&mut self) {
        self.node(SyntaxKind::EnumMemberDeclarationList, |p| {
            p.bump();
            let scope = p.enter_scope();
            while !p.check_punctuation('}') && !p.at_end() {
                if p.at_branch_continuation() {
                    p.parse_stray_directive();
                    continue;
                }
                if p.peek_kind() == TokenKind::DirectiveIf {
                    p.parse_preproc_if(ContentKind::EnumMember);
                    continue;
                }
                if !p.enum_member_ahead() {
                    p.recover_member("enum member");
                    continue;
                }
                p.parse_enum_member();
                if p.consume_punctuation(',')
                    || p.check_punctuation('}')
                    || p.peek_kind().is_branch_directive()
                {
                    continue;
                }
                p.expect_punctuation(',');
            }
            p.close_scope(scope);
            p.expect_punctuation('}');
        });
    }

    pub(super) fn enum_member_ahead(&mut self) -> bool {
        match self.peek_kind() {
            TokenKind::Identifier | TokenKind::Punctuation('[') => true,
            TokenKind::Keyword(keyword) => keyword.is_reserved_identifier(),
            _ => false,
        }
    }

    /// `[attrs] Name [= value]`
    pub(super) fn parse_enum_member(&mut self) {
        self.node(SyntaxKind::EnumMemberDeclaration, |p| {
            p.parse_attribute_lists();
            p.labeled(Field::Name, |p| p.parse_identifier(true));
            if p.consume_operator("=") {
                p.labeled(Field::Value, Self::parse_expression);
            }
        });
    }

    /// Block namespace `namespace A.B { ... }` or file-scoped `namespace A.B;`.
    pub(super) fn parse_namespace_declaration(&mut self) {
        let file_scoped = self
            .scan_name(1)
            .is_some_and(|(end, _)| self.peek_punctuation_n(end, ';'));
        if file_scoped {
            self.node(SyntaxKind::FileScopedNamespaceDeclaration, |p| {
                p.bump();
                p.labeled(Field::Name, Self::parse_name);
                p.bump();
            });
            return;
        }
        self.node(SyntaxKind::NamespaceDeclaration, |p| {
            p.bump();
            if p.peek_kind() == TokenKind::Identifier {
                p.labeled(Field::Name, Self::parse_name);
            } else {
                p.error_expected("namespace name");
                p.missing_silent(TokenKind::Identifier);
            }
            if p.check_punctuation('{') {
                p.labeled(Field::Body, Self::parse_declaration_list);
                p.consume_punctuation(';');
            } else {
                p.error_expected("'{'");
                p.missing_silent(TokenKind::Punctuation('{'));
            }
        });
    }

    /// `using [static] A.B;`
    pub(super) fn parse_using_directive(&mut self) {
        self.node(SyntaxKind::UsingDirective, |p| {
            p.parse_modifiers();
            p.expect_keyword(Keyword::Using);
            p.match_keyword(Keyword::Static);
            if p.peek_kind() == TokenKind::Identifier {
                p.labeled(Field::Name, Self::parse_name);
            } else {
                p.error_expected("namespace or type name");
                p.missing_silent(TokenKind::Identifier);
            }
            p.expect_punctuation(';');
        });
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use crate::parse;

    fn declaration(source: &str) -> String {
        let result = parse(source);
        assert!(result.diagnostics.is_empty(), "{source}: {:?}", result.diagnostics);
        result
            .tree
            .child_nodes()
            .next()
            .map(|node| node.to_sexp())
            .unwrap_or_default()
    }

    #[test]
    fn class_with_generics_base_list_and_constraints() {
        expect![[r#"(class_declaration (modifier "public") name: (identifier "List") type_parameters: (type_parameter_list (type_parameter name: (identifier "T"))) (base_list (generic_name (identifier "IEnumerable") (type_argument_list (identifier "T")))) (type_parameter_constraints_clause (identifier "T") (type_parameter_constraint "struct")) body: (declaration_list))"#]]
            .assert_eq(&declaration("public class List<T> : IEnumerable<T> where T : struct { }"));
    }

    #[test]
    fn struct_with_primary_parameters_and_base_arguments() {
        expect![[r#"(struct_declaration name: (identifier "Point") parameters: (parameter_list (parameter type: (predefined_type "int") name: (identifier "x"))) (base_list (primary_constructor_base_type type: (identifier "Base") arguments: (argument_list (argument (identifier "x"))))))"#]]
            .assert_eq(&declaration("struct Point(int x) : Base(x);"));
    }

    #[test]
    fn enum_members_with_values_and_conditionals() {
        let source = "enum Color : uint8 { Red, Green = 2,\n#if EXTRA\nBlue,\n#endif\n}";
        let result = parse(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        expect![[r#"(enum_declaration name: (identifier "Color") (base_list (predefined_type "uint8")) body: (enum_member_declaration_list (enum_member_declaration name: (identifier "Red")) (enum_member_declaration name: (identifier "Green") value: (integer_literal "2")) (preproc_if condition: (identifier "EXTRA") (enum_member_declaration name: (identifier "Blue")))))"#]]
            .assert_eq(&declaration(source));
    }

    #[test]
    fn delegates_and_interfaces() {
        expect![[r#"(delegate_declaration type: (predefined_type "void") name: (identifier "Handler") parameters: (parameter_list (parameter type: (identifier "Event") name: (identifier "e"))))"#]]
            .assert_eq(&declaration("delegate void Handler(Event e);"));
        expect![[r#"(interface_declaration name: (identifier "IShape") body: (declaration_list (method_declaration returns: (predefined_type "float") name: (identifier "Area") parameters: (parameter_list))))"#]]
            .assert_eq(&declaration("interface IShape { float Area(); }"));
    }

    #[test]
    fn namespaces_and_using_directives() {
        expect![[r#"(using_directive name: (qualified_name qualifier: (identifier "System") name: (identifier "IO")))"#]]
            .assert_eq(&declaration("using System.IO;"));
        expect![[r#"(namespace_declaration name: (identifier "Game") body: (declaration_list (class_declaration name: (identifier "Player") body: (declaration_list))))"#]]
            .assert_eq(&declaration("namespace Game { class Player { } }"));
        expect![[r#"(file_scoped_namespace_declaration name: (identifier "Game"))"#]]
            .assert_eq(&declaration("namespace Game;"));
    }
}
