//! Members of class, struct and interface bodies.
//!
//! The member kind is decided up front by [`Parser::member_shape_ahead`],
//! which looks past attributes, modifiers and the leading type; the
//! chosen routine then parses attributes and modifiers itself.

use super::*;

/// What a member declaration turns out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MemberShape {
    TypeDeclaration,
    Namespace,
    UsingDirective,
    UsingField,
    Field,
    Method,
    Mixin,
    Constructor,
    Destructor,
    Property,
    Indexer,
    Operator,
    ConversionOperator,
}

parser_impl! {
    /// One entry of a declaration list.
    pub(super) fn parse_member(&mut self) {
        if self.peek_kind() == TokenKind::DirectiveIf && !self.attribute_conditional_prefixes_member() {
            self.parse_preproc_if(ContentKind::Declaration);
            return;
        }
        let Some(shape) = self.member_shape_ahead() else {
            self.recover_member("member declaration");
            return;
        };
        if !self.enter_nesting() {
            self.skip_into_error(starts_member);
            return;
        }
        self.parse_member_of_shape(shape);
        self.leave_nesting();
    }

    pub(super) fn parse_member_of_shape(&mut self, shape: MemberShape) {
        match shape {
            MemberShape::TypeDeclaration => self.parse_type_declaration(),
            MemberShape::Namespace => self.parse_namespace_declaration(),
            MemberShape::UsingDirective => self.parse_using_directive(),
            MemberShape::UsingField => self.parse_field(SyntaxKind::UsingFieldDeclaration),
            MemberShape::Field => self.parse_field(SyntaxKind::FieldDeclaration),
            MemberShape::Method => self.parse_method(),
            MemberShape::Mixin => self.parse_mixin(),
            MemberShape::Constructor => self.parse_constructor(),
            MemberShape::Destructor => self.parse_destructor(),
            MemberShape::Property => self.parse_property(),
            MemberShape::Indexer => self.parse_indexer(),
            MemberShape::Operator => self.parse_operator_declaration(),
            MemberShape::ConversionOperator => self.parse_conversion_operator(),
        }
    }

    fn attribute_conditional_prefixes_member(&mut self) -> bool {
        self.attribute_conditional_end(0).is_some() && self.member_shape_ahead().is_some()
    }

    /// Classifies the member starting at the current token.
    pub(super) fn member_shape_ahead(&mut self) -> Option<MemberShape> {
        let mut index = self.skip_attribute_prefix(0)?;
        while let TokenKind::Keyword(keyword) = self.nth_kind(index)
            && keyword.is_modifier()
            && self.modifier_continues_at(index + 1)
        {
            index += 1;
        }
        match self.nth_kind(index) {
            TokenKind::Keyword(
                Keyword::Class
                | Keyword::Struct
                | Keyword::Interface
                | Keyword::Enum
                | Keyword::Delegate,
            ) => return Some(MemberShape::TypeDeclaration),
            TokenKind::Keyword(Keyword::Namespace) => return Some(MemberShape::Namespace),
            TokenKind::Keyword(Keyword::Using) => {
                let field = self
                    .scan_type(index + 1, TypeContext::Plain)
                    .is_some_and(|scan| self.nth_kind(scan.end) == TokenKind::Identifier);
                return Some(if field {
                    MemberShape::UsingField
                } else {
                    MemberShape::UsingDirective
                });
            }
            TokenKind::Keyword(Keyword::Mixin) => return Some(MemberShape::Mixin),
            TokenKind::Operator("~") => return Some(MemberShape::Destructor),
            TokenKind::Keyword(Keyword::Implicit | Keyword::Explicit) => {
                return Some(MemberShape::ConversionOperator);
            }
            TokenKind::Keyword(Keyword::This) if self.peek_punctuation_n(index + 1, '(') => {
                return Some(MemberShape::Constructor);
            }
            TokenKind::Identifier if self.peek_punctuation_n(index + 1, '(') => {
                return Some(MemberShape::Constructor);
            }
            _ => {}
        }
        let scan = self.scan_type(index, TypeContext::Plain)?;
        let mut at = scan.end;
        if matches!(
            self.nth_kind(at),
            TokenKind::Keyword(Keyword::Implicit | Keyword::Explicit)
        ) {
            at += 1;
        }
        if self.explicit_interface_ahead(at) {
            at = self.skip_explicit_interface(at)?;
        }
        match self.nth_kind(at) {
            TokenKind::Keyword(Keyword::Operator) => Some(MemberShape::Operator),
            TokenKind::Keyword(Keyword::This) if self.peek_punctuation_n(at + 1, '[') => {
                Some(MemberShape::Indexer)
            }
            TokenKind::Identifier => {
                let (after, _) = self.scan_simple_name(at)?;
                match self.nth_kind(after) {
                    TokenKind::Punctuation('(') => Some(MemberShape::Method),
                    TokenKind::Punctuation('{') | TokenKind::Operator("=>") => {
                        Some(MemberShape::Property)
                    }
                    _ => Some(MemberShape::Field),
                }
            }
            TokenKind::Keyword(keyword) if keyword.is_reserved_identifier() => {
                Some(MemberShape::Field)
            }
            _ => None,
        }
    }

    /// Index of the member name after `Interface.` prefixes starting at `at`.
    fn skip_explicit_interface(&mut self, at: usize) -> Option<usize> {
        let mut index = at;
        loop {
            let (end, _) = self.scan_simple_name(index)?;
            if !self.peek_punctuation_n(end, '.') {
                return Some(index);
            }
            match self.nth_kind(end + 1) {
                TokenKind::Identifier => index = end + 1,
                TokenKind::Keyword(Keyword::This | Keyword::Operator) => return Some(end + 1),
                _ => return None,
            }
        }
    }

    /// Whether a modifier at `index - 1` is followed by something that
    /// continues a declaration.
    pub(super) fn modifier_continues_at(&mut self, index: usize) -> bool {
        match self.nth_kind(index) {
            TokenKind::Identifier | TokenKind::Punctuation('(' | '[') => true,
            TokenKind::Operator("~") => true,
            TokenKind::Keyword(keyword) => {
                keyword.is_modifier()
                    || keyword.is_predefined_type()
                    || keyword.starts_declaration()
                    || matches!(
                        keyword,
                        Keyword::Ref
                            | Keyword::Function
                            | Keyword::This
                            | Keyword::Using
                            | Keyword::Operator
                            | Keyword::Decltype
                            | Keyword::Comptype
                    )
            }
            _ => false,
        }
    }

    /// Zero or more `modifier` nodes.
    pub(super) fn parse_modifiers(&mut self) {
        while let TokenKind::Keyword(keyword) = self.peek_kind()
            && keyword.is_modifier()
            && self.modifier_continues_at(1)
        {
            self.node(SyntaxKind::Modifier, Self::bump);
        }
    }

    /// `{ ... }`, `=> expr;` or `;`.
    pub(super) fn parse_function_body(&mut self) {
        match self.peek_kind() {
            TokenKind::Punctuation('{') => self.labeled(Field::Body, Self::parse_block),
            TokenKind::Operator("=>") => {
                self.labeled(Field::Body, Self::parse_arrow_expression_clause);
                self.expect_punctuation(';');
            }
            TokenKind::Punctuation(';') => self.bump(),
            _ => {
                self.error_expected("'{', '=>' or ';'");
                self.missing_silent(TokenKind::Punctuation(';'));
            }
        }
    }

    fn parse_arrow_expression_clause(&mut self) {
        self.node(SyntaxKind::ArrowExpressionClause, |p| {
            p.bump();
            p.parse_expression();
        });
    }

    fn parse_field(&mut self, kind: SyntaxKind) {
        self.node(kind, |p| {
            p.parse_attribute_lists();
            p.parse_modifiers();
            p.match_keyword(Keyword::Using);
            p.parse_variable_declaration();
            p.expect_punctuation(';');
        });
    }

    fn parse_method(&mut self) {
        self.node(SyntaxKind::MethodDeclaration, |p| {
            p.parse_attribute_lists();
            p.parse_modifiers();
            p.labeled(Field::Returns, Self::parse_type);
            p.parse_optional_interface_specifier();
            p.labeled(Field::Name, |p| p.parse_identifier(true));
            p.parse_signature_tail();
        });
    }

    /// `[<T>] (params) [where ...] body`
    fn parse_signature_tail(&mut self) {
        if self.check_operator("<") {
            self.labeled(Field::TypeParameters, Self::parse_type_parameter_list);
        }
        self.labeled(Field::Parameters, Self::parse_parameter_list);
        self.parse_constraint_clauses();
        self.parse_function_body();
    }

    fn parse_optional_interface_specifier(&mut self) {
        if self.explicit_interface_ahead(0) {
            self.parse_explicit_interface_specifier();
        }
    }

    fn parse_mixin(&mut self) {
        self.node(SyntaxKind::MixinDeclaration, |p| {
            p.parse_attribute_lists();
            p.parse_modifiers();
            p.bump();
            p.parse_optional_interface_specifier();
            p.labeled(Field::Name, |p| p.parse_identifier(true));
            p.parse_signature_tail();
        });
    }

    /// `Name(params) [: base(args)] body`; Beef also spells the name `this`.
    fn parse_constructor(&mut self) {
        self.node(SyntaxKind::ConstructorDeclaration, |p| {
            p.parse_attribute_lists();
            p.parse_modifiers();
            p.labeled(Field::Name, |p| p.parse_identifier(true));
            p.labeled(Field::Parameters, Self::parse_parameter_list);
            if p.check_punctuation(':') {
                p.node(SyntaxKind::ConstructorInitializer, |p| {
                    p.bump();
                    if matches!(p.peek_kind(), TokenKind::Keyword(Keyword::Base | Keyword::This)) {
                        p.bump();
                    } else {
                        p.missing(TokenKind::Keyword(Keyword::Base));
                    }
                    p.labeled(Field::Arguments, Self::parse_argument_list);
                });
            }
            p.parse_function_body();
        });
    }

    /// `~this() { }`
    fn parse_destructor(&mut self) {
        self.node(SyntaxKind::DestructorDeclaration, |p| {
            p.parse_attribute_lists();
            p.parse_modifiers();
            p.bump();
            p.labeled(Field::Name, |p| p.parse_identifier(true));
            p.labeled(Field::Parameters, Self::parse_parameter_list);
            p.parse_function_body();
        });
    }

    /// `Type Name { get; set; } [= value;]` or `Type Name => value;`
    fn parse_property(&mut self) {
        self.node(SyntaxKind::PropertyDeclaration, |p| {
            p.parse_attribute_lists();
            p.parse_modifiers();
            p.labeled(Field::Type, Self::parse_type);
            p.parse_optional_interface_specifier();
            p.labeled(Field::Name, |p| p.parse_identifier(true));
            p.parse_accessors_or_arrow(true);
        });
    }

    /// `Type this[params] { ... }` or `=> value;`
    fn parse_indexer(&mut self) {
        self.node(SyntaxKind::IndexerDeclaration, |p| {
            p.parse_attribute_lists();
            p.parse_modifiers();
            p.labeled(Field::Type, Self::parse_type);
            p.parse_optional_interface_specifier();
            p.bump();
            p.labeled(Field::Parameters, Self::parse_bracketed_parameter_list);
            p.parse_accessors_or_arrow(false);
        });
    }

    fn parse_accessors_or_arrow(&mut self, initializer: bool) {
        if self.check_operator("=>") {
            self.labeled(Field::Value, Self::parse_arrow_expression_clause);
            self.expect_punctuation(';');
            return;
        }
        self.labeled(Field::Accessors, Self::parse_accessor_list);
        if initializer && self.check_operator("=") {
            self.bump();
            self.labeled(Field::Value, Self::parse_expression);
            self.expect_punctuation(';');
        }
    }

    fn parse_accessor_list(&mut self) {
        self.node(SyntaxKind::AccessorList, |p| {
            if !p.expect_punctuation('{') {
                return;
            }
            let scope = p.enter_scope();
            while !p.check_punctuation('}') && !p.at_end() {
                if p.at_branch_continuation() {
                    p.parse_stray_directive();
                    continue;
                }
                if p.accessor_ahead() {
                    p.parse_accessor();
                } else {
                    p.recover_member("accessor");
                }
            }
            p.close_scope(scope);
            p.expect_punctuation('}');
        });
    }

    fn accessor_ahead(&mut self) -> bool {
        let Some(mut index) = self.skip_attribute_prefix(0) else {
            return false;
        };
        while let TokenKind::Keyword(keyword) = self.nth_kind(index)
            && keyword.is_modifier()
        {
            index += 1;
        }
        self.nth_kind(index) == TokenKind::Identifier
    }

    /// `[attrs] [modifiers] get|set|name body`
    fn parse_accessor(&mut self) {
        self.node(SyntaxKind::AccessorDeclaration, |p| {
            p.parse_attribute_lists();
            while let TokenKind::Keyword(keyword) = p.peek_kind()
                && keyword.is_modifier()
            {
                p.node(SyntaxKind::Modifier, Self::bump);
            }
            p.labeled(Field::Name, |p| p.parse_identifier(false));
            p.parse_function_body();
        });
    }

    /// `Type [implicit|explicit] [I.] operator + (params) body`
    fn parse_operator_declaration(&mut self) {
        self.node(SyntaxKind::OperatorDeclaration, |p| {
            p.parse_attribute_lists();
            p.parse_modifiers();
            p.labeled(Field::Type, Self::parse_type);
            if matches!(
                p.peek_kind(),
                TokenKind::Keyword(Keyword::Implicit | Keyword::Explicit)
            ) {
                p.bump();
            }
            p.parse_optional_interface_specifier();
            p.expect_keyword(Keyword::Operator);
            p.labeled(Field::Operator, Self::parse_overloadable_operator);
            p.labeled(Field::Parameters, Self::parse_parameter_list);
            p.parse_function_body();
        });
    }

    /// `implicit|explicit [I.] operator [checked] Type(params) body`
    fn parse_conversion_operator(&mut self) {
        self.node(SyntaxKind::ConversionOperatorDeclaration, |p| {
            p.parse_attribute_lists();
            p.parse_modifiers();
            p.bump();
            p.parse_optional_interface_specifier();
            p.expect_keyword(Keyword::Operator);
            p.match_keyword(Keyword::Checked);
            p.labeled(Field::Type, Self::parse_type);
            p.labeled(Field::Parameters, Self::parse_parameter_list);
            p.parse_function_body();
        });
    }

    /// One of the overloadable operator spellings; `>>` is joined from the
    /// single `>` tokens the scanner produces.
    pub(super) fn parse_overloadable_operator(&mut self) -> bool {
        if self.check_operator(">") && self.adjacent_n(0) && self.peek_operator_n(1, ">") {
            self.node(SyntaxKind::OverloadableOperator, |p| {
                p.bump_joined(">>", 2, Field::Operator);
            });
            return true;
        }
        match self.peek_kind() {
            TokenKind::Operator(op) if is_overloadable(op) => {
                self.node(SyntaxKind::OverloadableOperator, Self::bump);
                true
            }
            _ => {
                self.error_expected("overloadable operator");
                self.missing_silent(TokenKind::Operator("+"));
                false
            }
        }
    }
}

fn is_overloadable(op: &str) -> bool {
    matches!(
        op,
        "!" | "~"
            | "++"
            | "--"
            | "+"
            | "-"
            | "*"
            | "/"
            | "%"
            | "^"
            | "|"
            | "&"
            | "<<"
            | "=="
            | "!="
            | ">"
            | "<"
            | ">="
            | "<="
    )
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use crate::{SyntaxKind, parse};

    /// S-expression of the first member of `class C { ... }`.
    fn member(body: &str) -> String {
        let source = format!("class C {{ {body} }}");
        let result = parse(&source);
        assert!(result.diagnostics.is_empty(), "{body}: {:?}", result.diagnostics);
        result
            .tree
            .find_descendant(SyntaxKind::DeclarationList)
            .and_then(|list| list.child_nodes().next())
            .map(|node| node.to_sexp())
            .unwrap_or_default()
    }

    #[test]
    fn fields_and_using_fields() {
        expect![[r#"(field_declaration (modifier "public") (modifier "static") (variable_declaration type: (predefined_type "int") (variable_declarator name: (identifier "count") (integer_literal "0"))))"#]]
            .assert_eq(&member("public static int count = 0;"));
        expect![[r#"(using_field_declaration (modifier "public") (variable_declaration type: (identifier "Vector2") (variable_declarator name: (identifier "pos"))))"#]]
            .assert_eq(&member("public using Vector2 pos;"));
    }

    #[test]
    fn methods_with_explicit_interface_and_generics() {
        expect![[r#"(method_declaration returns: (predefined_type "void") (explicit_interface_specifier (identifier "IDisposable")) name: (identifier "Dispose") parameters: (parameter_list) body: (block))"#]]
            .assert_eq(&member("void IDisposable.Dispose() { }"));
        expect![[r#"(method_declaration (modifier "public") returns: (identifier "T") name: (identifier "Get") type_parameters: (type_parameter_list (type_parameter name: (identifier "T"))) parameters: (parameter_list) (type_parameter_constraints_clause (identifier "T") (type_parameter_constraint "new")))"#]]
            .assert_eq(&member("public T Get<T>() where T : new;"));
    }

    #[test]
    fn constructors_destructors_and_mixins() {
        expect![[r#"(constructor_declaration name: (identifier "this") parameters: (parameter_list (parameter type: (predefined_type "int") name: (identifier "x"))) (constructor_initializer arguments: (argument_list (argument (identifier "x")))) body: (block))"#]]
            .assert_eq(&member("this(int x) : base(x) { }"));
        expect![[r#"(destructor_declaration name: (identifier "this") parameters: (parameter_list) body: (block))"#]]
            .assert_eq(&member("~this() { }"));
        expect![[r#"(mixin_declaration name: (identifier "Log") parameters: (parameter_list (parameter type: (identifier "String") name: (identifier "msg"))) body: (block))"#]]
            .assert_eq(&member("mixin Log(String msg) { }"));
    }

    #[test]
    fn properties_and_indexers() {
        expect![[r#"(property_declaration type: (predefined_type "int") name: (identifier "Count") accessors: (accessor_list (accessor_declaration name: (identifier "get") body: (arrow_expression_clause (identifier "mCount"))) (accessor_declaration (modifier "private") name: (identifier "set"))) value: (integer_literal "0"))"#]]
            .assert_eq(&member("int Count { get => mCount; private set; } = 0;"));
        expect![[r#"(indexer_declaration type: (identifier "T") parameters: (bracketed_parameter_list (parameter type: (predefined_type "int") name: (identifier "i"))) value: (arrow_expression_clause (element_access_expression expression: (identifier "mItems") subscript: (bracketed_argument_list (argument (identifier "i"))))))"#]]
            .assert_eq(&member("T this[int i] => mItems[i];"));
    }

    #[test]
    fn operators_and_conversions() {
        expect![[r#"(operator_declaration (modifier "public") (modifier "static") type: (identifier "Vec") operator: (overloadable_operator "+") parameters: (parameter_list (parameter type: (identifier "Vec") name: (identifier "a")) (parameter type: (identifier "Vec") name: (identifier "b"))) body: (block))"#]]
            .assert_eq(&member("public static Vec operator+(Vec a, Vec b) { }"));
        expect![[r#"(operator_declaration type: (predefined_type "bool") operator: (overloadable_operator ">=") parameters: (parameter_list (parameter type: (identifier "Vec") name: (identifier "a")) (parameter type: (identifier "Vec") name: (identifier "b"))))"#]]
            .assert_eq(&member("bool operator>=(Vec a, Vec b);"));
        expect![[r#"(conversion_operator_declaration (modifier "static") type: (predefined_type "float") parameters: (parameter_list (parameter type: (identifier "Vec") name: (identifier "v"))) body: (arrow_expression_clause (member_access_expression expression: (identifier "v") name: (identifier "x"))))"#]]
            .assert_eq(&member("static implicit operator float(Vec v) => v.x;"));
    }

    #[test]
    fn modifier_keyword_without_a_declaration_is_an_error() {
        let result = parse("class C { static }");
        assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
        assert_eq!(result.tree.text(), "class C { static }");
    }
}
