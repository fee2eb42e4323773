use super::*;

parser_impl! {
    /// `<[attrs] [in|out] T, ...>` on a type, method, mixin or delegate.
    pub(super) fn parse_type_parameter_list(&mut self) {
        self.node(SyntaxKind::TypeParameterList, |p| {
            p.bump();
            if p.check_operator(">") {
                p.error_here("type parameter list cannot be empty");
                p.bump();
                return;
            }
            loop {
                p.parse_type_parameter();
                if !p.consume_punctuation(',') {
                    break;
                }
            }
            p.expect_operator(">");
        });
    }

    fn parse_type_parameter(&mut self) {
        self.node(SyntaxKind::TypeParameter, |p| {
            p.parse_attribute_lists();
            if matches!(
                p.peek_kind(),
                TokenKind::Keyword(Keyword::In | Keyword::Out)
            ) {
                p.bump();
            }
            p.labeled(Field::Name, |p| p.parse_identifier(false));
        });
    }

    /// Zero or more `where T : ...` clauses.
    pub(super) fn parse_constraint_clauses(&mut self) {
        while self.peek_identifier("where") {
            self.node(SyntaxKind::TypeParameterConstraintsClause, |p| {
                p.bump();
                p.parse_identifier(false);
                p.expect_punctuation(':');
                loop {
                    p.parse_type_parameter_constraint();
                    if !p.consume_punctuation(',') {
                        break;
                    }
                }
            });
        }
    }

    fn parse_type_parameter_constraint(&mut self) {
        self.node(SyntaxKind::TypeParameterConstraint, |p| match p.peek_kind() {
            TokenKind::Keyword(Keyword::Struct) => {
                p.bump();
                p.consume_operator("*");
            }
            TokenKind::Keyword(
                Keyword::Class
                | Keyword::Enum
                | Keyword::Interface
                | Keyword::New
                | Keyword::Delete,
            ) => p.bump(),
            TokenKind::Keyword(Keyword::Const) => {
                p.bump();
                if !p.at_constraint_end() {
                    p.labeled(Field::Type, Self::parse_type);
                }
            }
            TokenKind::Identifier if p.peek_identifier("var") && p.at_constraint_end_n(1) => {
                p.bump();
            }
            TokenKind::Keyword(Keyword::Operator) => p.parse_operator_constraint(),
            _ => {
                p.labeled(Field::Type, Self::parse_type);
            }
        });
    }

    /// `operator T + T`, `operator + T`, `operator implicit T`.
    fn parse_operator_constraint(&mut self) {
        self.bump();
        if matches!(
            self.peek_kind(),
            TokenKind::Keyword(Keyword::Implicit | Keyword::Explicit)
        ) {
            self.bump();
            self.parse_identifier(false);
            return;
        }
        if self.peek_kind() == TokenKind::Identifier {
            self.parse_identifier(false);
        }
        self.labeled(Field::Operator, Self::parse_overloadable_operator);
        self.parse_identifier(false);
    }

    fn at_constraint_end(&mut self) -> bool {
        self.at_constraint_end_n(0)
    }

    fn at_constraint_end_n(&mut self, offset: usize) -> bool {
        matches!(
            self.nth_kind(offset),
            TokenKind::Punctuation(',' | '{' | ';')
                | TokenKind::Operator("=>")
                | TokenKind::EndOfFile
        ) || self.peek_identifier_n(offset, "where")
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;

    #[test]
    fn constraint_clause_forms() {
        let result = parse(
            "class Pool<T, in U> where T : class, new where U : struct*, operator T + U, IDisposable { }",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let clauses: Vec<_> = result
            .tree
            .descendants()
            .filter(|node| node.kind() == crate::SyntaxKind::TypeParameterConstraintsClause)
            .collect();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[1].trimmed_text(), "where U : struct*, operator T + U, IDisposable");
    }

    #[test]
    fn empty_type_parameter_list_is_reported() {
        let result = parse("class C<> { }");
        assert_eq!(result.diagnostics.len(), 1);
    }
}
