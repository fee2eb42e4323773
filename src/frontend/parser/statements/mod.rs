//! Statement parsing: dispatch on the leading token, then one submodule per
//! statement family.

use super::*;

mod local;
mod loops;
mod resource;
mod selection;
mod simple;

/// What a statement that starts with a type-like prefix turns out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocalShape {
    Declaration,
    Function,
}

parser_impl! {
    /// Parses one statement, including labeled statements and local
    /// declarations.
    pub(super) fn parse_statement(&mut self) {
        if !self.enter_nesting() {
            self.skip_into_error(starts_statement_or_declaration);
            return;
        }
        self.parse_statement_inner();
        self.leave_nesting();
    }

    fn parse_statement_inner(&mut self) {
        match self.peek_kind() {
            TokenKind::Punctuation('{') => self.parse_block(),
            TokenKind::Punctuation(';') => {
                self.node(SyntaxKind::EmptyStatement, Self::bump);
            }
            TokenKind::Keyword(Keyword::Break) => self.parse_jump(SyntaxKind::BreakStatement),
            TokenKind::Keyword(Keyword::Continue) => self.parse_jump(SyntaxKind::ContinueStatement),
            TokenKind::Keyword(Keyword::Return) => self.parse_return_statement(),
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenKind::Keyword(Keyword::Switch) if self.peek_punctuation_n(1, '(') => {
                self.parse_switch_statement();
            }
            TokenKind::Keyword(Keyword::While) => self.parse_while_statement(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do_statement(),
            TokenKind::Keyword(Keyword::Repeat) => self.parse_repeat_statement(),
            TokenKind::Keyword(Keyword::For) => self.parse_for_statement(),
            TokenKind::Keyword(Keyword::Using) => self.parse_using_statement(),
            TokenKind::Keyword(Keyword::Defer) => self.parse_defer_statement(),
            TokenKind::Keyword(Keyword::Delete) => self.parse_delete_statement(),
            TokenKind::DirectiveIf => self.parse_preproc_if(ContentKind::TopLevel),
            TokenKind::Identifier if self.peek_punctuation_n(1, ':') => {
                self.parse_labeled_statement();
            }
            _ => match self.local_shape_ahead() {
                Some(LocalShape::Function) => self.parse_local_function_statement(),
                Some(LocalShape::Declaration) => self.parse_local_declaration_statement(),
                None => self.parse_expression_statement(),
            },
        }
    }

    /// Body of `if`, `while`, `for` and friends. A missing body becomes an
    /// empty statement with a missing `;`.
    pub(super) fn parse_embedded_statement(&mut self) {
        if self.at_end() || self.check_punctuation('}') || self.at_branch_continuation() {
            self.error_expected("statement");
            self.node(SyntaxKind::EmptyStatement, |p| {
                p.missing_silent(TokenKind::Punctuation(';'));
            });
            return;
        }
        self.parse_statement();
    }

    pub(super) fn parse_block(&mut self) {
        self.node(SyntaxKind::Block, |p| {
            if !p.expect_punctuation('{') {
                return;
            }
            let scope = p.enter_scope();
            p.parse_statement_list(Self::at_block_end);
            p.close_scope(scope);
            p.expect_punctuation('}');
        });
    }

    fn at_block_end(&mut self) -> bool {
        self.check_punctuation('}')
    }

    /// Statements up to `}`, end of input, or wherever `stop` says.
    fn parse_statement_list(&mut self, stop: fn(&mut Self) -> bool) {
        while !self.at_end() && !stop(self) {
            if self.at_branch_continuation() {
                self.parse_stray_directive();
                continue;
            }
            if self.check_punctuation('}') {
                break;
            }
            let before = self.stream.consumed();
            self.parse_statement();
            if self.stream.consumed() == before {
                self.recover_statement("statement");
            }
        }
    }

    /// `name: statement`
    fn parse_labeled_statement(&mut self) {
        self.node(SyntaxKind::LabeledStatement, |p| {
            p.parse_identifier(false);
            p.bump();
            p.parse_embedded_statement();
        });
    }

    /// Classifies a statement that may open with attributes, modifiers and
    /// a type.
    fn local_shape_ahead(&mut self) -> Option<LocalShape> {
        let mut index = 0;
        while self.peek_punctuation_n(index, '[') {
            index = self.skip_balanced(index)?;
        }
        while let TokenKind::Keyword(keyword) = self.nth_kind(index)
            && keyword.is_modifier()
            && keyword != Keyword::New
        {
            index += 1;
        }
        let implicit = self.peek_identifier_n(index, "var") || self.peek_identifier_n(index, "let");
        let scan = self.scan_type(index, TypeContext::Plain)?;
        match self.nth_kind(scan.end) {
            TokenKind::Identifier => {
                let after = scan.end + 1;
                if self.peek_punctuation_n(after, '(') {
                    return Some(LocalShape::Function);
                }
                if self.peek_operator_n(after, "<")
                    && let Some(end) = self.scan_type_arguments(after)
                    && self.peek_punctuation_n(end, '(')
                {
                    return Some(LocalShape::Function);
                }
                Some(LocalShape::Declaration)
            }
            TokenKind::Punctuation('(') if implicit && scan.end == index + 1 => {
                Some(LocalShape::Declaration)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use crate::{SyntaxKind, parse};

    /// S-expression of the first statement inside `void F() { ... }`.
    pub(super) fn statement(body: &str) -> String {
        let source = format!("void F() {{ {body} }}");
        let result = parse(&source);
        assert!(
            result.diagnostics.is_empty(),
            "{body}: {:?}",
            result.diagnostics
        );
        result
            .tree
            .find_descendant(SyntaxKind::Block)
            .and_then(|block| block.child_nodes().next())
            .map(|node| node.to_sexp())
            .unwrap_or_default()
    }

    #[test]
    fn labeled_and_empty_statements() {
        expect![[r#"(labeled_statement (identifier "again") (empty_statement))"#]]
            .assert_eq(&statement("again: ;"));
    }

    #[test]
    fn statement_shapes_at_identifier_start() {
        expect![[r#"(local_declaration_statement (variable_declaration type: (pointer_type type: (identifier "a")) (variable_declarator name: (identifier "b"))))"#]]
            .assert_eq(&statement("a* b;"));
        expect![[r#"(expression_statement (assignment_expression left: (identifier "a") operator: "=" right: (identifier "b")))"#]]
            .assert_eq(&statement("a = b;"));
        expect![[r#"(local_function_statement type: (predefined_type "int") name: (identifier "Twice") parameters: (parameter_list (parameter type: (predefined_type "int") name: (identifier "x"))) body: (arrow_expression_clause (binary_expression left: (identifier "x") operator: "*" right: (integer_literal "2"))))"#]]
            .assert_eq(&statement("int Twice(int x) => x * 2;"));
    }

    #[test]
    fn unclosed_if_has_a_single_error() {
        let result = parse("void F() { if (x }");
        assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
        assert_eq!(result.tree.text(), "void F() { if (x }");
    }

    #[test]
    fn garbage_in_a_block_is_skipped_to_the_next_statement() {
        let result = parse("void F() { ) ; return 1; }");
        assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
        let block = result.tree.find_descendant(SyntaxKind::Block);
        let kinds: Vec<_> = block
            .iter()
            .flat_map(|block| block.child_nodes())
            .map(|node| node.kind())
            .collect();
        assert_eq!(kinds, vec![SyntaxKind::Error, SyntaxKind::EmptyStatement, SyntaxKind::ReturnStatement]);
    }
}
