//! Conditional-compilation regions.
//!
//! `#if` chains are kept in the tree with every branch parsed; what a branch
//! may hold depends on where the region appears (see [`ContentKind`]).
//! Structural problems such as a missing `#endif` or `#elif` after `#else`
//! are reported through the preprocessor diagnostic sink, not as syntax
//! errors.

use super::*;

/// Binding power of the condition operators.
fn condition_precedence(symbol: &str) -> Option<u8> {
    match symbol {
        "||" => Some(1),
        "&&" => Some(2),
        "==" | "!=" => Some(3),
        _ => None,
    }
}

parser_impl! {
    /// `#if cond ... [#elif cond ...]* [#else ...] #endif`
    pub(super) fn parse_preproc_if(&mut self, content: ContentKind) {
        let opened_at = self.span_here();
        let condition = self.directive_condition_text();
        tracing::trace!(
            target: "parser",
            stage = "preproc.open",
            offset = opened_at.start,
            content = content.describe(),
            "conditional region"
        );
        self.node(SyntaxKind::PreprocIf, |p| {
            p.bump();
            p.parse_directive_condition();
            p.conditionals
                .push(PreprocessorFrame::open(condition, content, opened_at));
            p.parse_conditional_content(content);
            p.parse_preproc_alternatives(content);
            if p.peek_kind() == TokenKind::DirectiveEndif {
                if let Some(frame) = p.conditionals.top_mut() {
                    frame.close();
                }
                p.bump();
            }
            let closed = p.conditionals.pop().is_some_and(|frame| frame.closed);
            if !closed {
                p.report_preprocessor("`#if` is missing its `#endif`", opened_at);
                p.missing_silent(TokenKind::DirectiveEndif);
            }
        });
    }

    /// Nested `#elif`/`#else` branches, each holding the ones after it.
    fn parse_preproc_alternatives(&mut self, content: ContentKind) {
        loop {
            let branch = match self.peek_kind() {
                TokenKind::DirectiveElif => BranchKind::Elif,
                TokenKind::DirectiveElse => BranchKind::Else,
                _ => return,
            };
            let condition = self.directive_condition_text();
            let advanced = self
                .conditionals
                .top_mut()
                .map_or(Ok(()), |frame| frame.advance(branch, condition));
            if let Err(active) = advanced {
                let span = self.span_here();
                self.report_preprocessor(
                    format!("`{}` after `{}`", branch.directive(), active.directive()),
                    span,
                );
                self.bump_directive_into_error();
                self.parse_conditional_content(content);
                continue;
            }
            self.labeled(Field::Alternative, |p| {
                p.node(branch.node_kind(), |p| {
                    p.bump();
                    if branch == BranchKind::Elif {
                        p.parse_directive_condition();
                    }
                    p.parse_conditional_content(content);
                    p.parse_preproc_alternatives(content);
                });
            });
            return;
        }
    }

    /// Items of one branch, up to the next branch directive.
    fn parse_conditional_content(&mut self, content: ContentKind) {
        if content.is_single() {
            self.parse_single_conditional_item(content);
            return;
        }
        while !self.at_end() && !self.at_branch_continuation() {
            let before = self.stream.consumed();
            match content {
                ContentKind::Declaration => {
                    if self.check_punctuation('}') {
                        break;
                    }
                    self.parse_member();
                    if self.stream.consumed() == before {
                        self.recover_member("member declaration");
                    }
                }
                _ => {
                    if self.check_punctuation('}') {
                        if self.brace_scopes > 0 {
                            break;
                        }
                        self.parse_stray_brace();
                        continue;
                    }
                    if self.brace_scopes == 0 {
                        self.parse_top_level_item();
                    } else {
                        self.parse_statement();
                    }
                    if self.stream.consumed() == before {
                        self.recover_statement("statement");
                    }
                }
            }
        }
    }

    /// At most one expression, enum member or attribute list per branch.
    fn parse_single_conditional_item(&mut self, content: ContentKind) {
        if self.at_branch_continuation() || self.at_end() {
            return;
        }
        match content {
            ContentKind::Expression => {
                self.parse_expression();
            }
            ContentKind::EnumMember => {
                if self.enum_member_ahead() {
                    self.parse_enum_member();
                    self.consume_punctuation(',');
                }
            }
            ContentKind::AttributeList => {
                if self.check_punctuation('[') {
                    self.parse_attribute_list();
                }
            }
            ContentKind::TopLevel | ContentKind::Declaration => {}
        }
        if self.at_branch_continuation() || self.at_end() {
            return;
        }
        self.error_expected(&format!("a single {} in conditional branch", content.describe()));
        while !self.at_end() && !self.at_branch_continuation() {
            let before = self.stream.consumed();
            self.skip_into_error(|_| false);
            if self.stream.consumed() == before {
                break;
            }
        }
    }

    /// Condition text of the directive at the cursor, for bookkeeping.
    fn directive_condition_text(&mut self) -> String {
        if !matches!(
            self.peek_kind(),
            TokenKind::DirectiveIf | TokenKind::DirectiveElif
        ) {
            return String::new();
        }
        let mut words = Vec::new();
        let mut index = 1;
        while !matches!(
            self.nth_kind(index),
            TokenKind::DirectiveEnd | TokenKind::EndOfFile
        ) && index <= MAX_LOOKAHEAD
        {
            words.push(self.nth(index).lexeme.clone());
            index += 1;
        }
        words.join(" ")
    }

    /// Condition after `#if`/`#elif` through the end of the directive line.
    fn parse_directive_condition(&mut self) {
        if self.peek_kind() == TokenKind::DirectiveEnd {
            self.error_expected("condition");
            self.missing_silent(TokenKind::Identifier);
        } else {
            self.labeled(Field::Condition, |p| p.parse_condition_binary(1));
        }
        if !matches!(
            self.peek_kind(),
            TokenKind::DirectiveEnd | TokenKind::EndOfFile
        ) {
            self.error_expected("end of directive");
            self.node(SyntaxKind::Error, |p| {
                while !matches!(
                    p.peek_kind(),
                    TokenKind::DirectiveEnd | TokenKind::EndOfFile
                ) {
                    p.bump();
                }
            });
        }
        if self.peek_kind() == TokenKind::DirectiveEnd {
            self.bump();
        }
    }

    fn parse_condition_binary(&mut self, min: u8) {
        let checkpoint = self.builder.checkpoint();
        self.parse_condition_unary();
        loop {
            let TokenKind::Operator(symbol) = self.peek_kind() else {
                break;
            };
            let Some(precedence) = condition_precedence(symbol).filter(|p| *p >= min) else {
                break;
            };
            self.wrap(checkpoint, Field::Left, SyntaxKind::BinaryExpression);
            self.bump_labeled(Field::Operator);
            self.labeled(Field::Right, |p| p.parse_condition_binary(precedence + 1));
            self.builder.finish_node();
        }
    }

    fn parse_condition_unary(&mut self) {
        if !self.enter_nesting() {
            self.missing_silent(TokenKind::Identifier);
            return;
        }
        match self.peek_kind() {
            TokenKind::Operator("!") => {
                self.node(SyntaxKind::UnaryExpression, |p| {
                    p.bump_labeled(Field::Operator);
                    p.labeled(Field::Argument, Self::parse_condition_unary);
                });
            }
            TokenKind::Punctuation('(') => {
                self.node(SyntaxKind::ParenthesizedExpression, |p| {
                    p.bump();
                    p.parse_condition_binary(1);
                    p.expect_punctuation(')');
                });
            }
            TokenKind::Identifier => self.node(SyntaxKind::Identifier, Self::bump),
            TokenKind::Keyword(Keyword::True | Keyword::False) => {
                self.node(SyntaxKind::BooleanLiteral, Self::bump);
            }
            TokenKind::IntegerLiteral => self.node(SyntaxKind::IntegerLiteral, Self::bump),
            TokenKind::CharLiteral => self.node(SyntaxKind::CharacterLiteral, Self::bump),
            TokenKind::Keyword(_) => self.node(SyntaxKind::Identifier, Self::bump_as_identifier),
            _ => {
                self.error_expected("condition");
                self.missing_silent(TokenKind::Identifier);
            }
        }
        self.leave_nesting();
    }

    /// `#elif`, `#else` or `#endif` with no region to continue.
    pub(super) fn parse_stray_directive(&mut self) {
        let span = self.span_here();
        let directive = match self.peek_kind() {
            TokenKind::DirectiveElif => "#elif",
            TokenKind::DirectiveElse => "#else",
            _ => "#endif",
        };
        self.report_preprocessor(format!("`{directive}` without a matching `#if`"), span);
        self.bump_directive_into_error();
    }

    /// The directive at the cursor and its condition, as an `ERROR` node.
    fn bump_directive_into_error(&mut self) {
        let token = self.peek().clone();
        if let Some(telemetry) = self.telemetry.as_mut() {
            telemetry.record(RecoveryTelemetryKind::Synchronize, Some(&token));
        }
        self.node(SyntaxKind::Error, |p| {
            let conditioned = p.peek_kind() == TokenKind::DirectiveElif;
            p.bump();
            if conditioned {
                while !matches!(
                    p.peek_kind(),
                    TokenKind::DirectiveEnd | TokenKind::EndOfFile
                ) {
                    p.bump();
                }
                if p.peek_kind() == TokenKind::DirectiveEnd {
                    p.bump();
                }
            }
        });
    }

    /// Starts a `{ ... }` list: directives inside can no longer continue a
    /// region opened outside it.
    pub(in crate::frontend::parser) fn enter_scope(&mut self) -> usize {
        self.brace_scopes += 1;
        self.conditionals.enter_scope()
    }

    pub(in crate::frontend::parser) fn close_scope(&mut self, saved: usize) {
        self.brace_scopes = self.brace_scopes.saturating_sub(1);
        for frame in self.conditionals.leave_scope(saved) {
            self.report_preprocessor(
                format!("`{}` region is not closed before the end of the block", frame.branch.directive()),
                frame.opened_at,
            );
        }
    }

    fn report_preprocessor(&mut self, message: impl Into<String>, span: Span) {
        let message = message.into();
        tracing::debug!(
            target: "parser",
            stage = "preproc.structure",
            offset = span.start,
            message = %message,
            "preprocessor structure error"
        );
        let span = span.with_file(self.file_id);
        self.preprocessor.push(Diagnostic::error(message, Some(span)));
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use std::time::Instant;

    use super::super::Parser;
    use crate::diagnostics::ErrorKind;
    use crate::syntax::Checkpoint;
    use crate::{ParseOptions, SyntaxKind, parse};

    fn region(source: &str) -> String {
        let result = parse(source);
        assert!(result.diagnostics.is_empty(), "{source}: {:?}", result.diagnostics);
        assert_eq!(result.tree.text(), source);
        result
            .tree
            .find_descendant(SyntaxKind::PreprocIf)
            .map(|node| node.to_sexp())
            .unwrap_or_default()
    }

    #[test]
    fn branches_nest_as_alternatives() {
        let source = "#if A && !B\nint x = 1;\n#elif C\nint y;\n#else\nF();\n#endif\n";
        expect![[r#"(preproc_if condition: (binary_expression left: (identifier "A") operator: "&&" right: (unary_expression operator: "!" argument: (identifier "B"))) (local_declaration_statement (variable_declaration type: (predefined_type "int") (variable_declarator name: (identifier "x") (integer_literal "1")))) alternative: (preproc_elif condition: (identifier "C") (local_declaration_statement (variable_declaration type: (predefined_type "int") (variable_declarator name: (identifier "y")))) alternative: (preproc_else (expression_statement (invocation_expression function: (identifier "F") arguments: (argument_list))))))"#]]
            .assert_eq(&region(source));
    }

    #[test]
    fn condition_operators_bind_by_precedence() {
        let source = "#if A || B == C && (D)\n#endif\n";
        expect![[r#"(preproc_if condition: (binary_expression left: (identifier "A") operator: "||" right: (binary_expression left: (binary_expression left: (identifier "B") operator: "==" right: (identifier "C")) operator: "&&" right: (parenthesized_expression (identifier "D")))))"#]]
            .assert_eq(&region(source));
    }

    #[test]
    fn conditional_members_inside_a_class() {
        let source = "class C {\n#if DEBUG\nint a;\nint b;\n#endif\n}\n";
        let sexp = region(source);
        assert_eq!(sexp.matches("field_declaration").count(), 2);
    }

    #[test]
    fn missing_endif_is_a_preprocessor_error() {
        let result = parse("#if A\nint x;\n");
        assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
        assert_eq!(result.diagnostics[0].kind, Some(ErrorKind::PreprocessorStructure));
    }

    #[test]
    fn nested_regions_close_innermost_first() {
        let source = "#if A\n#if B\nint x;\n#endif\n#endif\n";
        let options = ParseOptions::default();
        let mut parser = Parser::new(source, &options);
        parser
            .builder
            .start_node_at(Checkpoint::START, SyntaxKind::CompilationUnit);
        parser.parse_top_level_items();
        assert!(parser.conditionals.is_empty());
        assert_eq!(parser.conditionals.depth(), 0);
        parser.finish_root();
        let output = parser.finish(Instant::now()).expect("parse was not cancelled");
        let reported = &output.reported;
        assert!(reported.lexical.is_empty() && reported.syntax.is_empty(), "{reported:?}");
        assert!(reported.preprocessor.is_empty(), "{reported:?}");
        assert_eq!(output.tree.text(), source);
        let outer = output.tree.find_descendant(SyntaxKind::PreprocIf);
        let inner = outer.and_then(|node| {
            node.child_nodes().find(|child| child.kind() == SyntaxKind::PreprocIf)
        });
        assert!(inner.is_some(), "{}", output.tree.to_sexp());
        assert_eq!(output.tree.to_sexp().matches("(preproc_if").count(), 2);
    }

    #[test]
    fn elif_outside_a_region_is_stray() {
        let result = parse("int x;\n#elif B\nint y;\n");
        assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
        assert_eq!(result.diagnostics[0].kind, Some(ErrorKind::PreprocessorStructure));
        assert!(result.diagnostics[0].message.contains("`#elif` without a matching `#if`"));
        assert_eq!(result.tree.errors().len(), 1);
        assert_eq!(result.tree.text(), "int x;\n#elif B\nint y;\n");
        assert_eq!(result.tree.to_sexp().matches("local_declaration_statement").count(), 2);
    }

    #[test]
    fn stray_and_repeated_branches_are_reported() {
        let result = parse("int x;\n#endif\n");
        assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
        assert!(result.tree.has_errors());

        let result = parse("#if A\n#else\n#else\n#endif\n");
        assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
        assert!(result.diagnostics[0].message.contains("`#else` after `#else`"));
    }

    #[test]
    fn region_cannot_close_inside_a_block() {
        let source = "#if A\nvoid F() {\n#endif\n}\n";
        let result = parse(source);
        assert_eq!(result.tree.text(), source);
        let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&Some(ErrorKind::PreprocessorStructure)), "{kinds:?}");
    }

    #[test]
    fn conditional_expression_operand() {
        let source = "int x = \n#if A\n1\n#else\n2\n#endif\n;\n";
        let sexp = region(source);
        assert!(sexp.starts_with("(preproc_if condition: (identifier \"A\") (integer_literal \"1\")"), "{sexp}");
    }
}
