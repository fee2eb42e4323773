//! `[Attr(args)]` lists, including lists wrapped in `#if` regions.

use super::*;

parser_impl! {
    /// Zero or more attribute lists in front of a declaration, parameter or
    /// lambda.
    pub(super) fn parse_attribute_lists(&mut self) {
        loop {
            if self.check_punctuation('[') {
                self.parse_attribute_list();
            } else if self.attribute_conditional_end(0).is_some() {
                self.parse_preproc_if(ContentKind::AttributeList);
            } else {
                break;
            }
        }
    }

    /// `[ [target:] Attr, Attr(args), ... ]`
    pub(super) fn parse_attribute_list(&mut self) {
        self.node(SyntaxKind::AttributeList, |p| {
            p.bump();
            let target = matches!(
                p.peek_kind(),
                TokenKind::Identifier | TokenKind::Keyword(Keyword::Return)
            ) && p.peek_punctuation_n(1, ':');
            if target {
                p.node(SyntaxKind::AttributeTargetSpecifier, |p| {
                    p.bump();
                    p.bump();
                });
            }
            while !p.check_punctuation(']') && !p.at_end() {
                p.parse_attribute();
                if !p.consume_punctuation(',') {
                    break;
                }
            }
            p.expect_punctuation(']');
        });
    }

    fn parse_attribute(&mut self) {
        self.node(SyntaxKind::Attribute, |p| {
            if p.peek_kind() == TokenKind::Identifier {
                p.labeled(Field::Name, Self::parse_name);
            } else {
                p.error_expected("attribute name");
                p.missing_silent(TokenKind::Identifier);
                return;
            }
            if p.check_punctuation('(') {
                p.labeled(Field::Arguments, Self::parse_attribute_argument_list);
            }
        });
    }

    fn parse_attribute_argument_list(&mut self) {
        self.node(SyntaxKind::AttributeArgumentList, |p| {
            p.bump();
            while !p.check_punctuation(')') && !p.at_end() {
                p.node(SyntaxKind::AttributeArgument, |p| {
                    let named = p.peek_kind() == TokenKind::Identifier
                        && (p.peek_punctuation_n(1, ':') || p.peek_operator_n(1, "="));
                    if named {
                        p.labeled(Field::Name, |p| p.parse_identifier(false));
                        p.bump();
                    }
                    p.parse_expression();
                });
                if !p.consume_punctuation(',') {
                    break;
                }
            }
            p.expect_punctuation(')');
        });
    }

    /// Index after attribute lists and attribute-only conditionals starting
    /// at `at`; `None` when a list does not close.
    pub(super) fn skip_attribute_prefix(&mut self, at: usize) -> Option<usize> {
        let mut index = at;
        loop {
            if self.peek_punctuation_n(index, '[') {
                index = self.skip_balanced(index)?;
            } else if let Some(end) = self.attribute_conditional_end(index) {
                index = end;
            } else {
                return Some(index);
            }
        }
    }

    /// When `#if` at `at` holds at most one attribute list per branch and at
    /// least one overall, the index after its `#endif`.
    pub(super) fn attribute_conditional_end(&mut self, at: usize) -> Option<usize> {
        if self.nth_kind(at) != TokenKind::DirectiveIf {
            return None;
        }
        let mut index = at + 1;
        let mut lists = 0usize;
        let mut conditioned = true;
        loop {
            if conditioned {
                while self.nth_kind(index) != TokenKind::DirectiveEnd {
                    if self.nth_at_end(index) || index > at + MAX_LOOKAHEAD {
                        return None;
                    }
                    index += 1;
                }
                index += 1;
            }
            if self.peek_punctuation_n(index, '[') {
                index = self.skip_balanced(index)?;
                lists += 1;
            }
            match self.nth_kind(index) {
                TokenKind::DirectiveElif => conditioned = true,
                TokenKind::DirectiveElse => conditioned = false,
                TokenKind::DirectiveEndif => return (lists > 0).then_some(index + 1),
                _ => return None,
            }
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use crate::{SyntaxKind, parse};

    #[test]
    fn targets_names_and_arguments() {
        let result = parse(r#"class C { [return: NoDiscard, Obsolete("old", Error = true)] int F() => 1; }"#);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let list = result
            .tree
            .find_descendant(SyntaxKind::AttributeList)
            .map(|node| node.to_sexp())
            .unwrap_or_default();
        expect![[r#"(attribute_list (attribute_target_specifier "return") (attribute name: (identifier "NoDiscard")) (attribute name: (identifier "Obsolete") arguments: (attribute_argument_list (attribute_argument (string_literal "\"old\"")) (attribute_argument name: (identifier "Error") (boolean_literal "true")))))"#]]
            .assert_eq(&list);
    }

    #[test]
    fn conditional_attribute_list_prefixes_the_declaration() {
        let source = "class C {\n#if DEBUG\n[Log]\n#else\n[Inline]\n#endif\nvoid F() { }\n}\n";
        let result = parse(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let method = result
            .tree
            .find_descendant(SyntaxKind::MethodDeclaration)
            .expect("method");
        let first = method.child_nodes().next().map(|node| node.kind());
        assert_eq!(first, Some(SyntaxKind::PreprocIf));
        assert_eq!(result.tree.text(), source);
    }

    #[test]
    fn conditional_members_are_not_attribute_lists() {
        let source = "class C {\n#if DEBUG\nint x;\n#endif\n}\n";
        let result = parse(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let region = result.tree.find_descendant(SyntaxKind::PreprocIf).expect("region");
        assert!(region.find_descendant(SyntaxKind::FieldDeclaration).is_some());
    }
}
