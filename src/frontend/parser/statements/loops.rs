//! `while`, `do`, `repeat ... while` and the three `for` headers.

use super::*;

/// Which header a `for (` opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForHeader {
    /// `init; condition; update`
    Conditions,
    /// `T i < end` or `T i <= end`
    Iterate,
    /// `T x in source` or `x in source`
    Each,
}

parser_impl! {
    pub(super) fn parse_while_statement(&mut self) {
        self.node(SyntaxKind::WhileStatement, |p| {
            p.bump();
            p.parse_parenthesized_condition();
            p.labeled(Field::Body, Self::parse_embedded_statement);
        });
    }

    /// `( condition )` after `if` and `while`.
    pub(super) fn parse_parenthesized_condition(&mut self) {
        self.expect_punctuation('(');
        self.labeled(Field::Condition, Self::parse_expression);
        self.expect_punctuation(')');
    }

    /// `do { ... }`; Beef has no trailing `while`.
    pub(super) fn parse_do_statement(&mut self) {
        self.node(SyntaxKind::DoStatement, |p| {
            p.bump();
            p.labeled(Field::Body, Self::parse_embedded_statement);
        });
    }

    pub(super) fn parse_repeat_statement(&mut self) {
        self.node(SyntaxKind::RepeatWhileStatement, |p| {
            p.bump();
            p.labeled(Field::Body, Self::parse_embedded_statement);
            p.expect_keyword(Keyword::While);
            p.parse_parenthesized_condition();
            p.expect_punctuation(';');
        });
    }

    pub(super) fn parse_for_statement(&mut self) {
        let header = self.for_header_ahead();
        let kind = if header == ForHeader::Each {
            SyntaxKind::ForeachStatement
        } else {
            SyntaxKind::ForStatement
        };
        self.node(kind, |p| {
            p.bump();
            p.expect_punctuation('(');
            match header {
                ForHeader::Conditions => p.parse_for_conditions(),
                ForHeader::Iterate => p.parse_for_iterate(),
                ForHeader::Each => p.parse_foreach_header(),
            }
            p.expect_punctuation(')');
            p.labeled(Field::Body, Self::parse_embedded_statement);
        });
    }

    fn parse_for_conditions(&mut self) {
        if !self.check_punctuation(';') {
            if self.for_declaration_ahead(0) {
                self.labeled(Field::Initializer, Self::parse_variable_declaration);
            } else {
                self.parse_labeled_expressions(Field::Initializer);
            }
        }
        self.expect_punctuation(';');
        if !self.check_punctuation(';') {
            self.labeled(Field::Condition, Self::parse_expression);
        }
        self.expect_punctuation(';');
        if !self.check_punctuation(')') {
            self.parse_labeled_expressions(Field::Update);
        }
    }

    fn parse_labeled_expressions(&mut self, field: Field) {
        loop {
            self.labeled(field, Self::parse_expression);
            if !self.consume_punctuation(',') {
                break;
            }
        }
    }

    /// `int i < count`: the declarator carries no initializer.
    fn parse_for_iterate(&mut self) {
        self.labeled(Field::Initializer, |p| {
            p.node(SyntaxKind::VariableDeclaration, |p| {
                p.labeled(Field::Type, Self::parse_type);
                p.node(SyntaxKind::VariableDeclarator, |p| {
                    p.labeled(Field::Name, |p| p.parse_identifier(true));
                });
            });
        });
        self.bump_labeled(Field::Operator);
        if !self.check_punctuation(')') {
            self.labeled(Field::Right, Self::parse_expression);
        }
    }

    fn parse_foreach_header(&mut self) {
        if self.peek_keyword_n(1, Keyword::In) {
            self.labeled(Field::Left, |p| p.parse_identifier(false));
        } else if self.for_declaration_ahead(0) {
            self.labeled(Field::Type, Self::parse_type);
            if self.check_punctuation('(') {
                self.labeled(Field::Left, Self::parse_tuple_pattern);
            } else {
                self.labeled(Field::Left, |p| p.parse_identifier(true));
            }
        } else {
            self.labeled(Field::Left, Self::parse_expression);
        }
        self.expect_keyword(Keyword::In);
        self.labeled(Field::Right, Self::parse_expression);
    }

    /// Decides the header form by scanning the parenthesized group after
    /// `for`.
    fn for_header_ahead(&mut self) -> ForHeader {
        if !self.peek_punctuation_n(1, '(') {
            return ForHeader::Conditions;
        }
        if self.in_before_semicolon(2) {
            return ForHeader::Each;
        }
        if let Some(scan) = self.scan_type(2, TypeContext::Plain)
            && self.nth_kind(scan.end) == TokenKind::Identifier
            && matches!(self.nth_kind(scan.end + 1), TokenKind::Operator("<" | "<="))
        {
            return ForHeader::Iterate;
        }
        ForHeader::Conditions
    }

    /// An `in` at bracket depth zero before the first `;` or the closing `)`.
    fn in_before_semicolon(&mut self, at: usize) -> bool {
        let mut depth = 0usize;
        let mut index = at;
        while index <= at + MAX_LOOKAHEAD {
            match self.nth_kind(index) {
                TokenKind::Punctuation('(' | '[' | '{') => depth += 1,
                TokenKind::Punctuation(')' | ']' | '}') => {
                    if depth == 0 {
                        return false;
                    }
                    depth -= 1;
                }
                TokenKind::Punctuation(';') | TokenKind::EndOfFile | TokenKind::ScannerFault => {
                    return false;
                }
                TokenKind::Keyword(Keyword::In) if depth == 0 => return true,
                _ => {}
            }
            index += 1;
        }
        false
    }

    /// A type followed by a declarator name or `var (a, b)` designation.
    fn for_declaration_ahead(&mut self, at: usize) -> bool {
        let Some(scan) = self.scan_type(at, TypeContext::Plain) else {
            return false;
        };
        match self.nth_kind(scan.end) {
            TokenKind::Identifier => true,
            TokenKind::Punctuation('(') => {
                scan.end == at + 1
                    && (self.peek_identifier_n(at, "var") || self.peek_identifier_n(at, "let"))
            }
            _ => false,
        }
    }
}
