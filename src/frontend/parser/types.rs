//! Names and types, plus the token-level type scanner the disambiguation
//! predicates are built on.

use super::*;

/// Lookahead never scans further than this many tokens ahead.
pub(super) const MAX_LOOKAHEAD: usize = 4096;

/// Where a type is being read; decides how `?`, `*` and `[` suffixes bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TypeContext {
    Plain,
    /// Right operand of `is`/`as` and pattern types: a suffix only binds
    /// when the expression could end right after it.
    IsAs,
}

/// Result of scanning a type without building it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct TypeScan {
    /// Index of the first token after the type.
    pub end: usize,
    /// Predefined, pointer, nullable, array, generic or tuple type: a shape
    /// no expression can take.
    pub unambiguous: bool,
}

parser_impl! {
    pub(super) fn parse_type(&mut self) -> bool {
        self.parse_type_in(TypeContext::Plain)
    }

    pub(super) fn parse_type_in(&mut self, context: TypeContext) -> bool {
        if !self.enter_nesting() {
            self.missing_silent(TokenKind::Identifier);
            return false;
        }
        let checkpoint = self.builder.checkpoint();
        let parsed = self.parse_type_head();
        if parsed {
            self.parse_type_suffixes(checkpoint, context);
        }
        self.leave_nesting();
        parsed
    }

    fn parse_type_head(&mut self) -> bool {
        match self.peek_kind() {
            TokenKind::Keyword(Keyword::Ref) => {
                self.node(SyntaxKind::RefType, |p| {
                    p.bump();
                    p.labeled(Field::Type, Self::parse_type);
                });
                true
            }
            TokenKind::Keyword(Keyword::Function) => {
                self.node(SyntaxKind::FunctionPointerType, |p| {
                    p.bump();
                    p.labeled(Field::Returns, Self::parse_type);
                    p.labeled(Field::Parameters, Self::parse_function_type_parameters);
                });
                true
            }
            TokenKind::Punctuation('(') => {
                self.parse_tuple_type();
                true
            }
            TokenKind::Keyword(keyword) if keyword.is_predefined_type() => {
                self.node(SyntaxKind::PredefinedType, Self::bump);
                true
            }
            TokenKind::Keyword(Keyword::Decltype | Keyword::Comptype) => {
                self.parse_type_operator();
                true
            }
            TokenKind::Identifier if self.at_implicit_type() => {
                self.node(SyntaxKind::ImplicitType, Self::bump);
                true
            }
            TokenKind::Identifier => {
                self.parse_name();
                true
            }
            _ => {
                self.error_expected("type");
                self.missing_silent(TokenKind::Identifier);
                false
            }
        }
    }

    /// `var`, or `let` in front of a designation.
    fn at_implicit_type(&mut self) -> bool {
        if self.peek_identifier("var") {
            return !matches!(
                self.nth_kind(1),
                TokenKind::Punctuation('.') | TokenKind::Operator("<" | "::")
            );
        }
        self.peek_identifier("let")
            && matches!(
                self.nth_kind(1),
                TokenKind::Identifier | TokenKind::Punctuation('(')
            )
    }

    fn parse_type_suffixes(&mut self, checkpoint: Checkpoint, context: TypeContext) {
        loop {
            let wrap = match self.peek_kind() {
                TokenKind::Operator("?") if self.nullable_suffix_at(0, context) => {
                    SyntaxKind::NullableType
                }
                TokenKind::Operator("*") if self.pointer_suffix_at(0, context) => {
                    SyntaxKind::PointerType
                }
                TokenKind::Punctuation('[') if self.rank_suffix_at(0, context) => {
                    SyntaxKind::ArrayType
                }
                _ => break,
            };
            self.builder.label_at(checkpoint, Field::Type);
            self.builder.start_node_at(checkpoint, wrap);
            if wrap == SyntaxKind::ArrayType {
                self.labeled(Field::Rank, Self::parse_array_rank_specifier);
            } else {
                self.bump();
            }
            self.builder.finish_node();
        }
    }

    /// `_name`: simple, generic, qualified or alias-qualified.
    pub(super) fn parse_name(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_simple_type_name();
        if self.check_operator("::") {
            self.builder.label_at(checkpoint, Field::Alias);
            self.builder
                .start_node_at(checkpoint, SyntaxKind::AliasQualifiedName);
            self.bump();
            self.labeled(Field::Name, Self::parse_simple_type_name);
            self.builder.finish_node();
        }
        while self.check_punctuation('.') && self.nth_kind(1) == TokenKind::Identifier {
            self.qualify(checkpoint);
        }
    }

    fn qualify(&mut self, checkpoint: Checkpoint) {
        self.builder.label_at(checkpoint, Field::Qualifier);
        self.builder.start_node_at(checkpoint, SyntaxKind::QualifiedName);
        self.bump();
        self.labeled(Field::Name, Self::parse_simple_type_name);
        self.builder.finish_node();
    }

    /// Identifier or generic name in type position: `<` always opens type
    /// arguments when a well-formed list follows.
    pub(super) fn parse_simple_type_name(&mut self) {
        if self.peek_kind() == TokenKind::Identifier
            && self.peek_operator_n(1, "<")
            && self.scan_type_arguments(1).is_some()
        {
            self.node(SyntaxKind::GenericName, |p| {
                p.parse_identifier(false);
                p.parse_type_argument_list();
            });
        } else {
            self.parse_identifier(false);
        }
    }

    /// `Name.` in front of an explicitly implemented member.
    pub(super) fn parse_explicit_interface_specifier(&mut self) {
        self.node(SyntaxKind::ExplicitInterfaceSpecifier, |p| {
            let checkpoint = p.builder.checkpoint();
            p.parse_simple_type_name();
            while p.check_punctuation('.')
                && p.nth_kind(1) == TokenKind::Identifier
                && p.explicit_specifier_continues()
            {
                p.qualify(checkpoint);
            }
            p.expect_punctuation('.');
        });
    }

    /// After `Name`, whether `. Next .` continues the interface name.
    fn explicit_specifier_continues(&mut self) -> bool {
        let Some((end, _)) = self.scan_simple_name(1) else {
            return false;
        };
        self.peek_punctuation_n(end, '.')
    }

    /// Whether `Name .` (possibly qualified) starts at `at` and is followed
    /// by a member name.
    pub(super) fn explicit_interface_ahead(&mut self, at: usize) -> bool {
        if self.nth_kind(at) != TokenKind::Identifier {
            return false;
        }
        let Some((mut index, _)) = self.scan_simple_name(at) else {
            return false;
        };
        let mut found = false;
        while self.peek_punctuation_n(index, '.') {
            match self.nth_kind(index + 1) {
                TokenKind::Identifier => {
                    found = true;
                    match self.scan_simple_name(index + 1) {
                        Some((end, _)) if self.peek_punctuation_n(end, '.') => index = end,
                        _ => return true,
                    }
                }
                TokenKind::Keyword(Keyword::This | Keyword::Operator) => return true,
                _ => return false,
            }
        }
        found
    }

    pub(super) fn parse_type_argument_list(&mut self) {
        self.node(SyntaxKind::TypeArgumentList, |p| {
            p.bump();
            if p.check_punctuation(',') || p.check_operator(">") {
                while p.consume_punctuation(',') {}
            } else {
                loop {
                    p.parse_type();
                    if !p.consume_punctuation(',') {
                        break;
                    }
                }
            }
            p.expect_operator(">");
        });
    }

    pub(super) fn parse_array_rank_specifier(&mut self) {
        self.node(SyntaxKind::ArrayRankSpecifier, |p| {
            p.bump();
            loop {
                if !p.check_punctuation(',') && !p.check_punctuation(']') && !p.at_end() {
                    p.parse_expression();
                }
                if !p.consume_punctuation(',') {
                    break;
                }
            }
            p.expect_punctuation(']');
        });
    }

    fn parse_tuple_type(&mut self) {
        self.node(SyntaxKind::TupleType, |p| {
            p.bump();
            loop {
                p.node(SyntaxKind::TupleElement, |p| {
                    p.labeled(Field::Type, Self::parse_type);
                    if p.peek_kind() == TokenKind::Identifier {
                        p.labeled(Field::Name, |p| p.parse_identifier(false));
                    }
                });
                if !p.consume_punctuation(',') {
                    break;
                }
            }
            p.expect_punctuation(')');
        });
    }

    fn nullable_suffix_at(&mut self, index: usize, context: TypeContext) -> bool {
        match context {
            TypeContext::Plain => {
                !(self.peek_punctuation_n(index + 1, '.') && self.adjacent_n(index))
            }
            TypeContext::IsAs => self.type_can_end_before(index + 1),
        }
    }

    fn pointer_suffix_at(&mut self, index: usize, context: TypeContext) -> bool {
        match context {
            TypeContext::Plain => true,
            TypeContext::IsAs => self.type_can_end_before(index + 1),
        }
    }

    fn rank_suffix_at(&mut self, index: usize, context: TypeContext) -> bool {
        match context {
            TypeContext::Plain => true,
            TypeContext::IsAs => matches!(
                self.nth_kind(index + 1),
                TokenKind::Punctuation(']' | ',')
            ),
        }
    }

    /// Tokens that may directly follow a complete `is`/`as` expression.
    pub(super) fn type_can_end_before(&mut self, index: usize) -> bool {
        match self.nth_kind(index) {
            TokenKind::Punctuation(')' | ']' | '}' | ',' | ';' | ':')
            | TokenKind::InterpolationCloseBrace
            | TokenKind::InterpolationFormat
            | TokenKind::EndOfFile
            | TokenKind::ScannerFault => true,
            TokenKind::Operator(op) => {
                matches!(op, "==" | "!=" | "&&" | "||" | "??" | "=>" | "=")
            }
            _ => false,
        }
    }

    /// Scans a type starting `at` tokens ahead without building anything.
    pub(super) fn scan_type(&mut self, at: usize, context: TypeContext) -> Option<TypeScan> {
        if at > MAX_LOOKAHEAD {
            return None;
        }
        let (mut index, mut unambiguous) = match self.nth_kind(at) {
            TokenKind::Keyword(Keyword::Ref) => {
                let inner = self.scan_type(at + 1, context)?;
                return Some(TypeScan {
                    unambiguous: true,
                    ..inner
                });
            }
            TokenKind::Keyword(Keyword::Function) => {
                let returns = self.scan_type(at + 1, TypeContext::Plain)?;
                if !self.peek_punctuation_n(returns.end, '(') {
                    return None;
                }
                (self.skip_balanced(returns.end)?, true)
            }
            TokenKind::Punctuation('(') => (self.scan_tuple_type(at)?, true),
            TokenKind::Keyword(keyword) if keyword.is_predefined_type() => (at + 1, true),
            TokenKind::Keyword(Keyword::Decltype | Keyword::Comptype)
                if self.peek_punctuation_n(at + 1, '(') =>
            {
                (self.skip_balanced(at + 1)?, true)
            }
            TokenKind::Identifier => self.scan_name(at)?,
            _ => return None,
        };
        loop {
            match self.nth_kind(index) {
                TokenKind::Operator("?") if self.nullable_suffix_at(index, context) => {
                    unambiguous = true;
                    index += 1;
                }
                TokenKind::Operator("*") if self.pointer_suffix_at(index, context) => {
                    unambiguous = true;
                    index += 1;
                }
                TokenKind::Punctuation('[') if self.rank_suffix_at(index, context) => {
                    let close = self.skip_balanced(index)?;
                    if (index + 1..close - 1).all(|i| self.peek_punctuation_n(i, ',')) {
                        unambiguous = true;
                    }
                    index = close;
                }
                _ => break,
            }
        }
        Some(TypeScan {
            end: index,
            unambiguous,
        })
    }

    /// `(T a, U b, ...)` with at least two elements.
    fn scan_tuple_type(&mut self, at: usize) -> Option<usize> {
        let mut index = at + 1;
        let mut elements = 0usize;
        loop {
            index = self.scan_type(index, TypeContext::Plain)?.end;
            if self.nth_kind(index) == TokenKind::Identifier {
                index += 1;
            }
            elements += 1;
            if self.peek_punctuation_n(index, ',') {
                index += 1;
                continue;
            }
            break;
        }
        (elements >= 2 && self.peek_punctuation_n(index, ')')).then_some(index + 1)
    }

    /// Dotted or alias-qualified name; the flag tells whether any segment
    /// carried type arguments.
    pub(super) fn scan_name(&mut self, at: usize) -> Option<(usize, bool)> {
        let (mut index, mut generic) = self.scan_simple_name(at)?;
        loop {
            let separator = self.peek_punctuation_n(index, '.') || self.peek_operator_n(index, "::");
            if !separator || self.nth_kind(index + 1) != TokenKind::Identifier {
                break;
            }
            let (end, segment_generic) = self.scan_simple_name(index + 1)?;
            index = end;
            generic |= segment_generic;
        }
        Some((index, generic))
    }

    pub(super) fn scan_simple_name(&mut self, at: usize) -> Option<(usize, bool)> {
        if self.nth_kind(at) != TokenKind::Identifier {
            return None;
        }
        if self.peek_operator_n(at + 1, "<")
            && let Some(end) = self.scan_type_arguments(at + 1)
        {
            return Some((end, true));
        }
        Some((at + 1, false))
    }

    /// `at` points at `<`; returns the index after the closing `>`.
    pub(super) fn scan_type_arguments(&mut self, at: usize) -> Option<usize> {
        let mut index = at + 1;
        if self.peek_punctuation_n(index, ',') || self.peek_operator_n(index, ">") {
            while self.peek_punctuation_n(index, ',') {
                index += 1;
            }
            return self.peek_operator_n(index, ">").then_some(index + 1);
        }
        loop {
            if index > at + MAX_LOOKAHEAD {
                return None;
            }
            index = self.scan_type(index, TypeContext::Plain)?.end;
            if self.peek_punctuation_n(index, ',') {
                index += 1;
            } else if self.peek_operator_n(index, ">") {
                return Some(index + 1);
            } else {
                return None;
            }
        }
    }

    /// `at` points at an opening bracket; returns the index after its match.
    pub(super) fn skip_balanced(&mut self, at: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut index = at;
        while index <= at + MAX_LOOKAHEAD {
            match self.nth_kind(index) {
                TokenKind::Punctuation('(' | '[' | '{') => depth += 1,
                TokenKind::Punctuation(')' | ']' | '}') => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(index + 1);
                    }
                }
                TokenKind::EndOfFile | TokenKind::ScannerFault => return None,
                _ => {}
            }
            index += 1;
        }
        None
    }
}
