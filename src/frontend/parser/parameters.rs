//! Parameter lists for methods, lambdas, indexers and function types.

use super::*;

/// What a parameter list belongs to; decides which parts may be omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParameterStyle {
    /// Declarations: type and name are both required.
    Named,
    /// Lambdas: a lone name is an untyped parameter.
    Lambda,
    /// `function void(int, float)`: names are optional.
    TypeOnly,
}

parser_impl! {
    pub(super) fn parse_parameter_list(&mut self) {
        self.parse_parameters(SyntaxKind::ParameterList, ')', ParameterStyle::Named);
    }

    pub(super) fn parse_lambda_parameter_list(&mut self) {
        self.parse_parameters(SyntaxKind::ParameterList, ')', ParameterStyle::Lambda);
    }

    pub(super) fn parse_function_type_parameters(&mut self) {
        self.parse_parameters(SyntaxKind::ParameterList, ')', ParameterStyle::TypeOnly);
    }

    /// `[int index, int count]` of an indexer.
    pub(super) fn parse_bracketed_parameter_list(&mut self) {
        self.parse_parameters(SyntaxKind::BracketedParameterList, ']', ParameterStyle::Named);
    }

    fn parse_parameters(&mut self, kind: SyntaxKind, close: char, style: ParameterStyle) {
        self.node(kind, |p| {
            let open = if close == ']' { '[' } else { '(' };
            if !p.expect_punctuation(open) {
                return;
            }
            while !p.check_punctuation(close) && !p.at_end() {
                let before = p.stream.consumed();
                p.parse_parameter(style, close);
                if p.consume_punctuation(',') {
                    continue;
                }
                if p.check_punctuation(close) {
                    break;
                }
                if p.at_parameter_list_exit() {
                    break;
                }
                if p.stream.consumed() == before {
                    p.error_expected("parameter");
                } else {
                    p.error_expected(&format!("',' or '{close}'"));
                }
                p.skip_into_error(|token| token.is_punct(','));
                p.consume_punctuation(',');
            }
            p.expect_punctuation(close);
        });
    }

    /// `[attrs] [this|ref|out|in|readonly|params] Type name [= default]`
    fn parse_parameter(&mut self, style: ParameterStyle, close: char) {
        self.node(SyntaxKind::Parameter, |p| {
            p.parse_attribute_lists();
            if style == ParameterStyle::Lambda
                && p.peek_kind() == TokenKind::Identifier
                && matches!(p.nth_kind(1), TokenKind::Punctuation(ch) if ch == ',' || ch == close)
            {
                p.labeled(Field::Name, |p| p.parse_identifier(false));
                return;
            }
            while p.at_parameter_modifier() {
                p.node(SyntaxKind::Modifier, Self::bump);
            }
            p.labeled(Field::Type, Self::parse_type);
            let named = match p.peek_kind() {
                TokenKind::Identifier => true,
                TokenKind::Keyword(keyword) => keyword.is_reserved_identifier(),
                _ => false,
            };
            if named || style != ParameterStyle::TypeOnly {
                p.labeled(Field::Name, |p| p.parse_identifier(true));
            }
            if p.check_operator("=") {
                p.bump();
                p.labeled(Field::Value, Self::parse_expression);
            }
        });
    }

    /// Tokens that end a broken parameter list; the closer is reported missing.
    fn at_parameter_list_exit(&mut self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Punctuation('{' | '}' | ')' | ']' | ';') | TokenKind::Operator("=>")
        ) || self.peek_kind().is_branch_directive()
    }

    /// A modifier keyword that is followed by the parameter's type.
    fn at_parameter_modifier(&mut self) -> bool {
        let modifier = matches!(
            self.peek_kind(),
            TokenKind::Keyword(
                Keyword::This
                    | Keyword::Ref
                    | Keyword::Out
                    | Keyword::In
                    | Keyword::Readonly
                    | Keyword::Params
            )
        );
        modifier && self.scan_type(1, TypeContext::Plain).is_some()
    }
}
