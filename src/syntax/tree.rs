//! Immutable concrete syntax tree.

use std::fmt::Write as _;

use super::kind::{Field, SyntaxKind};
use crate::diagnostics::Span;
use crate::frontend::lexer::{Token, TokenKind};

/// A node or a token inside a [`SyntaxNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Node(SyntaxNode),
    Token(Token),
}

impl Element {
    #[must_use]
    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            Element::Node(node) => Some(node),
            Element::Token(_) => None,
        }
    }

    #[must_use]
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Element::Token(token) => Some(token),
            Element::Node(_) => None,
        }
    }

    /// Span including leading trivia.
    #[must_use]
    pub fn full_span(&self) -> Span {
        match self {
            Element::Node(node) => node.span,
            Element::Token(token) => token.full_span(),
        }
    }

    pub fn write_text(&self, out: &mut String) {
        match self {
            Element::Node(node) => node.write_text(out),
            Element::Token(token) => token.write_full_text(out),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Child {
    pub field: Option<Field>,
    pub element: Element,
}

/// Lossless syntax node: concatenating the text of every token (with its
/// leading trivia) in order reproduces the covered source exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    span: Span,
    children: Vec<Child>,
}

impl SyntaxNode {
    /// Builds a node whose span covers `children`, or the empty span at
    /// `empty_at` when there are none.
    pub(crate) fn new(kind: SyntaxKind, children: Vec<Child>, empty_at: Span) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => first.element.full_span().cover(last.element.full_span()),
            _ => empty_at,
        };
        Self {
            kind,
            span,
            children,
        }
    }

    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    #[must_use]
    pub fn child_by_field(&self, field: Field) -> Option<&Element> {
        self.children_by_field(field).next()
    }

    pub fn children_by_field(&self, field: Field) -> impl Iterator<Item = &Element> {
        self.children
            .iter()
            .filter(move |child| child.field == Some(field))
            .map(|child| &child.element)
    }

    /// Child node labelled `field`, skipping labelled tokens.
    #[must_use]
    pub fn node_by_field(&self, field: Field) -> Option<&SyntaxNode> {
        self.children_by_field(field).find_map(Element::as_node)
    }

    pub fn child_nodes(&self) -> impl DoubleEndedIterator<Item = &SyntaxNode> {
        self.children
            .iter()
            .filter_map(|child| child.element.as_node())
    }

    /// First direct child node of `kind`.
    #[must_use]
    pub fn find_child(&self, kind: SyntaxKind) -> Option<&SyntaxNode> {
        self.child_nodes().find(|node| node.kind == kind)
    }

    /// This node and every node below it, in preorder.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First node of `kind` in preorder, including this node.
    #[must_use]
    pub fn find_descendant(&self, kind: SyntaxKind) -> Option<&SyntaxNode> {
        self.descendants().find(|node| node.kind == kind)
    }

    /// Every token under this node in source order.
    #[must_use]
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for child in &self.children {
            match &child.element {
                Element::Node(node) => node.collect_tokens(out),
                Element::Token(token) => out.push(token),
            }
        }
    }

    #[must_use]
    pub fn first_token(&self) -> Option<&Token> {
        self.children.iter().find_map(|child| match &child.element {
            Element::Token(token) => Some(token),
            Element::Node(node) => node.first_token(),
        })
    }

    /// Source text covered by this node, trivia included.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.span.len());
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        for child in &self.children {
            child.element.write_text(out);
        }
    }

    /// Token text without the node's own leading trivia.
    #[must_use]
    pub fn trimmed_text(&self) -> String {
        let text = self.text();
        let trivia = self
            .first_token()
            .map_or(0, |token| token.span.start - token.full_start());
        text.get(trivia..).unwrap_or_default().to_string()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<&SyntaxNode> {
        self.descendants()
            .filter(|node| node.kind.is_error())
            .collect()
    }

    /// True when an `ERROR` node or a synthesized missing token sits anywhere below.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.descendants().any(|node| {
            node.kind.is_error()
                || node.children.iter().any(|child| {
                    child
                        .element
                        .as_token()
                        .is_some_and(Token::is_missing)
                })
        })
    }

    /// S-expression dump in the usual tree-sitter shape.
    ///
    /// Nodes made only of tokens print their non-punctuation lexemes; otherwise unlabelled
    /// tokens are elided except literal runs of interpolated strings, labelled
    /// tokens print as `field: "text"` and synthesized tokens as
    /// `(MISSING "text")`.
    #[must_use]
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(self.kind.as_str());
        let leaf = !self.children.is_empty()
            && self.children.iter().all(|child| {
                child
                    .element
                    .as_token()
                    .is_some_and(|token| !token.is_missing())
            });
        if leaf {
            let lexemes: Vec<&str> = self
                .children
                .iter()
                .filter_map(|child| child.element.as_token())
                .filter(|token| {
                    !matches!(token.kind, TokenKind::EndOfFile | TokenKind::Punctuation(_))
                })
                .map(|token| token.lexeme.as_str())
                .collect();
            if !lexemes.is_empty() {
                let _ = write!(out, " {:?}", lexemes.join(" "));
            }
            out.push(')');
            return;
        }
        for child in &self.children {
            match &child.element {
                Element::Node(node) => {
                    out.push(' ');
                    if let Some(field) = child.field {
                        let _ = write!(out, "{field}: ");
                    }
                    node.write_sexp(out);
                }
                Element::Token(token) if token.is_missing() => {
                    out.push(' ');
                    if let Some(field) = child.field {
                        let _ = write!(out, "{field}: ");
                    }
                    let _ = write!(out, "(MISSING {:?})", missing_text(token.kind));
                }
                Element::Token(token) if token.kind == TokenKind::InterpolationStringContent => {
                    let _ = write!(out, " {:?}", token.lexeme);
                }
                Element::Token(token) => {
                    if let Some(field) = child.field {
                        let _ = write!(out, " {field}: {:?}", token.lexeme);
                    }
                }
            }
        }
        out.push(')');
    }
}

/// Text a synthesized token stands for.
fn missing_text(kind: TokenKind) -> String {
    match kind {
        TokenKind::Punctuation(ch) => ch.to_string(),
        TokenKind::Operator(op) => op.to_string(),
        TokenKind::Keyword(keyword) => keyword.as_str().to_string(),
        TokenKind::Identifier => "identifier".to_string(),
        TokenKind::InterpolationCloseBrace => "}".to_string(),
        TokenKind::InterpolationEndQuote | TokenKind::RawStringEnd => "\"".to_string(),
        TokenKind::DirectiveEndif => "#endif".to_string(),
        other => other.describe(),
    }
}

/// Preorder walk over a subtree; see [`SyntaxNode::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.child_nodes().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str, start: usize) -> Token {
        Token::new(kind, text, Span::new(start, start + text.len()))
    }

    fn ident(text: &str, start: usize) -> SyntaxNode {
        SyntaxNode::new(
            SyntaxKind::Identifier,
            vec![Child {
                field: None,
                element: Element::Token(token(TokenKind::Identifier, text, start)),
            }],
            Span::new(start, start),
        )
    }

    fn sample() -> SyntaxNode {
        let children = vec![
            Child {
                field: Some(Field::Left),
                element: Element::Node(ident("a", 0)),
            },
            Child {
                field: Some(Field::Operator),
                element: Element::Token(token(TokenKind::Operator("+"), "+", 1)),
            },
            Child {
                field: Some(Field::Right),
                element: Element::Node(ident("b", 2)),
            },
        ];
        SyntaxNode::new(SyntaxKind::BinaryExpression, children, Span::new(0, 0))
    }

    #[test]
    fn span_is_union_of_children() {
        let node = sample();
        assert_eq!((node.span().start, node.span().end), (0, 3));
        assert_eq!(node.text(), "a+b");
    }

    #[test]
    fn field_lookup_and_preorder() {
        let node = sample();
        let left = node.node_by_field(Field::Left).expect("left operand");
        assert_eq!(left.text(), "a");
        let kinds: Vec<_> = node.descendants().map(SyntaxNode::kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::BinaryExpression,
                SyntaxKind::Identifier,
                SyntaxKind::Identifier
            ]
        );
        assert_eq!(node.tokens().len(), 3);
    }

    #[test]
    fn sexp_prints_labels_and_missing_tokens() {
        assert_eq!(
            sample().to_sexp(),
            r#"(binary_expression left: (identifier "a") operator: "+" right: (identifier "b"))"#
        );
        let missing = SyntaxNode::new(
            SyntaxKind::ExpressionStatement,
            vec![
                Child {
                    field: None,
                    element: Element::Node(ident("x", 0)),
                },
                Child {
                    field: None,
                    element: Element::Token(Token::missing(
                        TokenKind::Punctuation(';'),
                        Span::new(1, 1),
                    )),
                },
            ],
            Span::new(0, 0),
        );
        assert_eq!(
            missing.to_sexp(),
            r#"(expression_statement (identifier "x") (MISSING ";"))"#
        );
        assert!(missing.has_errors());
        assert!(!sample().has_errors());
    }

    #[test]
    fn empty_node_sits_at_the_given_position() {
        let node = SyntaxNode::new(SyntaxKind::DeclarationList, Vec::new(), Span::new(4, 4));
        assert_eq!((node.span().start, node.span().end), (4, 4));
        assert_eq!(node.to_sexp(), "(declaration_list)");
    }
}
