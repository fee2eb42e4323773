use crate::{ParseResult, SyntaxKind, SyntaxNode, parse};

/// Parses `source`, requiring a clean parse and an exact round trip.
pub(crate) fn parse_ok(source: &str) -> ParseResult {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "expected no diagnostics, found: {:?}",
        result.diagnostics
    );
    assert_eq!(result.tree.text(), source, "tree text differs from source");
    result
}

/// Parses `source`, requiring at least one diagnostic and an exact round trip.
pub(crate) fn parse_err(source: &str) -> ParseResult {
    let result = parse(source);
    assert!(!result.diagnostics.is_empty(), "expected diagnostics for {source:?}");
    assert_eq!(result.tree.text(), source, "tree text differs from source");
    result
}

pub(crate) fn count_kind(tree: &SyntaxNode, kind: SyntaxKind) -> usize {
    tree.descendants().filter(|node| node.kind() == kind).count()
}

pub(crate) fn sexp_of(tree: &SyntaxNode, kind: SyntaxKind) -> String {
    tree.find_descendant(kind)
        .map(SyntaxNode::to_sexp)
        .unwrap_or_else(|| panic!("no {kind:?} node"))
}
