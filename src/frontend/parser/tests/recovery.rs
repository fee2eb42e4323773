use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use super::fixtures::{count_kind, parse_err};
use crate::{Error, ErrorKind, ParseOptions, RecoveryTelemetryKind, SyntaxKind, TokenKind, parse_with_options};

fn on_big_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(f)
        .expect("spawn parser thread")
        .join()
        .expect("parser thread panicked")
}

#[test]
fn unclosed_condition_synthesizes_the_parenthesis() {
    let result = parse_err("void F() { if (x return; }");
    let missing: Vec<_> = result
        .tree
        .tokens()
        .into_iter()
        .filter(|token| token.is_missing())
        .map(|token| token.kind)
        .collect();
    assert!(missing.contains(&TokenKind::Punctuation(')')), "{missing:?}");
    assert_eq!(count_kind(&result.tree, SyntaxKind::IfStatement), 1);
}

#[test]
fn truncated_if_reports_one_syntax_error() {
    let result = parse_err("if (x");
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    assert_eq!(result.diagnostics[0].kind, Some(ErrorKind::Syntax));
    assert_eq!(count_kind(&result.tree, SyntaxKind::IfStatement), 1);
    assert_eq!(result.tree.errors().len(), 1, "{}", result.tree.to_sexp());
    assert!(result.tree.has_errors());
}

#[test]
fn missing_punctuation_suggests_the_insertion() {
    let result = parse_err("if (x");
    let suggestion = &result.diagnostics[0].suggestions[0];
    assert_eq!(suggestion.message, "insert `)`");
    assert_eq!(suggestion.replacement.as_deref(), Some(")"));
    assert_eq!(suggestion.span.map(|span| (span.start, span.end)), Some((5, 5)));
}

#[test]
fn missing_identifier_has_no_fixed_insertion() {
    let result = parse_err("class { }");
    assert!(!result.diagnostics.is_empty());
    assert!(result.diagnostics[0].suggestions.is_empty(), "{:?}", result.diagnostics[0]);
}

#[test]
fn unterminated_blocks_close_at_end_of_input() {
    let result = parse_err("class A { void F() { while (true) { ");
    assert_eq!(count_kind(&result.tree, SyntaxKind::WhileStatement), 1);
    assert!(result.tree.has_errors());
}

#[test]
fn members_after_a_broken_member_still_parse() {
    let result = parse_err("class A { int x = ; void F() { } int y; }");
    assert_eq!(count_kind(&result.tree, SyntaxKind::MethodDeclaration), 1);
    assert_eq!(count_kind(&result.tree, SyntaxKind::FieldDeclaration), 2);
}

#[test]
fn deep_nesting_is_cut_off_with_one_diagnostic() {
    let result = on_big_stack(|| {
        let depth = 400;
        let source = format!("var x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        let result = crate::parse(&source);
        (source, result)
    });
    let (source, result) = result;
    assert_eq!(result.tree.text(), source);
    let nested: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.message.contains("nested deeper"))
        .collect();
    assert_eq!(nested.len(), 1, "{:?}", result.diagnostics);
}

#[test]
fn raised_cancel_flag_discards_the_parse() {
    let flag = Arc::new(AtomicBool::new(true));
    let options = ParseOptions::new().with_cancel_flag(flag);
    let outcome = parse_with_options("class A { }", &options);
    assert!(matches!(outcome, Err(Error::Cancelled)));
}

#[test]
fn telemetry_counts_recovery_when_enabled() {
    let source = "class A { int x = ; }\nvoid F() { if (x }";
    let quiet = parse_with_options(source, &ParseOptions::new()).expect("parse");
    assert!(quiet.recovery_telemetry.is_none());

    let options = ParseOptions::new().with_telemetry(true);
    let result = parse_with_options(source, &options).expect("parse");
    let telemetry = result.recovery_telemetry.expect("telemetry recorded");
    assert!(telemetry.missing_token_insertions >= 1, "{telemetry:?}");
    assert!(
        telemetry.synchronize_invocations + telemetry.missing_token_insertions >= 2,
        "{telemetry:?}"
    );
    let last = telemetry.last_event.expect("last event");
    assert!(matches!(
        last.kind,
        RecoveryTelemetryKind::MissingToken | RecoveryTelemetryKind::Synchronize
    ));
}
