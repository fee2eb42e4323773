#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Lossless lexer and parser for the Beef programming language.
//!
//! [`parse`] turns one compilation unit into a concrete syntax tree whose
//! text reproduces the input byte for byte. Malformed input never fails:
//! problems surface as [`Diagnostic`]s plus `ERROR` nodes and zero-width
//! missing tokens in the tree.

use std::path::Path;
use std::time::Instant;

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod frontend;
pub mod logging;
pub mod syntax;

pub use config::ParseOptions;
pub use diagnostics::{Diagnostic, ErrorKind, FileId, Severity, Span};
pub use error::{Error, Result};
pub use frontend::lexer::{
    Keyword, LexOutput, ScannerState, Token, TokenFlags, TokenKind, Trivia, TriviaKind, lex,
    lex_with_file,
};
pub use frontend::literals::{
    DecodedString, StringLiteralKind, decode_char_literal, decode_string_literal,
    raw_string_content,
};
pub use frontend::parser::incremental::TextEdit;
pub use frontend::parser::{
    ParseCheckpoint, RecoveryTelemetryData, RecoveryTelemetryEvent, RecoveryTelemetryKind,
};
pub use syntax::{Child, Element, Field, SyntaxKind, SyntaxNode};

use frontend::parser::incremental::plan_resume;
use frontend::parser::{ParseOutput, Parser, ReportedDiagnostics};

/// Tree and diagnostics of one compilation unit.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub tree: SyntaxNode,
    /// Lexical, syntax and preprocessor diagnostics ordered by offset.
    pub diagnostics: Vec<Diagnostic>,
    /// Resumable positions in front of top-level items, used by [`reparse`].
    pub checkpoints: Vec<ParseCheckpoint>,
    pub source: String,
    pub file_id: FileId,
    pub recovery_telemetry: Option<RecoveryTelemetryData>,
    pub(crate) reported: ReportedDiagnostics,
}

impl ParseResult {
    fn from_output(output: ParseOutput, source: String, file_id: FileId) -> Self {
        Self {
            tree: output.tree,
            diagnostics: output.reported.sorted(),
            checkpoints: output.checkpoints,
            source,
            file_id,
            recovery_telemetry: output.telemetry,
            reported: output.reported,
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity.is_error())
    }
}

/// Parses `source` with default options.
///
/// Only cancellation or an internal fault can fail a parse, and the default
/// options carry no cancellation flag; an internal fault is logged and
/// yields a tree holding the whole input in one `ERROR` node.
#[must_use]
pub fn parse(source: &str) -> ParseResult {
    let options = ParseOptions::new();
    parse_with_options(source, &options).unwrap_or_else(|err| fallback(source, &options, &err))
}

/// Parses `source` as one compilation unit.
///
/// # Errors
///
/// [`Error::Cancelled`] when the cancellation flag is raised mid-parse.
pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<ParseResult> {
    let output = Parser::new(source, options).parse_compilation_unit()?;
    Ok(ParseResult::from_output(output, source.to_string(), options.file_id))
}

/// Reads and parses a source file.
///
/// # Errors
///
/// [`Error::Io`] when the file cannot be read, or any error of
/// [`parse_with_options`].
pub fn parse_file(path: impl AsRef<Path>, options: &ParseOptions) -> Result<ParseResult> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    tracing::debug!(
        target: "parser",
        stage = "parse.file",
        path = %path.display(),
        bytes = source.len(),
        "read source file"
    );
    parse_with_options(&source, options)
}

/// Parses `source` as a single expression.
#[must_use]
pub fn parse_expression(source: &str) -> ParseResult {
    let options = ParseOptions::new();
    Parser::new(source, &options)
        .parse_expression_root()
        .map(|output| ParseResult::from_output(output, source.to_string(), options.file_id))
        .unwrap_or_else(|err| fallback(source, &options, &err))
}

/// Applies `edit` to `previous.source` and parses the result, reusing the
/// unchanged top-level items in front of the edit. The result is the same
/// as a fresh parse of the edited text.
///
/// # Errors
///
/// [`Error::InvalidEdit`] for an edit outside the previous source, and any
/// error of [`parse_with_options`].
pub fn reparse(previous: &ParseResult, edit: &TextEdit, options: &ParseOptions) -> Result<ParseResult> {
    let started = Instant::now();
    let source = edit.apply(&previous.source)?;
    let resume = (previous.file_id == options.file_id)
        .then(|| {
            plan_resume(
                &previous.tree,
                &previous.checkpoints,
                &previous.reported,
                edit,
            )
        })
        .flatten();
    let reused = resume.as_ref().map_or(0, |resume| resume.prefix.len());
    let output = match resume {
        Some(resume) => Parser::resume(&source, options, resume).parse_compilation_unit()?,
        None => Parser::new(&source, options).parse_compilation_unit()?,
    };
    tracing::debug!(
        target: "parser",
        stage = "reparse.complete",
        reused,
        elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        "reparse finished"
    );
    Ok(ParseResult::from_output(output, source, options.file_id))
}

/// Parses independent compilation units on scoped threads. Results keep
/// the order of `sources`; each unit gets the file id of its position.
#[must_use]
pub fn parse_units_parallel(sources: &[&str], options: &ParseOptions) -> Vec<Result<ParseResult>> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let options = options.clone().with_file_id(FileId(index));
                scope.spawn(move || parse_with_options(source, &options))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(Error::internal("parser thread panicked")))
            })
            .collect()
    })
}

/// Whole input in one `ERROR` node, for the infallible entry points.
fn fallback(source: &str, options: &ParseOptions, err: &Error) -> ParseResult {
    tracing::error!(target: "parser", error = %err, "parse failed; returning error tree");
    let span = Span::in_file(options.file_id, 0, source.len());
    let token = Child {
        field: None,
        element: Element::Token(Token::new(TokenKind::Unknown, source, span)),
    };
    let error = Child {
        field: None,
        element: Element::Node(SyntaxNode::new(SyntaxKind::Error, vec![token], span)),
    };
    let tree = SyntaxNode::new(SyntaxKind::CompilationUnit, vec![error], span);
    let diagnostic = Diagnostic::error(err.to_string(), Some(span)).with_kind(ErrorKind::Syntax);
    let reported = ReportedDiagnostics {
        syntax: vec![diagnostic],
        ..ReportedDiagnostics::default()
    };
    ParseResult {
        tree,
        diagnostics: reported.sorted(),
        checkpoints: Vec::new(),
        source: source.to_string(),
        file_id: options.file_id,
        recovery_telemetry: None,
        reported,
    }
}
