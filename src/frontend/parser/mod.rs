//! Recursive-descent parser producing a lossless concrete syntax tree.
//!
//! The parser pulls tokens on demand from [`stream::TokenStream`], emits
//! nodes through a [`TreeBuilder`] and never backtracks: every ambiguous
//! prefix is settled by a named lookahead predicate before any node is
//! opened. Syntax errors become `ERROR` nodes, zero-width missing tokens and
//! diagnostics; the tree always covers the whole input.

use std::time::Instant;

use crate::config::ParseOptions;
use crate::diagnostics::{Diagnostic, DiagnosticSink, ErrorKind, FileId, Span, Suggestion};
use crate::error::{Error, Result};
use crate::frontend::conditional::{
    BranchKind, ContentKind, PreprocessorFrame, PreprocessorStack,
};
use crate::frontend::lexer::{Keyword, Lexer, ScannerState, Token, TokenFlags, TokenKind};
use crate::syntax::precedence::{
    Associativity, Precedence, allowed_in_constant_pattern, binary_precedence,
    is_assignment_operator, is_prefix_operator, is_relational_pattern_operator,
};
use crate::syntax::{Checkpoint, Child, Field, SyntaxKind, SyntaxNode, TreeBuilder};

// Helper macro for parser submodules: wrap new methods in `parser_impl! { ... }`
// instead of spelling out `impl<'a> Parser<'a>` everywhere.
macro_rules! parser_impl {
    ($($items:tt)*) => {
        impl<'a> Parser<'a> {
            $($items)*
        }
    };
}

mod attributes;
mod core;
mod declarations;
mod expressions;
mod generics;
pub(crate) mod incremental;
mod items;
mod members;
mod parameters;
mod patterns;
mod preprocessor;
mod statements;
pub(crate) mod stream;
mod telemetry;
mod types;

#[cfg(test)]
mod tests;

pub use telemetry::{RecoveryTelemetryData, RecoveryTelemetryEvent, RecoveryTelemetryKind};

use self::core::{starts_member, starts_statement_or_declaration};
use expressions::{ExprMode, ParenShape};
use patterns::PatternContext;
use stream::{ScanPoint, TokenStream};
use types::{MAX_LOOKAHEAD, TypeContext};

/// Recursion limit for nested expressions, statements and types.
const MAX_NESTING: usize = 160;

/// Resumable position in front of a top-level item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCheckpoint {
    /// Start of the item's leading trivia.
    pub offset: usize,
    /// Index of the item among the compilation unit's children.
    pub child_index: usize,
    pub state: ScannerState,
    pub(crate) reported: DiagnosticMark,
}

/// How many diagnostics of each source had been reported at a checkpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DiagnosticMark {
    pub lexical: usize,
    pub syntax: usize,
    pub preprocessor: usize,
    pub last_error_offset: Option<usize>,
}

/// Diagnostics per source in the order they were reported.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReportedDiagnostics {
    pub lexical: Vec<Diagnostic>,
    pub syntax: Vec<Diagnostic>,
    pub preprocessor: Vec<Diagnostic>,
}

impl ReportedDiagnostics {
    /// The diagnostics that were already reported when `mark` was taken.
    pub fn prefix(&self, mark: &DiagnosticMark) -> Self {
        Self {
            lexical: self.lexical.iter().take(mark.lexical).cloned().collect(),
            syntax: self.syntax.iter().take(mark.syntax).cloned().collect(),
            preprocessor: self.preprocessor.iter().take(mark.preprocessor).cloned().collect(),
        }
    }

    /// All diagnostics ordered by source offset.
    pub fn sorted(&self) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self
            .lexical
            .iter()
            .chain(&self.syntax)
            .chain(&self.preprocessor)
            .cloned()
            .collect();
        diagnostics.sort_by_key(|diagnostic| diagnostic.offset().unwrap_or(usize::MAX));
        diagnostics
    }
}

/// Everything a finished parse hands back to the public API.
#[derive(Debug)]
pub(crate) struct ParseOutput {
    pub tree: SyntaxNode,
    pub reported: ReportedDiagnostics,
    pub checkpoints: Vec<ParseCheckpoint>,
    pub telemetry: Option<RecoveryTelemetryData>,
}

/// Where a resumed parse picks up: the reused root children, the scan
/// position right after them and what had been reported up to there.
pub(crate) struct Resume {
    pub prefix: Vec<Child>,
    pub checkpoints: Vec<ParseCheckpoint>,
    pub point: ScanPoint,
    pub reported: ReportedDiagnostics,
    pub last_error_offset: Option<usize>,
}

pub(crate) struct Parser<'a> {
    source: &'a str,
    file_id: FileId,
    stream: TokenStream<'a>,
    builder: TreeBuilder,
    syntax: DiagnosticSink,
    preprocessor: DiagnosticSink,
    conditionals: PreprocessorStack,
    telemetry: Option<RecoveryTelemetryData>,
    checkpoints: Vec<ParseCheckpoint>,
    /// Offset of the most recent syntax error; errors at the same offset are folded.
    last_error_offset: Option<usize>,
    /// Open `{ ... }` list scopes; a `}` outside all of them is stray.
    brace_scopes: usize,
    nesting: usize,
    nesting_exceeded: bool,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str, options: &ParseOptions) -> Self {
        let lexer = Lexer::new(source, options.file_id, options.max_scanner_depth);
        Self::with_parts(source, options, lexer, TreeBuilder::new(options.file_id), Vec::new())
    }

    /// Continues an earlier parse after `resume.prefix`.
    pub(crate) fn resume(source: &'a str, options: &ParseOptions, resume: Resume) -> Self {
        let Resume {
            prefix,
            checkpoints,
            point,
            reported,
            last_error_offset,
        } = resume;
        let lexer = Lexer::resume(
            source,
            options.file_id,
            options.max_scanner_depth,
            point.offset,
            point.state,
        );
        let builder = TreeBuilder::with_prefix(options.file_id, prefix, point.offset);
        let mut parser = Self::with_parts(source, options, lexer, builder, checkpoints);
        let ReportedDiagnostics {
            lexical,
            syntax,
            preprocessor,
        } = reported;
        parser.stream = parser.stream.with_carried(lexical);
        parser.syntax.extend(syntax);
        parser.preprocessor.extend(preprocessor);
        parser.last_error_offset = last_error_offset;
        parser
    }

    fn with_parts(
        source: &'a str,
        options: &ParseOptions,
        lexer: Lexer<'a>,
        builder: TreeBuilder,
        checkpoints: Vec<ParseCheckpoint>,
    ) -> Self {
        Self {
            source,
            file_id: options.file_id,
            stream: TokenStream::new(lexer, options.cancel.clone()),
            builder,
            syntax: DiagnosticSink::for_kind(ErrorKind::Syntax),
            preprocessor: DiagnosticSink::for_kind(ErrorKind::PreprocessorStructure),
            conditionals: PreprocessorStack::new(),
            telemetry: options.record_telemetry.then(RecoveryTelemetryData::default),
            checkpoints,
            last_error_offset: None,
            brace_scopes: 0,
            nesting: 0,
            nesting_exceeded: false,
        }
    }

    /// Parses a whole compilation unit.
    pub(crate) fn parse_compilation_unit(mut self) -> Result<ParseOutput> {
        let started = Instant::now();
        tracing::debug!(
            target: "parser",
            stage = "parse.start",
            file_id = self.file_id.0,
            bytes = self.source.len(),
            "parsing compilation unit"
        );
        self.builder
            .start_node_at(Checkpoint::START, SyntaxKind::CompilationUnit);
        self.parse_top_level_items();
        self.finish_root();
        self.finish(started)
    }

    /// Parses a single expression followed by end of input.
    pub(crate) fn parse_expression_root(mut self) -> Result<ParseOutput> {
        let started = Instant::now();
        self.builder.start_node(SyntaxKind::CompilationUnit);
        if !self.at_end() {
            self.parse_expression();
        }
        while !self.at_end() {
            self.error_here("expected end of expression");
            self.skip_into_error(|_| false);
        }
        self.finish_root();
        self.finish(started)
    }

    /// Wraps any scanner-fault remainder and the end-of-file token.
    fn finish_root(&mut self) {
        if self.peek_kind() == TokenKind::ScannerFault {
            self.builder.start_node(SyntaxKind::Error);
            self.bump();
            self.builder.finish_node();
        }
        while !matches!(self.peek_kind(), TokenKind::EndOfFile) {
            self.skip_into_error(|_| false);
        }
        self.bump();
        self.builder.finish_node();
    }

    fn finish(mut self, started: Instant) -> Result<ParseOutput> {
        if self.stream.cancelled() {
            tracing::debug!(target: "parser", stage = "parse.cancelled", "parse discarded");
            return Err(Error::Cancelled);
        }
        let reported = ReportedDiagnostics {
            lexical: self.stream.take_diagnostics(),
            syntax: self.syntax.into_vec(),
            preprocessor: self.preprocessor.into_vec(),
        };
        let tree = self.builder.finish()?;
        tracing::debug!(
            target: "parser",
            stage = "parse.complete",
            file_id = self.file_id.0,
            tokens = self.stream.pulled(),
            diagnostics = reported.lexical.len() + reported.syntax.len() + reported.preprocessor.len(),
            checkpoints = self.checkpoints.len(),
            faulted = self.stream.faulted(),
            elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            "parse finished"
        );
        Ok(ParseOutput {
            tree,
            reported,
            checkpoints: self.checkpoints,
            telemetry: self.telemetry,
        })
    }
}
