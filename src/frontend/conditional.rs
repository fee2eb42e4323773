//! Bookkeeping for `#if`/`#elif`/`#else`/`#endif` regions.
//!
//! Conditions are never evaluated: every branch stays in the tree. The
//! parser only tracks which directives are open so that stray or unbalanced
//! ones can be reported.

use crate::diagnostics::Span;
use crate::syntax::SyntaxKind;

/// Which directive opened the branch currently being filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    If,
    Elif,
    Else,
}

impl BranchKind {
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            BranchKind::If => "#if",
            BranchKind::Elif => "#elif",
            BranchKind::Else => "#else",
        }
    }

    #[must_use]
    pub fn node_kind(self) -> SyntaxKind {
        match self {
            BranchKind::If => SyntaxKind::PreprocIf,
            BranchKind::Elif => SyntaxKind::PreprocElif,
            BranchKind::Else => SyntaxKind::PreprocElse,
        }
    }
}

/// What a conditional region may contain at the position it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Compilation-unit items and statements.
    TopLevel,
    /// Members of a declaration list.
    Declaration,
    /// A single expression.
    Expression,
    /// A single enum member.
    EnumMember,
    /// A single attribute list.
    AttributeList,
}

impl ContentKind {
    /// Whether each branch holds at most one item.
    #[must_use]
    pub fn is_single(self) -> bool {
        matches!(
            self,
            ContentKind::Expression | ContentKind::EnumMember | ContentKind::AttributeList
        )
    }

    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            ContentKind::TopLevel => "top-level item",
            ContentKind::Declaration => "declaration",
            ContentKind::Expression => "expression",
            ContentKind::EnumMember => "enum member",
            ContentKind::AttributeList => "attribute list",
        }
    }
}

/// One open `#if` chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessorFrame {
    /// Condition text of the directive that opened the current branch.
    pub condition: String,
    pub branch: BranchKind,
    pub content: ContentKind,
    /// Span of the opening `#if`.
    pub opened_at: Span,
    /// Set once `#endif` is seen.
    pub closed: bool,
}

impl PreprocessorFrame {
    #[must_use]
    pub fn open(condition: String, content: ContentKind, opened_at: Span) -> Self {
        Self {
            condition,
            branch: BranchKind::If,
            content,
            opened_at,
            closed: false,
        }
    }

    /// Marks the chain as ended by its `#endif`.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Moves to the next branch; `#elif`/`#else` after `#else` is refused.
    ///
    /// # Errors
    ///
    /// Returns the branch that is already active when it is an `#else`.
    pub fn advance(&mut self, next: BranchKind, condition: String) -> Result<(), BranchKind> {
        if self.branch == BranchKind::Else {
            return Err(self.branch);
        }
        self.branch = next;
        self.condition = condition;
        Ok(())
    }
}

/// Stack of open conditional regions for one compilation unit.
///
/// Every bracketed scope records a base index; directives may only close
/// frames opened inside the current scope.
#[derive(Debug, Default, Clone)]
pub struct PreprocessorStack {
    frames: Vec<PreprocessorFrame>,
    base: usize,
}

impl PreprocessorStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: PreprocessorFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<PreprocessorFrame> {
        if self.frames.len() > self.base {
            self.frames.pop()
        } else {
            None
        }
    }

    #[must_use]
    pub fn top(&self) -> Option<&PreprocessorFrame> {
        self.frames[self.base..].last()
    }

    pub fn top_mut(&mut self) -> Option<&mut PreprocessorFrame> {
        self.frames[self.base..].last_mut()
    }

    /// Whether a frame is open in the current scope.
    #[must_use]
    pub fn has_open(&self) -> bool {
        self.frames.len() > self.base
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enters a bracketed scope; returns the previous base for [`Self::leave_scope`].
    pub fn enter_scope(&mut self) -> usize {
        std::mem::replace(&mut self.base, self.frames.len())
    }

    /// Leaves a scope, returning the frames it left open.
    pub fn leave_scope(&mut self, previous: usize) -> Vec<PreprocessorFrame> {
        let unclosed = self.frames.split_off(self.base);
        self.base = previous;
        unclosed
    }
}
