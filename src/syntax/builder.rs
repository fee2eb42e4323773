//! Bottom-up construction of [`SyntaxNode`] trees.

use super::kind::{Field, SyntaxKind};
use super::tree::{Child, Element, SyntaxNode};
use crate::diagnostics::{FileId, Span};
use crate::error::{Error, Result};
use crate::frontend::lexer::Token;

/// Position in the pending child list; lets the parser wrap children it
/// has already emitted (binary operands, postfix forms) in a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Before the first child of the whole tree.
    pub const START: Checkpoint = Checkpoint(0);
}

/// Stack-based builder: `start_node`/`finish_node` bracket the children of
/// one node, tokens are appended as they are consumed.
#[derive(Debug)]
pub struct TreeBuilder {
    parents: Vec<(SyntaxKind, usize)>,
    children: Vec<Child>,
    offset: usize,
    file_id: FileId,
}

impl TreeBuilder {
    #[must_use]
    pub fn new(file_id: FileId) -> Self {
        Self {
            parents: Vec::new(),
            children: Vec::new(),
            offset: 0,
            file_id,
        }
    }

    /// Starts with already-built children, e.g. a reused prefix of a previous tree.
    #[must_use]
    pub fn with_prefix(file_id: FileId, prefix: Vec<Child>, offset: usize) -> Self {
        Self {
            parents: Vec::new(),
            children: prefix,
            offset,
            file_id,
        }
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.parents.push((kind, self.children.len()));
    }

    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.children.len())
    }

    /// Opens a node whose first child is whatever was emitted after `checkpoint`.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        let floor = self.parents.last().map_or(0, |(_, first)| *first);
        let first = checkpoint.0.clamp(floor, self.children.len());
        self.parents.push((kind, first));
    }

    pub fn finish_node(&mut self) {
        let Some((kind, first)) = self.parents.pop() else {
            return;
        };
        let children = self.children.split_off(first);
        let empty_at = Span::in_file(self.file_id, self.offset, self.offset);
        let node = SyntaxNode::new(kind, children, empty_at);
        self.children.push(Child {
            field: None,
            element: Element::Node(node),
        });
    }

    pub fn token(&mut self, token: Token) {
        self.offset = self.offset.max(token.span.end);
        self.children.push(Child {
            field: None,
            element: Element::Token(token),
        });
    }

    pub fn labeled_token(&mut self, field: Field, token: Token) {
        self.token(token);
        self.label_last(field);
    }

    /// Labels the first child emitted after `checkpoint`, if any.
    pub fn label_at(&mut self, checkpoint: Checkpoint, field: Field) {
        if let Some(child) = self.children.get_mut(checkpoint.0) {
            child.field = Some(field);
        }
    }

    /// Kind of the node emitted at `checkpoint`, if that child is a node.
    #[must_use]
    pub fn node_kind_at(&self, checkpoint: Checkpoint) -> Option<SyntaxKind> {
        self.children
            .get(checkpoint.0)
            .and_then(|child| child.element.as_node())
            .map(SyntaxNode::kind)
    }

    pub fn label_last(&mut self, field: Field) {
        if let Some(child) = self.children.last_mut() {
            child.field = Some(field);
        }
    }

    /// End offset of the last token pushed.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    /// Number of children pending at the current nesting level.
    #[must_use]
    pub fn pending_children(&self) -> usize {
        let first = self.parents.last().map_or(0, |(_, first)| *first);
        self.children.len() - first
    }

    /// Closes the outermost node and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] when nodes are still open or the builder
    /// did not produce exactly one root.
    pub fn finish(mut self) -> Result<SyntaxNode> {
        if !self.parents.is_empty() {
            return Err(Error::internal(format!(
                "{} syntax nodes left open",
                self.parents.len()
            )));
        }
        match (self.children.pop(), self.children.is_empty()) {
            (
                Some(Child {
                    element: Element::Node(root),
                    ..
                }),
                true,
            ) => Ok(root),
            _ => Err(Error::internal("tree builder did not produce a single root")),
        }
    }
}
