//! Compilation-unit items: `using` directives, namespaces, type
//! declarations and global statements.

use super::members::MemberShape;
use super::*;

parser_impl! {
    /// Items up to end of input. A resumable checkpoint is recorded in
    /// front of every item that starts outside any conditional region.
    pub(super) fn parse_top_level_items(&mut self) {
        while !self.at_end() {
            if !self.conditionals.has_open() && self.builder.depth() == 1 {
                self.record_checkpoint();
            }
            let before = self.stream.consumed();
            if self.check_punctuation('}') {
                self.parse_stray_brace();
                continue;
            }
            if self.at_branch_continuation() {
                self.parse_stray_directive();
                continue;
            }
            self.parse_top_level_item();
            if self.stream.consumed() == before {
                self.recover_statement("declaration or statement");
            }
        }
    }

    fn record_checkpoint(&mut self) {
        let point = self.stream.scan_point();
        if self
            .checkpoints
            .last()
            .is_some_and(|checkpoint| checkpoint.offset >= point.offset)
        {
            return;
        }
        self.checkpoints.push(ParseCheckpoint {
            offset: point.offset,
            child_index: self.builder.pending_children(),
            state: point.state,
            reported: DiagnosticMark {
                lexical: point.lexical,
                syntax: self.syntax.len(),
                preprocessor: self.preprocessor.len(),
                last_error_offset: self.last_error_offset,
            },
        });
    }

    /// One item at file scope or inside a top-level conditional region.
    pub(super) fn parse_top_level_item(&mut self) {
        match self.peek_kind() {
            TokenKind::DirectiveIf => {
                if self.attribute_conditional_end(0).is_some()
                    && self.top_level_declaration_ahead().is_some()
                {
                    self.parse_declaration_item();
                } else {
                    self.parse_preproc_if(ContentKind::TopLevel);
                }
            }
            TokenKind::Keyword(Keyword::Using) if self.peek_punctuation_n(1, '(') => {
                self.parse_statement();
            }
            _ if self.top_level_declaration_ahead().is_some() => self.parse_declaration_item(),
            _ => self.parse_statement(),
        }
    }

    fn parse_declaration_item(&mut self) {
        let Some(shape) = self.top_level_declaration_ahead() else {
            self.parse_statement();
            return;
        };
        if !self.enter_nesting() {
            self.skip_into_error(starts_statement_or_declaration);
            return;
        }
        self.parse_member_of_shape(shape);
        self.leave_nesting();
    }

    /// Type declarations, namespaces and `using` directives. Anything else
    /// at file scope is a global statement.
    fn top_level_declaration_ahead(&mut self) -> Option<MemberShape> {
        if self.check_keyword(Keyword::Using) && self.peek_punctuation_n(1, '(') {
            return None;
        }
        self.member_shape_ahead().filter(|shape| {
            matches!(
                shape,
                MemberShape::TypeDeclaration | MemberShape::Namespace | MemberShape::UsingDirective
            )
        })
    }

    /// A `}` that closes nothing.
    pub(super) fn parse_stray_brace(&mut self) {
        self.error_here("unexpected `}`");
        self.bump_error();
    }
}
