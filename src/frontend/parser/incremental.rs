//! Reparsing after a text edit.
//!
//! The root children in front of the edit are reused as they are and the
//! scanner restarts from the checkpoint recorded after them, with the mode
//! stack it had there. The checkpoint is chosen one item further back than
//! strictly needed: an item may peek one token past its own end (an
//! optional `;`, a trailing `else`), and that token must not be edited.
//! Items ending in error recovery are not reused either, since recovery
//! can look arbitrarily far ahead.

use super::stream::ScanPoint;
use super::{ParseCheckpoint, ReportedDiagnostics, Resume};
use crate::error::{Error, Result};
use crate::syntax::SyntaxNode;

/// Replaces `start..end` (byte offsets into the old source) with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl TextEdit {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    #[must_use]
    pub fn delete(start: usize, end: usize) -> Self {
        Self::new(start, end, String::new())
    }

    /// The edited source.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEdit`] when the range is reversed, out of bounds or
    /// splits a UTF-8 character.
    pub fn apply(&self, source: &str) -> Result<String> {
        let valid = self.start <= self.end
            && self.end <= source.len()
            && source.is_char_boundary(self.start)
            && source.is_char_boundary(self.end);
        if !valid {
            return Err(Error::InvalidEdit {
                start: self.start,
                end: self.end,
                len: source.len(),
            });
        }
        let mut edited =
            String::with_capacity(source.len() - (self.end - self.start) + self.text.len());
        edited.push_str(&source[..self.start]);
        edited.push_str(&self.text);
        edited.push_str(&source[self.end..]);
        Ok(edited)
    }
}

/// Picks the checkpoint to resume from; `None` means parse from scratch.
pub(crate) fn plan_resume(
    tree: &SyntaxNode,
    checkpoints: &[ParseCheckpoint],
    reported: &ReportedDiagnostics,
    edit: &TextEdit,
) -> Option<Resume> {
    let before_edit = checkpoints
        .iter()
        .rposition(|checkpoint| checkpoint.offset < edit.start)?;
    let mut index = before_edit.checked_sub(1)?;
    while index > 0 && !reusable_before(tree, &checkpoints[index]) {
        index -= 1;
    }
    let checkpoint = &checkpoints[index];
    if checkpoint.child_index == 0 {
        return None;
    }
    let prefix = tree.children().get(..checkpoint.child_index)?.to_vec();
    tracing::debug!(
        target: "parser",
        stage = "reparse.resume",
        offset = checkpoint.offset,
        reused = prefix.len(),
        edit_start = edit.start,
        "resuming parse after reused items"
    );
    Some(Resume {
        prefix,
        checkpoints: checkpoints[..index].to_vec(),
        point: ScanPoint {
            offset: checkpoint.offset,
            state: checkpoint.state.clone(),
            lexical: checkpoint.reported.lexical,
        },
        reported: reported.prefix(&checkpoint.reported),
        last_error_offset: checkpoint.reported.last_error_offset,
    })
}

/// Whether the item right before `checkpoint` parsed without recovery.
fn reusable_before(tree: &SyntaxNode, checkpoint: &ParseCheckpoint) -> bool {
    let Some(previous) = checkpoint
        .child_index
        .checked_sub(1)
        .and_then(|index| tree.children().get(index))
    else {
        return false;
    };
    match previous.element.as_node() {
        Some(node) => !node.has_errors(),
        None => previous
            .element
            .as_token()
            .is_some_and(|token| !token.is_missing()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn edits_are_validated_against_the_source() {
        assert_eq!(TextEdit::insert(1, "x").apply("ab").ok().as_deref(), Some("axb"));
        assert_eq!(TextEdit::delete(0, 2).apply("ab").ok().as_deref(), Some(""));
        assert!(matches!(
            TextEdit::new(2, 1, "").apply("abc"),
            Err(Error::InvalidEdit { start: 2, end: 1, len: 3 })
        ));
        assert!(TextEdit::new(0, 9, "").apply("abc").is_err());
        assert!(TextEdit::insert(1, "").apply("é").is_err());
    }

    #[test]
    fn resume_stays_one_item_behind_the_edit() {
        let source = "class A { }\nclass B { }\nclass C { }\nclass D { }\n";
        let result = parse(source);
        assert_eq!(result.checkpoints.len(), 4);
        let edit_at = source.find("class D").unwrap_or_default() + 6;
        let plan = plan_resume(
            &result.tree,
            &result.checkpoints,
            &result.reported,
            &TextEdit::insert(edit_at, "x"),
        );
        let plan = plan.expect("resumable");
        assert_eq!(plan.prefix.len(), 2);
        assert_eq!(plan.checkpoints.len(), 2);
        assert_eq!(plan.point.offset, result.checkpoints[2].offset);
    }

    #[test]
    fn edits_near_the_start_parse_from_scratch() {
        let result = parse("class A { }\nclass B { }\n");
        let plan = plan_resume(
            &result.tree,
            &result.checkpoints,
            &result.reported,
            &TextEdit::insert(source_offset_of_b(), "x"),
        );
        assert!(plan.is_none());
    }

    fn source_offset_of_b() -> usize {
        "class A { }\nclass B".len()
    }

    #[test]
    fn items_with_errors_are_not_reused() {
        let source = "class A { }\nclass B {\nint }\nclass C { }\nclass D { }\n";
        let result = parse(source);
        assert!(!result.diagnostics.is_empty());
        let edit_at = source.len() - 2;
        let plan = plan_resume(
            &result.tree,
            &result.checkpoints,
            &result.reported,
            &TextEdit::insert(edit_at, " "),
        )
        .expect("resumable");
        assert_eq!(plan.prefix.len(), 1);
    }
}
