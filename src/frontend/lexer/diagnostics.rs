use super::state::Lexer;
use crate::diagnostics::{Diagnostic, Label, Span};
use crate::frontend::literals::decode_escape;

impl<'a> Lexer<'a> {
    pub(super) fn error(&mut self, message: impl Into<String>, span: Span) {
        self.diagnostics
            .push(Diagnostic::error(message, Some(span.with_file(self.file_id))));
    }

    /// Unterminated construct: the primary label sits on the opening delimiter.
    pub(super) fn unterminated(&mut self, what: &str, opening: Span) {
        let here = self.span(self.pos, self.pos);
        let diagnostic = Diagnostic::error(
            format!("unterminated {what}"),
            Some(opening.with_file(self.file_id)),
        )
        .with_primary_label(format!("{what} starts here"))
        .with_secondary(Label::secondary(here, "input ends here"));
        self.diagnostics.push(diagnostic);
    }

    /// Consume the escape at the cursor, reporting it when malformed.
    pub(super) fn eat_escape(&mut self) {
        let start = self.pos;
        match decode_escape(self.source, start) {
            Ok((_, len)) => self.pos += len,
            Err(error) => {
                let len = error.length.max(1).min(self.source.len() - start);
                let len = self.source[start..]
                    .char_indices()
                    .map(|(idx, ch)| idx + ch.len_utf8())
                    .find(|end| *end >= len)
                    .unwrap_or(len);
                self.pos += len;
                let span = self.span(start, self.pos);
                self.error(error.message(), span);
            }
        }
    }
}
