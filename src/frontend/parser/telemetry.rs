use crate::diagnostics::Span;
use crate::frontend::lexer::{Token, TokenKind};

/// Counters describing how much error recovery a parse needed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecoveryTelemetryData {
    pub synchronize_invocations: usize,
    pub missing_token_insertions: usize,
    pub skipped_tokens: usize,
    pub last_event: Option<RecoveryTelemetryEvent>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveryTelemetryEvent {
    pub kind: RecoveryTelemetryKind,
    pub span: Option<Span>,
    pub token_kind: Option<TokenKind>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryTelemetryKind {
    /// Tokens were skipped into an `ERROR` node.
    Synchronize,
    /// A zero-width token was synthesized.
    MissingToken,
}

impl RecoveryTelemetryData {
    pub fn record(&mut self, kind: RecoveryTelemetryKind, token: Option<&Token>) {
        match kind {
            RecoveryTelemetryKind::Synchronize => {
                self.synchronize_invocations += 1;
            }
            RecoveryTelemetryKind::MissingToken => {
                self.missing_token_insertions += 1;
            }
        }

        self.last_event = Some(RecoveryTelemetryEvent {
            kind,
            span: token.map(|t| t.span),
            token_kind: token.map(|t| t.kind),
        });
    }

    pub fn record_skipped(&mut self, count: usize) {
        self.skipped_tokens += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tracks_last_event() {
        let mut data = RecoveryTelemetryData::default();
        let token = Token::new(TokenKind::Punctuation(')'), ")", Span::new(3, 4));
        data.record(RecoveryTelemetryKind::Synchronize, Some(&token));
        data.record(RecoveryTelemetryKind::MissingToken, None);
        assert_eq!(data.synchronize_invocations, 1);
        assert_eq!(data.missing_token_insertions, 1);
        let last = data.last_event.expect("event");
        assert_eq!(last.kind, RecoveryTelemetryKind::MissingToken);
        assert!(last.span.is_none());
    }
}
