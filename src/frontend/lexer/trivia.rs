use super::modes::Frame;
use super::state::Lexer;
use super::{Token, TokenKind, Trivia, TriviaKind};

/// Directives that never affect tree structure; the whole line is trivia.
const TRIVIA_DIRECTIVES: &[&str] = &[
    "region",
    "endregion",
    "pragma",
    "line",
    "nullable",
    "error",
    "warning",
    "define",
    "undef",
];

const BRANCH_DIRECTIVES: &[(&str, TokenKind)] = &[
    ("if", TokenKind::DirectiveIf),
    ("elif", TokenKind::DirectiveElif),
    ("else", TokenKind::DirectiveElse),
    ("endif", TokenKind::DirectiveEndif),
];

pub(super) fn is_trivia_space(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{FEFF}'
}

impl<'a> Lexer<'a> {
    pub(super) fn scan_trivia(&mut self) -> Vec<Trivia> {
        let mut trivia = Vec::new();
        let in_directive = self.state.in_directive_line();
        loop {
            let start = self.pos;
            let Some(ch) = self.peek() else {
                break;
            };
            let kind = if is_trivia_space(ch) && !(in_directive && matches!(ch, '\n' | '\r')) {
                while self.peek().is_some_and(|c| {
                    is_trivia_space(c) && !(in_directive && matches!(c, '\n' | '\r'))
                }) {
                    self.bump();
                }
                TriviaKind::Whitespace
            } else if self.rest().starts_with("//") {
                let doc = self.rest().starts_with("///") && !self.rest().starts_with("////");
                self.eat_to_line_end();
                if doc {
                    TriviaKind::DocComment
                } else {
                    TriviaKind::LineComment
                }
            } else if self.rest().starts_with("/*") {
                self.eat_block_comment();
                TriviaKind::BlockComment
            } else if start == 0 && self.rest().starts_with("#!") {
                self.eat_to_line_end();
                TriviaKind::Shebang
            } else if ch == '#' && self.state.is_top_level() && self.at_line_start(start) {
                match self.directive_word() {
                    Some(word) if BRANCH_DIRECTIVES.iter().any(|(name, _)| *name == word) => break,
                    word => {
                        if !word.is_some_and(|word| TRIVIA_DIRECTIVES.contains(&word)) {
                            let end = start + 1 + word.map_or(0, str::len);
                            self.error(
                                format!(
                                    "unknown preprocessor directive `#{}`",
                                    word.unwrap_or_default()
                                ),
                                self.span(start, end),
                            );
                        }
                        self.eat_to_line_end();
                        TriviaKind::Directive
                    }
                }
            } else {
                break;
            };
            trivia.push(Trivia {
                kind,
                text: self.source[start..self.pos].to_string(),
                span: self.span(start, self.pos),
            });
        }
        trivia
    }

    /// `#if`, `#elif`, `#else` or `#endif` at the start of a line.
    pub(super) fn scan_branch_directive(&mut self) -> Option<Token> {
        let start = self.pos;
        if !self.state.is_top_level() || !self.at_line_start(start) {
            return None;
        }
        let word = self.directive_word()?;
        let kind = BRANCH_DIRECTIVES
            .iter()
            .find_map(|(name, kind)| (*name == word).then_some(*kind))?;
        let word_end = self.rest().find(word).map_or(self.pos, |idx| self.pos + idx + word.len());
        self.pos = word_end;
        if matches!(kind, TokenKind::DirectiveIf | TokenKind::DirectiveElif) {
            self.state.push(Frame::Directive);
        }
        Some(self.make(kind, start))
    }

    /// Word after `#` and optional horizontal whitespace.
    fn directive_word(&self) -> Option<&'a str> {
        let after_hash = self.rest().get(1..)?;
        let trimmed = after_hash.trim_start_matches([' ', '\t']);
        let len = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        (len > 0).then(|| &trimmed[..len])
    }

    fn at_line_start(&self, offset: usize) -> bool {
        self.source[..offset]
            .chars()
            .rev()
            .take_while(|c| *c != '\n')
            .all(|c| matches!(c, ' ' | '\t' | '\u{FEFF}'))
    }

    fn eat_to_line_end(&mut self) {
        while self.peek().is_some_and(|c| !matches!(c, '\n' | '\r')) {
            self.bump();
        }
    }

    fn eat_block_comment(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let mut depth = 1usize;
        while depth > 0 {
            let rest = self.rest();
            if rest.starts_with("/*") {
                depth += 1;
                self.pos += 2;
            } else if rest.starts_with("*/") {
                depth -= 1;
                self.pos += 2;
            } else if self.bump().is_none() {
                self.error("unterminated block comment", self.span(start, start + 2));
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{TokenKind, TriviaKind, lex};

    fn trivia_kinds(source: &str) -> Vec<TriviaKind> {
        lex(source)
            .tokens
            .iter()
            .flat_map(|token| token.leading.iter().map(|trivia| trivia.kind))
            .collect()
    }

    #[test]
    fn doc_comments_and_nested_block_comments() {
        let kinds = trivia_kinds("/// docs\n/* outer /* inner */ still */x");
        assert_eq!(
            kinds,
            vec![
                TriviaKind::DocComment,
                TriviaKind::Whitespace,
                TriviaKind::BlockComment,
            ]
        );
    }

    #[test]
    fn shebang_only_at_offset_zero() {
        let output = lex("#!/usr/bin/env beef\nclass C {}");
        assert_eq!(output.tokens[0].leading[0].kind, TriviaKind::Shebang);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn region_and_pragma_lines_are_trivia() {
        let output = lex("#region Types\n  #pragma warning disable 168\nclass C {}\n#endregion\n");
        assert!(output.diagnostics.is_empty());
        let directives = output
            .tokens
            .iter()
            .flat_map(|token| &token.leading)
            .filter(|trivia| trivia.kind == TriviaKind::Directive)
            .count();
        assert_eq!(directives, 3);
        assert_eq!(output.text(), "#region Types\n  #pragma warning disable 168\nclass C {}\n#endregion\n");
    }

    #[test]
    fn branch_directive_line_ends_with_directive_end() {
        let kinds: Vec<TokenKind> = lex("#if DEBUG && !TEST\nx\n#endif")
            .tokens
            .into_iter()
            .map(|token| token.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::DirectiveIf,
                TokenKind::Identifier,
                TokenKind::Operator("&&"),
                TokenKind::Operator("!"),
                TokenKind::Identifier,
                TokenKind::DirectiveEnd,
                TokenKind::Identifier,
                TokenKind::DirectiveEndif,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn hash_inside_a_line_is_not_a_directive() {
        let output = lex("x #if");
        assert_eq!(output.tokens[1].kind, TokenKind::Unknown);
        assert_eq!(output.tokens[2].kind, TokenKind::Keyword(super::super::Keyword::If));
    }

    #[test]
    fn unknown_directive_is_reported_but_kept_as_trivia() {
        let output = lex("#frobnicate now\nx");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.tokens[0].leading[0].kind, TriviaKind::Directive);
        assert_eq!(output.text(), "#frobnicate now\nx");
    }

    #[test]
    fn unterminated_block_comment_reaches_end_of_input() {
        let output = lex("x /* open");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.text(), "x /* open");
    }
}
