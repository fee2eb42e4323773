use crate::config::DEFAULT_MAX_SCANNER_DEPTH;
use crate::diagnostics::{Diagnostic, FileId};

mod diagnostics;
mod modes;
mod numeric;
mod state;
mod strings;
mod trivia;

pub use keyword::Keyword;
pub use modes::{
    Frame, InterpolationFrame, InterpolationKind, InterpolationMode, RawPhase, ScannerState,
};
pub(crate) use state::Lexer;
pub use token::{Token, TokenFlags, TokenKind, Trivia, TriviaKind};

mod keyword {
    use std::collections::HashMap;

    use once_cell::sync::Lazy;

    /// Hard keywords. Contextual words (`get`, `set`, `var`, `where`, `when`,
    /// `with`, `and`, `or`, `not`, `let`, `nameof`) are lexed as identifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Keyword {
        Abstract,
        Alignof,
        Alloctype,
        As,
        Base,
        Bool,
        Break,
        Case,
        Checked,
        Class,
        Comptype,
        Const,
        Continue,
        Decltype,
        Default,
        Defer,
        Delegate,
        Delete,
        Do,
        Double,
        Else,
        Enum,
        Explicit,
        Extern,
        False,
        Fixed,
        Float,
        For,
        Function,
        If,
        Implicit,
        In,
        Int,
        Int8,
        Int16,
        Int32,
        Int64,
        Interface,
        Internal,
        Is,
        Mixin,
        Namespace,
        New,
        Null,
        Nullable,
        Offsetof,
        Operator,
        Out,
        Override,
        Params,
        Private,
        Protected,
        Public,
        Readonly,
        Ref,
        Repeat,
        Rettype,
        Return,
        Scope,
        Sealed,
        Sizeof,
        Static,
        Strideof,
        Struct,
        Switch,
        This,
        True,
        Typeof,
        Uint,
        Uint8,
        Uint16,
        Uint32,
        Uint64,
        Unchecked,
        Using,
        Virtual,
        Void,
        Volatile,
        While,
    }

    impl Keyword {
        #[must_use]
        pub fn from_ident(ident: &str) -> Option<Self> {
            BY_NAME.get(ident).copied()
        }

        #[must_use]
        pub fn as_str(self) -> &'static str {
            KEYWORDS
                .iter()
                .find_map(|(name, keyword)| (*keyword == self).then_some(*name))
                .unwrap_or("")
        }

        /// Declaration modifiers from the Beef grammar.
        #[must_use]
        pub fn is_modifier(self) -> bool {
            matches!(
                self,
                Keyword::Abstract
                    | Keyword::Const
                    | Keyword::Extern
                    | Keyword::Fixed
                    | Keyword::Internal
                    | Keyword::New
                    | Keyword::Override
                    | Keyword::Private
                    | Keyword::Protected
                    | Keyword::Public
                    | Keyword::Readonly
                    | Keyword::Sealed
                    | Keyword::Static
                    | Keyword::Virtual
                    | Keyword::Volatile
            )
        }

        #[must_use]
        pub fn is_predefined_type(self) -> bool {
            matches!(
                self,
                Keyword::Void
                    | Keyword::Bool
                    | Keyword::Int
                    | Keyword::Int8
                    | Keyword::Int16
                    | Keyword::Int32
                    | Keyword::Int64
                    | Keyword::Uint
                    | Keyword::Uint8
                    | Keyword::Uint16
                    | Keyword::Uint32
                    | Keyword::Uint64
                    | Keyword::Float
                    | Keyword::Double
            )
        }

        /// Operators taking a parenthesized type: `sizeof(T)` and friends.
        #[must_use]
        pub fn is_type_operator(self) -> bool {
            matches!(
                self,
                Keyword::Sizeof
                    | Keyword::Alignof
                    | Keyword::Strideof
                    | Keyword::Alloctype
                    | Keyword::Nullable
                    | Keyword::Rettype
                    | Keyword::Typeof
                    | Keyword::Comptype
                    | Keyword::Decltype
                    | Keyword::Offsetof
            )
        }

        #[must_use]
        pub fn starts_statement(self) -> bool {
            matches!(
                self,
                Keyword::If
                    | Keyword::While
                    | Keyword::Do
                    | Keyword::Repeat
                    | Keyword::For
                    | Keyword::Switch
                    | Keyword::Return
                    | Keyword::Break
                    | Keyword::Continue
                    | Keyword::Using
                    | Keyword::Defer
                    | Keyword::Delete
            )
        }

        #[must_use]
        pub fn starts_declaration(self) -> bool {
            self.is_modifier()
                || matches!(
                    self,
                    Keyword::Class
                        | Keyword::Struct
                        | Keyword::Interface
                        | Keyword::Enum
                        | Keyword::Delegate
                        | Keyword::Namespace
                        | Keyword::Mixin
                        | Keyword::Implicit
                        | Keyword::Explicit
                )
        }

        /// Keywords the grammar also accepts where an identifier is expected.
        #[must_use]
        pub fn is_reserved_identifier(self) -> bool {
            !self.is_predefined_type()
                && !matches!(
                    self,
                    Keyword::Null | Keyword::True | Keyword::False | Keyword::Default
                )
        }
    }

    static BY_NAME: Lazy<HashMap<&'static str, Keyword>> =
        Lazy::new(|| KEYWORDS.iter().copied().collect());

    const KEYWORDS: &[(&str, Keyword)] = &[
        ("abstract", Keyword::Abstract),
        ("alignof", Keyword::Alignof),
        ("alloctype", Keyword::Alloctype),
        ("as", Keyword::As),
        ("base", Keyword::Base),
        ("bool", Keyword::Bool),
        ("break", Keyword::Break),
        ("case", Keyword::Case),
        ("checked", Keyword::Checked),
        ("class", Keyword::Class),
        ("comptype", Keyword::Comptype),
        ("const", Keyword::Const),
        ("continue", Keyword::Continue),
        ("decltype", Keyword::Decltype),
        ("default", Keyword::Default),
        ("defer", Keyword::Defer),
        ("delegate", Keyword::Delegate),
        ("delete", Keyword::Delete),
        ("do", Keyword::Do),
        ("double", Keyword::Double),
        ("else", Keyword::Else),
        ("enum", Keyword::Enum),
        ("explicit", Keyword::Explicit),
        ("extern", Keyword::Extern),
        ("false", Keyword::False),
        ("fixed", Keyword::Fixed),
        ("float", Keyword::Float),
        ("for", Keyword::For),
        ("function", Keyword::Function),
        ("if", Keyword::If),
        ("implicit", Keyword::Implicit),
        ("in", Keyword::In),
        ("int", Keyword::Int),
        ("int8", Keyword::Int8),
        ("int16", Keyword::Int16),
        ("int32", Keyword::Int32),
        ("int64", Keyword::Int64),
        ("interface", Keyword::Interface),
        ("internal", Keyword::Internal),
        ("is", Keyword::Is),
        ("mixin", Keyword::Mixin),
        ("namespace", Keyword::Namespace),
        ("new", Keyword::New),
        ("null", Keyword::Null),
        ("nullable", Keyword::Nullable),
        ("offsetof", Keyword::Offsetof),
        ("operator", Keyword::Operator),
        ("out", Keyword::Out),
        ("override", Keyword::Override),
        ("params", Keyword::Params),
        ("private", Keyword::Private),
        ("protected", Keyword::Protected),
        ("public", Keyword::Public),
        ("readonly", Keyword::Readonly),
        ("ref", Keyword::Ref),
        ("repeat", Keyword::Repeat),
        ("rettype", Keyword::Rettype),
        ("return", Keyword::Return),
        ("scope", Keyword::Scope),
        ("sealed", Keyword::Sealed),
        ("sizeof", Keyword::Sizeof),
        ("static", Keyword::Static),
        ("strideof", Keyword::Strideof),
        ("struct", Keyword::Struct),
        ("switch", Keyword::Switch),
        ("this", Keyword::This),
        ("true", Keyword::True),
        ("typeof", Keyword::Typeof),
        ("uint", Keyword::Uint),
        ("uint8", Keyword::Uint8),
        ("uint16", Keyword::Uint16),
        ("uint32", Keyword::Uint32),
        ("uint64", Keyword::Uint64),
        ("unchecked", Keyword::Unchecked),
        ("using", Keyword::Using),
        ("virtual", Keyword::Virtual),
        ("void", Keyword::Void),
        ("volatile", Keyword::Volatile),
        ("while", Keyword::While),
    ];
}

mod token {
    use super::keyword::Keyword;
    use crate::diagnostics::Span;
    use std::ops::BitOr;

    /// Token categories produced by the scanner.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum TokenKind {
        Identifier,
        Keyword(Keyword),
        IntegerLiteral,
        RealLiteral,
        CharLiteral,
        StringLiteral,
        VerbatimStringLiteral,
        RawStringStart,
        RawStringContent,
        RawStringEnd,
        InterpolationStart,
        InterpolationStartQuote,
        InterpolationEndQuote,
        InterpolationOpenBrace,
        InterpolationCloseBrace,
        InterpolationStringContent,
        InterpolationFormat,
        DirectiveIf,
        DirectiveElif,
        DirectiveElse,
        DirectiveEndif,
        /// Line break closing an `#if`/`#elif` condition.
        DirectiveEnd,
        Punctuation(char),
        Operator(&'static str),
        Unknown,
        /// Rest of the input after the mode stack overflowed.
        ScannerFault,
        EndOfFile,
    }

    impl TokenKind {
        #[must_use]
        pub fn is_literal(self) -> bool {
            matches!(
                self,
                TokenKind::IntegerLiteral
                    | TokenKind::RealLiteral
                    | TokenKind::CharLiteral
                    | TokenKind::StringLiteral
                    | TokenKind::VerbatimStringLiteral
                    | TokenKind::RawStringStart
                    | TokenKind::InterpolationStart
                    | TokenKind::Keyword(Keyword::True | Keyword::False | Keyword::Null)
            )
        }

        #[must_use]
        pub fn is_branch_directive(self) -> bool {
            matches!(
                self,
                TokenKind::DirectiveIf
                    | TokenKind::DirectiveElif
                    | TokenKind::DirectiveElse
                    | TokenKind::DirectiveEndif
            )
        }

        /// Readable name used in "expected ..." diagnostics.
        #[must_use]
        pub fn describe(self) -> String {
            match self {
                TokenKind::Identifier => "identifier".into(),
                TokenKind::Keyword(keyword) => format!("`{}`", keyword.as_str()),
                TokenKind::Punctuation(ch) => format!("'{ch}'"),
                TokenKind::Operator(op) => format!("'{op}'"),
                TokenKind::DirectiveIf => "`#if`".into(),
                TokenKind::DirectiveElif => "`#elif`".into(),
                TokenKind::DirectiveElse => "`#else`".into(),
                TokenKind::DirectiveEndif => "`#endif`".into(),
                TokenKind::DirectiveEnd => "end of directive line".into(),
                TokenKind::InterpolationCloseBrace => "'}'".into(),
                TokenKind::InterpolationEndQuote
                | TokenKind::InterpolationStartQuote
                | TokenKind::RawStringEnd => "closing quote".into(),
                TokenKind::EndOfFile | TokenKind::ScannerFault => "end of input".into(),
                other => format!("{other:?}"),
            }
        }

        /// Source text of kinds that are always spelled the same way.
        #[must_use]
        pub fn fixed_text(self) -> Option<String> {
            match self {
                TokenKind::Keyword(keyword) => Some(keyword.as_str().to_string()),
                TokenKind::Punctuation(ch) => Some(ch.to_string()),
                TokenKind::Operator(op) => Some(op.to_string()),
                TokenKind::InterpolationCloseBrace => Some("}".into()),
                _ => None,
            }
        }
    }

    /// Mode-dependent token properties.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct TokenFlags(u8);

    impl TokenFlags {
        pub const NONE: Self = Self(0);
        /// Zero-width token synthesized by recovery.
        pub const MISSING: Self = Self(1);
        /// Literal whose closing delimiter never appeared.
        pub const UNTERMINATED: Self = Self(1 << 1);
        pub const RAW_CONTENT: Self = Self(1 << 2);
        pub const INTERPOLATION_BRACE: Self = Self(1 << 3);
        /// Keyword token standing in for an identifier.
        pub const CONTEXTUAL_IDENTIFIER: Self = Self(1 << 4);

        #[must_use]
        pub fn contains(self, other: Self) -> bool {
            self.0 & other.0 == other.0
        }

        pub fn insert(&mut self, other: Self) {
            self.0 |= other.0;
        }
    }

    impl BitOr for TokenFlags {
        type Output = Self;

        fn bitor(self, rhs: Self) -> Self {
            Self(self.0 | rhs.0)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum TriviaKind {
        Whitespace,
        LineComment,
        DocComment,
        BlockComment,
        Shebang,
        /// Non-branching directive line such as `#region` or `#pragma`.
        Directive,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Trivia {
        pub kind: TriviaKind,
        pub text: String,
        pub span: Span,
    }

    /// Token emitted by the scanner, owning the trivia that precedes it.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Token {
        pub kind: TokenKind,
        pub lexeme: String,
        pub span: Span,
        pub flags: TokenFlags,
        pub leading: Vec<Trivia>,
    }

    impl Token {
        #[must_use]
        pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
            Self {
                kind,
                lexeme: lexeme.into(),
                span,
                flags: TokenFlags::NONE,
                leading: Vec::new(),
            }
        }

        /// Zero-width placeholder for a token the input did not contain.
        #[must_use]
        pub fn missing(kind: TokenKind, span: Span) -> Self {
            Self {
                kind,
                lexeme: String::new(),
                span: Span { end: span.start, ..span },
                flags: TokenFlags::MISSING,
                leading: Vec::new(),
            }
        }

        #[must_use]
        pub fn is_missing(&self) -> bool {
            self.flags.contains(TokenFlags::MISSING)
        }

        /// Start of the leading trivia, or of the token when there is none.
        #[must_use]
        pub fn full_start(&self) -> usize {
            self.leading
                .first()
                .map_or(self.span.start, |trivia| trivia.span.start)
        }

        #[must_use]
        pub fn full_span(&self) -> Span {
            Span {
                start: self.full_start(),
                ..self.span
            }
        }

        #[must_use]
        pub fn is_keyword(&self, keyword: Keyword) -> bool {
            self.kind == TokenKind::Keyword(keyword)
        }

        #[must_use]
        pub fn is_punct(&self, ch: char) -> bool {
            self.kind == TokenKind::Punctuation(ch)
        }

        #[must_use]
        pub fn is_op(&self, op: &str) -> bool {
            matches!(self.kind, TokenKind::Operator(found) if found == op)
        }

        /// Identifier token carrying exactly `word` (contextual keywords).
        #[must_use]
        pub fn is_word(&self, word: &str) -> bool {
            self.kind == TokenKind::Identifier && self.lexeme == word
        }

        #[must_use]
        pub fn has_leading_trivia(&self) -> bool {
            !self.leading.is_empty()
        }

        /// Trivia followed by the token text, exactly as it appeared in the source.
        pub fn write_full_text(&self, out: &mut String) {
            for trivia in &self.leading {
                out.push_str(&trivia.text);
            }
            out.push_str(&self.lexeme);
        }
    }

    impl Default for Token {
        fn default() -> Self {
            Token::new(TokenKind::EndOfFile, "", Span::default())
        }
    }
}

/// Every token of a source string, ending with `EndOfFile`.
#[derive(Debug, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
    pub file_id: FileId,
}

impl LexOutput {
    /// Reassembles the input from token text and trivia.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            token.write_full_text(&mut out);
        }
        out
    }
}

/// Lex an entire source string.
#[must_use]
pub fn lex(source: &str) -> LexOutput {
    lex_with_file(source, FileId::UNKNOWN)
}

/// Lex an entire source string with a known file id.
#[must_use]
pub fn lex_with_file(source: &str, file_id: FileId) -> LexOutput {
    let mut lexer = Lexer::new(source, file_id, DEFAULT_MAX_SCANNER_DEPTH);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::EndOfFile;
        tokens.push(token);
        if done {
            break;
        }
    }
    LexOutput {
        tokens,
        diagnostics: lexer.take_diagnostics(),
        file_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).tokens.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn contextual_words_stay_identifiers() {
        let output = lex("get set var where when with value");
        assert!(
            output.tokens[..7]
                .iter()
                .all(|token| token.kind == TokenKind::Identifier)
        );
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn keywords_and_predefined_types() {
        assert_eq!(
            kinds("public static int32 x"),
            vec![
                TokenKind::Keyword(Keyword::Public),
                TokenKind::Keyword(Keyword::Static),
                TokenKind::Keyword(Keyword::Int32),
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
        assert!(Keyword::Int32.is_predefined_type());
        assert!(Keyword::Sealed.is_modifier());
        assert_eq!(Keyword::from_ident("strideof"), Some(Keyword::Strideof));
        assert_eq!(Keyword::Alloctype.as_str(), "alloctype");
    }

    #[test]
    fn verbatim_identifier_is_never_a_keyword() {
        let output = lex("@class");
        assert_eq!(output.tokens[0].kind, TokenKind::Identifier);
        assert_eq!(output.tokens[0].lexeme, "@class");
    }

    #[test]
    fn greater_than_is_always_single() {
        assert_eq!(
            kinds("a >> b >>= c"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator(">"),
                TokenKind::Operator(">"),
                TokenKind::Identifier,
                TokenKind::Operator(">"),
                TokenKind::Operator(">="),
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn trivia_attaches_to_following_token() {
        let output = lex("  // note\n  x /* a */ ;");
        let x = &output.tokens[0];
        assert_eq!(x.lexeme, "x");
        let trivia: Vec<TriviaKind> = x.leading.iter().map(|trivia| trivia.kind).collect();
        assert_eq!(
            trivia,
            vec![
                TriviaKind::Whitespace,
                TriviaKind::LineComment,
                TriviaKind::Whitespace,
            ]
        );
        assert_eq!(output.tokens[1].leading.len(), 3);
        assert_eq!(output.text(), "  // note\n  x /* a */ ;");
    }

    #[test]
    fn range_operators_and_member_arrow() {
        assert_eq!(
            kinds("1...5 0..<n p->x"),
            vec![
                TokenKind::IntegerLiteral,
                TokenKind::Operator("..."),
                TokenKind::IntegerLiteral,
                TokenKind::IntegerLiteral,
                TokenKind::Operator("..<"),
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Operator("->"),
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn unknown_characters_are_reported_and_kept() {
        let output = lex("a ` b");
        assert_eq!(output.tokens[1].kind, TokenKind::Unknown);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.text(), "a ` b");
    }
}
