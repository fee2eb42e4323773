use beef_syntax::{TokenKind, lex, parse, parse_expression};

const SNIPPETS: &[&str] = &[
    "",
    "   \n\t",
    "// only a comment",
    "/* unterminated comment",
    "class A { }",
    "class A { void F() { var s = $\"x{y:N2}z\"; } }",
    "var s = \"\"\"\n  raw \"quoted\" text\n  \"\"\";",
    "var c = '\\u{1F600}';",
    "var t = $@\"a{b}\\c\";",
    "String s = \"unterminated\nclass B { }",
    "char c = '';",
    "int x = 0x1F'FF + 1.5e-3f + 10u;",
    "#if A && !B\nclass A { }\n#elif C\nclass B { }\n#else\n#endif\n",
    "#endif\n#else\n}}}}",
    "@@@ ??? ###",
    "class Ünïcode { int δ = 1; }",
    "void F() { a?.b.c!(); x >>= 2; y = (int)z >> 1; }",
];

#[test]
fn lexer_reproduces_every_input() {
    for source in SNIPPETS {
        let output = lex(source);
        assert_eq!(output.text(), *source);
        assert_eq!(
            output.tokens.last().map(|token| token.kind),
            Some(TokenKind::EndOfFile),
            "{source:?}"
        );
        for pair in output.tokens.windows(2) {
            assert!(pair[0].span.end <= pair[1].span.start, "{source:?}");
        }
    }
}

#[test]
fn parser_reproduces_every_input() {
    for source in SNIPPETS {
        let result = parse(source);
        assert_eq!(result.tree.text(), *source, "{source:?}");
        assert_eq!(result.tree.span().end, source.len(), "{source:?}");
    }
}

#[test]
fn diagnostics_are_sorted_by_offset() {
    for source in SNIPPETS {
        let result = parse(source);
        let offsets: Vec<_> = result
            .diagnostics
            .iter()
            .map(|d| d.offset().unwrap_or(usize::MAX))
            .collect();
        let mut sorted = offsets.clone();
        sorted.sort();
        assert_eq!(offsets, sorted, "{source:?}");
    }
}

#[test]
fn standalone_expressions_round_trip() {
    for source in ["a + b * c", "x is Point(var a, _) p", "scope String(\"x\")", "(a, b) => a + b"] {
        let result = parse_expression(source);
        assert!(result.diagnostics.is_empty(), "{source}: {:?}", result.diagnostics);
        assert_eq!(result.tree.text(), source);
    }
}
