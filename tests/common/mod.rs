use std::fs;
use std::path::Path;

use beef_syntax::{Diagnostic, ParseResult};

// Each integration-test crate pulls only some of these helpers.
#[allow(dead_code)]
pub fn write_source(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap_or_else(|err| panic!("write source: {err}"));
}

/// Diagnostics reduced to the parts that must match between two parses.
#[allow(dead_code)]
pub fn diagnostic_keys(diagnostics: &[Diagnostic]) -> Vec<(Option<usize>, String, String)> {
    diagnostics
        .iter()
        .map(|diagnostic| {
            let code = diagnostic
                .code
                .as_ref()
                .map(|code| code.code.clone())
                .unwrap_or_default();
            (diagnostic.offset(), diagnostic.message.clone(), code)
        })
        .collect()
}

#[allow(dead_code)]
pub fn assert_same_parse(actual: &ParseResult, expected: &ParseResult) {
    assert_eq!(actual.source, expected.source);
    assert_eq!(actual.tree.to_sexp(), expected.tree.to_sexp());
    assert!(actual.tree == expected.tree, "trees differ in spans or trivia");
    assert_eq!(
        diagnostic_keys(&actual.diagnostics),
        diagnostic_keys(&expected.diagnostics)
    );
    let offsets = |result: &ParseResult| {
        result
            .checkpoints
            .iter()
            .map(|checkpoint| checkpoint.offset)
            .collect::<Vec<_>>()
    };
    assert_eq!(offsets(actual), offsets(expected));
}

/// A unit of `classes` small classes separated by blank lines.
#[allow(dead_code)]
pub fn generated_unit(classes: usize) -> String {
    let mut out = String::from("using System;\n\nnamespace Generated;\n\n");
    for idx in 0..classes {
        out.push_str(&format!(
            "class Item{idx}\n{{\n    int mValue = {idx};\n    public int Get() => mValue * 2;\n}}\n\n"
        ));
    }
    out
}
