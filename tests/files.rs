use beef_syntax::diagnostics::{ErrorFormat, FileCache, FormatOptions, format_diagnostics};
use beef_syntax::{Error, ErrorKind, ParseOptions, parse_file};
use tempfile::tempdir;

mod common;
use common::write_source;

#[test]
fn parses_a_file_from_disk() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("Program.bf");
    let source = "namespace App;\n\nclass Program\n{\n    public static void Main() { }\n}\n";
    write_source(&path, source);

    let result = parse_file(&path, &ParseOptions::new()).expect("parse file");
    assert_eq!(result.source, source);
    assert_eq!(result.tree.text(), source);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("absent.bf");
    match parse_file(&path, &ParseOptions::new()) {
        Err(Error::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an io error, found {other:?}"),
    }
}

#[test]
fn diagnostics_render_against_the_file_cache() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("Broken.bf");
    let source = "class A\n{\n    int x = ;\n}\n#endif\n";
    write_source(&path, source);

    let mut files = FileCache::default();
    let file_id = files.add_file(&path, source);
    let options = ParseOptions::new().with_file_id(file_id);
    let result = parse_file(&path, &options).expect("parse file");
    assert_eq!(result.file_id, file_id);

    let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![Some(ErrorKind::Syntax), Some(ErrorKind::PreprocessorStructure)]
    );

    let short = format_diagnostics(
        &result.diagnostics,
        &files,
        FormatOptions {
            format: ErrorFormat::Short,
        },
    );
    let lines: Vec<_> = short.lines().collect();
    assert_eq!(lines.len(), 2, "{short}");
    assert!(lines[0].contains("Broken.bf:3:13: error[SYN"), "{short}");
    assert!(lines[1].contains("Broken.bf:5:1: error[PPD"), "{short}");

    let json = format_diagnostics(
        &result.diagnostics[..1],
        &files,
        FormatOptions {
            format: ErrorFormat::Json,
        },
    );
    let value: serde_json::Value = serde_json::from_str(&json).expect("json diagnostic");
    assert_eq!(value["kind"], "syntax");
    assert_eq!(value["severity"], "error");
}
