use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use beef_syntax::{FileId, ParseOptions, parse, parse_units_parallel};

mod common;
use common::{assert_same_parse, generated_unit};

#[test]
fn results_keep_input_order_and_file_ids() {
    let units: Vec<String> = (1..=6).map(generated_unit).collect();
    let sources: Vec<&str> = units.iter().map(String::as_str).collect();
    let results = parse_units_parallel(&sources, &ParseOptions::new());
    assert_eq!(results.len(), sources.len());
    for (index, (result, source)) in results.into_iter().zip(&sources).enumerate() {
        let result = result.expect("parse");
        assert_eq!(result.file_id, FileId(index));
        assert_eq!(result.tree.text(), *source);
        assert!(
            result
                .tree
                .descendants()
                .all(|node| node.span().file_id == FileId(index))
        );
        let sequential = parse(source);
        assert_eq!(result.tree.to_sexp(), sequential.tree.to_sexp());
    }
}

#[test]
fn units_with_errors_do_not_affect_each_other() {
    let sources = ["class A { int x = ; }", "class B { }"];
    let results = parse_units_parallel(&sources, &ParseOptions::new());
    let broken = results[0].as_ref().expect("parse");
    let clean = results[1].as_ref().expect("parse");
    assert!(broken.has_errors());
    assert!(clean.diagnostics.is_empty());
    let fresh = parse_units_parallel(&sources[1..], &ParseOptions::new());
    let fresh = fresh[0].as_ref().expect("parse");
    assert_eq!(clean.tree.to_sexp(), fresh.tree.to_sexp());
}

#[test]
fn shared_cancel_flag_stops_every_unit() {
    let flag = Arc::new(AtomicBool::new(true));
    let options = ParseOptions::new().with_cancel_flag(flag);
    let results = parse_units_parallel(&["class A { }", "class B { }"], &options);
    assert!(results.iter().all(|result| {
        result.as_ref().err().is_some_and(beef_syntax::Error::is_cancelled)
    }));
}

#[test]
fn parallel_result_matches_a_sequential_parse_with_the_same_id() {
    let source = generated_unit(3);
    let results = parse_units_parallel(&[source.as_str()], &ParseOptions::new());
    let parallel = results.into_iter().next().expect("one result").expect("parse");
    let options = ParseOptions::new().with_file_id(FileId(0));
    let sequential = beef_syntax::parse_with_options(&source, &options).expect("parse");
    assert_same_parse(&parallel, &sequential);
}
