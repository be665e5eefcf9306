//! The `check` command's file discovery and per-document checks.

use crate::commands::check::DocumentSummary;
use crate::commands::check::check_document;
use crate::commands::check::collect_document_paths;
use crate::tests::utils::ScratchDir;

fn exts(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn finds_documents_by_extension() {
    let dir = ScratchDir::new("finds-documents");
    let a = dir.write("a.graphql", "{ a }");
    let b = dir.write("nested/b.gql", "{ b }");
    dir.write("notes.txt", "not graphql");

    let found = collect_document_paths(&[dir.path().to_path_buf()], &exts(&["graphql", ".gql"]));
    assert_eq!(found.file_paths, vec![a, b]);
    assert_eq!(found.num_skipped_files, 1);
    assert!(found.walk_errors.is_empty());
}

#[test]
fn single_file_is_checked_regardless_of_extension() {
    let dir = ScratchDir::new("single-file");
    let query = dir.write("query.txt", "{ a }");

    let found = collect_document_paths(&[query.clone()], &exts(&["graphql"]));
    assert_eq!(found.file_paths, vec![query]);
    assert_eq!(found.num_skipped_files, 0);
}

#[test]
fn missing_path_is_a_walk_error() {
    let dir = ScratchDir::new("missing-path");
    let found = collect_document_paths(&[dir.path().join("nope")], &exts(&["graphql"]));
    assert_eq!(found.walk_errors.len(), 1);
}

#[test]
fn valid_document_summary() {
    let summary = check_document(
        "{ user { ...U } } fragment U on User { id friends { name } }",
    )
    .unwrap();
    assert_eq!(summary, DocumentSummary { num_paths: 3, num_fragments: 1 });
}

#[test]
fn syntax_errors_are_formatted_with_source() {
    let errors = check_document("{ user(id 3) { name } }").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("--> <input>:1:11"));
    assert!(errors[0].contains("{ user(id 3) { name } }"));
}

/// Problems in fragments the operation never uses are still reported.
#[test]
fn unused_fragment_problems_are_reported() {
    let errors = check_document(
        "{ a } fragment A on T { ...B } fragment B on T { ...A ...Missing }",
    )
    .unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("A → B → A"));
    assert!(errors[1].contains("Undefined fragment 'Missing'"));
}

#[test]
fn operation_count_is_checked() {
    let errors = check_document("fragment A on T { a }").unwrap_err();
    assert_eq!(errors, vec!["error: Document contains no operation".to_string()]);
}
