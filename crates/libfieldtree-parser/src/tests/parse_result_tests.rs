//! Tests for `ParseResult`.

use crate::GraphQLParseError;
use crate::ast;
use crate::tests::utils::parse_executable;

#[test]
fn ok_result() {
    let result = parse_executable("{ a }");
    assert!(result.is_ok());
    assert!(!result.has_errors());
    assert!(result.valid_ast().is_some());
    assert_eq!(result.format_errors(None), "");
}

/// A recovered AST is available through `ast()` but not `valid_ast()`.
#[test]
fn recovered_result() {
    let result = parse_executable("{ a(x 1) } { b }");
    assert!(!result.is_ok());
    assert!(result.valid_ast().is_none());
    assert_eq!(result.ast().unwrap().definitions.len(), 2);
    assert!(result.into_ast().is_some());
}

#[test]
fn format_errors_joins_all_errors() {
    let source = "{ a(x 1) } query { }";
    let result = parse_executable(source);
    let rendered = result.format_errors(Some(source));
    assert_eq!(rendered.matches("error: ").count(), 2);
}

#[test]
fn converts_into_std_result() {
    let ok: Result<ast::Document, Vec<GraphQLParseError>> = parse_executable("{ a }").into();
    assert_eq!(ok.unwrap().definitions.len(), 1);

    let err: Result<ast::Document, Vec<GraphQLParseError>> = parse_executable("{ }").into();
    assert_eq!(err.unwrap_err().len(), 1);
}
