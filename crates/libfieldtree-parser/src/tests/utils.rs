//! Various test utils.

use crate::ast;
use crate::token::GraphQLToken;
use crate::token::GraphQLTokenKind;
use crate::GraphQLParseError;
use crate::GraphQLParser;
use crate::GraphQLSourceSpan;
use crate::ParseResult;
use crate::SourcePosition;
use std::borrow::Cow;

/// Creates a mock token with the given kind and a zero-width span at the
/// start of the document.
pub fn mock_token(kind: GraphQLTokenKind<'static>) -> GraphQLToken<'static> {
    GraphQLToken::new(kind, GraphQLSourceSpan::empty_at(SourcePosition::new(0, 0, 0)))
}

pub fn mock_name_token(name: &str) -> GraphQLToken<'static> {
    mock_token(GraphQLTokenKind::Name(Cow::Owned(name.to_string())))
}

pub fn mock_eof_token() -> GraphQLToken<'static> {
    mock_token(GraphQLTokenKind::Eof)
}

/// A mock token source that produces tokens from a Vec.
pub struct MockTokenSource {
    tokens: std::vec::IntoIter<GraphQLToken<'static>>,
}

impl MockTokenSource {
    pub fn new(tokens: Vec<GraphQLToken<'static>>) -> Self {
        Self {
            tokens: tokens.into_iter(),
        }
    }
}

impl Iterator for MockTokenSource {
    type Item = GraphQLToken<'static>;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.next()
    }
}

pub(super) fn parse_executable(source: &str) -> ParseResult<ast::Document<'_>> {
    GraphQLParser::new(source).parse_executable_document()
}

/// Parses `source`, panicking with the rendered errors if it is invalid.
pub(super) fn parse_valid(source: &str) -> ast::Document<'_> {
    let result = parse_executable(source);
    if result.has_errors() {
        panic!("unexpected parse errors:\n{}", result.format_errors(Some(source)));
    }
    result.into_ast().unwrap()
}

/// Parses `source`, asserting that it is invalid, and returns the errors.
pub(super) fn parse_errors(source: &str) -> Vec<GraphQLParseError> {
    let result = parse_executable(source);
    assert!(result.has_errors(), "expected errors for {source:?}");
    result.errors
}

/// The only operation of `doc`.
pub(super) fn single_operation<'a, 'src>(
    doc: &'a ast::Document<'src>,
) -> &'a ast::OperationDefinition<'src> {
    let ops: Vec<_> = doc.operations().collect();
    assert_eq!(ops.len(), 1, "expected exactly one operation");
    ops[0]
}

/// The field at `index` of a selection set, panicking on a spread.
pub(super) fn field_at<'a, 'src>(
    set: &'a ast::SelectionSet<'src>,
    index: usize,
) -> &'a ast::Field<'src> {
    match &set.selections[index] {
        ast::Selection::Field(field) => field,
        other => panic!("expected field at {index}, found {other:?}"),
    }
}
