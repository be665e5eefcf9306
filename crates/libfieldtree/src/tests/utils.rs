use crate::SelectionTree;
use crate::Variables;
use libfieldtree_parser::GraphQLParser;
use libfieldtree_parser::ast;

/// Builds an expected tree from `(path, children)` pairs.
pub(super) fn tree(entries: &[(&str, &[&str])]) -> SelectionTree {
    entries
        .iter()
        .map(|(path, children)| (*path, children.iter().copied()))
        .collect()
}

pub(super) fn no_variables() -> Variables {
    Variables::new()
}

pub(super) fn parse(source: &str) -> ast::Document<'_> {
    let result = GraphQLParser::new(source).parse_executable_document();
    assert!(
        result.errors.is_empty(),
        "unexpected parse errors:\n{}",
        result.format_errors(Some(source)),
    );
    result.into_ast().unwrap()
}

/// The directives on the first field of the document's first operation.
pub(super) fn first_field_directives<'src>(
    document: &ast::Document<'src>,
) -> Vec<ast::DirectiveAnnotation<'src>> {
    let operation = document.operations().next().unwrap();
    match &operation.selection_set.selections[0] {
        ast::Selection::Field(field) => field.directives.clone(),
        ast::Selection::FragmentSpread(_) => panic!("expected a field"),
    }
}
