//! Tests for the `SelectionTree` accessors and output formats.

use crate::build_tree;
use crate::tests::utils::no_variables;
use crate::tests::utils::tree;

#[test]
fn accessors() {
    let built = build_tree("{ user { id friends { name } } }", &no_variables()).unwrap();
    assert_eq!(built.len(), 3);
    assert!(!built.is_empty());
    assert!(built.contains_path("user.friends"));
    assert!(!built.contains_path("user.id"));
    assert_eq!(built.children("user.friends").unwrap(), ["name"]);
    assert!(built.children("nope").is_none());

    let entries: Vec<(&str, usize)> = built
        .iter()
        .map(|(path, children)| (path, children.len()))
        .collect();
    assert_eq!(entries, vec![("", 1), ("user", 2), ("user.friends", 1)]);
}

#[test]
fn default_tree_is_empty() {
    let empty = crate::SelectionTree::default();
    assert!(empty.is_empty());
    assert!(empty.root().is_empty());
}

/// Equality ignores entry order but not child order.
#[test]
fn equality_is_map_like() {
    let a = tree(&[("", &["x", "y"]), ("x", &["z"])]);
    let b = tree(&[("x", &["z"]), ("", &["x", "y"])]);
    let c = tree(&[("", &["y", "x"]), ("x", &["z"])]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn display_lists_one_path_per_line() {
    let built = build_tree("{ search { term products { total } } }", &no_variables()).unwrap();
    assert_eq!(
        built.to_string(),
        "<root>: search\nsearch: term, products\nsearch.products: total",
    );
}

#[test]
fn serializes_as_json_object() {
    let built = build_tree("{ search { term } }", &no_variables()).unwrap();
    assert_eq!(
        serde_json::to_string(&built).unwrap(),
        r#"{"":["search"],"search":["term"]}"#,
    );

    let parsed: crate::SelectionTree =
        serde_json::from_str(r#"{"":["search"],"search":["term"]}"#).unwrap();
    assert_eq!(parsed, built);
}

#[test]
fn into_inner_keeps_order() {
    let built = build_tree("{ b { y } a { x } }", &no_variables()).unwrap();
    let inner = built.into_inner();
    let keys: Vec<&str> = inner.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["", "b", "a"]);
}
