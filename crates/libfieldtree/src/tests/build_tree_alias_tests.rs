//! Tree building with aliases recorded as field names.

use crate::AliasPolicy;
use crate::SelectionTreeBuilder;
use crate::Variables;
use crate::build_tree;
use crate::build_tree_using_aliases;
use crate::tests::fixtures;
use crate::tests::utils::no_variables;
use crate::tests::utils::tree;

#[test]
fn alias_gets_its_own_path() {
    let built = build_tree_using_aliases(
        "{ search { filters } best: search { connection } }",
        &no_variables(),
    )
    .unwrap();
    assert_eq!(
        built,
        tree(&[
            ("", &["search", "best"]),
            ("search", &["filters"]),
            ("best", &["connection"]),
        ]),
    );
}

/// Whitespace around the alias colon is optional.
#[test]
fn several_aliases_of_one_field() {
    let built = build_tree_using_aliases(
        "{ search { filters } best: search { connection } worst:search { term } }",
        &no_variables(),
    )
    .unwrap();
    assert_eq!(
        built,
        tree(&[
            ("", &["search", "best", "worst"]),
            ("best", &["connection"]),
            ("search", &["filters"]),
            ("worst", &["term"]),
        ]),
    );
}

#[test]
fn aliased_leaf_and_aliased_parent() {
    let built = build_tree_using_aliases(
        r#"
        {
          user(id: 3) {
            id
            custom_name: name
            birthday
          }

          custom_user: user(id: 4) {
            id
            name
            age
          }
        }
        "#,
        &no_variables(),
    )
    .unwrap();
    assert_eq!(
        built,
        tree(&[
            ("", &["user", "custom_user"]),
            ("user", &["id", "custom_name", "birthday"]),
            ("custom_user", &["id", "name", "age"]),
        ]),
    );
}

#[test]
fn aliases_with_variable_arguments_and_trailing_commas() {
    let built = build_tree_using_aliases(fixtures::ALIASED_SEARCHES, &no_variables()).unwrap();
    assert_eq!(
        built,
        tree(&[
            ("", &["product", "search", "other_a", "other_b"]),
            ("other_a", &["products"]),
            ("other_a.products", &["total"]),
            ("other_b", &["products"]),
            ("other_b.products", &["total"]),
            ("product", &["id"]),
            ("search", &["term"]),
        ]),
    );
}

/// Siblings sharing an alias merge just like siblings sharing a name.
#[test]
fn same_alias_merges() {
    let built = build_tree_using_aliases(
        "{ best: search { a } best: search { b } }",
        &no_variables(),
    )
    .unwrap();
    assert_eq!(built.children("best").unwrap(), ["a", "b"]);
}

#[test]
fn alias_inside_fragment() {
    let built = build_tree_using_aliases(
        "{ node { ...F } } fragment F on Node { custom_title: title }",
        &no_variables(),
    )
    .unwrap();
    assert_eq!(built.children("node").unwrap(), ["custom_title"]);
}

/// An excluded field is recorded under its suffixed declared name even when
/// aliases are in use.
#[test]
fn excluded_aliased_field_suffixes_declared_name() {
    let document = "{ best: search @include(if: false) { connection } }";
    let expected = tree(&[
        ("", &["search_FALSE"]),
        ("search_FALSE", &["connection"]),
    ]);

    assert_eq!(build_tree_using_aliases(document, &no_variables()).unwrap(), expected);
    assert_eq!(build_tree(document, &no_variables()).unwrap(), expected);
}

/// Only excluded fields fall back to the declared name; included aliased
/// siblings keep their aliases.
#[test]
fn excluded_and_included_aliases_side_by_side() {
    let built = build_tree_using_aliases(
        "{ best: search @skip(if: true) { a } worst: search { b } }",
        &no_variables(),
    )
    .unwrap();
    assert_eq!(
        built,
        tree(&[
            ("", &["search_FALSE", "worst"]),
            ("search_FALSE", &["a"]),
            ("worst", &["b"]),
        ]),
    );
}

#[test]
fn builder_reports_its_policy() {
    let builder = SelectionTreeBuilder::new(AliasPolicy::UseAliases);
    assert_eq!(builder.policy(), AliasPolicy::UseAliases);
    assert_eq!(SelectionTreeBuilder::default().policy(), AliasPolicy::IgnoreAliases);
}

#[test]
fn builder_matches_free_functions() {
    let variables: Variables = [("include_aggregations", false)].into_iter().collect();
    let document = fixtures::aggregations_query(" @include(if: $include_aggregations)");

    for (policy, expected) in [
        (AliasPolicy::IgnoreAliases, build_tree(&document, &variables)),
        (AliasPolicy::UseAliases, build_tree_using_aliases(&document, &variables)),
    ] {
        let built = SelectionTreeBuilder::new(policy).build(&document, &variables);
        assert_eq!(built.unwrap(), expected.unwrap());
    }
}
