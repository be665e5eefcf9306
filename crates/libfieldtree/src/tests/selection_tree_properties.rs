//! Property tests over generated documents without directives.

use crate::SelectionTree;
use crate::build_tree;
use crate::build_tree_using_aliases;
use crate::tests::utils::no_variables;
use proptest::prelude::*;

#[derive(Clone, Debug)]
struct GeneratedField {
    name: String,
    children: Vec<GeneratedField>,
}

fn field_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["id", "name", "node", "edges", "search", "user"])
        .prop_map(String::from)
}

fn field() -> impl Strategy<Value = GeneratedField> {
    let leaf = field_name().prop_map(|name| GeneratedField {
        name,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 48, 4, |inner| {
        (field_name(), prop::collection::vec(inner, 1..4))
            .prop_map(|(name, children)| GeneratedField { name, children })
    })
}

fn root_fields() -> impl Strategy<Value = Vec<GeneratedField>> {
    prop::collection::vec(field(), 1..5)
}

/// Renders `fields` as selection-set contents. With `alias_prefix` set,
/// every field gets an alias built from the prefix and its position.
fn render(fields: &[GeneratedField], alias_prefix: Option<&str>) -> String {
    let mut out = String::new();
    for (idx, field) in fields.iter().enumerate() {
        if let Some(prefix) = alias_prefix {
            out.push_str(&format!("{prefix}{idx}: "));
        }
        out.push_str(&field.name);
        if !field.children.is_empty() {
            out.push_str(" { ");
            out.push_str(&render(&field.children, alias_prefix));
            out.push('}');
        }
        out.push(' ');
    }
    out
}

fn assert_children_distinct(tree: &SelectionTree) {
    for (path, children) in tree.iter() {
        for (idx, child) in children.iter().enumerate() {
            assert!(
                !children[idx + 1..].contains(child),
                "`{child}` repeated under `{path}`",
            );
        }
    }
}

proptest! {
    #[test]
    fn building_is_pure(fields in root_fields()) {
        let document = format!("{{ {} }}", render(&fields, None));
        let first = build_tree(&document, &no_variables()).unwrap();
        let second = build_tree(&document, &no_variables()).unwrap();
        prop_assert_eq!(first.into_inner().into_iter().collect::<Vec<_>>(),
                        second.into_inner().into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn policies_agree_without_aliases(fields in root_fields()) {
        let document = format!("{{ {} }}", render(&fields, None));
        prop_assert_eq!(
            build_tree(&document, &no_variables()).unwrap(),
            build_tree_using_aliases(&document, &no_variables()).unwrap(),
        );
    }

    #[test]
    fn ignored_aliases_change_nothing(fields in root_fields()) {
        let plain = format!("{{ {} }}", render(&fields, None));
        let aliased = format!("{{ {} }}", render(&fields, Some("alias_")));
        prop_assert_eq!(
            build_tree(&plain, &no_variables()).unwrap(),
            build_tree(&aliased, &no_variables()).unwrap(),
        );
    }

    #[test]
    fn children_are_distinct_and_paths_are_reachable(fields in root_fields()) {
        let document = format!("{{ {} }}", render(&fields, None));
        let tree = build_tree(&document, &no_variables()).unwrap();
        assert_children_distinct(&tree);

        for path in tree.paths().filter(|path| !path.is_empty()) {
            let (parent, last) = path.rsplit_once('.').unwrap_or(("", path));
            let siblings = tree.children(parent).unwrap();
            prop_assert!(siblings.iter().any(|name| name == last));
        }
    }

    #[test]
    fn wrapping_in_a_fragment_changes_nothing(fields in root_fields()) {
        let selections = render(&fields, None);
        let direct = format!("{{ {selections} }}");
        let via_fragment = format!("{{ ...Wrapped }} fragment Wrapped on Query {{ {selections} }}");
        prop_assert_eq!(
            build_tree(&direct, &no_variables()).unwrap(),
            build_tree(&via_fragment, &no_variables()).unwrap(),
        );
    }
}
