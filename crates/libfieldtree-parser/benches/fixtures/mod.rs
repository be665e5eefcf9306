use std::fmt::Write;

pub const SIMPLE_QUERY: &str = "{ user(id: 3) { id name } }";

pub const PRODUCTS_SEARCH_QUERY: &str = include_str!("products_search.graphql");

/// Generates a query with `depth` nested selection sets, each selecting an
/// `id` and the next level.
pub fn deeply_nested_query(depth: usize) -> String {
    let mut out = String::with_capacity(depth * 24);
    out.push_str("query DeeplyNested {\n");
    for level in 0..depth {
        let indent = "  ".repeat(level + 1);
        writeln!(out, "{indent}child {{").unwrap();
        writeln!(out, "{indent}  id").unwrap();
    }
    writeln!(out, "{}name", "  ".repeat(depth + 1)).unwrap();
    for level in (0..depth).rev() {
        writeln!(out, "{}}}", "  ".repeat(level + 1)).unwrap();
    }
    out.push_str("}\n");
    out
}

/// Generates a query whose root spreads a chain of `count` fragments, each
/// selecting one field and spreading the next.
pub fn fragment_chain_query(count: usize) -> String {
    let mut out = String::from("{ ...Frag0 }\n");
    for i in 0..count {
        if i + 1 < count {
            writeln!(out, "fragment Frag{i} on T {{ field{i} ...Frag{} }}", i + 1).unwrap();
        } else {
            writeln!(out, "fragment Frag{i} on T {{ field{i} }}").unwrap();
        }
    }
    out
}
