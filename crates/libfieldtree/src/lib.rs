//! Flattens a GraphQL operation into a [`SelectionTree`]: a map from each
//! dot-joined field path to the distinct fields requested directly beneath
//! it.
//!
//! Fragment spreads are inlined where they appear, and a field whose
//! `@include`/`@skip` condition excludes it is kept under its declared name
//! with a `_FALSE` suffix so callers can tell it apart.
//!
//! ```
//! use libfieldtree::Variables;
//!
//! let document = r#"
//!     query ($withAggregations: Boolean!) {
//!       search {
//!         ...SearchFields
//!         aggregations @include(if: $withAggregations) { departments { slug } }
//!       }
//!     }
//!
//!     fragment SearchFields on Search { term total }
//! "#;
//! let variables: Variables = [("withAggregations", false)].into_iter().collect();
//!
//! let tree = libfieldtree::build_tree(document, &variables).unwrap();
//! assert_eq!(tree.root(), ["search"]);
//! assert_eq!(
//!     tree.children("search").unwrap(),
//!     ["term", "total", "aggregations_FALSE"],
//! );
//! assert_eq!(
//!     tree.children("search.aggregations_FALSE.departments").unwrap(),
//!     ["slug"],
//! );
//! ```

pub mod directives;
mod fragment_registry;
mod selection_tree;
mod selection_tree_builder;
mod selection_tree_error;
mod variables;

pub use fragment_registry::FragmentRegistry;
pub use fragment_registry::FragmentRegistryBuilder;
pub use libfieldtree_parser as parser;
pub use selection_tree::SelectionTree;
pub use selection_tree_builder::AliasPolicy;
pub use selection_tree_builder::EXCLUDED_FIELD_SUFFIX;
pub use selection_tree_builder::MAX_SELECTION_DEPTH;
pub use selection_tree_builder::SelectionTreeBuilder;
pub use selection_tree_builder::build_tree;
pub use selection_tree_builder::build_tree_using_aliases;
pub use selection_tree_error::SelectionTreeError;
pub use variables::VariableValue;
pub use variables::Variables;

#[cfg(test)]
mod tests;
