mod build_tree_alias_tests;
mod fixtures;
mod selection_tree_properties;
mod selection_tree_tests;
mod utils;
mod variables_tests;
