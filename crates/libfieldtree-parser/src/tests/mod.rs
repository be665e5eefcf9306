mod parse_result_tests;
mod utils;
