mod check_cmd_tests;
mod cli_tests;
mod utils;
