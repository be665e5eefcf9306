//! Command-line parsing.

use crate::Cli;
use crate::commands::CommandEnum;
use crate::commands::tree::OutputFormat;
use clap::Parser;
use libfieldtree::AliasPolicy;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("fieldtree").chain(args.iter().copied()))
}

#[test]
fn no_subcommand() {
    let cli = parse(&[]).unwrap();
    assert!(cli.cmd.is_none());
    assert!(!cli.verbose);
}

#[test]
fn tree_defaults() {
    let cli = parse(&["tree", "query.graphql"]).unwrap();
    let Some(CommandEnum::Tree(cmd)) = cli.cmd else {
        panic!("expected the tree command");
    };
    assert_eq!(cmd.alias_policy(), AliasPolicy::IgnoreAliases);
    assert_eq!(cmd.format(), OutputFormat::Json);
}

#[test]
fn tree_flags() {
    let cli = parse(&[
        "tree", "-", "--use-aliases", "--format", "text", "--variables", "{}", "-v",
    ])
    .unwrap();
    assert!(cli.verbose);
    let Some(CommandEnum::Tree(cmd)) = cli.cmd else {
        panic!("expected the tree command");
    };
    assert_eq!(cmd.alias_policy(), AliasPolicy::UseAliases);
    assert_eq!(cmd.format(), OutputFormat::Text);
}

#[test]
fn inline_and_file_variables_conflict() {
    let err = parse(&[
        "tree", "q.graphql", "--variables", "{}", "--variables-file", "vars.json",
    ])
    .unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn check_requires_a_path() {
    assert!(parse(&["check"]).is_err());
}

#[test]
fn check_extensions_are_comma_separated() {
    let cli = parse(&["check", "docs", "--graphql-file-exts", "graphql,.query"]).unwrap();
    let Some(CommandEnum::Check(cmd)) = cli.cmd else {
        panic!("expected the check command");
    };
    assert_eq!(cmd.graphql_file_exts(), ["graphql", ".query"]);
}
