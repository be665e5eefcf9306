use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use anyhow::Context;
use libfieldtree::AliasPolicy;
use libfieldtree::SelectionTree;
use libfieldtree::SelectionTreeBuilder;
use libfieldtree::Variables;
use std::path::Path;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

#[derive(Clone, Copy, Debug, Default, PartialEq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// A JSON object mapping each path to its children.
    #[default]
    Json,

    /// One `path: child, child` line per path.
    Text,
}

#[derive(Debug, clap::Args)]
pub(crate) struct TreeCmd {
    #[arg(
        help="Path to the GraphQL document to flatten, or `-` to read it from \
             stdin.",
        name="DOCUMENT",
    )]
    document: PathBuf,

    #[arg(
        conflicts_with="variables_file",
        help="Variable bindings as a JSON object, e.g. \
             '{\"include_aggregations\": false}'.",
        long,
    )]
    variables: Option<String>,

    #[arg(
        help="Path to a JSON file holding the variable bindings.",
        long,
    )]
    variables_file: Option<PathBuf>,

    #[arg(
        help="Record aliased fields under their alias instead of their \
             declared name.",
        long,
    )]
    use_aliases: bool,

    #[arg(
        default_value_t,
        help="Output format.",
        long,
        value_enum,
    )]
    format: OutputFormat,
}

impl TreeCmd {
    pub(crate) fn format(&self) -> OutputFormat {
        self.format
    }

    pub(crate) fn alias_policy(&self) -> AliasPolicy {
        if self.use_aliases {
            AliasPolicy::UseAliases
        } else {
            AliasPolicy::IgnoreAliases
        }
    }

    async fn load_variables(&self) -> anyhow::Result<Variables> {
        if let Some(json) = &self.variables {
            return parse_variables(json).context("Invalid --variables");
        }

        if let Some(path) = &self.variables_file {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read variables file {path:?}"))?;
            return parse_variables(&json)
                .with_context(|| format!("Invalid variables file {path:?}"));
        }

        Ok(Variables::new())
    }
}

#[inherent::inherent]
impl RunnableCommand for TreeCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let source = match read_document(&self.document).await {
            Ok(source) => source,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} {e:#}",
                output_utils::RED_X,
            )),
        };

        let variables = match self.load_variables().await {
            Ok(variables) => variables,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} {e:#}",
                output_utils::RED_X,
            )),
        };
        log::debug!(
            "Building selection tree for {:?} with {} variable binding(s).",
            self.document,
            variables.len(),
        );

        let tree = match SelectionTreeBuilder::new(self.alias_policy()).build(&source, &variables) {
            Ok(tree) => tree,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} Failed to build a selection tree for {:?}:\n{}",
                output_utils::RED_X,
                self.document,
                e.format_detailed(Some(&source)),
            )),
        };

        match render_tree(&tree, self.format()) {
            Ok(rendered) => CommandResult::stdout(format_args!("{rendered}")),
            Err(e) => CommandResult::stderr(format_args!(
                "{} {e:#}",
                output_utils::RED_X,
            )),
        }
    }
}

pub(crate) fn parse_variables(json: &str) -> anyhow::Result<Variables> {
    serde_json::from_str(json).context("Variables must be a JSON object")
}

pub(crate) fn render_tree(tree: &SelectionTree, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(tree)
            .context("Failed to serialize the selection tree"),
        OutputFormat::Text => Ok(tree.to_string()),
    }
}

async fn read_document(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        tokio::io::stdin()
            .read_to_string(&mut source)
            .await
            .context("Failed to read the document from stdin")?;
        return Ok(source);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read document {path:?}"))
}
