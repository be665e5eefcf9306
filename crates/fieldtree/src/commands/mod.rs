pub(crate) mod check;
pub(crate) mod tree;

use crate::Cli;
use crate::CommandResult;
use check::CheckCmd;
use tree::TreeCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "fieldtree")]
pub(crate) enum CommandEnum {
    /// Print the selection tree of a single operation document.
    Tree(Box<TreeCmd>),

    /// Build the selection tree of every document under the given paths and
    /// report the ones that fail.
    Check(Box<CheckCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Tree(cmd) => cmd.run(cli).await,
            Self::Check(cmd) => cmd.run(cli).await,
        }
    }
}
