//! Command line interface for gitlabctl.
//!
//! The command tree is declared as data ([`tree`]), flags come from a shared
//! catalogue ([`flags`]), and [`Dispatcher`] runs one command per process
//! against a [`GitlabApi`](crate::gitlab::GitlabApi).

pub mod assemble;
pub mod dispatch;
pub mod flags;
mod output;
pub mod parsed;
pub mod tree;
pub mod validate;

pub use assemble::RequestOptions;
pub use dispatch::{Dispatcher, Outcome, Stage};
pub use output::{Entities, OutputFormat, OutputManager, Printer, StdoutPrinter, render};
pub use tree::{CommandSpec, CommandTree, Operation};

use crate::config::{EnvConfig, GitlabConfig};
use crate::error::Result;
use crate::gitlab::GitlabClient;

/// Main CLI entry point: run the process command line against the configured
/// GitLab instance
pub async fn run() -> Result<Outcome> {
    let tree = CommandTree::build()?;
    let env = EnvConfig::from_env();
    let client = GitlabClient::new(GitlabConfig::from_env(&env)?)?;
    log::debug!("using GitLab API at {}", client.api_url());

    let dispatcher = Dispatcher::new(&tree);
    let mut printer = StdoutPrinter;
    dispatcher
        .execute(std::env::args_os(), &client, &mut printer)
        .await
}
