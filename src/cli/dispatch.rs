//! Command dispatch.
//!
//! One invocation moves through PARSED -> VALIDATED -> ASSEMBLED -> CALLED ->
//! DONE. Any failure returns the originating error and stops forward
//! progress; the remote API is only reached after every local check passed,
//! and the printer is only reached after the single remote call succeeded.

use super::assemble::{RequestOptions, assemble};
use super::output::{Entities, OutputFormat, Printer};
use super::parsed::ParsedFlags;
use super::tree::{CommandSpec, CommandTree};
use super::validate::run_validators;
use crate::error::{CliError, Result};
use crate::gitlab::GitlabApi;
use std::ffi::OsString;

/// Dispatcher stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Command line parsed, required flags and arity checked
    Parsed,
    /// Pre-run validators passed
    Validated,
    /// Request options built
    Assembled,
    /// Remote call returned
    Called,
    /// Result handed to the printer
    Done,
}

/// What a successful execution produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran and its result was printed
    Done,
    /// Help or version text was requested; nothing was called
    Displayed(String),
}

/// A fully parsed leaf invocation
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    /// Command path without the root, e.g. "get projects"
    pub path: String,
    /// Leaf command
    pub command: &'a CommandSpec,
    /// Flag values and positional arguments
    pub flags: ParsedFlags,
}

/// Result of the PARSED stage
#[derive(Debug, Clone)]
pub enum Parsed<'a> {
    /// Help or version output
    Displayed(String),
    /// A leaf ready to validate
    Invocation(Invocation<'a>),
}

/// Runs commands of a [`CommandTree`]
#[derive(Debug, Clone)]
pub struct Dispatcher<'a> {
    tree: &'a CommandTree,
    clap: clap::Command,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher over a built tree
    pub fn new(tree: &'a CommandTree) -> Self {
        Self {
            tree,
            clap: tree.to_clap(),
        }
    }

    /// Parse the command line, then check required flags and argument count
    pub fn parse<I, T>(&self, argv: I) -> Result<Parsed<'a>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match self.clap.clone().try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(e)
                if matches!(
                    e.kind(),
                    clap::error::ErrorKind::DisplayHelp
                        | clap::error::ErrorKind::DisplayVersion
                        | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) =>
            {
                return Ok(Parsed::Displayed(e.render().to_string()));
            }
            Err(e) => return Err(CliError::Usage(e).into()),
        };

        let mut names: Vec<&str> = Vec::new();
        let mut leaf_matches = &matches;
        while let Some((name, sub)) = leaf_matches.subcommand() {
            names.push(name);
            leaf_matches = sub;
        }

        let tree: &'a CommandTree = self.tree;
        let resolved = tree
            .resolve(&names)
            .filter(|r| r.command.operation.is_some())
            .ok_or_else(|| CliError::FlagAccess {
                command: names.join(" "),
                flag: String::new(),
                reason: "parsed command does not resolve to a runnable command".to_string(),
            })?;

        let flags =
            ParsedFlags::from_matches(resolved.command.name, &resolved.flags, leaf_matches)?;

        for required in &resolved.command.required {
            if !flags.is_set(required) {
                return Err(CliError::MissingRequiredFlag {
                    flag: required.to_string(),
                }
                .into());
            }
        }

        if flags.args().len() != resolved.command.arity {
            return Err(CliError::InvalidArgumentCount {
                command: resolved.path,
                expected: resolved.command.arity,
                received: flags.args().len(),
            }
            .into());
        }

        advance(&resolved.path, Stage::Parsed);
        Ok(Parsed::Invocation(Invocation {
            path: resolved.path,
            command: resolved.command,
            flags,
        }))
    }

    /// Run one command line to completion
    pub async fn execute<I, T>(
        &self,
        argv: I,
        api: &dyn GitlabApi,
        printer: &mut dyn Printer,
    ) -> Result<Outcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let invocation = match self.parse(argv)? {
            Parsed::Displayed(text) => return Ok(Outcome::Displayed(text)),
            Parsed::Invocation(invocation) => invocation,
        };
        let Invocation {
            path,
            command,
            flags,
        } = invocation;

        run_validators(&flags, &command.validators)?;
        advance(&path, Stage::Validated);

        let operation = command.operation.ok_or_else(|| CliError::FlagAccess {
            command: path.clone(),
            flag: String::new(),
            reason: "command has no operation".to_string(),
        })?;
        let format: OutputFormat = flags.string("out")?.parse()?;
        let request = assemble(operation, &flags)?;
        advance(&path, Stage::Assembled);
        log::debug!("{}: {:?}", path, request);

        let entities = call(api, request).await?;
        advance(&path, Stage::Called);

        printer.print(format, &entities)?;
        advance(&path, Stage::Done);
        Ok(Outcome::Done)
    }
}

fn advance(path: &str, stage: Stage) {
    log::debug!("{}: {:?}", path, stage);
}

/// Exactly one remote call per request
async fn call(api: &dyn GitlabApi, request: RequestOptions) -> Result<Entities> {
    let entities = match request {
        RequestOptions::ListGroups(opts) => Entities::Groups(api.list_groups(&opts).await?),
        RequestOptions::ListSubgroups { group, opts } => {
            Entities::Groups(api.list_subgroups(&group, &opts).await?)
        }
        RequestOptions::ListProjects(opts) => Entities::Projects(api.list_projects(&opts).await?),
        RequestOptions::ListGroupProjects { group, opts } => {
            Entities::Projects(api.list_group_projects(&group, &opts).await?)
        }
        RequestOptions::CreateGroup(opts) => Entities::Group(api.create_group(&opts).await?),
        RequestOptions::CreateProject(opts) => Entities::Project(api.create_project(&opts).await?),
        RequestOptions::CreateTag { project, opts } => {
            Entities::Tag(api.create_tag(&project, &opts).await?)
        }
        RequestOptions::CreateRelease { project, opts } => {
            Entities::Release(api.create_release(&project, &opts).await?)
        }
        RequestOptions::EditGroup { group, opts } => {
            Entities::Group(api.update_group(&group, &opts).await?)
        }
        RequestOptions::EditProject { project, opts } => {
            Entities::Project(api.edit_project(&project, &opts).await?)
        }
    };
    Ok(entities)
}
