//! The command tree.
//!
//! [`CommandTree::build`] constructs the whole `gitlabctl` hierarchy once at
//! startup (root -> verb group -> leaf), checks every registration for
//! consistency, and is read-only afterwards. The tree is converted to a
//! `clap::Command` for parsing.

use super::flags::{self, FlagKind, FlagSpec, FlagValue};
use super::validate::Validator;
use crate::error::CliError;
use clap::{Arg, ArgAction};
use std::collections::BTreeSet;

/// Clap id of the positional argument list on leaf commands
pub const ARGS_ID: &str = "args";

/// Remote operation a leaf command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `get groups`
    ListGroups,
    /// `get subgroups GROUP`
    ListSubgroups,
    /// `get projects`, optionally scoped with `--from-group`
    ListProjects,
    /// `new group NAME`
    CreateGroup,
    /// `new project NAME`
    CreateProject,
    /// `new tag TAG`
    CreateTag,
    /// `new release TAG`
    CreateRelease,
    /// `edit group GROUP`
    EditGroup,
    /// `edit project PROJECT`
    EditProject,
}

/// One node of the command tree
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Command name
    pub name: &'static str,
    /// Alternative names
    pub aliases: Vec<&'static str>,
    /// One-line description
    pub about: &'static str,
    /// Usage examples shown in help
    pub example: Option<&'static str>,
    /// Exact number of positional arguments
    pub arity: usize,
    /// Placeholder name of the positional argument in help
    pub arg_name: &'static str,
    /// Flags local to this command
    pub flags: Vec<FlagSpec>,
    /// Flags inherited by every descendant
    pub persistent_flags: Vec<FlagSpec>,
    /// Names of flags that must be given
    pub required: BTreeSet<&'static str>,
    /// Pre-run checks, in order
    pub validators: Vec<Validator>,
    /// Operation run by a leaf; `None` on groups
    pub operation: Option<Operation>,
    /// Child commands
    pub children: Vec<CommandSpec>,
}

impl CommandSpec {
    /// A command that only groups subcommands
    pub fn group(name: &'static str, about: &'static str) -> Self {
        Self {
            name,
            aliases: Vec::new(),
            about,
            example: None,
            arity: 0,
            arg_name: "ARG",
            flags: Vec::new(),
            persistent_flags: Vec::new(),
            required: BTreeSet::new(),
            validators: Vec::new(),
            operation: None,
            children: Vec::new(),
        }
    }

    /// A runnable command
    pub fn leaf(name: &'static str, about: &'static str, operation: Operation) -> Self {
        Self {
            operation: Some(operation),
            ..Self::group(name, about)
        }
    }

    /// Set aliases
    pub fn aliases(mut self, aliases: &[&'static str]) -> Self {
        self.aliases = aliases.to_vec();
        self
    }

    /// Require exactly `arity` positional arguments named `arg_name`
    pub fn args(mut self, arity: usize, arg_name: &'static str) -> Self {
        self.arity = arity;
        self.arg_name = arg_name;
        self
    }

    /// Set help examples
    pub fn example(mut self, example: &'static str) -> Self {
        self.example = Some(example);
        self
    }

    /// Add a child command
    pub fn subcommand(mut self, child: CommandSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Apply a flag catalogue function
    pub fn with(mut self, add: impl FnOnce(&mut CommandSpec)) -> Self {
        add(&mut self);
        self
    }

    fn child(&self, name: &str) -> Option<&CommandSpec> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// A resolved leaf together with the flags visible to it
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    /// Space separated command path without the root, e.g. "new release"
    pub path: String,
    /// The leaf command
    pub command: &'a CommandSpec,
    /// Local flags followed by inherited persistent flags
    pub flags: Vec<&'a FlagSpec>,
}

/// The complete, validated command hierarchy
#[derive(Debug, Clone)]
pub struct CommandTree {
    root: CommandSpec,
}

impl CommandTree {
    /// Build the `gitlabctl` command tree
    pub fn build() -> Result<Self, CliError> {
        let mut root =
            CommandSpec::group("gitlabctl", "Manage GitLab groups, projects, tags and releases")
                .with(flags::add_out_flag)
                .subcommand(get_command())
                .subcommand(new_command())
                .subcommand(edit_command());
        validate_out_on_leaves(&mut root);
        Self::from_root(root)
    }

    /// Wrap and check an arbitrary root
    pub fn from_root(root: CommandSpec) -> Result<Self, CliError> {
        check_command(&root, &[])?;
        Ok(Self { root })
    }

    /// Root command
    pub fn root(&self) -> &CommandSpec {
        &self.root
    }

    /// Walk a path of command names (no root) down to a node
    pub fn resolve(&self, names: &[&str]) -> Option<Resolved<'_>> {
        let mut node = &self.root;
        let mut inherited: Vec<&FlagSpec> = node.persistent_flags.iter().collect();
        for name in names {
            node = node.child(name)?;
            inherited.extend(node.persistent_flags.iter());
        }

        let mut flags: Vec<&FlagSpec> = node.flags.iter().collect();
        flags.extend(inherited);
        Some(Resolved {
            path: names.join(" "),
            command: node,
            flags,
        })
    }

    /// Convert the tree into a clap command
    pub fn to_clap(&self) -> clap::Command {
        to_clap_command(&self.root)
            .version(clap::crate_version!())
            .propagate_version(true)
    }
}

/// Every leaf checks `--out` before its own validators
fn validate_out_on_leaves(cmd: &mut CommandSpec) {
    if cmd.operation.is_some() {
        cmd.validators.insert(0, flags::out_rule());
    }
    for child in &mut cmd.children {
        validate_out_on_leaves(child);
    }
}

/// Registration-time consistency checks. Failures are programming defects.
fn check_command(cmd: &CommandSpec, inherited: &[&FlagSpec]) -> Result<(), CliError> {
    let defect = |flag: &str, reason: String| CliError::FlagAccess {
        command: cmd.name.to_string(),
        flag: flag.to_string(),
        reason,
    };

    let mut visible: Vec<&FlagSpec> = inherited.to_vec();
    visible.extend(cmd.persistent_flags.iter());
    let inherited_for_children = visible.clone();
    visible.extend(cmd.flags.iter());

    let mut names = BTreeSet::new();
    let mut shorts = BTreeSet::from(['h', 'V']);
    for flag in &visible {
        if !names.insert(flag.name) {
            return Err(defect(flag.name, "flag registered twice".to_string()));
        }
        if let Some(short) = flag.shorthand
            && !shorts.insert(short)
        {
            return Err(defect(flag.name, format!("shorthand '{short}' already in use")));
        }
    }

    for required in &cmd.required {
        if !cmd.flags.iter().any(|f| f.name == *required) {
            return Err(defect(required, "required flag is not registered".to_string()));
        }
    }

    for validator in &cmd.validators {
        let flag = visible
            .iter()
            .find(|f| f.name == validator.flag())
            .ok_or_else(|| defect(validator.flag(), "validated flag is not registered".to_string()))?;
        if flag.kind() != FlagKind::String {
            return Err(defect(flag.name, "only string flags can be validated".to_string()));
        }
    }

    if cmd.operation.is_some() == !cmd.children.is_empty() {
        return Err(defect(
            "",
            "a command must either run an operation or have subcommands".to_string(),
        ));
    }

    for child in &cmd.children {
        check_command(child, &inherited_for_children)?;
    }
    Ok(())
}

fn to_clap_command(spec: &CommandSpec) -> clap::Command {
    let mut cmd = clap::Command::new(spec.name)
        .about(spec.about)
        .visible_aliases(spec.aliases.iter().copied());

    if let Some(example) = spec.example {
        cmd = cmd.after_help(format!("Examples:\n{example}"));
    }

    for flag in &spec.persistent_flags {
        cmd = cmd.arg(to_clap_arg(flag, false).global(true));
    }
    for flag in &spec.flags {
        cmd = cmd.arg(to_clap_arg(flag, spec.required.contains(flag.name)));
    }

    if spec.operation.is_some() {
        cmd = cmd.arg(
            Arg::new(ARGS_ID)
                .value_name(spec.arg_name)
                .num_args(0..)
                .action(ArgAction::Append)
                .hide(spec.arity == 0),
        );
    } else {
        cmd = cmd.subcommand_required(true).arg_required_else_help(true);
        for child in &spec.children {
            cmd = cmd.subcommand(to_clap_command(child));
        }
    }
    cmd
}

fn to_clap_arg(flag: &FlagSpec, required: bool) -> Arg {
    let mut help = flag.help.to_string();
    match &flag.default {
        FlagValue::String(default) if !default.is_empty() => {
            help.push_str(&format!(" [default: {default}]"));
        }
        FlagValue::Bool(true) => help.push_str(" [default: true]"),
        _ => {}
    }
    if required {
        help.push_str(" (required)");
    }

    let mut arg = Arg::new(flag.name).long(flag.name).help(help);
    if let Some(short) = flag.shorthand {
        arg = arg.short(short);
    }

    // Defaults are applied by ParsedFlags, so clap only reports what was given.
    match flag.kind() {
        FlagKind::String => arg.num_args(1).action(ArgAction::Set),
        FlagKind::Bool => arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_parser(clap::value_parser!(bool))
            .action(ArgAction::Set),
        FlagKind::StringSet => arg
            .num_args(1)
            .value_delimiter(',')
            .action(ArgAction::Append),
    }
}

fn get_command() -> CommandSpec {
    CommandSpec::group("get", "Display one or many GitLab resources")
        .subcommand(
            CommandSpec::leaf("groups", "List groups", Operation::ListGroups)
                .aliases(&["g"])
                .with(flags::add_get_groups_flags)
                .example("  # list all groups\n  gitlabctl get groups\n\n  # list groups sorted by path\n  gitlabctl get groups --order-by=path --sort=desc"),
        )
        .subcommand(
            CommandSpec::leaf("subgroups", "List subgroups of a group", Operation::ListSubgroups)
                .aliases(&["sg"])
                .args(1, "GROUP")
                .with(flags::add_get_groups_flags)
                .example("  gitlabctl get subgroups Group1"),
        )
        .subcommand(
            CommandSpec::leaf(
                "projects",
                "List projects of the authenticated user or of a group",
                Operation::ListProjects,
            )
            .aliases(&["p"])
            .with(flags::add_get_projects_flags)
            .example("  # get all projects\n  gitlabctl get projects\n\n  # get all projects from a group\n  gitlabctl get projects --from-group=Group1"),
        )
}

fn new_command() -> CommandSpec {
    CommandSpec::group("new", "Create a GitLab resource")
        .subcommand(
            CommandSpec::leaf("group", "Create a new group", Operation::CreateGroup)
                .aliases(&["g"])
                .args(1, "NAME")
                .with(flags::add_new_group_flags)
                .example("  gitlabctl new group Group1 --visibility=internal"),
        )
        .subcommand(
            CommandSpec::leaf("project", "Create a new project", Operation::CreateProject)
                .aliases(&["p"])
                .args(1, "NAME")
                .with(flags::add_new_project_flags)
                .example("  gitlabctl new project myapp --namespace-id=42 --tag-list=go,cli"),
        )
        .subcommand(
            CommandSpec::leaf("tag", "Create a new tag in a project's repository", Operation::CreateTag)
                .aliases(&["t"])
                .args(1, "TAG")
                .with(|cmd| {
                    flags::add_project_flag(cmd);
                    flags::register_required(
                        FlagSpec::string("ref", "", "Create the tag from a commit SHA, branch or another tag"),
                        cmd,
                    );
                    flags::register(
                        FlagSpec::string("message", "", "Create an annotated tag with this message")
                            .short('m'),
                        cmd,
                    );
                    flags::register(
                        FlagSpec::string("description", "", "Release notes to attach to the tag")
                            .short('d'),
                        cmd,
                    );
                })
                .example("  gitlabctl new tag v1.0 --ref=master --project=groupx/myapp"),
        )
        .subcommand(
            CommandSpec::leaf(
                "release",
                "Create a new release for the specified project's tag",
                Operation::CreateRelease,
            )
            .aliases(&["r"])
            .args(1, "TAG")
            .with(|cmd| {
                flags::add_project_flag(cmd);
                flags::register_required(
                    FlagSpec::string("description", "", "The release note or description")
                        .short('d'),
                    cmd,
                );
                flags::register(FlagSpec::string("name", "", "The release title"), cmd);
            })
            .example("  # ensure to create the tag where the release will be created from\n  gitlabctl new tag v1.0 --ref=master --project=groupx/myapp\n\n  # create the release\n  gitlabctl new release v1.0 --project=groupx/myapp --description=\"Sample Release Note\""),
        )
}

fn edit_command() -> CommandSpec {
    CommandSpec::group("edit", "Update a GitLab resource")
        .subcommand(
            CommandSpec::leaf("group", "Update an existing group", Operation::EditGroup)
                .aliases(&["g"])
                .args(1, "GROUP")
                .with(flags::add_edit_group_flags)
                .example("  gitlabctl edit group Group1 --change-name=Group2 --visibility=public"),
        )
        .subcommand(
            CommandSpec::leaf("project", "Update an existing project", Operation::EditProject)
                .aliases(&["p"])
                .args(1, "PROJECT")
                .with(flags::add_edit_project_flags)
                .example("  gitlabctl edit project groupx/myapp --wiki-enabled=false --default-branch=main"),
        )
}
