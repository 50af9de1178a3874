//! Flag definitions and the reusable flag catalogue.
//!
//! A [`FlagSpec`] is a named, typed command-line parameter with a default.
//! Catalogue functions (`add_*`) attach groups of flags to a command, so the
//! same definition is shared by every command that needs it.

use super::tree::CommandSpec;
use super::validate::{ValidationRule, Validator};

/// The value type a flag carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Single string value
    String,
    /// Boolean switch, `--flag` or `--flag=false`
    Bool,
    /// Comma separated, repeatable list of strings
    StringSet,
}

/// A parsed or default flag value, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// String value
    String(String),
    /// Boolean value
    Bool(bool),
    /// Ordered list of distinct strings
    StringSet(Vec<String>),
}

impl FlagValue {
    /// Kind of this value
    pub fn kind(&self) -> FlagKind {
        match self {
            FlagValue::String(_) => FlagKind::String,
            FlagValue::Bool(_) => FlagKind::Bool,
            FlagValue::StringSet(_) => FlagKind::StringSet,
        }
    }
}

/// Definition of a single flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long name, used as `--name`
    pub name: &'static str,
    /// Optional single character short form
    pub shorthand: Option<char>,
    /// Default applied when the flag is not given
    pub default: FlagValue,
    /// Help text
    pub help: &'static str,
}

impl FlagSpec {
    /// String flag with a default
    pub fn string(name: &'static str, default: &str, help: &'static str) -> Self {
        Self {
            name,
            shorthand: None,
            default: FlagValue::String(default.to_string()),
            help,
        }
    }

    /// Boolean flag with a default
    pub fn bool(name: &'static str, default: bool, help: &'static str) -> Self {
        Self {
            name,
            shorthand: None,
            default: FlagValue::Bool(default),
            help,
        }
    }

    /// String-set flag, empty by default
    pub fn string_set(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            shorthand: None,
            default: FlagValue::StringSet(Vec::new()),
            help,
        }
    }

    /// Attach a short form
    pub fn short(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    /// Kind of the flag, derived from its default
    pub fn kind(&self) -> FlagKind {
        self.default.kind()
    }
}

/// Attach a flag to a command. Registering the same name twice is a no-op.
pub fn register(flag: FlagSpec, cmd: &mut CommandSpec) {
    if cmd.flags.iter().any(|f| f.name == flag.name) {
        return;
    }
    cmd.flags.push(flag);
}

/// Attach a flag and mark it mandatory
pub fn register_required(flag: FlagSpec, cmd: &mut CommandSpec) {
    let name = flag.name;
    register(flag, cmd);
    cmd.required.insert(name);
}

/// Attach a flag inherited by every descendant of the command
pub fn register_persistent(flag: FlagSpec, cmd: &mut CommandSpec) {
    if cmd.persistent_flags.iter().any(|f| f.name == flag.name) {
        return;
    }
    cmd.persistent_flags.push(flag);
}

/// Output formats accepted by `--out`
pub const OUT_FORMATS: &[&str] = &["json", "yaml", "simple"];

const GROUP_ORDER_BY: &[&str] = &["name", "path"];
const PROJECT_ORDER_BY: &[&str] = &[
    "id",
    "name",
    "path",
    "created_at",
    "updated_at",
    "last_activity_at",
];
const SORT_ORDERS: &[&str] = &["asc", "desc"];
const VISIBILITY_LEVELS: &[&str] = &["public", "private", "internal"];
const MERGE_METHODS: &[&str] = &["merge", "rebase_merge", "ff"];

/// `--out`, persistent on the root command
pub fn add_out_flag(cmd: &mut CommandSpec) {
    register_persistent(
        FlagSpec::string(
            "out",
            "simple",
            "Print the command output to the desired format. (json, yaml, simple)",
        )
        .short('o'),
        cmd,
    );
}

/// Rule for `--out`; every leaf command runs it first
pub fn out_rule() -> Validator {
    Validator::Enum(ValidationRule::new("out", OUT_FORMATS))
}

/// Flags for `get groups` and `get subgroups`
pub fn add_get_groups_flags(cmd: &mut CommandSpec) {
    register(
        FlagSpec::bool(
            "all-available",
            false,
            "Show all the groups you have access to \
             (defaults to false for authenticated users, true for admin)",
        ),
        cmd,
    );
    register(
        FlagSpec::string("order-by", "name", "Order groups by name or path"),
        cmd,
    );
    add_owned_flag(cmd);
    add_sort_flag(cmd);
    add_statistics_flag(cmd);
    add_search_flag(cmd);

    cmd.validators.extend([
        Validator::Enum(ValidationRule::new("sort", SORT_ORDERS)),
        Validator::Enum(ValidationRule::new("order-by", GROUP_ORDER_BY)),
    ]);
}

/// Flags for `get projects`
pub fn add_get_projects_flags(cmd: &mut CommandSpec) {
    register(
        FlagSpec::string(
            "from-group",
            "",
            "Use a group as the target namespace when performing the command",
        ),
        cmd,
    );
    register(
        FlagSpec::string(
            "order-by",
            "created_at",
            "Return projects ordered by id, name, path, created_at, updated_at, \
             or last_activity_at fields",
        ),
        cmd,
    );
    add_sort_flag(cmd);
    add_search_flag(cmd);
    add_statistics_flag(cmd);
    add_visibility_flag(cmd);
    add_owned_flag(cmd);

    for (name, help) in [
        ("archived", "Limit by archived status"),
        (
            "simple",
            "Return only the ID, URL, name, and path of each project",
        ),
        (
            "membership",
            "Limit by projects that the current user is a member of",
        ),
        ("starred", "Limit by projects starred by the current user"),
        ("with-issues-enabled", "Limit by enabled issues feature"),
        (
            "with-merge-requests-enabled",
            "Limit by enabled merge requests feature",
        ),
    ] {
        register(FlagSpec::bool(name, false, help), cmd);
    }

    cmd.validators.extend([
        Validator::Enum(ValidationRule::new("sort", SORT_ORDERS)),
        Validator::Enum(ValidationRule::new("order-by", PROJECT_ORDER_BY)),
        Validator::Enum(ValidationRule::new("visibility", VISIBILITY_LEVELS)),
    ]);
}

/// Flags for `new group`
pub fn add_new_group_flags(cmd: &mut CommandSpec) {
    register(
        FlagSpec::string(
            "parent-id",
            "",
            "ID of the parent group, to create a subgroup",
        ),
        cmd,
    );
    add_desc_flag(cmd);
    add_lfs_enabled_flag(cmd);
    add_request_access_enabled_flag(cmd);
    add_visibility_flag(cmd);

    cmd.validators.extend([
        Validator::Enum(ValidationRule::new("visibility", VISIBILITY_LEVELS)),
        Validator::Numeric("parent-id"),
    ]);
}

/// Flags for `edit group`
pub fn add_edit_group_flags(cmd: &mut CommandSpec) {
    add_change_name_flag(cmd);
    add_change_path_flag(cmd);
    add_desc_flag(cmd);
    add_lfs_enabled_flag(cmd);
    add_request_access_enabled_flag(cmd);
    add_visibility_flag(cmd);

    cmd.validators.push(Validator::Enum(ValidationRule::new(
        "visibility",
        VISIBILITY_LEVELS,
    )));
}

/// Flags for `new project`
pub fn add_new_project_flags(cmd: &mut CommandSpec) {
    register(
        FlagSpec::string(
            "namespace-id",
            "",
            "ID of the group namespace (defaults to current user namespace)",
        ),
        cmd,
    );
    add_project_settings_flags(cmd);
    cmd.validators.push(Validator::Numeric("namespace-id"));
}

/// Flags for `edit project`
pub fn add_edit_project_flags(cmd: &mut CommandSpec) {
    add_project_settings_flags(cmd);
    add_change_name_flag(cmd);
    add_change_path_flag(cmd);
    register(
        FlagSpec::string("default-branch", "master", "The default branch"),
        cmd,
    );
}

/// Project settings shared by `new project` and `edit project`
fn add_project_settings_flags(cmd: &mut CommandSpec) {
    add_desc_flag(cmd);
    add_lfs_enabled_flag(cmd);
    add_request_access_enabled_flag(cmd);
    add_visibility_flag(cmd);

    for (name, default, help) in [
        ("issues-enabled", true, "Enable issues"),
        ("merge-requests-enabled", true, "Enable merge requests"),
        ("jobs-enabled", true, "Enable jobs"),
        ("wiki-enabled", true, "Enable wiki"),
        ("snippets-enabled", true, "Enable snippets"),
        (
            "resolve-outdated-diff-discussions",
            false,
            "Automatically resolve merge request diffs discussions on lines changed with a push",
        ),
        (
            "container-registry-enabled",
            false,
            "Enable container registry for this project",
        ),
        (
            "shared-runners-enabled",
            false,
            "Enable shared runners for this project",
        ),
        (
            "public-jobs",
            false,
            "If true, jobs can be viewed by non-project-members",
        ),
        (
            "only-allow-merge-if-pipeline-succeeds",
            false,
            "Set whether merge requests can only be merged with successful jobs",
        ),
        (
            "only-allow-merge-if-discussion-are-resolved",
            false,
            "Set whether merge requests can only be merged when all the discussions are resolved",
        ),
        (
            "printing-merge-request-link-enabled",
            true,
            "Show link to create/view merge request when pushing from the command line",
        ),
    ] {
        register(FlagSpec::bool(name, default, help), cmd);
    }

    register(
        FlagSpec::string(
            "merge-method",
            "merge",
            "Set the merge method used. (available: 'merge', 'rebase_merge', 'ff')",
        ),
        cmd,
    );
    register(
        FlagSpec::string_set(
            "tag-list",
            "The list of tags for a project. Example: --tag-list='tag1,tag2'",
        ),
        cmd,
    );
    register(
        FlagSpec::string("ci-config-path", "", "The path to CI config file"),
        cmd,
    );

    cmd.validators.extend([
        Validator::Enum(ValidationRule::new("visibility", VISIBILITY_LEVELS)),
        Validator::Enum(ValidationRule::new("merge-method", MERGE_METHODS)),
    ]);
}

/// `--project`, required by project-scoped `new` commands
pub fn add_project_flag(cmd: &mut CommandSpec) {
    register_required(
        FlagSpec::string(
            "project",
            "",
            "The name or ID of the project (full path, e.g. group/project)",
        )
        .short('p'),
        cmd,
    );
}

fn add_desc_flag(cmd: &mut CommandSpec) {
    register(
        FlagSpec::string("desc", "", "The description of the resource"),
        cmd,
    );
}

fn add_change_name_flag(cmd: &mut CommandSpec) {
    register(
        FlagSpec::string(
            "change-name",
            "",
            "Change the resource name that is displayed in the web user interface",
        ),
        cmd,
    );
}

fn add_change_path_flag(cmd: &mut CommandSpec) {
    register(
        FlagSpec::string(
            "change-path",
            "",
            "Change the path name used when accessing the resource via http or ssh url",
        ),
        cmd,
    );
}

fn add_owned_flag(cmd: &mut CommandSpec) {
    register(
        FlagSpec::bool(
            "owned",
            false,
            "Limit to resources owned by the current user",
        ),
        cmd,
    );
}

fn add_search_flag(cmd: &mut CommandSpec) {
    register(
        FlagSpec::string(
            "search",
            "",
            "Return the list of resources matching the search criteria",
        ),
        cmd,
    );
}

fn add_statistics_flag(cmd: &mut CommandSpec) {
    register(
        FlagSpec::bool(
            "statistics",
            false,
            "Include resource statistics (admins only)",
        ),
        cmd,
    );
}

fn add_sort_flag(cmd: &mut CommandSpec) {
    register(
        FlagSpec::string("sort", "asc", "Order resources in asc or desc order"),
        cmd,
    );
}

fn add_visibility_flag(cmd: &mut CommandSpec) {
    register(
        FlagSpec::string("visibility", "private", "public, internal or private"),
        cmd,
    );
}

fn add_request_access_enabled_flag(cmd: &mut CommandSpec) {
    register(
        FlagSpec::bool("request-access-enabled", false, "Enable request access"),
        cmd,
    );
}

fn add_lfs_enabled_flag(cmd: &mut CommandSpec) {
    register(FlagSpec::bool("lfs-enabled", false, "Enable LFS"), cmd);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent_per_name() {
        let mut cmd = CommandSpec::group("get", "Display resources");
        register(FlagSpec::string("sort", "asc", "first"), &mut cmd);
        register(FlagSpec::string("sort", "desc", "second"), &mut cmd);

        assert_eq!(cmd.flags.len(), 1);
        assert_eq!(cmd.flags[0].help, "first");
    }

    #[test]
    fn test_register_required_marks_flag() {
        let mut cmd = CommandSpec::group("new", "Create resources");
        add_project_flag(&mut cmd);
        register_required(FlagSpec::string("description", "", "notes"), &mut cmd);

        assert!(cmd.required.contains("project"));
        assert!(cmd.required.contains("description"));
        assert_eq!(cmd.flags.len(), 2);
    }

    #[test]
    fn test_same_flag_name_gets_command_scoped_rules() {
        let mut groups = CommandSpec::group("groups", "");
        let mut projects = CommandSpec::group("projects", "");
        add_get_groups_flags(&mut groups);
        add_get_projects_flags(&mut projects);

        let allowed = |cmd: &CommandSpec| {
            cmd.validators
                .iter()
                .find_map(|v| match v {
                    Validator::Enum(rule) if rule.flag == "order-by" => Some(rule.allowed.clone()),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(allowed(&groups), vec!["name", "path"]);
        assert_eq!(allowed(&projects).len(), 6);
    }

    #[test]
    fn test_flag_kind_follows_default() {
        assert_eq!(FlagSpec::bool("owned", false, "").kind(), FlagKind::Bool);
        assert_eq!(FlagSpec::string_set("tag-list", "").kind(), FlagKind::StringSet);
        assert_eq!(FlagSpec::string("sort", "asc", "").kind(), FlagKind::String);
    }
}
