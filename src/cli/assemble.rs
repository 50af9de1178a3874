//! Options assembly: parsed flags in, typed request options out.
//!
//! Every assembler is a pure function of the parsed flag state. Listing
//! filters and edit fields are only sent when given on the command line, so
//! an unset `--search` is omitted rather than sent as an empty filter and an
//! edit never resets settings the user did not touch. Create operations send
//! every setting including defaults.

use super::parsed::ParsedFlags;
use super::tree::Operation;
use super::validate::parse_numeric_id;
use crate::error::CliError;
use crate::gitlab::{
    CreateGroupOptions, CreateProjectOptions, CreateReleaseOptions, CreateTagOptions,
    EditProjectOptions, ListGroupProjectsOptions, ListGroupsOptions, ListProjectsOptions,
    ProjectSettings, UpdateGroupOptions,
};

/// A request ready to be sent, with its path target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOptions {
    /// `get groups`
    ListGroups(ListGroupsOptions),
    /// `get subgroups GROUP`
    ListSubgroups {
        /// Parent group
        group: String,
        /// Filters
        opts: ListGroupsOptions,
    },
    /// `get projects`
    ListProjects(ListProjectsOptions),
    /// `get projects --from-group=GROUP`
    ListGroupProjects {
        /// Group to list
        group: String,
        /// Filters
        opts: ListGroupProjectsOptions,
    },
    /// `new group NAME`
    CreateGroup(CreateGroupOptions),
    /// `new project NAME`
    CreateProject(CreateProjectOptions),
    /// `new tag TAG`
    CreateTag {
        /// Target project
        project: String,
        /// Body
        opts: CreateTagOptions,
    },
    /// `new release TAG`
    CreateRelease {
        /// Target project
        project: String,
        /// Body
        opts: CreateReleaseOptions,
    },
    /// `edit group GROUP`
    EditGroup {
        /// Target group
        group: String,
        /// Body
        opts: UpdateGroupOptions,
    },
    /// `edit project PROJECT`
    EditProject {
        /// Target project
        project: String,
        /// Body
        opts: EditProjectOptions,
    },
}

/// Build the request for `operation` from parsed flags
pub fn assemble(operation: Operation, flags: &ParsedFlags) -> Result<RequestOptions, CliError> {
    let request = match operation {
        Operation::ListGroups => RequestOptions::ListGroups(list_groups_options(flags)?),
        Operation::ListSubgroups => RequestOptions::ListSubgroups {
            group: positional(flags)?,
            opts: list_groups_options(flags)?,
        },
        Operation::ListProjects => {
            let opts = list_projects_options(flags)?;
            match flags.optional_string("from-group")? {
                Some(group) => RequestOptions::ListGroupProjects {
                    group,
                    opts: ListGroupProjectsOptions::from(&opts),
                },
                None => RequestOptions::ListProjects(opts),
            }
        }
        Operation::CreateGroup => RequestOptions::CreateGroup(create_group_options(flags)?),
        Operation::CreateProject => RequestOptions::CreateProject(create_project_options(flags)?),
        Operation::CreateTag => RequestOptions::CreateTag {
            project: flags.string("project")?,
            opts: create_tag_options(flags)?,
        },
        Operation::CreateRelease => RequestOptions::CreateRelease {
            project: flags.string("project")?,
            opts: create_release_options(flags)?,
        },
        Operation::EditGroup => RequestOptions::EditGroup {
            group: positional(flags)?,
            opts: update_group_options(flags)?,
        },
        Operation::EditProject => RequestOptions::EditProject {
            project: positional(flags)?,
            opts: edit_project_options(flags)?,
        },
    };
    Ok(request)
}

/// Options for `get groups` / `get subgroups`
pub fn list_groups_options(flags: &ParsedFlags) -> Result<ListGroupsOptions, CliError> {
    Ok(ListGroupsOptions {
        all_available: flags.explicit_bool("all-available")?,
        order_by: Some(flags.string("order-by")?),
        owned: flags.explicit_bool("owned")?,
        search: flags.optional_string("search")?,
        sort: Some(flags.string("sort")?),
        statistics: flags.explicit_bool("statistics")?,
    })
}

/// Options for `get projects`
pub fn list_projects_options(flags: &ParsedFlags) -> Result<ListProjectsOptions, CliError> {
    Ok(ListProjectsOptions {
        archived: flags.explicit_bool("archived")?,
        order_by: Some(flags.string("order-by")?),
        sort: Some(flags.string("sort")?),
        search: flags.optional_string("search")?,
        simple: flags.explicit_bool("simple")?,
        owned: flags.explicit_bool("owned")?,
        membership: flags.explicit_bool("membership")?,
        starred: flags.explicit_bool("starred")?,
        statistics: flags.explicit_bool("statistics")?,
        visibility: flags.explicit_string("visibility")?,
        with_issues_enabled: flags.explicit_bool("with-issues-enabled")?,
        with_merge_requests_enabled: flags.explicit_bool("with-merge-requests-enabled")?,
    })
}

/// Body for `new group NAME`; the path defaults to the name
pub fn create_group_options(flags: &ParsedFlags) -> Result<CreateGroupOptions, CliError> {
    let name = positional(flags)?;
    Ok(CreateGroupOptions {
        path: name.clone(),
        name,
        description: flags.optional_string("desc")?,
        visibility: Some(flags.string("visibility")?),
        lfs_enabled: Some(flags.bool("lfs-enabled")?),
        request_access_enabled: Some(flags.bool("request-access-enabled")?),
        parent_id: numeric_id(flags, "parent-id")?,
    })
}

/// Body for `edit group GROUP`
pub fn update_group_options(flags: &ParsedFlags) -> Result<UpdateGroupOptions, CliError> {
    Ok(UpdateGroupOptions {
        name: flags.explicit_string("change-name")?,
        path: flags.explicit_string("change-path")?,
        description: flags.explicit_string("desc")?,
        visibility: flags.explicit_string("visibility")?,
        lfs_enabled: flags.explicit_bool("lfs-enabled")?,
        request_access_enabled: flags.explicit_bool("request-access-enabled")?,
    })
}

/// Body for `new project NAME`
pub fn create_project_options(flags: &ParsedFlags) -> Result<CreateProjectOptions, CliError> {
    Ok(CreateProjectOptions {
        name: positional(flags)?,
        namespace_id: numeric_id(flags, "namespace-id")?,
        settings: project_settings(flags, false)?,
    })
}

/// Body for `edit project PROJECT`
pub fn edit_project_options(flags: &ParsedFlags) -> Result<EditProjectOptions, CliError> {
    Ok(EditProjectOptions {
        name: flags.explicit_string("change-name")?,
        path: flags.explicit_string("change-path")?,
        default_branch: flags.explicit_string("default-branch")?,
        settings: project_settings(flags, true)?,
    })
}

/// Body for `new tag TAG`
pub fn create_tag_options(flags: &ParsedFlags) -> Result<CreateTagOptions, CliError> {
    Ok(CreateTagOptions {
        tag_name: positional(flags)?,
        git_ref: flags.string("ref")?,
        message: flags.optional_string("message")?,
        release_description: flags.optional_string("description")?,
    })
}

/// Body for `new release TAG`
pub fn create_release_options(flags: &ParsedFlags) -> Result<CreateReleaseOptions, CliError> {
    Ok(CreateReleaseOptions {
        tag_name: positional(flags)?,
        name: flags.optional_string("name")?,
        description: Some(flags.string("description")?),
    })
}

/// Project settings; with `only_given` set, untouched flags are left out
fn project_settings(flags: &ParsedFlags, only_given: bool) -> Result<ProjectSettings, CliError> {
    let boolean = |name: &str| -> Result<Option<bool>, CliError> {
        if only_given {
            flags.explicit_bool(name)
        } else {
            flags.bool(name).map(Some)
        }
    };
    let text = |name: &str| -> Result<Option<String>, CliError> {
        if only_given {
            flags.explicit_string(name)
        } else {
            flags.optional_string(name)
        }
    };

    // An empty default list carries nothing worth sending in either mode.
    let tag_list = if flags.is_set("tag-list") {
        Some(flags.string_set("tag-list")?)
    } else {
        None
    };

    Ok(ProjectSettings {
        description: text("desc")?,
        visibility: text("visibility")?,
        lfs_enabled: boolean("lfs-enabled")?,
        request_access_enabled: boolean("request-access-enabled")?,
        issues_enabled: boolean("issues-enabled")?,
        merge_requests_enabled: boolean("merge-requests-enabled")?,
        jobs_enabled: boolean("jobs-enabled")?,
        wiki_enabled: boolean("wiki-enabled")?,
        snippets_enabled: boolean("snippets-enabled")?,
        resolve_outdated_diff_discussions: boolean("resolve-outdated-diff-discussions")?,
        container_registry_enabled: boolean("container-registry-enabled")?,
        shared_runners_enabled: boolean("shared-runners-enabled")?,
        public_jobs: boolean("public-jobs")?,
        only_allow_merge_if_pipeline_succeeds: boolean("only-allow-merge-if-pipeline-succeeds")?,
        only_allow_merge_if_all_discussions_are_resolved: boolean(
            "only-allow-merge-if-discussion-are-resolved",
        )?,
        merge_method: text("merge-method")?,
        tag_list,
        printing_merge_request_link_enabled: boolean("printing-merge-request-link-enabled")?,
        ci_config_path: text("ci-config-path")?,
    })
}

fn positional(flags: &ParsedFlags) -> Result<String, CliError> {
    flags
        .args()
        .first()
        .cloned()
        .ok_or_else(|| CliError::InvalidArgumentCount {
            command: flags.command().to_string(),
            expected: 1,
            received: 0,
        })
}

fn numeric_id(flags: &ParsedFlags, name: &str) -> Result<Option<u64>, CliError> {
    flags
        .optional_string(name)?
        .map(|value| parse_numeric_id(name, &value))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::flags::FlagValue;

    fn projects_flags() -> ParsedFlags {
        let mut flags = ParsedFlags::new("projects");
        for (name, value) in [
            ("from-group", ""),
            ("order-by", "created_at"),
            ("sort", "asc"),
            ("search", ""),
            ("visibility", "private"),
            ("out", "simple"),
        ] {
            flags.insert(name, FlagValue::String(value.to_string()), false);
        }
        for name in [
            "statistics",
            "owned",
            "archived",
            "simple",
            "membership",
            "starred",
            "with-issues-enabled",
            "with-merge-requests-enabled",
        ] {
            flags.insert(name, FlagValue::Bool(false), false);
        }
        flags
    }

    #[test]
    fn test_unset_filters_are_omitted() {
        let opts = list_projects_options(&projects_flags()).unwrap();
        assert_eq!(
            opts,
            ListProjectsOptions {
                order_by: Some("created_at".to_string()),
                sort: Some("asc".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let mut flags = projects_flags();
        flags.insert("search", FlagValue::String("api".to_string()), true);
        flags.insert("owned", FlagValue::Bool(true), true);

        let first = assemble(Operation::ListProjects, &flags).unwrap();
        let second = assemble(Operation::ListProjects, &flags).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_group_switches_to_group_scope() {
        let mut flags = projects_flags();
        flags.insert("from-group", FlagValue::String("team1".to_string()), true);
        flags.insert("sort", FlagValue::String("desc".to_string()), true);
        flags.insert("membership", FlagValue::Bool(true), true);

        match assemble(Operation::ListProjects, &flags).unwrap() {
            RequestOptions::ListGroupProjects { group, opts } => {
                assert_eq!(group, "team1");
                assert_eq!(opts.sort.as_deref(), Some("desc"));
                assert_eq!(opts.order_by.as_deref(), Some("created_at"));
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_release_options() {
        let mut flags = ParsedFlags::new("release");
        flags.insert("project", FlagValue::String("groupx/myapp".to_string()), true);
        flags.insert("description", FlagValue::String("Sample".to_string()), true);
        flags.insert("name", FlagValue::String(String::new()), false);
        flags.set_args(vec!["v1.0".to_string()]);

        assert_eq!(
            assemble(Operation::CreateRelease, &flags).unwrap(),
            RequestOptions::CreateRelease {
                project: "groupx/myapp".to_string(),
                opts: CreateReleaseOptions {
                    tag_name: "v1.0".to_string(),
                    name: None,
                    description: Some("Sample".to_string()),
                },
            }
        );
    }

    #[test]
    fn test_group_path_defaults_to_name() {
        let mut flags = ParsedFlags::new("group");
        flags.insert("desc", FlagValue::String(String::new()), false);
        flags.insert("visibility", FlagValue::String("private".to_string()), false);
        flags.insert("lfs-enabled", FlagValue::Bool(false), false);
        flags.insert("request-access-enabled", FlagValue::Bool(true), true);
        flags.insert("parent-id", FlagValue::String("12".to_string()), true);
        flags.set_args(vec!["Group1".to_string()]);

        let opts = create_group_options(&flags).unwrap();
        assert_eq!(opts.name, "Group1");
        assert_eq!(opts.path, "Group1");
        assert_eq!(opts.visibility.as_deref(), Some("private"));
        assert_eq!(opts.parent_id, Some(12));
        assert_eq!(opts.description, None);
    }

    #[test]
    fn test_missing_positional_is_reported() {
        let flags = ParsedFlags::new("release");
        assert!(matches!(
            positional(&flags),
            Err(CliError::InvalidArgumentCount { expected: 1, received: 0, .. })
        ));
    }
}
