//! Request option shapes, one per remote operation.
//!
//! Fields map 1:1 to GitLab API parameters. `None` means "omit the
//! parameter", which the API treats differently from an empty value.

#![allow(missing_docs)] // Field names mirror GitLab API parameters

use serde::Serialize;

/// Parameters for `GET /groups` and `GET /groups/:id/subgroups`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListGroupsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<bool>,
}

/// Parameters for `GET /projects`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListProjectsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_issues_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_merge_requests_enabled: Option<bool>,
}

/// Parameters for `GET /groups/:id/projects`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListGroupProjectsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_issues_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_merge_requests_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_shared: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_subgroups: Option<bool>,
}

/// Field-for-field mapping from the user-scoped listing to the group-scoped one.
///
/// `membership` has no group-scoped counterpart and is dropped.
/// `with_shared` and `include_subgroups` have no source and stay unset.
impl From<&ListProjectsOptions> for ListGroupProjectsOptions {
    fn from(opts: &ListProjectsOptions) -> Self {
        Self {
            archived: opts.archived,
            visibility: opts.visibility.clone(),
            order_by: opts.order_by.clone(),
            sort: opts.sort.clone(),
            search: opts.search.clone(),
            simple: opts.simple,
            owned: opts.owned,
            starred: opts.starred,
            statistics: opts.statistics,
            with_issues_enabled: opts.with_issues_enabled,
            with_merge_requests_enabled: opts.with_merge_requests_enabled,
            with_shared: None,
            include_subgroups: None,
        }
    }
}

/// Body for `POST /groups`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateGroupOptions {
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfs_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_access_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
}

/// Body for `PUT /groups/:id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateGroupOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfs_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_access_enabled: Option<bool>,
}

/// Project settings shared by create and edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfs_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_access_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_requests_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippets_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_outdated_diff_discussions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_registry_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_runners_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_jobs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_allow_merge_if_pipeline_succeeds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_allow_merge_if_all_discussions_are_resolved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printing_merge_request_link_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_config_path: Option<String>,
}

/// Body for `POST /projects`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateProjectOptions {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<u64>,
    #[serde(flatten)]
    pub settings: ProjectSettings,
}

/// Body for `PUT /projects/:id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditProjectOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(flatten)]
    pub settings: ProjectSettings,
}

/// Body for `POST /projects/:id/repository/tags`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateTagOptions {
    pub tag_name: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_description: Option<String>,
}

/// Body for `POST /projects/:id/releases`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateReleaseOptions {
    pub tag_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
