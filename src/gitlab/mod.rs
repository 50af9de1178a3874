//! GitLab API boundary.
//!
//! [`GitlabApi`] is the remote operation surface the command layer depends
//! on; [`GitlabClient`] implements it over HTTPS.

mod client;
pub mod options;
pub mod types;

pub use client::GitlabClient;
pub use options::{
    CreateGroupOptions, CreateProjectOptions, CreateReleaseOptions, CreateTagOptions,
    EditProjectOptions, ListGroupProjectsOptions, ListGroupsOptions, ListProjectsOptions,
    ProjectSettings, UpdateGroupOptions,
};
pub use types::{Commit, Group, Project, Release, Tag, TagRelease};

use crate::error::Result;
use async_trait::async_trait;

/// Remote operations, each a single request/response pair.
///
/// `group` and `project` accept a numeric ID or a full path such as
/// `groupx/myapp`.
#[async_trait]
pub trait GitlabApi: Send + Sync {
    /// `GET /groups`
    async fn list_groups(&self, opts: &ListGroupsOptions) -> Result<Vec<Group>>;

    /// `GET /groups/:id/subgroups`
    async fn list_subgroups(&self, group: &str, opts: &ListGroupsOptions) -> Result<Vec<Group>>;

    /// `GET /projects`
    async fn list_projects(&self, opts: &ListProjectsOptions) -> Result<Vec<Project>>;

    /// `GET /groups/:id/projects`
    async fn list_group_projects(
        &self,
        group: &str,
        opts: &ListGroupProjectsOptions,
    ) -> Result<Vec<Project>>;

    /// `POST /groups`
    async fn create_group(&self, opts: &CreateGroupOptions) -> Result<Group>;

    /// `PUT /groups/:id`
    async fn update_group(&self, group: &str, opts: &UpdateGroupOptions) -> Result<Group>;

    /// `POST /projects`
    async fn create_project(&self, opts: &CreateProjectOptions) -> Result<Project>;

    /// `PUT /projects/:id`
    async fn edit_project(&self, project: &str, opts: &EditProjectOptions) -> Result<Project>;

    /// `POST /projects/:id/repository/tags`
    async fn create_tag(&self, project: &str, opts: &CreateTagOptions) -> Result<Tag>;

    /// `POST /projects/:id/releases`
    async fn create_release(&self, project: &str, opts: &CreateReleaseOptions)
    -> Result<Release>;
}
