//! # gitlabctl
//!
//! Command-line client for the GitLab REST API: list groups and projects,
//! create groups, projects, tags and releases, and edit groups and projects.
//!
//! Every command follows the same pipeline: flags are declared once in a
//! shared catalogue, parsed into typed state, validated, assembled into a
//! typed request, sent with exactly one API call, and printed.
//!
//! ## Usage
//!
//! ```bash
//! gitlabctl get projects --from-group=Group1 --sort=desc
//! gitlabctl new tag v1.0 --ref=master --project=groupx/myapp
//! gitlabctl new release v1.0 --project=groupx/myapp --description="Sample Release Note"
//! gitlabctl edit project groupx/myapp --wiki-enabled=false -o json
//! ```
//!
//! ## Configuration
//!
//! - `GITLAB_HTTP_URL`: instance URL (default `https://gitlab.com`)
//! - `GITLAB_PRIVATE_TOKEN` or `GITLAB_TOKEN`: personal access token
//! - `GITLABCTL_TIMEOUT_SECS`: request timeout in seconds (default 30)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod error;
pub mod gitlab;

// Re-export main types for public API
pub use cli::{CommandTree, Dispatcher, Outcome};
pub use config::{EnvConfig, GitlabConfig};
pub use error::{CliError, GitlabctlError, Result};
pub use gitlab::{GitlabApi, GitlabClient};
