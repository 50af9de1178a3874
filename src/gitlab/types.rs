//! GitLab entities returned by the API.
//!
//! Only the fields gitlabctl prints are modelled. Every field tolerates being
//! absent so that older GitLab versions and `simple=true` project listings
//! still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GitLab group or subgroup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    /// Group ID
    pub id: u64,
    /// Display name
    pub name: String,
    /// URL path segment
    pub path: String,
    /// Path including parent groups
    pub full_path: String,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Visibility level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    /// Whether Git LFS is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfs_enabled: Option<bool>,
    /// Whether users may request access
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_access_enabled: Option<bool>,
    /// Parent group ID for subgroups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    /// Web URL
    pub web_url: String,
}

/// A GitLab project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    /// Project ID
    pub id: u64,
    /// Display name
    pub name: String,
    /// URL path segment
    pub path: String,
    /// Path including the namespace
    pub path_with_namespace: String,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default branch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    /// Visibility level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    /// Archived flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// Tags (topics) on the project
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_list: Vec<String>,
    /// Web URL
    pub web_url: String,
    /// HTTP clone URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_url_to_repo: Option<String>,
    /// SSH clone URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_url_to_repo: Option<String>,
    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Time of last activity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// A release attached to a tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Release {
    /// Tag the release belongs to
    pub tag_name: String,
    /// Release title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Release notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Release time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
}

/// Commit summary embedded in a tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    /// Full SHA
    pub id: String,
    /// Abbreviated SHA
    pub short_id: String,
    /// First line of the commit message
    pub title: String,
}

/// Release notes attached to a tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagRelease {
    /// Tag name
    pub tag_name: String,
    /// Release notes
    pub description: String,
}

/// A repository tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    /// Tag name
    pub name: String,
    /// Annotation message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Object the tag points to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Tagged commit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<Commit>,
    /// Release notes, when the tag has a release
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<TagRelease>,
}
