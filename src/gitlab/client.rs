//! HTTPS implementation of [`GitlabApi`] on top of reqwest.

use super::{
    CreateGroupOptions, CreateProjectOptions, CreateReleaseOptions, CreateTagOptions,
    EditProjectOptions, GitlabApi, Group, ListGroupProjectsOptions, ListGroupsOptions,
    ListProjectsOptions, Project, Release, Tag, UpdateGroupOptions,
};
use crate::config::GitlabConfig;
use crate::error::{ConfigError, RemoteError, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// GitLab v4 REST client. One request per method call, no retries.
#[derive(Debug, Clone)]
pub struct GitlabClient {
    http: reqwest::Client,
    api_url: Url,
    token: Option<String>,
}

impl GitlabClient {
    /// Create a client from resolved configuration
    pub fn new(config: GitlabConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("gitlabctl/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::ClientInit {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            api_url: config.api_url,
            token: config.token,
        })
    }

    /// API root this client talks to
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Build an endpoint URL; each segment is percent-encoded on its own so
    /// that `group/project` paths become a single `group%2Fproject` segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidBaseUrl {
                url: self.api_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T, F>(
        &self,
        operation: &str,
        method: Method,
        segments: &[&str],
        build: F,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let token = self.token.as_deref().ok_or(ConfigError::MissingToken)?;
        let url = self.endpoint(segments)?;
        log::info!("{} {}", method, url);

        let request = build(
            self.http
                .request(method, url)
                .header("PRIVATE-TOKEN", token),
        );

        let response = request
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                operation: operation.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| RemoteError::Transport {
                operation: operation.to_string(),
                source,
            })?;
        log::debug!("{} -> {} ({} bytes)", operation, status, body.len());

        if !status.is_success() {
            return Err(RemoteError::Api {
                operation: operation.to_string(),
                status: status.as_u16(),
                message: error_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string()),
            }
            .into());
        }

        serde_json::from_str(&body).map_err(|source| {
            RemoteError::Decode {
                operation: operation.to_string(),
                source,
            }
            .into()
        })
    }
}

/// Pull a readable message out of a GitLab error body.
///
/// GitLab answers with `{"message": "..."}`, `{"message": {field: [..]}}` or
/// `{"error": "..."}`; anything else is returned truncated.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "error"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) => return Some(s.clone()),
                Some(other) if !other.is_null() => return Some(other.to_string()),
                _ => {}
            }
        }
    }

    Some(trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect())
}

#[async_trait]
impl GitlabApi for GitlabClient {
    async fn list_groups(&self, opts: &ListGroupsOptions) -> Result<Vec<Group>> {
        self.send("list groups", Method::GET, &["groups"], |r| r.query(opts))
            .await
    }

    async fn list_subgroups(&self, group: &str, opts: &ListGroupsOptions) -> Result<Vec<Group>> {
        self.send(
            "list subgroups",
            Method::GET,
            &["groups", group, "subgroups"],
            |r| r.query(opts),
        )
        .await
    }

    async fn list_projects(&self, opts: &ListProjectsOptions) -> Result<Vec<Project>> {
        self.send("list projects", Method::GET, &["projects"], |r| r.query(opts))
            .await
    }

    async fn list_group_projects(
        &self,
        group: &str,
        opts: &ListGroupProjectsOptions,
    ) -> Result<Vec<Project>> {
        self.send(
            "list group projects",
            Method::GET,
            &["groups", group, "projects"],
            |r| r.query(opts),
        )
        .await
    }

    async fn create_group(&self, opts: &CreateGroupOptions) -> Result<Group> {
        self.send("create group", Method::POST, &["groups"], |r| r.json(opts))
            .await
    }

    async fn update_group(&self, group: &str, opts: &UpdateGroupOptions) -> Result<Group> {
        self.send("update group", Method::PUT, &["groups", group], |r| {
            r.json(opts)
        })
        .await
    }

    async fn create_project(&self, opts: &CreateProjectOptions) -> Result<Project> {
        self.send("create project", Method::POST, &["projects"], |r| {
            r.json(opts)
        })
        .await
    }

    async fn edit_project(&self, project: &str, opts: &EditProjectOptions) -> Result<Project> {
        self.send("edit project", Method::PUT, &["projects", project], |r| {
            r.json(opts)
        })
        .await
    }

    async fn create_tag(&self, project: &str, opts: &CreateTagOptions) -> Result<Tag> {
        self.send(
            "create tag",
            Method::POST,
            &["projects", project, "repository", "tags"],
            |r| r.json(opts),
        )
        .await
    }

    async fn create_release(
        &self,
        project: &str,
        opts: &CreateReleaseOptions,
    ) -> Result<Release> {
        self.send(
            "create release",
            Method::POST,
            &["projects", project, "releases"],
            |r| r.json(opts),
        )
        .await
    }
}
