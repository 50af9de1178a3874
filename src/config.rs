//! Environment-driven configuration.
//!
//! The environment is read once at startup into an [`EnvConfig`] snapshot and
//! everything downstream takes values from that snapshot.

use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::time::Duration;
use url::Url;

/// Default GitLab instance
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 300;

/// Snapshot of the process environment
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment; entries that are not valid
    /// UTF-8 are skipped
    pub fn from_env() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    fn from_os_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self {
            vars: pairs
                .into_iter()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build from explicit pairs (tests, embedding)
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get a variable; empty values count as unset
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Connection settings for the GitLab API
#[derive(Debug, Clone)]
pub struct GitlabConfig {
    /// API root, always ending in `/api/v4/`
    pub api_url: Url,
    /// Personal access token, checked when a request is made
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GitlabConfig {
    /// Resolve configuration from `GITLAB_HTTP_URL`, `GITLAB_PRIVATE_TOKEN`
    /// (or `GITLAB_TOKEN`) and `GITLABCTL_TIMEOUT_SECS`
    pub fn from_env(env: &EnvConfig) -> Result<Self> {
        let base = env
            .get("GITLAB_HTTP_URL")
            .unwrap_or_else(|| DEFAULT_GITLAB_URL.to_string());
        let api_url = api_url_from_base(&base)?;

        let token = env
            .get("GITLAB_PRIVATE_TOKEN")
            .or_else(|| env.get("GITLAB_TOKEN"));

        let timeout_secs = env
            .get("GITLABCTL_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(|v| v.clamp(1, MAX_TIMEOUT_SECS))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Normalize an instance URL into the `/api/v4/` root
pub fn api_url_from_base(base: &str) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| ConfigError::InvalidBaseUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: base.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }
        .into());
    }

    let path = url.path().trim_end_matches('/').to_string();
    let path = if path.ends_with("/api/v4") {
        format!("{path}/")
    } else {
        format!("{path}/api/v4/")
    };
    url.set_path(&path);
    url.set_query(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_environment() {
        let config = GitlabConfig::from_env(&EnvConfig::default()).unwrap();
        assert_eq!(config.api_url.as_str(), "https://gitlab.com/api/v4/");
        assert!(config.token.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_entries_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let env = EnvConfig::from_os_pairs([
            (
                OsString::from("UNRELATED"),
                OsString::from_vec(vec![0xff, 0xfe]),
            ),
            (OsString::from("GITLAB_TOKEN"), OsString::from("t")),
        ]);
        assert_eq!(env.get("UNRELATED"), None);
        assert_eq!(env.get("GITLAB_TOKEN").as_deref(), Some("t"));
    }

    #[test]
    fn test_token_fallback_and_timeout_clamp() {
        let env = EnvConfig::from_pairs([
            ("GITLAB_TOKEN", "abc"),
            ("GITLAB_PRIVATE_TOKEN", "  "),
            ("GITLABCTL_TIMEOUT_SECS", "9000"),
        ]);
        let config = GitlabConfig::from_env(&env).unwrap();
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_api_url_normalization() {
        assert_eq!(
            api_url_from_base("https://git.example.com/").unwrap().as_str(),
            "https://git.example.com/api/v4/"
        );
        assert_eq!(
            api_url_from_base("http://localhost:8080/gitlab/api/v4").unwrap().as_str(),
            "http://localhost:8080/gitlab/api/v4/"
        );
        assert!(api_url_from_base("ftp://example.com").is_err());
        assert!(api_url_from_base("not a url").is_err());
    }
}
