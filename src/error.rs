//! Error types for gitlabctl operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use thiserror::Error;

/// Result type alias for gitlabctl operations
pub type Result<T> = std::result::Result<T, GitlabctlError>;

/// Main error type for all gitlabctl operations
#[derive(Error, Debug)]
pub enum GitlabctlError {
    /// Command line errors (flags, arguments, validation)
    #[error("{0}")]
    Cli(#[from] CliError),

    /// Errors reported by the GitLab API or the transport underneath it
    #[error("{0}")]
    Remote(#[from] RemoteError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// A flag marked as required was not given
    #[error("required flag \"{flag}\" not set")]
    MissingRequiredFlag {
        /// Flag name
        flag: String,
    },

    /// A flag value is outside its allowed set
    #[error("'{value}' is not a recognized value of '{flag}' flag. Please choose from: [{}]", allowed.join(", "))]
    InvalidFlagValue {
        /// Flag name
        flag: String,
        /// Offending value
        value: String,
        /// Allowed values, in declaration order
        allowed: Vec<String>,
    },

    /// A flag value does not have the expected shape (e.g. a numeric ID)
    #[error("'{value}' is not a valid value of '{flag}' flag: {reason}")]
    MalformedFlagValue {
        /// Flag name
        flag: String,
        /// Offending value
        value: String,
        /// Reason for the error
        reason: String,
    },

    /// Wrong number of positional arguments
    #[error("'{command}' accepts {expected} arg(s), received {received}")]
    InvalidArgumentCount {
        /// Command path, e.g. "new release"
        command: String,
        /// Expected count
        expected: usize,
        /// Received count
        received: usize,
    },

    /// Flag registration or lookup is inconsistent; a programming defect
    #[error("error accessing flag {flag} for command {command}: {reason}")]
    FlagAccess {
        /// Command name
        command: String,
        /// Flag name
        flag: String,
        /// Reason for the error
        reason: String,
    },

    /// Command line could not be parsed
    #[error("{}", usage_summary(.0))]
    Usage(#[from] clap::Error),
}

/// First line of a clap error without its `error:` prefix; the usage block
/// and hints that follow are dropped
fn usage_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let line = rendered
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}

/// Errors from the remote API boundary
#[derive(Error, Debug)]
pub enum RemoteError {
    /// GitLab answered with a non-success status
    #[error("GitLab API error ({status}) on {operation}: {message}")]
    Api {
        /// Operation that failed
        operation: String,
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Request could not be sent or the response could not be read
    #[error("request for {operation} failed: {source}")]
    Transport {
        /// Operation that failed
        operation: String,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// Response body did not match the expected entity shape
    #[error("could not decode {operation} response: {source}")]
    Decode {
        /// Operation that failed
        operation: String,
        /// Decoding error
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No access token in the environment
    #[error("GitLab access token not provided. Set GITLAB_PRIVATE_TOKEN or GITLAB_TOKEN")]
    MissingToken,

    /// Base URL could not be parsed
    #[error("invalid GitLab URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The configured URL
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// HTTP client could not be constructed
    #[error("failed to create HTTP client: {reason}")]
    ClientInit {
        /// Reason for the error
        reason: String,
    },
}

impl GitlabctlError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            GitlabctlError::Config(ConfigError::MissingToken) => vec![
                "Create a personal access token with the 'api' scope in GitLab".to_string(),
                "Export it: export GITLAB_PRIVATE_TOKEN=<token>".to_string(),
            ],
            GitlabctlError::Config(ConfigError::InvalidBaseUrl { .. }) => vec![
                "Set GITLAB_HTTP_URL to the instance root, e.g. https://gitlab.example.com"
                    .to_string(),
            ],
            GitlabctlError::Remote(RemoteError::Api { status: 401, .. }) => vec![
                "Verify the token is valid and not expired".to_string(),
            ],
            GitlabctlError::Remote(RemoteError::Api { status: 403, .. }) => vec![
                "Verify the token has the 'api' scope and enough permissions".to_string(),
            ],
            GitlabctlError::Remote(RemoteError::Api { status: 404, .. }) => vec![
                "Check the group or project path (use the full path, e.g. group/project)"
                    .to_string(),
            ],
            GitlabctlError::Remote(RemoteError::Transport { .. }) => vec![
                "Check network connectivity and GITLAB_HTTP_URL".to_string(),
            ],
            _ => Vec::new(),
        }
    }

    /// Fatal errors signal a broken flag registration, not a user mistake
    pub fn is_fatal(&self) -> bool {
        matches!(self, GitlabctlError::Cli(CliError::FlagAccess { .. }))
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            GitlabctlError::Cli(CliError::FlagAccess { .. }) => 70,
            GitlabctlError::Cli(CliError::Usage(_)) => 2,
            _ => 1,
        }
    }
}
