//! Error types for RepoKit

use thiserror::Error;

/// Errors that can occur while reading a repository
///
/// Every variant is fatal to the `run` call that produced it: no partial
/// document list is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Repository name is not of the form `owner/repo`
    #[error("Please specify a valid repository name in the form `owner/repo` instead of {0:?}.")]
    RepositoryName(String),

    /// Archive download failed (transport error or non-success status)
    #[error("Failed to download repository content (url: {url}). Reason: {reason}.")]
    Api { url: String, reason: String },

    /// Entry bytes are not valid in the configured encoding
    #[error("Failed to decode {path} as {encoding}")]
    Decode { path: String, encoding: String },

    /// Response body is not a readable zip archive
    #[error("Failed to read repository archive: {0}")]
    Archive(String),

    /// Configured file encoding is not a known charset label
    #[error("Unknown file encoding: {0:?}")]
    UnknownEncoding(String),

    /// Access token could not be resolved
    #[error("Missing access token: {0}")]
    MissingCredential(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// API base URL is not an http(s) URL
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// Required construction parameter was not supplied
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// No component registered under that name
    #[error("Unknown component: {0}")]
    UnknownComponent(String),
}

impl ReaderError {
    /// Create an API error for `url` from a reqwest error
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("failed to connect to server: {}", err)
        } else if err.is_redirect() {
            format!("too many redirects: {}", err)
        } else {
            err.to_string()
        };
        ReaderError::Api {
            url: url.to_string(),
            reason,
        }
    }

    /// True for malformed `owner/repo` input
    pub fn is_repository_name(&self) -> bool {
        matches!(self, ReaderError::RepositoryName(_))
    }

    /// True for download failures
    pub fn is_api(&self) -> bool {
        matches!(self, ReaderError::Api { .. })
    }

    /// True for text decoding failures
    pub fn is_decode(&self) -> bool {
        matches!(self, ReaderError::Decode { .. })
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ReaderError>;
