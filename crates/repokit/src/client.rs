//! HTTP client for GitHub zipball downloads
//!
//! One [`ArchiveClient`] owns one `reqwest::Client`, so the connection pool is
//! shared across repeated downloads. Each [`ArchiveClient::fetch`] issues a
//! single GET with no retries.

use crate::error::{ReaderError, Result};
use crate::locator::RepositoryCoordinates;
use crate::secret::Secret;
use crate::DEFAULT_USER_AGENT;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::redirect::Policy;
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Public GitHub REST API root
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Pinned REST API version
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Media type requested from the REST API
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Redirect hops allowed (the zipball endpoint redirects to a signed URL)
const MAX_REDIRECTS: usize = 10;

/// Header carrying the pinned API version
const API_VERSION_HEADER: &str = "x-github-api-version";

/// Options for building an [`ArchiveClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API root, without trailing slash
    pub api_base_url: String,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Whole-request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

/// Downloads repository archives from the GitHub REST API
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    http: reqwest::Client,
    api_base_url: String,
}

impl ArchiveClient {
    /// Build a client with the fixed GitHub header set
    pub fn new(options: ClientOptions) -> Result<Self> {
        let api_base_url = normalize_base_url(&options.api_base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            API_VERSION_HEADER,
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&options.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(Policy::limited(MAX_REDIRECTS));

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(ReaderError::ClientBuildError)?;

        Ok(Self { http, api_base_url })
    }

    /// API root this client talks to
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Zipball endpoint for a repository at `git_ref`
    pub fn endpoint_url(&self, coords: &RepositoryCoordinates, git_ref: &str) -> String {
        format!(
            "{}/repos/{}/{}/zipball/{}",
            self.api_base_url,
            coords.owner(),
            coords.repo(),
            git_ref
        )
    }

    /// Download the archive for `coords` at `git_ref`
    ///
    /// The token is resolved here and only attached to this request.
    pub async fn fetch(
        &self,
        coords: &RepositoryCoordinates,
        git_ref: &str,
        secret: &Secret,
    ) -> Result<Bytes> {
        let url = self.endpoint_url(coords, git_ref);

        let mut request = self.http.get(&url);
        if let Some(token) = secret.resolve()? {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| {
                    ReaderError::MissingCredential(
                        "token contains characters not allowed in a header".to_string(),
                    )
                })?;
            value.set_sensitive(true);
            request = request.header(AUTHORIZATION, value);
        }

        debug!(url = %url, "Downloading repository archive");

        let response = request
            .send()
            .await
            .map_err(|e| ReaderError::from_reqwest(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Archive download failed");
            return Err(ReaderError::Api {
                url,
                reason: format!("HTTP {}", status),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ReaderError::from_reqwest(&url, e))?;

        debug!(url = %url, bytes = body.len(), "Downloaded repository archive");

        Ok(body)
    }
}

/// Validate an API root and strip trailing slashes
fn normalize_base_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw).map_err(|_| ReaderError::InvalidBaseUrl(raw.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ReaderError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
