//! GitHub repository reader
//!
//! [`GitHubRepositoryReader`] is the component behind both registered
//! façades: it resolves the effective repository and ref, downloads the
//! zipball and decodes the matching files into documents.

use crate::client::{ArchiveClient, ClientOptions, DEFAULT_API_BASE_URL};
use crate::decode::{decode_archive, ExtensionFilter, TextEncoding, DEFAULT_ENCODING};
use crate::error::{ReaderError, Result};
use crate::locator::RepositoryCoordinates;
use crate::secret::Secret;
use crate::types::{RunOutput, RunRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Default branch or tag
pub const DEFAULT_REF: &str = "main";

/// Default environment variable holding the access token
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Serializable reader configuration
///
/// The access token is never part of the configuration; only the name of
/// the environment variable that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Repository in the form `owner/repo`
    pub repository: String,
    /// Allowed file suffixes, including the leading dot
    pub file_extensions: Vec<String>,
    /// Charset used to decode every file
    #[serde(default = "default_encoding")]
    pub file_encoding: String,
    /// Default branch or tag
    #[serde(default = "default_ref", rename = "ref")]
    pub git_ref: String,
    /// Environment variable holding the access token
    #[serde(default = "default_token_env")]
    pub access_token_env: String,
    /// GitHub REST API root
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Custom User-Agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

fn default_ref() -> String {
    DEFAULT_REF.to_string()
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

/// Builder for [`GitHubRepositoryReader`]
#[derive(Debug)]
pub struct ReaderBuilder {
    access_token: Option<Secret>,
    repository: Option<String>,
    file_extensions: Option<Vec<String>>,
    file_encoding: String,
    git_ref: String,
    client: ClientOptions,
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderBuilder {
    /// Create a builder with `utf-8` encoding and the `main` ref
    pub fn new() -> Self {
        Self {
            access_token: None,
            repository: None,
            file_extensions: None,
            file_encoding: DEFAULT_ENCODING.to_string(),
            git_ref: DEFAULT_REF.to_string(),
            client: ClientOptions::default(),
        }
    }

    /// Start from a configuration; the token is read from `access_token_env`
    pub fn from_config(config: &ReaderConfig) -> Self {
        let mut builder = Self::new()
            .access_token(Secret::from_env_var(&config.access_token_env))
            .repository(&config.repository)
            .file_extensions(config.file_extensions.iter().cloned())
            .file_encoding(&config.file_encoding)
            .git_ref(&config.git_ref)
            .api_base_url(&config.api_base_url);

        if let Some(ref ua) = config.user_agent {
            builder = builder.user_agent(ua);
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
    }

    /// Set the access token (required)
    pub fn access_token(mut self, secret: Secret) -> Self {
        self.access_token = Some(secret);
        self
    }

    /// Set the default repository, `owner/repo` (required)
    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Set the allowed file suffixes (required)
    pub fn file_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Set the file encoding label
    pub fn file_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.file_encoding = encoding.into();
        self
    }

    /// Set the default branch or tag
    pub fn git_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = git_ref.into();
        self
    }

    /// Set the API root (GitHub Enterprise or a test server)
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.client.api_base_url = url.into();
        self
    }

    /// Set a custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.client.user_agent = ua.into();
        self
    }

    /// Set a whole-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.client.timeout = Some(timeout);
        self
    }

    /// Validate parameters and build the reader
    pub fn build(self) -> Result<GitHubRepositoryReader> {
        let secret = self
            .access_token
            .ok_or(ReaderError::MissingParameter("access_token"))?;
        let repository = self
            .repository
            .ok_or(ReaderError::MissingParameter("repository"))?;
        let extensions = self
            .file_extensions
            .ok_or(ReaderError::MissingParameter("file_extensions"))?;

        let coordinates = RepositoryCoordinates::parse(&repository)?;
        let encoding = TextEncoding::for_label(&self.file_encoding)?;

        for ext in extensions.iter().filter(|e| !e.is_empty() && !e.starts_with('.')) {
            warn!(extension = %ext, "File extension has no leading dot and will never match");
        }

        let client = ArchiveClient::new(self.client)?;

        Ok(GitHubRepositoryReader {
            coordinates,
            git_ref: self.git_ref,
            filter: ExtensionFilter::new(extensions),
            encoding,
            secret,
            client,
        })
    }
}

/// Reads the files of a GitHub repository into documents
#[derive(Debug)]
pub struct GitHubRepositoryReader {
    coordinates: RepositoryCoordinates,
    git_ref: String,
    filter: ExtensionFilter,
    encoding: TextEncoding,
    secret: Secret,
    client: ArchiveClient,
}

impl GitHubRepositoryReader {
    /// Create a new reader builder
    pub fn builder() -> ReaderBuilder {
        ReaderBuilder::new()
    }

    /// Build a reader from a configuration
    pub fn from_config(config: &ReaderConfig) -> Result<Self> {
        ReaderBuilder::from_config(config).build()
    }

    /// Configured default repository
    pub fn coordinates(&self) -> &RepositoryCoordinates {
        &self.coordinates
    }

    /// Configured default ref
    pub fn default_ref(&self) -> &str {
        &self.git_ref
    }

    /// Configured suffix allow-list
    pub fn filter(&self) -> &ExtensionFilter {
        &self.filter
    }

    /// Configured text encoding
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Repository and ref a request resolves to
    ///
    /// An override is parsed on its own; the configured default is untouched.
    pub fn resolve_target<'a>(
        &'a self,
        request: &'a RunRequest,
    ) -> Result<(RepositoryCoordinates, &'a str)> {
        let coordinates = match request.effective_repository() {
            Some(spec) => RepositoryCoordinates::parse(spec)?,
            None => self.coordinates.clone(),
        };
        let git_ref = request.effective_ref().unwrap_or(&self.git_ref);
        Ok((coordinates, git_ref))
    }

    /// Zipball URL a request resolves to
    pub fn endpoint_for(&self, request: &RunRequest) -> Result<String> {
        let (coordinates, git_ref) = self.resolve_target(request)?;
        Ok(self.client.endpoint_url(&coordinates, git_ref))
    }

    /// Download the repository and return its matching files as documents
    pub async fn run(&self, request: RunRequest) -> Result<RunOutput> {
        let (coordinates, git_ref) = self.resolve_target(&request)?;

        let archive = self.client.fetch(&coordinates, git_ref, &self.secret).await?;
        let documents = decode_archive(&archive, &self.filter, &self.encoding)?;

        info!(
            repository = %coordinates,
            git_ref = git_ref,
            documents = documents.len(),
            "Read repository"
        );

        Ok(RunOutput { documents })
    }
}
