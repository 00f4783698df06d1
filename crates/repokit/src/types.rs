//! Core types for RepoKit

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Origin of a [`Document`] inside the repository archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentMeta {
    /// Same value as [`Document::id`]
    pub file_id: String,
    /// Final path component, e.g. `README.md`
    pub file_name: String,
    /// Full path inside the archive, including the `{repo}-{ref}` top-level directory
    pub file_path: String,
}

/// One repository file converted to text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Document {
    /// Random identifier, unique per run and not stable across runs
    pub id: String,
    /// Decoded file content
    pub content: String,
    /// Where the content came from
    pub meta: DocumentMeta,
}

impl Document {
    /// Create a document with a fresh random id
    pub fn new(
        content: impl Into<String>,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            meta: DocumentMeta {
                file_id: id.clone(),
                file_name: file_name.into(),
                file_path: file_path.into(),
            },
            id,
            content: content.into(),
        }
    }
}

/// Per-call overrides for a repository read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunRequest {
    /// Repository in the form `owner/repo` (optional, defaults to the configured one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Branch or tag (optional, defaults to the configured one)
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

impl RunRequest {
    /// Request that uses the configured repository and ref
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the repository for this call
    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Override the ref for this call
    pub fn git_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = Some(git_ref.into());
        self
    }

    /// Repository override, with empty strings treated as absent
    pub fn effective_repository(&self) -> Option<&str> {
        self.repository.as_deref().filter(|r| !r.is_empty())
    }

    /// Ref override, with empty strings treated as absent
    pub fn effective_ref(&self) -> Option<&str> {
        self.git_ref.as_deref().filter(|r| !r.is_empty())
    }
}

/// Result of a repository read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunOutput {
    /// Documents in archive order
    pub documents: Vec<Document>,
}
