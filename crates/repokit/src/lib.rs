//! RepoKit - GitHub repository reader
//!
//! This crate downloads a GitHub repository snapshot (a zipball) at a branch
//! or tag, keeps the files whose suffix is on an allow-list, and returns each
//! one as a [`Document`] with its decoded text and origin path.
//!
//! ## Pipeline
//!
//! 1. [`RepositoryCoordinates`] - parse `owner/repo`
//! 2. [`ArchiveClient`] - authenticated download of `/repos/{owner}/{repo}/zipball/{ref}`
//! 3. [`decode_archive`] - unpack in memory, filter by suffix, decode text
//!
//! [`GitHubRepositoryReader`] ties the steps together. It is registered under
//! two roles, [`GitHubRepositoryAugmenter`] and [`GitHubRepositoryFetcher`],
//! via [`ComponentRegistry`].
//!
//! ```no_run
//! use repokit::{GitHubRepositoryReader, RunRequest, Secret};
//!
//! # async fn example() -> repokit::Result<()> {
//! let reader = GitHubRepositoryReader::builder()
//!     .access_token(Secret::from_env_var("GITHUB_TOKEN"))
//!     .repository("octocat/hello-world")
//!     .file_extensions([".md", ".py"])
//!     .build()?;
//!
//! let output = reader.run(RunRequest::new().git_ref("v1.0")).await?;
//! for doc in &output.documents {
//!     println!("{} ({} bytes)", doc.meta.file_path, doc.content.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod component;
pub mod decode;
mod error;
mod locator;
pub mod reader;
mod secret;
mod types;

pub use client::{ArchiveClient, ClientOptions};
pub use component::{
    Component, ComponentRegistry, GitHubRepositoryAugmenter, GitHubRepositoryFetcher,
};
pub use decode::{decode_archive, ExtensionFilter, TextEncoding};
pub use error::{ReaderError, Result};
pub use locator::RepositoryCoordinates;
pub use reader::{GitHubRepositoryReader, ReaderBuilder, ReaderConfig};
pub use secret::Secret;
pub use types::{Document, DocumentMeta, RunOutput, RunRequest};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Everruns RepoKit/1.0";

/// Component description for LLM consumption
pub const COMPONENT_DESCRIPTION: &str = r#"Retrieves the files of a GitHub repository and returns them as documents.

- Downloads the repository snapshot at a branch or tag
- Keeps files whose extension is on the configured allow-list
- Returns decoded text plus file name and archive path"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const COMPONENT_LLMTXT: &str = r#"# RepoKit GitHub Repository Reader

Retrieves the files of a GitHub repository and returns them as documents.

## Capabilities
- Downloads `GET /repos/{owner}/{repo}/zipball/{ref}` with a bearer token
- Follows the redirect to the signed download URL
- Keeps files whose extension (e.g. `.md`) is on the allow-list
- Decodes every kept file with one text encoding (default `utf-8`)

## Input Parameters
- `repository` (optional): `owner/repo`, overrides the configured repository for this call
- `ref` (optional): branch or tag, overrides the configured ref for this call

## Output Fields
- `documents`: list of documents in archive order
  - `id`: random identifier, unique per call
  - `content`: decoded file text
  - `meta.file_id`: same as `id`
  - `meta.file_name`: file name, e.g. `README.md`
  - `meta.file_path`: path inside the archive, e.g. `hello-world-main/README.md`

## Examples

### Read the configured repository
```json
{}
```

### Read another repository at a tag
```json
{"repository": "octocat/hello-world", "ref": "v1.0"}
```

## Error Handling
- Malformed `repository` fails before any request is made
- Any HTTP failure or non-2xx status fails the call
- A kept file that is not valid in the configured encoding fails the call
- No partial document list is ever returned
"#;
