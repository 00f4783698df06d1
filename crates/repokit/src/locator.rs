//! Repository locator
//!
//! Parses `owner/repo` strings into [`RepositoryCoordinates`].

use crate::error::{ReaderError, Result};
use std::fmt;
use std::str::FromStr;

/// Owner and name of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryCoordinates {
    owner: String,
    repo: String,
}

impl RepositoryCoordinates {
    /// Create coordinates from already-split parts
    ///
    /// Both parts must be non-empty and must not contain `/`.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let repo = repo.into();
        if !is_valid_segment(&owner) || !is_valid_segment(&repo) {
            return Err(ReaderError::RepositoryName(format!("{}/{}", owner, repo)));
        }
        Ok(Self { owner, repo })
    }

    /// Parse an `owner/repo` string
    ///
    /// The input must split on `/` into exactly two non-empty segments.
    pub fn parse(spec: &str) -> Result<Self> {
        let segments: Vec<&str> = spec.split('/').collect();

        if segments.len() != 2 || !segments.iter().all(|s| is_valid_segment(s)) {
            return Err(ReaderError::RepositoryName(spec.to_string()));
        }

        Ok(Self {
            owner: segments[0].to_string(),
            repo: segments[1].to_string(),
        })
    }

    /// Repository owner (user or organization)
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains('/')
}

impl FromStr for RepositoryCoordinates {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RepositoryCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let coords = RepositoryCoordinates::parse("rust-lang/rust").unwrap();
        assert_eq!(coords.owner(), "rust-lang");
        assert_eq!(coords.repo(), "rust");
    }

    #[test]
    fn test_parse_keeps_segments_verbatim() {
        let coords = RepositoryCoordinates::parse(" Owner.Name/repo.rs ").unwrap();
        assert_eq!(coords.owner(), " Owner.Name");
        assert_eq!(coords.repo(), "repo.rs ");
    }

    #[test]
    fn test_parse_no_separator() {
        let err = RepositoryCoordinates::parse("rust").unwrap_err();
        assert!(err.is_repository_name());
        assert!(err.to_string().contains("\"rust\""));
    }

    #[test]
    fn test_parse_too_many_separators() {
        assert!(RepositoryCoordinates::parse("a/b/c").is_err());
        assert!(RepositoryCoordinates::parse("owner/repo/").is_err());
        assert!(RepositoryCoordinates::parse("https://github.com/owner/repo").is_err());
    }

    #[test]
    fn test_parse_empty_segments() {
        assert!(RepositoryCoordinates::parse("").is_err());
        assert!(RepositoryCoordinates::parse("/").is_err());
        assert!(RepositoryCoordinates::parse("owner/").is_err());
        assert!(RepositoryCoordinates::parse("/repo").is_err());
    }

    #[test]
    fn test_from_str_and_display() {
        let coords: RepositoryCoordinates = "octocat/hello-world".parse().unwrap();
        assert_eq!(coords.to_string(), "octocat/hello-world");
    }

    #[test]
    fn test_new_rejects_separator() {
        assert!(RepositoryCoordinates::new("a/b", "c").is_err());
        assert!(RepositoryCoordinates::new("a", "").is_err());
        assert_eq!(
            RepositoryCoordinates::new("a", "b").unwrap(),
            RepositoryCoordinates::parse("a/b").unwrap()
        );
    }
}
