//! Access token handling
//!
//! A [`Secret`] is a reference to a credential. It is only turned into a
//! plaintext token while a request is being built, and never printed.

use crate::error::{ReaderError, Result};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Reference to a GitHub access token
pub enum Secret {
    /// Token held in memory
    Token(SecretString),
    /// Token read from the first set environment variable
    EnvVar {
        /// Variable names, tried in order
        names: Vec<String>,
        /// Fail when none of the variables is set
        strict: bool,
    },
}

impl Secret {
    /// Wrap a plaintext token
    pub fn from_token(token: impl Into<String>) -> Self {
        Secret::Token(SecretString::from(token.into()))
    }

    /// Read the token from `name` at request time; fails if it is unset
    pub fn from_env_var(name: impl Into<String>) -> Self {
        Secret::EnvVar {
            names: vec![name.into()],
            strict: true,
        }
    }

    /// Read the token from the first set variable in `names`
    ///
    /// With `strict == false` an unset token resolves to `None` and requests
    /// are sent without an `Authorization` header.
    pub fn from_env_vars<I, S>(names: I, strict: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Secret::EnvVar {
            names: names.into_iter().map(Into::into).collect(),
            strict,
        }
    }

    /// Resolve the credential to its value
    pub fn resolve(&self) -> Result<Option<SecretString>> {
        match self {
            Secret::Token(token) => {
                if token.expose_secret().is_empty() {
                    return Err(ReaderError::MissingCredential(
                        "token is empty".to_string(),
                    ));
                }
                Ok(Some(SecretString::from(token.expose_secret().to_string())))
            }
            Secret::EnvVar { names, strict } => {
                let value = names
                    .iter()
                    .filter_map(|name| std::env::var(name).ok())
                    .find(|value| !value.is_empty());

                match value {
                    Some(value) => Ok(Some(SecretString::from(value))),
                    None if *strict => Err(ReaderError::MissingCredential(format!(
                        "none of the environment variables {} is set",
                        names.join(", ")
                    ))),
                    None => Ok(None),
                }
            }
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Secret::Token(_) => f.write_str("Secret::Token([REDACTED])"),
            Secret::EnvVar { names, strict } => f
                .debug_struct("Secret::EnvVar")
                .field("names", names)
                .field("strict", strict)
                .finish(),
        }
    }
}
