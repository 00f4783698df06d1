//! Component registration
//!
//! The reader is exposed to orchestrators under two roles, an augmenter and
//! a fetcher. Both are thin façades over one shared [`GitHubRepositoryReader`].
//! [`ComponentRegistry`] looks components up by name.

use crate::error::{ReaderError, Result};
use crate::reader::GitHubRepositoryReader;
use crate::types::{RunOutput, RunRequest};
use crate::COMPONENT_DESCRIPTION;
use async_trait::async_trait;
use schemars::schema_for;
use std::sync::Arc;

/// A named pipeline component with a declared input/output shape
#[async_trait]
pub trait Component: Send + Sync {
    /// Unique name used for registration and lookup
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str {
        COMPONENT_DESCRIPTION
    }

    /// JSON schema of the per-call parameters
    fn input_schema(&self) -> serde_json::Value {
        serde_json::to_value(schema_for!(RunRequest)).unwrap_or_default()
    }

    /// JSON schema of the output mapping
    fn output_schema(&self) -> serde_json::Value {
        serde_json::to_value(schema_for!(RunOutput)).unwrap_or_default()
    }

    /// Run the component
    async fn run(&self, request: RunRequest) -> Result<RunOutput>;
}

/// Reader registered in the augmenter role
pub struct GitHubRepositoryAugmenter {
    reader: Arc<GitHubRepositoryReader>,
}

impl GitHubRepositoryAugmenter {
    /// Wrap a shared reader; runs delegate to [`GitHubRepositoryReader::run`]
    pub fn new(reader: Arc<GitHubRepositoryReader>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl Component for GitHubRepositoryAugmenter {
    fn name(&self) -> &'static str {
        "github_repository_augmenter"
    }

    async fn run(&self, request: RunRequest) -> Result<RunOutput> {
        self.reader.run(request).await
    }
}

/// Reader registered in the fetcher role
pub struct GitHubRepositoryFetcher {
    reader: Arc<GitHubRepositoryReader>,
}

impl GitHubRepositoryFetcher {
    /// Wrap a shared reader; runs delegate to [`GitHubRepositoryReader::run`]
    pub fn new(reader: Arc<GitHubRepositoryReader>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl Component for GitHubRepositoryFetcher {
    fn name(&self) -> &'static str {
        "github_repository_fetcher"
    }

    async fn run(&self, request: RunRequest) -> Result<RunOutput> {
        self.reader.run(request).await
    }
}

/// Registry of components keyed by name
///
/// Keeps registration order, which is also the order of [`names`](Self::names).
pub struct ComponentRegistry {
    components: Vec<Box<dyn Component>>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Create a registry with both reader roles sharing `reader`
    pub fn with_reader(reader: GitHubRepositoryReader) -> Self {
        let reader = Arc::new(reader);
        let mut registry = Self::new();
        registry.register(Box::new(GitHubRepositoryAugmenter::new(Arc::clone(&reader))));
        registry.register(Box::new(GitHubRepositoryFetcher::new(reader)));
        registry
    }

    /// Register a component
    ///
    /// A component with the same name as an existing one replaces it.
    pub fn register(&mut self, component: Box<dyn Component>) {
        if let Some(existing) = self
            .components
            .iter_mut()
            .find(|c| c.name() == component.name())
        {
            *existing = component;
        } else {
            self.components.push(component);
        }
    }

    /// Look up a component by name
    pub fn get(&self, name: &str) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Registered component names
    pub fn names(&self) -> Vec<&'static str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Iterate over registered components
    pub fn iter(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.iter().map(|c| c.as_ref())
    }

    /// Run the component registered as `name`
    pub async fn run(&self, name: &str, request: RunRequest) -> Result<RunOutput> {
        let component = self
            .get(name)
            .ok_or_else(|| ReaderError::UnknownComponent(name.to_string()))?;
        tracing::debug!(component = name, "Running component");
        component.run(request).await
    }
}
