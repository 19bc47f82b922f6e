//! Content providers: the collaborators that list directories and read selected files.
//!
//! The application holds a single `Arc<dyn ContentProvider>` chosen at startup, so call
//! sites never check which backend is in use.

pub mod local;
pub mod remote;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AppConfig, ProviderKind};
use crate::core::{BundleOptions, CoreError, Node, PatternList};

pub use local::LocalProvider;
pub use remote::RemoteProvider;

#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Lists the directory at `path` recursively. Paths in the result are relative to it
    /// and use `/`. Providers may skip `patterns`-excluded subtrees while walking.
    async fn list_directory(
        &self,
        path: &str,
        patterns: &PatternList,
    ) -> Result<Vec<Node>, CoreError>;

    /// Returns the raw `.gitignore` of `root`, or `None` if there is none to use.
    async fn read_gitignore(&self, root: &str) -> Result<Option<String>, CoreError>;

    /// Produces the finished bundle text for `selections` under `root`.
    async fn read_files(
        &self,
        root: &str,
        selections: &[String],
        patterns: &PatternList,
        options: BundleOptions,
    ) -> Result<String, CoreError>;
}

/// Builds the provider named by the configuration.
pub fn from_config(config: &AppConfig) -> Arc<dyn ContentProvider> {
    match &config.provider {
        ProviderKind::Local => {
            tracing::info!("Using local filesystem provider");
            Arc::new(LocalProvider::new())
        }
        ProviderKind::Remote { base_url } => {
            tracing::info!("Using remote provider at {}", base_url);
            Arc::new(RemoteProvider::new(base_url.clone()))
        }
    }
}
