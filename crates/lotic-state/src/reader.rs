//! Manifest retrieval.

use std::sync::Arc;

use lotic_core::error::Result;
use lotic_core::retry::RetryPolicy;
use lotic_core::storage::StorageBackend;
use lotic_model::manifest::Manifest;

use crate::manifest_uri::ManifestUri;

/// Reads manifests back out of the manifest store.
pub struct ManifestReader {
    backend: Arc<dyn StorageBackend>,
    retry: RetryPolicy,
}

impl ManifestReader {
    /// Creates a reader over the manifest store.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            retry: RetryPolicy::default(),
        }
    }

    /// Overrides the retry policy for storage calls.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Reads the manifest the uri addresses.
    ///
    /// # Errors
    ///
    /// Returns [`lotic_core::Error::NotFound`] if no manifest exists at the
    /// key, and [`lotic_core::Error::Serialization`] if the stored bytes are
    /// not a valid manifest.
    pub async fn read(&self, uri: &ManifestUri) -> Result<Manifest> {
        let key = uri.key()?;

        let bytes = self
            .retry
            .run("get manifest", || self.backend.get(&key))
            .await?;

        Manifest::from_json(&bytes)
    }
}
