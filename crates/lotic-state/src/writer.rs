//! Write-once manifest creation.
//!
//! A [`ManifestWriter`] serializes one dataset's lot manifests into the
//! manifest store. Writes are write-once per (dataset, lot, state, attempt):
//! an existence check precedes the put, and the put itself carries a
//! does-not-exist precondition so a lost race surfaces as the same conflict.
//! The check-then-write pair is not atomic; the precondition closes the race
//! only on backends that support conditional puts, which is why both live
//! behind this interface.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use lotic_core::error::{Error, Result};
use lotic_core::observability::manifest_span;
use lotic_core::retry::RetryPolicy;
use lotic_core::storage::{StorageBackend, WritePrecondition, WriteResult};
use lotic_model::dataset::{Dataset, SinkDataset, UriType};
use lotic_model::manifest::Manifest;
use lotic_model::placement::Placement;
use lotic_model::state::ManifestState;
use tracing::info;

use crate::attempt::AttemptCounter;
use crate::manifest_uri::ManifestUri;

/// Writes manifests for one dataset.
pub struct ManifestWriter {
    backend: Arc<dyn StorageBackend>,
    placement: Placement,
    dataset: Dataset,
    uri_type: UriType,
    retry: RetryPolicy,
    attempts: Mutex<AttemptCounter>,
}

impl ManifestWriter {
    /// Creates a writer for the dataset in the placement's manifest store.
    #[must_use]
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        placement: Placement,
        dataset: Dataset,
        uri_type: UriType,
    ) -> Self {
        Self {
            backend,
            placement,
            dataset,
            uri_type,
            retry: RetryPolicy::default(),
            attempts: Mutex::new(AttemptCounter::new()),
        }
    }

    /// Overrides the retry policy for storage calls.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Creates one writer per sink role of an arc.
    #[must_use]
    pub fn for_sinks(
        backend: &Arc<dyn StorageBackend>,
        placement: &Placement,
        sinks: &BTreeMap<String, SinkDataset>,
    ) -> BTreeMap<String, ManifestWriter> {
        sinks
            .iter()
            .map(|(role, sink)| {
                (
                    role.clone(),
                    ManifestWriter::new(
                        Arc::clone(backend),
                        placement.clone(),
                        sink.dataset.clone(),
                        UriType::Identifier,
                    ),
                )
            })
            .collect()
    }

    /// Writes a manifest recording the lot's produced uris.
    ///
    /// For attempt-carrying states the next attempt ordinal is assigned
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestExists`] if a manifest already occupies the
    /// target key.
    pub async fn write(
        &self,
        lot_id: &str,
        uris: Vec<String>,
        state: ManifestState,
    ) -> Result<ManifestUri> {
        self.write_with_comment(lot_id, uris, state, None).await
    }

    /// Writes a zero-content manifest marking the lot as empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestExists`] if a manifest already occupies the
    /// target key.
    pub async fn write_empty(&self, lot_id: &str) -> Result<ManifestUri> {
        self.write_with_comment(lot_id, Vec::new(), ManifestState::Empty, None)
            .await
    }

    /// Writes a manifest with an operator comment, e.g. the reason a lot was
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestExists`] if a manifest already occupies the
    /// target key.
    pub async fn write_with_comment(
        &self,
        lot_id: &str,
        uris: Vec<String>,
        state: ManifestState,
        comment: Option<&str>,
    ) -> Result<ManifestUri> {
        let span = manifest_span("write", &self.dataset.id(), lot_id);
        let _guard = span.enter();

        let mut uri = ManifestUri::for_placement(self.placement.clone())
            .with_dataset(&self.dataset)
            .with_lot(lot_id)
            .with_state(state);

        if state.has_attempts() {
            let attempt = self
                .attempts
                .lock()
                .map_err(|_| Error::internal("attempt counter lock poisoned"))?
                .next_attempt(lot_id);
            uri = uri.with_attempt(attempt.to_string());
        }

        let key = uri.key()?;

        let existing = self
            .retry
            .run("head manifest", || self.backend.head(&key))
            .await?;

        if existing.is_some() {
            return Err(Error::ManifestExists { uri: uri.uri()? });
        }

        let manifest = Manifest {
            state,
            comment: comment.map(ToOwned::to_owned),
            lot_id: lot_id.to_string(),
            uri_type: self.uri_type,
            uris,
        };
        let body = Bytes::from(manifest.to_json()?);

        let result = self
            .retry
            .run("put manifest", || {
                self.backend
                    .put(&key, body.clone(), WritePrecondition::DoesNotExist)
            })
            .await?;

        match result {
            WriteResult::Success { .. } => {
                info!(state = %state, uris = manifest.uris.len(), "manifest written");
                Ok(uri)
            }
            WriteResult::PreconditionFailed { .. } => {
                Err(Error::ManifestExists { uri: uri.uri()? })
            }
        }
    }
}
