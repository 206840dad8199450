//! Arc state markers.
//!
//! One marker object per (arc, lot) records where the arc's processing of
//! that lot currently stands. The marker's file name is the state; moving to
//! a new state writes the new marker first and deletes the old ones after, so
//! a crash between the two leaves extra markers rather than none. Extra
//! markers surface as an internal error on the next read or transition
//! instead of being silently resolved.

use std::sync::Arc;

use bytes::Bytes;
use lotic_core::error::{Error, Result};
use lotic_core::observability::arc_span;
use lotic_core::retry::RetryPolicy;
use lotic_core::storage::{StorageBackend, WritePrecondition};
use lotic_model::placement::Placement;
use lotic_model::project::Project;
use lotic_model::state::ArcState;
use tracing::{info, warn};

use crate::arc_uri::ArcStateUri;

/// Tracks one arc's per-lot state in the arc state store.
pub struct ArcStateManager {
    backend: Arc<dyn StorageBackend>,
    placement: Placement,
    project: Project,
    arc_name: String,
    retry: RetryPolicy,
}

impl ArcStateManager {
    /// Creates a manager for the named arc.
    #[must_use]
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        placement: Placement,
        project: Project,
        arc_name: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            placement,
            project,
            arc_name: arc_name.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Overrides the retry policy for storage calls.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn lot_uri(&self, lot_id: &str) -> ArcStateUri {
        ArcStateUri::for_placement(self.placement.clone())
            .with_project(&self.project)
            .with_arc(self.arc_name.clone())
            .with_lot(lot_id)
    }

    async fn find_markers(&self, lot_id: &str) -> Result<Vec<(String, ArcState)>> {
        let prefix = self.lot_uri(lot_id).key()?;

        let listed = self
            .retry
            .run("list arc markers", || self.backend.list(&prefix))
            .await?;

        Ok(listed
            .into_iter()
            .filter_map(|meta| {
                let state = ArcState::parse(meta.path.rsplit('/').next().unwrap_or_default())?;
                Some((meta.path, state))
            })
            .collect())
    }

    /// Returns the arc's current state for the lot, or `None` for a lot the
    /// arc has never touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if more than one marker exists for the
    /// lot, which indicates an interrupted transition that needs operator
    /// attention.
    pub async fn find_state_for(&self, lot_id: &str) -> Result<Option<ArcState>> {
        let markers = self.find_markers(lot_id).await?;

        match markers.as_slice() {
            [] => Ok(None),
            [(_, state)] => Ok(Some(*state)),
            many => Err(Error::internal(format!(
                "arc {} has {} state markers for lot {lot_id}",
                self.arc_name,
                many.len()
            ))),
        }
    }

    /// Moves the arc to `state` for the lot and returns the state it left.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the arc is already in the
    /// requested state for the lot, and [`Error::Internal`] when the lot
    /// holds more than one marker.
    pub async fn set_state_for(&self, lot_id: &str, state: ArcState) -> Result<Option<ArcState>> {
        let span = arc_span("set_state", &self.arc_name, lot_id);
        let _guard = span.enter();

        let markers = self.find_markers(lot_id).await?;
        let previous = match markers.as_slice() {
            [] => None,
            [(_, state)] => Some(*state),
            many => {
                return Err(Error::internal(format!(
                    "arc {} has {} state markers for lot {lot_id}",
                    self.arc_name,
                    many.len()
                )))
            }
        };

        if previous == Some(state) {
            return Err(Error::InvalidInput(format!(
                "arc {} is already {state} for lot {lot_id}",
                self.arc_name
            )));
        }

        if let Some(previous) = previous {
            if !previous.can_transition_to(state) {
                warn!(%previous, next = %state, "unexpected arc state transition");
            }
        }

        let key = self.lot_uri(lot_id).with_state(state).key()?;
        self.retry
            .run("put arc marker", || {
                self.backend
                    .put(&key, Bytes::new(), WritePrecondition::None)
            })
            .await?;

        for (old_key, _) in &markers {
            self.retry
                .run("delete arc marker", || self.backend.delete(old_key))
                .await?;
        }

        info!(previous = ?previous, next = %state, "arc state moved");
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotic_core::storage::MemoryBackend;

    fn placement() -> Placement {
        Placement {
            provider: "aws".into(),
            stage: Some("prod".into()),
            account: "00000000".into(),
            region: "us-west-2".into(),
        }
    }

    fn manager() -> ArcStateManager {
        ArcStateManager::new(
            Arc::new(MemoryBackend::new()),
            placement(),
            Project::new("main", "20230101"),
            "ingress",
        )
        .with_retry(RetryPolicy::fixed(1, std::time::Duration::ZERO))
    }

    const LOT: &str = "20230206PT15M095";

    #[tokio::test]
    async fn fresh_lot_has_no_state() {
        let manager = manager();
        assert_eq!(manager.find_state_for(LOT).await.unwrap(), None);
    }

    #[tokio::test]
    async fn transitions_return_the_previous_state() {
        let manager = manager();

        let before = manager.set_state_for(LOT, ArcState::Running).await.unwrap();
        assert_eq!(before, None);
        assert_eq!(
            manager.find_state_for(LOT).await.unwrap(),
            Some(ArcState::Running)
        );

        let before = manager.set_state_for(LOT, ArcState::Complete).await.unwrap();
        assert_eq!(before, Some(ArcState::Running));
        assert_eq!(
            manager.find_state_for(LOT).await.unwrap(),
            Some(ArcState::Complete)
        );
    }

    #[tokio::test]
    async fn setting_the_current_state_again_is_rejected() {
        let manager = manager();

        manager.set_state_for(LOT, ArcState::Running).await.unwrap();
        let err = manager
            .set_state_for(LOT, ArcState::Running)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(
            manager.find_state_for(LOT).await.unwrap(),
            Some(ArcState::Running)
        );
    }

    #[tokio::test]
    async fn lots_are_tracked_independently() {
        let manager = manager();

        manager.set_state_for(LOT, ArcState::Running).await.unwrap();
        manager
            .set_state_for("20230206PT15M096", ArcState::Complete)
            .await
            .unwrap();

        assert_eq!(
            manager.find_state_for(LOT).await.unwrap(),
            Some(ArcState::Running)
        );
        assert_eq!(
            manager.find_state_for("20230206PT15M096").await.unwrap(),
            Some(ArcState::Complete)
        );
    }

    #[tokio::test]
    async fn duplicate_markers_are_an_error() {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
        let manager = ArcStateManager::new(
            Arc::clone(&backend),
            placement(),
            Project::new("main", "20230101"),
            "ingress",
        );

        manager.set_state_for(LOT, ArcState::Running).await.unwrap();

        // simulate a crashed transition that left both markers behind
        let stray = manager.lot_uri(LOT).with_state(ArcState::Partial).key().unwrap();
        backend
            .put(&stray, Bytes::new(), WritePrecondition::None)
            .await
            .unwrap();

        let err = manager.find_state_for(LOT).await.unwrap_err();
        assert!(matches!(err, Error::Internal { .. }));

        // transitions refuse to pick an arbitrary previous state
        let err = manager
            .set_state_for(LOT, ArcState::Complete)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Internal { .. }));
    }
}
