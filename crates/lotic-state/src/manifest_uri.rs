//! Manifest object addressing.
//!
//! A [`ManifestUri`] addresses one manifest object in the manifest store:
//!
//! Identifier
//!
//! `s3://{manifest-store}/datasets/name={name}/version={version}/lot={lot}/state={state}[/attempt={n}]/manifest.json`
//!
//! Path
//!
//! `s3://{manifest-store}/datasets/name={name}/version={version}/lot={lot}/`
//!
//! The attempt segment appears only for states that carry attempt ordinals.
//! A uri with unbound fields renders as a template with `{field}`
//! placeholders, and [`ManifestUri::parse`] round-trips both forms. The
//! serde representation is the template string.

use lotic_core::error::{Error, Result};
use lotic_core::partition::Partition;
use lotic_model::dataset::Dataset;
use lotic_model::placement::Placement;
use lotic_model::state::ManifestState;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::segment::segment_value;
use crate::store::{bootstrap_store_name, StateStore};

const DATASETS: &str = "datasets";
const MANIFEST_FILE: &str = "manifest.json";

/// Address of one manifest object, concrete or templated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestUri {
    store_name: Option<String>,
    placement: Option<Placement>,
    dataset_name: Option<String>,
    dataset_version: Option<String>,
    lot_id: Option<String>,
    state: Option<ManifestState>,
    attempt: Option<String>,
}

impl ManifestUri {
    /// Creates an unbound uri against the manifest store of a placement.
    #[must_use]
    pub fn for_placement(placement: Placement) -> Self {
        Self {
            store_name: None,
            placement: Some(placement),
            dataset_name: None,
            dataset_version: None,
            lot_id: None,
            state: None,
            attempt: None,
        }
    }

    /// Binds the dataset identity.
    #[must_use]
    pub fn with_dataset(mut self, dataset: &Dataset) -> Self {
        self.dataset_name = Some(dataset.name.clone());
        self.dataset_version = Some(dataset.version.clone());
        self
    }

    /// Binds the lot id. Lot ids retain their case.
    #[must_use]
    pub fn with_lot(mut self, lot_id: impl Into<String>) -> Self {
        self.lot_id = Some(lot_id.into());
        self
    }

    /// Binds the manifest state, turning the uri into an identifier.
    #[must_use]
    pub fn with_state(mut self, state: ManifestState) -> Self {
        self.state = Some(state);
        self
    }

    /// Binds the attempt ordinal, used only by states that carry attempts.
    #[must_use]
    pub fn with_attempt(mut self, attempt: impl Into<String>) -> Self {
        self.attempt = Some(attempt.into());
        self
    }

    /// Returns the bound state, if any.
    #[must_use]
    pub fn state(&self) -> Option<ManifestState> {
        self.state
    }

    /// Returns the bound lot id, if any.
    #[must_use]
    pub fn lot_id(&self) -> Option<&str> {
        self.lot_id.as_deref()
    }

    /// Returns whether this uri is a listable prefix rather than a fully
    /// addressable identifier.
    #[must_use]
    pub fn is_path(&self) -> bool {
        self.state.is_none()
    }

    /// Returns whether this uri addresses exactly one object.
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        !self.is_path()
    }

    /// Returns the manifest store bucket name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when neither a placement nor an
    /// explicit store name is bound.
    pub fn store_name(&self) -> Result<String> {
        if let Some(name) = &self.store_name {
            return Ok(name.clone());
        }

        self.placement
            .as_ref()
            .map(|p| bootstrap_store_name(StateStore::Manifest, p))
            .ok_or_else(|| Error::InvalidInput("manifest uri requires a placement".into()))
    }

    fn attempt_segment(&self) -> Result<Option<String>> {
        match self.state {
            Some(state) if state.has_attempts() => {
                let attempt = self.attempt.as_deref().ok_or_else(|| {
                    Error::InvalidInput(format!("state {state} requires an attempt"))
                })?;
                Ok(Some(attempt.to_string()))
            }
            _ => Ok(None),
        }
    }

    /// Returns the object key relative to the manifest store.
    ///
    /// For an identifier this is the manifest object's full key; for a path
    /// it is the listable prefix with a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the dataset is unbound, the lot is
    /// unbound while a state is set, or an attempt-carrying state has no
    /// attempt.
    pub fn key(&self) -> Result<String> {
        let name = self
            .dataset_name
            .as_deref()
            .ok_or_else(|| Error::InvalidInput("manifest uri requires a dataset".into()))?;
        let version = self
            .dataset_version
            .as_deref()
            .ok_or_else(|| Error::InvalidInput("manifest uri requires a dataset version".into()))?;

        if self.state.is_some() && self.lot_id.is_none() {
            return Err(Error::InvalidInput(
                "lot id is required when a state is set".into(),
            ));
        }

        let terminal = match self.state {
            Some(state) => {
                let mut partition = Partition::of(format!("state={state}"));
                if let Some(attempt) = self.attempt_segment()? {
                    partition = partition.with_named("attempt", attempt);
                }
                Some(partition.with(MANIFEST_FILE))
            }
            None => None,
        };

        let base = Partition::of(DATASETS)
            .with_named("name", name)
            .with_named("version", version)
            .with_named("lot", self.lot_id.as_deref().unwrap_or_default());

        let rendered = match terminal {
            Some(terminal) => base.path_unless(Some(terminal.render())),
            None => base.path_unless(None),
        };

        // keys are store-relative, no leading slash
        Ok(rendered.trim_start_matches('/').to_string())
    }

    /// Returns the fully qualified uri string.
    ///
    /// # Errors
    ///
    /// See [`key`](Self::key) and [`store_name`](Self::store_name).
    pub fn uri(&self) -> Result<String> {
        Ok(format!("s3://{}/{}", self.store_name()?, self.key()?))
    }

    /// Renders the template form, with unbound fields as placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when no store can be derived.
    pub fn template(&self) -> Result<String> {
        let state_and_attempt = match self.state {
            Some(state) => {
                let mut partition = Partition::of(format!("state={state}"));
                if state.has_attempts() {
                    partition = partition
                        .with_named("attempt", self.attempt.as_deref().unwrap_or("{attempt}"));
                }
                partition
            }
            None => Partition::of("state={state}").with_literal("{/attempt*}"),
        };

        let path = Partition::new()
            .with_named("name", self.dataset_name.as_deref().unwrap_or("{datasetName}"))
            .with_named(
                "version",
                self.dataset_version.as_deref().unwrap_or("{datasetVersion}"),
            )
            .with_named("lot", self.lot_id.as_deref().unwrap_or("{lot}"))
            .with(state_and_attempt.render())
            .with(MANIFEST_FILE);

        Ok(format!(
            "s3://{}/{DATASETS}/{}",
            self.store_name()?,
            path.render()
        ))
    }

    /// Parses a concrete uri or a template back into a builder.
    ///
    /// Placeholder fields remain unbound, so
    /// `parse(x.template())` then [`uri`](Self::uri) reproduces `x.uri()`
    /// for fully bound uris.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] for strings outside the manifest key
    /// layout.
    pub fn parse(input: &str) -> Result<Self> {
        let split: Vec<&str> = input.split('/').collect();

        if split.len() < 5 || split.get(3) != Some(&DATASETS) {
            return Err(Error::Format(format!("not a manifest uri: {input}")));
        }

        let state = split.get(7).and_then(|s| ManifestState::parse(s));

        Ok(Self {
            store_name: segment_value(&split, 2),
            placement: None,
            dataset_name: segment_value(&split, 4),
            dataset_version: segment_value(&split, 5),
            lot_id: segment_value(&split, 6),
            state,
            // the attempt segment is present only for attempt-carrying states
            attempt: match state {
                Some(s) if s.has_attempts() => segment_value(&split, 8),
                _ => None,
            },
        })
    }
}

impl Serialize for ManifestUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let template = self.template().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&template)
    }
}

impl<'de> Deserialize<'de> for ManifestUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement() -> Placement {
        Placement {
            provider: "aws".into(),
            stage: Some("prod".into()),
            account: "00000000".into(),
            region: "us-west-2".into(),
        }
    }

    fn dataset() -> Dataset {
        Dataset::new("ingress", "20230101", "s3://bucket/ingress/")
    }

    fn bound() -> ManifestUri {
        ManifestUri::for_placement(placement())
            .with_dataset(&dataset())
            .with_lot("20230206PT15M095")
    }

    #[test]
    fn complete_identifier_has_no_attempt_segment() {
        let uri = bound().with_state(ManifestState::Complete).uri().unwrap();

        assert_eq!(
            uri,
            "s3://prod-lotic-manifest-00000000-us-west-2/datasets/name=ingress/version=20230101/lot=20230206PT15M095/state=complete/manifest.json"
        );
    }

    #[test]
    fn partial_identifier_includes_attempt() {
        let uri = bound()
            .with_state(ManifestState::Partial)
            .with_attempt("2")
            .uri()
            .unwrap();

        assert_eq!(
            uri,
            "s3://prod-lotic-manifest-00000000-us-west-2/datasets/name=ingress/version=20230101/lot=20230206PT15M095/state=partial/attempt=2/manifest.json"
        );
    }

    #[test]
    fn attempt_state_without_attempt_is_rejected() {
        let err = bound().with_state(ManifestState::Removed).uri().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn unbound_state_renders_a_path() {
        let uri = bound().uri().unwrap();

        assert!(bound().is_path());
        assert_eq!(
            uri,
            "s3://prod-lotic-manifest-00000000-us-west-2/datasets/name=ingress/version=20230101/lot=20230206PT15M095/"
        );
    }

    #[test]
    fn template_renders_placeholders_for_unbound_fields() {
        let template = ManifestUri::for_placement(placement())
            .with_dataset(&dataset())
            .template()
            .unwrap();

        assert_eq!(
            template,
            "s3://prod-lotic-manifest-00000000-us-west-2/datasets/name=ingress/version=20230101/lot={lot}/state={state}{/attempt*}/manifest.json"
        );
    }

    #[test]
    fn parse_round_trips_identifiers() {
        for (state, attempt) in [
            (ManifestState::Complete, None),
            (ManifestState::Empty, None),
            (ManifestState::Partial, Some("3")),
            (ManifestState::Removed, Some("1")),
        ] {
            let mut uri = bound().with_state(state);
            if let Some(attempt) = attempt {
                uri = uri.with_attempt(attempt);
            }

            let rendered = uri.uri().unwrap();
            let parsed = ManifestUri::parse(&rendered).unwrap();

            assert_eq!(parsed.uri().unwrap(), rendered);
            assert_eq!(parsed.state(), Some(state));
        }
    }

    #[test]
    fn parse_round_trips_templates() {
        let original = bound().with_state(ManifestState::Complete);
        let parsed = ManifestUri::parse(&original.template().unwrap()).unwrap();

        assert_eq!(parsed.uri().unwrap(), original.uri().unwrap());
    }

    #[test]
    fn parse_leaves_placeholders_unbound() {
        let template = ManifestUri::for_placement(placement())
            .with_dataset(&dataset())
            .template()
            .unwrap();
        let parsed = ManifestUri::parse(&template).unwrap();

        assert!(parsed.is_path());
        assert_eq!(parsed.lot_id(), None);
    }

    #[test]
    fn parse_rejects_foreign_uris() {
        assert!(ManifestUri::parse("s3://bucket/other/layout").is_err());
        assert!(ManifestUri::parse("plain string").is_err());
    }

    #[test]
    fn serde_uses_template_strings() {
        let uri = bound().with_state(ManifestState::Complete);

        let json = serde_json::to_string(&uri).unwrap();
        assert!(json.contains("state=complete"));

        let parsed: ManifestUri = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.uri().unwrap(), uri.uri().unwrap());
    }

    #[test]
    fn key_is_store_relative() {
        let key = bound().with_state(ManifestState::Complete).key().unwrap();

        assert_eq!(
            key,
            "datasets/name=ingress/version=20230101/lot=20230206PT15M095/state=complete/manifest.json"
        );
    }
}
