//! Arc state marker addressing.
//!
//! An [`ArcStateUri`] addresses one arc state marker in the arc state store:
//!
//! Identifier
//!
//! `s3://{arc-state-store}/arcs/project={name}/version={version}/arc={arc}/lot={lot}/{state}.arc`
//!
//! Path
//!
//! `s3://{arc-state-store}/arcs/project={name}/version={version}/arc={arc}/lot={lot}/`
//!
//! Arc markers are flat, the state is the file name and there is no attempt
//! segment; only manifests carry attempts. The serde representation is the
//! template string.

use lotic_core::error::{Error, Result};
use lotic_core::partition::Partition;
use lotic_model::placement::Placement;
use lotic_model::project::Project;
use lotic_model::state::ArcState;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::segment::segment_value;
use crate::store::{bootstrap_store_name, StateStore};

const ARCS: &str = "arcs";
const ARC_EXTENSION: &str = ".arc";

/// Address of one arc state marker, concrete or templated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcStateUri {
    store_name: Option<String>,
    placement: Option<Placement>,
    project_name: Option<String>,
    project_version: Option<String>,
    arc_name: Option<String>,
    lot_id: Option<String>,
    state: Option<ArcState>,
}

impl ArcStateUri {
    /// Creates an unbound uri against the arc state store of a placement.
    #[must_use]
    pub fn for_placement(placement: Placement) -> Self {
        Self {
            store_name: None,
            placement: Some(placement),
            project_name: None,
            project_version: None,
            arc_name: None,
            lot_id: None,
            state: None,
        }
    }

    /// Binds the owning project.
    #[must_use]
    pub fn with_project(mut self, project: &Project) -> Self {
        self.project_name = Some(project.name.clone());
        self.project_version = Some(project.version.clone());
        self
    }

    /// Binds the arc name.
    #[must_use]
    pub fn with_arc(mut self, arc_name: impl Into<String>) -> Self {
        self.arc_name = Some(arc_name.into());
        self
    }

    /// Binds the lot id. Lot ids retain their case.
    #[must_use]
    pub fn with_lot(mut self, lot_id: impl Into<String>) -> Self {
        self.lot_id = Some(lot_id.into());
        self
    }

    /// Binds the arc state, turning the uri into an identifier.
    #[must_use]
    pub fn with_state(mut self, state: ArcState) -> Self {
        self.state = Some(state);
        self
    }

    /// Returns the bound state, if any.
    #[must_use]
    pub fn state(&self) -> Option<ArcState> {
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

    /// Returns whether this uri addresses exactly one marker.
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        !self.is_path()
    }

    /// Returns the arc state store bucket name.
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
            .map(|p| bootstrap_store_name(StateStore::Arc, p))
            .ok_or_else(|| Error::InvalidInput("arc state uri requires a placement".into()))
    }

    /// Returns the object key relative to the arc state store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the project is unbound or the lot
    /// is unbound while a state is set.
    pub fn key(&self) -> Result<String> {
        let project_name = self
            .project_name
            .as_deref()
            .ok_or_else(|| Error::InvalidInput("arc state uri requires a project".into()))?;
        let project_version = self.project_version.as_deref().ok_or_else(|| {
            Error::InvalidInput("arc state uri requires a project version".into())
        })?;

        if self.state.is_some() && self.lot_id.is_none() {
            return Err(Error::InvalidInput(
                "lot id is required when a state is set".into(),
            ));
        }

        let marker = self.state.map(|s| format!("{s}{ARC_EXTENSION}"));

        let rendered = Partition::of(ARCS)
            .with_named("project", project_name)
            .with_named("version", project_version)
            .with_named("arc", self.arc_name.as_deref().unwrap_or_default())
            .with_named("lot", self.lot_id.as_deref().unwrap_or_default())
            .path_unless(marker.as_deref());

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
        let marker = self
            .state
            .map_or_else(|| format!("{{state}}{ARC_EXTENSION}"), |s| format!("{s}{ARC_EXTENSION}"));

        let path = Partition::new()
            .with_named("project", self.project_name.as_deref().unwrap_or("{projectName}"))
            .with_named(
                "version",
                self.project_version.as_deref().unwrap_or("{projectVersion}"),
            )
            .with_named("arc", self.arc_name.as_deref().unwrap_or("{arcName}"))
            .with_named("lot", self.lot_id.as_deref().unwrap_or("{lot}"))
            .with(marker);

        Ok(format!("s3://{}/{ARCS}/{}", self.store_name()?, path.render()))
    }

    /// Parses a concrete uri or a template back into a builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] for strings outside the arc state key
    /// layout.
    pub fn parse(input: &str) -> Result<Self> {
        let split: Vec<&str> = input.split('/').collect();

        if split.len() < 5 || split.get(3) != Some(&ARCS) {
            return Err(Error::Format(format!("not an arc state uri: {input}")));
        }

        Ok(Self {
            store_name: segment_value(&split, 2),
            placement: None,
            project_name: segment_value(&split, 4),
            project_version: segment_value(&split, 5),
            arc_name: segment_value(&split, 6),
            lot_id: segment_value(&split, 7),
            state: split.get(8).and_then(|s| ArcState::parse(s)),
        })
    }
}

impl Serialize for ArcStateUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let template = self.template().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&template)
    }
}

impl<'de> Deserialize<'de> for ArcStateUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}
