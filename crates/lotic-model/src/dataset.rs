//! Dataset identities and their role-qualified views.
//!
//! A [`Dataset`] is the base identity of a unit of data. Arcs consume
//! [`SourceDataset`]s and produce [`SinkDataset`]s; the resolver pairs a
//! consumer with the project that owns the data via [`OwnedDataset`] and
//! [`ReferencedDataset`].

use serde::{Deserialize, Serialize};

use crate::project::Project;

/// The base identity of a unit of data.
///
/// Two datasets are the same dataset iff name, version, and path URI all
/// match ([`same_dataset`](Self::same_dataset)).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset name.
    pub name: String,
    /// Dataset version, conventionally a date like `20230101`.
    pub version: String,
    /// Prefix URI of the dataset's stored objects.
    #[serde(rename = "pathURI")]
    pub path_uri: String,
}

impl Dataset {
    /// Creates a dataset identity.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        path_uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            path_uri: path_uri.into(),
        }
    }

    /// Returns the dataset id, dataset name and version joined by `/`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    /// Returns whether both values identify the same dataset.
    #[must_use]
    pub fn same_dataset(&self, other: &Dataset) -> bool {
        self.name == other.name && self.version == other.version && self.path_uri == other.path_uri
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// How the URIs listed in a manifest address data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UriType {
    /// Each URI addresses exactly one object.
    #[default]
    Identifier,
    /// Each URI is a path with a trailing slash.
    Path,
    /// Each URI is a bare key prefix.
    Prefix,
}

/// A dataset consumed by an arc.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceDataset {
    /// The dataset identity, which must already exist upstream.
    #[serde(flatten)]
    pub dataset: Dataset,
    /// Whether arrival events for this dataset are subscribed to.
    #[serde(default = "default_true")]
    pub subscribe: bool,
}

impl SourceDataset {
    /// Creates a subscribed source over the given dataset.
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            subscribe: true,
        }
    }
}

/// A dataset produced by an arc or boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SinkDataset {
    /// The dataset identity this arc is responsible for creating.
    #[serde(flatten)]
    pub dataset: Dataset,
    /// Whether completion events for this dataset are published.
    #[serde(skip, default = "default_true")]
    pub publish: bool,
}

impl SinkDataset {
    /// Creates a publishing sink over the given dataset.
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            publish: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A dataset produced and owned by exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnedDataset {
    /// The owning project.
    pub owner: Project,
    /// The owned sink dataset.
    pub dataset: SinkDataset,
}

impl OwnedDataset {
    /// Creates an ownership record.
    #[must_use]
    pub fn new(owner: Project, dataset: SinkDataset) -> Self {
        Self { owner, dataset }
    }

    /// Returns the owning project id joined with the dataset id.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}:{}", self.owner.id(), self.dataset.dataset.id())
    }
}

/// A dataset consumed by a project that does not own it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferencedDataset {
    /// The consuming project.
    pub dependent: Project,
    /// The referenced source dataset.
    pub dataset: SourceDataset,
}

impl ReferencedDataset {
    /// Creates a reference record.
    #[must_use]
    pub fn new(dependent: Project, dataset: SourceDataset) -> Self {
        Self { dependent, dataset }
    }
}
