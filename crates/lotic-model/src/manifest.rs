//! The manifest record, one lot's produced object references.

use lotic_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::dataset::UriType;
use crate::state::ManifestState;

/// The record of all object references produced for one lot of one dataset.
///
/// Serialized as JSON and stored write-once at the key derived from the
/// dataset, lot, and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// The disposition this manifest records.
    pub state: ManifestState,
    /// Free-form operator comment, e.g. the reason a lot was removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// The lot this manifest covers.
    pub lot_id: String,
    /// How the listed URIs address data.
    #[serde(default)]
    pub uri_type: UriType,
    /// The produced object references, in production order. Empty for
    /// [`ManifestState::Empty`] lots.
    pub uris: Vec<String>,
}

impl Manifest {
    /// File extension of stored manifests.
    pub const EXTENSION: &'static str = "json";
    /// Content type of stored manifests.
    pub const CONTENT_TYPE: &'static str = "application/json";

    /// Serializes to the stored JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Deserializes from the stored JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the bytes are not a valid
    /// manifest.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::serialization(e.to_string()))
    }
}
