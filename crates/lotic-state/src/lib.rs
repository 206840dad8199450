//! Lot state tracking over object storage.
//!
//! This crate turns a generic [`StorageBackend`](lotic_core::storage::StorageBackend)
//! into the two stores lotic operates: the manifest store, holding write-once
//! json manifests per (dataset, lot, state, attempt), and the arc state store,
//! holding one empty marker object per (arc, lot) whose file name is the
//! arc's current state. Uri builders render both key layouts, their template
//! forms, and the bootstrap bucket names derived from a
//! [`Placement`](lotic_model::placement::Placement).

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod arc_state;
pub mod arc_uri;
pub mod attempt;
pub mod manifest_uri;
pub mod reader;
mod segment;
pub mod store;
pub mod writer;

pub use arc_state::ArcStateManager;
pub use arc_uri::ArcStateUri;
pub use attempt::AttemptCounter;
pub use manifest_uri::ManifestUri;
pub use reader::ManifestReader;
pub use store::{bootstrap_store_name, parse_bootstrap_store_name, StateStore};
pub use writer::ManifestWriter;

/// Commonly used types, importable as a unit.
pub mod prelude {
    pub use crate::arc_state::ArcStateManager;
    pub use crate::arc_uri::ArcStateUri;
    pub use crate::manifest_uri::ManifestUri;
    pub use crate::reader::ManifestReader;
    pub use crate::store::StateStore;
    pub use crate::writer::ManifestWriter;
}
