//! # lotic-model
//!
//! Project, placement, dataset, and manifest model for the lotic pipeline
//! state platform.
//!
//! This crate holds the declarative shapes loaded at project-load time
//! (placements, projects, deployables) and the runtime records exchanged
//! through the object store and event bus (manifests, arc states,
//! notifications). The [`resolver`] binds a project's declared sources to
//! the projects that own them, once, before any arc executes.
//!
//! ## Example
//!
//! ```rust
//! use lotic_model::prelude::*;
//!
//! let dataset = Dataset::new("ingress", "20230101", "s3://bucket/ingress/");
//! assert_eq!(dataset.id(), "ingress/20230101");
//! assert!(ArcState::Running.can_transition_to(ArcState::Complete));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod dataset;
pub mod deployable;
pub mod event;
pub mod manifest;
pub mod placement;
pub mod project;
pub mod resolver;
pub mod state;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use lotic_model::prelude::*;
/// ```
pub mod prelude {
    pub use crate::dataset::{
        Dataset, OwnedDataset, ReferencedDataset, SinkDataset, SourceDataset, UriType,
    };
    pub use crate::deployable::{ArcSpec, Boundary, Deployable};
    pub use crate::event::ArcNotifyEvent;
    pub use crate::manifest::Manifest;
    pub use crate::placement::Placement;
    pub use crate::project::Project;
    pub use crate::resolver::{DatasetResolver, NoRemoteLookup, RemoteOwnerLookup};
    pub use crate::state::{ArcState, ManifestState};
}

pub use dataset::{Dataset, OwnedDataset, ReferencedDataset, SinkDataset, SourceDataset, UriType};
pub use deployable::{ArcSpec, Boundary, Deployable};
pub use event::ArcNotifyEvent;
pub use manifest::Manifest;
pub use placement::Placement;
pub use project::Project;
pub use resolver::{DatasetResolver, NoRemoteLookup, RemoteOwnerLookup};
pub use state::{ArcState, ManifestState};
