//! Dataset ownership resolution.
//!
//! Maps every referenced dataset to the one project that owns it, across the
//! full set of loaded deployables. The build runs once at project-load time
//! and fails fast: a referenced dataset with no owner or with more than one
//! owner aborts before any arc executes. After a successful build the
//! binding map is immutable and [`DatasetResolver::locate`] is a plain
//! lookup.

use std::collections::HashMap;

use lotic_core::error::{Error, Result};
use tracing::{error, info};

use crate::dataset::{OwnedDataset, ReferencedDataset, SourceDataset};
use crate::deployable::Deployable;
use crate::placement::Placement;
use crate::project::Project;

/// Looks up a dataset owner outside the locally loaded deployables, e.g. in
/// a metadata store of previously deployed projects.
pub trait RemoteOwnerLookup {
    /// Returns the owner of `source` in `placement`, if known remotely.
    fn lookup(&self, placement: &Placement, source: &SourceDataset) -> Option<OwnedDataset>;
}

/// A [`RemoteOwnerLookup`] that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemoteLookup;

impl RemoteOwnerLookup for NoRemoteLookup {
    fn lookup(&self, _placement: &Placement, _source: &SourceDataset) -> Option<OwnedDataset> {
        None
    }
}

/// The precomputed binding of referenced datasets to their owners.
///
/// Prevents a new project from silently claiming a dataset another project
/// already owns, and lets a project declare read access to data it does not
/// own.
#[derive(Debug)]
pub struct DatasetResolver {
    resolved: HashMap<Placement, HashMap<ReferencedDataset, OwnedDataset>>,
}

impl DatasetResolver {
    /// Builds the binding map from the loaded deployables, with no remote
    /// lookup.
    ///
    /// # Errors
    ///
    /// See [`build_with_lookup`](Self::build_with_lookup).
    pub fn build(deployables: &[Deployable]) -> Result<Self> {
        Self::build_with_lookup(deployables, &NoRemoteLookup)
    }

    /// Builds the binding map, consulting `remote` for datasets no local
    /// deployable owns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OwnerNotFound`] if a referenced dataset has no owner
    /// anywhere, and [`Error::AmbiguousOwnership`] if more than one project
    /// claims the same dataset within a placement.
    pub fn build_with_lookup(
        deployables: &[Deployable],
        remote: &dyn RemoteOwnerLookup,
    ) -> Result<Self> {
        let mut referenced: HashMap<&Placement, Vec<ReferencedDataset>> = HashMap::new();
        let mut owned: HashMap<&Placement, Vec<OwnedDataset>> = HashMap::new();

        for deployable in deployables {
            let placement = &deployable.placement;
            let project = &deployable.project;

            for boundary in &deployable.boundaries {
                owned
                    .entry(placement)
                    .or_default()
                    .push(OwnedDataset::new(project.clone(), boundary.dataset.clone()));
            }

            for arc in &deployable.arcs {
                for source in arc.sources.values() {
                    referenced
                        .entry(placement)
                        .or_default()
                        .push(ReferencedDataset::new(project.clone(), source.clone()));
                }

                for sink in arc.sinks.values() {
                    owned
                        .entry(placement)
                        .or_default()
                        .push(OwnedDataset::new(project.clone(), sink.clone()));
                }
            }
        }

        let mut resolved: HashMap<Placement, HashMap<ReferencedDataset, OwnedDataset>> =
            HashMap::new();

        for (placement, references) in referenced {
            let locally_owned = owned.get(placement).map_or(&[][..], Vec::as_slice);

            for reference in references {
                let mut owners: Vec<OwnedDataset> = Vec::new();

                for candidate in locally_owned {
                    if candidate.dataset.dataset.same_dataset(&reference.dataset.dataset)
                        && !owners.contains(candidate)
                    {
                        owners.push(candidate.clone());
                    }
                }

                if owners.is_empty() {
                    info!(
                        dataset = %reference.dataset.dataset.id(),
                        "dataset owner not found locally, looking up remotely"
                    );

                    if let Some(found) = remote.lookup(placement, &reference.dataset) {
                        owners.push(found);
                    }
                }

                let owner = match owners.len() {
                    0 => {
                        let dataset = reference.dataset.dataset.id();
                        error!(dataset, "dataset owner not found");
                        return Err(Error::OwnerNotFound { dataset });
                    }
                    1 => owners.remove(0),
                    _ => {
                        let dataset = reference.dataset.dataset.id();
                        let mut project_ids: Vec<String> =
                            owners.iter().map(|o| o.owner.id()).collect();
                        project_ids.sort();
                        project_ids.dedup();
                        error!(dataset, owners = ?project_ids, "dataset is owned by multiple projects");
                        return Err(Error::AmbiguousOwnership {
                            dataset,
                            owners: project_ids,
                        });
                    }
                };

                resolved
                    .entry(placement.clone())
                    .or_default()
                    .insert(reference, owner);
            }
        }

        Ok(Self { resolved })
    }

    /// Finds the owner binding recorded for the given dependent project and
    /// source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OwnerNotFound`] for any lookup that was not part of
    /// the build, whether the placement or the (project, source) pair is the
    /// stranger.
    pub fn locate(
        &self,
        placement: &Placement,
        dependent: &Project,
        source: &SourceDataset,
    ) -> Result<&OwnedDataset> {
        let reference = ReferencedDataset::new(dependent.clone(), source.clone());

        self.resolved
            .get(placement)
            .and_then(|bindings| bindings.get(&reference))
            .ok_or_else(|| Error::OwnerNotFound {
                dataset: reference.dataset.dataset.id(),
            })
    }
}
