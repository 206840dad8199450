//! The loaded shape of one deployable project.
//!
//! A [`Deployable`] is a project bound to its placement, with the boundaries
//! and arcs that declare which datasets it owns and which it references.
//! This is the resolver's input; the configuration loader produces it from
//! declarative project files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{SinkDataset, SourceDataset};
use crate::placement::Placement;
use crate::project::Project;

/// A declared ingestion point producing one owned dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    /// Boundary name, unique within its project.
    pub name: String,
    /// The dataset this boundary produces and the project owns.
    pub dataset: SinkDataset,
}

/// A declared pipeline step consuming sources and producing sinks.
///
/// Sources and sinks are keyed by role name; keys are ordered so derived
/// names and keys are stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcSpec {
    /// Arc name, unique within its project.
    pub name: String,
    /// Consumed datasets by role.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceDataset>,
    /// Produced datasets by role.
    #[serde(default)]
    pub sinks: BTreeMap<String, SinkDataset>,
}

/// One project bound to its deployment placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployable {
    /// Where the project deploys.
    pub placement: Placement,
    /// The project identity.
    pub project: Project,
    /// Declared ingestion boundaries.
    #[serde(default)]
    pub boundaries: Vec<Boundary>,
    /// Declared arcs.
    #[serde(default)]
    pub arcs: Vec<ArcSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    #[test]
    fn deserializes_minimal_deployable() {
        let json = r#"{
            "placement": {"provider":"aws","account":"00000000","region":"us-west-2"},
            "project": {"name":"main","version":"20230101"}
        }"#;

        let deployable: Deployable = serde_json::from_str(json).unwrap();

        assert!(deployable.boundaries.is_empty());
        assert!(deployable.arcs.is_empty());
        assert_eq!(deployable.project.id(), "main:20230101");
    }

    #[test]
    fn arc_roles_are_ordered() {
        let mut arc = ArcSpec {
            name: "copy".into(),
            sources: BTreeMap::new(),
            sinks: BTreeMap::new(),
        };
        arc.sinks.insert(
            "second".into(),
            SinkDataset::new(Dataset::new("b", "1", "s3://b/")),
        );
        arc.sinks.insert(
            "first".into(),
            SinkDataset::new(Dataset::new("a", "1", "s3://a/")),
        );

        let roles: Vec<_> = arc.sinks.keys().cloned().collect();
        assert_eq!(roles, ["first", "second"]);
    }
}
