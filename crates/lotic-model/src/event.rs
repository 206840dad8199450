//! The notification record exchanged over the event bus.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::dataset::Dataset;

/// A lot-completion notification passed between arc state machines.
///
/// This is the JSON observed on and subscribed to on the event bus. The
/// serialized form carries a read-only `datasetId` field, the dataset name
/// and version joined by `/`, so listeners can pattern-match a single string
/// instead of two nested fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcNotifyEvent {
    /// The dataset whose lot completed.
    pub dataset: Dataset,
    /// The completed lot.
    pub lot_id: String,
    /// URI of the manifest recording the lot's output.
    pub manifest: String,
}

impl ArcNotifyEvent {
    /// Event source attribute published to the bus.
    pub const SOURCE: &'static str = "lotic.arc";
    /// Event detail type attribute published to the bus.
    pub const DETAIL: &'static str = "Lotic Arc Notification";

    /// Creates a notification.
    #[must_use]
    pub fn new(dataset: Dataset, lot_id: impl Into<String>, manifest: impl Into<String>) -> Self {
        Self {
            dataset,
            lot_id: lot_id.into(),
            manifest: manifest.into(),
        }
    }

    /// Returns the pattern-matchable dataset id, name and version joined by
    /// `/`.
    #[must_use]
    pub fn dataset_id(&self) -> String {
        Self::create_dataset_id(&self.dataset.name, &self.dataset.version)
    }

    /// Builds the dataset id listeners subscribe on.
    #[must_use]
    pub fn create_dataset_id(name: &str, version: &str) -> String {
        format!("{name}/{version}")
    }
}

impl Serialize for ArcNotifyEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ArcNotifyEvent", 4)?;
        state.serialize_field("dataset", &self.dataset)?;
        state.serialize_field("lotId", &self.lot_id)?;
        state.serialize_field("manifest", &self.manifest)?;
        state.serialize_field("datasetId", &self.dataset_id())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> ArcNotifyEvent {
        ArcNotifyEvent::new(
            Dataset::new("ingress", "20230101", "s3://bucket/ingress/"),
            "20230206PT15M095",
            "s3://manifests/datasets/name=ingress/version=20230101/lot=20230206PT15M095/state=complete/manifest.json",
        )
    }

    #[test]
    fn serialized_form_carries_dataset_id() {
        let value = serde_json::to_value(event()).unwrap();

        assert_eq!(value["datasetId"], "ingress/20230101");
        assert_eq!(value["lotId"], "20230206PT15M095");
        assert_eq!(value["dataset"]["pathURI"], "s3://bucket/ingress/");
    }

    #[test]
    fn deserializes_with_or_without_dataset_id() {
        let with_id = serde_json::to_string(&event()).unwrap();
        let parsed: ArcNotifyEvent = serde_json::from_str(&with_id).unwrap();
        assert_eq!(parsed, event());

        let without_id = r#"{
            "dataset": {"name":"ingress","version":"20230101","pathURI":"s3://bucket/ingress/"},
            "lotId": "20230206PT15M095",
            "manifest": "s3://manifests/m.json"
        }"#;
        let parsed: ArcNotifyEvent = serde_json::from_str(without_id).unwrap();
        assert_eq!(parsed.dataset_id(), "ingress/20230101");
    }
}
