//! The cloud environment a project is deployed into.

use serde::{Deserialize, Serialize};

/// Where a project is deployed in the declared provider environment.
///
/// Immutable once loaded from project configuration. Two placements are equal
/// when every field matches, and a placement is the outermost key of the
/// dataset ownership graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Cloud provider, e.g. `aws`.
    pub provider: String,
    /// Deployment stage such as `dev` or `prod`, absent for unstaged
    /// deployments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// Provider account identifier.
    pub account: String,
    /// Provider region, e.g. `us-west-2`.
    pub region: String,
}

impl Placement {
    /// Returns the colon-delimited placement id used in diagnostics.
    #[must_use]
    pub fn id(&self) -> String {
        match &self.stage {
            Some(stage) => format!(
                "{}:{stage}:{}:{}",
                self.provider, self.account, self.region
            ),
            None => format!("{}:{}:{}", self.provider, self.account, self.region),
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_includes_stage_when_present() {
        let placement = Placement {
            provider: "aws".into(),
            stage: Some("prod".into()),
            account: "00000000".into(),
            region: "us-west-2".into(),
        };

        assert_eq!(placement.id(), "aws:prod:00000000:us-west-2");
    }

    #[test]
    fn id_omits_absent_stage() {
        let placement = Placement {
            provider: "aws".into(),
            stage: None,
            account: "00000000".into(),
            region: "us-east-1".into(),
        };

        assert_eq!(placement.id(), "aws:00000000:us-east-1");
    }
}
