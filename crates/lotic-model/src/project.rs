//! The deployable project identity.

use serde::{Deserialize, Serialize};

/// A deployable unit owning resources, boundaries, and arcs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    /// Project name.
    pub name: String,
    /// Project version, conventionally a date like `20230101`.
    pub version: String,
}

impl Project {
    /// Creates a project identity.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Returns the colon-delimited project id used in diagnostics and
    /// ownership errors.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_joins_name_and_version() {
        assert_eq!(Project::new("main", "20230101").id(), "main:20230101");
    }
}
