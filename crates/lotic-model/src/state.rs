//! Manifest and arc state enums.
//!
//! [`ManifestState`] is the terminal disposition of one lot of one dataset.
//! [`ArcState`] is the live progress marker of one lot of one arc. Both embed
//! in object keys, manifests under `state=<value>` segments and arc markers
//! as `<value>.arc` file names, and both parse back out of those keys.

use serde::{Deserialize, Serialize};

/// The disposition of one lot of one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestState {
    /// The lot's output is complete.
    Complete,
    /// The lot's output is incomplete; carries an attempt ordinal.
    Partial,
    /// The lot produced no data.
    Empty,
    /// The lot's output was removed operationally; carries an attempt ordinal.
    Removed,
}

impl ManifestState {
    /// All states, in declaration order.
    pub const ALL: [Self; 4] = [Self::Complete, Self::Partial, Self::Empty, Self::Removed];

    /// Returns the lowercase name embedded in object keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Partial => "partial",
            Self::Empty => "empty",
            Self::Removed => "removed",
        }
    }

    /// Returns whether manifests in this state carry an attempt ordinal.
    #[must_use]
    pub const fn has_attempts(&self) -> bool {
        matches!(self, Self::Partial | Self::Removed)
    }

    /// Finds the state named in a key segment.
    ///
    /// Accepts the bare name, a `key=value` segment, or a file name with an
    /// extension, e.g. `partial`, `state=partial`, or `partial.json`.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        let name = state_name_of(segment)?;

        Self::ALL.iter().copied().find(|s| s.as_str() == name)
    }
}

impl std::fmt::Display for ManifestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The progress of one lot of one arc.
///
/// Exactly one marker object exists per (arc, lot); no marker means the lot
/// never started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcState {
    /// The lot's workload is executing.
    Running,
    /// The lot finished with complete output.
    Complete,
    /// The lot finished with partial output.
    Partial,
    /// The lot finished with no output.
    Empty,
    /// A gap lot detected after the fact, never started.
    Missing,
}

impl ArcState {
    /// All states, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Running,
        Self::Complete,
        Self::Partial,
        Self::Empty,
        Self::Missing,
    ];

    /// Returns the lowercase name embedded in marker file names.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Partial => "partial",
            Self::Empty => "empty",
            Self::Missing => "missing",
        }
    }

    /// Returns whether the transition from `self` to `next` is legal.
    ///
    /// Legality is enforced by the event handlers that call the state
    /// manager, not by the manager itself.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Running, Self::Complete | Self::Partial | Self::Empty)
                | (Self::Partial, Self::Running | Self::Missing)
                | (Self::Missing, Self::Running | Self::Partial)
        )
    }

    /// Finds the state named in a key segment or marker file name.
    ///
    /// Accepts the bare name, a `key=value` segment, or a marker file name,
    /// e.g. `running`, `state=running`, or `running.arc`.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        let name = state_name_of(segment)?;

        Self::ALL.iter().copied().find(|s| s.as_str() == name)
    }
}

impl std::fmt::Display for ArcState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strips an optional `key=` prefix and `.extension` suffix from a segment.
fn state_name_of(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return None;
    }

    let segment = segment.to_ascii_lowercase();
    let after_key = segment.rsplit('=').next().unwrap_or(&segment);
    let name = after_key.split('.').next().unwrap_or(after_key);

    if name.is_empty() {
        return None;
    }

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_attempts() {
        assert!(ManifestState::Partial.has_attempts());
        assert!(ManifestState::Removed.has_attempts());
        assert!(!ManifestState::Complete.has_attempts());
        assert!(!ManifestState::Empty.has_attempts());
    }

    #[test]
    fn manifest_parse_accepts_key_segments() {
        assert_eq!(ManifestState::parse("partial"), Some(ManifestState::Partial));
        assert_eq!(
            ManifestState::parse("state=complete"),
            Some(ManifestState::Complete)
        );
        assert_eq!(
            ManifestState::parse("REMOVED.json"),
            Some(ManifestState::Removed)
        );
        assert_eq!(ManifestState::parse("state=unknown"), None);
        assert_eq!(ManifestState::parse(""), None);
    }

    #[test]
    fn arc_parse_accepts_marker_names() {
        assert_eq!(ArcState::parse("running.arc"), Some(ArcState::Running));
        assert_eq!(ArcState::parse("missing"), Some(ArcState::Missing));
        assert_eq!(ArcState::parse("state=empty"), Some(ArcState::Empty));
        assert_eq!(ArcState::parse("done.arc"), None);
    }

    #[test]
    fn arc_transition_table() {
        use ArcState::{Complete, Empty, Missing, Partial, Running};

        assert!(Running.can_transition_to(Complete));
        assert!(Running.can_transition_to(Partial));
        assert!(Running.can_transition_to(Empty));
        assert!(!Running.can_transition_to(Missing));
        assert!(!Running.can_transition_to(Running));

        assert!(Partial.can_transition_to(Running));
        assert!(Partial.can_transition_to(Missing));
        assert!(!Partial.can_transition_to(Complete));

        assert!(Missing.can_transition_to(Running));
        assert!(Missing.can_transition_to(Partial));
        assert!(!Missing.can_transition_to(Empty));

        // terminal success states go nowhere
        for next in ArcState::ALL {
            assert!(!Complete.can_transition_to(next));
            assert!(!Empty.can_transition_to(next));
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&ManifestState::Partial).unwrap(),
            "\"partial\""
        );
        assert_eq!(
            serde_json::from_str::<ArcState>("\"missing\"").unwrap(),
            ArcState::Missing
        );
    }
}
