//! The bootstrap state stores and their bucket naming scheme.
//!
//! Every placement is bootstrapped with three buckets before any project
//! deploys. Bucket names are derived deterministically from the placement so
//! handlers can address them from configuration strings alone:
//!
//! `[{stage}-]lotic-{store}-{account}-{region}`

use lotic_core::label::Label;
use lotic_model::placement::Placement;

/// The object-store locations used to persist platform state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateStore {
    /// Arc state markers.
    Arc,
    /// Dataset manifests.
    Manifest,
    /// Project metadata.
    Meta,
}

impl StateStore {
    /// All stores, in declaration order.
    pub const ALL: [Self; 3] = [Self::Arc, Self::Manifest, Self::Meta];

    /// Returns the store's label as embedded in bucket names.
    #[must_use]
    pub fn label(&self) -> Label {
        match self {
            Self::Arc => Label::of("arcState"),
            Self::Manifest => Label::of("manifest"),
            Self::Meta => Label::of("meta"),
        }
    }

    /// Returns the lower-hyphen store name segment.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arc => "arc-state",
            Self::Manifest => "manifest",
            Self::Meta => "meta",
        }
    }
}

impl std::fmt::Display for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derives the bootstrap bucket name for a store in a placement.
///
/// The stage prefix is dropped for unstaged placements.
#[must_use]
pub fn bootstrap_store_name(store: StateStore, placement: &Placement) -> String {
    let stage = placement
        .stage
        .as_deref()
        .map_or_else(Label::null, Label::of);

    stage
        .with("lotic")
        .with(store.label())
        .with(Label::fixed(placement.account.clone()))
        .with(placement.region.as_str())
        .lower_hyphen()
}

/// Recovers the placement encoded in a bootstrap bucket name.
///
/// Returns the matching store and a placement with the provider defaulted to
/// `aws`; bucket names do not carry the provider. Returns `None` for names
/// outside the bootstrap scheme.
#[must_use]
pub fn parse_bootstrap_store_name(name: &str) -> Option<(StateStore, Placement)> {
    let (stage, rest) = match name.split_once("lotic-") {
        Some(("", rest)) => (None, rest),
        Some((prefix, rest)) => (Some(prefix.strip_suffix('-')?.to_string()), rest),
        None => return None,
    };

    let store = StateStore::ALL
        .into_iter()
        .find(|s| rest.starts_with(&format!("{}-", s.as_str())))?;

    let rest = &rest[store.as_str().len() + 1..];
    let (account, region) = rest.split_once('-')?;

    if account.is_empty() || region.is_empty() {
        return None;
    }

    Some((
        store,
        Placement {
            provider: "aws".into(),
            stage,
            account: account.into(),
            region: region.into(),
        },
    ))
}
