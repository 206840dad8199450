//! Hierarchical object-key algebra.
//!
//! A [`Partition`] accumulates ordered path segments, plain (`value`), named
//! (`key=value`), or literal (appended without a separator, for file
//! extensions). A partition can be sealed by a terminal segment, after which
//! further appends are ignored. Sealing lets one builder describe both a
//! prefix (listable) and a fully bound key without branching at every step.
//!
//! ```rust
//! use lotic_core::partition::Partition;
//!
//! let key = Partition::of("datasets")
//!     .with_named("name", "ingress")
//!     .with_named("lot", "20230206PT15M095")
//!     .with("manifest.json");
//! assert_eq!(key.render(), "datasets/name=ingress/lot=20230206PT15M095/manifest.json");
//! ```

use crate::label::Label;

/// An ordered, optionally sealed sequence of object-key segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Partition {
    rendered: String,
    sealed: bool,
}

impl Partition {
    /// Creates an empty partition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a partition from a single leading segment.
    #[must_use]
    pub fn of(value: impl AsRef<str>) -> Self {
        Self::new().with(value)
    }

    /// Returns whether no segment has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    /// Returns whether a terminal has sealed this partition.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Appends a plain segment, joined by `/`.
    ///
    /// Empty and slash-only values are dropped, and sealed partitions ignore
    /// every append.
    #[must_use]
    pub fn with(mut self, value: impl AsRef<str>) -> Self {
        let value = value.as_ref();

        if self.sealed || value.is_empty() || value.bytes().all(|b| b == b'/') {
            return self;
        }

        if !self.rendered.is_empty() {
            self.rendered.push('/');
        }
        self.rendered.push_str(value);
        self
    }

    /// Appends a label as a segment, in its lower-hyphen rendering.
    #[must_use]
    pub fn with_label(self, label: &Label) -> Self {
        self.with(label.lower_hyphen())
    }

    /// Appends a `key=value` segment, dropped entirely when the value is
    /// empty.
    #[must_use]
    pub fn with_named(self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let value = value.as_ref();

        if value.is_empty() {
            return self;
        }

        self.with(format!("{}={value}", key.as_ref()))
    }

    /// Appends a `key=value` segment, or seals the partition when the value
    /// is absent.
    #[must_use]
    pub fn with_named_terminal(self, key: impl AsRef<str>, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.with_named(key, value),
            _ => self.seal(),
        }
    }

    /// Appends a plain segment, or seals the partition when the value is
    /// absent.
    #[must_use]
    pub fn with_terminal(self, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with(value),
            None => self.seal(),
        }
    }

    /// Appends a literal directly to the previous segment with no separator,
    /// e.g. a file extension.
    #[must_use]
    pub fn with_literal(mut self, value: impl AsRef<str>) -> Self {
        if self.sealed {
            return self;
        }

        self.rendered.push_str(value.as_ref());
        self
    }

    fn seal(mut self) -> Self {
        self.sealed = true;
        self
    }

    /// Renders with no leading or trailing slash, e.g. `year=2023/month=12`.
    #[must_use]
    pub fn render(&self) -> &str {
        &self.rendered
    }

    /// Renders with a leading and trailing slash, e.g. `/year=2023/month=12/`.
    #[must_use]
    pub fn path(&self) -> String {
        if self.is_empty() {
            return "/".into();
        }

        format!("/{}/", self.rendered)
    }

    /// Renders with only a leading slash, e.g. `/year=2023/month=12`.
    #[must_use]
    pub fn prefix(&self) -> String {
        format!("/{}", self.rendered)
    }

    /// Renders as a path when `object` is absent, otherwise appends `object`
    /// and renders as a prefix addressing that final object.
    #[must_use]
    pub fn path_unless(&self, object: Option<&str>) -> String {
        match object {
            Some(object) if !object.is_empty() => self.clone().with(object).prefix(),
            _ => self.path(),
        }
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_segments_render_in_order() {
        let partition = Partition::of("datasets")
            .with_named("name", "ingress")
            .with_named("version", "20230101")
            .with_named("lot", "20230206PT15M095");

        assert_eq!(
            partition.render(),
            "datasets/name=ingress/version=20230101/lot=20230206PT15M095"
        );
    }

    #[test]
    fn empty_values_are_dropped() {
        let partition = Partition::of("a").with("").with("/").with("b").with_named("k", "");

        assert_eq!(partition.render(), "a/b");
    }

    #[test]
    fn literal_appends_without_separator() {
        let partition = Partition::of("lot=20230206PT15M095").with("complete").with_literal(".arc");

        assert_eq!(partition.render(), "lot=20230206PT15M095/complete.arc");
    }

    #[test]
    fn terminal_seals_further_appends() {
        let partition = Partition::of("datasets")
            .with_named("name", "ingress")
            .with_named_terminal("state", None)
            .with_named("attempt", "2")
            .with("manifest.json");

        assert_eq!(partition.render(), "datasets/name=ingress");
        assert!(partition.is_sealed());
    }

    #[test]
    fn terminal_with_value_keeps_appending() {
        let partition = Partition::of("datasets")
            .with_named_terminal("state", Some("partial"))
            .with_named("attempt", "2");

        assert_eq!(partition.render(), "datasets/state=partial/attempt=2");
        assert!(!partition.is_sealed());
    }

    #[test]
    fn path_and_prefix_forms() {
        let partition = Partition::of("year=2023").with_named("month", "12");

        assert_eq!(partition.render(), "year=2023/month=12");
        assert_eq!(partition.path(), "/year=2023/month=12/");
        assert_eq!(partition.prefix(), "/year=2023/month=12");
        assert_eq!(partition.path_unless(None), "/year=2023/month=12/");
        assert_eq!(
            partition.path_unless(Some("file.txt")),
            "/year=2023/month=12/file.txt"
        );
    }

    #[test]
    fn labels_render_lower_hyphen() {
        let partition = Partition::of("arcs").with_label(&Label::of("MainIngress"));

        assert_eq!(partition.render(), "arcs/main-ingress");
    }

    #[test]
    fn empty_partition_path_is_root() {
        assert_eq!(Partition::new().path(), "/");
        assert!(Partition::new().is_empty());
    }
}
