//! Composable naming algebra for deriving resource, export, and log
//! identifiers from ordered parts.
//!
//! A [`Label`] is an immutable sequence of parts. Every label renders as
//! camelCase, lower-hyphen, lower-underscore, and lower-colon, plus a "short"
//! variant of each that substitutes a part's declared abbreviation when one
//! exists. Composition with [`Label::with`] preserves each rendering's own
//! separator, the null label is a left and right identity, and the same parts
//! always produce the same strings.
//!
//! ```rust
//! use lotic_core::label::Label;
//!
//! let name = Label::of("main").with("ingress").with("v1");
//! assert_eq!(name.camel_case(), "MainIngressV1");
//! assert_eq!(name.lower_hyphen(), "main-ingress-v1");
//! ```

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Part {
    /// UpperCamel rendering of this part, or the verbatim value when fixed.
    camel: String,
    /// Abbreviation used by the short renderings, in UpperCamel.
    abbr: Option<String>,
    /// Fixed parts render verbatim in every variant, never case-coerced.
    fixed: bool,
}

impl Part {
    fn render(&self, separator: char) -> String {
        if self.fixed {
            self.camel.clone()
        } else {
            camel_to_delimited(&self.camel, separator)
        }
    }

    fn short_camel(&self) -> &str {
        self.abbr.as_deref().unwrap_or(&self.camel)
    }

    fn render_short(&self, separator: char) -> String {
        if self.fixed {
            self.camel.clone()
        } else {
            camel_to_delimited(self.short_camel(), separator)
        }
    }
}

/// An immutable, composable naming token.
///
/// The null label ([`Label::null`]) holds no parts, renders as the empty
/// string, and is the identity of [`Label::with`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Label {
    parts: Vec<Part>,
}

impl Label {
    /// Returns the null label, the identity of [`with`](Self::with).
    #[must_use]
    pub const fn null() -> Self {
        Self { parts: Vec::new() }
    }

    /// Creates a one-part label from a value in camelCase, lower-hyphen, or
    /// lower-underscore form. An empty value yields the null label.
    #[must_use]
    pub fn of(value: impl AsRef<str>) -> Self {
        let value = value.as_ref();

        if value.is_empty() {
            return Self::null();
        }

        let camel = if value.contains('-') {
            delimited_to_camel(value, '-')
        } else if value.contains('_') {
            delimited_to_camel(value, '_')
        } else {
            upper_camel(value)
        };

        Self {
            parts: vec![Part {
                camel,
                abbr: None,
                fixed: false,
            }],
        }
    }

    /// Creates a one-part label with a distinct abbreviation used only by the
    /// short renderings.
    #[must_use]
    pub fn of_abbreviated(value: impl AsRef<str>, abbr: impl AsRef<str>) -> Self {
        let mut label = Self::of(value);

        if let Some(part) = label.parts.first_mut() {
            let abbr = abbr.as_ref();
            if !abbr.is_empty() {
                part.abbr = Some(upper_camel(abbr));
            }
        }

        label
    }

    /// Creates a one-part label that renders verbatim in every variant.
    ///
    /// Useful for values with their own formatting rules, like version
    /// strings, that must not be case-coerced.
    #[must_use]
    pub fn fixed(value: impl Into<String>) -> Self {
        let value = value.into();

        if value.is_empty() {
            return Self::null();
        }

        Self {
            parts: vec![Part {
                camel: value,
                abbr: None,
                fixed: true,
            }],
        }
    }

    /// Returns whether this is the null label.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.parts.is_empty()
    }

    /// Concatenates two labels, preserving each rendering's own separator.
    ///
    /// The null label on either side returns the other unchanged, which makes
    /// composition associative with a two-sided identity.
    #[must_use]
    pub fn with(mut self, other: impl Into<Label>) -> Self {
        let other = other.into();
        self.parts.extend(other.parts);
        self
    }

    /// Appends every value in order, skipping nulls.
    #[must_use]
    pub fn having<I, T>(self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Label>,
    {
        values.into_iter().fold(self, Self::with)
    }

    /// Renders as camelCase, e.g. `MainIngressV1`.
    #[must_use]
    pub fn camel_case(&self) -> String {
        self.parts.iter().map(|p| p.camel.clone()).collect()
    }

    /// Renders as lower-hyphen, e.g. `main-ingress-v1`.
    #[must_use]
    pub fn lower_hyphen(&self) -> String {
        self.join(|p| p.render('-'), "-")
    }

    /// Renders as lower-underscore, e.g. `main_ingress_v1`.
    #[must_use]
    pub fn lower_underscore(&self) -> String {
        self.join(|p| p.render('_'), "_")
    }

    /// Renders as lower-colon, e.g. `main:ingress:v1`, the form used for
    /// export names.
    #[must_use]
    pub fn lower_colon(&self) -> String {
        self.join(|p| p.render(':'), ":")
    }

    /// camelCase with abbreviations substituted.
    #[must_use]
    pub fn short_camel_case(&self) -> String {
        self.parts.iter().map(|p| p.short_camel().to_owned()).collect()
    }

    /// Lower-hyphen with abbreviations substituted.
    #[must_use]
    pub fn short_lower_hyphen(&self) -> String {
        self.join(|p| p.render_short('-'), "-")
    }

    /// Lower-underscore with abbreviations substituted.
    #[must_use]
    pub fn short_lower_underscore(&self) -> String {
        self.join(|p| p.render_short('_'), "_")
    }

    fn join(&self, render: impl Fn(&Part) -> String, separator: &str) -> String {
        self.parts
            .iter()
            .map(render)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.camel_case())
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self::of(value)
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Self::of(value)
    }
}

impl From<&String> for Label {
    fn from(value: &String) -> Self {
        Self::of(value)
    }
}

fn upper_camel(value: &str) -> String {
    let mut chars = value.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn delimited_to_camel(value: &str, separator: char) -> String {
    value.split(separator).map(upper_camel).collect()
}

fn camel_to_delimited(camel: &str, separator: char) -> String {
    let mut out = String::with_capacity(camel.len() + 4);

    for (i, c) in camel.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push(separator);
        }
        out.extend(c.to_lowercase());
    }

    out
}
