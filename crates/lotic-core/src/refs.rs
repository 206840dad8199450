//! Structured export references.
//!
//! A [`Ref`] names a value exported by one deployed stack so another stack can
//! import it, rendered as a colon-delimited identifier:
//!
//! `ref:<provider>:<qualifier>:<stage>:<scope>:<scope-version>:<resource-ns>:<resource-type>:<resource-name>`
//!
//! The stage segment is omitted when no stage is set. Scope version and
//! resource type are fixed values, never case-coerced.

use crate::error::{Error, Result};
use crate::label::Label;

/// The aspect of a resource an export reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// The resource's provider-assigned name.
    Name,
    /// The resource's opaque id.
    Id,
    /// The resource's full provider ARN.
    Arn,
}

impl Qualifier {
    fn label(self) -> Label {
        match self {
            Self::Name => Label::of("name"),
            Self::Id => Label::of("id"),
            Self::Arn => Label::of("arn"),
        }
    }
}

/// An identifier for a stack-exported value.
///
/// Built fluently; [`export_name`](Self::export_name) validates that every
/// required segment is present before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ref {
    provider: Label,
    qualifier: Option<Qualifier>,
    stage: Label,
    scope: Label,
    scope_version: Label,
    resource_ns: Label,
    resource_type: Label,
    resource_name: Label,
}

impl Ref {
    /// Creates an empty reference.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty reference qualified by [`Qualifier::Id`].
    #[must_use]
    pub fn id_ref() -> Self {
        Self::new().with_qualifier(Qualifier::Id)
    }

    /// Creates an empty reference qualified by [`Qualifier::Arn`].
    #[must_use]
    pub fn arn_ref() -> Self {
        Self::new().with_qualifier(Qualifier::Arn)
    }

    /// Creates an empty reference qualified by [`Qualifier::Name`].
    #[must_use]
    pub fn name_ref() -> Self {
        Self::new().with_qualifier(Qualifier::Name)
    }

    /// Returns whether a string is a rendered export reference.
    #[must_use]
    pub fn is_ref(value: &str) -> bool {
        value.starts_with("ref:")
    }

    /// Extracts the provider segment from a rendered export reference.
    #[must_use]
    pub fn provider_of(value: &str) -> Option<&str> {
        if !Self::is_ref(value) {
            return None;
        }

        value.split(':').nth(1)
    }

    /// Sets the cloud provider segment.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<Label>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Sets the deployment stage segment, dropped from the rendering when null.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<Label>) -> Self {
        self.stage = stage.into();
        self
    }

    /// Sets the owning scope, typically a project name.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<Label>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the scope version, rendered verbatim.
    #[must_use]
    pub fn with_scope_version(mut self, version: impl Into<String>) -> Self {
        self.scope_version = Label::fixed(version);
        self
    }

    /// Sets the resource namespace segment.
    #[must_use]
    pub fn with_resource_ns(mut self, ns: impl Into<Label>) -> Self {
        self.resource_ns = ns.into();
        self
    }

    /// Sets the resource type, rendered verbatim.
    #[must_use]
    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Label::fixed(resource_type);
        self
    }

    /// Sets the resource name segment.
    #[must_use]
    pub fn with_resource_name(mut self, name: impl Into<Label>) -> Self {
        self.resource_name = name.into();
        self
    }

    /// Sets the qualifier segment.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// Returns the label for just the resource portion,
    /// `<resource-ns><resource-type><resource-name>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any resource segment is unset.
    pub fn resource_label(&self) -> Result<Label> {
        require(&self.resource_ns, "resourceNs")?;
        require(&self.resource_type, "resourceType")?;
        require(&self.resource_name, "resourceName")?;

        Ok(Label::null()
            .with(self.resource_ns.clone())
            .with(self.resource_type.clone())
            .with(self.resource_name.clone()))
    }

    /// Returns the full label for this reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any required segment is unset. Only
    /// the stage is optional.
    pub fn label(&self) -> Result<Label> {
        require(&self.provider, "provider")?;
        require(&self.scope, "scope")?;
        require(&self.scope_version, "scopeVersion")?;
        require(&self.resource_ns, "resourceNs")?;
        require(&self.resource_type, "resourceType")?;
        require(&self.resource_name, "resourceName")?;

        let qualifier = self
            .qualifier
            .ok_or_else(|| Error::InvalidInput("export ref requires a qualifier".into()))?;

        Ok(Label::of("ref")
            .with(self.provider.clone())
            .with(qualifier.label())
            .with(self.stage.clone())
            .with(self.scope.clone())
            .with(self.scope_version.clone())
            .with(self.resource_ns.clone())
            .with(self.resource_type.clone())
            .with(self.resource_name.clone()))
    }

    /// Renders the colon-delimited export name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any required segment is unset.
    pub fn export_name(&self) -> Result<String> {
        Ok(self.label()?.lower_colon())
    }
}

fn require(label: &Label, name: &str) -> Result<()> {
    if label.is_null() {
        return Err(Error::InvalidInput(format!("export ref requires {name}")));
    }

    Ok(())
}
