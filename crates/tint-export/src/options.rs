//! Export configuration.

/// Default name of the property binding units and channels to tetrodes.
pub const DEFAULT_GROUP_PROPERTY: &str = "group";

/// Options controlling an export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Name of the group-membership property on both sources.
    ///
    /// Validated once at exporter construction; a sorting property merely
    /// containing this name (e.g. `ch_group`) is accepted with a warning.
    pub group_property: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            group_property: DEFAULT_GROUP_PROPERTY.to_string(),
        }
    }
}

impl ExportOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the group-membership property name.
    #[must_use]
    pub fn with_group_property(mut self, name: impl Into<String>) -> Self {
        self.group_property = name.into();
        self
    }
}
