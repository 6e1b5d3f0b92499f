//! Configuration for the synthesis engine and its host.
//!
//! Both structs follow the builder style: start from `default()`, override with `with_*`.

/// Naming choices for generated shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthOptions {
    /// Leading segment of every container name.
    pub container_prefix: String,
    /// Base name of the generated type; a unique sequence suffix is always appended.
    pub type_name: String,
    /// Prepended to the property name (first character lower-cased) to name the backing field.
    pub field_prefix: String,
    /// Longest property-name hint carried into a container name.
    pub hint_max_len: usize,
}

impl Default for SynthOptions {
    fn default() -> Self {
        // Shapes read like the hand-written fixtures they replace: `Foo` with a `_bar` field.
        Self {
            container_prefix: "Forge".to_string(),
            type_name: "Foo".to_string(),
            field_prefix: "_".to_string(),
            hint_max_len: 32,
        }
    }
}

impl SynthOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.container_prefix = prefix.into();
        self
    }

    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = name.into();
        self
    }

    pub fn with_field_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.field_prefix = prefix.into();
        self
    }

    pub fn with_hint_max_len(mut self, len: usize) -> Self {
        self.hint_max_len = len;
        self
    }
}

/// Limits a [`crate::backend::Host`] enforces when asked for new containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostLimits {
    /// Maximum number of containers; `None` is unbounded.
    pub max_containers: Option<usize>,
}

impl HostLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_containers(mut self, max: usize) -> Self {
        self.max_containers = Some(max);
        self
    }
}
