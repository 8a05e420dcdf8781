//! Generator settings

/// Settings for Java generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    package: Option<String>,
    indent: usize,
    error_behavior_tables: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package: None,
            indent: 4,
            error_behavior_tables: true,
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places generated classes in `package`
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Sets the number of spaces per indentation level
    #[must_use]
    pub const fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets whether types with an `encode` attribute get an error behaviour
    /// table
    #[must_use]
    pub const fn with_error_behavior_tables(mut self, enabled: bool) -> Self {
        self.error_behavior_tables = enabled;
        self
    }

    /// Returns the Java package, if classes are placed in one
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Returns the number of spaces per indentation level
    #[must_use]
    pub const fn indent(&self) -> usize {
        self.indent
    }

    /// Returns whether encoded types get an error behaviour table
    #[must_use]
    pub const fn error_behavior_tables(&self) -> bool {
        self.error_behavior_tables
    }
}
