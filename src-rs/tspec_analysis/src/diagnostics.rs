//! Collected diagnostics

use std::{path::Path, sync::Arc};

use tspec_shared::{AsTspecError, Location, Severity};

use crate::error::AnalysisError;

/// A user-facing error tied to the file it was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    file: Arc<Path>,
    error: AnalysisError,
}

impl Diagnostic {
    /// Creates a diagnostic raised in `file`
    #[must_use]
    pub fn new(file: Arc<Path>, error: impl Into<AnalysisError>) -> Self {
        Self {
            file,
            error: error.into(),
        }
    }

    /// Returns the file the diagnostic was raised in
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Returns the underlying error
    #[must_use]
    pub const fn error(&self) -> &AnalysisError {
        &self.error
    }

    /// Returns whether this is an error or a warning
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.error.severity()
    }

    /// Returns the primary message
    #[must_use]
    pub fn message(&self) -> String {
        self.error.message()
    }

    /// Returns the primary location
    #[must_use]
    pub fn location(&self) -> Location {
        Location::new(Arc::clone(&self.file), self.error.span())
    }

    /// Returns whether this is an error
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

/// An ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self { items: vec![] }
    }

    /// Adds a diagnostic at the end
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Iterates over every diagnostic in order
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Iterates over the errors
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|diagnostic| diagnostic.is_error())
    }

    /// Iterates over the warnings
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|diagnostic| !diagnostic.is_error())
    }

    /// Returns whether any diagnostic is an error
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Returns the number of diagnostics
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether there are no diagnostics
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a> Extend<&'a Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = &'a Diagnostic>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().cloned());
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
