//! Errors for the tspec toolchain

mod context;
mod location;
mod traits;

use std::{fmt, path::PathBuf};

pub use context::Context;
pub use location::ErrorLocation;
pub use traits::AsTspecError;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Analysis continues but the declaration is not well formed.
    Error,
    /// Suspicious but accepted, for example an unknown attribute key.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Unified error representation for display
///
/// This is the form every diagnostic takes right before it is printed: the
/// file it belongs to, the message, and the resolved line/column
/// information when the source text is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TspecError {
    path: PathBuf,
    severity: Severity,
    message: String,
    location: Option<ErrorLocation>,
    context: Vec<Context>,
    context_with_source: Vec<(Context, ErrorLocation)>,
}

impl TspecError {
    /// Creates an error without source location information
    pub fn from_error(error: &impl AsTspecError, path: PathBuf) -> Self {
        Self {
            path,
            severity: error.severity(),
            message: error.message(),
            location: None,
            context: error.context(),
            context_with_source: vec![],
        }
    }

    /// Creates an error with locations resolved against `source`
    ///
    /// Context items whose location cannot be resolved are demoted to plain
    /// context.
    pub fn from_error_with_source(error: &impl AsTspecError, path: PathBuf, source: &str) -> Self {
        let mut context = error.context();
        let mut context_with_source = vec![];

        for (context_item, location) in error.context_with_source(source) {
            match location {
                Some(location) => context_with_source.push((context_item, location)),
                None => context.push(context_item),
            }
        }

        Self {
            path,
            severity: error.severity(),
            message: error.message(),
            location: error.error_location(source),
            context,
            context_with_source,
        }
    }

    /// Chooses between [`Self::from_error`] and
    /// [`Self::from_error_with_source`] depending on whether the source is
    /// available
    pub fn from_error_with_optional_source(
        error: &impl AsTspecError,
        path: PathBuf,
        source: Option<&str>,
    ) -> Self {
        match source {
            Some(source) => Self::from_error_with_source(error, path, source),
            None => Self::from_error(error, path),
        }
    }

    /// Returns the path of the file the error belongs to
    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns the severity
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the resolved location, if any
    #[must_use]
    pub const fn location(&self) -> Option<&ErrorLocation> {
        self.location.as_ref()
    }

    /// Returns context without a location
    #[must_use]
    pub fn context(&self) -> &[Context] {
        &self.context
    }

    /// Returns context with a resolved location
    #[must_use]
    pub fn context_with_source(&self) -> &[(Context, ErrorLocation)] {
        &self.context_with_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    struct Duplicate {
        first: Span,
        again: Span,
    }

    impl AsTspecError for Duplicate {
        fn message(&self) -> String {
            "duplicate import".to_string()
        }

        fn error_location(&self, source: &str) -> Option<ErrorLocation> {
            Some(ErrorLocation::from_source_and_span(source, self.again))
        }

        fn context_with_source(&self, source: &str) -> Vec<(Context, Option<ErrorLocation>)> {
            vec![
                (
                    Context::Note("first declared here".to_string()),
                    Some(ErrorLocation::from_source_and_span(source, self.first)),
                ),
                (Context::Help("remove one of the imports".to_string()), None),
            ]
        }
    }

    #[test]
    fn located_context_is_resolved_and_unlocated_context_is_demoted() {
        let source = "import from A all;\nimport from A all;\n";
        let error = Duplicate {
            first: Span::new(12, 13),
            again: Span::new(31, 32),
        };

        let error = TspecError::from_error_with_source(&error, PathBuf::from("M.ttcn"), source);

        assert_eq!(error.severity(), Severity::Error);
        assert_eq!(error.location().map(ErrorLocation::line), Some(2));
        assert_eq!(error.context_with_source().len(), 1);
        assert_eq!(error.context_with_source()[0].1.line(), 1);
        assert_eq!(
            error.context(),
            &[Context::Help("remove one of the imports".to_string())]
        );
    }

    #[test]
    fn without_source_there_is_no_location() {
        let error = Duplicate {
            first: Span::new(0, 1),
            again: Span::new(1, 2),
        };

        let error = TspecError::from_error_with_optional_source(&error, PathBuf::from("M"), None);

        assert!(error.location().is_none());
        assert!(error.context_with_source().is_empty());
    }
}
