//! Errors in the import graph

use std::fmt;

use tspec_shared::{AsTspecError, Context, ErrorLocation, span::Span};

/// Errors in the shape of the import graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// No module with the imported name exists in the project
    MissingModule {
        /// The imported module name
        module: String,
        /// The span of the import
        span: Span,
    },
    /// An ASN module imports from a TTCN module
    WrongModuleKind {
        /// The importing ASN module
        importer: String,
        /// The imported TTCN module
        module: String,
        /// The span of the import
        span: Span,
    },
    /// A module imports itself
    SelfImport {
        /// The module
        module: String,
        /// The span of the import
        span: Span,
    },
    /// The same module is imported twice
    DuplicateImport {
        /// The imported module
        module: String,
        /// The span of the first import
        first_span: Span,
        /// The span of the repeated import
        duplicate_span: Span,
    },
    /// Following imports leads back to a module being resolved
    CircularImport {
        /// The modules on the cycle, starting and ending with the same one
        cycle: Vec<String>,
        /// The span of the import that closes the cycle
        span: Span,
    },
}

impl StructuralError {
    /// Returns the span the error is reported at
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::MissingModule { span, .. }
            | Self::WrongModuleKind { span, .. }
            | Self::SelfImport { span, .. }
            | Self::CircularImport { span, .. } => *span,
            Self::DuplicateImport { duplicate_span, .. } => *duplicate_span,
        }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingModule { module, .. } => {
                write!(f, "there is no module named `{module}`")
            }
            Self::WrongModuleKind {
                importer, module, ..
            } => write!(
                f,
                "ASN module `{importer}` cannot import from TTCN module `{module}`"
            ),
            Self::SelfImport { module, .. } => write!(f, "module `{module}` imports itself"),
            Self::DuplicateImport { module, .. } => {
                write!(f, "module `{module}` is imported more than once: declared here again")
            }
            Self::CircularImport { cycle, .. } => {
                write!(f, "circular import - {}", cycle.join(" -> "))
            }
        }
    }
}

impl AsTspecError for StructuralError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        Some(ErrorLocation::from_source_and_span(source, self.span()))
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::WrongModuleKind { .. } => vec![Context::Note(
                "data-description modules may only import from data-description modules"
                    .to_string(),
            )],
            Self::MissingModule { .. }
            | Self::SelfImport { .. }
            | Self::DuplicateImport { .. }
            | Self::CircularImport { .. } => vec![],
        }
    }

    fn context_with_source(&self, source: &str) -> Vec<(Context, Option<ErrorLocation>)> {
        match self {
            Self::DuplicateImport { first_span, .. } => vec![(
                Context::Note("first declared here".to_string()),
                Some(ErrorLocation::from_source_and_span(source, *first_span)),
            )],
            Self::MissingModule { .. }
            | Self::WrongModuleKind { .. }
            | Self::SelfImport { .. }
            | Self::CircularImport { .. } => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_import_points_at_both_declarations() {
        let source = "import from B all;\nimport from B {};\n";
        let error = StructuralError::DuplicateImport {
            module: "B".to_string(),
            first_span: Span::new(0, 18),
            duplicate_span: Span::new(19, 36),
        };

        assert_eq!(
            error.message(),
            "module `B` is imported more than once: declared here again"
        );
        assert_eq!(error.error_location(source).map(|location| location.line()), Some(2));

        let context = error.context_with_source(source);
        assert_eq!(context.len(), 1);
        assert_eq!(context[0].0, Context::Note("first declared here".to_string()));
        assert_eq!(context[0].1.as_ref().map(ErrorLocation::line), Some(1));
    }
}
