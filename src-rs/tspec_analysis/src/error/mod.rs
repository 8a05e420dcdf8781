//! Errors reported by import resolution and semantic checking
//!
//! User-facing errors fall into three classes, mirroring the phases that
//! find them. Internal errors are invariant violations; they are logged and
//! kept apart from user diagnostics.

use std::fmt;

use tspec_shared::{AsTspecError, Context, ErrorLocation, Severity, span::Span};

mod resolution;
mod semantic;
mod structural;

pub use resolution::ResolutionError;
pub use semantic::SemanticError;
pub use structural::StructuralError;

/// A user-facing analysis error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A problem with the imports between modules
    Structural(StructuralError),
    /// A name that does not resolve to a suitable definition
    Resolution(ResolutionError),
    /// A definition that breaks a typing or attribute rule
    Semantic(SemanticError),
}

impl AnalysisError {
    /// Returns the span the error is reported at
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Structural(error) => error.span(),
            Self::Resolution(error) => error.span(),
            Self::Semantic(error) => error.span(),
        }
    }

    fn inner(&self) -> &dyn AsTspecError {
        match self {
            Self::Structural(error) => error,
            Self::Resolution(error) => error,
            Self::Semantic(error) => error,
        }
    }
}

impl From<StructuralError> for AnalysisError {
    fn from(error: StructuralError) -> Self {
        Self::Structural(error)
    }
}

impl From<ResolutionError> for AnalysisError {
    fn from(error: ResolutionError) -> Self {
        Self::Resolution(error)
    }
}

impl From<SemanticError> for AnalysisError {
    fn from(error: SemanticError) -> Self {
        Self::Semantic(error)
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural(error) => error.fmt(f),
            Self::Resolution(error) => error.fmt(f),
            Self::Semantic(error) => error.fmt(f),
        }
    }
}

impl AsTspecError for AnalysisError {
    fn message(&self) -> String {
        self.inner().message()
    }

    fn severity(&self) -> Severity {
        self.inner().severity()
    }

    fn context(&self) -> Vec<Context> {
        self.inner().context()
    }

    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        self.inner().error_location(source)
    }

    fn context_with_source(&self, source: &str) -> Vec<(Context, Option<ErrorLocation>)> {
        self.inner().context_with_source(source)
    }
}

/// An invariant violation inside the toolchain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    /// The module has never completed a check
    #[error("module `{0}` has not been checked")]
    ModuleNotChecked(String),
    /// The definition has no check result
    #[error("`{0}` has not been checked")]
    Unchecked(String),
    /// The definition is on the reference chain of a running check
    #[error("check of `{0}` is still in progress")]
    CheckInProgress(String),
    /// The result predates the module's last check, or was derived from
    /// results that have been checked again since
    #[error("cached results of `{name}` are out of date")]
    Stale {
        /// The definition with the outdated result
        name: String,
    },
    /// A constant passed its check without a folded value
    #[error("`{0}` has no calculated value")]
    MissingValue(String),
    /// A checked reference points at a definition of another kind
    #[error("`{name}` refers to `{target}`, which is not a {expected}")]
    UnexpectedKind {
        /// The referring definition
        name: String,
        /// The definition referred to
        target: String,
        /// The kind that was required
        expected: &'static str,
    },
}
