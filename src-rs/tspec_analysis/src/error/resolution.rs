//! Errors resolving names to definitions

use std::fmt;

use tspec_shared::{AsTspecError, Context, ErrorLocation, span::Span};

/// Errors resolving a name to a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The name is not defined in any visible scope
    NotFound {
        /// The name as written
        name: String,
        /// Where the name is used
        span: Span,
    },
    /// The module has no definition with the requested name
    NoSuchAssignment {
        /// The module searched
        module: String,
        /// The requested name
        name: String,
        /// Where the name is used
        span: Span,
    },
    /// The definition exists but is not visible outside its module
    SymbolNotExported {
        /// The module holding the definition
        module: String,
        /// The requested name
        name: String,
        /// Where the name is used
        span: Span,
    },
    /// The name is imported from more than one module
    AmbiguousSymbol {
        /// The name as written
        name: String,
        /// Every module the name is imported from
        modules: Vec<String>,
        /// Where the name is used
        span: Span,
    },
    /// A qualified reference names a module that is not imported
    ModuleNotImported {
        /// The module name as written
        module: String,
        /// Where the module name is used
        span: Span,
    },
    /// The name refers to the wrong kind of definition
    WrongKind {
        /// The name as written
        name: String,
        /// The kind the reference needs, such as "a type"
        expected: &'static str,
        /// The kind the name refers to
        found: &'static str,
        /// Where the name is used
        span: Span,
    },
}

impl ResolutionError {
    /// Returns the span the error is reported at
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::NotFound { span, .. }
            | Self::NoSuchAssignment { span, .. }
            | Self::SymbolNotExported { span, .. }
            | Self::AmbiguousSymbol { span, .. }
            | Self::ModuleNotImported { span, .. }
            | Self::WrongKind { span, .. } => *span,
        }
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name, .. } => write!(f, "`{name}` is not defined"),
            Self::NoSuchAssignment { module, name, .. } => {
                write!(f, "module `{module}` has no definition named `{name}`")
            }
            Self::SymbolNotExported { module, name, .. } => {
                write!(f, "`{name}` is not exported by module `{module}`")
            }
            Self::AmbiguousSymbol { name, .. } => {
                write!(f, "`{name}` is imported from more than one module")
            }
            Self::ModuleNotImported { module, .. } => {
                write!(f, "module `{module}` is not imported")
            }
            Self::WrongKind {
                name,
                expected,
                found,
                ..
            } => write!(f, "expected {expected} but `{name}` is {found}"),
        }
    }
}

impl AsTspecError for ResolutionError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        Some(ErrorLocation::from_source_and_span(source, self.span()))
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::AmbiguousSymbol { name, modules, .. } => {
                let candidates = modules
                    .iter()
                    .map(|module| format!("`{module}.{name}`"))
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![Context::Help(format!(
                    "qualify the reference, for example {candidates}"
                ))]
            }
            Self::SymbolNotExported { .. } => vec![Context::Note(
                "only public definitions are visible to importing modules".to_string(),
            )],
            Self::ModuleNotImported { module, .. } => vec![Context::Help(format!(
                "add `import from {module} all;`"
            ))],
            Self::NotFound { .. } | Self::NoSuchAssignment { .. } | Self::WrongKind { .. } => {
                vec![]
            }
        }
    }
}
