use crate::error::{Context, ErrorLocation, Severity};

/// Types that can be presented to the user as a tspec diagnostic
///
/// Every user-facing error in the toolchain implements this trait so the
/// front end can render it uniformly.
pub trait AsTspecError {
    /// Returns the primary message.
    fn message(&self) -> String;

    /// Returns the severity, errors unless overridden.
    fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Returns context that is not tied to a source location.
    fn context(&self) -> Vec<Context> {
        vec![]
    }

    /// Returns where in `source` the error should be highlighted.
    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        let _ = source;
        None
    }

    /// Returns context items, each optionally tied to a location in `source`.
    fn context_with_source(&self, source: &str) -> Vec<(Context, Option<ErrorLocation>)> {
        let _ = source;
        vec![]
    }
}
