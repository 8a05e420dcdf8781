//! Source location spans for mapping data structures to source code

use std::{fmt, path::Path, sync::Arc};

/// A span of source code
///
/// A span is a half-open byte range `start..end` into the source unit it
/// was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a new span from a start and end offset
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "start offset must be before end offset");

        Self { start, end }
    }

    /// Returns the start offset
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Returns the end offset
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Returns the length of the span in bytes
    #[must_use]
    pub const fn length(&self) -> usize {
        self.end - self.start
    }

    /// Returns a span covering both `self` and `other`
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A span together with the file it belongs to
///
/// Locations are attached to diagnostics. They are never used for identity
/// or equality of semantic entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    file: Arc<Path>,
    span: Span,
}

impl Location {
    /// Creates a new location
    #[must_use]
    pub const fn new(file: Arc<Path>, span: Span) -> Self {
        Self { file, span }
    }

    /// Returns the file this location points into
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Returns the shared handle to the file path
    #[must_use]
    pub fn file_handle(&self) -> Arc<Path> {
        Arc::clone(&self.file)
    }

    /// Returns the span within the file
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}..{}",
            self.file.display(),
            self.span.start,
            self.span.end
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_covers_both_spans() {
        let first = Span::new(4, 9);
        let second = Span::new(2, 6);

        assert_eq!(first.merge(&second), Span::new(2, 9));
        assert_eq!(first.merge(&second).length(), 7);
    }

    #[test]
    #[should_panic(expected = "start offset must be before end offset")]
    fn inverted_span_panics() {
        let _ = Span::new(5, 1);
    }
}
