use crate::span::Span;

/// Width a tab expands to when rendering source lines
const TAB_WIDTH: usize = 4;

/// Line/column information for rendering an error against its source
///
/// Line and column numbers are 1-indexed. Tabs are expanded to
/// [`TAB_WIDTH`] columns both in the column number and in the stored line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLocation {
    offset: usize,
    line: usize,
    column: usize,
    length: usize,
    line_source: String,
}

impl ErrorLocation {
    /// Creates an error location for `span` inside `source`
    ///
    /// Spans reaching past the end of their first line are clipped to that
    /// line, since only single-line highlighting is rendered. Offsets past
    /// the end of the source are clamped to the end.
    #[must_use]
    pub fn from_source_and_span(source: &str, span: Span) -> Self {
        let offset = floor_char_boundary(source, span.start().min(source.len()));

        let line_start = source[..offset]
            .rfind('\n')
            .map_or(0, |newline_idx| newline_idx + 1);
        let line_end = source[offset..]
            .find('\n')
            .map_or(source.len(), |newline_idx| offset + newline_idx);

        let num_tabs = source[line_start..offset]
            .chars()
            .filter(|c| *c == '\t')
            .count();
        let column = source[line_start..offset].chars().count() + 1 + num_tabs * (TAB_WIDTH - 1);

        let line = source[..offset].matches('\n').count() + 1;

        let clipped_end = span.end().min(line_end).max(offset);
        let length = source[offset..floor_char_boundary(source, clipped_end)]
            .chars()
            .count()
            .max(1);

        let line_source = source[line_start..line_end].replace('\t', &" ".repeat(TAB_WIDTH));

        Self {
            offset,
            line,
            column,
            length,
            line_source,
        }
    }

    /// Creates an error location pointing at a single offset
    #[must_use]
    pub fn from_source_and_offset(source: &str, offset: usize) -> Self {
        Self::from_source_and_span(source, Span::new(offset, offset))
    }

    /// Returns the byte offset from the beginning of the source file
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the line number (1-indexed)
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the column number (1-indexed)
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Returns the number of highlighted characters, at least one
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Returns the source line the error is on, with tabs expanded
    #[must_use]
    pub fn line_source(&self) -> &str {
        &self.line_source
    }
}

fn floor_char_boundary(source: &str, mut index: usize) -> usize {
    while !source.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_on_second_line() {
        let source = "module A {\n  const integer x := 1;\n}";
        let offset = source.find("x :=").expect("x should be present");

        let location = ErrorLocation::from_source_and_span(source, Span::new(offset, offset + 1));

        assert_eq!(location.line(), 2);
        assert_eq!(location.column(), 17);
        assert_eq!(location.length(), 1);
        assert_eq!(location.line_source(), "  const integer x := 1;");
    }

    #[test]
    fn multi_line_span_is_clipped() {
        let source = "type record R {\n  integer f\n}";

        let location = ErrorLocation::from_source_and_span(source, Span::new(5, source.len()));

        assert_eq!(location.line(), 1);
        assert_eq!(location.length(), "record R {".len());
    }

    #[test]
    fn tabs_are_expanded() {
        let source = "\tfoo";

        let location = ErrorLocation::from_source_and_offset(source, 1);

        assert_eq!(location.column(), 5);
        assert_eq!(location.line_source(), "    foo");
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let source = "abc";

        let location = ErrorLocation::from_source_and_offset(source, 10);

        assert_eq!(location.offset(), 3);
        assert_eq!(location.column(), 4);
    }
}
