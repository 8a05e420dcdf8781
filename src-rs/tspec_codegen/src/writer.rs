//! Indented Java source output

/// Accumulates lines of Java source at a current indentation level
#[derive(Debug)]
pub struct JavaWriter {
    indent_width: usize,
    level: usize,
    output: String,
}

impl JavaWriter {
    /// Creates an empty writer at `level`
    pub const fn new(indent_width: usize, level: usize) -> Self {
        Self {
            indent_width,
            level,
            output: String::new(),
        }
    }

    /// Writes one line at the current level
    ///
    /// Empty lines carry no indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            self.output
                .push_str(&" ".repeat(self.indent_width * self.level));
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    /// Writes an empty line
    pub fn blank(&mut self) {
        self.output.push('\n');
    }

    /// Writes `header {` and indents
    ///
    /// An empty header opens a bare block.
    pub fn open(&mut self, header: impl AsRef<str>) {
        let header = header.as_ref();
        if header.is_empty() {
            self.line("{");
        } else {
            self.line(format!("{header} {{"));
        }
        self.level += 1;
    }

    /// Dedents and writes `}`
    pub fn close(&mut self) {
        self.close_with("}");
    }

    /// Dedents and writes `text`, such as `} else {` followed by `reopen`
    pub fn close_with(&mut self, text: impl AsRef<str>) {
        self.level = self.level.saturating_sub(1);
        self.line(text);
    }

    /// Dedents, writes `text` and indents again
    pub fn reopen(&mut self, text: impl AsRef<str>) {
        self.close_with(text);
        self.level += 1;
    }

    /// Starts a writer for a nested fragment at the current level
    pub const fn fragment(&self) -> Self {
        Self::new(self.indent_width, self.level)
    }

    /// Appends the output of a fragment
    pub fn append(&mut self, fragment: Self) {
        self.output.push_str(&fragment.output);
    }

    /// Returns whether nothing was written
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Returns the written source
    pub fn finish(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn nested_blocks_are_indented() {
        let mut writer = JavaWriter::new(2, 0);
        writer.open("if (a)");
        writer.line("x();");
        writer.reopen("} else {");
        writer.blank();
        writer.line("y();");
        writer.close();

        assert_eq!(
            writer.finish(),
            indoc! {"
                if (a) {
                  x();
                } else {

                  y();
                }
            "}
        );
    }
}
