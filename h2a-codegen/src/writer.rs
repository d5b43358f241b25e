//! Indenting text writer used by every emitter.

/// Width of one indentation level.
const INDENT: &str = "    ";

/// Accumulates generated source with nested indentation.
#[derive(Debug, Default, Clone)]
pub struct CodeWriter {
    output: String,
    indent: usize,
}

impl CodeWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current indentation. Empty lines carry no indent.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.output.push_str(INDENT);
            }
            self.output.push_str(text);
        }
        self.output.push('\n');
        self
    }

    /// Writes an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    /// Writes each line of `text` at the current indentation.
    pub fn lines(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            self.line(line);
        }
        self
    }

    /// Runs `body` one level deeper.
    pub fn indent(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.indent += 1;
        body(self);
        self.indent -= 1;
        self
    }

    /// Writes `header {`, the indented body, then `}`.
    pub fn block(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Self)) -> &mut Self {
        let header = header.as_ref();
        if header.is_empty() {
            self.line("{");
        } else {
            self.line(format!("{header} {{"));
        }
        self.indent(body);
        self.line("}")
    }

    /// Writes a `/** ... */` comment for `doc`, one ` * ` line per text line.
    pub fn doc_comment(&mut self, doc: &str) -> &mut Self {
        self.line("/**");
        for line in doc.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.line(" *");
            } else {
                self.line(format!(" * {line}"));
            }
        }
        self.line(" */")
    }

    /// Returns the text written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.output
    }

    /// Consumes the writer and returns its text.
    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }
}
