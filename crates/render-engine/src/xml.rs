//! Minimal indented XML text writer.
//!
//! XMEML consumers are picky about element order but not about
//! whitespace, so the writer only tracks nesting depth and escapes
//! text. It never validates structure.

use std::borrow::Cow;
use std::fmt::Display;

/// Accumulates XML text, one element per line, tab-indented.
#[derive(Debug, Default)]
pub struct XmlWriter {
    buf: String,
    depth: usize,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Append a line verbatim at the current depth.
    pub fn line(&mut self, text: &str) {
        self.indent();
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// `<tag>` and descend.
    pub fn open(&mut self, tag: &str) {
        self.open_with(tag, &[]);
    }

    /// `<tag a="b" ...>` and descend. Attribute values are escaped.
    pub fn open_with(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.indent();
        self.start_tag(tag, attrs);
        self.buf.push_str(">\n");
        self.depth += 1;
    }

    /// Ascend and write `</tag>`.
    pub fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push_str(">\n");
    }

    /// `<tag>value</tag>` with the value escaped.
    pub fn leaf(&mut self, tag: &str, value: impl Display) {
        let value = value.to_string();
        self.indent();
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
        self.buf.push_str(&escape(&value));
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push_str(">\n");
    }

    /// `<tag></tag>`
    pub fn empty(&mut self, tag: &str) {
        self.leaf(tag, "");
    }

    /// `<tag a="b"/>`
    pub fn self_closing(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.indent();
        self.start_tag(tag, attrs);
        self.buf.push_str("/>\n");
    }

    /// Insert a pre-rendered fragment, re-indenting each line to the
    /// current depth.
    pub fn raw(&mut self, fragment: &str) {
        for line in fragment.lines() {
            if line.trim().is_empty() {
                continue;
            }
            self.indent();
            self.buf.push_str(line);
            self.buf.push('\n');
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn finish(self) -> String {
        self.buf
    }

    fn start_tag(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.buf.push('<');
        self.buf.push_str(tag);
        for (name, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape(value));
            self.buf.push('"');
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buf.push('\t');
        }
    }
}

/// Escape the five XML special characters.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
