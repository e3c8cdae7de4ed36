//! Output collaborators: how text is decorated and where lines go.

use std::io::{self, Write};

use console::Style;

/// What a decorated fragment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightTag {
    /// The token that matched a query.
    Match,
    /// A line-number prefix.
    LineNumber,
}

pub trait Highlighter {
    fn decorate(&self, text: &str, tag: HighlightTag) -> String;
}

/// Bright red matches and bright green line numbers.
#[derive(Debug, Clone)]
pub struct AnsiHighlighter {
    matched: Style,
    line_number: Style,
}

impl Default for AnsiHighlighter {
    fn default() -> Self {
        Self {
            matched: Style::new().red().bright().force_styling(true),
            line_number: Style::new().green().bright().force_styling(true),
        }
    }
}

impl Highlighter for AnsiHighlighter {
    fn decorate(&self, text: &str, tag: HighlightTag) -> String {
        let style = match tag {
            HighlightTag::Match => &self.matched,
            HighlightTag::LineNumber => &self.line_number,
        };
        style.apply_to(text).to_string()
    }
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn decorate(&self, text: &str, _tag: HighlightTag) -> String {
        text.to_string()
    }
}

/// Every occurrence of `token` in `line`, decorated as a match.
pub fn highlight_token<H: Highlighter + ?Sized>(line: &str, token: &str, highlighter: &H) -> String {
    if token.is_empty() {
        return line.to_string();
    }
    line.replace(token, &highlighter.decorate(token, HighlightTag::Match))
}

/// Destination for emitted lines.
pub trait LineWriter {
    /// Write one line. `line_number` is only rendered when `show_number` is
    /// set.
    fn write_line(&mut self, text: &str, line_number: usize, show_number: bool) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes `N:text` or `text` lines to any [`Write`].
pub struct TextLineWriter<W, H> {
    out: W,
    highlighter: H,
}

impl<W: Write, H: Highlighter> TextLineWriter<W, H> {
    pub fn new(out: W, highlighter: H) -> Self {
        Self { out, highlighter }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write, H: Highlighter> LineWriter for TextLineWriter<W, H> {
    fn write_line(&mut self, text: &str, line_number: usize, show_number: bool) -> io::Result<()> {
        if show_number {
            let number = self
                .highlighter
                .decorate(&line_number.to_string(), HighlightTag::LineNumber);
            write!(self.out, "{number}:")?;
        }
        writeln!(self.out, "{text}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
