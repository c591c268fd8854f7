//! Terminal output for product messages and the redrawable progress block.

use anyhow::{Context, Result};
use console::{Emoji, Term, style};

use crate::core::line::{Line, Tone};

/// Render target for product output.
///
/// The progress block is redrawn in place: callers clear exactly the lines
/// they wrote for the previous block before writing the next one.
pub trait Console {
    /// Print one line.
    fn line(&mut self, line: &Line) -> Result<()>;

    /// Erase the last `line_count` lines written.
    fn clear_last_block(&mut self, line_count: usize) -> Result<()>;

    fn write_block(&mut self, lines: &[Line]) -> Result<()> {
        for line in lines {
            self.line(line)?;
        }
        Ok(())
    }

    fn blank(&mut self) -> Result<()> {
        self.line(&Line::blank())
    }

    fn info(&mut self, text: &str) -> Result<()> {
        self.line(&Line::new(Tone::Info, text))
    }

    fn warn(&mut self, text: &str) -> Result<()> {
        self.line(&Line::new(Tone::Warn, text))
    }

    fn error(&mut self, text: &str) -> Result<()> {
        self.line(&Line::new(Tone::Error, text))
    }
}

/// [`Console`] writing colored text to the real terminal.
///
/// Error lines go to stderr; everything else goes to stdout.
pub struct TermConsole {
    out: Term,
    err: Term,
}

impl TermConsole {
    pub fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TermConsole {
    fn line(&mut self, line: &Line) -> Result<()> {
        let icon = line
            .icon
            .map(|icon| Emoji(icon.emoji(), icon.fallback()).to_string())
            .unwrap_or_default();
        let text = format!("{:indent$}{icon}{}", "", line.text, indent = line.indent);
        let rendered = match line.tone {
            Tone::Plain => text,
            Tone::Info => style(text).blue().to_string(),
            Tone::Success => style(text).green().to_string(),
            Tone::Warn => style(text).yellow().bold().to_string(),
            Tone::Failure => style(text).red().to_string(),
            Tone::Error => style(format!("ERROR: {text}")).red().to_string(),
        };
        let term = if line.tone == Tone::Error {
            &self.err
        } else {
            &self.out
        };
        term.write_line(&rendered).context("write to terminal")
    }

    fn clear_last_block(&mut self, line_count: usize) -> Result<()> {
        self.out
            .clear_last_lines(line_count)
            .context("clear terminal lines")
    }
}
