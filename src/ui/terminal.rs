//! Terminal capability used by the renderers.
//!
//! Renderers only ever talk to a [`Terminal`], so the same algorithms drive
//! stdout in production and an in-memory buffer in tests.

use std::io::{self, IsTerminal, Write};

/// Width used when the terminal size cannot be detected.
pub const DEFAULT_WIDTH: usize = 80;

pub trait Terminal: Send {
    /// Column count, if known.
    fn width(&self) -> Option<usize>;

    fn is_tty(&self) -> bool;

    /// Write text as-is. No newline is added.
    fn write_str(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Blank out `len` columns of the current line and return to column 0.
    fn clear_line(&mut self, len: usize) -> io::Result<()> {
        self.write_str(&format!("\r{}\r", " ".repeat(len)))
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.write_str(text)?;
        self.write_str("\n")
    }
}

/// Process stdout.
pub struct StdoutTerminal {
    out: io::Stdout,
    tty: bool,
}

impl StdoutTerminal {
    pub fn new() -> Self {
        let out = io::stdout();
        let tty = out.is_terminal();
        Self { out, tty }
    }
}

impl Default for StdoutTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for StdoutTerminal {
    fn width(&self) -> Option<usize> {
        if !self.tty {
            return None;
        }
        crossterm::terminal::size()
            .ok()
            .map(|(cols, _)| cols as usize)
            .filter(|cols| *cols > 0)
    }

    fn is_tty(&self) -> bool {
        self.tty
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Captures everything written, for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryTerminal {
    buffer: String,
    width: Option<usize>,
    fail_after: Option<usize>,
    writes: usize,
}

impl MemoryTerminal {
    pub fn new(width: Option<usize>) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Terminal whose writes start failing after `writes` successful ones.
    pub fn failing_after(writes: usize) -> Self {
        Self {
            fail_after: Some(writes),
            ..Self::default()
        }
    }

    /// Raw bytes written, control characters included.
    pub fn contents(&self) -> &str {
        &self.buffer
    }

    /// What a viewer would see: `\r` returns to column 0 and overwrites,
    /// `\n` ends a line. Trailing blanks are trimmed.
    pub fn screen_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut line: Vec<char> = Vec::new();
        let mut col = 0;

        for ch in self.buffer.chars() {
            match ch {
                '\r' => col = 0,
                '\n' => {
                    lines.push(line.iter().collect::<String>().trim_end().to_string());
                    line.clear();
                    col = 0;
                }
                _ => {
                    if col < line.len() {
                        line[col] = ch;
                    } else {
                        line.push(ch);
                    }
                    col += 1;
                }
            }
        }
        if !line.is_empty() {
            let rest = line.iter().collect::<String>().trim_end().to_string();
            if !rest.is_empty() {
                lines.push(rest);
            }
        }
        lines
    }
}

impl Terminal for MemoryTerminal {
    fn width(&self) -> Option<usize> {
        self.width
    }

    fn is_tty(&self) -> bool {
        false
    }

    fn write_str(&mut self, text: &str) -> io::Result<()> {
        if let Some(limit) = self.fail_after {
            if self.writes >= limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"));
            }
        }
        self.writes += 1;
        self.buffer.push_str(text);
        Ok(())
    }
}

/// Wraps a terminal so a failed write disables further output instead of
/// aborting the renderer. The renderer keeps draining its channel.
pub(crate) struct Screen<'a> {
    term: &'a mut dyn Terminal,
    broken: bool,
}

impl<'a> Screen<'a> {
    pub(crate) fn new(term: &'a mut dyn Terminal) -> Self {
        Self {
            term,
            broken: false,
        }
    }

    pub(crate) fn width(&self) -> Option<usize> {
        self.term.width()
    }

    pub(crate) fn draw(&mut self, f: impl FnOnce(&mut dyn Terminal) -> io::Result<()>) {
        if self.broken {
            return;
        }
        let result = f(&mut *self.term).and_then(|_| self.term.flush());
        if let Err(err) = result {
            tracing::warn!("Output failed, continuing silently: {}", err);
            self.broken = true;
        }
    }
}
