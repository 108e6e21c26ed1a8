use anyhow::Result;
use crossterm::tty::IsTty;
use serde::Serialize;
use std::io::{self, Write};

use crate::display::markup::{Line, Renderer, StyleCode};

/// Where a console stream ends up
enum Sink {
    Stdout,
    Stderr,
    #[cfg(test)]
    Buffer(Vec<u8>),
}

impl Sink {
    fn write_line(&mut self, line: &str) {
        // Output is cosmetic; a closed pipe must not abort the command.
        let _ = match self {
            Sink::Stdout => writeln!(io::stdout(), "{}", line),
            Sink::Stderr => writeln!(io::stderr(), "{}", line),
            #[cfg(test)]
            Sink::Buffer(buf) => writeln!(buf, "{}", line),
        };
    }

    #[cfg(test)]
    fn contents(&self) -> String {
        match self {
            Sink::Buffer(buf) => String::from_utf8_lossy(buf).into_owned(),
            _ => String::new(),
        }
    }
}

/// User-facing output. Every line passes through the markup renderer.
pub struct Console {
    renderer: Renderer,
    out: Sink,
    err: Sink,
}

impl Console {
    /// Console bound to the process's stdout/stderr
    pub fn terminal(color: bool) -> Self {
        let renderer = if color && io::stdout().is_tty() {
            Renderer::Ansi
        } else {
            Renderer::Plain
        };
        Self {
            renderer,
            out: Sink::Stdout,
            err: Sink::Stderr,
        }
    }

    /// Console that records everything in memory, without styling
    #[cfg(test)]
    pub fn captured() -> Self {
        Self {
            renderer: Renderer::Plain,
            out: Sink::Buffer(Vec::new()),
            err: Sink::Buffer(Vec::new()),
        }
    }

    /// Print a markup line to stdout
    pub fn print(&mut self, markup: &str) {
        let line = self.renderer.render(markup);
        self.out.write_line(&line);
    }

    /// Print preformatted text (tables, JSON) to stdout as-is
    pub fn raw(&mut self, text: &str) {
        self.out.write_line(text);
    }

    /// Print preformatted text to stderr as-is
    pub fn raw_err(&mut self, text: &str) {
        self.err.write_line(text);
    }

    /// Print a line assembled from literal and styled pieces to stdout
    pub fn print_line(&mut self, line: &Line) {
        let text = self.renderer.render_tokens(line.tokens());
        self.out.write_line(&text);
    }

    /// Print a line assembled from literal and styled pieces to stderr
    pub fn eprint_line(&mut self, line: &Line) {
        let text = self.renderer.render_tokens(line.tokens());
        self.err.write_line(&text);
    }

    // Status messages are literal unless built as a styled `Line`

    pub fn success(&mut self, message: impl Into<Line>) {
        let line = status_label(StyleCode::Green, "SUCCESS:", " ").append(message.into());
        self.print_line(&line);
    }

    pub fn error(&mut self, message: impl Into<Line>) {
        let line = status_label(StyleCode::Red, "ERROR:", "   ").append(message.into());
        self.eprint_line(&line);
    }

    pub fn warning(&mut self, message: impl Into<Line>) {
        let line = status_label(StyleCode::Yellow, "WARNING:", " ").append(message.into());
        self.eprint_line(&line);
    }

    pub fn info(&mut self, message: impl Into<Line>) {
        let line = status_label(StyleCode::Blue, "INFO:", "    ").append(message.into());
        self.print_line(&line);
    }

    pub fn print_json<T: Serialize>(&mut self, data: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(data)?;
        self.raw(&text);
        Ok(())
    }

    /// Everything written to stdout so far (captured consoles only)
    #[cfg(test)]
    pub fn stdout_text(&self) -> String {
        self.out.contents()
    }

    /// Everything written to stderr so far (captured consoles only)
    #[cfg(test)]
    pub fn stderr_text(&self) -> String {
        self.err.contents()
    }
}

fn status_label(color: StyleCode, label: &str, padding: &str) -> Line {
    Line::new()
        .styled(&[color, StyleCode::Bold], label)
        .text(padding)
}
