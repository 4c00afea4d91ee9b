// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal output: colors, value display, and the line-oriented console.

use std::io::Write;

use colored::{Color, Colorize};
use rediscli_config::ShellConfig;
use rediscli_core::RediscliError;

/// Printed once when the interactive session starts.
pub const BANNER: &str = r"
________     _____________
___  __ \__________  /__(_)_______
__  /_/ /  _ \  __  /__  /__  ___/
_  _, _//  __/ /_/ / _  / _(__  )
/_/ |_| \___/\__,_/  /_/  /____/
";

/// Role of a line of output; each maps to one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Banner,
    Heading,
    Subheading,
    Item,
    Info,
    Notice,
    Error,
    Rule,
    Plain,
}

impl Tone {
    fn color(self) -> Option<Color> {
        match self {
            Tone::Banner | Tone::Error => Some(Color::Red),
            Tone::Heading => Some(Color::Green),
            Tone::Subheading => Some(Color::BrightGreen),
            Tone::Item => Some(Color::BrightCyan),
            Tone::Info => Some(Color::Cyan),
            Tone::Notice => Some(Color::Yellow),
            Tone::Rule => Some(Color::Blue),
            Tone::Plain => None,
        }
    }
}

/// Applies [`Tone`] colors, or nothing when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// No escape codes at all.
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Color unless `shell.color = false` or `NO_COLOR` is set.
    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(config.color && std::env::var_os("NO_COLOR").is_none())
    }

    pub fn paint(&self, text: &str, tone: Tone) -> String {
        match tone.color() {
            Some(color) if self.color => text.color(color).to_string(),
            _ => text.to_string(),
        }
    }
}

/// Line-oriented output with a [`Painter`].
pub struct Console<W: Write> {
    out: W,
    painter: Painter,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, painter: Painter) -> Self {
        Self { out, painter }
    }

    /// Write one line in the given tone.
    pub fn line(&mut self, tone: Tone, text: impl AsRef<str>) -> Result<(), RediscliError> {
        let painted = self.painter.paint(text.as_ref(), tone);
        writeln!(self.out, "{painted}").map_err(output_error)?;
        self.out.flush().map_err(output_error)
    }

    pub fn blank(&mut self) -> Result<(), RediscliError> {
        self.line(Tone::Plain, "")
    }

    /// `message` between two rules of stars.
    pub fn outline(&mut self, tone: Tone, message: &str) -> Result<(), RediscliError> {
        let rule = "*".repeat(100);
        self.line(Tone::Rule, &rule)?;
        self.line(tone, message)?;
        self.line(Tone::Rule, &rule)
    }

    pub fn error(&mut self, err: &RediscliError) -> Result<(), RediscliError> {
        self.line(Tone::Error, format!("error: {err}"))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn output_error(e: std::io::Error) -> RediscliError {
    RediscliError::Internal(format!("failed to write output: {e}"))
}

/// Whether `bytes` should be shown as text: valid UTF-8 whose only control
/// characters are whitespace.
pub fn is_text(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(text) => text
            .chars()
            .all(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t')),
        Err(_) => false,
    }
}

/// Text when [`is_text`], otherwise lowercase hex.
pub fn display_bytes(bytes: &[u8]) -> String {
    if is_text(bytes) {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        hex::encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_values_are_shown_verbatim() {
        assert_eq!(display_bytes(b"hello world"), "hello world");
        assert_eq!(display_bytes("grüße".as_bytes()), "grüße");
        assert_eq!(display_bytes(b"line one\nline two\t!"), "line one\nline two\t!");
        assert_eq!(display_bytes(b""), "");
    }

    #[test]
    fn binary_values_are_shown_as_hex() {
        assert_eq!(display_bytes(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
        assert_eq!(display_bytes(b"nul\0byte"), "6e756c0062797465");
        assert_eq!(display_bytes(&[0x1b, b'[', b'0', b'm']), "1b5b306d");
    }

    #[test]
    fn plain_painter_adds_no_escapes() {
        assert_eq!(Painter::plain().paint("x", Tone::Error), "x");
    }

    #[test]
    fn color_painter_adds_escapes() {
        colored::control::set_override(true);
        let painted = Painter::new(true).paint("x", Tone::Error);
        colored::control::unset_override();
        assert!(painted.contains("\u{1b}["));
        assert_eq!(Painter::new(true).paint("x", Tone::Plain), "x");
    }

    #[test]
    fn console_writes_lines() {
        let mut console = Console::new(Vec::new(), Painter::plain());
        console.outline(Tone::Notice, "hello").unwrap();
        console.line(Tone::Item, "item").unwrap();
        let out = String::from_utf8(console.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "*".repeat(100));
        assert_eq!(lines[1], "hello");
        assert_eq!(lines[3], "item");
    }
}
