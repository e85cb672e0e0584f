use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use crossterm::style::{Color, Stylize};

use crate::error::CatalogError;

/// Line-oriented terminal wrapper. Every read consumes exactly one line, so a
/// bad entry can never leave stray input behind for the next prompt. `None`
/// from any `ask_*` method means the input is exhausted.
pub(crate) struct Console<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            color: false,
        }
    }

    pub(crate) fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub(crate) fn into_output(self) -> W {
        self.output
    }

    /// Print a line of plain text.
    pub(crate) fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref()).context("failed to write to terminal")
    }

    pub(crate) fn heading(&mut self, text: &str) -> Result<()> {
        let line = self.paint(text, Color::Cyan, true);
        self.say(line)
    }

    pub(crate) fn success(&mut self, text: &str) -> Result<()> {
        let line = self.paint(text, Color::Green, false);
        self.say(line)
    }

    pub(crate) fn notice(&mut self, text: &str) -> Result<()> {
        let line = self.paint(text, Color::Yellow, false);
        self.say(line)
    }

    pub(crate) fn error(&mut self, text: &str) -> Result<()> {
        let line = self.paint(text, Color::Red, false);
        self.say(line)
    }

    /// Show `label` and return the entered line without its line ending.
    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}").context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;
        self.read_line()
    }

    /// Free text such as a title or author. Internal spaces are kept.
    pub(crate) fn ask_text(&mut self, label: &str) -> Result<Option<String>> {
        self.ask(label)
    }

    /// First whitespace-delimited token of the entered line, re-prompting
    /// while the line is blank.
    pub(crate) fn ask_token(&mut self, label: &str) -> Result<Option<String>> {
        loop {
            let Some(line) = self.ask(label)? else {
                return Ok(None);
            };
            if let Some(token) = line.split_whitespace().next() {
                return Ok(Some(token.to_string()));
            }
            self.notice("Please enter a keyword.")?;
        }
    }

    /// A number, re-prompting until the entry parses.
    pub(crate) fn ask_number<T: FromStr>(&mut self, label: &str) -> Result<Option<T>> {
        loop {
            let Some(line) = self.ask(label)? else {
                return Ok(None);
            };
            match parse_number(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => self.notice(&err.to_string())?,
            }
        }
    }

    /// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
    /// stray encoding never ends the session.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut raw = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut raw)
            .context("failed to read from terminal")?;
        if read == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&raw);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.color {
            return text.to_string();
        }
        if bold {
            text.with(color).bold().to_string()
        } else {
            text.with(color).to_string()
        }
    }
}

/// Parse a whole-number entry, ignoring surrounding whitespace.
pub(crate) fn parse_number<T: FromStr>(raw: &str) -> crate::error::Result<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::MalformedInput(
            "a number is required".to_string(),
        ));
    }
    trimmed
        .parse::<T>()
        .map_err(|_| CatalogError::MalformedInput(format!("'{trimmed}' is not a whole number")))
}
