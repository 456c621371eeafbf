//! `file:line[:column]` arguments

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::infra::document::Document;
use crate::models::position::Position;
use crate::models::symbol::Sigil;

const FORMAT_HINT: &str = "Expected: file:line[:column]\nExample: rules/pe.yara:12:9";

/// Cursor location as typed on the command line (1-indexed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLocation {
    pub file: PathBuf,
    pub line: u32,
    /// `None` when only `file:line` was given
    pub column: Option<u32>,
}

impl ParsedLocation {
    /// Parse and resolve the file against the current directory
    ///
    /// A missing column becomes the line's first non-blank character, or the
    /// identifier right after it when that character is a string sigil.
    pub fn parse_absolute(input: &str) -> Result<Self> {
        Self::parse(input)?.to_absolute()?.with_indent_column()
    }

    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("Location cannot be empty");
        }

        let (file, rest) = split_location(input)?;
        let mut numbers = rest.splitn(2, ':');
        let line = parse_number(numbers.next().unwrap_or_default(), "line")?;
        let column = numbers
            .next()
            .map(|col| parse_number(col, "column"))
            .transpose()?;

        Ok(Self {
            file: PathBuf::from(file),
            line,
            column,
        })
    }

    /// Like [`parse_absolute`](Self::parse_absolute) but the column is mandatory
    pub fn parse_with_column(input: &str) -> Result<Self> {
        let (_, rest) = split_location(input.trim())?;
        if !rest.contains(':') {
            bail!("A column is required. {}", FORMAT_HINT);
        }
        Self::parse_absolute(input)
    }

    pub fn to_absolute(&self) -> Result<Self> {
        let file = if self.file.is_absolute() {
            self.file.clone()
        } else {
            std::env::current_dir()
                .context("Failed to get current directory")?
                .join(&self.file)
        };

        let file = file
            .canonicalize()
            .map_err(|_| anyhow::anyhow!("File not found: {}", file.display()))?;

        Ok(Self { file, ..self.clone() })
    }

    fn with_indent_column(self) -> Result<Self> {
        if self.column.is_some() {
            return Ok(self);
        }
        let text = std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let doc = Document::new(&text);
        let line = self.line - 1;
        let column = doc.first_non_whitespace(line).map_or(1, |col| {
            let at = Position::new(line, col);
            match doc.char_at(at).and_then(Sigil::from_char) {
                Some(_) => col + 2,
                None => col + 1,
            }
        });
        Ok(Self {
            column: Some(column),
            ..self
        })
    }

    /// 0-indexed position for the analysis layer
    pub fn position(&self) -> Position {
        Position::from_cli(self.line, self.column.unwrap_or(1))
    }
}

/// Split at the first `:` that is followed by a number
///
/// A leading drive letter (`C:`) is never a split point.
fn split_location(input: &str) -> Result<(&str, &str)> {
    let bytes = input.as_bytes();
    let skip = if bytes.len() > 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        2
    } else {
        0
    };

    let split = input[skip..]
        .char_indices()
        .map(|(idx, c)| (idx + skip, c))
        .find(|&(idx, c)| {
            c == ':'
                && input[idx + 1..]
                    .chars()
                    .next()
                    .is_some_and(|next| next.is_ascii_digit() || next == '-')
        })
        .map(|(idx, _)| idx);

    match split {
        Some(idx) if input[idx + 1..].starts_with('-') => bail!(
            "Invalid line number: negative values not allowed. Line numbers are 1-indexed.\n{}",
            FORMAT_HINT
        ),
        Some(idx) => Ok((&input[..idx], &input[idx + 1..])),
        None => bail!("Invalid location format. {}", FORMAT_HINT),
    }
}

fn parse_number(text: &str, what: &str) -> Result<u32> {
    let value: u32 = text.parse().map_err(|_| {
        anyhow::anyhow!(
            "Invalid {} number '{}': must be a positive integer (1-indexed)",
            what,
            text
        )
    })?;
    if value == 0 {
        bail!("{} number must be >= 1 (got 0). Positions are 1-indexed.", what);
    }
    Ok(value)
}

impl std::fmt::Display for ParsedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)?;
        match self.column {
            Some(column) => write!(f, ":{}", column),
            None => Ok(()),
        }
    }
}
