//! Source text model
//!
//! Immutable snapshot of a rule file split into lines. Every query re-reads
//! from the snapshot it is given; nothing is cached between queries.

use std::path::Path;

use crate::error::AnalysisError;
use crate::models::position::{Position, Range};

/// Characters allowed inside an identifier
#[inline]
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convert a byte offset inside `line` to a char column
#[inline]
pub fn char_column(line: &str, byte_offset: usize) -> u32 {
    line.get(..byte_offset)
        .map(|prefix| prefix.chars().count() as u32)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Split text on `\n`; a trailing `\r` on each line is dropped
    pub fn new(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { lines }
    }

    /// Read a rule file, refusing files above the configured size limit
    pub async fn load(path: &Path) -> Result<Self, AnalysisError> {
        let limit = crate::config::max_file_size_bytes();
        let metadata = tokio::fs::metadata(path).await?;
        if metadata.len() > limit {
            return Err(AnalysisError::FileTooLarge {
                path: path.display().to_string(),
                size_mb: metadata.len() / (1024 * 1024),
                limit_mb: limit / (1024 * 1024),
            });
        }

        let bytes = tokio::fs::read(path).await?;
        let text = String::from_utf8_lossy(&bytes);
        tracing::debug!("Loaded {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::new(&text))
    }

    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    pub fn last_line(&self) -> u32 {
        self.line_count().saturating_sub(1)
    }

    pub fn line(&self, line: u32) -> Option<&str> {
        self.lines.get(line as usize).map(String::as_str)
    }

    /// Lines paired with their 0-indexed line numbers
    pub fn lines(&self) -> impl Iterator<Item = (u32, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(idx, line)| (idx as u32, line.as_str()))
    }

    /// Character at a position, `None` when outside the document
    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.line(pos.line)?.chars().nth(pos.character as usize)
    }

    /// Character immediately before `pos` on the same line
    ///
    /// Returns `None` at column 0 rather than wrapping to the previous line.
    pub fn char_before(&self, pos: Position) -> Option<char> {
        let column = pos.character.checked_sub(1)?;
        self.char_at(Position::new(pos.line, column))
    }

    /// Maximal identifier span touching `pos`
    ///
    /// The cursor may sit on any character of the word or directly after its
    /// last character. Returns `None` when neither side is an identifier char.
    pub fn word_range_at(&self, pos: Position) -> Option<Range> {
        let chars: Vec<char> = self.line(pos.line)?.chars().collect();
        let col = pos.character as usize;

        let anchor = if chars.get(col).copied().is_some_and(is_ident_char) {
            col
        } else if col > 0 && chars.get(col - 1).copied().is_some_and(is_ident_char) {
            col - 1
        } else {
            return None;
        };

        let start = chars[..anchor]
            .iter()
            .rposition(|c| !is_ident_char(*c))
            .map_or(0, |idx| idx + 1);
        let end = chars[anchor..]
            .iter()
            .position(|c| !is_ident_char(*c))
            .map_or(chars.len(), |idx| anchor + idx);

        Some(Range::new(
            Position::new(pos.line, start as u32),
            Position::new(pos.line, end as u32),
        ))
    }

    /// Text of a single-line range
    pub fn text_in(&self, range: Range) -> Option<String> {
        if !range.is_single_line() {
            return None;
        }
        let line = self.line(range.start.line)?;
        let len = range.end.character.saturating_sub(range.start.character) as usize;
        Some(
            line.chars()
                .skip(range.start.character as usize)
                .take(len)
                .collect(),
        )
    }

    /// Column of the first non-whitespace character, or the line length when blank
    pub fn first_non_whitespace(&self, line: u32) -> Option<u32> {
        let text = self.line(line)?;
        let column = text
            .chars()
            .position(|c| !c.is_whitespace())
            .unwrap_or_else(|| text.chars().count());
        Some(column as u32)
    }

    /// Text of `line` before `column`
    pub fn prefix_before(&self, pos: Position) -> Option<String> {
        let text = self.line(pos.line)?;
        Some(text.chars().take(pos.character as usize).collect())
    }
}
