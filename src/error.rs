//! Error types for yaralens

use std::path::PathBuf;

use thiserror::Error;

pub type YaraLensResult<T> = std::result::Result<T, YaraLensError>;

#[derive(Debug, Error)]
pub enum YaraLensError {
    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures of a definition or reference query
///
/// "Nothing found" is not an error: queries return `Ok(None)` or an empty list.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No symbol at line {line}, column {column}")]
    NoSymbolAtPosition { line: u32, column: u32 },

    #[error("No enclosing rule above line {line}")]
    NoEnclosingScope { line: u32 },

    #[error("Request cancelled")]
    Cancelled,

    #[error("File too large ({size_mb}MB > {limit_mb}MB limit): {path}")]
    FileTooLarge {
        path: String,
        size_mb: u64,
        limit_mb: u64,
    },

    #[error("Analysis task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Build from a 0-indexed position, reported 1-indexed
    pub fn no_symbol_at(line: u32, character: u32) -> Self {
        Self::NoSymbolAtPosition {
            line: line.saturating_add(1),
            column: character.saturating_add(1),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Failures of a compiler invocation
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Cannot compile rule. Please specify an install path.")]
    CompilerNotFound { command: PathBuf },

    #[error("Compile flags: {0}")]
    BadCompileFlag(String),

    #[error("Failed to start compiler {command}: {message}")]
    Spawn { command: PathBuf, message: String },

    #[error("Compiler timed out after {0}s")]
    Timeout(u64),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Configuration-level failures are shown to the user verbatim
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::CompilerNotFound { .. } | Self::BadCompileFlag(_)
        )
    }

    pub fn spawn_failure(command: PathBuf, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::CompilerNotFound { command }
        } else {
            Self::Spawn {
                command,
                message: err.to_string(),
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiler_not_found_message() {
        let err = CompileError::spawn_failure(
            PathBuf::from("yarac"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, CompileError::CompilerNotFound { .. }));
        assert_eq!(
            err.to_string(),
            "Cannot compile rule. Please specify an install path."
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_other_spawn_failure() {
        let err = CompileError::spawn_failure(
            PathBuf::from("/opt/yarac"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, CompileError::Spawn { .. }));
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("/opt/yarac"));
    }

    #[test]
    fn test_bad_flag_is_configuration() {
        let err = CompileError::BadCompileFlag("unknown option: --nope".to_string());
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "Compile flags: unknown option: --nope");
    }

    #[test]
    fn test_no_symbol_reports_one_indexed() {
        let err = AnalysisError::no_symbol_at(0, 4);
        assert_eq!(err.to_string(), "No symbol at line 1, column 5");
        assert!(!err.is_cancelled());
        assert!(AnalysisError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_wrapping() {
        let err: YaraLensError = AnalysisError::Cancelled.into();
        assert_eq!(err.to_string(), "Request cancelled");
    }
}
