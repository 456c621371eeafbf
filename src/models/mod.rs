//! Data models for yaralens
//!
//! Contains core type definitions used throughout the application.

pub mod completion;
pub mod config;
pub mod diagnostic;
pub mod position;
pub mod symbol;

// Re-export commonly used types
pub use completion::{CompletionItem, CompletionKind};
pub use config::YaraLensConfig;
pub use diagnostic::{CompileReport, Diagnostic, DiagnosticSeverity};
pub use position::{Position, Range};
pub use symbol::{Location, RuleScope, Sigil, Symbol, SymbolKind};
