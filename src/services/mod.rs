//! Service layer for yaralens

pub mod compile;
pub mod completion;
pub mod config;
pub mod symbols;

pub use compile::{BatchReport, CompileService, DefaultCompileService};
pub use completion::{CompletionService, DefaultCompletionService};
pub use config::{ConfigService, DefaultConfigService};
pub use symbols::{DefaultSymbolService, SymbolInfo, SymbolService};
