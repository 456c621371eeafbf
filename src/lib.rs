//! yaralens - Editor intelligence for YARA rules
//!
//! Token classification, rule scopes, definitions and references for
//! string variables and rules, module member completion, and positioned
//! diagnostics from the `yarac` compiler.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod infra;
pub mod models;
pub mod services;

pub use error::{YaraLensError, YaraLensResult};
