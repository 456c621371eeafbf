//! Infrastructure layer for yaralens
//!
//! Text model, compiler process, rule discovery and the module schema.

pub mod compiler;
pub mod document;
pub mod file_filter;
pub mod schema;
