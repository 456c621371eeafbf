//! Command implementations for yaralens
//!
//! Each command is implemented in its own module.

pub mod compile;
pub mod complete;
pub mod config;
pub mod doctor;
pub mod find;
