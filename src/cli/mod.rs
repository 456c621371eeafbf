//! CLI module for yaralens
//!
//! Provides command-line interface using clap derive macros.

pub mod commands;
pub mod location;
pub mod output;
pub mod response;

pub use location::ParsedLocation;
pub use output::OutputContext;

use clap::{Parser, Subcommand};

use commands::{
    compile::CompileArgs, complete::CompleteArgs, config::ConfigArgs, doctor::DoctorArgs,
    find::FindArgs,
};

const LONG_ABOUT: &str = r#"
yaralens - Editor intelligence for YARA rule files

yaralens classifies the token under the cursor, resolves definitions and
references of string variables and rules, completes module members and
turns yarac output into positioned diagnostics.

Positions are 1-indexed: file:line[:column].

QUICK START:
  1. Check the compiler:      yaralens doctor
  2. Inspect a token:         yaralens find symbol rules/pe.yara:12:9
  3. Go to definition:        yaralens find def rules/pe.yara:20:10
  4. Compile a file:          yaralens compile file rules/pe.yara

MORE EXAMPLES:
  yaralens find refs rules/pe.yara:20:10 --limit 20
  yaralens complete rules/pe.yara:8:12              # right after "pe."
  yaralens compile all --path rules --limit 50
  yaralens config init --global
"#;

/// yaralens - Editor intelligence for YARA rule files
#[derive(Parser, Debug)]
#[command(name = "yaralens")]
#[command(author, version, about, long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
#[command(after_help = "Use 'yaralens <COMMAND> --help' for more information about a command.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify tokens, find definitions and references
    Find(FindArgs),

    /// Compile rule files with yarac and report diagnostics
    Compile(CompileArgs),

    /// Complete module members after a `.`
    Complete(CompleteArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Check the compiler and configuration files
    Doctor(DoctorArgs),
}
