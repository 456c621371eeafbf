//! Find command implementation
//!
//! Definition, reference and symbol lookup inside one rule file.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::App;
use crate::cli::ParsedLocation;
use crate::cli::response::{
    DefinitionResponse, LocationOutput, ReferencesResponse, SymbolOutput,
};

#[derive(Args, Debug)]
pub struct FindArgs {
    #[command(subcommand)]
    pub command: FindCommand,
}

#[derive(Subcommand, Debug)]
pub enum FindCommand {
    /// Go to the declaration of the variable or rule at position
    Def {
        /// File path with position (file:line[:column])
        location: String,
    },

    /// Find all references to the variable or rule at position
    Refs {
        /// File path with position (file:line[:column])
        location: String,

        /// Maximum results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Classify the token at position
    Symbol {
        /// File path with position (file:line[:column])
        location: String,
    },
}

pub async fn execute(args: FindArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    match args.command {
        FindCommand::Def { location } => {
            let loc = ParsedLocation::parse_absolute(&location)?;

            match app.symbols.definition(&loc.file, loc.position()).await {
                Ok(Some(def)) => {
                    let response = DefinitionResponse {
                        definition: Some(LocationOutput::from_location(&def, ctx.root())),
                        message: None,
                    };
                    ctx.print_success_flat(response);
                }
                Ok(None) => {
                    let response = DefinitionResponse {
                        definition: None,
                        message: Some("No definition found".to_string()),
                    };
                    ctx.print_success_flat(response);
                }
                Err(e) => ctx.print_error(&e.to_string()),
            }
        }

        FindCommand::Refs { location, limit } => {
            let loc = ParsedLocation::parse_absolute(&location)?;

            match app.symbols.references(&loc.file, loc.position()).await {
                Ok(locations) => {
                    let total = locations.len();
                    let limit = limit.unwrap_or(total);
                    let references: Vec<LocationOutput> = locations
                        .iter()
                        .take(limit)
                        .map(|l| LocationOutput::from_location(l, ctx.root()))
                        .collect();

                    let response = ReferencesResponse {
                        count: references.len(),
                        truncated: (references.len() < total).then_some(true),
                        references,
                    };
                    ctx.print_success_flat(response);
                }
                Err(e) => ctx.print_error(&e.to_string()),
            }
        }

        FindCommand::Symbol { location } => {
            let loc = ParsedLocation::parse_absolute(&location)?;

            match app.symbols.inspect(&loc.file, loc.position()).await {
                Ok(info) => {
                    let response =
                        SymbolOutput::new(&info.symbol, info.scope, &loc.file, ctx.root());
                    ctx.print_success_flat(response);
                }
                Err(e) => ctx.print_error(&e.to_string()),
            }
        }
    }

    Ok(())
}
