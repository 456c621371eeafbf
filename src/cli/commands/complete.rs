//! Complete command implementation

use anyhow::Result;
use clap::Args;

use crate::app::App;
use crate::cli::ParsedLocation;
use crate::cli::response::CompletionResponse;

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Cursor right after a `.` (file:line:column)
    pub location: String,
}

pub async fn execute(args: CompleteArgs, app: &App) -> Result<()> {
    let ctx = &app.output;
    let loc = ParsedLocation::parse_with_column(&args.location)?;

    match app.completion.complete(&loc.file, loc.position()).await {
        Ok(Some(items)) => {
            let response = CompletionResponse {
                count: items.len(),
                items,
            };
            ctx.print_success_flat(response);
        }
        Ok(None) => ctx.print_error("Module is not imported in this file"),
        Err(e) => ctx.print_error(&e.to_string()),
    }

    Ok(())
}
