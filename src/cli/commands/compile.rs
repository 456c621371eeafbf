//! Compile command implementation
//!
//! Runs `yarac` and reports its diagnostics with 1-indexed positions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::App;
use crate::cli::response::{BatchCompileResponse, CompileResponse, DiagnosticOutput};
use crate::models::diagnostic::DiagnosticSeverity;

#[derive(Args, Debug)]
pub struct CompileArgs {
    #[command(subcommand)]
    pub command: CompileCommand,
}

#[derive(Subcommand, Debug)]
pub enum CompileCommand {
    /// Compile one rule file
    File {
        /// Rule file path
        file: PathBuf,

        /// Filter by severity (error, warning)
        #[arg(long, short = 's', value_delimiter = ',')]
        severity: Option<Vec<String>>,
    },

    /// Compile every .yara/.yar file under a directory
    All {
        /// Root directory (defaults to the current directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Maximum number of files (default from config: workspace.max_files)
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub async fn execute(args: CompileArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    match args.command {
        CompileCommand::File { file, severity } => {
            let abs_file = if file.is_absolute() {
                file
            } else {
                app.root().join(file)
            };

            let severity_filter = match parse_severities(severity.as_deref()) {
                Ok(filter) => filter,
                Err(message) => {
                    ctx.print_error(&message);
                    return Ok(());
                }
            };

            match app.compile.compile_file(&abs_file).await {
                Ok(report) => {
                    // Counts and the compiled flag always reflect the full report
                    let mut response = CompileResponse::from_report(&report, ctx.root());
                    if let Some(filter) = severity_filter {
                        response.diagnostics = report
                            .diagnostics
                            .iter()
                            .filter(|d| filter.contains(&d.severity))
                            .map(DiagnosticOutput::from)
                            .collect();
                    }
                    ctx.print_success_flat(response);
                }
                Err(e) => ctx.print_error(&e.to_string()),
            }
        }

        CompileCommand::All { path, limit } => {
            let root = match path {
                Some(p) if p.is_absolute() => p,
                Some(p) => app.root().join(p),
                None => app.root().to_path_buf(),
            };
            let limit = limit.unwrap_or(app.config().workspace.max_files);

            match app.compile.compile_all(&root, limit).await {
                Ok(batch) => {
                    let files: Vec<CompileResponse> = batch
                        .iter()
                        .map(|(file, outcome)| match outcome {
                            Ok(report) => CompileResponse::from_report(report, ctx.root()),
                            Err(e) => CompileResponse::failed(file, e.to_string(), ctx.root()),
                        })
                        .collect();

                    let response = BatchCompileResponse {
                        root: ctx.relative_path(&root),
                        file_count: files.len(),
                        failed_count: files.iter().filter(|f| !f.compiled).count(),
                        files,
                    };
                    ctx.print_success_flat(response);
                }
                Err(e) => ctx.print_error(&e.to_string()),
            }
        }
    }

    Ok(())
}

fn parse_severities(
    raw: Option<&[String]>,
) -> std::result::Result<Option<Vec<DiagnosticSeverity>>, String> {
    raw.map(|values| values.iter().map(|s| s.parse()).collect::<Result<Vec<_>, _>>())
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_severities() {
        let raw = vec!["error".to_string(), "w".to_string()];
        assert_eq!(
            parse_severities(Some(raw.as_slice())).unwrap(),
            Some(vec![DiagnosticSeverity::Error, DiagnosticSeverity::Warning])
        );
        assert_eq!(parse_severities(None).unwrap(), None);

        let bad = vec!["hint".to_string()];
        assert!(parse_severities(Some(bad.as_slice())).unwrap_err().contains("hint"));
    }
}
