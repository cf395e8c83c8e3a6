//! Check command implementation.
//!
//! Parses each file and reports diagnostics without writing anything.

use std::path::PathBuf;

use clap::Args;

use crate::config::ParseOptions;
use crate::error::{MapError, Result};
use crate::output::{display_path, plural, Printer};
use crate::parser::parse_map_with;

use super::read_source;

/// Parse map files and report problems
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Map files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub deny_warnings: bool,
}

pub fn run(args: CheckArgs, options: &ParseOptions, printer: &Printer) -> Result<()> {
    let mut failed = 0;
    let mut warnings = 0;

    for path in &args.files {
        let source = read_source(path)?;
        printer.status("Checking", &display_path(path));

        match parse_map_with(&source, options) {
            Ok(output) => {
                for diagnostic in output.diagnostics.iter() {
                    printer.diagnostic(path, &source, diagnostic);
                }
                warnings += output.diagnostics.warning_count();
                if args.deny_warnings && output.diagnostics.has_warnings() {
                    failed += 1;
                }
            }
            Err(err) => {
                printer.parse_error(path, &source, &err);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(MapError::Command {
            message: format!("{} did not pass", plural(failed, "map", "maps")),
            help: args
                .deny_warnings
                .then(|| "Warnings count as failures with --deny-warnings".to_string()),
        });
    }

    printer.status(
        "Finished",
        &format!(
            "{} checked, {}",
            plural(args.files.len(), "map", "maps"),
            plural(warnings, "warning", "warnings")
        ),
    );
    Ok(())
}
