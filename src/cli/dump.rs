//! Dump command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::config::ParseOptions;
use crate::error::{MapError, Result};
use crate::output::Printer;
use crate::parser::parse_map_with;

use super::read_source;

/// Print a parsed map as JSON
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Map file to dump
    pub file: PathBuf,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

/// JSON text of the document in `args.file`. Diagnostics go to the printer.
pub fn render(args: &DumpArgs, options: &ParseOptions, printer: &Printer) -> Result<String> {
    let source = read_source(&args.file)?;
    let output = parse_map_with(&source, options)?;

    for diagnostic in output.diagnostics.iter() {
        printer.diagnostic(&args.file, &source, diagnostic);
    }

    let json = if args.compact {
        serde_json::to_string(&output.document)
    } else {
        serde_json::to_string_pretty(&output.document)
    };
    json.map_err(|e| MapError::Command {
        message: format!("Failed to serialize map: {}", e),
        help: None,
    })
}

pub fn run(args: DumpArgs, options: &ParseOptions, printer: &Printer) -> Result<()> {
    println!("{}", render(&args, options, printer)?);
    Ok(())
}
