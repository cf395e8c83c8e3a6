//! Fmt command implementation.
//!
//! Rewrites map files in canonical form. Files whose parse produced
//! warnings are left alone, since rewriting them would drop whatever the
//! parser skipped.

use std::path::PathBuf;

use clap::Args;

use crate::config::ParseOptions;
use crate::error::{MapError, Result};
use crate::output::{display_path, plural, Printer};
use crate::parser::parse_map_with;
use crate::writer::{write_map, write_map_file};

use super::read_source;

/// Rewrite map files in canonical form
#[derive(Args, Debug)]
pub struct FmtArgs {
    /// Map files to format
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Only report files that are not formatted; write nothing
    #[arg(long, conflicts_with = "stdout")]
    pub check: bool,

    /// Print formatted text to stdout instead of rewriting files
    #[arg(long)]
    pub stdout: bool,
}

pub fn run(args: FmtArgs, options: &ParseOptions, printer: &Printer) -> Result<()> {
    let mut changed = 0;
    let mut skipped = 0;

    for path in &args.files {
        let source = read_source(path)?;
        let display = display_path(path);

        let output = match parse_map_with(&source, options) {
            Ok(output) => output,
            Err(err) => {
                printer.parse_error(path, &source, &err);
                skipped += 1;
                continue;
            }
        };

        if output.diagnostics.has_warnings() {
            for diagnostic in output.diagnostics.iter() {
                printer.diagnostic(path, &source, diagnostic);
            }
            printer.warning("Skipping", &display);
            skipped += 1;
            continue;
        }

        if args.stdout {
            print!("{}", write_map(&output.document));
            continue;
        }

        if write_map(&output.document) == source {
            continue;
        }
        changed += 1;

        if args.check {
            printer.warning("Unformatted", &display);
        } else {
            write_map_file(&output.document, path)?;
            printer.status("Formatted", &display);
        }
    }

    if skipped > 0 {
        return Err(MapError::Command {
            message: format!("{} could not be formatted", plural(skipped, "map", "maps")),
            help: Some("Run `mapchunk check` to see why".to_string()),
        });
    }
    if args.check && changed > 0 {
        return Err(MapError::Command {
            message: format!("{} would be reformatted", plural(changed, "map", "maps")),
            help: Some("Run `mapchunk fmt` without --check".to_string()),
        });
    }

    if !args.stdout {
        printer.status(
            "Finished",
            &format!("{} changed", plural(changed, "map", "maps")),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MESSY: &str = "#HERO 1,1#END #BGIMG  bg.png  #END\n\n#TBOX\n2,2,Gold#END";
    const CANONICAL: &str = "#HERO\n1,1#END\n#BGIMG\nbg.png#END\n#FLOOR\n#END\n#MAP\n#END\n#TBOX\n2,2,Gold#END\n";

    fn args(path: PathBuf, check: bool) -> FmtArgs {
        FmtArgs {
            files: vec![path],
            check,
            stdout: false,
        }
    }

    #[test]
    fn test_fmt_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("town.map");
        fs::write(&path, MESSY).unwrap();

        run(args(path.clone(), false), &ParseOptions::default(), &Printer::plain()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), CANONICAL);

        // A second run has nothing to do.
        run(args(path.clone(), true), &ParseOptions::default(), &Printer::plain()).unwrap();
    }

    #[test]
    fn test_fmt_check_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("town.map");
        fs::write(&path, MESSY).unwrap();

        let err = run(args(path.clone(), true), &ParseOptions::default(), &Printer::plain()).unwrap_err();
        assert_eq!(err.to_string(), "1 map would be reformatted");
        assert_eq!(fs::read_to_string(&path).unwrap(), MESSY);
    }

    #[test]
    fn test_fmt_skips_files_with_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("town.map");
        let text = "#HERO 1,1#END\n#WEATHER rain#END\n";
        fs::write(&path, text).unwrap();

        assert!(run(args(path.clone(), false), &ParseOptions::default(), &Printer::plain()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }
}
