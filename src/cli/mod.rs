pub mod check;
pub mod completions;
pub mod dump;
pub mod fmt;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::{ParseOptions, CONFIG_FILENAME};
use crate::error::{MapError, Result};

/// mapchunk - Reader and formatter for chunked map files
#[derive(Parser, Debug)]
#[command(name = "mapchunk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Parse options file (default: ./mapchunk.yaml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse map files and report problems
    Check(check::CheckArgs),

    /// Rewrite map files in canonical form
    Fmt(fmt::FmtArgs),

    /// Print a parsed map as JSON
    Dump(dump::DumpArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Resolve parse options: an explicit `--config` file, else
/// `mapchunk.yaml` in the current directory, else the defaults.
pub fn load_options(config: Option<&Path>) -> Result<ParseOptions> {
    match config {
        Some(path) => ParseOptions::load(path),
        None => {
            let local = Path::new(CONFIG_FILENAME);
            if local.is_file() {
                ParseOptions::load(local)
            } else {
                Ok(ParseOptions::default())
            }
        }
    }
}

pub(crate) fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| MapError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["mapchunk", "check", "a.map", "--config", "strict.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("strict.yaml")));
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_load_options_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strict_chunks: true").unwrap();

        let options = load_options(Some(file.path())).unwrap();
        assert!(options.strict_chunks);
    }

    #[test]
    fn test_read_source_missing() {
        assert!(matches!(
            read_source(Path::new("/nonexistent/town.map")),
            Err(MapError::Io { .. })
        ));
    }
}
