use clap::Parser;
use miette::Result;
use mapchunk::cli::{load_options, Cli, Commands};
use mapchunk::config::ParseOptions;
use mapchunk::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    let options = match cli.command {
        Commands::Completions(_) => ParseOptions::default(),
        _ => load_options(cli.config.as_deref())?,
    };

    match cli.command {
        Commands::Check(args) => mapchunk::cli::check::run(args, &options, &printer)?,
        Commands::Fmt(args) => mapchunk::cli::fmt::run(args, &options, &printer)?,
        Commands::Dump(args) => mapchunk::cli::dump::run(args, &options, &printer)?,
        Commands::Completions(args) => mapchunk::cli::completions::run(args)?,
    }

    Ok(())
}
