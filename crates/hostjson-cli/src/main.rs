mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::EnvFilter;

use commands::check::CheckCommand;
use commands::fmt::FmtCommand;
use commands::raw::RawCommand;

#[derive(Parser)]
#[command(name = "hostjson", version, about = "JSON with ECMAScript semantics")]
struct Cli {
    /// Config file (default: hostjson.toml in this or a parent directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reformat JSON text
    Fmt(FmtCommand),
    /// Validate JSON text
    Check(CheckCommand),
    /// Validate a primitive fragment with rawJSON and print it verbatim
    Raw(RawCommand),
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fmt(cmd) => {
            let config = config::load_config(cli.config.as_deref())?;
            cmd.run(&config)?
        }
        Commands::Check(cmd) => cmd.run()?,
        Commands::Raw(cmd) => cmd.run()?,
    }

    Ok(())
}
