use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use anyhow::Result;

mod config;
mod commands;
mod error;

use config::Config;

#[derive(Parser)]
#[command(name = "trackbin")]
#[command(about = "trackbin - Query binned read-coverage track files")]
#[command(version)]
#[command(long_about = "
trackbin decodes .trackbin coverage files and reports the read counts of
every bin overlapping a genomic location.

Examples:
  trackbin query chr1:1000000-1010000 --dir tracks --genome hg19 --bin-width 100
  trackbin query chrX:1-5000 --width u16 --pretty
  trackbin header chr1 --dir tracks
  trackbin config --example --output trackbin.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Track selection shared by commands, overriding the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct TrackArgs {
    /// Directory holding the track files
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Genome assembly (e.g. hg19)
    #[arg(long)]
    pub genome: Option<String>,

    /// Track mode label
    #[arg(long)]
    pub mode: Option<String>,

    /// Bin width in base pairs
    #[arg(long)]
    pub bin_width: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode the bin counts overlapping a location
    Query {
        /// Location as chr:start-end (1-based, inclusive)
        location: String,

        #[command(flatten)]
        track: TrackArgs,

        /// Counter width (auto reads it from the file header)
        #[arg(long, default_value = "auto")]
        width: WidthMode,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show the header of a chromosome's track file
    Header {
        /// Chromosome name
        chr: String,

        #[command(flatten)]
        track: TrackArgs,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Use the default configuration instead of the effective one
        #[arg(long)]
        example: bool,

        /// Write the configuration to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidthMode {
    Auto,
    U8,
    U16,
    U32,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Execute the requested command
    match cli.command {
        Commands::Query { location, track, width, pretty } => {
            commands::query::execute(&config, &location, &track, width, pretty)?;
        }

        Commands::Header { chr, track } => {
            commands::header::execute(&config, &chr, &track)?;
        }

        Commands::Config { example, output } => {
            let config = if example { Config::default() } else { config };
            match output {
                Some(path) => {
                    config.save_to_file(&path)?;
                    log::info!("Configuration written to {}", path.display());
                }
                None => print!("{}", config.to_toml()?),
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        error::print_error_and_exit(&e);
    }
}
