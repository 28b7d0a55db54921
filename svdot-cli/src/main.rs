use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::CliError;
use svdot_render::OutputFormat;

#[derive(Parser)]
#[command(name = "svdot")]
#[command(about = "svdot - breakpoint dotplots for structural-variant review")]
#[command(version)]
#[command(long_about = "
svdot draws pairwise dotplots of the chromosome parts around a structural-variant
breakpoint. Alignments come from yass; simple tandem repeats are marked on both axes.

Examples:
  svdot plot --variant del_chr1.json --outdir plots/
  svdot plot --variant a.json --variant b.json --outdir plots/ --format svg
  svdot pair --seq1 ref.fa --seq2 alt.fa --out ref_vs_alt.pdf
  svdot check
  svdot config --example --output svdot.toml
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

#[derive(Subcommand)]
pub enum Commands {
    /// Write one multi-page dotplot artifact per variant
    Plot {
        /// Variant description (JSON); may be given several times
        #[arg(long, required = true)]
        variant: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        outdir: PathBuf,

        /// Artifact format (defaults to [render] format)
        #[arg(long)]
        format: Option<FormatArg>,
    },

    /// Dotplot of the first records of two FASTA files on a single page
    Pair {
        /// First sequence (x axis)
        #[arg(long, required = true)]
        seq1: PathBuf,

        /// Second sequence (y axis)
        #[arg(long, required = true)]
        seq2: PathBuf,

        /// Output file (PDF/SVG)
        #[arg(short, long, required = true)]
        out: PathBuf,

        /// Output format (auto-detected from extension)
        #[arg(long)]
        format: Option<FormatArg>,
    },

    /// Report whether yass and the plotting backends are available
    Check,

    /// Show or generate configuration
    Config {
        /// Print an example configuration file
        #[arg(long)]
        example: bool,

        /// Write the example configuration to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FormatArg {
    Pdf,
    Svg,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Svg => OutputFormat::Svg,
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Plot { variant, outdir, format } => {
            commands::plot::execute(&config, &variant, &outdir, format.map(Into::into), cli.quiet)?;
        }

        Commands::Pair { seq1, seq2, out, format } => {
            commands::pair::execute(&config, &seq1, &seq2, &out, format.map(Into::into))?;
        }

        Commands::Check => {
            commands::check::execute(&config)?;
        }

        Commands::Config { example, output } => {
            commands::config::execute(&config, example, output.as_deref())?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            error::print_error_and_exit(cli_err);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
