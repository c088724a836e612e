//! rpo-export - RPO mesh export tool
//!
//! Converts RPO binary meshes (.rpo) to Wavefront OBJ (.obj)
//!
//! # Exit codes
//!
//! - 0: success, `--help`, `--version`
//! - 1: bad arguments, or at least one file failed to convert
//! - 2: a named input path does not exist

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};
use rpo_export::batch::{self, BatchSummary, FailurePolicy};
use rpo_export::{ConvertError, convert_batch};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_USAGE: u8 = 1;
const EXIT_MISSING_PATH: u8 = 2;

#[derive(Parser)]
#[command(name = "rpo-export")]
#[command(about = "RPO mesh export tool - converts .rpo meshes to Wavefront OBJ")]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Stop at the first file that fails to decode
    #[arg(long, global = true)]
    fail_fast: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single file
    Single {
        /// Input .rpo file
        input: PathBuf,

        /// Output .obj file (default: <input name>.obj in the current directory)
        output: Option<PathBuf>,
    },

    /// Convert one or more files into the current directory
    Multi {
        /// Input .rpo files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Convert every file in a directory
    Dir {
        /// Directory containing .rpo files
        input_dir: PathBuf,

        /// Directory to write .obj files to (created if missing)
        output_dir: PathBuf,
    },
}

/// Parse arguments with `-v` as the version flag
fn parse_cli() -> Result<Cli, clap::Error> {
    let matches = Cli::command()
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::Version)
                .help("Print version"),
        )
        .try_get_matches()?;
    Cli::from_arg_matches(&matches)
}

fn main() -> ExitCode {
    let cli = match parse_cli() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    // Initialize logging
    let level = if cli.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match run(cli) {
        Ok(summary) if summary.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{:#}", err);
            match err.downcast_ref::<ConvertError>() {
                Some(ConvertError::MissingPath(_)) => ExitCode::from(EXIT_MISSING_PATH),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<BatchSummary> {
    let policy = if cli.fail_fast {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Continue
    };

    let jobs = match cli.command {
        Commands::Single { input, output } => {
            vec![batch::plan_single(&input, output.as_deref())?]
        }

        Commands::Multi { inputs } => batch::plan_multi(&inputs)?,

        Commands::Dir {
            input_dir,
            output_dir,
        } => {
            let jobs = batch::plan_dir(&input_dir, &output_dir)?;
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
            tracing::info!("Converting {} files from {:?}", jobs.len(), input_dir);
            jobs
        }
    };

    Ok(convert_batch(&jobs, policy)?)
}
