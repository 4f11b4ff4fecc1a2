// litho - reconcile rock mineral compositions from images and well logs

mod compare;
mod create;
mod exit_codes;
mod percent;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use lithoframe_config::ConfigError;
use lithoframe_core::FrameError;
use lithoframe_io::IoError;

use exit_codes::{EXIT_COMPARE_DIFFERS, EXIT_CONFIG, EXIT_DATA, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "litho")]
#[command(about = "Reconcile rock mineral compositions from images and well logs")]
#[command(version)]
struct Cli {
    /// Configuration file to use instead of the search locations
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine images, CSV and LAS files into one composition table
    #[command(after_help = "\
Examples:
  litho create slice1.png slice2.png -o well.csv
  litho create well.las counts.csv -t -o combined.las
  litho create -p slice1.png slice2.png")]
    Create {
        /// Output file; format inferred from the extension (.las or .csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Collapse the detailed palette via the configured translation
        #[arg(long, short = 't')]
        translate: bool,

        /// Write percentages rather than raw pixel counts
        #[arg(long, short = 'p')]
        percent: bool,

        /// Images, CSV or LAS files to parse
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Compare two inputs after reconciling each side (exit 1 = differs)
    #[command(after_help = "\
Exit code 1 indicates differences: differing cells, rows present on one side \
only, or extra columns.

Examples:
  litho compare well.las counts.csv
  litho compare old.csv new.csv --json")]
    Compare {
        /// The first file to compare
        file1: PathBuf,

        /// The second file to compare
        file2: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create { output, translate, percent, files } => {
            create::cmd_create(cli.config.as_deref(), output, translate, percent, &files)
        }
        Commands::Compare { file1, file2, json } => {
            compare::cmd_compare(cli.config.as_deref(), &file1, &file2, json)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(err: IoError) -> Self {
        Self { code: EXIT_IO, message: err.to_string(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::NotFound => {
                Some("create ./lithoframe.toml or pass -c <file>".to_string())
            }
            _ => None,
        };
        Self { code: EXIT_CONFIG, message: err.to_string(), hint }
    }

    pub fn data(err: FrameError) -> Self {
        Self { code: EXIT_DATA, message: err.to_string(), hint: None }
    }

    /// Differences found by `compare`; the report has already been printed.
    pub fn differs() -> Self {
        Self { code: EXIT_COMPARE_DIFFERS, message: String::new(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
