mod commands;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::path::PathBuf;
use tablesort_core::config::{load_config, SorterConfig};
use tablesort_core::error::TableSortError;

#[derive(Parser)]
#[command(
    name = "tablesort",
    version,
    about = "Find and sort the tables of HTML documents"
)]
struct Cli {
    /// JSON engine configuration
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Write the log to a file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sortable tables of an HTML file
    Tables {
        /// Path to the HTML file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Sort one table of an HTML file by activating its columns
    Sort {
        /// Path to the HTML file
        input_file: PathBuf,

        /// Table to sort, as listed by `tables` (e.g. "0" or "table-0")
        #[arg(short, long)]
        table: String,

        /// Column to activate; repeat to toggle or chain (e.g. -a 1 -a 1)
        #[arg(short, long = "activate", value_name = "COLUMN", required = true)]
        activate: Vec<usize>,

        /// Write the sorted HTML to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Strip the sort controls and their style sheet from the output
        #[arg(long)]
        no_controls: bool,
    },
    /// Show how cell texts are classified for sorting
    Classify {
        /// Cell texts to classify
        #[arg(required = true)]
        texts: Vec<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<(), TableSortError> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // A second logger can only come from a test harness; ignore it.
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let _ = WriteLogger::init(level, Config::default(), file);
        }
        None => {
            let _ = TermLogger::init(
                level,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            );
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), TableSortError> {
    init_logging(cli.verbose, cli.log_file.as_ref())?;

    let config = match &cli.config {
        Some(path) => {
            let config = load_config(path)?;
            log::debug!("[cli] config loaded from {}", path.display());
            config
        }
        None => SorterConfig::default(),
    };

    match cli.command {
        Commands::Tables { input_file, output } => {
            commands::tables::run(input_file, &config, &output)
        }
        Commands::Sort {
            input_file,
            table,
            activate,
            out,
            no_controls,
        } => commands::sort::run(input_file, &table, &activate, &config, out, !no_controls),
        Commands::Classify { texts, output } => commands::classify::run(&texts, &output),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
