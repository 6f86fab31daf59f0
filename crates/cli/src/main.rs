// acsx - per-geography tables from block-layout survey workbooks

mod exit_codes;
mod extract;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "acsx")]
#[command(about = "Extract per-geography tables from block-layout survey workbooks")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log more to stderr (-v info, -vv debug). ACSX_LOG / RUST_LOG override.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an extraction config against a workbook or CSV export
    #[command(after_help = "\
Examples:
  acsx extract population.toml
  acsx extract population.toml --input acs_2022.xlsx --sheet Data
  acsx extract counties.toml --format csv --output counties.csv
  acsx extract counties.toml --format json --strict
  acsx extract counties.toml --format xlsx --output counties.xlsx")]
    Extract {
        /// Path to the extraction .toml config
        config: PathBuf,

        /// Workbook or CSV to read (overrides [source] file)
        #[arg(long, short = 'i')]
        input: Option<PathBuf>,

        /// Sheet name (overrides [source] sheet; default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t = Format::Tsv)]
        format: Format,

        /// Write output to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit with code 5 if any warning was recorded
        #[arg(long)]
        strict: bool,

        /// Suppress the summary and warning lines on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Parse and validate an extraction config without reading any data
    #[command(after_help = "\
Examples:
  acsx validate population.toml")]
    Validate {
        /// Path to the extraction .toml config
        config: PathBuf,
    },

    /// List the sheets of a workbook
    #[command(after_help = "\
Examples:
  acsx sheets acs_2022.xlsx
  acsx sheets acs_2022.xlsx --json")]
    Sheets {
        /// Workbook or CSV file
        file: PathBuf,

        /// Print a JSON array instead of one name per line
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Tsv,
    Csv,
    Json,
    /// Formatted workbook; requires --output
    Xlsx,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("ACSX_GIT_HASH"), ")",
        "\nengine:  acsx-extract ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("ACSX_TARGET"),
    )
}

/// Install the stderr subscriber. `-v` flags take precedence, then
/// `ACSX_LOG`, then `RUST_LOG`. Quiet by default: warnings reach the user
/// through the run summary rather than the log.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => std::env::var("ACSX_LOG")
            .ok()
            .and_then(|s| EnvFilter::try_new(s).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("error")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            config,
            input,
            sheet,
            format,
            output,
            strict,
            quiet,
        } => extract::cmd_extract(extract::ExtractArgs {
            config,
            input,
            sheet,
            format,
            output,
            strict,
            quiet,
        }),
        Commands::Validate { config } => extract::cmd_validate(config),
        Commands::Sheets { file, json } => extract::cmd_sheets(file, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
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
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
