// invcheck - compare two physical inventory counts and score their agreement

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use invcheck_recon::ReconError;

#[derive(Parser)]
#[command(name = "invcheck")]
#[command(about = "Reconcile two inventory counts and report count accuracy")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log engine progress to stderr (debug level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two count workbooks and score their agreement
    #[command(after_help = "\
Examples:
  invcheck run first_count.xlsx second_count.xlsx
  invcheck run first.xlsx second.xlsx --report
  invcheck run first.xlsx second.xlsx --report q3.xlsx --exclude-new-products
  invcheck run first.xlsx second.xlsx --json > result.json
  invcheck run first.xlsx second.xlsx --config count.toml --min-accuracy 95")]
    Run(recon::RunArgs),

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  invcheck validate count.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  invcheck-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

/// Route `log` records from the library crates through a tracing
/// subscriber on stderr. `RUST_LOG` wins unless `--verbose` is given.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => recon::cmd_run(args),
        Commands::Validate { config } => recon::cmd_validate(config),
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
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::Schema { .. } => Some(
                "every brand sheet needs a header row with these columns; rename them under [columns] in a config file"
                    .to_string(),
            ),
            ReconError::MalformedFile { .. } => {
                Some(format!("supported formats: {}", invcheck_io::supported_extensions()))
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}
