//! Binary entry point for the advisory-report CLI.

use advisory_report::cli::report_cmd::{self, RunError};
use advisory_report::fetch::HttpSource;
use advisory_report::policy::PolicyConfig;
use clap::Parser;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(
    name = "advisory-report",
    version,
    about = "Generate a verified report of high-risk travel destinations from US State Department data"
)]
struct Cli {
    /// Output report path; the verification log is written alongside it.
    #[arg(short, long, default_value = "travel-advisory-report.md")]
    output: PathBuf,

    /// Print the country list to the console without writing a report.
    #[arg(long)]
    list_only: bool,

    /// Emit a machine-readable JSON summary on stdout.
    #[arg(long)]
    json: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    quiet: bool,

    /// Show extra detail (regional escalations in listings).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Output flags travel via env so the helpers in cli::output see them.
    if cli.quiet {
        std::env::set_var("ADVISORY_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("ADVISORY_VERBOSE", "1");
    }
    if cli.json {
        std::env::set_var("ADVISORY_JSON", "1");
    }
    if cli.no_color {
        std::env::set_var("ADVISORY_NO_COLOR", "1");
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("advisory_report=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    std::process::exit(run(&cli).await);
}

async fn run(cli: &Cli) -> i32 {
    let source = match HttpSource::new() {
        Ok(source) => source,
        Err(e) => {
            error!("failed to build HTTP client: {e}");
            return 1;
        }
    };
    let policy = PolicyConfig::default();

    match report_cmd::run(&source, &policy, &cli.output, cli.list_only).await {
        Ok(()) => 0,
        Err(RunError::Fetch(e)) => {
            eprintln!("Error: {e}");
            eprintln!("Please check your internet connection and try again.");
            1
        }
        Err(RunError::Verification { .. }) => 2,
        Err(RunError::Other(e)) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}
