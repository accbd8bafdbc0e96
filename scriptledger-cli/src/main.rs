//! scriptledger CLI - reconcile SQL change-scripts against a DuckDB database

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{doctor, history, init, migrate, plan, status, GlobalArgs};

/// scriptledger - apply and roll back SQL change-scripts
#[derive(Parser)]
#[command(name = "scriptledger", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations, or roll back one removed migration
    Migrate,

    /// Show what `migrate` would do without changing anything
    Plan,

    /// Show applied, pending and removed migrations
    Status,

    /// List every ledger row in the order it was written
    History,

    /// Check scripts for common mistakes
    Doctor {
        /// Show details for each finding
        #[arg(long, short)]
        verbose: bool,
    },

    /// Create the ledger table if it does not exist
    Init,
}

fn init_tracing(quiet: bool) {
    let default_filter = if quiet {
        "scriptledger=warn,scriptledger_core=warn"
    } else {
        "scriptledger=info,scriptledger_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.quiet);

    let json = cli.global.json;
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            if json {
                output::print_failure(&e);
            } else {
                output::error(&format!("{:#}", e));
            }
            ExitCode::FAILURE
        }
    }
}

/// Run a command; failures already reported on stdout come back as an exit code
fn run(cli: Cli) -> Result<ExitCode> {
    let global = &cli.global;
    let outcome = match cli.command {
        Commands::Migrate => migrate::run(global),
        Commands::Plan => plan::run(global),
        Commands::Status => status::run(global),
        Commands::History => history::run(global),
        Commands::Doctor { verbose } => return doctor::run(global, verbose),
        Commands::Init => init::run(global),
    };
    outcome.map(|()| ExitCode::SUCCESS)
}
