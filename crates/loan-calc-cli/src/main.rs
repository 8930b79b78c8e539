mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::offer::{CapacityArgs, CompareArgs, QuoteArgs};
use commands::session::SessionArgs;
use loan_calc_core::LoanEngine;

/// Explore a cash loan offer across collateral categories
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Explore a cash loan offer across collateral categories",
    long_about = "Reconciles loan principal, term and monthly installment under the \
                  rate of the chosen collateral category. Prices loans, sizes them from \
                  a payment, compares categories and replays recorded edit sessions."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (JSON or YAML) overriding the built-in rate table
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log engine decisions (clamps, rejected edits) to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a principal and term, clamped into the category's bounds
    Quote(QuoteArgs),
    /// Largest principal a monthly installment supports
    Capacity(CapacityArgs),
    /// Installment saving between collateral categories
    Compare(CompareArgs),
    /// Replay a recorded list of edits and print the final snapshot
    Session(SessionArgs),
    /// Print the collateral category table
    Categories,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("loan_calc_core=debug,loancalc=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_engine(config: Option<&str>) -> Result<LoanEngine, Box<dyn std::error::Error>> {
    match config {
        Some(path) => Ok(LoanEngine::new(input::file::read_config(path)?)?),
        None => Ok(LoanEngine::default()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Version = cli.command {
        println!("loancalc {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let engine = match load_engine(cli.config.as_deref()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    tracing::debug!(config = ?cli.config, "engine ready");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Quote(args) => commands::offer::run_quote(args, &engine),
        Commands::Capacity(args) => commands::offer::run_capacity(args, &engine),
        Commands::Compare(args) => commands::offer::run_compare(args, &engine),
        Commands::Session(args) => commands::session::run_session(args, &engine),
        Commands::Categories => commands::categories::run_categories(&engine),
        Commands::Version => return,
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
