mod commands;
mod input;
mod output;
mod telemetry;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use personal_finance_core::{PersonalFinanceError, TaxConfig};

use commands::InputArgs;
use output::OutputFormat;

/// Personal finance calculations with decimal precision
#[derive(Parser)]
#[command(
    name = "pfc",
    version,
    about = "Personal finance calculations with decimal precision",
    long_about = "A CLI for personal finance calculations: student loan payoff vs investing, \
                  UK income tax and National Insurance, rent vs buy, emergency fund sizing, \
                  financial resilience and time to financial independence. Calculator \
                  inputs are JSON documents read from --input or stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Tax threshold table to use instead of the bundled one
    #[arg(long, env = "PFC_TAX_CONFIG", global = true)]
    tax_config: Option<PathBuf>,

    /// Log filter for stderr diagnostics (RUST_LOG takes precedence)
    #[arg(long, env = "PFC_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Student loan: pay off early or invest (three scenarios)
    Payoff(InputArgs),
    /// UK income tax, National Insurance and student loan deductions
    IncomeTax(InputArgs),
    /// Compare buying a home against renting and investing
    RentVsBuy(InputArgs),
    /// Size an emergency fund against monthly expenses
    EmergencyFund(InputArgs),
    /// Score financial resilience from 0 to 100
    ResilienceScore(InputArgs),
    /// Years until investments cover expenses at a safe withdrawal rate
    TimeToFreedom(InputArgs),
    /// Report service health
    Health,
    /// Print version information
    Version,
}

fn load_config(path: Option<&PathBuf>) -> Result<TaxConfig, PersonalFinanceError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading tax configuration");
            TaxConfig::from_path(path)
        }
        None => TaxConfig::embedded(),
    }
}

fn fail(err: &PersonalFinanceError) -> ! {
    eprintln!("{}: {}", "error".red().bold(), err);
    output::json::print_json(&commands::error_body(err));
    process::exit(commands::exit_code(err));
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }

    match cli.command {
        Commands::Version => {
            println!("pfc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Commands::Health => {
            cli.output.render(&commands::health::run_health());
            return;
        }
        _ => {}
    }

    let config = match load_config(cli.tax_config.as_ref()) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    let result = match cli.command {
        Commands::Payoff(args) => commands::payoff::run_payoff(&args, &config),
        Commands::IncomeTax(args) => commands::payroll::run_income_tax(&args, &config),
        Commands::RentVsBuy(args) => commands::housing::run_rent_vs_buy(&args),
        Commands::EmergencyFund(args) => commands::planning::run_emergency_fund(&args),
        Commands::ResilienceScore(args) => commands::planning::run_resilience_score(&args),
        Commands::TimeToFreedom(args) => commands::planning::run_time_to_freedom(&args),
        Commands::Health | Commands::Version => return,
    };

    match result {
        Ok(value) => {
            cli.output.render(&value);
            process::exit(0);
        }
        Err(e) => fail(&e),
    }
}
