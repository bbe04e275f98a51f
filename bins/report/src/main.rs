//! Tally report CLI
//!
//! Daily totals, monthly summaries, and filtered listings over an exported
//! transaction history.

mod cli;
mod input;
mod render;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tally_core::calendar::parse_timezone;
use tally_core::{AggregationEngine, AggregationError, DayTotals, Transaction};
use tally_shared::types::Currency;
use tally_shared::{AppConfig, AppError};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::render::{ErrorReport, SummaryReport};

/// Histories at least this long are bucketed on the rayon pool.
const PARALLEL_THRESHOLD: usize = 10_000;

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);
    let json = cli.json;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let report = error_report(&err);
            debug!(exit_code = report.exit_code, error = report.error, "Exiting with error");
            if json {
                match render::to_json(&report) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("error: {}", report.message),
                }
            } else {
                eprintln!("error: {}", report.message);
            }
            ExitCode::from(report.exit_code)
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tally=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Classifies an error by the first typed cause in its chain.
fn error_report(err: &anyhow::Error) -> ErrorReport {
    let (error, exit_code) = err
        .chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<AggregationError>()
                .map(|e| (e.error_code(), e.exit_code()))
                .or_else(|| {
                    cause
                        .downcast_ref::<AppError>()
                        .map(|e| (e.error_code(), e.exit_code()))
                })
        })
        .unwrap_or(("INTERNAL_ERROR", 1));

    ErrorReport {
        error,
        message: format!("{err:#}"),
        exit_code,
    }
}

/// Effective settings after CLI flags are laid over loaded configuration.
struct Settings {
    engine: AggregationEngine,
    currency: Currency,
    json: bool,
}

impl Settings {
    fn resolve(cli: &Cli, config: &AppConfig) -> Result<Self, AggregationError> {
        let tz_name = cli.tz.as_deref().unwrap_or(&config.engine.timezone);
        let code = cli.currency.as_deref().unwrap_or(&config.engine.currency);

        let tz = parse_timezone(tz_name)?;
        let currency: Currency = code
            .parse()
            .map_err(|_| AggregationError::UnknownCurrency(code.to_string()))?;

        info!(timezone = %tz, %currency, "Engine configured");
        Ok(Self {
            engine: AggregationEngine::new(tz),
            currency,
            json: cli.json || config.report.json,
        })
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()
        .map_err(AppError::from)
        .context("failed to load configuration")?;
    let settings = Settings::resolve(&cli, &config)?;

    let input = cli.input.as_deref().or(config.report.input.as_deref());
    let transactions = input::load_transactions(input).context("failed to load transactions")?;

    let output = execute(&cli.command, &settings, &transactions)?;
    print!("{output}");
    if settings.json {
        println!();
    }
    Ok(())
}

fn execute(
    command: &Command,
    settings: &Settings,
    transactions: &[Transaction],
) -> anyhow::Result<String> {
    let engine = &settings.engine;
    let currency = settings.currency;
    let json = settings.json;

    let output = match command {
        Command::Days { month } => {
            let days = match month {
                Some(month) => {
                    let in_month: Vec<Transaction> = engine
                        .transactions_in_month(transactions, month)?
                        .into_iter()
                        .cloned()
                        .collect();
                    bucket(engine, &in_month)?
                }
                None => bucket(engine, transactions)?,
            };
            if json {
                render::to_json(&days.values().collect::<Vec<_>>())?
            } else {
                render::days_table(&days, currency)
            }
        }
        Command::Summary { month } => {
            let month = month.clone().unwrap_or_else(|| engine.current_month_iso());
            let bounds = engine.month_bounds(&month)?;
            let summary = engine.month_summary(transactions, &month)?;
            let report = SummaryReport::new(month.parse()?, &bounds, &summary);
            if json {
                render::to_json(&report)?
            } else {
                render::summary_text(&report, currency)
            }
        }
        Command::On { date } => {
            let found = engine.transactions_on(transactions, date)?;
            debug!(date, count = found.len(), "Filtered by date");
            if json {
                render::to_json(&found)?
            } else {
                render::transactions_table(&found, currency)
            }
        }
        Command::Month { month } => {
            let found = engine.transactions_in_month(transactions, month)?;
            debug!(month, count = found.len(), "Filtered by month");
            if json {
                render::to_json(&found)?
            } else {
                render::transactions_table(&found, currency)
            }
        }
        Command::Months => {
            let months = engine.group_by_month(transactions)?;
            if json {
                render::to_json(&months)?
            } else {
                render::months_table(&months, currency)
            }
        }
    };
    Ok(output)
}

fn bucket(
    engine: &AggregationEngine,
    transactions: &[Transaction],
) -> Result<DayTotals, AggregationError> {
    if transactions.len() >= PARALLEL_THRESHOLD {
        debug!(count = transactions.len(), "Bucketing in parallel");
        engine.group_by_day_parallel(transactions)
    } else {
        engine.group_by_day(transactions)
    }
}
