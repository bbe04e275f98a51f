//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(about = "Daily totals, monthly summaries, and filtered listings over a transaction history")]
#[command(version)]
pub struct Cli {
    /// JSON array of transactions (omit or `-` to read stdin)
    #[arg(long, short = 'i', global = true)]
    pub input: Option<PathBuf>,

    /// IANA timezone used to assign transactions to calendar dates
    #[arg(long, global = true)]
    pub tz: Option<String>,

    /// ISO 4217 currency used to format amounts
    #[arg(long, global = true)]
    pub currency: Option<String>,

    /// Emit JSON instead of text tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Per-day totals
    #[command(after_help = "\
Examples:
  tally days -i history.json
  tally days -i history.json --month 2025-12 --tz Asia/Kolkata")]
    Days {
        /// Restrict to one month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Summary of one month (defaults to the current month)
    Summary {
        /// Month to summarize (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Transactions on one date, newest first
    On {
        /// Local calendar date (YYYY-MM-DD)
        date: String,
    },

    /// Transactions in one month, in input order
    Month {
        /// Month (YYYY-MM)
        month: String,
    },

    /// Summary of every month present in the input
    Months,
}
