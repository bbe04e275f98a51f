//! Loading transaction histories exported by the storage layer.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tally_core::Transaction;
use tally_shared::{AppError, AppResult};
use tracing::{debug, info};

/// Reads a JSON array of transactions from `path`, or stdin when `path` is
/// `None` or `-`.
pub fn load_transactions(path: Option<&Path>) -> AppResult<Vec<Transaction>> {
    match path {
        Some(path) if path != Path::new("-") => {
            debug!(path = %path.display(), "Reading transactions from file");
            let file = File::open(path)
                .map_err(|err| AppError::Io(format!("{}: {err}", path.display())))?;
            parse_transactions(BufReader::new(file), &path.display().to_string())
        }
        _ => {
            debug!("Reading transactions from stdin");
            parse_transactions(io::stdin().lock(), "<stdin>")
        }
    }
}

/// Parses a JSON array of transactions.
pub fn parse_transactions<R: Read>(reader: R, source: &str) -> AppResult<Vec<Transaction>> {
    let transactions: Vec<Transaction> = serde_json::from_reader(reader).map_err(|err| {
        if err.is_io() {
            AppError::Io(format!("{source}: {err}"))
        } else {
            AppError::Parse(format!("{source}: {err}"))
        }
    })?;
    info!(source, count = transactions.len(), "Loaded transactions");
    Ok(transactions)
}
