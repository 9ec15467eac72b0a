//! CSV Reconciler CLI
//!
//! Command-line interface for the transfer-and-import run.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --config reconciler.json --ledger ledger.json run
//! cargo run -- --config reconciler.json run --no-notify
//! cargo run -- --ledger ledger.json validate private/data/download/mraba.csv
//! ```
//!
//! `run` fetches every ready file from the remote store (through the local
//! mirror named in the configuration) and imports it. `validate` checks a
//! local file with nothing persisted and no settlement batch written. Results
//! are printed to stdout; logs go to stderr and are filtered with `RUST_LOG`.
//!
//! With `--ledger`, `run` writes the snapshot back even when the run aborts;
//! `validate` only reads it.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: A file failed to import, or the run could not be carried out

use csv_reconciler::cli;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,csv_reconciler=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();

    let args = cli::parse_args();

    match cli::execute(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
