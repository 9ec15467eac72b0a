// CLI module
// Command-line interface, argument parsing and command execution

mod args;

pub use args::{CliArgs, Command};

use crate::config::ReconcilerConfig;
use crate::core::{InMemoryLedger, SettlementSenderRules};
use crate::notify::LogNotifier;
use crate::orchestrator::ImportOrchestrator;
use crate::pipeline::LedgerRowPipeline;
use crate::remote::{MirrorTransport, RemoteFileGateway};
use crate::types::ReconcileError;
use clap::Parser;
use std::path::Path;

type CliPipeline = LedgerRowPipeline<InMemoryLedger, SettlementSenderRules>;

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the message and exits the
/// process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Execute the selected command
///
/// `run` writes the ledger snapshot back even when the run aborts, so rows
/// booked before the failure are kept. `validate` never writes it.
///
/// # Returns
///
/// * `Ok(true)` if every processed file was imported
/// * `Ok(false)` if a file failed
///
/// # Errors
///
/// Configuration, ledger and transport failures. For `run`, the run's own
/// error takes precedence over a failure to save the ledger.
pub fn execute(args: &CliArgs) -> Result<bool, ReconcileError> {
    let mut config = ReconcilerConfig::load_or_default(args.config.as_deref())?;
    args.apply_overrides(&mut config);

    let ledger = match &args.ledger {
        Some(path) if path.exists() => InMemoryLedger::load(path)?,
        _ => InMemoryLedger::new(),
    };
    let pipeline = LedgerRowPipeline::new(
        ledger,
        SettlementSenderRules,
        config.settlement.clone(),
        config.local.settlement_dir(),
    );

    match &args.command {
        Command::Run { no_notify } => run(&config, pipeline, !*no_notify, args.ledger.as_deref()),
        Command::Validate { file } => Ok(validate(&config, pipeline, file)),
    }
}

fn run(
    config: &ReconcilerConfig,
    pipeline: CliPipeline,
    notify: bool,
    ledger_path: Option<&Path>,
) -> Result<bool, ReconcileError> {
    let transport = MirrorTransport::connect(&config.transport)?;
    let gateway = RemoteFileGateway::new(
        transport,
        config.remote.clone(),
        config.local.download_dir(),
    );
    let mut orchestrator =
        ImportOrchestrator::new(gateway, pipeline, LogNotifier, config.local.clone());

    let outcome = orchestrator.run_transfer_and_import(notify);

    let saved = match ledger_path {
        Some(path) => save_ledger(orchestrator.into_pipeline().into_ledger(), path),
        None => Ok(()),
    };

    let report = match outcome {
        Ok(report) => report,
        Err(error) => {
            if let Err(save_error) = saved {
                tracing::error!(error = %save_error, "ledger not saved");
            }
            return Err(error);
        }
    };
    saved?;

    for file in &report.files {
        match &file.result {
            Some(result) if result.is_success() => println!("{}: Success", file.name),
            Some(result) => println!("{}: {}", file.name, result.summary()),
            None => println!("{}: not processed", file.name),
        }
    }
    Ok(report.is_success())
}

fn validate(config: &ReconcilerConfig, pipeline: CliPipeline, file: &Path) -> bool {
    let local = config.local.clone();
    let gateway = RemoteFileGateway::new(
        MirrorTransport::new(config.transport.mirror_root.clone()),
        config.remote.clone(),
        local.download_dir(),
    );
    let mut orchestrator = ImportOrchestrator::new(gateway, pipeline, LogNotifier, local);

    let result = orchestrator.run_validation_only(file);
    if result.is_success() {
        println!("Success");
    } else {
        println!("{}", result.summary());
    }
    result.is_success()
}

fn save_ledger(ledger: InMemoryLedger, path: &Path) -> Result<(), ReconcileError> {
    ledger.save(path)?;
    tracing::debug!(ledger = %path.display(), "ledger saved");
    Ok(())
}
