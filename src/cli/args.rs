use crate::config::ReconcilerConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fetch, validate and import transaction files from the remote store
#[derive(Parser, Debug)]
#[command(name = "csv-reconciler")]
#[command(about = "Fetch, validate and import transaction files from the remote store", long_about = None)]
pub struct CliArgs {
    /// Configuration file (JSON)
    #[arg(
        long = "config",
        value_name = "FILE",
        help = "Path to the JSON configuration file (defaults apply when omitted)"
    )]
    pub config: Option<PathBuf>,

    /// Root of the local staging directories
    #[arg(
        long = "data-root",
        value_name = "DIR",
        help = "Overrides local.data_root from the configuration"
    )]
    pub data_root: Option<PathBuf>,

    /// Local mirror of the remote file store
    #[arg(
        long = "mirror-root",
        value_name = "DIR",
        help = "Overrides transport.mirror_root from the configuration"
    )]
    pub mirror_root: Option<PathBuf>,

    /// Ledger snapshot to seed from and write back to
    #[arg(
        long = "ledger",
        value_name = "JSON",
        help = "Ledger snapshot file; loaded before the command and saved after `run`"
    )]
    pub ledger: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch every ready remote file and import it
    Run {
        /// Do not send import notifications
        #[arg(long = "no-notify")]
        no_notify: bool,
    },

    /// Check a local file without persisting anything
    Validate {
        #[arg(value_name = "FILE", help = "Path to the import file to check")]
        file: PathBuf,
    },
}

impl CliArgs {
    /// Apply the command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut ReconcilerConfig) {
        if let Some(data_root) = &self.data_root {
            config.local.data_root = data_root.clone();
        }
        if let Some(mirror_root) = &self.mirror_root {
            config.transport.mirror_root = mirror_root.clone();
        }
    }
}
