//! Reconciler configuration
//!
//! All settings live in one JSON document. Every field has a default, so an
//! empty object (or no file at all) yields the production layout:
//!
//! ```json
//! {
//!   "transport": { "host": "files.example.org", "user": "reconciler",
//!                  "mirror_root": "/mnt/remote" },
//!   "remote": { "inbound_dir": "/data/files/csv" },
//!   "local": { "data_root": "/srv/reconciler" },
//!   "settlement": { "account": "8888888888", "bank_code": "99999999" }
//! }
//! ```

use crate::types::{ReconcileError, SettlementHeader};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Connection settings for the remote file store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub host: String,
    pub user: String,

    /// Private key used to authenticate, if any
    pub private_key: Option<PathBuf>,

    /// Known-hosts file used to verify the remote host, if any
    pub known_hosts: Option<PathBuf>,

    /// Local directory mirroring the remote file tree
    pub mirror_root: PathBuf,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            host: "localhost".to_string(),
            user: "reconciler".to_string(),
            private_key: None,
            known_hosts: None,
            mirror_root: PathBuf::from("remote"),
        }
    }
}

/// Directories and naming conventions on the remote store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteLayout {
    /// Where producers drop files to import
    pub inbound_dir: String,

    /// Where error reports are pushed
    pub report_dir: String,

    /// Suffix of the readiness marker placed next to a finished file
    pub marker_suffix: String,

    /// Only entries with this extension are imported; `None` accepts all
    pub inbound_extension: Option<String>,
}

impl Default for RemoteLayout {
    fn default() -> Self {
        RemoteLayout {
            inbound_dir: "/data/files/csv".to_string(),
            report_dir: "/data/files/batch_processed".to_string(),
            marker_suffix: ".start".to_string(),
            inbound_extension: Some(".csv".to_string()),
        }
    }
}

/// Local staging directories, all below one data root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalLayout {
    pub data_root: PathBuf,
}

impl Default for LocalLayout {
    fn default() -> Self {
        LocalLayout {
            data_root: PathBuf::from("."),
        }
    }
}

impl LocalLayout {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        LocalLayout {
            data_root: data_root.into(),
        }
    }

    /// Fetched inbound files
    pub fn download_dir(&self) -> PathBuf {
        self.data_root.join("private/data/download")
    }

    /// Error reports staged for upload
    pub fn upload_dir(&self) -> PathBuf {
        self.data_root.join("private/data/upload")
    }

    /// Written settlement batch files
    pub fn settlement_dir(&self) -> PathBuf {
        self.data_root.join("private/upload/csv/tmp_mraba")
    }
}

/// Complete reconciler configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    pub transport: TransportConfig,
    pub remote: RemoteLayout,
    pub local: LocalLayout,

    /// Originator record of settlement batches
    pub settlement: SettlementHeader,
}

impl ReconcilerConfig {
    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// `ReconcileError::Config` if the file cannot be read or is not a valid
    /// configuration document.
    pub fn load(path: &Path) -> Result<Self, ReconcileError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReconcileError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: ReconcilerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ReconcileError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
