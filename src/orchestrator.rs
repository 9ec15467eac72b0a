//! Import orchestration
//!
//! The `ImportOrchestrator` drives one reconciliation run:
//!
//! 1. create the local staging directories
//! 2. fetch every ready remote entry and clear its marker
//! 3. import the fetched files in order through the `RowPipeline`
//! 4. per file, either delete the local copy and report success, or upload an
//!    error report and report failure
//!
//! After the first failed file the rest of the run is abandoned. Those files
//! were already fetched and their markers cleared, so they stay in the
//! download directory and are listed in the run report without a result.
//!
//! Transport failures abort the run. Everything that goes wrong inside a
//! single file import is caught by `import` and turned into a result.

use crate::config::LocalLayout;
use crate::notify::{Notification, Notifier};
use crate::pipeline::RowPipeline;
use crate::remote::{RemoteEntry, RemoteFileGateway, RemoteTransport};
use crate::types::{FileImportResult, FileReport, FileState, ReconcileError};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of one transfer-and-import run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Every fetched file, in processing order
    pub files: Vec<FileReport>,
}

impl RunReport {
    /// The file that stopped the run, if any
    pub fn failed_file(&self) -> Option<&FileReport> {
        self.files.iter().find(|f| f.failed())
    }

    pub fn is_success(&self) -> bool {
        self.failed_file().is_none()
    }
}

/// Drives fetching, importing and reporting
pub struct ImportOrchestrator<T: RemoteTransport, P: RowPipeline, N: Notifier> {
    gateway: RemoteFileGateway<T>,
    pipeline: P,
    notifier: N,
    local: LocalLayout,
}

impl<T: RemoteTransport, P: RowPipeline, N: Notifier> ImportOrchestrator<T, P, N> {
    /// Create an orchestrator
    ///
    /// # Arguments
    ///
    /// * `gateway` - Remote store access; its download directory should be
    ///   `local.download_dir()`
    /// * `pipeline` - Row pipeline every file is imported through
    /// * `notifier` - Channel for operator feedback
    /// * `local` - Local staging layout
    pub fn new(
        gateway: RemoteFileGateway<T>,
        pipeline: P,
        notifier: N,
        local: LocalLayout,
    ) -> Self {
        ImportOrchestrator {
            gateway,
            pipeline,
            notifier,
            local,
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Give the pipeline back once the run is over
    pub fn into_pipeline(self) -> P {
        self.pipeline
    }

    /// Fetch all ready remote entries and import them
    ///
    /// # Arguments
    ///
    /// * `notify` - Whether success and failure notifications are sent
    ///
    /// # Returns
    ///
    /// The report of every fetched file. Files after the first failure are
    /// left in `FileState::Downloaded` with no result.
    ///
    /// # Errors
    ///
    /// * `ReconcileError::Transport` if listing, downloading, marker removal
    ///   or the error-report upload fails
    /// * `ReconcileError::Io` if a staging directory or file cannot be written
    pub fn run_transfer_and_import(&mut self, notify: bool) -> Result<RunReport, ReconcileError> {
        self.build_local_folders()?;
        let fetched = self.transfer_from_remote()?;

        let mut report = RunReport::default();
        let mut abandoned = false;

        for (entry, local_path) in fetched {
            if abandoned {
                report.files.push(FileReport {
                    name: entry.name,
                    state: FileState::Downloaded,
                    result: None,
                });
                continue;
            }

            let result = self.import(&local_path, false);
            if result.is_success() {
                fs::remove_file(&local_path)?;
                if notify {
                    self.send(&Notification::success(&entry.name));
                }
            } else {
                self.upload_error_report(&entry.name, &result)?;
                if notify {
                    self.send(&Notification::failure(&entry.name, &result));
                }
                abandoned = true;
            }

            report.files.push(FileReport {
                name: entry.name,
                state: FileState::Reported,
                result: Some(result),
            });
        }

        if abandoned {
            let skipped: Vec<&str> = report
                .files
                .iter()
                .filter(|f| f.result.is_none())
                .map(|f| f.name.as_str())
                .collect();
            if !skipped.is_empty() {
                tracing::warn!(
                    skipped = ?skipped,
                    "run stopped after a failed file; remaining files left in the download directory"
                );
            }
        }

        Ok(report)
    }

    /// Fetch every ready entry and clear its remote marker
    ///
    /// # Returns
    ///
    /// The fetched entries with their local paths, in name order.
    ///
    /// # Errors
    ///
    /// `ReconcileError::Transport` on the first failing remote operation. A
    /// download that succeeded before is not rolled back.
    pub fn transfer_from_remote(&mut self) -> Result<Vec<(RemoteEntry, PathBuf)>, ReconcileError> {
        let entries = self.gateway.list_ready_entries()?;

        let mut fetched = Vec::with_capacity(entries.len());
        for entry in entries {
            let local_path = self.gateway.download(&entry)?;
            self.gateway.clear_marker(&entry)?;
            fetched.push((entry, local_path));
        }
        Ok(fetched)
    }

    /// Import one local file
    ///
    /// Never fails: a file-level error is turned into a result whose only
    /// success id is `"data lost"` and whose only error is the failure text.
    pub fn import(&mut self, path: &Path, validation_only: bool) -> FileImportResult {
        let result = match self.pipeline.import_file(path, validation_only) {
            Ok(result) => result,
            Err(error) => {
                tracing::error!(file = %path.display(), error = %error, "import aborted");
                FileImportResult::data_lost(&error)
            }
        };

        if result.is_success() {
            tracing::info!(file = %path.display(), "import succeeded");
        } else {
            tracing::info!(file = %path.display(), result = %result.summary(), "import failed");
        }
        result
    }

    /// Check a local file without persisting anything
    pub fn run_validation_only(&mut self, path: &Path) -> FileImportResult {
        self.import(path, true)
    }

    fn build_local_folders(&self) -> Result<(), ReconcileError> {
        fs::create_dir_all(self.local.download_dir())?;
        fs::create_dir_all(self.local.upload_dir())?;
        Ok(())
    }

    /// Write the aggregate to the upload staging area and push it
    fn upload_error_report(
        &mut self,
        name: &str,
        result: &FileImportResult,
    ) -> Result<(), ReconcileError> {
        let upload_dir = self.local.upload_dir();
        fs::create_dir_all(&upload_dir)?;
        let report_path = upload_dir.join(name);
        fs::write(&report_path, result.summary())?;
        self.gateway.upload(&report_path, name)?;
        Ok(())
    }

    fn send(&self, notification: &Notification) {
        if let Err(error) = self.notifier.send_import_feedback(notification) {
            tracing::warn!(subject = %notification.subject, error = %error, "notification not delivered");
        }
    }
}
