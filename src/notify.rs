//! Operator notifications
//!
//! After each file the orchestrator reports the outcome through a `Notifier`.
//! Mail delivery lives outside this crate; `LogNotifier` emits the messages as
//! `tracing` events so they reach whatever log sink the binary installs.

use crate::types::{FileImportResult, ReconcileError};

/// Subject of the success notification
pub const SUCCESS_SUBJECT: &str = "Successful Import";

/// Subject of the failure notification
pub const FAILURE_SUBJECT: &str = "Import CSV failed";

/// A notification ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Success message for a file
    pub fn success(file_name: &str) -> Self {
        Notification {
            subject: SUCCESS_SUBJECT.to_string(),
            body: format!("Import of the file {} done.", file_name),
        }
    }

    /// Failure message for a file, carrying the aggregate report
    pub fn failure(file_name: &str, result: &FileImportResult) -> Self {
        Notification {
            subject: FAILURE_SUBJECT.to_string(),
            body: format!(
                "Import of the file {} failed with errors:\n{}",
                file_name,
                result.summary()
            ),
        }
    }
}

/// Channel that delivers import feedback to operators
pub trait Notifier {
    /// Deliver one notification
    ///
    /// # Errors
    ///
    /// Any error is logged by the caller; it never changes the file's outcome.
    fn send_import_feedback(&self, notification: &Notification) -> Result<(), ReconcileError>;
}

/// Notifier that writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_import_feedback(&self, notification: &Notification) -> Result<(), ReconcileError> {
        tracing::info!(
            subject = %notification.subject,
            body = %notification.body,
            "import feedback"
        );
        Ok(())
    }
}
