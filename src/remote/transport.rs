//! Remote transport boundary
//!
//! `RemoteTransport` is the wire-level seam of the remote file store: list a
//! directory, fetch a file, remove a file, push a file. Authentication,
//! sessions and timeouts are the transport's concern.
//!
//! `MirrorTransport` implements it over a local directory tree that mirrors
//! the remote layout (a mounted or synchronized share): the remote path
//! `/data/files/csv/a.csv` lives at `<root>/data/files/csv/a.csv`.

use crate::config::TransportConfig;
use crate::types::ReconcileError;
use std::fs;
use std::path::{Path, PathBuf};

/// Wire-level operations on the remote file store
pub trait RemoteTransport {
    /// Names of the entries in a remote directory
    fn list(&mut self, dir: &str) -> Result<Vec<String>, ReconcileError>;

    /// Fetch a remote file to a local path, replacing it
    fn download(&mut self, remote: &str, local: &Path) -> Result<(), ReconcileError>;

    /// Delete a remote file
    fn remove(&mut self, remote: &str) -> Result<(), ReconcileError>;

    /// Push a local file to a remote path, replacing it
    fn upload(&mut self, local: &Path, remote: &str) -> Result<(), ReconcileError>;
}

/// Join a remote directory and an entry name
pub fn remote_join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

/// Remote store mirrored into a local directory
#[derive(Debug, Clone)]
pub struct MirrorTransport {
    root: PathBuf,
}

impl MirrorTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        MirrorTransport { root: root.into() }
    }

    /// Open the mirror described by the transport configuration
    ///
    /// # Errors
    ///
    /// `ReconcileError::Transport` if the mirror root is not a directory, or
    /// if a configured private key or known-hosts file does not exist.
    pub fn connect(config: &TransportConfig) -> Result<Self, ReconcileError> {
        let root = &config.mirror_root;
        if !root.is_dir() {
            return Err(ReconcileError::transport(
                "connect",
                &root.display().to_string(),
                "mirror root is not a directory",
            ));
        }
        for (what, path) in [
            ("private key", &config.private_key),
            ("known hosts file", &config.known_hosts),
        ] {
            if let Some(path) = path.as_deref().filter(|p| !p.is_file()) {
                return Err(ReconcileError::transport(
                    "connect",
                    &path.display().to_string(),
                    format!("{what} not found"),
                ));
            }
        }
        tracing::debug!(
            host = %config.host,
            user = %config.user,
            root = %root.display(),
            private_key = ?config.private_key,
            known_hosts = ?config.known_hosts,
            "remote store opened"
        );
        Ok(Self::new(root.clone()))
    }

    fn local(&self, remote: &str) -> PathBuf {
        self.root.join(remote.trim_start_matches('/'))
    }
}

impl RemoteTransport for MirrorTransport {
    fn list(&mut self, dir: &str) -> Result<Vec<String>, ReconcileError> {
        let entries =
            fs::read_dir(self.local(dir)).map_err(|e| ReconcileError::transport("list", dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ReconcileError::transport("list", dir, e))?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        Ok(names)
    }

    fn download(&mut self, remote: &str, local: &Path) -> Result<(), ReconcileError> {
        fs::copy(self.local(remote), local)
            .map_err(|e| ReconcileError::transport("download", remote, e))?;
        Ok(())
    }

    fn remove(&mut self, remote: &str) -> Result<(), ReconcileError> {
        fs::remove_file(self.local(remote))
            .map_err(|e| ReconcileError::transport("remove", remote, e))
    }

    fn upload(&mut self, local: &Path, remote: &str) -> Result<(), ReconcileError> {
        let target = self.local(remote);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ReconcileError::transport("upload", remote, e))?;
        }
        fs::copy(local, &target).map_err(|e| ReconcileError::transport("upload", remote, e))?;
        Ok(())
    }
}
