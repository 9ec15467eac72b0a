//! Remote file gateway
//!
//! Implements the marker-file readiness protocol on top of a
//! `RemoteTransport`. A producer signals that `<name>` is completely written
//! by placing `<name>.start` next to it; the gateway only picks up entries
//! whose marker is present and removes the marker once the entry has been
//! fetched, telling the producer the file was consumed.

use crate::config::RemoteLayout;
use crate::remote::transport::{remote_join, RemoteTransport};
use crate::types::ReconcileError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A remote file ready for transfer
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RemoteEntry {
    pub name: String,
}

/// Select the ready entries of a directory listing
///
/// An entry is ready iff its marker is in the same listing. Marker files are
/// never entries themselves, and when the layout names an inbound extension
/// only entries carrying it are considered. The result is sorted by name.
pub fn select_ready(names: &[String], layout: &RemoteLayout) -> Vec<RemoteEntry> {
    let listing: HashSet<&str> = names.iter().map(String::as_str).collect();

    let mut ready: Vec<RemoteEntry> = names
        .iter()
        .filter(|name| !name.ends_with(&layout.marker_suffix))
        .filter(|name| match layout.inbound_extension.as_deref() {
            None | Some("") => true,
            Some(ext) => name.ends_with(ext),
        })
        .filter(|name| listing.contains(format!("{}{}", name, layout.marker_suffix).as_str()))
        .map(|name| RemoteEntry { name: name.clone() })
        .collect();

    ready.sort();
    ready.dedup();
    ready
}

/// Gateway to the remote file store
pub struct RemoteFileGateway<T: RemoteTransport> {
    transport: T,
    layout: RemoteLayout,
    download_dir: PathBuf,
}

impl<T: RemoteTransport> RemoteFileGateway<T> {
    /// Create a gateway
    ///
    /// # Arguments
    ///
    /// * `transport` - Wire-level access to the remote store
    /// * `layout` - Remote directories and marker convention
    /// * `download_dir` - Local staging directory for fetched entries
    pub fn new(transport: T, layout: RemoteLayout, download_dir: PathBuf) -> Self {
        RemoteFileGateway {
            transport,
            layout,
            download_dir,
        }
    }

    /// Local path an entry is downloaded to
    pub fn local_path(&self, entry: &RemoteEntry) -> PathBuf {
        self.download_dir.join(&entry.name)
    }

    /// List the entries ready for transfer, in ascending name order
    pub fn list_ready_entries(&mut self) -> Result<Vec<RemoteEntry>, ReconcileError> {
        let names = self.transport.list(&self.layout.inbound_dir)?;
        let ready = select_ready(&names, &self.layout);
        tracing::info!(
            listed = names.len(),
            ready = ready.len(),
            dir = %self.layout.inbound_dir,
            "remote entries listed"
        );
        Ok(ready)
    }

    /// Fetch an entry into the download staging directory
    pub fn download(&mut self, entry: &RemoteEntry) -> Result<PathBuf, ReconcileError> {
        fs::create_dir_all(&self.download_dir)?;
        let remote = remote_join(&self.layout.inbound_dir, &entry.name);
        let local = self.local_path(entry);
        self.transport.download(&remote, &local)?;
        tracing::info!(remote = %remote, local = %local.display(), "entry downloaded");
        Ok(local)
    }

    /// Remove the entry's readiness marker from the remote store
    pub fn clear_marker(&mut self, entry: &RemoteEntry) -> Result<(), ReconcileError> {
        let marker = remote_join(
            &self.layout.inbound_dir,
            &format!("{}{}", entry.name, self.layout.marker_suffix),
        );
        self.transport.remove(&marker)?;
        tracing::debug!(marker = %marker, "marker cleared");
        Ok(())
    }

    /// Push a local file into the remote report directory under `name`
    pub fn upload(&mut self, local: &Path, name: &str) -> Result<String, ReconcileError> {
        let remote = remote_join(&self.layout.report_dir, name);
        self.transport.upload(local, &remote)?;
        tracing::info!(remote = %remote, "report uploaded");
        Ok(remote)
    }

    /// Borrow the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
