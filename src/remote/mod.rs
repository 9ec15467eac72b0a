//! Remote file store access
//!
//! - `transport` - Wire-level list/download/remove/upload seam
//! - `gateway` - Marker-file readiness protocol over a transport

pub mod gateway;
pub mod transport;

pub use gateway::{select_ready, RemoteEntry, RemoteFileGateway};
pub use transport::{remote_join, MirrorTransport, RemoteTransport};
