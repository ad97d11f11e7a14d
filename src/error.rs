//! Unified infrastructure error type.

use std::net::SocketAddr;

/// The error type returned by the server's fallible operations.
///
/// Application-level failures (404, 422, ...) are expressed as
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures only.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
