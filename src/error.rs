//! Error types shared by the delivery pipeline.

use std::io;

use thiserror::Error;

/// Errors raised while opening, encoding for, or writing to a GELF endpoint.
///
/// Only [`GelfDispatcher::initialize`](crate::GelfDispatcher::initialize) and
/// the lower-level transport and encoder functions surface these values.
/// Producers calling `send` never observe them; the worker logs and discards.
#[derive(Debug, Error)]
pub enum GelfError {
    /// The endpoint address could not be resolved to a socket address.
    #[error("failed to resolve GELF endpoint {endpoint}: {source}")]
    Resolution {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    /// The local socket could not be bound or connected to the endpoint.
    #[error("failed to connect to GELF endpoint {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    /// The message could not be serialised as JSON.
    #[error("failed to encode GELF message: {0}")]
    Encoding(#[from] serde_json::Error),
    /// The datagram could not be written.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An endpoint string did not have the `host:port` form.
    #[error("invalid GELF endpoint: {0}")]
    InvalidEndpoint(String),
}
