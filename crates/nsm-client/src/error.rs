//! Client errors.

use std::time::Duration;

use nsm_core::ProtocolError;
use nsm_osc::{ArgError, TransportError};

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no {} environment variable and no nsm_url configured", crate::config::NSM_URL)]
    MissingUrl,
}

/// Announce handshake error.
#[derive(Debug, thiserror::Error)]
pub enum AnnounceError {
    #[error("send announce message: {0}")]
    Send(#[source] TransportError),
    #[error("receive announce reply: {0}")]
    Receive(#[source] TransportError),
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    #[error("cancelled")]
    Cancelled,
    #[error("expected {expected} arguments in announce reply, got {got}")]
    ArgCount { expected: usize, got: usize },
    #[error("read {field}: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: ArgError,
    },
    #[error("expected {expected}, got {got}")]
    AddressMismatch { expected: String, got: String },
    #[error("refused by server with code {code}: {message}")]
    Refused { code: i32, message: String },
    #[error("announce callback: {0}")]
    Callback(#[source] ProtocolError),
}

/// Client error.
///
/// Construction failures name the phase that failed; failures of the
/// background tasks surface through `Client::wait`.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("configure client: {0}")]
    Config(#[from] ConfigError),
    #[error("dial udp: {0}")]
    Connect(#[source] TransportError),
    #[error("announce app: {0}")]
    Announce(#[from] AnnounceError),
    #[error("receive: {0}")]
    Receive(#[source] TransportError),
    #[error("respond to {address}: {source}")]
    Respond {
        address: String,
        #[source]
        source: TransportError,
    },
    #[error("send {what} message: {source}")]
    Forward {
        what: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
