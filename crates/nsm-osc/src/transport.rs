//! Transport seam between the protocol engine and the network.

use std::net::SocketAddr;

use async_trait::async_trait;

use crate::{CodecError, EndpointError, Message};

/// Transport error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("resolve udp listening address {addr}: {source}")]
    ResolveListen {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error("bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode packet: {0}")]
    Codec(#[from] CodecError),
    #[error("transport closed")]
    Closed,
}

impl TransportError {
    /// Whether the error only affects a single packet.
    ///
    /// Receivers skip non-fatal errors and keep reading.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Codec(_))
    }
}

/// Address-routed message transport.
///
/// `send` may be called from several tasks at once; implementations are not
/// required to serialize it, callers do.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a message to the coordinator.
    async fn send(&self, msg: &Message) -> Result<(), TransportError>;

    /// Receive the next message from the coordinator.
    async fn recv(&self) -> Result<Message, TransportError>;

    /// Local address the coordinator sees this client on.
    fn local_addr(&self) -> Result<SocketAddr, TransportError>;
}
