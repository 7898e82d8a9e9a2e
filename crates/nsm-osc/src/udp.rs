//! UDP transport.

use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::UdpSocket;

use crate::{Message, Transport, TransportError, endpoint};

/// Largest datagram accepted from the coordinator.
const MAX_DATAGRAM: usize = 64 * 1024;

/// OSC over a connected UDP socket.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Bind `listen_addr` and connect to the coordinator at `url`.
    ///
    /// `url` may carry the `osc.udp://` scheme and a trailing slash.
    ///
    /// # Errors
    /// Returns error if either address cannot be resolved or binding fails.
    pub async fn connect(url: &str, listen_addr: &str) -> Result<Self, TransportError> {
        let peer = endpoint::resolve(url).await?;
        let local = tokio::net::lookup_host(listen_addr)
            .await
            .map_err(|source| TransportError::ResolveListen {
                addr: listen_addr.to_string(),
                source,
            })?
            .next()
            .ok_or_else(|| TransportError::ResolveListen {
                addr: listen_addr.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no address"),
            })?;

        let socket = UdpSocket::bind(local)
            .await
            .map_err(|source| TransportError::Bind { addr: local, source })?;
        socket.connect(peer).await?;
        tracing::debug!(%peer, local = ?socket.local_addr().ok(), "UDP transport connected");

        Ok(Self { socket, peer })
    }

    /// Coordinator address.
    #[must_use]
    pub const fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send(&self, msg: &Message) -> Result<(), TransportError> {
        let packet = msg.encode();
        self.socket.send(&packet).await?;
        tracing::trace!(%msg, "sent");
        Ok(())
    }

    async fn recv(&self) -> Result<Message, TransportError> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        let n = self.socket.recv(&mut buf).await?;
        let msg = Message::decode(&buf[..n])?;
        tracing::trace!(%msg, "received");
        Ok(msg)
    }

    fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }
}
