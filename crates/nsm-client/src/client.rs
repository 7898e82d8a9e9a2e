//! The client handle.

use std::{net::SocketAddr, sync::Arc};

use nsm_core::{ServerInfo, Session};
use nsm_osc::{Transport, UdpTransport};
use tokio_util::sync::CancellationToken;

use crate::{
    ClientConfig, ClientError,
    announce,
    correlator::ReplyCorrelator,
    dispatch::Dispatcher,
    forward::{self, EventStreams},
    outbound::Outbound,
    runtime::TaskGroup,
};

/// A running session-control client.
///
/// Construction performs the announce handshake. On success two background
/// tasks run until the client is closed, the token is cancelled, or one of
/// them fails: the dispatch loop (coordinator commands) and the forwarding
/// loop (adapter state changes).
pub struct Client {
    outbound: Outbound,
    local_addr: SocketAddr,
    server_info: Option<ServerInfo>,
    tasks: TaskGroup,
}

impl Client {
    /// Connect over UDP and announce.
    ///
    /// # Errors
    /// Returns error if the configuration is incomplete, the socket cannot
    /// be set up, or the handshake fails.
    pub async fn connect(
        config: ClientConfig,
        session: Arc<dyn Session>,
    ) -> Result<Self, ClientError> {
        Self::connect_with_cancel(config, session, CancellationToken::new()).await
    }

    /// Like [`Client::connect`], stopping when `cancel` fires.
    ///
    /// # Errors
    /// See [`Client::connect`].
    pub async fn connect_with_cancel(
        config: ClientConfig,
        session: Arc<dyn Session>,
        cancel: CancellationToken,
    ) -> Result<Self, ClientError> {
        let url = config.nsm_url()?;
        let transport = UdpTransport::connect(url, &config.listen_addr)
            .await
            .map_err(ClientError::Connect)?;
        Self::with_transport(config, session, Arc::new(transport), cancel).await
    }

    /// Announce over an already established transport.
    ///
    /// On failure the transport is released before returning.
    ///
    /// # Errors
    /// Returns error if the handshake fails.
    pub async fn with_transport(
        config: ClientConfig,
        session: Arc<dyn Session>,
        transport: Arc<dyn Transport>,
        cancel: CancellationToken,
    ) -> Result<Self, ClientError> {
        let local_addr = transport.local_addr().map_err(ClientError::Connect)?;
        let outbound = Outbound::new(transport);
        let cancel = cancel.child_token();

        let mut correlator = ReplyCorrelator::new();
        let mut backlog = Vec::new();
        let server_info = announce::handshake(
            &outbound,
            &config,
            session.as_ref(),
            &mut correlator,
            &mut backlog,
            &cancel,
        )
        .await?;

        let streams = EventStreams::from_session(session.as_ref());
        let dispatcher = Dispatcher::new(Arc::clone(&session), outbound.clone(), local_addr);

        let mut tasks = TaskGroup::new(cancel.clone());
        tasks.spawn("dispatch", dispatcher.run(correlator, backlog, cancel.clone()));
        tasks.spawn(
            "forward",
            forward::forward_events(outbound.clone(), streams, cancel),
        );
        tracing::info!(
            name = %config.client_name(),
            %local_addr,
            capabilities = %config.capabilities,
            "Client running"
        );

        Ok(Self {
            outbound,
            local_addr,
            server_info,
            tasks,
        })
    }

    /// Local address the coordinator reaches this client on.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// What the coordinator announced. `None` when not waiting for the
    /// announce reply.
    #[must_use]
    pub const fn server_info(&self) -> Option<&ServerInfo> {
        self.server_info.as_ref()
    }

    /// Token that stops both background tasks when cancelled.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.tasks.cancel_token().clone()
    }

    /// Block until the background tasks finish.
    ///
    /// # Errors
    /// Returns the first background task failure.
    pub async fn wait(&mut self) -> Result<(), ClientError> {
        self.tasks.wait().await
    }

    /// Stop the background tasks and release the transport.
    ///
    /// # Errors
    /// Returns a background failure that was not yet observed via `wait`.
    pub async fn close(mut self) -> Result<(), ClientError> {
        let result = self.tasks.shutdown().await;
        drop(self.outbound);
        tracing::debug!("Client closed");
        result
    }
}
