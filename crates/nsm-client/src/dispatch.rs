//! Inbound command dispatch.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use nsm_core::{Methods, ProtocolError, Session, SessionInfo, address};
use nsm_osc::{ArgError, Message};
use tokio_util::sync::CancellationToken;

use crate::{
    ClientError,
    correlator::{ReplyCorrelator, Routed},
    outbound::Outbound,
};

/// Routes coordinator commands to the session adapter and answers them.
///
/// Malformed commands only fail their own exchange: they are logged and
/// answered with a [`nsm_core::Code::General`] error reply. Send failures
/// are fatal.
pub struct Dispatcher {
    session: Arc<dyn Session>,
    outbound: Outbound,
    local_addr: SocketAddr,
    methods: Methods,
}

impl Dispatcher {
    /// Create a dispatcher, merging the adapter's extension methods.
    #[must_use]
    pub fn new(session: Arc<dyn Session>, outbound: Outbound, local_addr: SocketAddr) -> Self {
        let mut methods = session.methods();
        methods.retain(|addr, _| {
            let reserved = address::is_reserved(addr);
            if reserved {
                tracing::warn!(address = %addr, "Ignoring adapter method under reserved address");
            }
            !reserved
        });
        Self {
            session,
            outbound,
            local_addr,
            methods,
        }
    }

    /// Whether `addr` has an extension handler.
    #[must_use]
    pub fn has_method(&self, addr: &str) -> bool {
        self.methods.contains_key(addr)
    }

    /// Dispatch `backlog`, then receive and dispatch until cancelled.
    ///
    /// # Errors
    /// Returns error if receiving or responding fails.
    pub async fn run(
        self,
        mut correlator: ReplyCorrelator,
        backlog: Vec<Message>,
        cancel: CancellationToken,
    ) -> Result<(), ClientError> {
        for msg in backlog {
            self.dispatch(msg).await?;
        }

        loop {
            let received = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                received = self.outbound.transport().recv() => received,
            };
            match received {
                Ok(msg) => {
                    if let Routed::Command(msg) = correlator.route(msg) {
                        self.dispatch(msg).await?;
                    }
                }
                Err(e) if !e.is_fatal() => tracing::warn!("Skipping packet: {e}"),
                Err(e) => return Err(ClientError::Receive(e)),
            }
        }
        tracing::debug!("Dispatch loop stopped");
        Ok(())
    }

    /// Handle a single command.
    ///
    /// # Errors
    /// Returns error if the response cannot be sent.
    pub async fn dispatch(&self, msg: Message) -> Result<(), ClientError> {
        tracing::debug!(%msg, "Dispatching");
        match msg.address.as_str() {
            address::CLIENT_OPEN => {
                let result = match self.session_info(&msg) {
                    Ok(info) => self.session.open(info).await,
                    Err(e) => {
                        tracing::warn!("Malformed open command: {e}");
                        Err(ProtocolError::general(format!("malformed open command: {e}")))
                    }
                };
                self.respond(address::CLIENT_OPEN, result).await
            }
            address::CLIENT_SAVE => {
                let result = self.session.save().await;
                self.respond(address::CLIENT_SAVE, result).await
            }
            address::CLIENT_SESSION_IS_LOADED => {
                self.session.session_is_loaded().await;
                Ok(())
            }
            address::CLIENT_SHOW_OPTIONAL_GUI => {
                self.session.show_gui(true).await;
                Ok(())
            }
            address::CLIENT_HIDE_OPTIONAL_GUI => {
                self.session.show_gui(false).await;
                Ok(())
            }
            other => {
                let Some(handler) = self.methods.get(other) else {
                    tracing::debug!(address = %other, "Ignoring unknown address");
                    return Ok(());
                };
                let addr = other.to_string();
                let sent = match handler(msg).await {
                    Ok(Some(reply)) => self.outbound.send(&reply).await,
                    Ok(None) => Ok(()),
                    Err(e) => self.outbound.error(&addr, &e).await,
                };
                sent.map_err(|source| ClientError::Respond {
                    address: addr,
                    source,
                })
            }
        }
    }

    fn session_info(&self, msg: &Message) -> Result<SessionInfo, ArgError> {
        let project_path = msg.string(0)?;
        let display_name = msg.string(1)?;
        let client_id = msg.string(2)?;
        Ok(SessionInfo {
            project_path: PathBuf::from(project_path),
            display_name: display_name.to_string(),
            client_id: client_id.to_string(),
            local_addr: self.local_addr,
        })
    }

    async fn respond(
        &self,
        to: &str,
        result: Result<String, ProtocolError>,
    ) -> Result<(), ClientError> {
        let sent = match &result {
            Ok(message) => self.outbound.reply(to, message).await,
            Err(e) => {
                tracing::info!(code = e.code.as_i32(), "{to} failed: {e}");
                self.outbound.error(to, e).await
            }
        };
        sent.map_err(|source| ClientError::Respond {
            address: to.to_string(),
            source,
        })
    }
}
