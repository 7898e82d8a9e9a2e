//! Serialized outbound sends and reply encoding.

use std::sync::Arc;

use nsm_core::{ProtocolError, address};
use nsm_osc::{Message, Transport, TransportError};
use tokio::sync::Mutex;

/// `/reply [address, message]`.
#[must_use]
pub fn reply_message(to: &str, message: &str) -> Message {
    Message::new(address::REPLY).arg(to).arg(message)
}

/// `/error [address, code, message]`.
#[must_use]
pub fn error_message(to: &str, err: &ProtocolError) -> Message {
    Message::new(address::ERROR)
        .arg(to)
        .arg(err.code.as_i32())
        .arg(err.message.as_str())
}

/// Shared handle for sending to the coordinator.
///
/// All sends go through one mutex so the dispatch and forwarding tasks never
/// interleave on the transport.
#[derive(Clone)]
pub struct Outbound {
    transport: Arc<dyn Transport>,
    lock: Arc<Mutex<()>>,
}

impl Outbound {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Underlying transport, for receiving.
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Send a message.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn send(&self, msg: &Message) -> Result<(), TransportError> {
        let _guard = self.lock.lock().await;
        self.transport.send(msg).await
    }

    /// Send a success reply for `to`.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn reply(&self, to: &str, message: &str) -> Result<(), TransportError> {
        self.send(&reply_message(to, message)).await
    }

    /// Send an error reply for `to`.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn error(&self, to: &str, err: &ProtocolError) -> Result<(), TransportError> {
        self.send(&error_message(to, err)).await
    }
}
