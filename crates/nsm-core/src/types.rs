//! Data exchanged between the client engine and the session adapter.

use std::{net::SocketAddr, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::Capabilities;

/// What the coordinator said about itself in the announce reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Free-form greeting from the coordinator.
    pub message: String,
    /// Name of the session manager.
    pub name: String,
    /// Capabilities the coordinator supports.
    pub capabilities: Capabilities,
}

/// Arguments of an open command.
///
/// The adapter may keep this for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Where the client stores its project data. May be a file or a
    /// directory; if nothing exists there yet a new project must be created.
    pub project_path: PathBuf,

    /// Name of the client as displayed by the coordinator.
    pub display_name: String,

    /// Unique id of this client instance within the session.
    ///
    /// Clients that register names with shared subsystems (audio graph
    /// ports, for example) should prefix them with this.
    pub client_id: String,

    /// Local transport address the coordinator reaches this client on.
    pub local_addr: SocketAddr,
}

/// Status message sent to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStatus {
    /// 0 means never show, 3 is the highest priority.
    pub priority: u8,
    pub message: String,
}

impl ClientStatus {
    /// Highest priority accepted by coordinators.
    pub const MAX_PRIORITY: u8 = 3;

    /// Create a status, clamping `priority` to [`Self::MAX_PRIORITY`].
    #[must_use]
    pub fn new(priority: u8, message: impl Into<String>) -> Self {
        Self {
            priority: priority.min(Self::MAX_PRIORITY),
            message: message.into(),
        }
    }
}
