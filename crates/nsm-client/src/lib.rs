//! Client side of the session-control protocol.
//!
//! Provides:
//! - `ClientConfig` - Explicit configuration, with a one-shot `NSM_URL` lookup
//! - `Client` - Announce handshake, then background dispatch and event forwarding
//! - `Dispatcher` - Routes coordinator commands to the session adapter
//! - `ReplyCorrelator` - Matches replies to the outstanding announce request

pub mod announce;
pub mod client;
pub mod config;
pub mod correlator;
pub mod dispatch;
pub mod error;
pub mod forward;
pub mod outbound;
pub mod runtime;

pub use client::Client;
pub use config::ClientConfig;
pub use correlator::ReplyCorrelator;
pub use dispatch::Dispatcher;
pub use error::{AnnounceError, ClientError, ConfigError};
pub use nsm_core::{
    Capabilities, Capability, ClientStatus, Code, EventChannel, ProtocolError, ServerInfo, Session,
    SessionInfo,
};
