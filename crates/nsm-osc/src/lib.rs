//! OSC transport layer for session-control clients.
//!
//! Provides:
//! - Wire codec (OSC 1.0 messages with positional, typed arguments)
//! - Endpoint parsing for `osc.udp://host:port/` URLs
//! - `Transport` trait and UDP implementation (feature: udp)

pub mod endpoint;
pub mod message;
pub mod transport;

#[cfg(feature = "udp")]
pub mod udp;

pub use endpoint::{EndpointError, host_port, resolve};
pub use message::{Arg, ArgError, CodecError, Message};
pub use transport::{Transport, TransportError};

#[cfg(feature = "udp")]
pub use udp::UdpTransport;
