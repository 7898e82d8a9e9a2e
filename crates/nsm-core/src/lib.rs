//! Core abstractions for session-control protocol clients.
//!
//! This crate provides the fundamental building blocks:
//! - `address` - Protocol addresses, including reserved coordinator addresses
//! - `Capabilities` - Ordered capability tokens and their wire string
//! - `ProtocolError` - Error codes shared by adapters and wire error replies
//! - `Session` - The trait an embedding application implements
//! - `EventChannel` - Hand-off helper for the adapter's output streams

pub mod address;
pub mod capability;
pub mod channel;
pub mod error;
pub mod traits;
pub mod types;

pub use capability::{Capabilities, Capability};
pub use channel::EventChannel;
pub use error::{Code, ProtocolError};
pub use traits::{MethodHandler, Methods, Session, handler};
pub use types::{ClientStatus, ServerInfo, SessionInfo};
