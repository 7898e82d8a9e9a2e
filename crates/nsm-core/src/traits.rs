//! The session adapter trait.

use std::{collections::HashMap, future::Future, sync::Arc};

use async_trait::async_trait;
use futures::{FutureExt, future::BoxFuture};
use nsm_osc::Message;
use tokio::sync::mpsc;

use crate::{ClientStatus, ProtocolError, ServerInfo, SessionInfo};

/// Handler for an adapter-registered extension address.
///
/// Receives the raw message. `Ok(Some(reply))` sends `reply` back,
/// `Err` is sent as an `/error` reply for the handled address.
pub type MethodHandler =
    Arc<dyn Fn(Message) -> BoxFuture<'static, Result<Option<Message>, ProtocolError>> + Send + Sync>;

/// Extension address table.
pub type Methods = HashMap<String, MethodHandler>;

/// Wrap an async closure as a [`MethodHandler`].
pub fn handler<F, Fut>(f: F) -> MethodHandler
where
    F: Fn(Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Message>, ProtocolError>> + Send + 'static,
{
    Arc::new(move |msg| f(msg).boxed())
}

/// Behaviour of a client with respect to coordinator commands.
///
/// Only `open` and `save` are required. Everything else is optional and
/// usually tied to a capability the client announces, e.g. progress
/// reports need `progress`.
///
/// The stream accessors are called once, when the client starts. Returning
/// `None` means the capability is not implemented and nothing is ever
/// forwarded for it. [`crate::EventChannel`] is a convenient backing store.
#[async_trait]
pub trait Session: Send + Sync {
    /// Called when the coordinator has replied to the announce request.
    ///
    /// An error aborts client construction.
    async fn announce(&self, _info: ServerInfo) -> Result<(), ProtocolError> {
        Ok(())
    }

    /// Open (or create) the project described by `info`.
    ///
    /// Without the `switch` capability this is called at most once.
    async fn open(&self, info: SessionInfo) -> Result<String, ProtocolError>;

    /// Save the current project. Only called after `open`.
    async fn save(&self) -> Result<String, ProtocolError>;

    /// All clients in the session have been started.
    async fn session_is_loaded(&self) {}

    /// Show or hide the optional GUI.
    async fn show_gui(&self, _show: bool) {}

    /// `true` when there are unsaved changes, `false` once clean.
    fn dirty(&self) -> Option<mpsc::Receiver<bool>> {
        None
    }

    /// `true` when the GUI is showing, `false` when hidden.
    fn gui_visible(&self) -> Option<mpsc::Receiver<bool>> {
        None
    }

    /// Progress of an ongoing open or save, in `[0, 1]`.
    ///
    /// Clients reporting progress must still complete `open`/`save` normally.
    fn progress(&self) -> Option<mpsc::Receiver<f32>> {
        None
    }

    /// Status messages for the coordinator to display.
    fn status(&self) -> Option<mpsc::Receiver<ClientStatus>> {
        None
    }

    /// Extra addresses handled by the adapter.
    ///
    /// Entries under built-in or reserved addresses are ignored.
    fn methods(&self) -> Methods {
        Methods::new()
    }
}
