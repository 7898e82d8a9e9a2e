//! Forwarding of client state to the coordinator.

use futures::{StreamExt, stream::BoxStream};
use nsm_core::{ClientStatus, Session, address};
use nsm_osc::Message;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::{ClientError, outbound::Outbound};

/// A state change reported by the session adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Dirty(bool),
    GuiVisible(bool),
    Progress(f32),
    Status(ClientStatus),
}

impl ClientEvent {
    /// Wire message for this event.
    #[must_use]
    pub fn to_message(&self) -> Message {
        match self {
            Self::Dirty(true) => Message::new(address::CLIENT_IS_DIRTY),
            Self::Dirty(false) => Message::new(address::CLIENT_IS_CLEAN),
            Self::GuiVisible(true) => Message::new(address::CLIENT_GUI_IS_SHOWN),
            Self::GuiVisible(false) => Message::new(address::CLIENT_GUI_IS_HIDDEN),
            Self::Progress(x) => Message::new(address::CLIENT_PROGRESS).arg(*x),
            Self::Status(status) => Message::new(address::CLIENT_MESSAGE)
                .arg(i32::from(status.priority))
                .arg(status.message.as_str()),
        }
    }

    const fn what(&self) -> &'static str {
        match self {
            Self::Dirty(_) => "dirty",
            Self::GuiVisible(_) => "gui-showing",
            Self::Progress(_) => "progress",
            Self::Status(_) => "client status",
        }
    }
}

/// The adapter's output streams. Absent capabilities contribute nothing.
pub struct EventStreams {
    streams: Vec<BoxStream<'static, ClientEvent>>,
}

impl EventStreams {
    /// Take every stream the adapter provides.
    #[must_use]
    pub fn from_session(session: &dyn Session) -> Self {
        let mut streams = Vec::new();
        if let Some(rx) = session.dirty() {
            streams.push(ReceiverStream::new(rx).map(ClientEvent::Dirty).boxed());
        }
        if let Some(rx) = session.gui_visible() {
            streams.push(ReceiverStream::new(rx).map(ClientEvent::GuiVisible).boxed());
        }
        if let Some(rx) = session.progress() {
            streams.push(ReceiverStream::new(rx).map(ClientEvent::Progress).boxed());
        }
        if let Some(rx) = session.status() {
            streams.push(ReceiverStream::new(rx).map(ClientEvent::Status).boxed());
        }
        Self { streams }
    }

    /// Number of present streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

/// Forward events until cancelled.
///
/// A stream whose sender is dropped simply stops contributing. Once all are
/// gone the loop idles until cancellation.
///
/// # Errors
/// Returns error if a send fails.
pub async fn forward_events(
    outbound: Outbound,
    streams: EventStreams,
    cancel: CancellationToken,
) -> Result<(), ClientError> {
    let mut events = futures::stream::select_all(streams.streams);
    let mut exhausted = events.is_empty();

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = events.next(), if !exhausted => next,
        };
        let Some(event) = next else {
            tracing::debug!("All adapter streams closed");
            exhausted = true;
            continue;
        };

        tracing::debug!(?event, "Forwarding");
        outbound
            .send(&event.to_message())
            .await
            .map_err(|source| ClientError::Forward {
                what: event.what(),
                source,
            })?;
    }
    tracing::debug!("Forwarding loop stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use nsm_osc::Arg;

    use super::*;

    #[test]
    fn test_event_messages() {
        assert_eq!(
            ClientEvent::Dirty(true).to_message(),
            Message::new("/nsm/client/is_dirty")
        );
        assert_eq!(
            ClientEvent::Dirty(false).to_message(),
            Message::new("/nsm/client/is_clean")
        );
        assert_eq!(
            ClientEvent::GuiVisible(true).to_message(),
            Message::new("/nsm/client/gui_is_shown")
        );
        assert_eq!(
            ClientEvent::GuiVisible(false).to_message(),
            Message::new("/nsm/client/gui_is_hidden")
        );
        assert_eq!(
            ClientEvent::Progress(0.75).to_message().args,
            vec![Arg::Float(0.75)]
        );
        let status = ClientEvent::Status(ClientStatus::new(2, "loading samples")).to_message();
        assert_eq!(status.address, "/nsm/client/message");
        assert_eq!(
            status.args,
            vec![Arg::Int(2), Arg::from("loading samples")]
        );
    }

    #[test]
    fn test_progress_forwarded_as_received() {
        assert_eq!(
            ClientEvent::Progress(1.5).to_message().args,
            vec![Arg::Float(1.5)]
        );
    }
}
