//! Hand-off channel for adapter output streams.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

/// Default buffer size for an [`EventChannel`].
pub const DEFAULT_CAPACITY: usize = 32;

/// Bounded channel whose receiving half is handed to the client once.
///
/// Embedding applications keep the channel inside their session adapter,
/// push values through [`EventChannel::sender`], and return
/// [`EventChannel::take`] from the matching `Session` accessor.
pub struct EventChannel<T> {
    tx: mpsc::Sender<T>,
    rx: Mutex<Option<mpsc::Receiver<T>>>,
}

impl<T> Default for EventChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventChannel<T> {
    /// Create a channel with [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a channel with the given buffer size.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// A sender for pushing values.
    #[must_use]
    pub fn sender(&self) -> mpsc::Sender<T> {
        self.tx.clone()
    }

    /// Take the receiving half. Returns `None` after the first call.
    pub fn take(&self) -> Option<mpsc::Receiver<T>> {
        self.rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_receiver_taken_once() {
        let chan = EventChannel::<bool>::new();
        let mut rx = chan.take().unwrap();
        assert!(chan.take().is_none());

        chan.sender().send(true).await.unwrap();
        assert_eq!(rx.recv().await, Some(true));
    }
}
