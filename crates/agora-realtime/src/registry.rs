//! Registry of connected feed listeners.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

/// Unique listener identifier.
pub type ListenerId = Uuid;

/// Thread-safe registry of all connected WebSocket listeners.
///
/// Each listener owns a bounded channel; `broadcast` never blocks and
/// never lets one listener affect another. A listener that cannot keep
/// up loses frames, a listener whose receiver is gone is evicted.
#[derive(Debug)]
pub struct ListenerRegistry {
    /// Listener ID to its outbound frame sender.
    listeners: DashMap<ListenerId, mpsc::Sender<String>>,
    /// Per-listener outbound buffer capacity.
    buffer_size: usize,
}

impl ListenerRegistry {
    /// Creates an empty registry with the given per-listener buffer.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            listeners: DashMap::new(),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Registers a new listener, returning its ID and the receiving end
    /// of its frame channel.
    pub fn register(&self) -> (ListenerId, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let id = Uuid::new_v4();
        self.listeners.insert(id, tx);
        tracing::debug!(
            "Listener {} registered ({} active)",
            id,
            self.listeners.len()
        );
        (id, rx)
    }

    /// Removes a listener. Returns whether it was present.
    pub fn remove(&self, id: &ListenerId) -> bool {
        let removed = self.listeners.remove(id).is_some();
        if removed {
            tracing::debug!(
                "Listener {} removed ({} active)",
                id,
                self.listeners.len()
            );
        }
        removed
    }

    /// Sends a frame to every registered listener.
    ///
    /// Full buffers drop the frame for that listener only; closed
    /// listeners are evicted. Returns how many listeners the frame was
    /// queued for.
    pub fn broadcast(&self, frame: &str) -> usize {
        let mut delivered = 0;
        let mut closed: Vec<ListenerId> = Vec::new();

        for entry in self.listeners.iter() {
            match entry.value().try_send(frame.to_string()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        "Listener {} send buffer full, dropping frame",
                        entry.key()
                    );
                }
                Err(TrySendError::Closed(_)) => closed.push(*entry.key()),
            }
        }

        for id in closed {
            if self.listeners.remove(&id).is_some() {
                tracing::debug!("Evicted closed listener {}", id);
            }
        }

        delivered
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
