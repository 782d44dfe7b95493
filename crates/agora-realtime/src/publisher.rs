//! Publisher bridging the change feed to connected listeners.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use agora_core::events::ChangeEvent;

use crate::envelope::FeedEnvelope;
use crate::registry::ListenerRegistry;

/// Consumes change events from an in-process queue, wraps each one in
/// its wire envelope, serializes it once, and fans it out to every
/// registered listener.
///
/// The publisher knows nothing about where events come from; it only
/// sees the receiving end of a channel, so any feed source (or a test)
/// can drive it.
pub struct ChangeFeedPublisher {
    registry: Arc<ListenerRegistry>,
}

impl ChangeFeedPublisher {
    /// Creates a publisher fanning out to the given registry.
    pub fn new(registry: Arc<ListenerRegistry>) -> Self {
        Self { registry }
    }

    /// Spawn the publisher loop — runs until shutdown or until the
    /// event channel's sender is dropped.
    pub fn spawn(
        self,
        events: mpsc::Receiver<ChangeEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(events, shutdown))
    }

    async fn run(
        self,
        mut events: mpsc::Receiver<ChangeEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        tracing::info!("Change feed publisher started");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Change feed publisher received shutdown signal");
                        break;
                    }
                }
                event = events.recv() => {
                    match event {
                        Some(event) => self.publish(event),
                        None => {
                            tracing::info!("Change feed publisher input closed");
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("Change feed publisher stopped");
    }

    fn publish(&self, event: ChangeEvent) {
        let envelope = FeedEnvelope::for_event(event);
        let frame = match envelope.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Failed to serialize feed frame: {}", e);
                return;
            }
        };

        let delivered = self.registry.broadcast(&frame);
        tracing::debug!(
            "Published {} frame to {} listeners",
            envelope.kind(),
            delivered
        );
    }
}
