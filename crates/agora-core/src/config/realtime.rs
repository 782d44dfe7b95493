//! Real-time change-feed configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket + change feed) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Origins admitted at the WebSocket upgrade. An empty list admits
    /// any origin (development mode).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Postgres NOTIFY channel the change feed listens on.
    #[serde(default = "default_feed_channel")]
    pub feed_channel: String,
    /// Buffer size of the feed-to-publisher event channel.
    #[serde(default = "default_feed_buffer")]
    pub feed_buffer_size: usize,
    /// Per-listener outbound frame buffer size.
    #[serde(default = "default_listener_buffer")]
    pub listener_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            feed_channel: default_feed_channel(),
            feed_buffer_size: default_feed_buffer(),
            listener_buffer_size: default_listener_buffer(),
        }
    }
}

fn default_feed_channel() -> String {
    "agora_changes".to_string()
}

fn default_feed_buffer() -> usize {
    256
}

fn default_listener_buffer() -> usize {
    64
}
