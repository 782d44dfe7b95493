//! # agora-realtime
//!
//! Realtime fan-out for Agora: a registry of connected WebSocket
//! listeners, the publisher that pushes committed document mutations to
//! every listener, and origin admission for upgrades.
//!
//! The crate is transport-light on purpose. It deals in pre-serialized
//! text frames and per-listener channels; the HTTP layer owns the
//! actual sockets and forwards frames from each listener's receiver.

pub mod envelope;
pub mod origin;
pub mod publisher;
pub mod registry;

pub use envelope::FeedEnvelope;
pub use publisher::ChangeFeedPublisher;
pub use registry::{ListenerId, ListenerRegistry};
