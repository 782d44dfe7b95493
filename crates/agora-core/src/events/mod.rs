//! Domain events emitted by Agora operations.
//!
//! Change-feed events flow from the database tier to the realtime
//! publisher and out to WebSocket listeners.

pub mod change;

pub use change::{ChangeEvent, ChangeOp, Collection};
