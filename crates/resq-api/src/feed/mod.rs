//! WebSocket live feed
//!
//! One socket is one mounted dashboard view: the client identifies with an
//! access token, optionally changes its view, and receives a fresh snapshot
//! whenever the alert collection changes.

pub mod protocol;
mod socket;

pub use protocol::{ClientFrame, CloseCode, ServerFrame, SnapshotPayload};
pub use socket::{feed_handler, HEARTBEAT_INTERVAL_MS, HEARTBEAT_TIMEOUT_MS};
