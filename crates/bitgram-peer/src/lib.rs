#![warn(missing_docs)]

//! bitgram-peer: per-connection state for the transport core.
//!
//! A [`Connection`] owns the keep-alive and latency machinery for one remote
//! endpoint: the periodic ping/pong exchange, RTT and remote-clock-offset
//! estimation, the timeout deadline, and dissemination of the RTT-derived
//! resend delay to the connection's reliable send channels. Incoming records
//! flow to the host application through a `crossbeam_channel` hand-off; once
//! dequeued they are owned by the consuming thread.

/// Send channel surface and resend-delay dissemination.
pub mod channel;
/// Connection state, heartbeat and ping/pong wiring.
pub mod connection;
/// Incoming message records handed to the host application.
pub mod incoming;
/// Round-trip and remote-clock-offset estimation.
pub mod latency;
/// Connection status state machine.
pub mod status;
/// Wire-level message tags.
pub mod wire;

pub use channel::{ChannelSet, SendChannel};
pub use connection::{Connection, ConnectionId, OutgoingPacket};
pub use incoming::IncomingMessage;
pub use latency::{LatencySample, LatencyTracker};
pub use status::ConnectionStatus;
pub use wire::{DeliveryMethod, WireType};
