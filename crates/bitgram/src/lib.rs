#![warn(missing_docs)]

//! Bitgram: a small public API facade for the workspace.
//!
//! This crate provides a clean, stable surface that re-exports the most
//! commonly used types of the transport core:
//!
//! - The bit-packed message codec (`MessageBuffer`)
//! - Connection state and latency estimation (`Connection`, `LatencyTracker`)
//! - Incoming records and their kinds (`IncomingMessage`, `IncomingKind`)
//! - Core configuration and pooling (`Config`, `ByteArrayPool`)
//!
//! Example
//! ```
//! use bitgram::MessageBuffer;
//!
//! let mut buffer = MessageBuffer::new();
//! buffer.write_bool(true);
//! buffer.write_var_u32(300);
//! buffer.write_string("hello");
//!
//! assert!(buffer.read_bool().unwrap());
//! assert_eq!(buffer.read_var_u32().unwrap(), 300);
//! assert_eq!(buffer.read_string().unwrap(), "hello");
//! ```

// Core config, errors and pooling
pub use bitgram_core::{
    byte_pool::ByteArrayPool,
    config::Config,
    error::{ErrorKind, Result},
    message_kind::IncomingKind,
    time::{Clock, SystemClock},
    transform::{IdentityTransform, PayloadTransform},
};
// Codec: the typed message buffer
pub use bitgram_codec::MessageBuffer;
// Peer: connections, records, latency and wire tags
pub use bitgram_peer::{
    ChannelSet, Connection, ConnectionId, ConnectionStatus, DeliveryMethod, IncomingMessage,
    LatencySample, LatencyTracker, OutgoingPacket, SendChannel, WireType,
};

/// Convenience prelude with the most commonly used items.
pub mod prelude {
    pub use crate::{
        ByteArrayPool, Clock, Config, Connection, ConnectionId, ConnectionStatus, DeliveryMethod,
        ErrorKind, IncomingKind, IncomingMessage, LatencyTracker, MessageBuffer, OutgoingPacket,
        SystemClock, WireType,
    };
}
