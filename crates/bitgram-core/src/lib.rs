#![warn(missing_docs)]

//! bitgram-core: foundational types and utilities.
//!
//! This crate provides the minimal set of core utilities shared across all layers:
//! - Configuration types
//! - Error handling
//! - Incoming message kinds and their delivery gating
//! - Memory utilities (byte array pooling)
//! - A seconds-based clock abstraction
//!
//! Protocol-specific logic lives in specialized crates:
//! - `bitgram-codec`: the bit-packed message buffer codec
//! - `bitgram-peer`: connection state, keep-alive and latency estimation

/// Protocol constants shared across layers.
pub mod constants {
    /// Number of sequence channels available per sequenced delivery method.
    pub const SEQUENCE_CHANNELS: u8 = 32;
    /// Maximum encoded size of a 32-bit variable-length integer.
    pub const MAX_VARINT32_BYTES: usize = 5;
    /// Maximum encoded size of a 64-bit variable-length integer.
    pub const MAX_VARINT64_BYTES: usize = 10;
    /// Default initial byte capacity for outgoing message buffers.
    pub const DEFAULT_BUFFER_SIZE: usize = 64;
}

/// Byte array pooling for read-side scratch buffers.
pub mod byte_pool;
/// Configuration options for the transport core.
pub mod config;
/// Error types and results.
pub mod error;
/// Kinds of records delivered to the host application.
pub mod message_kind;
/// Seconds-based time source abstraction.
pub mod time;
/// Opaque payload transform seam (pluggable encryption hook).
pub mod transform;
