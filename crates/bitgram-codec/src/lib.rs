#![warn(missing_docs)]

//! bitgram-codec: the bit-packed message buffer codec.
//!
//! Two layers:
//! - `bit_io`: raw reads and writes of N-bit fields at arbitrary bit offsets
//! - `buffer`: the typed [`MessageBuffer`] façade the rest of the transport
//!   reads and writes through
//!
//! Bit order is LSB-first within a byte and little-endian across bytes. Both
//! are part of the wire contract: two independent implementations must
//! produce identical bytes for identical write sequences.

/// Raw bit-level reads and writes over byte slices.
pub mod bit_io;
/// The typed message buffer.
pub mod buffer;

pub use buffer::MessageBuffer;
