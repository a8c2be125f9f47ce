use thiserror::Error;

/// Errors surfaced by the codec and connection layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A read requested more bits than remain between the read position and
    /// the end of meaningful data.
    #[error("read of {needed} bits overflows the buffer ({available} bits remain)")]
    ReadOverflow {
        /// Bits the failed read required.
        needed: usize,
        /// Bits that remained past the read position.
        available: usize,
    },

    /// A variable-length integer ran past its maximum encoded size without a
    /// terminating byte.
    #[error("variable-length integer exceeded {max_bytes} bytes without terminating")]
    MalformedVarint {
        /// Maximum number of encoded bytes for the integer width.
        max_bytes: usize,
    },

    /// An endpoint record carried an address length other than 4 or 16.
    #[error("invalid endpoint address length {0}, expected 4 (IPv4) or 16 (IPv6)")]
    InvalidAddressLength(u8),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ErrorKind>;
