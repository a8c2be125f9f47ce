//! Wire-level message tags.
//!
//! Every packet carries a one-byte tag in its outer framing. User tags
//! combine a delivery method base with a sequence channel index; library
//! tags (ping, pong, handshake) sit above 127. The numeric layout is part of
//! the wire contract.

use bitgram_core::constants::SEQUENCE_CHANNELS;

/// How a message's delivery is guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DeliveryMethod {
    /// Fire-and-forget; may arrive out of order, duplicated, or not at all.
    Unreliable = 1,
    /// Unreliable, but late arrivals on the same channel are dropped.
    UnreliableSequenced = 2,
    /// Retransmitted until acknowledged; no ordering between messages.
    ReliableUnordered = 34,
    /// Retransmitted; late arrivals on the same channel are dropped.
    ReliableSequenced = 35,
    /// Retransmitted and delivered in order per channel.
    ReliableOrdered = 67,
}

/// One-byte wire tag combining delivery method and sequence channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireType(u8);

impl WireType {
    /// Data from a peer without an established connection.
    pub const UNCONNECTED: WireType = WireType(0);
    /// Connection request.
    pub const CONNECT: WireType = WireType(128);
    /// Response to a connection request.
    pub const CONNECT_RESPONSE: WireType = WireType(129);
    /// Final handshake confirmation.
    pub const CONNECTION_ESTABLISHED: WireType = WireType(130);
    /// Keep-alive probe; payload is the 8-bit ping number.
    pub const PING: WireType = WireType(131);
    /// Keep-alive reply; payload is the ping number plus the sender's clock.
    pub const PONG: WireType = WireType(132);
    /// Graceful teardown.
    pub const DISCONNECT: WireType = WireType(133);
    /// Receipt for reliable delivery.
    pub const ACKNOWLEDGE: WireType = WireType(134);

    /// Builds a user tag from a delivery method and a sequence channel.
    ///
    /// The channel must be 0 for unsequenced methods and below
    /// [`SEQUENCE_CHANNELS`] otherwise.
    pub fn from_user(method: DeliveryMethod, channel: u8) -> Self {
        match method {
            DeliveryMethod::Unreliable | DeliveryMethod::ReliableUnordered => {
                assert_eq!(channel, 0, "unsequenced methods have no channel");
            }
            _ => {
                assert!(channel < SEQUENCE_CHANNELS, "sequence channel {channel} out of range");
            }
        }
        WireType(method as u8 + channel)
    }

    /// Parses a raw tag byte.
    pub fn from_u8(raw: u8) -> Self {
        WireType(raw)
    }

    /// Returns the raw tag byte.
    pub fn to_u8(self) -> u8 {
        self.0
    }

    /// Returns true for transport-internal tags.
    pub fn is_library(self) -> bool {
        self.0 >= 128
    }

    /// Recovers the delivery method of a user tag, or `None` for library and
    /// unconnected tags.
    pub fn delivery_method(self) -> Option<DeliveryMethod> {
        match self.0 {
            1 => Some(DeliveryMethod::Unreliable),
            2..=33 => Some(DeliveryMethod::UnreliableSequenced),
            34 => Some(DeliveryMethod::ReliableUnordered),
            35..=66 => Some(DeliveryMethod::ReliableSequenced),
            67..=98 => Some(DeliveryMethod::ReliableOrdered),
            _ => None,
        }
    }

    /// Recovers the sequence channel of a user tag (0 when not sequenced).
    pub fn sequence_channel(self) -> u8 {
        match self.delivery_method() {
            Some(method) => self.0 - method as u8,
            None => 0,
        }
    }
}
