/// Kind of an incoming record handed to the host application.
///
/// Each kind maps to one bit in [`Config::enabled_incoming_kinds`]; kinds the
/// host has not enabled are never queued for delivery.
///
/// [`Config::enabled_incoming_kinds`]: crate::config::Config::enabled_incoming_kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IncomingKind {
    /// Something went wrong inside the transport; should not normally appear.
    Error = 0,
    /// A connection changed status; payload is the status byte plus a reason string.
    StatusChanged = 1,
    /// Data arriving from a peer we have no connection to.
    UnconnectedData = 2,
    /// Application data from a connected peer.
    Data = 3,
    /// Delivery receipt for an earlier outgoing message.
    Receipt = 4,
    /// Verbose diagnostic message from the transport.
    DebugMessage = 5,
    /// Recoverable problem noticed by the transport.
    WarningMessage = 6,
    /// Non-recoverable problem noticed by the transport.
    ErrorMessage = 7,
    /// The round-trip estimate for a connection was updated; payload is the rtt as f32.
    ConnectionLatencyUpdated = 8,
}

impl IncomingKind {
    /// Returns the bit this kind occupies in the enabled-kinds mask.
    #[inline]
    pub fn mask(self) -> u32 {
        1 << self as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_are_distinct() {
        let kinds = [
            IncomingKind::Error,
            IncomingKind::StatusChanged,
            IncomingKind::UnconnectedData,
            IncomingKind::Data,
            IncomingKind::Receipt,
            IncomingKind::DebugMessage,
            IncomingKind::WarningMessage,
            IncomingKind::ErrorMessage,
            IncomingKind::ConnectionLatencyUpdated,
        ];
        let mut combined = 0u32;
        for kind in kinds {
            assert_eq!(combined & kind.mask(), 0);
            combined |= kind.mask();
        }
    }
}
