/// Connection status state machine.
///
/// Tracks the lifecycle of a connection from initial contact through active
/// communication to teardown. Transitions are driven by the handshake and
/// timeout logic; the latency engine starts at the transition to
/// `Connected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ConnectionStatus {
    /// Connection object exists but no handshake traffic has been exchanged
    #[default]
    Idle = 0,

    /// We sent a connect request and are waiting for the response
    InitiatedConnect = 1,

    /// We answered a connect request and are waiting for confirmation
    RespondedConnect = 2,

    /// Handshake complete - pings are flowing
    Connected = 3,

    /// Disconnect requested, waiting for the wire to drain
    Disconnecting = 4,

    /// Connection is closed and will be reaped
    Disconnected = 5,
}

impl ConnectionStatus {
    /// Returns true once the handshake has completed.
    pub fn is_established(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    /// Returns true while the handshake is still in flight.
    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionStatus::InitiatedConnect | ConnectionStatus::RespondedConnect)
    }

    /// Returns true when the connection is going or has gone away.
    pub fn is_closing(&self) -> bool {
        matches!(self, ConnectionStatus::Disconnecting | ConnectionStatus::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(ConnectionStatus::Connected.is_established());
        assert!(!ConnectionStatus::InitiatedConnect.is_established());
        assert!(ConnectionStatus::InitiatedConnect.is_connecting());
        assert!(ConnectionStatus::RespondedConnect.is_connecting());
        assert!(ConnectionStatus::Disconnecting.is_closing());
        assert!(ConnectionStatus::Disconnected.is_closing());
        assert!(!ConnectionStatus::Idle.is_closing());
    }
}
