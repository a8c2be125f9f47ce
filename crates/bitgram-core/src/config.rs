use std::default::Default;

use crate::{constants::DEFAULT_BUFFER_SIZE, message_kind::IncomingKind};

#[derive(Clone, Debug)]
/// Configuration options to tune connection and codec behavior.
pub struct Config {
    /// Seconds between keep-alive pings on an established connection.
    pub ping_interval: f32,
    /// Seconds without a received pong before the connection is considered lost.
    pub connection_timeout: f32,
    /// Smoothing factor (0..1) applied to new round-trip samples.
    pub rtt_smoothing_factor: f32,
    /// Initial byte capacity of freshly allocated message buffers.
    pub receive_buffer_initial_size: usize,
    /// Bitmask of incoming record kinds delivered to the host application.
    /// See [`IncomingKind::mask`].
    pub enabled_incoming_kinds: u32,
}

impl Config {
    /// Enables delivery of the given incoming record kind.
    pub fn enable_incoming_kind(&mut self, kind: IncomingKind) {
        self.enabled_incoming_kinds |= kind.mask();
    }

    /// Disables delivery of the given incoming record kind.
    pub fn disable_incoming_kind(&mut self, kind: IncomingKind) {
        self.enabled_incoming_kinds &= !kind.mask();
    }

    /// Returns whether the given incoming record kind is delivered to the host.
    pub fn is_incoming_kind_enabled(&self, kind: IncomingKind) -> bool {
        self.enabled_incoming_kinds & kind.mask() != 0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ping_interval: 4.0,
            connection_timeout: 25.0,
            rtt_smoothing_factor: 0.3,
            receive_buffer_initial_size: DEFAULT_BUFFER_SIZE,
            // Latency updates and receipts are opt-in; everything else is on.
            enabled_incoming_kinds: IncomingKind::Error.mask()
                | IncomingKind::StatusChanged.mask()
                | IncomingKind::UnconnectedData.mask()
                | IncomingKind::Data.mask()
                | IncomingKind::DebugMessage.mask()
                | IncomingKind::WarningMessage.mask()
                | IncomingKind::ErrorMessage.mask(),
        }
    }
}
