//! Round-trip and remote-clock-offset estimation.
//!
//! One tracker per connection. Pings go out with a monotonically increasing
//! number truncated to 8 bits on the wire; a pong echoes that number along
//! with the responder's clock. An accepted pong refreshes the timeout
//! deadline, feeds the RTT average, and refines the estimate of the remote
//! clock's offset from ours.

use bitgram_core::config::Config;

/// Round-trip estimate substituted while no sample exists, seconds.
const UNSET_RTT_SUBSTITUTE: f32 = 0.1;
/// Floor added to every resend delay, seconds.
const RESEND_DELAY_FLOOR: f32 = 0.025;
/// Multiplier applied to the smoothed round-trip time.
const RESEND_DELAY_FACTOR: f32 = 2.1;

/// Outcome of an accepted pong.
#[derive(Debug, Clone, Copy)]
pub struct LatencySample {
    /// Raw round-trip time of this ping/pong pair, seconds.
    pub rtt: f32,
    /// Smoothed round-trip time after folding this sample in.
    pub average_roundtrip_time: f32,
    /// Retransmission delay derived from the new average.
    pub resend_delay: f32,
}

/// Per-connection keep-alive and clock-synchronization state.
///
/// Write-side operations run on the network side only; the tracker is a
/// plain owned value inside its connection, so there is no runtime affinity
/// check to violate.
#[derive(Debug)]
pub struct LatencyTracker {
    /// Number of the most recent ping; its low byte travels on the wire.
    sent_ping_number: u32,
    /// Local send time of the most recent ping.
    sent_ping_time: f64,
    /// Smoothed round-trip time, seconds. Negative until the first sample.
    average_roundtrip_time: f32,
    /// Seconds such that `remote = local + offset`.
    remote_time_offset: f64,
    /// Local time past which the connection counts as lost.
    timeout_deadline: f64,
    connection_timeout: f32,
    rtt_smoothing_factor: f32,
}

impl LatencyTracker {
    /// Creates an uninitialized tracker; the deadline stays infinite until
    /// [`initialize_ping`](Self::initialize_ping).
    pub fn new(config: &Config) -> Self {
        Self {
            sent_ping_number: 0,
            sent_ping_time: 0.0,
            average_roundtrip_time: -1.0,
            remote_time_offset: 0.0,
            timeout_deadline: f64::INFINITY,
            connection_timeout: config.connection_timeout,
            rtt_smoothing_factor: config.rtt_smoothing_factor,
        }
    }

    /// Arms the tracker at handshake completion and returns the first ping
    /// number to send. The initial deadline is doubled to ride out
    /// handshake-adjacent stalls.
    pub fn initialize_ping(&mut self, now: f64) -> u8 {
        self.timeout_deadline = now + 2.0 * self.connection_timeout as f64;
        self.average_roundtrip_time = -1.0;
        self.send_ping(now)
    }

    /// Registers an outgoing ping and returns its 8-bit wire number.
    pub fn send_ping(&mut self, now: f64) -> u8 {
        self.sent_ping_number += 1;
        self.sent_ping_time = now;
        (self.sent_ping_number & 0xff) as u8
    }

    /// Processes a pong received at local time `now`.
    ///
    /// A pong whose number does not match the low byte of the outstanding
    /// ping number is stale, reordered or spoofed, and is dropped.
    pub fn received_pong(
        &mut self,
        now: f64,
        pong_number: u8,
        remote_send_time: f32,
    ) -> Option<LatencySample> {
        let expected = (self.sent_ping_number & 0xff) as u8;
        if pong_number != expected {
            tracing::trace!(got = pong_number, expected, "pong number mismatch, dropping");
            return None;
        }

        self.reset_timeout(now);

        let rtt = (now - self.sent_ping_time) as f32;
        debug_assert!(rtt >= 0.0, "negative round-trip sample {rtt}");
        let rtt = rtt.max(0.0);
        let diff = remote_send_time as f64 + rtt as f64 * 0.5 - now;

        if self.average_roundtrip_time < 0.0 {
            self.remote_time_offset = diff;
            self.average_roundtrip_time = rtt;
            tracing::debug!(
                rtt_ms = rtt * 1000.0,
                offset = self.remote_time_offset,
                "initial round-trip sample"
            );
        } else {
            let alpha = self.rtt_smoothing_factor;
            self.average_roundtrip_time = (1.0 - alpha) * self.average_roundtrip_time + alpha * rtt;
            // Cumulative mean over every sample so far.
            let samples = self.sent_ping_number as f64;
            self.remote_time_offset = (self.remote_time_offset * (samples - 1.0) + diff) / samples;
        }

        Some(LatencySample {
            rtt,
            average_roundtrip_time: self.average_roundtrip_time,
            resend_delay: self.resend_delay(),
        })
    }

    /// Pushes the timeout deadline out by the configured timeout.
    pub fn reset_timeout(&mut self, now: f64) {
        self.timeout_deadline = now + self.connection_timeout as f64;
    }

    /// Local time past which the connection counts as lost.
    pub fn timeout_deadline(&self) -> f64 {
        self.timeout_deadline
    }

    /// Retransmission delay for reliable channels: positive even at zero
    /// RTT, and non-decreasing in the average.
    pub fn resend_delay(&self) -> f32 {
        let rtt = if self.average_roundtrip_time < 0.0 {
            UNSET_RTT_SUBSTITUTE
        } else {
            self.average_roundtrip_time
        };
        RESEND_DELAY_FLOOR + rtt * RESEND_DELAY_FACTOR
    }

    /// Smoothed round-trip time in seconds; negative until the first sample.
    pub fn average_roundtrip_time(&self) -> f32 {
        self.average_roundtrip_time
    }

    /// Returns true once at least one pong has been accepted.
    pub fn has_roundtrip_estimate(&self) -> bool {
        self.average_roundtrip_time >= 0.0
    }

    /// Number of the most recent ping.
    pub fn sent_ping_number(&self) -> u32 {
        self.sent_ping_number
    }

    /// Local send time of the most recent ping.
    pub fn sent_ping_time(&self) -> f64 {
        self.sent_ping_time
    }

    /// Estimated offset such that `remote = local + offset`.
    pub fn remote_time_offset(&self) -> f64 {
        self.remote_time_offset
    }

    /// Translates a local timestamp to the remote peer's clock.
    pub fn remote_time(&self, local: f64) -> f64 {
        local + self.remote_time_offset
    }

    /// Translates a remote timestamp to the local clock.
    pub fn local_time(&self, remote: f64) -> f64 {
        remote - self.remote_time_offset
    }

    /// One-shot offset assignment for the first network-time-carrying packet
    /// arriving before any pong.
    pub fn initialize_remote_time_offset(&mut self, remote_send_time: f32, now: f64) {
        let rtt = self.average_roundtrip_time.max(0.0) as f64;
        self.remote_time_offset = remote_send_time as f64 + rtt * 0.5 - now;
    }
}
