//! Connection state, heartbeat and ping/pong wiring.

use std::{net::SocketAddr, sync::Arc};

use crossbeam_channel::Sender;

use bitgram_codec::MessageBuffer;
use bitgram_core::{
    byte_pool::ByteArrayPool, config::Config, error::Result, message_kind::IncomingKind,
    time::Clock,
};

use crate::{
    channel::ChannelSet,
    incoming::IncomingMessage,
    latency::LatencyTracker,
    status::ConnectionStatus,
    wire::WireType,
};

/// Opaque handle identifying a connection to the host application.
///
/// Connections are single-owner values on the network side; records carry
/// this id instead of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

/// A tagged payload ready for the socket layer.
///
/// Framing beyond the tag byte (sequencing, acks, fragmentation headers)
/// belongs to the reliability layer.
#[derive(Debug)]
pub struct OutgoingPacket {
    /// Outer framing tag.
    pub wire_type: WireType,
    /// Tag-specific payload bytes.
    pub payload: Vec<u8>,
}

/// State for one remote endpoint.
///
/// Owned by the network side; the host application interacts with it only
/// through the records arriving on the delivery queue.
pub struct Connection {
    id: ConnectionId,
    remote_endpoint: SocketAddr,
    status: ConnectionStatus,
    channels: ChannelSet,
    latency: LatencyTracker,
    config: Arc<Config>,
    pool: Arc<ByteArrayPool>,
    delivery: Sender<IncomingMessage>,
}

impl Connection {
    /// Creates an idle connection for `remote_endpoint`.
    pub fn new(
        id: ConnectionId,
        remote_endpoint: SocketAddr,
        config: Arc<Config>,
        pool: Arc<ByteArrayPool>,
        delivery: Sender<IncomingMessage>,
    ) -> Self {
        Self {
            id,
            remote_endpoint,
            status: ConnectionStatus::Idle,
            channels: ChannelSet::default_channels(),
            latency: LatencyTracker::new(&config),
            config,
            pool,
            delivery,
        }
    }

    /// The connection's handle.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The remote peer's address.
    pub fn remote_endpoint(&self) -> SocketAddr {
        self.remote_endpoint
    }

    /// Current lifecycle status.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// The connection's send channels.
    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    /// Mutable access to the send channels.
    pub fn channels_mut(&mut self) -> &mut ChannelSet {
        &mut self.channels
    }

    /// The latency estimator.
    pub fn latency(&self) -> &LatencyTracker {
        &self.latency
    }

    /// Moves the connection to a new status.
    ///
    /// Reaching `Connected` arms the keep-alive machinery and returns the
    /// first ping to put on the wire. A StatusChanged record (status byte
    /// plus reason string) goes to the host when that kind is enabled.
    pub fn set_status(
        &mut self,
        status: ConnectionStatus,
        reason: &str,
        now: f64,
    ) -> Option<OutgoingPacket> {
        if self.status == status {
            return None;
        }
        tracing::debug!(?status, reason, endpoint = %self.remote_endpoint, "status changed");
        self.status = status;

        if self.config.is_incoming_kind_enabled(IncomingKind::StatusChanged) {
            let mut buffer = MessageBuffer::with_capacity(reason.len() + 6);
            buffer.write_u8(status as u8);
            buffer.write_string(reason);
            let mut record = IncomingMessage::new(IncomingKind::StatusChanged, buffer, now);
            record.set_sender(self.remote_endpoint, Some(self.id));
            self.publish(record);
        }

        if status == ConnectionStatus::Connected {
            let number = self.latency.initialize_ping(now);
            return Some(Self::ping_packet(number));
        }
        None
    }

    /// Periodic driver: emits a keep-alive ping once the ping interval has
    /// elapsed since the previous one.
    pub fn heartbeat(&mut self, now: f64) -> Option<OutgoingPacket> {
        if !self.status.is_established() {
            return None;
        }
        if now > self.latency.sent_ping_time() + self.config.ping_interval as f64 {
            let number = self.latency.send_ping(now);
            return Some(Self::ping_packet(number));
        }
        None
    }

    fn ping_packet(number: u8) -> OutgoingPacket {
        let mut buffer = MessageBuffer::with_capacity(1);
        buffer.write_u8(number);
        OutgoingPacket { wire_type: WireType::PING, payload: buffer.into_payload() }
    }

    /// Answers a received ping with a pong.
    ///
    /// The clock is sampled immediately before the timestamp is written:
    /// the remote side treats it as our send time, not our queue time.
    pub fn send_pong(&mut self, ping_number: u8, clock: &dyn Clock) -> OutgoingPacket {
        let mut buffer = MessageBuffer::with_capacity(5);
        buffer.write_u8(ping_number);
        buffer.write_f32(clock.now() as f32);
        OutgoingPacket { wire_type: WireType::PONG, payload: buffer.into_payload() }
    }

    /// Consumes a received pong record.
    ///
    /// An accepted pong refreshes the timeout deadline, folds the new
    /// round-trip sample into the estimate, pushes the derived resend delay
    /// into every reliable send channel, and publishes a
    /// ConnectionLatencyUpdated record when the host has enabled them.
    pub fn received_pong(&mut self, message: &mut IncomingMessage, now: f64) -> Result<()> {
        let pong_number = message.read_u8()?;
        let remote_send_time = message.read_f32()?;

        let Some(sample) = self.latency.received_pong(now, pong_number, remote_send_time) else {
            return Ok(());
        };
        message.set_user_message_time(self.latency.local_time(remote_send_time as f64));

        self.channels.update_resend_delays(sample.resend_delay);

        if self.config.is_incoming_kind_enabled(IncomingKind::ConnectionLatencyUpdated) {
            let mut buffer = MessageBuffer::with_capacity(4);
            buffer.attach_pool(self.pool.clone());
            buffer.write_f32(sample.rtt);
            let mut record =
                IncomingMessage::new(IncomingKind::ConnectionLatencyUpdated, buffer, now);
            record.set_sender(self.remote_endpoint, Some(self.id));
            self.publish(record);
        }
        Ok(())
    }

    /// Local time past which the connection counts as lost.
    pub fn timeout_deadline(&self) -> f64 {
        self.latency.timeout_deadline()
    }

    /// Pushes the timeout deadline out by the configured timeout.
    pub fn reset_timeout(&mut self, now: f64) {
        self.latency.reset_timeout(now);
    }

    /// Translates a remote timestamp to the local clock.
    pub fn local_time(&self, remote: f64) -> f64 {
        self.latency.local_time(remote)
    }

    /// Translates a local timestamp to the remote peer's clock.
    pub fn remote_time(&self, local: f64) -> f64 {
        self.latency.remote_time(local)
    }

    fn publish(&self, record: IncomingMessage) {
        if self.delivery.send(record).is_err() {
            tracing::trace!("host receiver gone, discarding record");
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("remote_endpoint", &self.remote_endpoint)
            .field("status", &self.status)
            .finish()
    }
}
