//! Incoming message records handed to the host application.

use std::{
    net::SocketAddr,
    ops::{Deref, DerefMut},
};

use bitgram_codec::MessageBuffer;
use bitgram_core::{byte_pool::ByteArrayPool, message_kind::IncomingKind};

use crate::{connection::ConnectionId, wire::WireType};

/// A received record: a [`MessageBuffer`] plus delivery metadata.
///
/// Created on the network side, handed to the host exactly once, then
/// recycled. The record dereferences to its buffer, so payloads are consumed
/// through the ordinary read operations.
pub struct IncomingMessage {
    buffer: MessageBuffer,
    kind: IncomingKind,
    sender_endpoint: Option<SocketAddr>,
    sender_connection: Option<ConnectionId>,
    sequence_number: u32,
    received_wire_type: WireType,
    is_fragment: bool,
    receive_time: f64,
    /// Remote timestamp translated to the local clock; NaN until cached.
    user_message_time: f64,
}

impl IncomingMessage {
    /// Creates a library record carrying an already-written buffer.
    pub fn new(kind: IncomingKind, buffer: MessageBuffer, receive_time: f64) -> Self {
        Self {
            buffer,
            kind,
            sender_endpoint: None,
            sender_connection: None,
            sequence_number: 0,
            received_wire_type: WireType::UNCONNECTED,
            is_fragment: false,
            receive_time,
            user_message_time: f64::NAN,
        }
    }

    /// Creates a data record from raw received payload bytes.
    pub fn from_wire(
        wire_type: WireType,
        sequence_number: u32,
        payload: Vec<u8>,
        receive_time: f64,
    ) -> Self {
        let mut message = Self::new(IncomingKind::Data, MessageBuffer::from_vec(payload), receive_time);
        message.received_wire_type = wire_type;
        message.sequence_number = sequence_number;
        message
    }

    /// Records the sending endpoint and connection handle.
    pub fn set_sender(&mut self, endpoint: SocketAddr, connection: Option<ConnectionId>) {
        self.sender_endpoint = Some(endpoint);
        self.sender_connection = connection;
    }

    /// Marks the record as one fragment of a larger message.
    pub fn set_fragment(&mut self, is_fragment: bool) {
        self.is_fragment = is_fragment;
    }

    /// What this record represents.
    pub fn kind(&self) -> IncomingKind {
        self.kind
    }

    /// Endpoint the payload arrived from, when known.
    pub fn sender_endpoint(&self) -> Option<SocketAddr> {
        self.sender_endpoint
    }

    /// Handle of the sending connection, when one exists.
    pub fn sender_connection(&self) -> Option<ConnectionId> {
        self.sender_connection
    }

    /// Sequence number from the outer framing.
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// Wire tag the payload arrived under.
    pub fn wire_type(&self) -> WireType {
        self.received_wire_type
    }

    /// Returns true when this record is one fragment of a larger message.
    pub fn is_fragment(&self) -> bool {
        self.is_fragment
    }

    /// Local receive time in seconds.
    pub fn receive_time(&self) -> f64 {
        self.receive_time
    }

    /// Cached sender timestamp on the local clock, once translated.
    pub fn user_message_time(&self) -> Option<f64> {
        if self.user_message_time.is_nan() {
            None
        } else {
            Some(self.user_message_time)
        }
    }

    /// Caches the sender timestamp translated to the local clock.
    pub fn set_user_message_time(&mut self, local_time: f64) {
        self.user_message_time = local_time;
    }

    /// Returns the record's storage to the owning peer's byte pool.
    pub fn recycle(self, pool: &ByteArrayPool) {
        pool.recycle(self.buffer.into_storage());
    }
}

impl Deref for IncomingMessage {
    type Target = MessageBuffer;

    fn deref(&self) -> &MessageBuffer {
        &self.buffer
    }
}

impl DerefMut for IncomingMessage {
    fn deref_mut(&mut self) -> &mut MessageBuffer {
        &mut self.buffer
    }
}

impl std::fmt::Debug for IncomingMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncomingMessage")
            .field("kind", &self.kind)
            .field("wire_type", &self.received_wire_type)
            .field("sequence_number", &self.sequence_number)
            .field("bit_length", &self.bit_length())
            .finish()
    }
}
