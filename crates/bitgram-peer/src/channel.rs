//! Send channel surface.
//!
//! The reliability machinery itself lives outside this crate; what a
//! connection owns is the enumerable set of its send channels, and the one
//! property the latency engine writes into them: the resend delay of every
//! reliable sender.

use crate::wire::{DeliveryMethod, WireType};

/// Resend delay assigned to reliable channels before the first round-trip
/// sample arrives, seconds.
const INITIAL_RESEND_DELAY: f32 = 0.235;

/// One outgoing send channel of a connection.
#[derive(Debug)]
pub struct SendChannel {
    wire_type: WireType,
    /// Retransmission interval; present only on reliable channels.
    resend_delay: Option<f32>,
}

impl SendChannel {
    /// Creates an unreliable, unsequenced channel.
    pub fn unreliable() -> Self {
        Self { wire_type: WireType::from_user(DeliveryMethod::Unreliable, 0), resend_delay: None }
    }

    /// Creates an unreliable channel that drops late arrivals.
    pub fn unreliable_sequenced(channel: u8) -> Self {
        Self {
            wire_type: WireType::from_user(DeliveryMethod::UnreliableSequenced, channel),
            resend_delay: None,
        }
    }

    /// Creates a reliable, unordered channel.
    pub fn reliable_unordered() -> Self {
        Self {
            wire_type: WireType::from_user(DeliveryMethod::ReliableUnordered, 0),
            resend_delay: Some(INITIAL_RESEND_DELAY),
        }
    }

    /// Creates a reliable channel that drops late arrivals.
    pub fn reliable_sequenced(channel: u8) -> Self {
        Self {
            wire_type: WireType::from_user(DeliveryMethod::ReliableSequenced, channel),
            resend_delay: Some(INITIAL_RESEND_DELAY),
        }
    }

    /// Creates a reliable, ordered channel.
    pub fn reliable_ordered(channel: u8) -> Self {
        Self {
            wire_type: WireType::from_user(DeliveryMethod::ReliableOrdered, channel),
            resend_delay: Some(INITIAL_RESEND_DELAY),
        }
    }

    /// Returns the channel's wire tag.
    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    /// Returns true for retransmitting channels.
    pub fn is_reliable(&self) -> bool {
        self.resend_delay.is_some()
    }

    /// Current retransmission interval, when the channel is reliable.
    pub fn resend_delay(&self) -> Option<f32> {
        self.resend_delay
    }

    /// Updates the retransmission interval. No-op on unreliable channels.
    pub fn set_resend_delay(&mut self, delay: f32) {
        if let Some(current) = &mut self.resend_delay {
            *current = delay;
        }
    }
}

/// The enumerable set of send channels attached to one connection.
#[derive(Debug, Default)]
pub struct ChannelSet {
    channels: Vec<SendChannel>,
}

impl ChannelSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self { channels: Vec::new() }
    }

    /// Creates the default configuration: one reliable ordered channel.
    pub fn default_channels() -> Self {
        Self { channels: vec![SendChannel::reliable_ordered(0)] }
    }

    /// Appends a channel.
    pub fn add(&mut self, channel: SendChannel) {
        self.channels.push(channel);
    }

    /// Returns the channel at `index`.
    pub fn get(&self, index: usize) -> Option<&SendChannel> {
        self.channels.get(index)
    }

    /// Number of channels in the set.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns true when the set has no channels.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Iterates over all channels.
    pub fn iter(&self) -> impl Iterator<Item = &SendChannel> {
        self.channels.iter()
    }

    /// Iterates mutably over all channels.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SendChannel> {
        self.channels.iter_mut()
    }

    /// Pushes a new resend delay into every reliable channel.
    pub fn update_resend_delays(&mut self, delay: f32) {
        for channel in &mut self.channels {
            channel.set_resend_delay(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_constructors() {
        assert!(!SendChannel::unreliable().is_reliable());
        assert!(!SendChannel::unreliable_sequenced(3).is_reliable());
        assert!(SendChannel::reliable_unordered().is_reliable());
        assert!(SendChannel::reliable_sequenced(1).is_reliable());
        assert!(SendChannel::reliable_ordered(0).is_reliable());
    }

    #[test]
    fn test_resend_delay_only_touches_reliable() {
        let mut set = ChannelSet::new();
        set.add(SendChannel::unreliable());
        set.add(SendChannel::reliable_ordered(0));
        set.add(SendChannel::reliable_unordered());

        set.update_resend_delays(0.5);

        assert_eq!(set.get(0).unwrap().resend_delay(), None);
        assert_eq!(set.get(1).unwrap().resend_delay(), Some(0.5));
        assert_eq!(set.get(2).unwrap().resend_delay(), Some(0.5));
    }

    #[test]
    fn test_default_channels() {
        let set = ChannelSet::default_channels();
        assert_eq!(set.len(), 1);
        let channel = set.get(0).unwrap();
        assert!(channel.is_reliable());
        assert_eq!(
            channel.wire_type().delivery_method(),
            Some(DeliveryMethod::ReliableOrdered)
        );
    }
}
