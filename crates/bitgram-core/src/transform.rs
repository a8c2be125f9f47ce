//! Opaque payload transforms.
//!
//! The transport treats encryption as a reversible byte-stream transform it
//! never looks inside. Implementations can also be used for logging or
//! packet inspection.

use std::net::SocketAddr;

/// Trait for transforming raw payloads at the wire boundary.
///
/// `outbound` runs after protocol encoding, immediately before a payload is
/// handed to the socket layer; `inbound` runs on raw received bytes before
/// any protocol processing.
pub trait PayloadTransform: Send {
    /// Transforms an outgoing payload in place.
    fn outbound(&mut self, addr: &SocketAddr, payload: &mut Vec<u8>);

    /// Reverses the transform on an inbound payload.
    ///
    /// Returns `false` to drop the payload (e.g. authentication failure).
    fn inbound(&mut self, addr: &SocketAddr, payload: &mut Vec<u8>) -> bool;
}

/// Pass-through transform used when no encryption is configured.
#[derive(Debug, Clone, Copy)]
pub struct IdentityTransform;

impl PayloadTransform for IdentityTransform {
    fn outbound(&mut self, _addr: &SocketAddr, _payload: &mut Vec<u8>) {}

    fn inbound(&mut self, _addr: &SocketAddr, _payload: &mut Vec<u8>) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;

    struct XorTransform(u8);

    impl PayloadTransform for XorTransform {
        fn outbound(&mut self, _addr: &SocketAddr, payload: &mut Vec<u8>) {
            for byte in payload.iter_mut() {
                *byte ^= self.0;
            }
        }

        fn inbound(&mut self, _addr: &SocketAddr, payload: &mut Vec<u8>) -> bool {
            for byte in payload.iter_mut() {
                *byte ^= self.0;
            }
            true
        }
    }

    fn addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080)
    }

    #[test]
    fn test_xor_transform_round_trips() {
        let mut transform = XorTransform(0x55);
        let mut payload = vec![0xAA, 0xBB, 0xCC];
        let original = payload.clone();

        transform.outbound(&addr(), &mut payload);
        assert_ne!(payload, original);

        assert!(transform.inbound(&addr(), &mut payload));
        assert_eq!(payload, original);
    }

    #[test]
    fn test_identity_transform_is_noop() {
        let mut transform = IdentityTransform;
        let mut payload = vec![1, 2, 3];
        transform.outbound(&addr(), &mut payload);
        assert!(transform.inbound(&addr(), &mut payload));
        assert_eq!(payload, vec![1, 2, 3]);
    }
}
