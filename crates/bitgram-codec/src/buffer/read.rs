//! Read operations.
//!
//! Throwing forms fail with `ReadOverflow` when fewer bits remain than the
//! value requires and leave the buffer untouched. Try forms are thin
//! wrappers returning `Option`, advancing only on success.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use byteorder::{ByteOrder, LittleEndian};

use bitgram_core::{
    constants::{MAX_VARINT32_BYTES, MAX_VARINT64_BYTES},
    error::{ErrorKind, Result},
};

use crate::bit_io;

use super::MessageBuffer;

impl MessageBuffer {
    pub(crate) fn read_bits32(&mut self, bits: u32) -> Result<u32> {
        self.ensure_readable(bits as usize)?;
        let value = bit_io::read_u32(&self.data, bits, self.read_position);
        self.read_position += bits as usize;
        Ok(value)
    }

    pub(crate) fn read_bits64(&mut self, bits: u32) -> Result<u64> {
        self.ensure_readable(bits as usize)?;
        let value = bit_io::read_u64(&self.data, bits, self.read_position);
        self.read_position += bits as usize;
        Ok(value)
    }

    /// Reads a single bit.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_bits32(1)? != 0)
    }

    /// Reads 8 bits.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bits32(8)? as u8)
    }

    /// Reads 8 bits, two's complement.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Reads 16 bits, little-endian.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure_readable(16)?;
        if self.read_position & 7 == 0 {
            let start = self.read_position >> 3;
            let value = LittleEndian::read_u16(&self.data[start..start + 2]);
            self.read_position += 16;
            Ok(value)
        } else {
            Ok(self.read_bits32(16)? as u16)
        }
    }

    /// Reads 16 bits, two's complement little-endian.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Reads 32 bits, little-endian.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure_readable(32)?;
        if self.read_position & 7 == 0 {
            let start = self.read_position >> 3;
            let value = LittleEndian::read_u32(&self.data[start..start + 4]);
            self.read_position += 32;
            Ok(value)
        } else {
            self.read_bits32(32)
        }
    }

    /// Reads 32 bits, two's complement little-endian.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Reads 64 bits: two little-endian 32-bit halves, low half first.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure_readable(64)?;
        if self.read_position & 7 == 0 {
            let start = self.read_position >> 3;
            let value = LittleEndian::read_u64(&self.data[start..start + 8]);
            self.read_position += 64;
            Ok(value)
        } else {
            self.read_bits64(64)
        }
    }

    /// Reads 64 bits, two's complement.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    /// Reads `bits` (1..=32) as an unsigned value.
    pub fn read_u32_bits(&mut self, bits: u32) -> Result<u32> {
        assert!((1..=32).contains(&bits), "read_u32_bits supports 1..=32 bits, got {bits}");
        self.read_bits32(bits)
    }

    /// Reads `bits` (1..=32) as a two's-complement value, sign-extending
    /// from bit `bits - 1`. A 32-bit read is the raw pattern reinterpreted.
    pub fn read_i32_bits(&mut self, bits: u32) -> Result<i32> {
        assert!((1..=32).contains(&bits), "read_i32_bits supports 1..=32 bits, got {bits}");
        let raw = self.read_bits32(bits)?;
        if bits == 32 {
            return Ok(raw as i32);
        }
        let sign_bit = 1u32 << (bits - 1);
        if raw & sign_bit != 0 {
            Ok((raw | !((sign_bit << 1) - 1)) as i32)
        } else {
            Ok(raw as i32)
        }
    }

    /// Reads `bits` (1..=64) as an unsigned value.
    pub fn read_u64_bits(&mut self, bits: u32) -> Result<u64> {
        assert!((1..=64).contains(&bits), "read_u64_bits supports 1..=64 bits, got {bits}");
        self.read_bits64(bits)
    }

    /// Reads a 32-bit IEEE 754 pattern.
    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure_readable(32)?;
        if self.read_position & 7 == 0 {
            let start = self.read_position >> 3;
            let value = LittleEndian::read_f32(&self.data[start..start + 4]);
            self.read_position += 32;
            Ok(value)
        } else {
            let mut scratch = self.take_scratch(4);
            bit_io::read_bytes(&self.data, self.read_position, &mut scratch[..4]);
            self.read_position += 32;
            let value = LittleEndian::read_f32(&scratch);
            self.return_scratch(scratch);
            Ok(value)
        }
    }

    /// Reads a 64-bit IEEE 754 pattern.
    pub fn read_f64(&mut self) -> Result<f64> {
        self.ensure_readable(64)?;
        if self.read_position & 7 == 0 {
            let start = self.read_position >> 3;
            let value = LittleEndian::read_f64(&self.data[start..start + 8]);
            self.read_position += 64;
            Ok(value)
        } else {
            let mut scratch = self.take_scratch(8);
            bit_io::read_bytes(&self.data, self.read_position, &mut scratch[..8]);
            self.read_position += 64;
            let value = LittleEndian::read_f64(&scratch);
            self.return_scratch(scratch);
            Ok(value)
        }
    }

    /// Reads a varint of at most 5 bytes.
    pub fn read_var_u32(&mut self) -> Result<u32> {
        let start = self.read_position;
        let mut result = 0u32;
        let mut shift = 0u32;
        for _ in 0..MAX_VARINT32_BYTES {
            let byte = match self.read_u8() {
                Ok(byte) => byte,
                Err(error) => {
                    self.read_position = start;
                    return Err(error);
                }
            };
            result |= ((byte & 0x7f) as u32) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
        self.read_position = start;
        tracing::warn!(max_bytes = MAX_VARINT32_BYTES, "unterminated 32-bit varint");
        Err(ErrorKind::MalformedVarint { max_bytes: MAX_VARINT32_BYTES })
    }

    /// Reads a varint of at most 10 bytes.
    pub fn read_var_u64(&mut self) -> Result<u64> {
        let start = self.read_position;
        let mut result = 0u64;
        let mut shift = 0u32;
        for _ in 0..MAX_VARINT64_BYTES {
            let byte = match self.read_u8() {
                Ok(byte) => byte,
                Err(error) => {
                    self.read_position = start;
                    return Err(error);
                }
            };
            result |= ((byte & 0x7f) as u64) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
        self.read_position = start;
        tracing::warn!(max_bytes = MAX_VARINT64_BYTES, "unterminated 64-bit varint");
        Err(ErrorKind::MalformedVarint { max_bytes: MAX_VARINT64_BYTES })
    }

    /// Reads a zig-zag mapped varint.
    pub fn read_var_i32(&mut self) -> Result<i32> {
        let encoded = self.read_var_u32()?;
        Ok(((encoded >> 1) as i32) ^ -((encoded & 1) as i32))
    }

    /// Reads a zig-zag mapped varint.
    pub fn read_var_i64(&mut self) -> Result<i64> {
        let encoded = self.read_var_u64()?;
        Ok(((encoded >> 1) as i64) ^ -((encoded & 1) as i64))
    }

    /// Reads a varint byte length followed by that many UTF-8 bytes.
    /// Invalid UTF-8 decodes lossily; the length, not the text, is the wire
    /// contract.
    ///
    /// A well-formed length that exceeds the remaining buffer is hostile
    /// input: release builds consume the remainder and return an empty
    /// string, debug builds fail with `ReadOverflow`.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.read_position;
        let byte_len = self.read_var_u32()? as usize;
        if byte_len == 0 {
            return Ok(String::new());
        }

        let needed_bits = byte_len as u64 * 8;
        if (self.remaining_bits() as u64) < needed_bits {
            if cfg!(debug_assertions) {
                let available = self.remaining_bits();
                self.read_position = start;
                return Err(ErrorKind::ReadOverflow { needed: needed_bits as usize, available });
            }
            tracing::warn!(bytes = byte_len, "string length exceeds remaining buffer, consuming it");
            self.read_position = self.bit_length;
            return Ok(String::new());
        }
        let needed_bits = needed_bits as usize;

        if self.read_position & 7 == 0 {
            let offset = self.read_position >> 3;
            let text = String::from_utf8_lossy(&self.data[offset..offset + byte_len]).into_owned();
            self.read_position += needed_bits;
            Ok(text)
        } else {
            let mut scratch = self.take_scratch(byte_len);
            bit_io::read_bytes(&self.data, self.read_position, &mut scratch[..byte_len]);
            self.read_position += needed_bits;
            let text = String::from_utf8_lossy(&scratch[..byte_len]).into_owned();
            self.return_scratch(scratch);
            Ok(text)
        }
    }

    /// Reads exactly `dst.len()` bytes.
    pub fn read_bytes_into(&mut self, dst: &mut [u8]) -> Result<()> {
        self.ensure_readable(dst.len() * 8)?;
        bit_io::read_bytes(&self.data, self.read_position, dst);
        self.read_position += dst.len() * 8;
        Ok(())
    }

    /// Reads exactly `count` bytes into a fresh vector.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; count];
        self.read_bytes_into(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads an endpoint written by [`write_endpoint`](Self::write_endpoint).
    pub fn read_endpoint(&mut self) -> Result<SocketAddr> {
        let start = self.read_position;
        let result = self.read_endpoint_inner();
        if result.is_err() {
            self.read_position = start;
        }
        result
    }

    fn read_endpoint_inner(&mut self) -> Result<SocketAddr> {
        let address_len = self.read_u8()?;
        let ip = match address_len {
            4 => {
                let mut octets = [0u8; 4];
                self.read_bytes_into(&mut octets)?;
                IpAddr::V4(Ipv4Addr::from(octets))
            }
            16 => {
                let mut octets = [0u8; 16];
                self.read_bytes_into(&mut octets)?;
                IpAddr::V6(Ipv6Addr::from(octets))
            }
            other => return Err(ErrorKind::InvalidAddressLength(other)),
        };
        let port = self.read_u16()?;
        Ok(SocketAddr::new(ip, port))
    }

    /// Reads a `bits`-bit code as a float in `(0, 1]`: `(code + 1) / 2^bits`.
    pub fn read_unit_f32(&mut self, bits: u32) -> Result<f32> {
        assert!((1..=32).contains(&bits), "read_unit_f32 supports 1..=32 bits, got {bits}");
        let encoded = self.read_bits32(bits)? as u64;
        Ok(((encoded + 1) as f32) / ((1u64 << bits) as f32))
    }

    /// Reads a `bits`-bit code as a float in `(-1, 1]`.
    pub fn read_signed_unit_f32(&mut self, bits: u32) -> Result<f32> {
        assert!((1..=32).contains(&bits), "read_signed_unit_f32 supports 1..=32 bits, got {bits}");
        let encoded = self.read_bits32(bits)? as u64;
        Ok((((encoded + 1) as f32) / ((1u64 << bits) as f32) - 0.5) * 2.0)
    }

    /// Reads a `bits`-bit code as a float in `[min, max]`.
    pub fn read_ranged_f32(&mut self, min: f32, max: f32, bits: u32) -> Result<f32> {
        assert!((1..=32).contains(&bits), "read_ranged_f32 supports 1..=32 bits, got {bits}");
        let encoded = self.read_bits32(bits)?;
        let max_encoded = ((1u64 << bits) - 1) as f32;
        Ok(min + (encoded as f32 / max_encoded) * (max - min))
    }

    /// Reads an integer written by [`write_ranged_i32`](Self::write_ranged_i32)
    /// with the same bounds.
    pub fn read_ranged_i32(&mut self, min: i32, max: i32) -> Result<i32> {
        assert!(min <= max, "inverted range [{min}, {max}]");
        let range = (max as i64 - min as i64) as u64;
        let bits = bit_io::bits_to_hold_u64(range);
        let offset = self.read_bits32(bits)?;
        Ok((min as i64 + offset as i64) as i32)
    }

    // ===== Try forms =====
    //
    // Each wraps the throwing form; failure leaves the read position and
    // buffer state unmodified.

    /// Try form of [`read_bool`](Self::read_bool).
    pub fn try_read_bool(&mut self) -> Option<bool> {
        self.read_bool().ok()
    }

    /// Try form of [`read_u8`](Self::read_u8).
    pub fn try_read_u8(&mut self) -> Option<u8> {
        self.read_u8().ok()
    }

    /// Try form of [`read_u16`](Self::read_u16).
    pub fn try_read_u16(&mut self) -> Option<u16> {
        self.read_u16().ok()
    }

    /// Try form of [`read_u32`](Self::read_u32).
    pub fn try_read_u32(&mut self) -> Option<u32> {
        self.read_u32().ok()
    }

    /// Try form of [`read_u64`](Self::read_u64).
    pub fn try_read_u64(&mut self) -> Option<u64> {
        self.read_u64().ok()
    }

    /// Try form of [`read_f32`](Self::read_f32).
    pub fn try_read_f32(&mut self) -> Option<f32> {
        self.read_f32().ok()
    }

    /// Try form of [`read_f64`](Self::read_f64).
    pub fn try_read_f64(&mut self) -> Option<f64> {
        self.read_f64().ok()
    }

    /// Try form of [`read_var_u32`](Self::read_var_u32).
    pub fn try_read_var_u32(&mut self) -> Option<u32> {
        self.read_var_u32().ok()
    }

    /// Try form of [`read_string`](Self::read_string).
    pub fn try_read_string(&mut self) -> Option<String> {
        self.read_string().ok()
    }

    /// Try form of [`read_bytes`](Self::read_bytes).
    pub fn try_read_bytes(&mut self, count: usize) -> Option<Vec<u8>> {
        self.read_bytes(count).ok()
    }
}
