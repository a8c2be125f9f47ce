//! Write operations.
//!
//! Every write appends at `bit_length`, growing the backing storage as
//! needed. Multi-byte primitives take a direct byte-level path when the
//! write position is byte-aligned; the bit-level path produces identical
//! bytes.

use std::net::SocketAddr;

use byteorder::{ByteOrder, LittleEndian};

use crate::bit_io;

use super::MessageBuffer;

impl MessageBuffer {
    /// Writes a single bit.
    pub fn write_bool(&mut self, value: bool) {
        self.ensure_capacity_bits(self.bit_length + 1);
        bit_io::write_byte(&mut self.data, value as u8, 1, self.bit_length);
        self.bit_length += 1;
    }

    /// Writes 8 bits.
    pub fn write_u8(&mut self, value: u8) {
        self.ensure_capacity_bits(self.bit_length + 8);
        bit_io::write_byte(&mut self.data, value, 8, self.bit_length);
        self.bit_length += 8;
    }

    /// Writes 8 bits, two's complement.
    pub fn write_i8(&mut self, value: i8) {
        self.write_u8(value as u8);
    }

    /// Writes 16 bits, little-endian.
    pub fn write_u16(&mut self, value: u16) {
        self.ensure_capacity_bits(self.bit_length + 16);
        if self.bit_length & 7 == 0 {
            let start = self.bit_length >> 3;
            LittleEndian::write_u16(&mut self.data[start..start + 2], value);
        } else {
            bit_io::write_u32(&mut self.data, value as u32, 16, self.bit_length);
        }
        self.bit_length += 16;
    }

    /// Writes 16 bits, two's complement little-endian.
    pub fn write_i16(&mut self, value: i16) {
        self.write_u16(value as u16);
    }

    /// Writes 32 bits, little-endian.
    pub fn write_u32(&mut self, value: u32) {
        self.ensure_capacity_bits(self.bit_length + 32);
        if self.bit_length & 7 == 0 {
            let start = self.bit_length >> 3;
            LittleEndian::write_u32(&mut self.data[start..start + 4], value);
        } else {
            bit_io::write_u32(&mut self.data, value, 32, self.bit_length);
        }
        self.bit_length += 32;
    }

    /// Writes 32 bits, two's complement little-endian.
    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    /// Writes 64 bits as two little-endian 32-bit halves, low half first.
    pub fn write_u64(&mut self, value: u64) {
        self.ensure_capacity_bits(self.bit_length + 64);
        if self.bit_length & 7 == 0 {
            let start = self.bit_length >> 3;
            LittleEndian::write_u64(&mut self.data[start..start + 8], value);
        } else {
            bit_io::write_u64(&mut self.data, value, 64, self.bit_length);
        }
        self.bit_length += 64;
    }

    /// Writes 64 bits, two's complement.
    pub fn write_i64(&mut self, value: i64) {
        self.write_u64(value as u64);
    }

    /// Writes the low `bits` (1..=32) of `value`; excess bits are masked.
    pub fn write_u32_bits(&mut self, value: u32, bits: u32) {
        assert!((1..=32).contains(&bits), "write_u32_bits supports 1..=32 bits, got {bits}");
        self.ensure_capacity_bits(self.bit_length + bits as usize);
        bit_io::write_u32(&mut self.data, value, bits, self.bit_length);
        self.bit_length += bits as usize;
    }

    /// Writes `value` as an `bits`-wide two's-complement field (1..=32).
    /// The sign bit is bit `bits - 1`; the reader sign-extends.
    pub fn write_i32_bits(&mut self, value: i32, bits: u32) {
        assert!((1..=32).contains(&bits), "write_i32_bits supports 1..=32 bits, got {bits}");
        self.write_u32_bits(value as u32, bits);
    }

    /// Writes the low `bits` (1..=64) of `value`: the low 32 bits first,
    /// then the high remainder.
    pub fn write_u64_bits(&mut self, value: u64, bits: u32) {
        assert!((1..=64).contains(&bits), "write_u64_bits supports 1..=64 bits, got {bits}");
        self.ensure_capacity_bits(self.bit_length + bits as usize);
        bit_io::write_u64(&mut self.data, value, bits, self.bit_length);
        self.bit_length += bits as usize;
    }

    /// Writes the IEEE 754 bit pattern as 32 bits.
    pub fn write_f32(&mut self, value: f32) {
        self.ensure_capacity_bits(self.bit_length + 32);
        if self.bit_length & 7 == 0 {
            let start = self.bit_length >> 3;
            LittleEndian::write_f32(&mut self.data[start..start + 4], value);
        } else {
            bit_io::write_u32(&mut self.data, value.to_bits(), 32, self.bit_length);
        }
        self.bit_length += 32;
    }

    /// Writes the IEEE 754 bit pattern as 64 bits.
    pub fn write_f64(&mut self, value: f64) {
        self.ensure_capacity_bits(self.bit_length + 64);
        if self.bit_length & 7 == 0 {
            let start = self.bit_length >> 3;
            LittleEndian::write_f64(&mut self.data[start..start + 8], value);
        } else {
            bit_io::write_u64(&mut self.data, value.to_bits(), 64, self.bit_length);
        }
        self.bit_length += 64;
    }

    /// Writes `value` in 7-bit groups, LSB-first, high bit as continuation.
    /// Returns the number of bytes emitted (at most 5).
    pub fn write_var_u32(&mut self, value: u32) -> usize {
        let mut remaining = value;
        let mut written = 1;
        while remaining >= 0x80 {
            self.write_u8((remaining & 0x7f) as u8 | 0x80);
            remaining >>= 7;
            written += 1;
        }
        self.write_u8(remaining as u8);
        written
    }

    /// Writes `value` in 7-bit groups, LSB-first. Returns bytes emitted (at most 10).
    pub fn write_var_u64(&mut self, value: u64) -> usize {
        let mut remaining = value;
        let mut written = 1;
        while remaining >= 0x80 {
            self.write_u8((remaining & 0x7f) as u8 | 0x80);
            remaining >>= 7;
            written += 1;
        }
        self.write_u8(remaining as u8);
        written
    }

    /// Writes a zig-zag mapped varint, keeping small magnitudes small.
    pub fn write_var_i32(&mut self, value: i32) -> usize {
        self.write_var_u32(((value << 1) ^ (value >> 31)) as u32)
    }

    /// Writes a zig-zag mapped varint, keeping small magnitudes small.
    pub fn write_var_i64(&mut self, value: i64) -> usize {
        self.write_var_u64(((value << 1) ^ (value >> 63)) as u64)
    }

    /// Writes a varint byte length followed by the UTF-8 bytes.
    pub fn write_string(&mut self, value: &str) {
        let bytes = value.as_bytes();
        self.write_var_u32(bytes.len() as u32);
        self.write_bytes(bytes);
    }

    /// Writes raw bytes with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.ensure_capacity_bits(self.bit_length + bytes.len() * 8);
        bit_io::write_bytes(&mut self.data, bytes, self.bit_length);
        self.bit_length += bytes.len() * 8;
    }

    /// Writes an endpoint: address length byte (4 or 16), address bytes in
    /// network order, then the port as 16 bits little-endian.
    pub fn write_endpoint(&mut self, endpoint: &SocketAddr) {
        match endpoint {
            SocketAddr::V4(v4) => {
                self.write_u8(4);
                self.write_bytes(&v4.ip().octets());
            }
            SocketAddr::V6(v6) => {
                self.write_u8(16);
                self.write_bytes(&v6.ip().octets());
            }
        }
        self.write_u16(endpoint.port());
    }

    /// Quantizes a float in `[0, 1]` to `bits` bits.
    ///
    /// The decoder maps code `e` to `(e + 1) / 2^bits`, so zero is not
    /// representable; the asymmetry is part of the wire contract.
    pub fn write_unit_f32(&mut self, value: f32, bits: u32) {
        assert!((1..=32).contains(&bits), "write_unit_f32 supports 1..=32 bits, got {bits}");
        debug_assert!((0.0..=1.0).contains(&value), "unit float {value} out of [0, 1]");
        let max_encoded = ((1u64 << bits) - 1) as f32;
        self.write_u32_bits((value * max_encoded + 0.5) as u32, bits);
    }

    /// Quantizes a float in `[-1, 1]` to `bits` bits.
    pub fn write_signed_unit_f32(&mut self, value: f32, bits: u32) {
        assert!((1..=32).contains(&bits), "write_signed_unit_f32 supports 1..=32 bits, got {bits}");
        debug_assert!((-1.0..=1.0).contains(&value), "signed unit float {value} out of [-1, 1]");
        let unit = (value + 1.0) * 0.5;
        let max_encoded = ((1u64 << bits) - 1) as f32;
        self.write_u32_bits((unit * max_encoded + 0.5) as u32, bits);
    }

    /// Uniformly quantizes a float in `[min, max]` to `bits` bits.
    pub fn write_ranged_f32(&mut self, value: f32, min: f32, max: f32, bits: u32) {
        assert!((1..=32).contains(&bits), "write_ranged_f32 supports 1..=32 bits, got {bits}");
        let unit = ((value - min) / (max - min)).clamp(0.0, 1.0);
        let max_encoded = ((1u64 << bits) - 1) as f32;
        self.write_u32_bits((unit * max_encoded + 0.5) as u32, bits);
    }

    /// Writes `value - min` in just enough bits to hold `max - min`.
    /// Returns the number of bits used.
    pub fn write_ranged_i32(&mut self, value: i32, min: i32, max: i32) -> u32 {
        assert!(min <= max, "inverted range [{min}, {max}]");
        debug_assert!((min..=max).contains(&value), "{value} out of [{min}, {max}]");
        let range = (max as i64 - min as i64) as u64;
        let bits = bit_io::bits_to_hold_u64(range);
        self.write_u32_bits((value as i64 - min as i64) as u32, bits);
        bits
    }
}
