use std::sync::Arc;

use bitgram_core::{byte_pool::ByteArrayPool, error::ErrorKind};

use super::MessageBuffer;

#[test]
fn test_mixed_primitives_round_trip() {
    let mut buffer = MessageBuffer::new();
    buffer.write_bool(true);
    buffer.write_bool(false);
    buffer.write_u8(0x5A);
    buffer.write_f32(1.0);
    assert_eq!(buffer.bit_length(), 42);

    assert!(buffer.read_bool().unwrap());
    assert!(!buffer.read_bool().unwrap());
    assert_eq!(buffer.read_u8().unwrap(), 0x5A);
    assert_eq!(buffer.read_f32().unwrap(), 1.0);
    assert_eq!(buffer.remaining_bits(), 0);
}

#[test]
fn test_string_at_bit_offset_three() {
    let mut buffer = MessageBuffer::new();
    buffer.write_pad_bits_count(3);
    buffer.write_string("héllo");

    buffer.skip_pad_bits(3).unwrap();
    assert_eq!(buffer.read_string().unwrap(), "héllo");
    // 3 pad bits + 1-byte varint length + 6 utf-8 bytes
    assert_eq!(buffer.read_position(), 3 + 8 + 48);
}

#[test]
fn test_five_bit_negative_three() {
    let mut buffer = MessageBuffer::new();
    buffer.write_i32_bits(-3, 5);
    assert_eq!(buffer.data()[0] & 0x1f, 0b11101);

    assert_eq!(buffer.read_i32_bits(5).unwrap(), -3);
}

#[test]
fn test_varint_300_wire_bytes() {
    let mut buffer = MessageBuffer::new();
    assert_eq!(buffer.write_var_u32(300), 2);
    assert_eq!(buffer.data(), &[0xAC, 0x02]);

    let mut reader = MessageBuffer::from_vec(vec![0xAC, 0x02]);
    assert_eq!(reader.read_var_u32().unwrap(), 300);
    assert_eq!(reader.read_position(), 16);
}

#[test]
fn test_primitives_round_trip_at_every_offset() {
    for offset in 0..8usize {
        let mut buffer = MessageBuffer::new();
        buffer.write_pad_bits_count(offset);
        buffer.write_u8(0xA7);
        buffer.write_u16(0xBEEF);
        buffer.write_u32(0xDEADBEEF);
        buffer.write_u64(0x0123_4567_89AB_CDEF);
        buffer.write_i8(-100);
        buffer.write_i16(-30000);
        buffer.write_i32(-2_000_000_000);
        buffer.write_i64(i64::MIN + 1);
        buffer.write_f32(-0.25);
        buffer.write_f64(1234.5678);

        buffer.skip_pad_bits(offset).unwrap();
        assert_eq!(buffer.read_u8().unwrap(), 0xA7, "offset={offset}");
        assert_eq!(buffer.read_u16().unwrap(), 0xBEEF);
        assert_eq!(buffer.read_u32().unwrap(), 0xDEADBEEF);
        assert_eq!(buffer.read_u64().unwrap(), 0x0123_4567_89AB_CDEF);
        assert_eq!(buffer.read_i8().unwrap(), -100);
        assert_eq!(buffer.read_i16().unwrap(), -30000);
        assert_eq!(buffer.read_i32().unwrap(), -2_000_000_000);
        assert_eq!(buffer.read_i64().unwrap(), i64::MIN + 1);
        assert_eq!(buffer.read_f32().unwrap(), -0.25);
        assert_eq!(buffer.read_f64().unwrap(), 1234.5678);
    }
}

#[test]
fn test_narrow_unsigned_round_trips() {
    for bits in 1..=32u32 {
        let max = if bits == 32 { u32::MAX } else { (1u64 << bits) as u32 - 1 };
        for value in [0u32, 1, max / 2, max] {
            let mut buffer = MessageBuffer::new();
            buffer.write_u32_bits(value, bits);
            assert_eq!(buffer.bit_length(), bits as usize);
            assert_eq!(buffer.read_u32_bits(bits).unwrap(), value, "bits={bits}");
        }
    }
}

#[test]
fn test_narrow_signed_round_trips() {
    for bits in 2..=32u32 {
        let min = (-(1i64 << (bits - 1))) as i32;
        let max = ((1i64 << (bits - 1)) - 1) as i32;
        for value in [min, -1, 0, 1, max] {
            let mut buffer = MessageBuffer::new();
            buffer.write_i32_bits(value, bits);
            assert_eq!(buffer.read_i32_bits(bits).unwrap(), value, "bits={bits} value={value}");
        }
    }
}

#[test]
fn test_full_width_signed_is_raw_pattern() {
    let mut buffer = MessageBuffer::new();
    buffer.write_i32_bits(i32::MIN, 32);
    assert_eq!(buffer.read_i32_bits(32).unwrap(), i32::MIN);
}

#[test]
fn test_narrow_u64_round_trips() {
    for bits in [1u32, 16, 32, 33, 40, 63, 64] {
        let max = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
        for value in [0u64, 1, max / 7, max] {
            let mut buffer = MessageBuffer::new();
            buffer.write_pad_bits_count(5);
            buffer.write_u64_bits(value, bits);
            buffer.skip_pad_bits(5).unwrap();
            assert_eq!(buffer.read_u64_bits(bits).unwrap(), value, "bits={bits}");
        }
    }
}

#[test]
fn test_string_round_trips_at_offsets() {
    for offset in 0..8usize {
        for text in ["", "a", "hello world", "ünïcödé ☃", "longer text with several words in it"] {
            let mut buffer = MessageBuffer::new();
            buffer.write_pad_bits_count(offset);
            buffer.write_string(text);
            buffer.skip_pad_bits(offset).unwrap();
            assert_eq!(buffer.read_string().unwrap(), text, "offset={offset}");
        }
    }
}

#[test]
fn test_signed_varints_are_compact() {
    for value in [0i32, -1, 1, -2, 2] {
        let mut buffer = MessageBuffer::new();
        assert_eq!(buffer.write_var_i32(value), 1, "value={value}");
        assert_eq!(buffer.read_var_i32().unwrap(), value);
    }
}

#[test]
fn test_varint_round_trips_at_boundaries() {
    for value in [0u64, 127, 128, 16383, 16384, u32::MAX as u64, 1u64 << 32, u64::MAX] {
        let mut buffer = MessageBuffer::new();
        buffer.write_var_u64(value);
        assert_eq!(buffer.read_var_u64().unwrap(), value, "value={value}");
    }
    for value in [i64::MIN, -300, -1, 0, 1, 300, i64::MAX] {
        let mut buffer = MessageBuffer::new();
        buffer.write_var_i64(value);
        assert_eq!(buffer.read_var_i64().unwrap(), value, "value={value}");
    }
}

#[test]
fn test_varint_max_length() {
    let mut buffer = MessageBuffer::new();
    assert_eq!(buffer.write_var_u32(u32::MAX), 5);
    assert_eq!(buffer.read_var_u32().unwrap(), u32::MAX);

    let mut buffer = MessageBuffer::new();
    assert_eq!(buffer.write_var_u64(u64::MAX), 10);
    assert_eq!(buffer.read_var_u64().unwrap(), u64::MAX);
}

#[test]
fn test_unterminated_varint_is_an_error() {
    let mut buffer = MessageBuffer::from_vec(vec![0x80; 5]);
    assert_eq!(
        buffer.read_var_u32(),
        Err(ErrorKind::MalformedVarint { max_bytes: 5 })
    );
    assert_eq!(buffer.read_position(), 0);
}

#[test]
fn test_read_pad_bits_is_idempotent() {
    let mut buffer = MessageBuffer::new();
    buffer.write_u8(0xFF);
    buffer.write_bool(true);
    buffer.write_pad_bits();

    buffer.skip_pad_bits(9).unwrap();
    buffer.read_pad_bits().unwrap();
    assert_eq!(buffer.read_position(), 16);
    buffer.read_pad_bits().unwrap();
    assert_eq!(buffer.read_position(), 16);
    assert_eq!(buffer.read_position() % 8, 0);
}

#[test]
fn test_overflow_leaves_state_untouched() {
    let mut buffer = MessageBuffer::new();
    buffer.write_u8(0xAB);

    assert_eq!(
        buffer.read_u32(),
        Err(ErrorKind::ReadOverflow { needed: 32, available: 8 })
    );
    assert_eq!(buffer.read_position(), 0);

    assert_eq!(buffer.try_read_u32(), None);
    assert_eq!(buffer.read_position(), 0);

    assert_eq!(buffer.try_read_u8(), Some(0xAB));
    assert_eq!(buffer.read_position(), 8);
}

#[test]
fn test_oversized_string_length_guard() {
    let mut buffer = MessageBuffer::new();
    buffer.write_var_u32(1000);
    buffer.write_u8(b'x');

    let result = buffer.read_string();
    if cfg!(debug_assertions) {
        assert!(matches!(result, Err(ErrorKind::ReadOverflow { .. })));
        assert_eq!(buffer.read_position(), 0);
    } else {
        assert_eq!(result.unwrap(), "");
        assert_eq!(buffer.read_position(), buffer.bit_length());
    }
}

#[test]
fn test_endpoint_round_trips() {
    let v4: std::net::SocketAddr = "192.168.1.7:27015".parse().unwrap();
    let v6: std::net::SocketAddr = "[2001:db8::42]:9000".parse().unwrap();

    for endpoint in [v4, v6] {
        for offset in [0usize, 5] {
            let mut buffer = MessageBuffer::new();
            buffer.write_pad_bits_count(offset);
            buffer.write_endpoint(&endpoint);
            buffer.skip_pad_bits(offset).unwrap();
            assert_eq!(buffer.read_endpoint().unwrap(), endpoint, "offset={offset}");
        }
    }
}

#[test]
fn test_endpoint_bad_address_length() {
    let mut buffer = MessageBuffer::new();
    buffer.write_u8(7);
    buffer.write_u16(80);

    assert_eq!(buffer.read_endpoint(), Err(ErrorKind::InvalidAddressLength(7)));
    assert_eq!(buffer.read_position(), 0);
}

#[test]
fn test_unit_float_quantization_quirk() {
    // The decoder adds one to the code: zero is unrepresentable and the top
    // code decodes to exactly 1.0.
    let mut buffer = MessageBuffer::new();
    buffer.write_u32_bits(0xFF, 8);
    buffer.write_u32_bits(0, 8);
    assert_eq!(buffer.read_unit_f32(8).unwrap(), 1.0);
    assert_eq!(buffer.read_unit_f32(8).unwrap(), 1.0 / 256.0);

    let mut buffer = MessageBuffer::new();
    buffer.write_unit_f32(0.0, 8);
    assert_eq!(buffer.read_unit_f32(8).unwrap(), 1.0 / 256.0);

    let mut buffer = MessageBuffer::new();
    buffer.write_unit_f32(1.0, 8);
    assert_eq!(buffer.read_unit_f32(8).unwrap(), 1.0);
}

#[test]
fn test_signed_unit_float_round_trip() {
    for value in [-1.0f32, -0.5, 0.0, 0.5, 1.0] {
        let mut buffer = MessageBuffer::new();
        buffer.write_signed_unit_f32(value, 16);
        let decoded = buffer.read_signed_unit_f32(16).unwrap();
        assert!((decoded - value).abs() < 1.0 / 16384.0, "value={value} decoded={decoded}");
    }
}

#[test]
fn test_ranged_float_round_trip() {
    for value in [-40.0f32, 0.0, 17.25, 120.0] {
        let mut buffer = MessageBuffer::new();
        buffer.write_ranged_f32(value, -40.0, 120.0, 12);
        let decoded = buffer.read_ranged_f32(-40.0, 120.0, 12).unwrap();
        assert!((decoded - value).abs() < 160.0 / 2048.0, "value={value} decoded={decoded}");
    }
}

#[test]
fn test_ranged_integer_round_trip() {
    let cases = [
        (0i32, 0i32, 100i32, 7u32),
        (100, 0, 100, 7),
        (-3, -3, 4, 3),
        (0, -1000, 1000, 11),
        (i32::MIN, i32::MIN, i32::MAX, 32),
        (i32::MAX, i32::MIN, i32::MAX, 32),
    ];
    for (value, min, max, expected_bits) in cases {
        let mut buffer = MessageBuffer::new();
        let bits = buffer.write_ranged_i32(value, min, max);
        assert_eq!(bits, expected_bits, "range [{min}, {max}]");
        assert_eq!(buffer.bit_length(), bits as usize);
        assert_eq!(buffer.read_ranged_i32(min, max).unwrap(), value);
    }
}

#[test]
fn test_bit_path_matches_fast_path() {
    let mut fast = MessageBuffer::new();
    fast.write_u32(0xCAFEBABE);
    fast.write_u64(0x1122_3344_5566_7788);
    fast.write_f32(std::f32::consts::PI);

    let mut slow = MessageBuffer::new();
    slow.write_u32_bits(0xCAFEBABE, 32);
    slow.write_u64_bits(0x1122_3344_5566_7788, 64);
    slow.write_u32_bits(std::f32::consts::PI.to_bits(), 32);

    assert_eq!(fast.data(), slow.data());
}

#[test]
fn test_u64_is_two_little_endian_halves() {
    let mut buffer = MessageBuffer::new();
    buffer.write_u64(0xAABB_CCDD_1122_3344);
    assert_eq!(buffer.read_u32().unwrap(), 0x1122_3344);
    assert_eq!(buffer.read_u32().unwrap(), 0xAABB_CCDD);
}

#[test]
fn test_growth_preserves_written_data() {
    let mut buffer = MessageBuffer::with_capacity(1);
    for i in 0..512u32 {
        buffer.write_u32(i);
    }
    for i in 0..512u32 {
        assert_eq!(buffer.read_u32().unwrap(), i);
    }
}

#[test]
fn test_straddling_write_keeps_trailing_bits_zero() {
    let mut buffer = MessageBuffer::new();
    buffer.write_bool(true);
    buffer.write_pad_bits();
    assert_eq!(buffer.data(), &[0x01]);
}

#[test]
fn test_byte_slices_round_trip_without_prefix() {
    let payload = [0xDE, 0xAD, 0xBE, 0xEF, 0x01];
    let mut buffer = MessageBuffer::new();
    buffer.write_pad_bits_count(2);
    buffer.write_bytes(&payload);

    buffer.skip_pad_bits(2).unwrap();
    assert_eq!(buffer.read_bytes(payload.len()).unwrap(), payload);
}

#[test]
fn test_unaligned_float_read_uses_pool() {
    let pool = Arc::new(ByteArrayPool::new());
    let mut buffer = MessageBuffer::new();
    buffer.attach_pool(pool.clone());
    buffer.write_pad_bits_count(3);
    buffer.write_f32(2.5);
    buffer.write_f64(-7.125);

    buffer.skip_pad_bits(3).unwrap();
    assert_eq!(buffer.read_f32().unwrap(), 2.5);
    assert_eq!(buffer.read_f64().unwrap(), -7.125);

    // Scratch arrays went back to the pool.
    assert_eq!(pool.available(4), 1);
    assert_eq!(pool.available(8), 1);
}

#[test]
fn test_from_vec_wraps_all_bytes() {
    let buffer = MessageBuffer::from_vec(vec![1, 2, 3]);
    assert_eq!(buffer.bit_length(), 24);
    assert_eq!(buffer.remaining_bits(), 24);
}

#[test]
fn test_into_payload_trims_to_meaningful_bytes() {
    let mut buffer = MessageBuffer::with_capacity(64);
    buffer.write_u16(0x0102);
    buffer.write_bool(true);
    assert_eq!(buffer.into_payload(), vec![0x02, 0x01, 0x01]);
}
