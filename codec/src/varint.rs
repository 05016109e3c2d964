//! Variable-length integer encoding and decoding
//!
//! Implements unsigned LEB128 (the Protocol Buffers varint scheme), used for
//! the payload of ID addresses. Each byte carries:
//! - 7 bits of the value
//! - 1 "continuation" bit to indicate if more bytes follow

use crate::error::Error;
use bytes::{Buf, BufMut};

const DATA_BITS_PER_BYTE: usize = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// Encodes an unsigned 64-bit integer as a varint.
pub fn write(value: u64, buf: &mut impl BufMut) {
    let mut val = value;
    while val >= CONTINUATION_BIT_MASK as u64 {
        buf.put_u8(val as u8 | CONTINUATION_BIT_MASK);
        val >>= DATA_BITS_PER_BYTE;
    }
    buf.put_u8(val as u8);
}

/// Decodes an unsigned 64-bit integer from a varint.
///
/// Encodings that set bits beyond 64 fail with [Error::InvalidVarint].
pub fn read(buf: &mut impl Buf) -> Result<u64, Error> {
    let mut result: u64 = 0;
    let mut shift = 0;
    loop {
        if shift >= u64::BITS as usize {
            return Err(Error::InvalidVarint);
        }
        if !buf.has_remaining() {
            return Err(Error::EndOfBuffer);
        }
        let byte = buf.get_u8();
        let bits = (byte & DATA_BITS_MASK) as u64;

        // The tenth byte may only carry the single remaining bit.
        if shift == 63 && bits > 1 {
            return Err(Error::InvalidVarint);
        }
        result |= bits << shift;

        if byte & CONTINUATION_BIT_MASK == 0 {
            return Ok(result);
        }
        shift += DATA_BITS_PER_BYTE;
    }
}

/// Calculates the number of bytes needed to encode `value` as a varint.
pub fn size(value: u64) -> usize {
    let data_bits = (u64::BITS - value.leading_zeros()) as usize;
    usize::max(1, data_bits.div_ceil(DATA_BITS_PER_BYTE))
}
