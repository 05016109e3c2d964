//! Canonical CBOR primitives.
//!
//! Implements the definite-length, minimal-encoding subset of CBOR used for
//! actor call parameters. Indefinite-length items and reserved header bytes
//! are rejected outright. Every helper that reads a declared length enforces
//! an explicit limit so that untrusted input cannot force oversized
//! allocations or unbounded recursion.

use crate::{error::Error, util::at_least};
use bytes::{Buf, BufMut, Bytes};
use std::fmt;

/// Maximum declared entry count for arrays and maps, and maximum length of
/// text strings (such as field names).
pub const MAX_LENGTH: u64 = 8192;

/// Maximum length of a byte-string payload.
pub const MAX_BYTES: u64 = 2 << 20;

/// Maximum nesting depth accepted when structurally scanning a value.
///
/// The deepest real parameter payloads nest two levels; this bound exists to
/// cap stack use when skipping adversarial input.
pub const MAX_DEPTH: usize = 64;

/// The encoding of `null` (major type 7, additional information 22).
pub const NULL: u8 = 0xf6;

/// The eight CBOR major types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Major {
    UnsignedInt = 0,
    NegativeInt = 1,
    ByteString = 2,
    TextString = 3,
    Array = 4,
    Map = 5,
    Tag = 6,
    Simple = 7,
}

impl Major {
    fn from_byte(byte: u8) -> Self {
        match byte >> 5 {
            0 => Self::UnsignedInt,
            1 => Self::NegativeInt,
            2 => Self::ByteString,
            3 => Self::TextString,
            4 => Self::Array,
            5 => Self::Map,
            6 => Self::Tag,
            _ => Self::Simple,
        }
    }
}

impl fmt::Display for Major {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnsignedInt => "unsigned integer",
            Self::NegativeInt => "negative integer",
            Self::ByteString => "byte string",
            Self::TextString => "text string",
            Self::Array => "array",
            Self::Map => "map",
            Self::Tag => "tag",
            Self::Simple => "simple value",
        };
        f.write_str(name)
    }
}

/// Returns the number of bytes a header with argument `extra` occupies.
pub fn header_size(extra: u64) -> usize {
    if extra < 24 {
        1
    } else if extra <= u8::MAX as u64 {
        2
    } else if extra <= u16::MAX as u64 {
        3
    } else if extra <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Writes a header for `major` with argument `extra`, using the shortest form.
pub fn write_header(buf: &mut impl BufMut, major: Major, extra: u64) {
    let high = (major as u8) << 5;
    if extra < 24 {
        buf.put_u8(high | extra as u8);
    } else if extra <= u8::MAX as u64 {
        buf.put_u8(high | 24);
        buf.put_u8(extra as u8);
    } else if extra <= u16::MAX as u64 {
        buf.put_u8(high | 25);
        buf.put_u16(extra as u16);
    } else if extra <= u32::MAX as u64 {
        buf.put_u8(high | 26);
        buf.put_u32(extra as u32);
    } else {
        buf.put_u8(high | 27);
        buf.put_u64(extra);
    }
}

/// Reads one header, returning the major type and its argument.
///
/// Reserved additional-information values (28-30) and indefinite-length
/// markers (31) fail with [Error::UnsupportedHeader].
pub fn read_header(buf: &mut impl Buf) -> Result<(Major, u64), Error> {
    at_least(buf, 1)?;
    let byte = buf.get_u8();
    let major = Major::from_byte(byte);
    let extra = match byte & 0x1f {
        low @ 0..=23 => low as u64,
        24 => {
            at_least(buf, 1)?;
            buf.get_u8() as u64
        }
        25 => {
            at_least(buf, 2)?;
            buf.get_u16() as u64
        }
        26 => {
            at_least(buf, 4)?;
            buf.get_u32() as u64
        }
        27 => {
            at_least(buf, 8)?;
            buf.get_u64()
        }
        _ => return Err(Error::UnsupportedHeader(byte)),
    };
    Ok((major, extra))
}

/// Reads one header and requires it to be of type `expected`.
pub fn expect_header(buf: &mut impl Buf, expected: Major) -> Result<u64, Error> {
    let (major, extra) = read_header(buf)?;
    if major != expected {
        return Err(Error::UnexpectedType {
            expected,
            found: major,
        });
    }
    Ok(extra)
}

/// Returns the encoded length of `value` as an integer.
pub fn int_size(value: i64) -> usize {
    if value >= 0 {
        header_size(value as u64)
    } else {
        header_size((-(value + 1)) as u64)
    }
}

/// Writes a signed integer as major type 0 or 1.
pub fn write_int(buf: &mut impl BufMut, value: i64) {
    if value >= 0 {
        write_header(buf, Major::UnsignedInt, value as u64);
    } else {
        write_header(buf, Major::NegativeInt, (-(value + 1)) as u64);
    }
}

/// Reads a signed integer (major type 0 or 1), rejecting values outside `i64`.
pub fn read_int(buf: &mut impl Buf) -> Result<i64, Error> {
    let (major, extra) = read_header(buf)?;
    match major {
        Major::UnsignedInt => i64::try_from(extra)
            .map_err(|_| Error::InvalidData("int", format!("positive overflow: {extra}"))),
        Major::NegativeInt => {
            let magnitude = i64::try_from(extra)
                .map_err(|_| Error::InvalidData("int", format!("negative overflow: {extra}")))?;
            Ok(-1 - magnitude)
        }
        found => Err(Error::UnexpectedType {
            expected: Major::UnsignedInt,
            found,
        }),
    }
}

/// Returns the encoded length of a text string of `len` bytes.
pub fn text_size(len: usize) -> usize {
    header_size(len as u64) + len
}

/// Writes a text string.
pub fn write_text(buf: &mut impl BufMut, value: &str) {
    write_header(buf, Major::TextString, value.len() as u64);
    buf.put_slice(value.as_bytes());
}

/// Reads a text string of at most `max` bytes.
pub fn read_text(buf: &mut impl Buf, max: u64) -> Result<String, Error> {
    let len = expect_header(buf, Major::TextString)?;
    if len > max {
        return Err(Error::LengthExceeded(len, max));
    }
    let len = len as usize;
    at_least(buf, len)?;
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
}

/// Returns the encoded length of a byte string of `len` bytes.
pub fn bytes_size(len: usize) -> usize {
    header_size(len as u64) + len
}

/// Writes a byte string.
pub fn write_bytes(buf: &mut impl BufMut, value: &[u8]) {
    write_header(buf, Major::ByteString, value.len() as u64);
    buf.put_slice(value);
}

/// Reads a byte string of at most `max` bytes.
pub fn read_bytes(buf: &mut impl Buf, max: u64) -> Result<Bytes, Error> {
    let len = expect_header(buf, Major::ByteString)?;
    if len > max {
        return Err(Error::LengthExceeded(len, max));
    }
    let len = len as usize;
    at_least(buf, len)?;
    Ok(buf.copy_to_bytes(len))
}

/// Structurally consumes exactly one value without materializing it.
///
/// Used to discard unknown map entries while keeping the stream position
/// correct, which is what makes decoders tolerant of fields they do not know.
pub fn skip_value(buf: &mut impl Buf) -> Result<(), Error> {
    skip_inner(buf, 0)
}

fn skip_inner(buf: &mut impl Buf, depth: usize) -> Result<(), Error> {
    if depth >= MAX_DEPTH {
        return Err(Error::DepthExceeded(MAX_DEPTH));
    }
    let (major, extra) = read_header(buf)?;
    match major {
        // The argument is the value; nothing follows. For major type 7, any
        // follow bytes (simple value, float payload) were consumed as the
        // argument by `read_header`.
        Major::UnsignedInt | Major::NegativeInt | Major::Simple => {}
        Major::ByteString | Major::TextString => {
            if extra > MAX_BYTES {
                return Err(Error::LengthExceeded(extra, MAX_BYTES));
            }
            let len = extra as usize;
            at_least(buf, len)?;
            buf.advance(len);
        }
        Major::Array => {
            if extra > MAX_LENGTH {
                return Err(Error::LengthExceeded(extra, MAX_LENGTH));
            }
            for _ in 0..extra {
                skip_inner(buf, depth + 1)?;
            }
        }
        Major::Map => {
            if extra > MAX_LENGTH {
                return Err(Error::LengthExceeded(extra, MAX_LENGTH));
            }
            for _ in 0..extra {
                skip_inner(buf, depth + 1)?;
                skip_inner(buf, depth + 1)?;
            }
        }
        Major::Tag => skip_inner(buf, depth + 1)?,
    }
    Ok(())
}

/// Checks that `buf` holds exactly one well-formed value.
pub fn validate(buf: impl Buf) -> Result<(), Error> {
    let mut buf = buf;
    skip_value(&mut buf)?;
    let remaining = buf.remaining();
    if remaining > 0 {
        return Err(Error::ExtraData(remaining));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_header_forms() {
        let cases = [
            (0u64, vec![0x00]),
            (23, vec![0x17]),
            (24, vec![0x18, 0x18]),
            (0xff, vec![0x18, 0xff]),
            (0x100, vec![0x19, 0x01, 0x00]),
            (0xffff, vec![0x19, 0xff, 0xff]),
            (0x10000, vec![0x1a, 0x00, 0x01, 0x00, 0x00]),
            (
                u64::MAX,
                vec![0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
            ),
        ];
        for (extra, expected) in cases {
            let mut buf = Vec::new();
            write_header(&mut buf, Major::UnsignedInt, extra);
            assert_eq!(buf, expected);
            assert_eq!(buf.len(), header_size(extra));

            let mut read_buf = &buf[..];
            let (major, decoded) = read_header(&mut read_buf).unwrap();
            assert_eq!(major, Major::UnsignedInt);
            assert_eq!(decoded, extra);
            assert!(read_buf.is_empty());
        }
    }

    #[test]
    fn test_header_reserved() {
        for low in [28u8, 29, 30, 31] {
            let mut buf = Bytes::copy_from_slice(&[low]);
            assert!(matches!(
                read_header(&mut buf),
                Err(Error::UnsupportedHeader(_))
            ));
        }
    }

    #[test]
    fn test_header_truncated_argument() {
        // 0x19 declares a two-byte argument; only one byte follows.
        let mut buf = Bytes::from_static(&[0x19, 0x01]);
        assert!(matches!(read_header(&mut buf), Err(Error::EndOfBuffer)));
    }

    #[test]
    fn test_int_roundtrip() {
        for value in [0i64, 1, -1, 23, -24, 24, 255, -256, i64::MAX, i64::MIN] {
            let mut buf = Vec::new();
            write_int(&mut buf, value);
            assert_eq!(buf.len(), int_size(value));
            assert_eq!(read_int(&mut &buf[..]).unwrap(), value);
        }
    }

    #[test]
    fn test_int_known_encodings() {
        let mut buf = Vec::new();
        write_int(&mut buf, -1);
        assert_eq!(buf, vec![0x20]);

        buf.clear();
        write_int(&mut buf, -500);
        assert_eq!(buf, vec![0x39, 0x01, 0xf3]);
    }

    #[test]
    fn test_int_overflow() {
        // 2^63 as an unsigned integer does not fit in i64.
        let mut buf = Vec::new();
        write_header(&mut buf, Major::UnsignedInt, 1 << 63);
        assert!(matches!(
            read_int(&mut &buf[..]),
            Err(Error::InvalidData("int", _))
        ));
    }

    #[test]
    fn test_text_roundtrip() {
        let mut buf = Vec::new();
        write_text(&mut buf, "cid");
        assert_eq!(buf, vec![0x63, b'c', b'i', b'd']);
        assert_eq!(buf.len(), text_size(3));
        assert_eq!(read_text(&mut &buf[..], MAX_LENGTH).unwrap(), "cid");
    }

    #[test]
    fn test_text_too_long() {
        let mut buf = Vec::new();
        write_text(&mut buf, "hello");
        assert!(matches!(
            read_text(&mut &buf[..], 3),
            Err(Error::LengthExceeded(5, 3))
        ));
    }

    #[test]
    fn test_text_invalid_utf8() {
        let mut buf = Vec::new();
        write_header(&mut buf, Major::TextString, 2);
        buf.extend_from_slice(&[0xff, 0xfe]);
        assert!(matches!(
            read_text(&mut &buf[..], MAX_LENGTH),
            Err(Error::InvalidUtf8)
        ));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let mut buf = Vec::new();
        write_bytes(&mut buf, &[1, 2, 3]);
        assert_eq!(buf, vec![0x43, 1, 2, 3]);
        let decoded = read_bytes(&mut &buf[..], MAX_BYTES).unwrap();
        assert_eq!(&decoded[..], &[1, 2, 3]);
    }

    #[test]
    fn test_bytes_truncated() {
        let mut buf = Bytes::from_static(&[0x43, 1, 2]);
        assert!(matches!(
            read_bytes(&mut buf, MAX_BYTES),
            Err(Error::EndOfBuffer)
        ));
    }

    #[test]
    fn test_skip_nested() {
        // {"a": [1, {"b": h'0102'}], "c": 2(null)}
        let mut buf = Vec::new();
        write_header(&mut buf, Major::Map, 2);
        write_text(&mut buf, "a");
        write_header(&mut buf, Major::Array, 2);
        write_int(&mut buf, 1);
        write_header(&mut buf, Major::Map, 1);
        write_text(&mut buf, "b");
        write_bytes(&mut buf, &[1, 2]);
        write_text(&mut buf, "c");
        write_header(&mut buf, Major::Tag, 2);
        buf.push(NULL);

        let mut read_buf = &buf[..];
        skip_value(&mut read_buf).unwrap();
        assert!(read_buf.is_empty());
    }

    #[test]
    fn test_skip_simple_values() {
        // false, true, null, float64.
        for encoding in [
            vec![0xf4],
            vec![0xf5],
            vec![NULL],
            vec![0xfb, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0],
        ] {
            let mut read_buf = &encoding[..];
            skip_value(&mut read_buf).unwrap();
            assert!(read_buf.is_empty());
        }
    }

    #[test]
    fn test_skip_depth_bound() {
        // MAX_DEPTH nested single-element arrays around an integer.
        let mut buf = Vec::new();
        for _ in 0..MAX_DEPTH {
            write_header(&mut buf, Major::Array, 1);
        }
        write_int(&mut buf, 0);
        assert!(matches!(
            skip_value(&mut &buf[..]),
            Err(Error::DepthExceeded(MAX_DEPTH))
        ));

        // One level fewer is fine.
        let mut buf = Vec::new();
        for _ in 0..MAX_DEPTH - 1 {
            write_header(&mut buf, Major::Array, 1);
        }
        write_int(&mut buf, 0);
        assert!(skip_value(&mut &buf[..]).is_ok());
    }

    #[test]
    fn test_skip_oversized_count() {
        let mut buf = Vec::new();
        write_header(&mut buf, Major::Array, MAX_LENGTH + 1);
        assert!(matches!(
            skip_value(&mut &buf[..]),
            Err(Error::LengthExceeded(_, MAX_LENGTH))
        ));
    }

    #[test]
    fn test_validate() {
        let mut buf = Vec::new();
        write_header(&mut buf, Major::Map, 1);
        write_text(&mut buf, "k");
        write_int(&mut buf, 7);
        assert!(validate(&buf[..]).is_ok());

        // Trailing garbage.
        buf.push(0x00);
        assert!(matches!(validate(&buf[..]), Err(Error::ExtraData(1))));

        // Truncation.
        assert!(matches!(
            validate(&buf[..buf.len() - 2]),
            Err(Error::EndOfBuffer)
        ));
    }
}
