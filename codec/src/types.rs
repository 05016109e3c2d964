//! Codec implementations for parameter types and their building blocks.

use crate::{
    cbor,
    codec::{EncodeSize, Read, Write},
    error::Error,
};
use bytes::{Buf, BufMut};

pub mod address;
pub mod cid;
pub mod params;

// An absent value encodes as the CBOR null sentinel; a present value encodes
// as the value itself. This mirrors the nil-receiver convention of the actor
// parameter ecosystem.
impl<T: Write> Write for Option<T> {
    fn write(&self, buf: &mut impl BufMut) {
        match self {
            Some(value) => value.write(buf),
            None => buf.put_u8(cbor::NULL),
        }
    }
}

impl<T: EncodeSize> EncodeSize for Option<T> {
    fn encode_size(&self) -> usize {
        match self {
            Some(value) => value.encode_size(),
            None => 1,
        }
    }
}

impl<T: Read> Read for Option<T> {
    type Cfg = T::Cfg;

    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        if !buf.has_remaining() {
            return Err(Error::EndOfBuffer);
        }
        // `chunk()` is non-empty whenever bytes remain.
        if buf.chunk()[0] == cbor::NULL {
            buf.advance(1);
            return Ok(None);
        }
        Ok(Some(T::read_cfg(buf, cfg)?))
    }
}
