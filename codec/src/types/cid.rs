//! Codec implementation for content identifiers.
//!
//! A content identifier is encoded as CBOR tag 42 wrapping a byte string that
//! holds the identity multibase prefix (`0x00`) followed by the identifier's
//! canonical binary form. Only the envelope is interpreted here; the binary
//! form itself is parsed by the `cid` crate.

use crate::{
    cbor::{self, Major},
    codec::{EncodeSize, Read, Write},
    error::Error,
};
use bytes::{Buf, BufMut};
use cid::Cid;

/// The IPLD content-identifier tag.
const TAG_CID: u64 = 42;

/// The identity multibase prefix carried inside the byte-string payload.
const MULTIBASE_IDENTITY: u8 = 0x00;

impl Write for Cid {
    fn write(&self, buf: &mut impl BufMut) {
        cbor::write_header(buf, Major::Tag, TAG_CID);
        cbor::write_header(buf, Major::ByteString, (self.encoded_len() + 1) as u64);
        buf.put_u8(MULTIBASE_IDENTITY);
        buf.put_slice(&self.to_bytes());
    }
}

impl EncodeSize for Cid {
    fn encode_size(&self) -> usize {
        let payload = self.encoded_len() + 1;
        cbor::header_size(TAG_CID) + cbor::header_size(payload as u64) + payload
    }
}

impl Read for Cid {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let tag = cbor::expect_header(buf, Major::Tag)?;
        if tag != TAG_CID {
            return Err(Error::InvalidData(
                "cid",
                format!("expected tag {TAG_CID}, found {tag}"),
            ));
        }
        let payload = cbor::read_bytes(buf, cbor::MAX_BYTES)?;
        let Some((&prefix, rest)) = payload.split_first() else {
            return Err(Error::InvalidData("cid", "empty payload".into()));
        };
        if prefix != MULTIBASE_IDENTITY {
            return Err(Error::InvalidData(
                "cid",
                format!("invalid multibase prefix: {prefix:#04x}"),
            ));
        }
        Cid::try_from(rest).map_err(|err| Error::InvalidData("cid", err.to_string()))
    }
}
