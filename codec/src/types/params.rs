//! Actor call parameter records.
//!
//! Two record shapes are defined:
//! - [CidParams]: a map-keyed record with a single `"cid"` field. Map-keyed
//!   records name their fields on the wire, so decoders skip entries they do
//!   not recognize and the shape can grow without breaking old readers.
//! - [CreateMinerParams]: a tuple-keyed record (a fixed-arity array), the
//!   compact convention used by the built-in power actor for miner creation.

use crate::{
    cbor::{self, Major},
    codec::{Encode, EncodeSize, Read, ReadExt, Write},
    error::Error,
};
use bytes::{Buf, BufMut, Bytes};
use cid::Cid;

use super::address::Address;

/// Registered window PoSt proof types accepted by miner creation.
pub mod proof {
    pub const STACKED_DRG_WINDOW_2KIB_V1: i64 = 5;
    pub const STACKED_DRG_WINDOW_8MIB_V1: i64 = 6;
    pub const STACKED_DRG_WINDOW_512MIB_V1: i64 = 7;
    pub const STACKED_DRG_WINDOW_32GIB_V1: i64 = 8;
    pub const STACKED_DRG_WINDOW_64GIB_V1: i64 = 9;
}

/// Serializes any encodable value into canonical parameter bytes, ready for
/// submission as an actor call payload.
pub fn serialize_params<T: Encode>(params: &T) -> Bytes {
    params.encode().freeze()
}

/// Wraps a delegated decode failure with the name of the failing field,
/// keeping truncation distinguishable from malformed data.
fn field_err(field: &'static str, err: Error) -> Error {
    match err {
        Error::EndOfBuffer => Error::EndOfBuffer,
        err => Error::InvalidData(field, err.to_string()),
    }
}

/// The wire key of the [CidParams] field.
const FIELD_CID: &str = "cid";

// The field name must respect the convention's length limit. Statically true
// for "cid"; this trips at compile time if the constant ever shrinks.
const _: () = assert!(FIELD_CID.len() as u64 <= cbor::MAX_LENGTH);

/// A single-field record carrying a content identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CidParams {
    pub cid: Cid,
}

impl CidParams {
    pub fn new(cid: Cid) -> Self {
        Self { cid }
    }
}

impl Write for CidParams {
    fn write(&self, buf: &mut impl BufMut) {
        cbor::write_header(buf, Major::Map, 1);
        cbor::write_text(buf, FIELD_CID);
        self.cid.write(buf);
    }
}

impl EncodeSize for CidParams {
    fn encode_size(&self) -> usize {
        cbor::header_size(1) + cbor::text_size(FIELD_CID.len()) + self.cid.encode_size()
    }
}

impl Read for CidParams {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let entries = cbor::expect_header(buf, Major::Map)?;
        if entries > cbor::MAX_LENGTH {
            return Err(Error::LengthExceeded(entries, cbor::MAX_LENGTH));
        }

        let mut cid = None;
        for _ in 0..entries {
            let key = cbor::read_text(buf, cbor::MAX_LENGTH)?;
            match key.as_str() {
                FIELD_CID => {
                    cid = Some(Cid::read(buf).map_err(|err| field_err(FIELD_CID, err))?);
                }
                // Field doesn't exist on this type; consume and ignore it.
                _ => cbor::skip_value(buf)?,
            }
        }

        let cid = cid.ok_or_else(|| Error::InvalidData(FIELD_CID, "missing field".into()))?;
        Ok(Self { cid })
    }
}

/// Number of fields in the tuple encoding of [CreateMinerParams].
const CREATE_MINER_FIELDS: u64 = 5;

/// Parameters of the power actor's miner-creation call, tuple-encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateMinerParams {
    pub owner: Address,
    pub worker: Address,
    pub window_post_proof_type: i64,
    pub peer: Bytes,
    pub multiaddrs: Vec<Bytes>,
}

impl Write for CreateMinerParams {
    fn write(&self, buf: &mut impl BufMut) {
        cbor::write_header(buf, Major::Array, CREATE_MINER_FIELDS);
        self.owner.write(buf);
        self.worker.write(buf);
        cbor::write_int(buf, self.window_post_proof_type);
        cbor::write_bytes(buf, &self.peer);
        cbor::write_header(buf, Major::Array, self.multiaddrs.len() as u64);
        for multiaddr in &self.multiaddrs {
            cbor::write_bytes(buf, multiaddr);
        }
    }
}

impl EncodeSize for CreateMinerParams {
    fn encode_size(&self) -> usize {
        cbor::header_size(CREATE_MINER_FIELDS)
            + self.owner.encode_size()
            + self.worker.encode_size()
            + cbor::int_size(self.window_post_proof_type)
            + cbor::bytes_size(self.peer.len())
            + cbor::header_size(self.multiaddrs.len() as u64)
            + self
                .multiaddrs
                .iter()
                .map(|multiaddr| cbor::bytes_size(multiaddr.len()))
                .sum::<usize>()
    }
}

impl Read for CreateMinerParams {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let fields = cbor::expect_header(buf, Major::Array)?;
        if fields != CREATE_MINER_FIELDS {
            return Err(Error::UnexpectedLength(fields, CREATE_MINER_FIELDS));
        }

        let owner = Address::read(buf)?;
        let worker = Address::read(buf)?;
        let window_post_proof_type = cbor::read_int(buf)?;
        let peer = cbor::read_bytes(buf, cbor::MAX_BYTES)?;

        let count = cbor::expect_header(buf, Major::Array)?;
        if count > cbor::MAX_LENGTH {
            return Err(Error::LengthExceeded(count, cbor::MAX_LENGTH));
        }
        let mut multiaddrs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            multiaddrs.push(cbor::read_bytes(buf, cbor::MAX_BYTES)?);
        }

        Ok(Self {
            owner,
            worker,
            window_post_proof_type,
            peer,
            multiaddrs,
        })
    }
}
