//! Codec implementation for chain addresses.
//!
//! An address is a protocol byte followed by a protocol-specific payload,
//! carried on the wire as a CBOR byte string. The payload is kept opaque
//! except for ID addresses, whose payload is a LEB128-encoded actor ID.

use crate::{
    cbor,
    codec::{EncodeSize, Read, Write},
    error::Error,
    varint,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Maximum length of an encoded address.
pub const MAX_ADDRESS_LEN: u64 = 64;

/// Protocol byte for ID addresses.
const PROTOCOL_ID: u8 = 0;

/// A chain address: one protocol byte plus its payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(Bytes);

impl Address {
    /// Builds an ID address for the given actor ID.
    pub fn new_id(id: u64) -> Self {
        let mut bytes = BytesMut::with_capacity(1 + varint::size(id));
        bytes.put_u8(PROTOCOL_ID);
        varint::write(id, &mut bytes);
        Self(bytes.freeze())
    }

    /// Wraps raw address bytes, validating only the envelope (non-empty,
    /// within the length cap).
    pub fn from_bytes(bytes: Bytes) -> Result<Self, Error> {
        if bytes.is_empty() {
            return Err(Error::InvalidData("address", "empty".into()));
        }
        if bytes.len() as u64 > MAX_ADDRESS_LEN {
            return Err(Error::LengthExceeded(bytes.len() as u64, MAX_ADDRESS_LEN));
        }
        Ok(Self(bytes))
    }

    /// Returns the protocol byte.
    pub fn protocol(&self) -> u8 {
        self.0[0]
    }

    /// Returns the protocol-specific payload.
    pub fn payload(&self) -> &[u8] {
        &self.0[1..]
    }

    /// Returns the actor ID if this is a well-formed ID address.
    pub fn id(&self) -> Option<u64> {
        if self.protocol() != PROTOCOL_ID {
            return None;
        }
        let mut payload = self.payload();
        let id = varint::read(&mut payload).ok()?;
        if !payload.is_empty() {
            return None;
        }
        Some(id)
    }

    /// Returns the raw encoded bytes (protocol byte plus payload).
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Write for Address {
    fn write(&self, buf: &mut impl BufMut) {
        cbor::write_bytes(buf, &self.0);
    }
}

impl EncodeSize for Address {
    fn encode_size(&self) -> usize {
        cbor::bytes_size(self.0.len())
    }
}

impl Read for Address {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        let bytes = cbor::read_bytes(buf, MAX_ADDRESS_LEN)?;
        Self::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DecodeExt, Encode};

    #[test]
    fn test_id_address() {
        let address = Address::new_id(888);
        assert_eq!(address.as_bytes(), &[0x00, 0xf8, 0x06]);
        assert_eq!(address.protocol(), PROTOCOL_ID);
        assert_eq!(address.id(), Some(888));
    }

    #[test]
    fn test_address_roundtrip() {
        for address in [Address::new_id(0), Address::new_id(1000), Address::new_id(u64::MAX)] {
            let encoded = address.encode();
            assert_eq!(encoded.len(), address.encode_size());
            let decoded = Address::decode(encoded).unwrap();
            assert_eq!(address, decoded);
        }
    }

    #[test]
    fn test_address_empty() {
        // A zero-length byte string is not a valid address.
        let encoded = [0x40u8];
        assert!(matches!(
            Address::decode(&encoded[..]),
            Err(Error::InvalidData("address", _))
        ));
    }

    #[test]
    fn test_address_too_long() {
        let mut buf = Vec::new();
        cbor::write_bytes(&mut buf, &[0u8; 65]);
        assert!(matches!(
            Address::decode(&buf[..]),
            Err(Error::LengthExceeded(65, MAX_ADDRESS_LEN))
        ));
    }

    #[test]
    fn test_non_id_payload() {
        let address = Address::from_bytes(Bytes::from_static(&[0x01, 0xaa, 0xbb])).unwrap();
        assert_eq!(address.protocol(), 1);
        assert_eq!(address.payload(), &[0xaa, 0xbb]);
        assert_eq!(address.id(), None);
    }
}
