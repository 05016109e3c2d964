//! Encode and decode chain actor call parameters.
//!
//! # Overview
//!
//! A binary codec for the canonical CBOR convention used by actor call
//! parameters:
//! - Serialize parameter records into their canonical byte form
//! - Deserialize untrusted payload bytes back into structured records
//!
//! Map-keyed records ([CidParams]) name their fields on the wire and skip
//! unknown entries on decode, so the shape can grow without breaking old
//! readers. Tuple-keyed records ([CreateMinerParams]) are fixed-arity arrays.
//! Every decode path enforces explicit limits on declared lengths and nesting
//! depth, so malformed or adversarial input fails with a named error instead
//! of exhausting resources.
//!
//! # Example
//!
//! ```
//! use actor_params::{serialize_params, CidParams, DecodeExt};
//! use cid::{multihash::Multihash, Cid};
//!
//! // Build the parameter record for a content identifier.
//! let hash = Multihash::<64>::wrap(0x12, &[0u8; 32]).unwrap();
//! let params = CidParams::new(Cid::new_v1(0x71, hash));
//!
//! // Canonical bytes for submission as a call payload.
//! let bytes = serialize_params(&params);
//!
//! // Decoding reproduces the record.
//! let decoded = CidParams::decode(bytes).unwrap();
//! assert_eq!(params, decoded);
//! ```

pub mod cbor;
pub mod codec;
pub mod error;
pub mod types;
pub mod util;
pub mod varint;

// Re-export main types and traits
pub use codec::{Decode, DecodeExt, Encode, EncodeSize, Read, ReadExt, Write};
pub use error::Error;
pub use types::{
    address::Address,
    params::{proof, serialize_params, CidParams, CreateMinerParams},
};
