//! Error types for codec operations

use crate::cbor::Major;
use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("input should be of type {expected}, found {found}")]
    UnexpectedType { expected: Major, found: Major },
    #[error("unsupported header byte: {0:#04x}")]
    UnsupportedHeader(u8),
    #[error("text string is not valid utf-8")]
    InvalidUtf8,
    #[error("length exceeded: {0} > {1}")]
    LengthExceeded(u64, u64), // found, max
    #[error("nesting exceeds maximum depth: {0}")]
    DepthExceeded(usize),
    #[error("wrong number of fields: {0} != {1}")]
    UnexpectedLength(u64, u64), // found, expected
    #[error("invalid varint")]
    InvalidVarint,
    #[error("invalid data in {0}: {1}")]
    InvalidData(&'static str, String), // context, message
}
