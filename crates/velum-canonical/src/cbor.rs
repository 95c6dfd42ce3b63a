//! Thin wrapper around the CBOR item codec.
//!
//! Velum treats the codec as an external collaborator: the only contract it
//! relies on is that the same value always encodes to identical bytes. The
//! value subset Velum emits (scalars, byte/text strings, arrays, tags) is
//! encoded deterministically by `serde_cbor`; maps are never produced, so
//! key ordering does not arise.

use thiserror::Error;

/// A decoded CBOR item.
pub type CborValue = serde_cbor::Value;

/// Errors from the binary item codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A value could not be canonically encoded.
    #[error("CBOR encoding failed: {0}")]
    Encode(String),
    /// A byte sequence could not be decoded as a CBOR item.
    #[error("CBOR decoding failed: {0}")]
    Decode(String),
}

/// Encodes a CBOR value to its canonical bytes.
pub fn to_canonical(value: &CborValue) -> Result<Vec<u8>, CodecError> {
    serde_cbor::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decodes canonical bytes back into a CBOR value.
pub fn from_canonical(bytes: &[u8]) -> Result<CborValue, CodecError> {
    serde_cbor::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}
