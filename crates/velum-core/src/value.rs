//! The closed set of scalar capabilities an envelope can carry.
//!
//! Loosely-typed "build a leaf from anything" constructors are resolved at
//! compile time through these two traits instead of runtime type inspection:
//! [`EnvelopeEncodable`] turns a concrete value into an envelope, and
//! [`EnvelopeDecodable`] recovers one from an envelope's subject.

use velum_canonical::{CborValue, Digest, KnownValue};

use crate::envelope::{Envelope, EnvelopeCase};
use crate::errors::EnvelopeError;

/// A value that can become an envelope.
pub trait EnvelopeEncodable {
    /// Converts the value into an envelope.
    ///
    /// Fails only if the value cannot be canonically encoded.
    fn into_envelope(self) -> Result<Envelope, EnvelopeError>;
}

/// A value that can be recovered from an envelope.
pub trait EnvelopeDecodable: Sized {
    /// Attempts to decode the value from an envelope.
    ///
    /// Fails with a format error on variant or type mismatch.
    fn from_envelope(envelope: &Envelope) -> Result<Self, EnvelopeError>;
}

impl EnvelopeEncodable for Envelope {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        Ok(self)
    }
}

impl EnvelopeEncodable for &Envelope {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        Ok(self.clone())
    }
}

impl EnvelopeEncodable for KnownValue {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        Envelope::new_known_value(self)
    }
}

impl EnvelopeEncodable for CborValue {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        Envelope::new_leaf(self)
    }
}

impl EnvelopeEncodable for &str {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        Envelope::new_leaf(CborValue::Text(self.to_string()))
    }
}

impl EnvelopeEncodable for String {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        Envelope::new_leaf(CborValue::Text(self))
    }
}

impl EnvelopeEncodable for bool {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        Envelope::new_leaf(CborValue::Bool(self))
    }
}

impl EnvelopeEncodable for f64 {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        Envelope::new_leaf(CborValue::Float(self))
    }
}

impl EnvelopeEncodable for Vec<u8> {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        Envelope::new_leaf(CborValue::Bytes(self))
    }
}

impl EnvelopeEncodable for &[u8] {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        Envelope::new_leaf(CborValue::Bytes(self.to_vec()))
    }
}

impl EnvelopeEncodable for Digest {
    fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
        Envelope::new_leaf(CborValue::Bytes(self.data().to_vec()))
    }
}

macro_rules! encodable_integer {
    ($($ty:ty),*) => {
        $(
            impl EnvelopeEncodable for $ty {
                fn into_envelope(self) -> Result<Envelope, EnvelopeError> {
                    Envelope::new_leaf(CborValue::Integer(self as i128))
                }
            }
        )*
    };
}

encodable_integer!(i32, i64, u32, u64);

impl EnvelopeDecodable for Envelope {
    /// Identity decoding; a wrapped envelope yields its interior.
    fn from_envelope(envelope: &Envelope) -> Result<Self, EnvelopeError> {
        match envelope.case() {
            EnvelopeCase::Wrapped { envelope, .. } => Ok(envelope.clone()),
            _ => Ok(envelope.clone()),
        }
    }
}

impl EnvelopeDecodable for KnownValue {
    fn from_envelope(envelope: &Envelope) -> Result<Self, EnvelopeError> {
        envelope
            .known_value()
            .ok_or_else(|| EnvelopeError::InvalidFormat("expected a known value".into()))
    }
}

fn leaf_value(envelope: &Envelope) -> Result<&CborValue, EnvelopeError> {
    envelope
        .as_leaf()
        .ok_or_else(|| EnvelopeError::InvalidFormat("expected a leaf".into()))
}

impl EnvelopeDecodable for String {
    fn from_envelope(envelope: &Envelope) -> Result<Self, EnvelopeError> {
        match leaf_value(envelope)? {
            CborValue::Text(s) => Ok(s.clone()),
            _ => Err(EnvelopeError::InvalidFormat("expected a text leaf".into())),
        }
    }
}

impl EnvelopeDecodable for bool {
    fn from_envelope(envelope: &Envelope) -> Result<Self, EnvelopeError> {
        match leaf_value(envelope)? {
            CborValue::Bool(b) => Ok(*b),
            _ => Err(EnvelopeError::InvalidFormat(
                "expected a boolean leaf".into(),
            )),
        }
    }
}

impl EnvelopeDecodable for f64 {
    fn from_envelope(envelope: &Envelope) -> Result<Self, EnvelopeError> {
        match leaf_value(envelope)? {
            CborValue::Float(f) => Ok(*f),
            _ => Err(EnvelopeError::InvalidFormat("expected a float leaf".into())),
        }
    }
}

impl EnvelopeDecodable for Vec<u8> {
    fn from_envelope(envelope: &Envelope) -> Result<Self, EnvelopeError> {
        match leaf_value(envelope)? {
            CborValue::Bytes(b) => Ok(b.clone()),
            _ => Err(EnvelopeError::InvalidFormat(
                "expected a byte string leaf".into(),
            )),
        }
    }
}

impl EnvelopeDecodable for Digest {
    fn from_envelope(envelope: &Envelope) -> Result<Self, EnvelopeError> {
        match leaf_value(envelope)? {
            CborValue::Bytes(b) => Ok(Digest::from_bytes(b)?),
            _ => Err(EnvelopeError::InvalidFormat(
                "expected a digest leaf".into(),
            )),
        }
    }
}

macro_rules! decodable_integer {
    ($($ty:ty),*) => {
        $(
            impl EnvelopeDecodable for $ty {
                fn from_envelope(envelope: &Envelope) -> Result<Self, EnvelopeError> {
                    match leaf_value(envelope)? {
                        CborValue::Integer(i) => <$ty>::try_from(*i).map_err(|_| {
                            EnvelopeError::InvalidFormat("integer out of range".into())
                        }),
                        _ => Err(EnvelopeError::InvalidFormat(
                            "expected an integer leaf".into(),
                        )),
                    }
                }
            }
        )*
    };
}

decodable_integer!(i32, i64, u32, u64);
