//! The tagged encoding layer: the canonical binary form of every variant
//! and its exact inverse.
//!
//! A node becomes an array whose first element is the subject and whose
//! remaining elements are its assertions in the canonical digest-sorted
//! order; every other variant is wrapped in its own distinct tag. Position
//! alone establishes roles inside arrays, so nested encodings stay untagged
//! at the outer "envelope" level; standalone transport adds that outer tag.
//!
//! Decoding dispatches strictly on tag value and rebuilds nodes through the
//! checked constructor, guarding against tampering or corruption in
//! transit.

use velum_canonical::{
    from_canonical, to_canonical, CborValue, Digest, EncryptedMessage, KnownValue, TagRegistry,
    NONCE_SIZE,
};

use crate::envelope::{Envelope, EnvelopeCase};
use crate::errors::EnvelopeError;

impl Envelope {
    /// The encoding of this envelope without the outer transport tag, using
    /// the standard registry.
    pub fn untagged_cbor(&self) -> Result<CborValue, EnvelopeError> {
        self.untagged_cbor_with(&TagRegistry::STANDARD)
    }

    /// The encoding of this envelope without the outer transport tag.
    pub fn untagged_cbor_with(&self, tags: &TagRegistry) -> Result<CborValue, EnvelopeError> {
        Ok(match self.case() {
            EnvelopeCase::Node {
                subject,
                assertions,
                ..
            } => {
                let mut elements = Vec::with_capacity(1 + assertions.len());
                elements.push(subject.untagged_cbor_with(tags)?);
                for assertion in assertions {
                    elements.push(assertion.untagged_cbor_with(tags)?);
                }
                CborValue::Array(elements)
            }
            EnvelopeCase::Leaf { value, .. } => {
                CborValue::Tag(tags.leaf, Box::new(value.clone()))
            }
            EnvelopeCase::Wrapped { envelope, .. } => {
                CborValue::Tag(tags.wrapped, Box::new(envelope.untagged_cbor_with(tags)?))
            }
            EnvelopeCase::KnownValue { value, .. } => CborValue::Tag(
                tags.known_value,
                Box::new(CborValue::Integer(value.value() as i128)),
            ),
            EnvelopeCase::Assertion {
                predicate, object, ..
            } => CborValue::Tag(
                tags.assertion,
                Box::new(CborValue::Array(vec![
                    predicate.untagged_cbor_with(tags)?,
                    object.untagged_cbor_with(tags)?,
                ])),
            ),
            EnvelopeCase::Encrypted { message, digest } => CborValue::Tag(
                tags.encrypted,
                Box::new(CborValue::Array(vec![
                    CborValue::Bytes(message.ciphertext.clone()),
                    CborValue::Bytes(message.nonce.to_vec()),
                    CborValue::Bytes(digest.data().to_vec()),
                ])),
            ),
            EnvelopeCase::Elided { digest } => CborValue::Tag(
                tags.elided,
                Box::new(CborValue::Bytes(digest.data().to_vec())),
            ),
        })
    }

    /// The standalone transport encoding, wrapped in the outer envelope tag.
    pub fn tagged_cbor(&self) -> Result<CborValue, EnvelopeError> {
        self.tagged_cbor_with(&TagRegistry::STANDARD)
    }

    /// The standalone transport encoding against an explicit registry.
    pub fn tagged_cbor_with(&self, tags: &TagRegistry) -> Result<CborValue, EnvelopeError> {
        Ok(CborValue::Tag(
            tags.envelope,
            Box::new(self.untagged_cbor_with(tags)?),
        ))
    }

    /// The standalone transport encoding as canonical bytes.
    pub fn to_cbor_data(&self) -> Result<Vec<u8>, EnvelopeError> {
        Ok(to_canonical(&self.tagged_cbor()?)?)
    }

    /// Decodes an envelope from its untagged form using the standard
    /// registry.
    pub fn from_untagged_cbor(value: &CborValue) -> Result<Self, EnvelopeError> {
        Self::from_untagged_cbor_with(value, &TagRegistry::STANDARD)
    }

    /// Decodes an envelope from its untagged form.
    pub fn from_untagged_cbor_with(
        value: &CborValue,
        tags: &TagRegistry,
    ) -> Result<Self, EnvelopeError> {
        match value {
            CborValue::Array(elements) => {
                if elements.len() < 2 {
                    return Err(EnvelopeError::InvalidFormat(
                        "node array must have a subject and at least one assertion".into(),
                    ));
                }
                let subject = Self::from_untagged_cbor_with(&elements[0], tags)?;
                let assertions = elements[1..]
                    .iter()
                    .map(|e| Self::from_untagged_cbor_with(e, tags))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::with_assertions(subject, assertions)
            }
            CborValue::Tag(tag, inner) => Self::decode_tagged_case(*tag, inner, tags),
            _ => Err(EnvelopeError::InvalidFormat(
                "expected a tagged item or an array".into(),
            )),
        }
    }

    fn decode_tagged_case(
        tag: u64,
        inner: &CborValue,
        tags: &TagRegistry,
    ) -> Result<Self, EnvelopeError> {
        if tag == tags.leaf {
            Self::new_leaf(inner.clone())
        } else if tag == tags.known_value {
            match inner {
                CborValue::Integer(i) => {
                    let value = u64::try_from(*i).map_err(|_| {
                        EnvelopeError::InvalidFormat("known value out of range".into())
                    })?;
                    Self::new_known_value(KnownValue::new(value))
                }
                _ => Err(EnvelopeError::InvalidFormat(
                    "known value must be an unsigned integer".into(),
                )),
            }
        } else if tag == tags.wrapped {
            Ok(Self::from_untagged_cbor_with(inner, tags)?.wrap())
        } else if tag == tags.assertion {
            match inner {
                CborValue::Array(pair) if pair.len() == 2 => Ok(Self::new_assertion_envelopes(
                    Self::from_untagged_cbor_with(&pair[0], tags)?,
                    Self::from_untagged_cbor_with(&pair[1], tags)?,
                )),
                _ => Err(EnvelopeError::InvalidFormat(
                    "assertion must be a [predicate, object] pair".into(),
                )),
            }
        } else if tag == tags.encrypted {
            Self::decode_encrypted(inner)
        } else if tag == tags.elided {
            match inner {
                CborValue::Bytes(bytes) => Ok(Self::new_elided(Digest::from_bytes(bytes)?)),
                _ => Err(EnvelopeError::InvalidFormat(
                    "elided placeholder must carry digest bytes".into(),
                )),
            }
        } else {
            Err(EnvelopeError::UnknownTag(tag))
        }
    }

    fn decode_encrypted(inner: &CborValue) -> Result<Self, EnvelopeError> {
        let parts = match inner {
            CborValue::Array(parts) if parts.len() == 3 => parts,
            _ => {
                return Err(EnvelopeError::InvalidFormat(
                    "encrypted placeholder must be [ciphertext, nonce, digest]".into(),
                ))
            }
        };
        let ciphertext = match &parts[0] {
            CborValue::Bytes(bytes) => bytes.clone(),
            _ => {
                return Err(EnvelopeError::InvalidFormat(
                    "ciphertext must be a byte string".into(),
                ))
            }
        };
        let nonce: [u8; NONCE_SIZE] = match &parts[1] {
            CborValue::Bytes(bytes) => bytes.as_slice().try_into().map_err(|_| {
                EnvelopeError::InvalidFormat("nonce must be 12 bytes".into())
            })?,
            _ => {
                return Err(EnvelopeError::InvalidFormat(
                    "nonce must be a byte string".into(),
                ))
            }
        };
        let digest = match &parts[2] {
            CborValue::Bytes(bytes) => Digest::from_bytes(bytes)?,
            _ => {
                return Err(EnvelopeError::InvalidFormat(
                    "carried digest must be a byte string".into(),
                ))
            }
        };
        Self::new_encrypted(EncryptedMessage {
            ciphertext,
            nonce,
            digest: Some(digest),
        })
    }

    /// Decodes a standalone transport encoding using the standard registry.
    pub fn from_tagged_cbor(value: &CborValue) -> Result<Self, EnvelopeError> {
        Self::from_tagged_cbor_with(value, &TagRegistry::STANDARD)
    }

    /// Decodes a standalone transport encoding against an explicit registry.
    pub fn from_tagged_cbor_with(
        value: &CborValue,
        tags: &TagRegistry,
    ) -> Result<Self, EnvelopeError> {
        match value {
            CborValue::Tag(tag, inner) if *tag == tags.envelope => {
                Self::from_untagged_cbor_with(inner, tags)
            }
            CborValue::Tag(tag, _) => Err(EnvelopeError::UnknownTag(*tag)),
            _ => Err(EnvelopeError::InvalidFormat(
                "expected the outer envelope tag".into(),
            )),
        }
    }

    /// Decodes a standalone transport encoding from canonical bytes.
    pub fn from_cbor_data(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        Self::from_tagged_cbor(&from_canonical(bytes)?)
    }

    /// Encodes then immediately decodes, verifying the decoded digest
    /// matches the original.
    ///
    /// The primary regression guard for the digest-canonicalization rules;
    /// run by the test suite on every constructed fixture.
    pub fn check_encoding(&self) -> Result<&Self, EnvelopeError> {
        let data = self.to_cbor_data()?;
        let decoded = Self::from_cbor_data(&data)?;
        if decoded.digest() != self.digest() {
            return Err(EnvelopeError::EncodingCheckFailed {
                expected: self.digest(),
                actual: decoded.digest(),
            });
        }
        Ok(self)
    }
}
