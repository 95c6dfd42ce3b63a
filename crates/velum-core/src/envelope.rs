use std::sync::Arc;

use velum_canonical::{
    to_canonical, CborValue, Digest, EncryptedMessage, KnownValue, TagRegistry,
};

use crate::errors::EnvelopeError;
use crate::value::EnvelopeEncodable;

/// The variant payload of an envelope.
///
/// Recursion goes through `Envelope` itself, which is reference-counted, so
/// unchanged subtrees are shared between the envelopes derived from them.
#[derive(Debug)]
pub(crate) enum EnvelopeCase {
    /// A subject annotated by one or more assertions. Never empty: adding
    /// the first assertion promotes a bare subject to a node, removing the
    /// last demotes it back.
    Node {
        subject: Envelope,
        assertions: Vec<Envelope>,
        digest: Digest,
    },
    /// One encoded scalar value.
    Leaf { value: CborValue, digest: Digest },
    /// An envelope boxed as a single opaque unit.
    Wrapped { envelope: Envelope, digest: Digest },
    /// A small enumerated constant.
    KnownValue { value: KnownValue, digest: Digest },
    /// A predicate/object pair.
    Assertion {
        predicate: Envelope,
        object: Envelope,
        digest: Digest,
    },
    /// An authenticated ciphertext standing in for a hidden subtree. The
    /// digest is the one the message carries, checked at construction.
    Encrypted {
        message: EncryptedMessage,
        digest: Digest,
    },
    /// A bare digest standing in for an elided subtree.
    Elided { digest: Digest },
}

/// A content-addressed, immutable envelope tree.
///
/// Every envelope caches its digest at construction; all operations are pure
/// and return new values sharing unchanged subtrees with the original.
/// Equality is value equality via digest — two envelopes are equal iff they
/// carry identical information when fully revealed.
#[derive(Debug, Clone)]
pub struct Envelope(Arc<EnvelopeCase>);

impl Envelope {
    pub(crate) fn case(&self) -> &EnvelopeCase {
        &self.0
    }

    fn from_case(case: EnvelopeCase) -> Self {
        Self(Arc::new(case))
    }

    /// Constructs an envelope from any encodable subject.
    ///
    /// Fails only if the value cannot be canonically encoded.
    pub fn new(subject: impl EnvelopeEncodable) -> Result<Self, EnvelopeError> {
        subject.into_envelope()
    }

    /// Constructs a leaf from an encoded scalar value.
    pub fn new_leaf(value: CborValue) -> Result<Self, EnvelopeError> {
        let digest = Digest::from_image(to_canonical(&value)?);
        Ok(Self::from_case(EnvelopeCase::Leaf { value, digest }))
    }

    /// Constructs a known-value envelope.
    ///
    /// The digest image is the CBOR encoding of the standard-tagged constant,
    /// the same bytes the encoding layer emits for this variant.
    pub fn new_known_value(value: KnownValue) -> Result<Self, EnvelopeError> {
        let image = to_canonical(&CborValue::Tag(
            TagRegistry::STANDARD.known_value,
            Box::new(CborValue::Integer(value.value() as i128)),
        ))?;
        let digest = Digest::from_image(image);
        Ok(Self::from_case(EnvelopeCase::KnownValue { value, digest }))
    }

    /// Constructs an assertion from encodable predicate and object values.
    pub fn new_assertion(
        predicate: impl EnvelopeEncodable,
        object: impl EnvelopeEncodable,
    ) -> Result<Self, EnvelopeError> {
        Ok(Self::new_assertion_envelopes(
            predicate.into_envelope()?,
            object.into_envelope()?,
        ))
    }

    /// Constructs an assertion from predicate and object envelopes.
    ///
    /// The digest is the order-preserving combination of the two sub-digests
    /// (predicate then object, not sorted), distinguishing assertion
    /// digesting from node digesting.
    pub fn new_assertion_envelopes(predicate: Envelope, object: Envelope) -> Self {
        let digest = Digest::from_digests([predicate.digest(), object.digest()]);
        Self::from_case(EnvelopeCase::Assertion {
            predicate,
            object,
            digest,
        })
    }

    /// Constructs an encrypted placeholder from an authenticated message.
    ///
    /// Fails if the message carries no plaintext digest: a ciphertext with no
    /// known digest cannot be safely substituted into a tree.
    pub fn new_encrypted(message: EncryptedMessage) -> Result<Self, EnvelopeError> {
        let digest = message.digest().ok_or(EnvelopeError::MissingDigest)?;
        Ok(Self::from_case(EnvelopeCase::Encrypted { message, digest }))
    }

    /// Constructs an elided placeholder carrying only a digest.
    pub fn new_elided(digest: Digest) -> Self {
        Self::from_case(EnvelopeCase::Elided { digest })
    }

    /// Builds a node from a subject and assertions without validating them.
    ///
    /// Assertions are sorted ascending by digest and deduplicated by digest
    /// equality before the aggregate digest is computed. This entry point
    /// trusts its caller to pass assertion-rooted (or obscured) envelopes
    /// and a non-empty list; it is the primitive beneath the checked API.
    pub fn with_unchecked_assertions(subject: Envelope, assertions: Vec<Envelope>) -> Self {
        debug_assert!(!assertions.is_empty());
        let mut assertions = assertions;
        assertions.sort_by_key(|a| a.digest());
        assertions.dedup_by_key(|a| a.digest());
        let digest = Digest::from_digests(
            std::iter::once(subject.digest()).chain(assertions.iter().map(|a| a.digest())),
        );
        Self::from_case(EnvelopeCase::Node {
            subject,
            assertions,
            digest,
        })
    }

    /// Builds a node from a subject and assertions, validating that every
    /// element is assertion-rooted or an obscured stand-in for one.
    ///
    /// An empty assertion list yields the bare subject.
    pub fn with_assertions(
        subject: Envelope,
        assertions: Vec<Envelope>,
    ) -> Result<Self, EnvelopeError> {
        for assertion in &assertions {
            if !assertion.is_subject_assertion() && !assertion.is_subject_obscured() {
                return Err(EnvelopeError::InvalidFormat(
                    "node element is not an assertion or an obscured stand-in".into(),
                ));
            }
        }
        if assertions.is_empty() {
            return Ok(subject);
        }
        Ok(Self::with_unchecked_assertions(subject, assertions))
    }

    /// Boxes this envelope as a single opaque unit, hiding its structure
    /// from further assertions.
    pub fn wrap(&self) -> Self {
        let digest = Digest::from_digests([self.digest()]);
        Self::from_case(EnvelopeCase::Wrapped {
            envelope: self.clone(),
            digest,
        })
    }

    /// Extracts the envelope inside a wrapped subject.
    ///
    /// Fails with [`EnvelopeError::NotWrapped`] if the subject is not
    /// wrapped.
    pub fn try_unwrap(&self) -> Result<Self, EnvelopeError> {
        match self.subject().case() {
            EnvelopeCase::Wrapped { envelope, .. } => Ok(envelope.clone()),
            _ => Err(EnvelopeError::NotWrapped),
        }
    }

    /// The digest uniquely identifying this envelope's information content.
    pub fn digest(&self) -> Digest {
        match self.case() {
            EnvelopeCase::Node { digest, .. }
            | EnvelopeCase::Leaf { digest, .. }
            | EnvelopeCase::Wrapped { digest, .. }
            | EnvelopeCase::KnownValue { digest, .. }
            | EnvelopeCase::Assertion { digest, .. }
            | EnvelopeCase::Encrypted { digest, .. }
            | EnvelopeCase::Elided { digest } => *digest,
        }
    }

    /// The subject of this envelope: itself unless it is a node.
    pub fn subject(&self) -> &Envelope {
        match self.case() {
            EnvelopeCase::Node { subject, .. } => subject,
            _ => self,
        }
    }

    /// The assertions on this envelope's subject; empty unless it is a node.
    pub fn assertions(&self) -> &[Envelope] {
        match self.case() {
            EnvelopeCase::Node { assertions, .. } => assertions,
            _ => &[],
        }
    }

    /// The predicate, if this envelope is an assertion.
    pub fn predicate(&self) -> Option<&Envelope> {
        match self.case() {
            EnvelopeCase::Assertion { predicate, .. } => Some(predicate),
            _ => None,
        }
    }

    /// The object, if this envelope is an assertion.
    pub fn object(&self) -> Option<&Envelope> {
        match self.case() {
            EnvelopeCase::Assertion { object, .. } => Some(object),
            _ => None,
        }
    }

    /// The encoded scalar value, if this envelope is a leaf.
    pub fn as_leaf(&self) -> Option<&CborValue> {
        match self.case() {
            EnvelopeCase::Leaf { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The known value, if this envelope is one.
    pub fn known_value(&self) -> Option<KnownValue> {
        match self.case() {
            EnvelopeCase::KnownValue { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// The encrypted message, if this envelope is an encrypted placeholder.
    pub fn encrypted_message(&self) -> Option<&EncryptedMessage> {
        match self.case() {
            EnvelopeCase::Encrypted { message, .. } => Some(message),
            _ => None,
        }
    }

    /// True if this envelope is a node (subject with assertions).
    pub fn is_node(&self) -> bool {
        matches!(self.case(), EnvelopeCase::Node { .. })
    }

    /// True if this envelope is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.case(), EnvelopeCase::Leaf { .. })
    }

    /// True if this envelope is wrapped.
    pub fn is_wrapped(&self) -> bool {
        matches!(self.case(), EnvelopeCase::Wrapped { .. })
    }

    /// True if this envelope is a known value.
    pub fn is_known_value(&self) -> bool {
        matches!(self.case(), EnvelopeCase::KnownValue { .. })
    }

    /// True if this envelope is an assertion.
    pub fn is_assertion(&self) -> bool {
        matches!(self.case(), EnvelopeCase::Assertion { .. })
    }

    /// True if this envelope is an encrypted placeholder.
    pub fn is_encrypted(&self) -> bool {
        matches!(self.case(), EnvelopeCase::Encrypted { .. })
    }

    /// True if this envelope is an elided placeholder.
    pub fn is_elided(&self) -> bool {
        matches!(self.case(), EnvelopeCase::Elided { .. })
    }

    /// True if this envelope is hidden: elided or encrypted.
    pub fn is_obscured(&self) -> bool {
        self.is_elided() || self.is_encrypted()
    }

    /// True if this envelope's subject is an assertion.
    pub fn is_subject_assertion(&self) -> bool {
        self.subject().is_assertion()
    }

    /// True if this envelope's subject is obscured.
    pub fn is_subject_obscured(&self) -> bool {
        self.subject().is_obscured()
    }
}

impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        self.digest() == other.digest()
    }
}

impl Eq for Envelope {}
