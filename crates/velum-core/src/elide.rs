//! The elision and obscuring engine.
//!
//! Produces a digest-preserving redacted copy of an envelope: a target set
//! of digests names the subtrees to hide (removing mode) or the subtrees
//! that must stay visible (revealing mode), and hidden subtrees are replaced
//! either with bare elided placeholders or with authenticated ciphertexts.
//!
//! The defining correctness property of the whole system is that every
//! transformation here preserves the digest of the envelope it is applied
//! to, at every level of recursion. Violation of that postcondition is a
//! defect in the algorithm, not a recoverable condition, so it is enforced
//! with debug assertions rather than an error path.

use std::collections::HashSet;

use velum_canonical::{Digest, SymmetricKey};

use crate::envelope::{Envelope, EnvelopeCase};
use crate::errors::EnvelopeError;

/// What to substitute for an obscured subtree.
#[derive(Debug, Clone)]
pub enum ObscureAction {
    /// Replace the subtree with a bare digest placeholder.
    Elide,
    /// Replace the subtree with its key-encrypted canonical encoding,
    /// carrying the subtree's digest.
    Encrypt(SymmetricKey),
}

impl Envelope {
    /// Replaces this envelope with an elided placeholder carrying its own
    /// digest; a no-op if it is already elided.
    pub fn elide(&self) -> Self {
        if self.is_elided() {
            self.clone()
        } else {
            Self::new_elided(self.digest())
        }
    }

    /// The core redaction walk.
    ///
    /// A node is obscured exactly when `target.contains(digest) !=
    /// is_revealing`; otherwise its shape is kept and the same decision is
    /// applied recursively to its children.
    pub fn elide_set_with_action(
        &self,
        target: &HashSet<Digest>,
        is_revealing: bool,
        action: &ObscureAction,
    ) -> Result<Self, EnvelopeError> {
        let digest = self.digest();
        let result = if target.contains(&digest) == is_revealing {
            match self.case() {
                EnvelopeCase::Assertion {
                    predicate, object, ..
                } => {
                    let predicate =
                        predicate.elide_set_with_action(target, is_revealing, action)?;
                    let object = object.elide_set_with_action(target, is_revealing, action)?;
                    Self::new_assertion_envelopes(predicate, object)
                }
                EnvelopeCase::Node {
                    subject,
                    assertions,
                    ..
                } => {
                    let subject = subject.elide_set_with_action(target, is_revealing, action)?;
                    let assertions = assertions
                        .iter()
                        .map(|a| a.elide_set_with_action(target, is_revealing, action))
                        .collect::<Result<Vec<_>, _>>()?;
                    // Structure was already validated; rebuild unchecked.
                    Self::with_unchecked_assertions(subject, assertions)
                }
                EnvelopeCase::Wrapped { envelope, .. } => envelope
                    .elide_set_with_action(target, is_revealing, action)?
                    .wrap(),
                _ => self.clone(),
            }
        } else {
            match action {
                ObscureAction::Elide => self.elide(),
                ObscureAction::Encrypt(key) => {
                    let plaintext = self.to_cbor_data()?;
                    let message = key.encrypt(&plaintext, Some(digest))?;
                    Self::new_encrypted(message)?
                }
            }
        };
        debug_assert_eq!(result.digest(), digest);
        Ok(result)
    }

    /// Redacts with bare elided placeholders.
    pub fn elide_set(
        &self,
        target: &HashSet<Digest>,
        is_revealing: bool,
    ) -> Result<Self, EnvelopeError> {
        self.elide_set_with_action(target, is_revealing, &ObscureAction::Elide)
    }

    /// Obscures the named targets, revealing everything else.
    pub fn elide_removing_set(&self, target: &HashSet<Digest>) -> Result<Self, EnvelopeError> {
        self.elide_set(target, false)
    }

    /// Reveals only the named targets (and what is required to reach them),
    /// obscuring the rest.
    pub fn elide_revealing_set(&self, target: &HashSet<Digest>) -> Result<Self, EnvelopeError> {
        self.elide_set(target, true)
    }

    /// Obscures the named targets with the given action.
    pub fn elide_removing_set_with_action(
        &self,
        target: &HashSet<Digest>,
        action: &ObscureAction,
    ) -> Result<Self, EnvelopeError> {
        self.elide_set_with_action(target, false, action)
    }

    /// Reveals only the named targets, obscuring the rest with the given
    /// action.
    pub fn elide_revealing_set_with_action(
        &self,
        target: &HashSet<Digest>,
        action: &ObscureAction,
    ) -> Result<Self, EnvelopeError> {
        self.elide_set_with_action(target, true, action)
    }

    /// Obscures the single subtree with the given digest.
    pub fn elide_removing_target(&self, target: Digest) -> Result<Self, EnvelopeError> {
        self.elide_removing_set(&HashSet::from([target]))
    }

    /// Reveals only the single subtree with the given digest.
    pub fn elide_revealing_target(&self, target: Digest) -> Result<Self, EnvelopeError> {
        self.elide_revealing_set(&HashSet::from([target]))
    }

    /// Substitutes `envelope` for this placeholder if and only if their
    /// digests match, restoring previously hidden content.
    pub fn unelide(&self, envelope: &Envelope) -> Result<Self, EnvelopeError> {
        if self.digest() == envelope.digest() {
            Ok(envelope.clone())
        } else {
            Err(EnvelopeError::InvalidDigest)
        }
    }

    /// Decrypts an encrypted placeholder back into the envelope it hides,
    /// checking that the decoded envelope matches the declared digest.
    pub fn decrypt_subtree(&self, key: &SymmetricKey) -> Result<Self, EnvelopeError> {
        match self.case() {
            EnvelopeCase::Encrypted { message, digest } => {
                let plaintext = key.decrypt(message)?;
                let envelope = Envelope::from_cbor_data(&plaintext)?;
                if envelope.digest() != *digest {
                    return Err(EnvelopeError::InvalidDigest);
                }
                Ok(envelope)
            }
            _ => Err(EnvelopeError::InvalidFormat(
                "envelope is not encrypted".into(),
            )),
        }
    }
}
