//! The assertion algebra: attaching, removing, replacing, and querying the
//! predicate/object pairs on a subject.
//!
//! All operations are idempotent or atomic by digest and return new
//! envelopes; the receiver is never observed mid-operation.

use velum_canonical::{known_value, Digest, SaltSource};

use crate::envelope::{Envelope, EnvelopeCase};
use crate::errors::EnvelopeError;
use crate::value::{EnvelopeDecodable, EnvelopeEncodable};

impl Envelope {
    /// Attaches an assertion envelope to this envelope's subject.
    ///
    /// Idempotent by digest: an assertion whose digest already appears in
    /// the set is silently absorbed. The argument must be assertion-rooted
    /// or an obscured stand-in, else this fails with a format error.
    pub fn add_assertion_envelope(&self, assertion: Envelope) -> Result<Self, EnvelopeError> {
        if !assertion.is_subject_assertion() && !assertion.is_subject_obscured() {
            return Err(EnvelopeError::InvalidFormat(
                "added envelope is not an assertion or an obscured stand-in".into(),
            ));
        }
        match self.case() {
            EnvelopeCase::Node {
                subject,
                assertions,
                ..
            } => {
                if assertions.iter().any(|a| a.digest() == assertion.digest()) {
                    return Ok(self.clone());
                }
                let mut assertions = assertions.clone();
                assertions.push(assertion);
                Ok(Self::with_unchecked_assertions(subject.clone(), assertions))
            }
            _ => Ok(Self::with_unchecked_assertions(
                self.clone(),
                vec![assertion],
            )),
        }
    }

    /// Attaches an assertion envelope if one is supplied; `None` is a no-op
    /// returning the receiver unchanged.
    pub fn add_optional_assertion_envelope(
        &self,
        assertion: Option<Envelope>,
    ) -> Result<Self, EnvelopeError> {
        match assertion {
            Some(assertion) => self.add_assertion_envelope(assertion),
            None => Ok(self.clone()),
        }
    }

    /// Builds an assertion from loose predicate/object values and attaches
    /// it.
    pub fn add_assertion(
        &self,
        predicate: impl EnvelopeEncodable,
        object: impl EnvelopeEncodable,
    ) -> Result<Self, EnvelopeError> {
        self.add_assertion_envelope(Envelope::new_assertion(predicate, object)?)
    }

    /// Attaches an assertion only when `condition` holds; the object is a
    /// deferred computation invoked solely on the true branch.
    pub fn add_assertion_if<O: EnvelopeEncodable>(
        &self,
        condition: bool,
        predicate: impl EnvelopeEncodable,
        object: impl FnOnce() -> O,
    ) -> Result<Self, EnvelopeError> {
        if !condition {
            return Ok(self.clone());
        }
        self.add_assertion(predicate, object())
    }

    /// Mixes a random salt assertion into this envelope so that otherwise
    /// identical content does not produce a correlatable digest.
    pub fn add_salt(&self, source: &mut dyn SaltSource) -> Result<Self, EnvelopeError> {
        self.add_assertion(known_value::SALT, source.salt())
    }

    /// Attaches an assertion envelope after salting it.
    pub fn add_assertion_envelope_salted(
        &self,
        assertion: Envelope,
        source: &mut dyn SaltSource,
    ) -> Result<Self, EnvelopeError> {
        self.add_assertion_envelope(assertion.add_salt(source)?)
    }

    /// Builds an assertion from loose values, salts it, and attaches it.
    pub fn add_assertion_salted(
        &self,
        predicate: impl EnvelopeEncodable,
        object: impl EnvelopeEncodable,
        source: &mut dyn SaltSource,
    ) -> Result<Self, EnvelopeError> {
        self.add_assertion_envelope_salted(Envelope::new_assertion(predicate, object)?, source)
    }

    /// Removes the assertion whose digest matches `target`, if present.
    ///
    /// Removing the last assertion demotes the node back to its bare
    /// subject; an absent target leaves the envelope unchanged.
    pub fn remove_assertion(&self, target: &Envelope) -> Self {
        match self.case() {
            EnvelopeCase::Node {
                subject,
                assertions,
                ..
            } => {
                let remaining: Vec<Envelope> = assertions
                    .iter()
                    .filter(|a| a.digest() != target.digest())
                    .cloned()
                    .collect();
                if remaining.len() == assertions.len() {
                    self.clone()
                } else if remaining.is_empty() {
                    subject.clone()
                } else {
                    Self::with_unchecked_assertions(subject.clone(), remaining)
                }
            }
            _ => self.clone(),
        }
    }

    /// Atomically replaces one assertion with another; no intermediate
    /// state is observable.
    pub fn replace_assertion(
        &self,
        old: &Envelope,
        new: Envelope,
    ) -> Result<Self, EnvelopeError> {
        self.remove_assertion(old).add_assertion_envelope(new)
    }

    /// Rebuilds this envelope with a different subject, re-adding the same
    /// assertions (digests recomputed).
    pub fn replace_subject(&self, subject: Envelope) -> Self {
        match self.case() {
            EnvelopeCase::Node { assertions, .. } => {
                Self::with_unchecked_assertions(subject, assertions.clone())
            }
            _ => subject,
        }
    }

    /// All assertions whose predicate digest matches `predicate`.
    pub fn assertions_with_predicate(
        &self,
        predicate: impl EnvelopeEncodable,
    ) -> Result<Vec<Envelope>, EnvelopeError> {
        let predicate = predicate.into_envelope()?;
        Ok(self
            .assertions()
            .iter()
            .filter(|a| {
                a.predicate()
                    .map(|p| p.digest() == predicate.digest())
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    /// The single assertion with the given predicate.
    ///
    /// Fails with `NonexistentPredicate` on zero matches and
    /// `AmbiguousPredicate` on more than one.
    pub fn assertion_with_predicate(
        &self,
        predicate: impl EnvelopeEncodable,
    ) -> Result<Envelope, EnvelopeError> {
        let mut matches = self.assertions_with_predicate(predicate)?;
        match matches.len() {
            0 => Err(EnvelopeError::NonexistentPredicate),
            1 => Ok(matches.remove(0)),
            _ => Err(EnvelopeError::AmbiguousPredicate),
        }
    }

    /// The assertion whose own digest matches `digest`.
    pub fn assertion_with_digest(&self, digest: Digest) -> Result<Envelope, EnvelopeError> {
        self.assertions()
            .iter()
            .find(|a| a.digest() == digest)
            .cloned()
            .ok_or(EnvelopeError::NonexistentAssertion)
    }

    /// Decodes this envelope's subject as `T`.
    pub fn extract_subject<T: EnvelopeDecodable>(&self) -> Result<T, EnvelopeError> {
        T::from_envelope(self.subject())
    }

    /// The object of the single assertion with the given predicate.
    pub fn object_for_predicate(
        &self,
        predicate: impl EnvelopeEncodable,
    ) -> Result<Envelope, EnvelopeError> {
        let assertion = self.assertion_with_predicate(predicate)?;
        assertion
            .object()
            .cloned()
            .ok_or_else(|| EnvelopeError::InvalidFormat("assertion has no object".into()))
    }

    /// The objects of every assertion with the given predicate.
    pub fn objects_for_predicate(
        &self,
        predicate: impl EnvelopeEncodable,
    ) -> Result<Vec<Envelope>, EnvelopeError> {
        Ok(self
            .assertions_with_predicate(predicate)?
            .iter()
            .filter_map(|a| a.object().cloned())
            .collect())
    }

    /// Decodes the object of the single assertion with the given predicate
    /// as `T`.
    pub fn extract_object_for_predicate<T: EnvelopeDecodable>(
        &self,
        predicate: impl EnvelopeEncodable,
    ) -> Result<T, EnvelopeError> {
        self.object_for_predicate(predicate)?.extract_subject()
    }

    /// Decodes the objects of every assertion with the given predicate as
    /// `T`.
    pub fn extract_objects_for_predicate<T: EnvelopeDecodable>(
        &self,
        predicate: impl EnvelopeEncodable,
    ) -> Result<Vec<T>, EnvelopeError> {
        self.objects_for_predicate(predicate)?
            .iter()
            .map(|o| o.extract_subject())
            .collect()
    }

    /// Counts every envelope reachable from this one, including itself:
    /// subjects, assertions, predicate/object pairs, and wrapped interiors.
    ///
    /// A complexity metric, not a digest input.
    pub fn elements_count(&self) -> usize {
        1 + match self.case() {
            EnvelopeCase::Node {
                subject,
                assertions,
                ..
            } => {
                subject.elements_count()
                    + assertions
                        .iter()
                        .map(|a| a.elements_count())
                        .sum::<usize>()
            }
            EnvelopeCase::Assertion {
                predicate, object, ..
            } => predicate.elements_count() + object.elements_count(),
            EnvelopeCase::Wrapped { envelope, .. } => envelope.elements_count(),
            _ => 0,
        }
    }
}
