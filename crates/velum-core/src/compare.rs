//! Semantic equivalence versus structural identity, and digest-set
//! traversal.
//!
//! Two envelopes are *equivalent* when they carry identical information
//! fully revealed — digest equality, O(1). They are *identical* only when
//! their redaction/encryption pattern also matches, which the structural
//! digest captures by marking obscured nodes with a discriminator byte
//! during a full traversal.

use std::collections::HashSet;

use velum_canonical::Digest;

use crate::envelope::{Envelope, EnvelopeCase};

/// Discriminator byte contributed by encrypted nodes.
const STRUCTURAL_ENCRYPTED: u8 = 1;

/// Discriminator byte contributed by elided nodes.
const STRUCTURAL_ELIDED: u8 = 2;

impl Envelope {
    /// True iff both envelopes contain identical information when fully
    /// revealed, regardless of which subtrees are currently obscured.
    pub fn is_equivalent_to(&self, other: &Envelope) -> bool {
        self.digest() == other.digest()
    }

    /// True iff both envelopes are equivalent and share the same
    /// redaction/encryption pattern. Short-circuits in O(1) when not even
    /// equivalent.
    pub fn is_identical_to(&self, other: &Envelope) -> bool {
        self.is_equivalent_to(other) && self.structural_digest() == other.structural_digest()
    }

    /// Digest over the full traversal, distinguishing obscured nodes.
    ///
    /// Every visited node appends a discriminator byte for encrypted/elided
    /// variants specifically (other variants contribute none) followed by
    /// its digest; the concatenation is hashed.
    pub fn structural_digest(&self) -> Digest {
        let mut image = Vec::new();
        self.structural_image(&mut image);
        Digest::from_image(&image)
    }

    fn structural_image(&self, image: &mut Vec<u8>) {
        match self.case() {
            EnvelopeCase::Encrypted { .. } => image.push(STRUCTURAL_ENCRYPTED),
            EnvelopeCase::Elided { .. } => image.push(STRUCTURAL_ELIDED),
            _ => {}
        }
        image.extend_from_slice(self.digest().data());
        match self.case() {
            EnvelopeCase::Node {
                subject,
                assertions,
                ..
            } => {
                subject.structural_image(image);
                for assertion in assertions {
                    assertion.structural_image(image);
                }
            }
            EnvelopeCase::Assertion {
                predicate, object, ..
            } => {
                predicate.structural_image(image);
                object.structural_image(image);
            }
            EnvelopeCase::Wrapped { envelope, .. } => envelope.structural_image(image),
            _ => {}
        }
    }

    /// Collects the digest of every envelope visited down to `level_limit`
    /// levels, along with each visited envelope's subject digest.
    ///
    /// A limit of 0 yields the empty set; a small limit (2) captures only
    /// the top-level shape; see [`Envelope::deep_digests`] for the
    /// unbounded form used to build reveal sets.
    pub fn digests(&self, level_limit: usize) -> HashSet<Digest> {
        let mut result = HashSet::new();
        self.collect_digests(&mut result, 0, level_limit);
        result
    }

    /// Every digest in the tree.
    pub fn deep_digests(&self) -> HashSet<Digest> {
        self.digests(usize::MAX)
    }

    /// Only the digests forming the top-level shape.
    pub fn shallow_digests(&self) -> HashSet<Digest> {
        self.digests(2)
    }

    fn collect_digests(&self, result: &mut HashSet<Digest>, level: usize, limit: usize) {
        if level >= limit {
            return;
        }
        result.insert(self.digest());
        result.insert(self.subject().digest());
        let next = level + 1;
        match self.case() {
            EnvelopeCase::Node {
                subject,
                assertions,
                ..
            } => {
                subject.collect_digests(result, next, limit);
                for assertion in assertions {
                    assertion.collect_digests(result, next, limit);
                }
            }
            EnvelopeCase::Assertion {
                predicate, object, ..
            } => {
                predicate.collect_digests(result, next, limit);
                object.collect_digests(result, next, limit);
            }
            EnvelopeCase::Wrapped { envelope, .. } => {
                envelope.collect_digests(result, next, limit);
            }
            _ => {}
        }
    }
}
