//! Velum envelope trees: self-describing, cryptographically verifiable
//! structures supporting selective disclosure.
//!
//! This crate provides:
//! - The `Envelope` recursive variant type and its canonical digest rules
//! - The assertion algebra (attach, remove, replace, query, extract)
//! - The elision/obscuring engine with digest-preserving redaction
//! - The tagged CBOR encoding layer and its encode/decode self-check
//! - Semantic equivalence versus structural identity comparison
//!
//! Core invariants:
//! - Envelopes are immutable; operations return new values sharing
//!   unchanged subtrees
//! - Digests are deterministic: assertion order never affects a node digest
//! - Every elision/obscuring transformation preserves the digest of the
//!   envelope it is applied to, at every level of recursion
//!
#![deny(missing_docs)]

/// Equivalence, structural identity, and digest-set traversal.
pub mod compare;
/// The elision and obscuring engine.
pub mod elide;
/// The tagged binary encoding layer.
pub mod encode;
/// The envelope variant type and digest computation.
pub mod envelope;
/// Error types for envelope operations.
pub mod errors;
/// The assertion algebra and query surface.
pub mod queries;
/// Scalar encoding/decoding capabilities.
pub mod value;

pub use elide::ObscureAction;
pub use envelope::Envelope;
pub use errors::EnvelopeError;
pub use value::{EnvelopeDecodable, EnvelopeEncodable};

pub use velum_canonical::{
    known_value, CborValue, Digest, EncryptedMessage, FixedSalt, KnownValue, SaltSource,
    SymmetricKey, SystemSalt, TagRegistry,
};
