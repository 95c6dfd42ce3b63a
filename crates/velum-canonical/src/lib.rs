//! Canonical primitives for Velum envelope trees.
//!
//! This crate provides:
//! - The `Digest` newtype (SHA-256) with the byte-wise total order used for
//!   canonical sorting
//! - The binary item codec wrapper (`CborValue`, canonical encode/decode)
//! - The immutable wire tag registry
//! - `KnownValue` constants and their name table
//! - The swappable salt source used for non-correlation
//! - The authenticated `EncryptedMessage` blob used for in-place encryption
//!
//! Core invariants:
//! - Digests are content-derived and deterministic: the same canonical bytes
//!   always produce the same digest
//! - The tag registry is constructed once and never mutated
//! - An `EncryptedMessage` carries the digest of the plaintext it replaces as
//!   authenticated associated data
//!
#![deny(missing_docs)]

/// Binary item codec wrapper over canonical CBOR.
pub mod cbor;
/// Digest primitives and digest combination rules.
pub mod digest;
/// Authenticated symmetric encryption of envelope subtrees.
pub mod encrypted;
/// Known value constants (predicate/value shorthand).
pub mod known_value;
/// Salt sources for non-correlating assertions.
pub mod salt;
/// Wire tag registry for the tagged encoding layer.
pub mod tags;
/// Validation helpers used by canonical types.
pub mod validation;

pub use cbor::{from_canonical, to_canonical, CborValue, CodecError};
pub use digest::{Digest, DIGEST_SIZE};
pub use encrypted::{CryptoError, EncryptedMessage, SymmetricKey, KEY_SIZE, NONCE_SIZE};
pub use known_value::KnownValue;
pub use salt::{FixedSalt, SaltSource, SystemSalt, MAX_SALT_LEN, MIN_SALT_LEN};
pub use tags::TagRegistry;
pub use validation::ValidationError;
