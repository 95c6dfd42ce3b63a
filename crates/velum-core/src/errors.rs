use thiserror::Error;
use velum_canonical::{CodecError, CryptoError, Digest, ValidationError};

/// Errors from envelope construction, queries, elision, and decoding.
///
/// Every fallible operation returns one of these to its immediate caller;
/// there is no retry logic and no partial-success state. Inputs are
/// immutable, so a failed operation leaves them untouched by construction.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Malformed structure: a non-assertion used as an assertion, an
    /// undersized decoded array, or a type-extraction mismatch.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    /// An unrecognized tag was encountered during decoding.
    #[error("unknown tag: {0}")]
    UnknownTag(u64),
    /// The binary item codec rejected a value or byte sequence.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    /// A canonical primitive failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Encryption or decryption of an obscured subtree failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
    /// A replacement envelope's digest does not match the placeholder it
    /// would restore.
    #[error("digest did not match")]
    InvalidDigest,
    /// An encrypted blob without a plaintext digest cannot be embedded.
    #[error("encrypted message carries no digest")]
    MissingDigest,
    /// No assertion with the given predicate exists.
    #[error("nonexistent predicate")]
    NonexistentPredicate,
    /// More than one assertion matched where exactly one was required.
    #[error("ambiguous predicate")]
    AmbiguousPredicate,
    /// No assertion with the given digest exists.
    #[error("nonexistent assertion")]
    NonexistentAssertion,
    /// Unwrap was called on a subject that is not wrapped.
    #[error("subject is not wrapped")]
    NotWrapped,
    /// The encode/decode self-check produced a different digest.
    #[error("encoding check failed: decoded digest {actual} != original {expected}")]
    EncodingCheckFailed {
        /// Digest of the original envelope.
        expected: Digest,
        /// Digest of the re-decoded envelope.
        actual: Digest,
    },
}
