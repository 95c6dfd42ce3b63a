//! Salt sources for non-correlating assertions.
//!
//! Repeated identical content produces identical (correlatable) digests; a
//! salt assertion mixes random bytes into an envelope so semantically equal
//! assertions added in different contexts do not share a digest. The source
//! is a trait so tests can substitute a deterministic generator and keep
//! fixed test vectors.

use rand::{Rng, RngCore};

/// Minimum salt length in bytes.
pub const MIN_SALT_LEN: usize = 8;

/// Maximum salt length in bytes.
pub const MAX_SALT_LEN: usize = 16;

/// Produces the random material mixed into salted assertions.
pub trait SaltSource {
    /// Returns the next salt payload.
    fn salt(&mut self) -> Vec<u8>;
}

/// Salt source backed by the thread-local system RNG.
///
/// Lengths are drawn uniformly from `MIN_SALT_LEN..=MAX_SALT_LEN`; envelopes
/// are small, and the salt only needs to decorrelate digests, not pad length.
#[derive(Debug, Default)]
pub struct SystemSalt;

impl SaltSource for SystemSalt {
    fn salt(&mut self) -> Vec<u8> {
        let mut rng = rand::thread_rng();
        let len = rng.gen_range(MIN_SALT_LEN..=MAX_SALT_LEN);
        let mut buf = vec![0u8; len];
        rng.fill_bytes(&mut buf);
        buf
    }
}

/// Deterministic salt source for reproducible test vectors.
///
/// Returns the supplied payload on every call.
#[derive(Debug, Clone)]
pub struct FixedSalt(Vec<u8>);

impl FixedSalt {
    /// Creates a fixed source that always yields `bytes`.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }
}

impl SaltSource for FixedSalt {
    fn salt(&mut self) -> Vec<u8> {
        self.0.clone()
    }
}
