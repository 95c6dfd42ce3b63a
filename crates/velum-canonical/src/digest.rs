use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as Sha2Digest, Sha256};

use crate::validation::ValidationError;

/// Digest size in bytes (SHA-256).
pub const DIGEST_SIZE: usize = 32;

/// Content-derived SHA-256 digest of canonical bytes.
///
/// The derived `Ord` is the byte-wise total order used to canonically sort a
/// node's assertions before hashing.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Computes the digest of a byte image.
    pub fn from_image(image: impl AsRef<[u8]>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(image.as_ref());
        Self(hasher.finalize().into())
    }

    /// Combines constituent digests into one.
    ///
    /// The image is the raw concatenation of the 32-byte digests in iteration
    /// order, with no length prefixes. Digests are fixed-size, so the layout
    /// is unambiguous.
    pub fn from_digests(digests: impl IntoIterator<Item = Digest>) -> Self {
        let mut hasher = Sha256::new();
        for digest in digests {
            hasher.update(digest.data());
        }
        Self(hasher.finalize().into())
    }

    /// Constructs a digest from existing digest bytes, validating the length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        let data: [u8; DIGEST_SIZE] =
            bytes
                .try_into()
                .map_err(|_| ValidationError::InvalidLength {
                    field: "digest",
                    expected: DIGEST_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(data))
    }

    /// Parses a digest from a lowercase hex string.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let bytes = hex::decode(s).map_err(|_| ValidationError::InvalidHex {
            field: "digest",
            value: s.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Raw digest bytes.
    pub fn data(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Lowercase hex rendering of the digest bytes.
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_image_matches_sha256() {
        let digest = Digest::from_image(b"abc");
        assert_eq!(
            digest.hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn from_digests_concatenates_raw_bytes() {
        let a = Digest::from_image(b"a");
        let b = Digest::from_image(b"b");
        let mut image = Vec::new();
        image.extend_from_slice(a.data());
        image.extend_from_slice(b.data());
        assert_eq!(Digest::from_digests([a, b]), Digest::from_image(&image));
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        assert!(Digest::from_bytes(&[0u8; 31]).is_err());
        assert!(Digest::from_bytes(&[0u8; 33]).is_err());
        assert!(Digest::from_bytes(&[0u8; 32]).is_ok());
    }

    #[test]
    fn hex_round_trip() {
        let digest = Digest::from_image(b"round trip");
        assert_eq!(Digest::from_hex(&digest.hex()).unwrap(), digest);
    }

    #[test]
    fn ordering_is_byte_wise() {
        let lo = Digest::from_bytes(&[0u8; 32]).unwrap();
        let hi = Digest::from_bytes(&[0xffu8; 32]).unwrap();
        assert!(lo < hi);
    }
}
