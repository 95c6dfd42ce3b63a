//! Authenticated symmetric encryption of envelope subtrees.
//!
//! An `EncryptedMessage` stands in for a hidden subtree while the tree's
//! digests stay verifiable: the plaintext's digest rides along as ChaCha20-
//! Poly1305 associated data, so it is both retrievable by the holder and
//! bound to the ciphertext. A message without a digest cannot be safely
//! substituted into a tree and is rejected at embedding time.

use chacha20poly1305::aead::{Aead, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, KeyInit, Nonce};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::digest::Digest;

/// Symmetric key size in bytes.
pub const KEY_SIZE: usize = 32;

/// AEAD nonce size in bytes.
pub const NONCE_SIZE: usize = 12;

/// Errors from the encryption wrapper.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The AEAD construction rejected the plaintext.
    #[error("encryption failed")]
    EncryptionFailed,
    /// Ciphertext authentication failed during decryption.
    #[error("decryption failed: ciphertext authentication rejected")]
    AuthenticationFailed,
}

/// ChaCha20-Poly1305 symmetric key, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    /// Generates a fresh random key.
    pub fn random() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Constructs a key from existing bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Encrypts `plaintext` with a random nonce, binding `digest` (the
    /// plaintext's content digest) as associated data.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        digest: Option<Digest>,
    ) -> Result<EncryptedMessage, CryptoError> {
        let mut nonce = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce);
        self.encrypt_with_nonce(plaintext, digest, nonce)
    }

    /// Encrypts `plaintext` with an explicit nonce.
    ///
    /// Callers must never reuse a nonce with the same key; prefer
    /// [`SymmetricKey::encrypt`] outside of fixed test vectors.
    pub fn encrypt_with_nonce(
        &self,
        plaintext: &[u8],
        digest: Option<Digest>,
        nonce: [u8; NONCE_SIZE],
    ) -> Result<EncryptedMessage, CryptoError> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));
        let aad = digest.map(|d| d.data().to_vec()).unwrap_or_default();
        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: &aad,
                },
            )
            .map_err(|_| CryptoError::EncryptionFailed)?;
        Ok(EncryptedMessage {
            ciphertext,
            nonce,
            digest,
        })
    }

    /// Decrypts a message, failing if authentication fails — including when
    /// the carried digest was altered.
    pub fn decrypt(&self, message: &EncryptedMessage) -> Result<Vec<u8>, CryptoError> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));
        let aad = message
            .digest
            .map(|d| d.data().to_vec())
            .unwrap_or_default();
        cipher
            .decrypt(
                Nonce::from_slice(&message.nonce),
                Payload {
                    msg: &message.ciphertext,
                    aad: &aad,
                },
            )
            .map_err(|_| CryptoError::AuthenticationFailed)
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

/// Opaque authenticated ciphertext standing in for a hidden subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMessage {
    /// Ciphertext including the Poly1305 authentication tag.
    pub ciphertext: Vec<u8>,
    /// AEAD nonce.
    pub nonce: [u8; NONCE_SIZE],
    /// Digest of the plaintext, bound as associated data. `None` for
    /// free-standing messages that will never be embedded in a tree.
    pub digest: Option<Digest>,
}

impl EncryptedMessage {
    /// The digest this message carries, if any.
    pub fn digest(&self) -> Option<Digest> {
        self.digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SymmetricKey {
        SymmetricKey::from_bytes([7u8; KEY_SIZE])
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let digest = Digest::from_image(b"plaintext");
        let message = key().encrypt(b"plaintext", Some(digest)).unwrap();
        assert_eq!(message.digest(), Some(digest));
        assert_eq!(key().decrypt(&message).unwrap(), b"plaintext".to_vec());
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let mut message = key().encrypt(b"plaintext", None).unwrap();
        message.ciphertext[0] ^= 0x01;
        assert!(matches!(
            key().decrypt(&message),
            Err(CryptoError::AuthenticationFailed)
        ));
    }

    #[test]
    fn tampered_digest_is_rejected() {
        let digest = Digest::from_image(b"plaintext");
        let mut message = key().encrypt(b"plaintext", Some(digest)).unwrap();
        message.digest = Some(Digest::from_image(b"other"));
        assert!(key().decrypt(&message).is_err());
    }

    #[test]
    fn wrong_key_is_rejected() {
        let message = key().encrypt(b"plaintext", None).unwrap();
        let other = SymmetricKey::from_bytes([9u8; KEY_SIZE]);
        assert!(other.decrypt(&message).is_err());
    }

    #[test]
    fn fixed_nonce_is_deterministic() {
        let digest = Digest::from_image(b"plaintext");
        let a = key()
            .encrypt_with_nonce(b"plaintext", Some(digest), [1u8; NONCE_SIZE])
            .unwrap();
        let b = key()
            .encrypt_with_nonce(b"plaintext", Some(digest), [1u8; NONCE_SIZE])
            .unwrap();
        assert_eq!(a, b);
    }
}
