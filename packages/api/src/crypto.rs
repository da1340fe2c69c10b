//! # Sealing — AES-256-GCM authenticated encryption
//!
//! Session tokens are sealed rather than merely encoded: the client can carry
//! them around but can neither read nor alter the claims inside.
//!
//! ## Key
//!
//! [`SealingKey::from_hex`] expects 32 bytes as 64 hex characters, taken from the
//! `session.key` setting. When none is configured, [`SealingKey::generate`]
//! produces a random one; tokens sealed with it die with the process.
//!
//! ## Format
//!
//! [`SealingKey::seal`] returns `nonce (12 bytes) || ciphertext+tag`. A fresh
//! random nonce is drawn for every call. [`SealingKey::open`] splits the nonce
//! back off and fails on any modification of either part.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

pub const NONCE_LEN: usize = 12;

#[derive(Clone)]
pub struct SealingKey {
    key: [u8; 32],
}

impl std::fmt::Debug for SealingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SealingKey(..)")
    }
}

impl SealingKey {
    /// Parse a 32-byte key from 64 hex characters.
    pub fn from_hex(hex_key: &str) -> Result<Self, String> {
        let bytes =
            hex::decode(hex_key.trim()).map_err(|e| format!("Invalid session key hex: {}", e))?;
        if bytes.len() != 32 {
            return Err(format!(
                "Session key must be 64 hex chars (32 bytes), got {} bytes",
                bytes.len()
            ));
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        Ok(Self { key })
    }

    /// A random key for this process only.
    pub fn generate() -> Self {
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        Self { key }
    }

    fn cipher(&self) -> Result<Aes256Gcm, String> {
        Aes256Gcm::new_from_slice(&self.key).map_err(|e| format!("Failed to create cipher: {}", e))
    }

    /// Encrypt `plaintext` under a random nonce. Returns `nonce || ciphertext`.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher()?
            .encrypt(nonce, plaintext)
            .map_err(|e| format!("Encryption failed: {}", e))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Decrypt and authenticate the output of [`seal`](Self::seal).
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, String> {
        if sealed.len() <= NONCE_LEN {
            return Err("Sealed data too short".to_string());
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        self.cipher()?
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| format!("Decryption failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn seal_then_open() {
        let key = SealingKey::from_hex(KEY_HEX).unwrap();
        let sealed = key.seal(b"hello").unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + 5 + 16);
        assert_eq!(key.open(&sealed).unwrap(), b"hello");
    }

    #[test]
    fn nonces_differ_between_calls() {
        let key = SealingKey::generate();
        assert_ne!(key.seal(b"same").unwrap(), key.seal(b"same").unwrap());
    }

    #[test]
    fn tampering_is_detected() {
        let key = SealingKey::generate();
        let mut sealed = key.seal(b"role=user").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(key.open(&sealed).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let sealed = SealingKey::generate().seal(b"secret").unwrap();
        assert!(SealingKey::generate().open(&sealed).is_err());
        assert!(SealingKey::generate().open(&sealed[..4]).is_err());
    }

    #[test]
    fn key_length_is_checked() {
        assert!(SealingKey::from_hex("abcd").is_err());
        assert!(SealingKey::from_hex("zz").is_err());
    }
}
