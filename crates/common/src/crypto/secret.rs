//! File name encryption using ChaCha20-Poly1305

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};

/// Size of ChaCha20-Poly1305 nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of ChaCha20-Poly1305 key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// Context string for BLAKE3 key derivation. Changing it orphans every stored name.
const KEY_CONTEXT: &str = "freezer 2017-06-01 file name encryption key";

/// Errors that can occur during encryption/decryption
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("cipher error: {0}")]
    Cipher(#[from] anyhow::Error),
    #[error("ciphertext is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("decrypted name is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A 256-bit symmetric key used to encrypt and decrypt file names
#[derive(PartialEq, Eq, Clone)]
pub struct CryptoKey([u8; KEY_SIZE]);

impl std::fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CryptoKey(..)")
    }
}

impl From<[u8; KEY_SIZE]> for CryptoKey {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        CryptoKey(bytes)
    }
}

impl CryptoKey {
    /// Derive the name key from the user's crypto passphrase.
    ///
    /// `salt` is the crypto hash returned by the server at login, so the same
    /// passphrase yields a different key per account.
    pub fn derive(passphrase: &str, salt: &str) -> Self {
        let mut material = Vec::with_capacity(salt.len() + passphrase.len() + 1);
        material.extend_from_slice(salt.as_bytes());
        material.push(0);
        material.extend_from_slice(passphrase.as_bytes());
        Self(blake3::derive_key(KEY_CONTEXT, &material))
    }

    /// Get a reference to the key bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Encrypt raw bytes. Output is `nonce (12 bytes) || ciphertext || auth_tag (16 bytes)`.
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(self.bytes()));

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes)
            .map_err(|e| anyhow::anyhow!("failed to generate nonce: {}", e))?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, data)
            .map_err(|_| anyhow::anyhow!("encrypt error"))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(nonce.as_ref());
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypt bytes produced by [`CryptoKey::encrypt`].
    ///
    /// # Errors
    ///
    /// Fails if the data is too short to hold a nonce or if authentication fails
    /// (tampered data or the wrong key).
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if data.len() < NONCE_SIZE {
            return Err(anyhow::anyhow!("data too short for nonce").into());
        }

        let cipher = ChaCha20Poly1305::new(Key::from_slice(self.bytes()));
        let nonce = Nonce::from_slice(&data[..NONCE_SIZE]);
        let plaintext = cipher
            .decrypt(nonce, &data[NONCE_SIZE..])
            .map_err(|_| anyhow::anyhow!("decrypt error"))?;

        Ok(plaintext)
    }

    /// Encrypt a file name into its at-rest string form.
    pub fn encrypt_string(&self, plaintext: &str) -> Result<String, CryptoError> {
        let encrypted = self.encrypt(plaintext.as_bytes())?;
        Ok(STANDARD.encode(encrypted))
    }

    /// Decrypt an at-rest file name back into plaintext.
    pub fn decrypt_string(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let raw = STANDARD.decode(ciphertext)?;
        let plaintext = self.decrypt(&raw)?;
        Ok(String::from_utf8(plaintext)?)
    }
}
