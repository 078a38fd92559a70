//! Cryptographic primitives for freezer
//!
//! File names are stored on the server as ciphertext. Every client that wants to
//! map a local path onto a remote file has to decrypt the catalog with the user's
//! `CryptoKey`, which is derived from the crypto passphrase and the salt the
//! server hands back at login.
//!
//! Encrypted names travel as `base64(nonce || ciphertext || tag)` strings so they
//! can sit in JSON bodies unchanged.

mod secret;

pub use secret::{CryptoError, CryptoKey, KEY_SIZE, NONCE_SIZE};
