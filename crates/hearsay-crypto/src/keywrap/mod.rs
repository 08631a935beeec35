//! Password key-encryption envelope.
//!
//! Encrypts a raw 32-byte private key under a user-chosen password for
//! export and transport. The password is NFKC-normalized and stretched with
//! scrypt (deliberately slow and memory-hard); the key is sealed with
//! XChaCha20-Poly1305, binding a key-security flag as associated data; the
//! frame is rendered as a bech32 string under the `ncryptsec` prefix,
//! wire-compatible with the published NIP-49 format.
//!
//! Decryption with the wrong password and decryption of a corrupted
//! envelope are deliberately indistinguishable
//! ([`KeywrapError::DecryptionFailed`]) so the error is useless as a
//! brute-force oracle.

mod envelope;
mod error;
mod normalize;

pub use envelope::{
    DEFAULT_LOG_N, KEYWRAP_HRP, KeySecurity, decrypt_key, encrypt_key, encrypt_key_with_rng,
    key_security,
};
pub use error::KeywrapError;
pub use normalize::normalize;
