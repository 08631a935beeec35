//! Hearsay Envelope Encryption
//!
//! Cryptographic core of the Hearsay protocol library. Two sibling engines
//! share one design: derive a symmetric key from a secret input, build a
//! versioned binary envelope, authenticate it.
//!
//! - [`message`]: conversation encryption between two secp256k1 key pairs.
//!   A shared conversation key is agreed via x-only ECDH; each message gets
//!   one-time cipher and MAC keys from a random nonce, length-hiding padding,
//!   and an HMAC-SHA256 tag. Payloads are wire-compatible with the published
//!   NIP-44 v2 format.
//! - [`keywrap`]: password encryption of a raw private key for export.
//!   scrypt stretches the password, XChaCha20-Poly1305 seals the key, and the
//!   result is rendered as a bech32 `ncryptsec` string, wire-compatible with
//!   the published NIP-49 format.
//!
//! ```text
//! secp256k1 ECDH ──► Conversation Key ──► Message Keys ──► Envelope
//!
//! password ──► NFKC ──► scrypt ──► AEAD ──► Key-Encryption Envelope
//! ```
//!
//! # Design
//!
//! Both engines are pure, single-shot transformations: no session state, no
//! I/O beyond randomness, safe to call from any number of threads. Randomness
//! is an injected capability ([`random::RandomSource`]) so tests can pin
//! nonces and salts while production draws from the OS CSPRNG.
//!
//! # Security
//!
//! - Authentication tags are compared in constant time; a failed check
//!   returns before any ciphertext is touched
//! - Plaintext lengths are hidden by bucket padding
//! - Derived key material is zeroized on drop; errors never carry secrets
//! - The keywrap engine reports wrong password and corrupted envelope as one
//!   indistinguishable failure

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod keywrap;
pub mod message;
pub mod random;

pub use keywrap::{KeySecurity, KeywrapError, decrypt_key, encrypt_key};
pub use message::{ConversationKey, MessageError, MessageKeys, decrypt, encrypt};
pub use random::{FixedRandom, OsRandom, RandomSource};
