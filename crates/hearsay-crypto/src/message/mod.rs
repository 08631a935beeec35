//! Conversation encryption engine.
//!
//! Encrypts arbitrary payloads between two secp256k1 key pairs. The parties
//! agree on a [`ConversationKey`] via x-only ECDH; each message then derives
//! one-time [`MessageKeys`] from a random 32-byte nonce, pads the plaintext
//! to a length bucket, encrypts with ChaCha20 and authenticates with
//! HMAC-SHA256 over `nonce || ciphertext`. The whole envelope is framed as
//! `version || nonce || ciphertext || mac` and base64-encoded.
//!
//! Payloads are wire-compatible with the published NIP-44 v2 format, so the
//! published reference vectors apply.
//!
//! # Security
//!
//! - The conversation key is symmetric in the two key pairs: either party
//!   derives the same bytes without transmitting them
//! - Message keys are deterministic in (conversation key, nonce); a nonce
//!   must never repeat for a given conversation key
//! - The MAC is checked in constant time before any decryption
//! - Bucket padding hides exact plaintext lengths

mod conversation;
mod envelope;
mod error;
mod keys;
mod padding;

pub use conversation::ConversationKey;
pub use envelope::{
    MAC_SIZE, NONCE_SIZE, Version, decrypt, encrypt, encrypt_with_nonce, encrypt_with_rng,
};
pub use error::MessageError;
pub use keys::MessageKeys;
pub use padding::{MAX_PLAINTEXT_LEN, MIN_PLAINTEXT_LEN, calc_padded_len};
