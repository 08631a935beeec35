//! Versioned, authenticated message envelope.
//!
//! Wire layout before base64 (all offsets fixed):
//!
//! ```text
//! byte 0        version = 0x02
//! bytes 1..33   nonce (32 bytes, random per message)
//! bytes 33..N   ciphertext (padded plaintext, ChaCha20)
//! last 32 bytes HMAC-SHA256 over nonce || ciphertext
//! ```
//!
//! Both operations are single-shot, stateless calls. A failed decrypt
//! returns an error and never partial plaintext.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::conversation::ConversationKey;
use super::error::MessageError;
use super::keys::MessageKeys;
use super::padding;
use crate::random::{OsRandom, RandomSource};

type HmacSha256 = Hmac<Sha256>;

/// Per-message nonce size.
pub const NONCE_SIZE: usize = 32;

/// Authentication tag size.
pub const MAC_SIZE: usize = 32;

/// Reserved first character escaping to future envelope versions.
const VERSION_ESCAPE: char = '#';

/// Shortest decoded envelope: version + nonce + smallest padded ciphertext
/// (2-byte prefix + one 32-byte bucket) + mac.
const MIN_DECODED_LEN: usize = 1 + NONCE_SIZE + padding::LENGTH_PREFIX_SIZE + 32 + MAC_SIZE;

/// Longest decoded envelope: the largest padding bucket is 65536 bytes.
const MAX_DECODED_LEN: usize = 1 + NONCE_SIZE + padding::LENGTH_PREFIX_SIZE + 65536 + MAC_SIZE;

/// Envelope versions understood by this implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// ChaCha20 + HMAC-SHA256 with bucket padding (wire byte 0x02).
    V2,
}

impl Version {
    /// Wire byte for this version.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::V2 => 0x02,
        }
    }

    /// Parse a wire byte.
    ///
    /// # Errors
    ///
    /// - `UnsupportedVersion` for any byte this implementation does not
    ///   understand
    pub fn from_byte(byte: u8) -> Result<Self, MessageError> {
        match byte {
            0x02 => Ok(Self::V2),
            _ => Err(MessageError::UnsupportedVersion),
        }
    }
}

/// Encrypt `plaintext` under `conversation_key` with a fresh random nonce.
///
/// Returns the base64 envelope. Two encryptions of the same plaintext
/// produce different envelopes because the nonce is drawn fresh each call.
///
/// # Errors
///
/// - `InvalidPlaintextLength` if the plaintext is empty or longer than 65535
///   bytes
pub fn encrypt(
    plaintext: &[u8],
    conversation_key: &ConversationKey,
) -> Result<String, MessageError> {
    encrypt_with_rng(plaintext, conversation_key, &mut OsRandom)
}

/// [`encrypt`] drawing the nonce from a caller-supplied [`RandomSource`].
pub fn encrypt_with_rng(
    plaintext: &[u8],
    conversation_key: &ConversationKey,
    rng: &mut impl RandomSource,
) -> Result<String, MessageError> {
    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce);
    encrypt_with_nonce(plaintext, conversation_key, &nonce)
}

/// [`encrypt`] with an explicit nonce. Deterministic; exists for reference
/// vectors and protocol tests.
///
/// Reusing a nonce under one conversation key reuses the ChaCha20 key stream
/// and breaks confidentiality. Production callers want [`encrypt`].
pub fn encrypt_with_nonce(
    plaintext: &[u8],
    conversation_key: &ConversationKey,
    nonce: &[u8; NONCE_SIZE],
) -> Result<String, MessageError> {
    let keys = MessageKeys::derive(conversation_key, nonce);

    let mut buffer = padding::pad(plaintext)?;
    let mut cipher = ChaCha20::new(keys.cipher_key().into(), keys.cipher_nonce().into());
    cipher.apply_keystream(&mut buffer);

    let mac = authenticate(keys.mac_key(), nonce, &buffer);

    let mut envelope = Vec::with_capacity(1 + NONCE_SIZE + buffer.len() + MAC_SIZE);
    envelope.push(Version::V2.as_byte());
    envelope.extend_from_slice(nonce);
    envelope.extend_from_slice(&buffer);
    envelope.extend_from_slice(&mac);

    Ok(BASE64.encode(envelope))
}

/// Decrypt a base64 envelope under `conversation_key`.
///
/// The MAC is recomputed and compared in constant time before any
/// decryption; on mismatch the function returns without touching the
/// ciphertext.
///
/// # Errors
///
/// - `EmptyPayload`: empty input
/// - `UnsupportedVersion`: future-version escape (`#`) or unknown version
///   byte
/// - `InvalidEncoding`: not valid standard base64
/// - `InvalidPayloadLength`: decoded length outside the legal bounds
/// - `InvalidMac`: authentication failure
/// - `InvalidPadding`: malformed padding on an authenticated message
pub fn decrypt(
    payload: &str,
    conversation_key: &ConversationKey,
) -> Result<Vec<u8>, MessageError> {
    if payload.is_empty() {
        return Err(MessageError::EmptyPayload);
    }
    if payload.starts_with(VERSION_ESCAPE) {
        return Err(MessageError::UnsupportedVersion);
    }

    let decoded = BASE64.decode(payload).map_err(|_| MessageError::InvalidEncoding)?;
    let len = decoded.len();
    if !(MIN_DECODED_LEN..=MAX_DECODED_LEN).contains(&len) {
        return Err(MessageError::InvalidPayloadLength { len });
    }

    let Version::V2 = Version::from_byte(decoded[0])?;

    let Ok(nonce) = <[u8; NONCE_SIZE]>::try_from(&decoded[1..1 + NONCE_SIZE]) else {
        unreachable!("slice length is NONCE_SIZE by construction");
    };
    let ciphertext = &decoded[1 + NONCE_SIZE..len - MAC_SIZE];
    let mac = &decoded[len - MAC_SIZE..];

    let keys = MessageKeys::derive(conversation_key, &nonce);
    let expected = authenticate(keys.mac_key(), &nonce, ciphertext);
    if !bool::from(expected.as_slice().ct_eq(mac)) {
        return Err(MessageError::InvalidMac);
    }

    let mut buffer = ciphertext.to_vec();
    let mut cipher = ChaCha20::new(keys.cipher_key().into(), keys.cipher_nonce().into());
    cipher.apply_keystream(&mut buffer);

    padding::unpad(&buffer)
}

/// HMAC-SHA256 over `nonce || ciphertext`; the nonce acts as associated
/// data.
fn authenticate(
    mac_key: &[u8; 32],
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
) -> [u8; MAC_SIZE] {
    let Ok(mut mac) = HmacSha256::new_from_slice(mac_key) else {
        unreachable!("HMAC-SHA256 accepts any key size");
    };
    mac.update(nonce);
    mac.update(ciphertext);

    let mut tag = [0u8; MAC_SIZE];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    tag
}
