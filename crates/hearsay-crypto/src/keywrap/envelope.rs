//! Envelope framing for password-encrypted private keys.
//!
//! Decoded wire layout (91 bytes):
//!
//! ```text
//! byte 0        version = 0x02
//! byte 1        log2(scrypt cost)
//! bytes 2..18   salt (16 bytes)
//! bytes 18..42  nonce (24 bytes)
//! byte 42       key-security flag (0 insecure, 1 secure, 2 unknown)
//! bytes 43..91  ciphertext || Poly1305 tag
//! ```
//!
//! The frame is bech32-encoded under the `ncryptsec` human-readable prefix.

use std::ops::RangeInclusive;

use bech32::{Bech32, Hrp};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use scrypt::Params;
use zeroize::Zeroize;

use super::error::KeywrapError;
use super::normalize::normalize;
use crate::random::{OsRandom, RandomSource};

/// Human-readable prefix of the textual envelope form.
pub const KEYWRAP_HRP: &str = "ncryptsec";

/// Wire version byte.
const VERSION: u8 = 0x02;

/// Default scrypt cost exponent for new envelopes (N = 2^16).
pub const DEFAULT_LOG_N: u8 = 16;

/// Accepted cost exponents, enforced on both encrypt and decrypt.
const LOG_N_RANGE: RangeInclusive<u8> = 1..=22;

/// scrypt block size, fixed by the format.
const SCRYPT_R: u32 = 8;

/// scrypt parallelism, fixed by the format.
const SCRYPT_P: u32 = 1;

const SALT_SIZE: usize = 16;
const NONCE_SIZE: usize = 24;
const KEY_SIZE: usize = 32;
const TAG_SIZE: usize = 16;

/// Fixed decoded frame size.
const FRAME_SIZE: usize = 1 + 1 + SALT_SIZE + NONCE_SIZE + 1 + KEY_SIZE + TAG_SIZE;

/// Whether the wrapped key is known to have left secure storage.
///
/// Authenticated as associated data, so the flag cannot be swapped on the
/// wire without failing decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySecurity {
    /// The key is known to have left secure storage.
    Insecure,
    /// The key has never left secure storage.
    Secure,
    /// Handling history unknown.
    Unknown,
}

impl KeySecurity {
    /// Wire byte for this flag.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Insecure => 0x00,
            Self::Secure => 0x01,
            Self::Unknown => 0x02,
        }
    }

    /// Parse a wire byte.
    ///
    /// # Errors
    ///
    /// - `UnsupportedKeySecurity` for bytes outside {0, 1, 2}
    pub fn from_byte(byte: u8) -> Result<Self, KeywrapError> {
        match byte {
            0x00 => Ok(Self::Insecure),
            0x01 => Ok(Self::Secure),
            0x02 => Ok(Self::Unknown),
            _ => Err(KeywrapError::UnsupportedKeySecurity { byte }),
        }
    }
}

/// Encrypt `private_key` under `password` with fresh random salt and nonce.
///
/// Returns the textual `ncryptsec` envelope. The scrypt cost is `2^log_n`
/// (use [`DEFAULT_LOG_N`] unless the caller has a reason to trade
/// differently between latency and brute-force resistance).
///
/// # Errors
///
/// - `InvalidPrivateKeyLength` if the key is not exactly 32 bytes
/// - `InvalidCostParameter` if `log_n` is outside 1..=22
pub fn encrypt_key(
    private_key: &[u8],
    password: &str,
    log_n: u8,
    security: KeySecurity,
) -> Result<String, KeywrapError> {
    encrypt_key_with_rng(private_key, password, log_n, security, &mut OsRandom)
}

/// [`encrypt_key`] drawing salt and nonce from a caller-supplied
/// [`RandomSource`].
pub fn encrypt_key_with_rng(
    private_key: &[u8],
    password: &str,
    log_n: u8,
    security: KeySecurity,
    rng: &mut impl RandomSource,
) -> Result<String, KeywrapError> {
    if private_key.len() != KEY_SIZE {
        return Err(KeywrapError::InvalidPrivateKeyLength { len: private_key.len() });
    }
    if !LOG_N_RANGE.contains(&log_n) {
        return Err(KeywrapError::InvalidCostParameter { log_n });
    }

    let mut salt = [0u8; SALT_SIZE];
    rng.fill_bytes(&mut salt);
    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce);

    let mut key = derive_key(password, &salt, log_n);
    let cipher = XChaCha20Poly1305::new((&key).into());
    let security_byte = security.as_byte();
    let sealed = cipher.encrypt(
        XNonce::from_slice(&nonce),
        Payload { msg: private_key, aad: &[security_byte] },
    );
    key.zeroize();
    let Ok(ciphertext) = sealed else {
        unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    let mut frame = Vec::with_capacity(FRAME_SIZE);
    frame.push(VERSION);
    frame.push(log_n);
    frame.extend_from_slice(&salt);
    frame.extend_from_slice(&nonce);
    frame.push(security_byte);
    frame.extend_from_slice(&ciphertext);
    debug_assert_eq!(frame.len(), FRAME_SIZE);

    let Ok(text) = bech32::encode::<Bech32>(keywrap_hrp(), &frame) else {
        unreachable!("fixed 91-byte frame is within the bech32 code length");
    };
    Ok(text)
}

/// Decrypt a textual envelope, returning the 32-byte private key.
///
/// # Errors
///
/// - `InvalidEncoding`: not a valid bech32 string
/// - `InvalidPrefix`: human-readable prefix is not `ncryptsec`
/// - `InvalidPayloadLength`: decoded frame is not 91 bytes
/// - `UnsupportedVersion`: unknown version byte
/// - `InvalidCostParameter`: embedded cost outside 1..=22, rejected before
///   the KDF runs
/// - `UnsupportedKeySecurity`: flag byte outside {0, 1, 2}
/// - `DecryptionFailed`: wrong password or corrupted envelope, deliberately
///   indistinguishable
pub fn decrypt_key(envelope: &str, password: &str) -> Result<Vec<u8>, KeywrapError> {
    let frame = decode_frame(envelope)?;

    let log_n = frame[1];
    if !LOG_N_RANGE.contains(&log_n) {
        return Err(KeywrapError::InvalidCostParameter { log_n });
    }
    let Ok(salt) = <[u8; SALT_SIZE]>::try_from(&frame[2..2 + SALT_SIZE]) else {
        unreachable!("slice length is SALT_SIZE by construction");
    };
    let nonce = &frame[2 + SALT_SIZE..2 + SALT_SIZE + NONCE_SIZE];
    let security_byte = frame[42];
    let _ = KeySecurity::from_byte(security_byte)?;
    let ciphertext = &frame[43..];

    let mut key = derive_key(password, &salt, log_n);
    let cipher = XChaCha20Poly1305::new((&key).into());
    let opened = cipher.decrypt(
        XNonce::from_slice(nonce),
        Payload { msg: ciphertext, aad: &[security_byte] },
    );
    key.zeroize();

    opened.map_err(|_| KeywrapError::DecryptionFailed)
}

/// Read the key-security flag without running the KDF.
///
/// Cheap metadata peek for callers that display how a key was handled
/// before asking for the password. The flag is only authenticated once
/// [`decrypt_key`] succeeds.
pub fn key_security(envelope: &str) -> Result<KeySecurity, KeywrapError> {
    let frame = decode_frame(envelope)?;
    KeySecurity::from_byte(frame[42])
}

/// Decode the bech32 text and validate prefix, frame size and version.
fn decode_frame(envelope: &str) -> Result<Vec<u8>, KeywrapError> {
    let (hrp, frame) =
        bech32::decode(envelope).map_err(|_| KeywrapError::InvalidEncoding)?;
    if hrp != keywrap_hrp() {
        return Err(KeywrapError::InvalidPrefix {
            expected: KEYWRAP_HRP,
            got: hrp.to_string(),
        });
    }
    let len = frame.len();
    if len != FRAME_SIZE {
        return Err(KeywrapError::InvalidPayloadLength { len });
    }
    if frame[0] != VERSION {
        return Err(KeywrapError::UnsupportedVersion);
    }
    Ok(frame)
}

/// scrypt with the format's fixed block size and parallelism.
fn derive_key(password: &str, salt: &[u8; SALT_SIZE], log_n: u8) -> [u8; KEY_SIZE] {
    let mut normalized = normalize(password);

    let Ok(params) = Params::new(log_n, SCRYPT_R, SCRYPT_P, KEY_SIZE) else {
        unreachable!("cost exponent is bounds-checked and r/p are fixed");
    };

    let mut key = [0u8; KEY_SIZE];
    let Ok(()) = scrypt::scrypt(normalized.as_bytes(), salt, &params, &mut key) else {
        unreachable!("32 bytes is a valid scrypt output length");
    };
    normalized.zeroize();

    key
}

fn keywrap_hrp() -> Hrp {
    let Ok(hrp) = Hrp::parse(KEYWRAP_HRP) else {
        unreachable!("static HRP is valid");
    };
    hrp
}
