//! Error types for the password key-encryption envelope.

use thiserror::Error;

/// Errors from key-encryption envelope processing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeywrapError {
    /// Private key is not exactly 32 bytes
    #[error("invalid private key length: {len} (expected 32)")]
    InvalidPrivateKeyLength {
        /// Length of the rejected key
        len: usize,
    },

    /// KDF cost exponent outside the accepted range.
    ///
    /// Rejected before any expensive computation; guards against envelopes
    /// that would demand pathological amounts of memory.
    #[error("invalid cost parameter: log_n = {log_n} (accepted 1..=22)")]
    InvalidCostParameter {
        /// The rejected exponent
        log_n: u8,
    },

    /// Envelope is not a valid bech32 string
    #[error("invalid bech32 encoding")]
    InvalidEncoding,

    /// Envelope carries the wrong human-readable prefix
    #[error("invalid prefix: expected {expected}, got {got}")]
    InvalidPrefix {
        /// Prefix this implementation accepts
        expected: &'static str,
        /// Prefix found on the wire
        got: String,
    },

    /// Envelope version is not understood by this implementation
    #[error("unsupported envelope version")]
    UnsupportedVersion,

    /// Decoded envelope is not the fixed frame size
    #[error("invalid payload length: {len}")]
    InvalidPayloadLength {
        /// Decoded length of the rejected envelope
        len: usize,
    },

    /// Key-security byte outside the defined set {0, 1, 2}
    #[error("unsupported key security byte: {byte:#04x}")]
    UnsupportedKeySecurity {
        /// The rejected byte
        byte: u8,
    },

    /// Wrong password or corrupted envelope.
    ///
    /// Deliberately a single opaque kind: distinguishing the two cases would
    /// hand an attacker a brute-force oracle.
    #[error("decryption failed")]
    DecryptionFailed,
}
