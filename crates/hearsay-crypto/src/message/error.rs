//! Error types for the conversation encryption engine.
//!
//! Every failure is returned as data and is per-call: no global state is
//! corrupted, and a failed decrypt never yields partial plaintext. Variants
//! carry the minimal context needed for logging and never echo key material,
//! passwords or plaintext.

use thiserror::Error;

/// Errors from conversation key derivation and envelope processing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Remote public key is not a point on the curve
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Local private key is not a valid scalar (zero or not below the group
    /// order)
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// Plaintext length cannot be represented by the padding scheme
    #[error("invalid plaintext length: {len} (must be 1..=65535)")]
    InvalidPlaintextLength {
        /// Length of the rejected plaintext
        len: usize,
    },

    /// Envelope is the empty string
    #[error("empty payload")]
    EmptyPayload,

    /// Envelope version is not understood by this implementation
    #[error("unsupported envelope version")]
    UnsupportedVersion,

    /// Envelope is not valid standard base64
    #[error("invalid base64 encoding")]
    InvalidEncoding,

    /// Decoded envelope length is outside the protocol bounds
    #[error("invalid payload length: {len}")]
    InvalidPayloadLength {
        /// Decoded length of the rejected envelope
        len: usize,
    },

    /// Authentication tag mismatch.
    ///
    /// Surfaced as a single generic kind with no further detail; the check
    /// itself runs in constant time.
    #[error("invalid mac")]
    InvalidMac,

    /// Malformed padding on an authenticated message.
    ///
    /// Only reachable after the MAC verified, so it indicates a broken
    /// sender rather than a forgery.
    #[error("invalid padding")]
    InvalidPadding,
}
