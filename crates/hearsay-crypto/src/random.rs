//! Randomness as an injected capability.
//!
//! The engines draw per-message nonces and KDF salts through [`RandomSource`]
//! instead of a global RNG, so deterministic tests can supply fixed bytes
//! while production uses the OS CSPRNG.

use rand::RngCore;

/// Source of cryptographically secure random bytes.
pub trait RandomSource {
    /// Fill `dest` entirely with random bytes.
    fn fill_bytes(&mut self, dest: &mut [u8]);
}

/// Operating-system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand::rngs::OsRng.fill_bytes(dest);
    }
}

/// Replays a fixed byte sequence, cycling when exhausted.
///
/// Deterministic stand-in for tests and reference vectors. MUST NOT be used
/// in production: repeating a nonce under one conversation key reuses the
/// key stream and breaks confidentiality.
#[derive(Debug, Clone)]
pub struct FixedRandom {
    bytes: Vec<u8>,
    position: usize,
}

impl FixedRandom {
    /// Create a source that cycles over `bytes`.
    ///
    /// An empty sequence is treated as a single zero byte so the source is
    /// total.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let mut bytes = bytes.into();
        if bytes.is_empty() {
            bytes.push(0);
        }
        Self { bytes, position: 0 }
    }
}

impl RandomSource for FixedRandom {
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = self.bytes[self.position % self.bytes.len()];
            self.position = self.position.wrapping_add(1);
        }
    }
}
