//! Conversation key derivation using x-only ECDH and HKDF.

use std::fmt;

use hkdf::Hkdf;
use secp256k1::{Parity, PublicKey, SecretKey, XOnlyPublicKey};
use sha2::Sha256;
use zeroize::Zeroize;

use super::error::MessageError;

/// Salt label separating this scheme from other users of the curve.
const CONVERSATION_SALT: &[u8] = b"nip44-v2";

/// Shared 32-byte secret between two key pairs.
///
/// Symmetric and order-independent: deriving from (A's secret key, B's
/// public key) yields the same bytes as (B's secret key, A's public key),
/// which is what lets both parties agree on a key without transmitting it.
/// Derived once per sender/recipient pair; callers may cache it as an opaque
/// 32-byte value.
#[derive(Clone)]
pub struct ConversationKey([u8; 32]);

impl ConversationKey {
    /// Derive the conversation key for a (secret key, x-only public key)
    /// pair.
    ///
    /// Computes the shared x-only point via scalar multiplication, then
    /// applies HKDF-SHA256 extract with a fixed salt label over the shared
    /// x-coordinate. The x-only public key is lifted to the even-parity
    /// point.
    ///
    /// # Errors
    ///
    /// - `InvalidPublicKey`: `public_key` is not the x-coordinate of a curve
    ///   point
    /// - `InvalidPrivateKey`: `secret_key` is zero or not below the group
    ///   order
    pub fn derive(
        secret_key: &[u8; 32],
        public_key: &[u8; 32],
    ) -> Result<Self, MessageError> {
        let secret =
            SecretKey::from_slice(secret_key).map_err(|_| MessageError::InvalidPrivateKey)?;
        let remote =
            XOnlyPublicKey::from_slice(public_key).map_err(|_| MessageError::InvalidPublicKey)?;
        let remote = PublicKey::from_x_only_public_key(remote, Parity::Even);

        // 64 bytes: x || y of the shared point. Only x feeds the KDF.
        let mut shared_point = secp256k1::ecdh::shared_secret_point(&remote, &secret);
        let (prk, _) = Hkdf::<Sha256>::extract(Some(CONVERSATION_SALT), &shared_point[..32]);
        shared_point.zeroize();

        let mut key = [0u8; 32];
        key.copy_from_slice(&prk);
        Ok(Self(key))
    }

    /// Wrap a previously derived conversation key.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw 32-byte secret.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Drop for ConversationKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// Keeps the key bytes out of logs and assertion messages.
impl fmt::Debug for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConversationKey(..)")
    }
}
