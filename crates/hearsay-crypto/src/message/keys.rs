//! Per-message key derivation.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use super::conversation::ConversationKey;

/// HKDF output length: cipher key + cipher nonce + MAC key.
const EXPANDED_LEN: usize = 32 + 12 + 32;

/// One-time keys for a single envelope.
///
/// Derived from (conversation key, per-message nonce) and used for exactly
/// one encrypt or decrypt operation. Zeroized on drop.
pub struct MessageKeys {
    cipher_key: [u8; 32],
    cipher_nonce: [u8; 12],
    mac_key: [u8; 32],
}

impl MessageKeys {
    /// Derive the message keys for `nonce`.
    ///
    /// HKDF-SHA256 expand with the conversation key as the PRK and the nonce
    /// as the info parameter; 76 bytes of output are sliced into cipher key,
    /// cipher nonce and MAC key in that order.
    ///
    /// Deterministic: the same (conversation key, nonce) pair always yields
    /// the same keys. That is what makes decryption possible, and why a
    /// nonce must never repeat for a given conversation key.
    pub fn derive(conversation_key: &ConversationKey, nonce: &[u8; 32]) -> Self {
        let Ok(hkdf) = Hkdf::<Sha256>::from_prk(conversation_key.as_bytes()) else {
            unreachable!("32 bytes is a valid HKDF-SHA256 PRK length");
        };

        let mut expanded = [0u8; EXPANDED_LEN];
        let Ok(()) = hkdf.expand(nonce, &mut expanded) else {
            unreachable!("76 bytes is a valid HKDF-SHA256 output length");
        };

        let mut keys =
            Self { cipher_key: [0u8; 32], cipher_nonce: [0u8; 12], mac_key: [0u8; 32] };
        keys.cipher_key.copy_from_slice(&expanded[0..32]);
        keys.cipher_nonce.copy_from_slice(&expanded[32..44]);
        keys.mac_key.copy_from_slice(&expanded[44..76]);
        expanded.zeroize();

        keys
    }

    /// 32-byte ChaCha20 key.
    pub fn cipher_key(&self) -> &[u8; 32] {
        &self.cipher_key
    }

    /// 12-byte ChaCha20 nonce.
    pub fn cipher_nonce(&self) -> &[u8; 12] {
        &self.cipher_nonce
    }

    /// 32-byte HMAC-SHA256 key.
    pub fn mac_key(&self) -> &[u8; 32] {
        &self.mac_key
    }
}

impl Drop for MessageKeys {
    fn drop(&mut self) {
        self.cipher_key.zeroize();
        self.cipher_nonce.zeroize();
        self.mac_key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation_key() -> ConversationKey {
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = i as u8;
        }
        ConversationKey::from_bytes(bytes)
    }

    #[test]
    fn derivation_is_deterministic() {
        let key = conversation_key();
        let nonce = [0x42u8; 32];

        let first = MessageKeys::derive(&key, &nonce);
        let second = MessageKeys::derive(&key, &nonce);

        assert_eq!(first.cipher_key(), second.cipher_key());
        assert_eq!(first.cipher_nonce(), second.cipher_nonce());
        assert_eq!(first.mac_key(), second.mac_key());
    }

    #[test]
    fn different_nonces_produce_different_keys() {
        let key = conversation_key();

        let keys_a = MessageKeys::derive(&key, &[0x01u8; 32]);
        let keys_b = MessageKeys::derive(&key, &[0x02u8; 32]);

        assert_ne!(keys_a.cipher_key(), keys_b.cipher_key());
        assert_ne!(keys_a.cipher_nonce(), keys_b.cipher_nonce());
        assert_ne!(keys_a.mac_key(), keys_b.mac_key());
    }

    #[test]
    fn different_conversation_keys_produce_different_keys() {
        let nonce = [0x07u8; 32];

        let keys_a = MessageKeys::derive(&ConversationKey::from_bytes([0x01; 32]), &nonce);
        let keys_b = MessageKeys::derive(&ConversationKey::from_bytes([0x02; 32]), &nonce);

        assert_ne!(keys_a.cipher_key(), keys_b.cipher_key());
        assert_ne!(keys_a.mac_key(), keys_b.mac_key());
    }

    #[test]
    fn fields_are_distinct_slices_of_the_expansion() {
        // The three fields come from disjoint regions of one HKDF output, so
        // no field should equal another even for pathological inputs.
        let keys = MessageKeys::derive(&ConversationKey::from_bytes([0u8; 32]), &[0u8; 32]);
        assert_ne!(keys.cipher_key(), keys.mac_key());
        assert_ne!(&keys.cipher_key()[..12], keys.cipher_nonce().as_slice());
    }
}
