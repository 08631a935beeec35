//! Fuzz target for conversation envelope decryption
//!
//! Feeds arbitrary text through the full decrypt path: version escape,
//! base64 decode, length bounds, MAC verification, unpadding.
//!
//! # Strategy
//!
//! - Random strings: completely arbitrary UTF-8 (general malformation)
//! - Mutated envelopes: valid payloads with injected byte flips
//! - Arbitrary conversation keys alongside arbitrary payloads
//!
//! # Invariants
//!
//! - Decrypt NEVER panics on malformed input
//! - Every failure is one of the tagged error kinds
//! - A forged payload never yields plaintext

#![no_main]

use arbitrary::Arbitrary;
use hearsay_crypto::message::{ConversationKey, decrypt, encrypt_with_nonce};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct DecryptScenario {
    key: [u8; 32],
    input: Input,
}

#[derive(Debug, Clone, Arbitrary)]
enum Input {
    /// Arbitrary text straight into decrypt
    Raw(String),
    /// A genuine envelope with one byte of the text form replaced
    Mutated { plaintext: Vec<u8>, nonce: [u8; 32], position: usize, replacement: char },
}

fuzz_target!(|scenario: DecryptScenario| {
    let key = ConversationKey::from_bytes(scenario.key);

    let payload = match scenario.input {
        Input::Raw(text) => text,
        Input::Mutated { plaintext, nonce, position, replacement } => {
            let Ok(payload) = encrypt_with_nonce(&plaintext, &key, &nonce) else {
                // Plaintext length out of range; nothing to mutate
                return;
            };
            let mut chars: Vec<char> = payload.chars().collect();
            let index = position % chars.len();
            chars[index] = replacement;
            chars.into_iter().collect()
        },
    };

    // Must return Ok or a tagged error, never panic
    let _ = decrypt(&payload, &key);
});
