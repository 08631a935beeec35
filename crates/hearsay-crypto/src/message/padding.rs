//! Length-hiding padding.
//!
//! Exposing exact plaintext lengths leaks information (message types are
//! often distinguishable by byte count alone), so plaintexts are padded to
//! bucket boundaries: 32-byte steps up to 256 bytes, then steps of one
//! eighth of the next power of two. The padded buffer carries a 2-byte
//! big-endian length prefix followed by the plaintext and zero fill.

use super::error::MessageError;

/// Smallest padded length; everything below rounds up to one bucket.
const MIN_PADDED_LEN: usize = 32;

/// Size of the big-endian length prefix.
pub(crate) const LENGTH_PREFIX_SIZE: usize = 2;

/// Shortest encryptable plaintext.
pub const MIN_PLAINTEXT_LEN: usize = 1;

/// Longest encryptable plaintext (bounded by the u16 length prefix).
pub const MAX_PLAINTEXT_LEN: usize = 65535;

/// Padded length for a plaintext of `unpadded_len` bytes.
///
/// Lengths up to 32 round to 32. Above that, the bucket step is 32 bytes
/// while the next power of two is at most 256, then one eighth of the next
/// power of two. The step widens with the length so that no plaintext wastes
/// more than a fraction of its own size, while small messages stay
/// indistinguishable within a bucket.
pub fn calc_padded_len(unpadded_len: usize) -> usize {
    if unpadded_len <= MIN_PADDED_LEN {
        return MIN_PADDED_LEN;
    }

    // Smallest power of two strictly greater than unpadded_len - 1
    let next_pow2 = 1usize << (usize::BITS - (unpadded_len - 1).leading_zeros());
    let chunk = if next_pow2 <= 256 { 32 } else { next_pow2 / 8 };

    chunk * ((unpadded_len - 1) / chunk + 1)
}

/// Build the padded buffer: `u16_be(len) || plaintext || zero fill`.
///
/// # Errors
///
/// - `InvalidPlaintextLength` if the plaintext is empty or longer than the
///   length prefix can represent
pub(crate) fn pad(plaintext: &[u8]) -> Result<Vec<u8>, MessageError> {
    let len = plaintext.len();
    if !(MIN_PLAINTEXT_LEN..=MAX_PLAINTEXT_LEN).contains(&len) {
        return Err(MessageError::InvalidPlaintextLength { len });
    }

    let mut padded = vec![0u8; LENGTH_PREFIX_SIZE + calc_padded_len(len)];
    padded[0..LENGTH_PREFIX_SIZE].copy_from_slice(&(len as u16).to_be_bytes());
    padded[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + len].copy_from_slice(plaintext);

    Ok(padded)
}

/// Recover the plaintext from a padded buffer.
///
/// Validates the length prefix, that the buffer is exactly the bucket size
/// for that length, and that the fill is all zeros.
///
/// # Errors
///
/// - `InvalidPadding` on any violation. Only reachable after the envelope
///   MAC verified, so a failure here means a broken sender, not a forgery.
pub(crate) fn unpad(padded: &[u8]) -> Result<Vec<u8>, MessageError> {
    if padded.len() < LENGTH_PREFIX_SIZE + MIN_PADDED_LEN {
        return Err(MessageError::InvalidPadding);
    }

    let len = u16::from_be_bytes([padded[0], padded[1]]) as usize;
    if len < MIN_PLAINTEXT_LEN
        || padded.len() != LENGTH_PREFIX_SIZE + calc_padded_len(len)
        || padded[LENGTH_PREFIX_SIZE + len..].iter().any(|&byte| byte != 0)
    {
        return Err(MessageError::InvalidPadding);
    }

    Ok(padded[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_len_fixtures() {
        // Reference vectors; the 64 <-> 96 boundary is the easy one to get
        // subtly wrong.
        let fixtures = [
            (1, 32),
            (32, 32),
            (33, 64),
            (37, 64),
            (45, 64),
            (49, 64),
            (64, 64),
            (65, 96),
            (100, 128),
            (111, 128),
            (200, 224),
            (250, 256),
            (320, 320),
            (383, 384),
            (384, 384),
            (400, 448),
            (500, 512),
            (512, 512),
            (515, 640),
            (700, 768),
            (800, 896),
            (900, 1024),
            (1020, 1024),
            (65536, 65536),
            (65535, 65536),
        ];

        for (unpadded, expected) in fixtures {
            assert_eq!(
                calc_padded_len(unpadded),
                expected,
                "calc_padded_len({unpadded}) must be {expected}"
            );
        }
    }

    #[test]
    fn pad_unpad_roundtrip() {
        let plaintext = b"hello, hearsay";
        let padded = pad(plaintext).unwrap();
        let unpadded = unpad(&padded).unwrap();
        assert_eq!(unpadded, plaintext);
    }

    #[test]
    fn padded_buffer_has_bucket_length() {
        let plaintext = vec![0x61u8; 100];
        let padded = pad(&plaintext).unwrap();
        assert_eq!(padded.len(), 2 + 128);
    }

    #[test]
    fn prefix_encodes_plaintext_length() {
        let plaintext = vec![0x61u8; 300];
        let padded = pad(&plaintext).unwrap();
        assert_eq!(&padded[0..2], &300u16.to_be_bytes());
    }

    #[test]
    fn empty_plaintext_is_rejected() {
        assert_eq!(pad(b"").unwrap_err(), MessageError::InvalidPlaintextLength { len: 0 });
    }

    #[test]
    fn oversized_plaintext_is_rejected() {
        let plaintext = vec![0u8; MAX_PLAINTEXT_LEN + 1];
        assert_eq!(
            pad(&plaintext).unwrap_err(),
            MessageError::InvalidPlaintextLength { len: 65536 }
        );
    }

    #[test]
    fn max_plaintext_roundtrips() {
        let plaintext = vec![0x5Au8; MAX_PLAINTEXT_LEN];
        let padded = pad(&plaintext).unwrap();
        assert_eq!(padded.len(), 2 + 65536);
        assert_eq!(unpad(&padded).unwrap(), plaintext);
    }

    #[test]
    fn unpad_rejects_zero_length_prefix() {
        let buffer = vec![0u8; 2 + 32];
        assert_eq!(unpad(&buffer).unwrap_err(), MessageError::InvalidPadding);
    }

    #[test]
    fn unpad_rejects_prefix_exceeding_buffer() {
        let mut buffer = vec![0u8; 2 + 32];
        buffer[0..2].copy_from_slice(&1000u16.to_be_bytes());
        assert_eq!(unpad(&buffer).unwrap_err(), MessageError::InvalidPadding);
    }

    #[test]
    fn unpad_rejects_wrong_bucket_size() {
        // 40 plaintext bytes belong in the 64-byte bucket, not 96
        let mut buffer = vec![0u8; 2 + 96];
        buffer[0..2].copy_from_slice(&40u16.to_be_bytes());
        assert_eq!(unpad(&buffer).unwrap_err(), MessageError::InvalidPadding);
    }

    #[test]
    fn unpad_rejects_nonzero_fill() {
        let mut padded = pad(b"short").unwrap();
        let last = padded.len() - 1;
        padded[last] = 0x01;
        assert_eq!(unpad(&padded).unwrap_err(), MessageError::InvalidPadding);
    }

    #[test]
    fn unpad_rejects_truncated_buffer() {
        assert_eq!(unpad(&[0u8; 5]).unwrap_err(), MessageError::InvalidPadding);
    }

    #[test]
    fn plaintext_may_contain_any_byte_values() {
        let plaintext: Vec<u8> = (0u8..=255).collect();
        let padded = pad(&plaintext).unwrap();
        assert_eq!(unpad(&padded).unwrap(), plaintext);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrip(plaintext in proptest::collection::vec(any::<u8>(), 1..2048)) {
            let padded = pad(&plaintext).expect("length is in range");
            prop_assert_eq!(unpad(&padded).expect("own padding is valid"), plaintext);
        }

        #[test]
        fn padded_len_is_monotone(len in 1usize..65535) {
            prop_assert!(calc_padded_len(len + 1) >= calc_padded_len(len));
        }

        #[test]
        fn padded_len_covers_plaintext(len in 1usize..=65535) {
            prop_assert!(calc_padded_len(len) >= len);
        }

        #[test]
        fn bucket_is_multiple_of_32(len in 1usize..=65535) {
            prop_assert_eq!(calc_padded_len(len) % 32, 0);
        }
    }
}
