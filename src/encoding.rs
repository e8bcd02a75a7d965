//! Integrity framing of a secret before it becomes a field element.
//!
//! The frame is `[0x01, xor_even, xor_odd] ++ secret`, read as a big-endian
//! unsigned integer. The leading marker keeps leading zero bytes of the
//! secret significant; the two XOR bytes let reconstruction detect a wrong
//! prime or too few shares with a false-accept rate of about 2^-16.

use num_bigint::BigUint;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

use crate::error::{IntegrityFailure, Result, SharingError};

/// Leading marker byte of every encoded frame
pub const MARKER: u8 = 0x01;

/// Bytes prepended to the secret (marker plus two checksum bytes)
pub const FRAME_OVERHEAD: usize = 3;

/// XOR of the even-indexed bytes and XOR of the odd-indexed bytes (0-based)
///
/// # Example
/// ```
/// use prime_share::encoding::checksum;
///
/// assert_eq!(checksum(&[0x0F, 0xF0, 0x01]), [0x0E, 0xF0]);
/// assert_eq!(checksum(&[]), [0, 0]);
/// ```
pub fn checksum(bytes: &[u8]) -> [u8; 2] {
    let mut xors = [0u8; 2];
    for (i, b) in bytes.iter().enumerate() {
        xors[i % 2] ^= b;
    }
    xors
}

/// Frames `secret` and interprets the frame as a non-negative integer.
pub fn encode(secret: &[u8]) -> BigUint {
    let [even, odd] = checksum(secret);

    let mut frame = Vec::with_capacity(FRAME_OVERHEAD + secret.len());
    frame.extend_from_slice(&[MARKER, even, odd]);
    frame.extend_from_slice(secret);

    let value = BigUint::from_bytes_be(&frame);
    #[cfg(feature = "zeroize")]
    frame.zeroize();
    value
}

/// Recovers the secret from a reconstructed field element.
///
/// A genuine frame starts with the non-zero marker, so its big-endian form is
/// exactly `original_length + 3` bytes. Any other width is rejected before the
/// marker and checksums are checked.
///
/// # Errors
/// Returns `SharingError::IntegrityCheckFailed` when the value is wider than
/// the frame, narrower than the frame (the marker position would be zero), the
/// marker is wrong, or the checksum does not match. An `original_length` too
/// large to frame is a `Length` failure.
///
/// # Example
/// ```
/// use prime_share::encoding::{decode, encode};
///
/// let value = encode(b"\x00\x00key");
/// assert_eq!(decode(&value, 5).unwrap(), b"\x00\x00key");
/// ```
pub fn decode(value: &BigUint, original_length: usize) -> Result<Vec<u8>> {
    let Some(frame_len) = original_length.checked_add(FRAME_OVERHEAD) else {
        return Err(SharingError::IntegrityCheckFailed(IntegrityFailure::Length));
    };

    let mut frame = value.to_bytes_be();
    if frame.len() != frame_len {
        let failure = if frame.len() > frame_len {
            IntegrityFailure::Length
        } else {
            IntegrityFailure::Marker
        };
        #[cfg(feature = "zeroize")]
        frame.zeroize();
        return Err(SharingError::IntegrityCheckFailed(failure));
    }

    let (header, secret) = frame.split_at(FRAME_OVERHEAD);
    let [even, odd] = checksum(secret);

    // Accumulate differences without early exit
    let marker_diff = header[0] ^ MARKER;
    let checksum_diff = (header[1] ^ even) | (header[2] ^ odd);

    let result = if marker_diff != 0 {
        Err(SharingError::IntegrityCheckFailed(IntegrityFailure::Marker))
    } else if checksum_diff != 0 {
        Err(SharingError::IntegrityCheckFailed(IntegrityFailure::Checksum))
    } else {
        Ok(secret.to_vec())
    };

    #[cfg(feature = "zeroize")]
    frame.zeroize();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let value = encode(b"hi");
        // 'h' = 0x68, 'i' = 0x69
        assert_eq!(value.to_bytes_be(), vec![0x01, 0x68, 0x69, 0x68, 0x69]);

        let value = encode(&[0x00]);
        assert_eq!(value.to_bytes_be(), vec![0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_checksum_even_odd_split() {
        assert_eq!(checksum(&[1, 2, 4, 8, 16]), [1 ^ 4 ^ 16, 2 ^ 8]);
        assert_eq!(checksum(&[0xAA]), [0xAA, 0x00]);
    }

    #[test]
    fn test_decode_round_trip() {
        for secret in [&b"x"[..], &b"hello world"[..], &[0u8; 16][..], &[0xFF; 7][..]] {
            let value = encode(secret);
            assert_eq!(decode(&value, secret.len()).unwrap(), secret);
        }
    }

    #[test]
    fn test_decode_short_value_fails_marker() {
        // A frame that lost its leading bytes has a zero where the marker goes
        let value = BigUint::from(0u32);
        assert!(matches!(
            decode(&value, 1),
            Err(SharingError::IntegrityCheckFailed(IntegrityFailure::Marker))
        ));
    }

    #[test]
    fn test_decode_rejects_wide_value() {
        let value = encode(b"abcd");
        assert!(matches!(
            decode(&value, 3),
            Err(SharingError::IntegrityCheckFailed(IntegrityFailure::Length))
        ));
    }

    #[test]
    fn test_decode_short_length_misaligns_marker() {
        // Declaring a longer original length shifts the marker right
        let value = encode(b"abcd");
        assert!(matches!(
            decode(&value, 5),
            Err(SharingError::IntegrityCheckFailed(IntegrityFailure::Marker))
        ));
    }

    #[test]
    fn test_decode_detects_checksum_mismatch() {
        let mut frame = vec![MARKER];
        frame.extend_from_slice(&checksum(b"secret"));
        frame.extend_from_slice(b"secreT");
        let value = BigUint::from_bytes_be(&frame);

        assert!(matches!(
            decode(&value, 6),
            Err(SharingError::IntegrityCheckFailed(IntegrityFailure::Checksum))
        ));
    }

    #[test]
    fn test_decode_bad_marker() {
        let mut frame = vec![0x02];
        frame.extend_from_slice(&checksum(b"secret"));
        frame.extend_from_slice(b"secret");
        let value = BigUint::from_bytes_be(&frame);

        assert!(matches!(
            decode(&value, 6),
            Err(SharingError::IntegrityCheckFailed(IntegrityFailure::Marker))
        ));
    }

    #[test]
    fn test_decode_oversized_length() {
        let value = encode(b"hi");

        for length in [usize::MAX, usize::MAX - 2, usize::MAX - 3, 1 << 40] {
            let err = decode(&value, length).unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::Integrity, "length {length}");
        }
        assert!(matches!(
            decode(&value, usize::MAX),
            Err(SharingError::IntegrityCheckFailed(IntegrityFailure::Length))
        ));
    }
}
