use std::fmt;
use thiserror::Error;

/// Which part of the encoded frame failed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityFailure {
    /// The reconstructed value does not fit in `original_length + 3` bytes
    Length,
    /// The leading marker byte is not `0x01`
    Marker,
    /// The even/odd XOR checksum does not match the payload
    Checksum,
}

impl fmt::Display for IntegrityFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Length => "value wider than the encoded frame",
            Self::Marker => "marker byte mismatch",
            Self::Checksum => "checksum mismatch",
        };
        f.write_str(reason)
    }
}

/// Coarse classification of [`SharingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed request parameters, detected before any computation
    Validation,
    /// Two shares carry the same x-coordinate
    DuplicateShare,
    /// Attempted to invert zero in the prime field
    DivisionByZero,
    /// The reconstructed value failed the marker/checksum check
    Integrity,
    /// The operating system random source could not be read
    RandomSource,
}

/// Error type for threshold secret sharing operations
#[derive(Error, Debug)]
pub enum SharingError {
    /// The secret to split is empty
    #[error("Secret must not be empty")]
    EmptySecret,

    /// The secret exceeds the configured maximum length
    #[error("Secret of {len} bytes exceeds the maximum of {max} bytes")]
    SecretTooLong { len: usize, max: usize },

    /// Threshold below the minimum of 2
    #[error("Invalid threshold value {0}, must be at least 2")]
    InvalidThreshold(u32),

    /// Threshold exceeds total shares
    #[error("Threshold {threshold} exceeds total shares {total_shares}")]
    ThresholdTooLarge { threshold: u32, total_shares: u32 },

    /// The share count does not fit in the field generated for the secret
    #[error("{total_shares} shares do not fit in a {field_bits}-bit field")]
    TooManyShares { total_shares: u32, field_bits: u64 },

    /// Insufficient shares for reconstruction
    #[error("Need at least {needed} shares, got {got}")]
    InsufficientShares { needed: u32, got: u32 },

    /// x = 0 is the secret's own point and never a valid share
    #[error("Share index 0 is reserved for the secret")]
    ReservedShareIndex,

    /// No share with this index exists in the set
    #[error("Unknown share index {0}")]
    UnknownShareIndex(u32),

    /// The supplied modulus cannot be a prime
    #[error("Invalid prime modulus")]
    InvalidPrime,

    /// Two shares have the same x-coordinate
    #[error("Duplicate share index {0}")]
    DuplicateShare(u32),

    /// Modular inverse of zero
    #[error("Division by zero in the prime field")]
    DivisionByZero,

    /// Data integrity check failed
    #[error("Data integrity check failed: {0}")]
    IntegrityCheckFailed(IntegrityFailure),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Random source error: {0}")]
    RandomSource(String),
}

impl SharingError {
    /// Returns the taxonomy bucket this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateShare(_) => ErrorKind::DuplicateShare,
            Self::DivisionByZero => ErrorKind::DivisionByZero,
            Self::IntegrityCheckFailed(_) => ErrorKind::Integrity,
            Self::RandomSource(_) => ErrorKind::RandomSource,
            Self::EmptySecret
            | Self::SecretTooLong { .. }
            | Self::InvalidThreshold(_)
            | Self::ThresholdTooLarge { .. }
            | Self::TooManyShares { .. }
            | Self::InsufficientShares { .. }
            | Self::ReservedShareIndex
            | Self::UnknownShareIndex(_)
            | Self::InvalidPrime
            | Self::InvalidConfig(_) => ErrorKind::Validation,
        }
    }
}

pub type Result<T> = std::result::Result<T, SharingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(SharingError::EmptySecret.kind(), ErrorKind::Validation);
        assert_eq!(
            SharingError::ThresholdTooLarge {
                threshold: 4,
                total_shares: 3
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            SharingError::DuplicateShare(2).kind(),
            ErrorKind::DuplicateShare
        );
        assert_eq!(
            SharingError::IntegrityCheckFailed(IntegrityFailure::Marker).kind(),
            ErrorKind::Integrity
        );
        assert_eq!(SharingError::DivisionByZero.kind(), ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_messages_name_the_failed_check() {
        let err = SharingError::IntegrityCheckFailed(IntegrityFailure::Checksum);
        assert_eq!(err.to_string(), "Data integrity check failed: checksum mismatch");

        let err = SharingError::InsufficientShares { needed: 1, got: 0 };
        assert_eq!(err.to_string(), "Need at least 1 shares, got 0");
    }
}
