//! Shamir's (k,n) threshold secret sharing over a prime field
//!
//! A byte secret is framed with a marker byte and an even/odd XOR checksum,
//! read as a big integer, and used as the constant term of a random
//! polynomial over a freshly generated probable prime. Any `k` of the `n`
//! evaluated points reconstruct the secret through Lagrange interpolation;
//! fewer points, points from another share set or a wrong prime are caught by
//! the embedded checksum.
//!
//! # Quick Start
//!
//! ```
//! use prime_share::ThresholdScheme;
//!
//! // Create a scheme with 5 shares and threshold 3
//! let mut scheme = ThresholdScheme::new(5, 3).unwrap();
//!
//! // Split a secret
//! let secret = b"my secret data";
//! let set = scheme.split(secret).unwrap();
//!
//! // Hand out shares; keep the prime and the secret length alongside them
//! let prime = set.prime().clone();
//! let shares = set.select(&[1, 4, 5]).unwrap();
//!
//! // Reconstruct from 3 shares
//! let reconstructed = ThresholdScheme::reconstruct(&prime, &shares, secret.len()).unwrap();
//! assert_eq!(reconstructed, secret);
//! ```

mod config;
pub mod encoding;
mod error;
pub mod finite_field;
mod shamir;

pub use config::{Config, SplitMode};
pub use error::{ErrorKind, IntegrityFailure, Result, SharingError};
pub use shamir::{
    Share, ShareSet, ThresholdScheme, ThresholdSchemeBuilder, generate, generate_default,
    reconstruct,
};

// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        Config, ErrorKind, Result, Share, ShareSet, SharingError, SplitMode, ThresholdScheme,
        generate, reconstruct,
    };
}
