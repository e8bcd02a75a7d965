use crate::config::{Config, SplitMode};
use crate::encoding;
use crate::error::{Result, SharingError};
use crate::finite_field::{
    eval_polynomial_mod, generate_prime, mod_inverse, mod_sub, random_below_bits, wipe,
};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::rngs::OsRng;
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// A share in Shamir's Secret Sharing scheme
///
/// A point `(x, y)` on the sharing polynomial, with `y` reduced modulo the
/// prime of the share set it came from. `x` is never zero.
///
/// # Example
/// ```
/// use prime_share::ThresholdScheme;
///
/// let mut scheme = ThresholdScheme::builder(5, 3).build().unwrap();
/// let set = scheme.split(b"secret").unwrap();
/// let share = set.get(1).unwrap();
///
/// assert_eq!(share.x, 1);
/// assert!(&share.y < set.prime());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Share {
    /// x-coordinate on the polynomial (1-based)
    pub x: u32,
    /// Polynomial value at `x`, modulo the prime
    pub y: BigUint,
}

/// The output of one generation call: the prime, the original secret length
/// and the shares keyed by their x-coordinate.
///
/// The prime and the secret length are needed again at reconstruction time,
/// so callers that persist shares must record both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSet {
    prime: BigUint,
    secret_len: usize,
    shares: HashMap<u32, BigUint>,
}

impl ShareSet {
    /// Assembles a share set from parts recorded by a caller.
    ///
    /// # Errors
    /// - `SharingError::InvalidPrime` if `prime < 2`
    /// - `SharingError::ReservedShareIndex` if a share has `x = 0`
    /// - `SharingError::DuplicateShare` if two shares have the same `x`
    pub fn from_parts(
        prime: BigUint,
        secret_len: usize,
        shares: impl IntoIterator<Item = Share>,
    ) -> Result<Self> {
        if prime < BigUint::from(2u32) {
            return Err(SharingError::InvalidPrime);
        }

        let mut map = HashMap::new();
        for share in shares {
            if share.x == 0 {
                return Err(SharingError::ReservedShareIndex);
            }
            if map.insert(share.x, share.y).is_some() {
                return Err(SharingError::DuplicateShare(share.x));
            }
        }

        Ok(Self {
            prime,
            secret_len,
            shares: map,
        })
    }

    /// The prime modulus shared by every share in the set
    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    /// Byte length of the original secret
    pub fn secret_len(&self) -> usize {
        self.secret_len
    }

    /// Number of shares in the set
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Whether the set holds no shares
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Whether the set holds a share at `x`
    pub fn contains(&self, x: u32) -> bool {
        self.shares.contains_key(&x)
    }

    /// Returns the share at `x`, if present
    pub fn get(&self, x: u32) -> Option<Share> {
        self.shares.get(&x).map(|y| Share { x, y: y.clone() })
    }

    /// All shares, ordered by x-coordinate
    pub fn to_vec(&self) -> Vec<Share> {
        let mut shares: Vec<Share> = self
            .shares
            .iter()
            .map(|(&x, y)| Share { x, y: y.clone() })
            .collect();
        shares.sort_unstable_by_key(|share| share.x);
        shares
    }

    /// Picks the shares with the given x-coordinates, in the given order.
    ///
    /// # Errors
    /// Returns `SharingError::UnknownShareIndex` for an x not in the set.
    pub fn select(&self, xs: &[u32]) -> Result<Vec<Share>> {
        xs.iter()
            .map(|&x| self.get(x).ok_or(SharingError::UnknownShareIndex(x)))
            .collect()
    }

    /// Reconstructs the secret from the shares at the given x-coordinates
    ///
    /// # Example
    /// ```
    /// use prime_share::ThresholdScheme;
    ///
    /// let mut scheme = ThresholdScheme::new(5, 3).unwrap();
    /// let set = scheme.split(b"launch code").unwrap();
    /// assert_eq!(set.reconstruct_from(&[1, 3, 5]).unwrap(), b"launch code");
    /// ```
    pub fn reconstruct_from(&self, xs: &[u32]) -> Result<Vec<u8>> {
        let shares = self.select(xs)?;
        reconstruct(&self.prime, &shares, self.secret_len)
    }
}

/// The random sharing polynomial, constant term first.
///
/// Coefficients are overwritten when the polynomial is dropped and never leave
/// this module.
struct Polynomial {
    coefficients: Vec<BigUint>,
}

impl Polynomial {
    /// Builds a degree `threshold - 1` polynomial with `secret` as constant
    /// term and the other coefficients uniform in `[0, 2^bits)`.
    fn random<R: RngCore + CryptoRng>(
        secret: BigUint,
        threshold: u32,
        bits: u64,
        rng: &mut R,
    ) -> Self {
        let mut coefficients = Vec::with_capacity(threshold as usize);
        coefficients.push(secret);
        for _ in 1..threshold {
            coefficients.push(random_below_bits(bits, rng));
        }
        Self { coefficients }
    }

    /// Evaluates the polynomial at `x = 1..=total_shares` modulo `prime`
    fn evaluate_all(
        &self,
        total_shares: u32,
        prime: &BigUint,
        mode: SplitMode,
    ) -> HashMap<u32, BigUint> {
        let eval = |x: u32| {
            (
                x,
                eval_polynomial_mod(&self.coefficients, &BigUint::from(x), prime),
            )
        };

        match mode {
            SplitMode::Sequential => (1..=total_shares).map(eval).collect(),
            SplitMode::Parallel => (1..=total_shares).into_par_iter().map(eval).collect(),
        }
    }
}

impl Drop for Polynomial {
    fn drop(&mut self) {
        for coefficient in self.coefficients.iter_mut() {
            wipe(coefficient);
        }
    }
}

/// Checks `2 <= threshold <= total_shares`
fn validate_parameters(threshold: u32, total_shares: u32) -> Result<()> {
    if threshold < 2 {
        return Err(SharingError::InvalidThreshold(threshold));
    }
    if threshold > total_shares {
        return Err(SharingError::ThresholdTooLarge {
            threshold,
            total_shares,
        });
    }
    Ok(())
}

/// Splits `secret` into `total_shares` shares, any `threshold` of which
/// reconstruct it.
///
/// The secret is framed by [`encoding::encode`], a probable prime one bit
/// wider than the framed value is generated, and a random polynomial with the
/// framed value as constant term is evaluated at `x = 1..=total_shares`.
/// The polynomial is wiped before this function returns.
///
/// # Errors
/// Returns `SharingError` if:
/// - `secret` is empty or longer than `config.max_secret_len`
/// - `threshold < 2` or `threshold > total_shares`
/// - `total_shares` does not fit below the generated prime
/// - `config` is invalid
///
/// # Example
/// ```
/// use prime_share::{Config, generate, reconstruct};
/// use rand_chacha::ChaCha20Rng;
/// use rand_core::SeedableRng;
///
/// let mut rng = ChaCha20Rng::seed_from_u64(42);
/// let set = generate(b"hi", 2, 3, &Config::default(), &mut rng).unwrap();
/// assert_eq!(set.len(), 3);
///
/// let shares = set.select(&[1, 2]).unwrap();
/// assert_eq!(reconstruct(set.prime(), &shares, 2).unwrap(), b"hi");
/// ```
pub fn generate<R: RngCore + CryptoRng>(
    secret: &[u8],
    threshold: u32,
    total_shares: u32,
    config: &Config,
    rng: &mut R,
) -> Result<ShareSet> {
    config.validate()?;

    if secret.is_empty() {
        return Err(SharingError::EmptySecret);
    }
    if secret.len() > config.max_secret_len {
        return Err(SharingError::SecretTooLong {
            len: secret.len(),
            max: config.max_secret_len,
        });
    }
    validate_parameters(threshold, total_shares)?;

    let encoded = encoding::encode(secret);
    let bits = encoded.bits();

    // x values must stay distinct below the prime, which is at least 2^bits
    let share_bits = u64::from(u32::BITS - total_shares.leading_zeros());
    if share_bits > bits {
        return Err(SharingError::TooManyShares {
            total_shares,
            field_bits: bits + 1,
        });
    }

    let prime = generate_prime(bits + 1, config.primality_rounds, rng)?;
    let polynomial = Polynomial::random(encoded, threshold, bits, rng);
    let shares = polynomial.evaluate_all(total_shares, &prime, config.mode);
    drop(polynomial);

    debug!(
        threshold,
        total_shares,
        prime_bits = prime.bits(),
        "generated share set"
    );

    Ok(ShareSet {
        prime,
        secret_len: secret.len(),
        shares,
    })
}

/// [`generate`] with the default [`Config`]
pub fn generate_default<R: RngCore + CryptoRng>(
    secret: &[u8],
    threshold: u32,
    total_shares: u32,
    rng: &mut R,
) -> Result<ShareSet> {
    generate(secret, threshold, total_shares, &Config::default(), rng)
}

/// Reconstructs a secret from shares using Lagrange interpolation at `x = 0`.
///
/// Each share contributes `y_i * prod(x_j) / prod(x_j - x_i)` over the other
/// shares `j`; the sum modulo `prime` is decoded with
/// [`encoding::decode`]. The result does not depend on the order of `shares`.
///
/// The threshold is not known here: too few shares, shares from another
/// generation call and a wrong prime all surface as
/// `SharingError::IntegrityCheckFailed`.
///
/// # Errors
/// Returns `SharingError` if:
/// - `shares` is empty
/// - `prime < 2`
/// - a share has `x = 0`
/// - two shares have the same `x` (or `x` values congruent modulo `prime`)
/// - the interpolated value fails the integrity check
pub fn reconstruct(prime: &BigUint, shares: &[Share], original_length: usize) -> Result<Vec<u8>> {
    if shares.is_empty() {
        return Err(SharingError::InsufficientShares { needed: 1, got: 0 });
    }
    if prime < &BigUint::from(2u32) {
        return Err(SharingError::InvalidPrime);
    }

    let mut seen = HashSet::with_capacity(shares.len());
    for share in shares {
        if share.x == 0 {
            return Err(SharingError::ReservedShareIndex);
        }
        if !seen.insert(share.x) {
            warn!(x = share.x, "rejected duplicate share index");
            return Err(SharingError::DuplicateShare(share.x));
        }
    }

    let xs: Vec<BigUint> = shares.iter().map(|s| BigUint::from(s.x) % prime).collect();

    let mut secret = BigUint::zero();
    for (i, share) in shares.iter().enumerate() {
        let mut top = &share.y % prime;
        let mut bot = BigUint::one();
        for (j, x_j) in xs.iter().enumerate() {
            if i != j {
                top = top * x_j % prime;
                bot = bot * mod_sub(x_j, &xs[i], prime) % prime;
            }
        }

        let inverse = mod_inverse(&bot, prime).map_err(|e| match e {
            SharingError::DivisionByZero => SharingError::DuplicateShare(share.x),
            other => other,
        })?;
        secret = (secret + top * inverse) % prime;
    }

    debug!(shares = shares.len(), "interpolated secret point");

    let result = encoding::decode(&secret, original_length);
    wipe(&mut secret);
    if let Err(e) = &result {
        warn!(error = %e, "reconstruction failed");
    }
    result
}

/// Main implementation of Shamir's Secret Sharing scheme over a prime field
///
/// Holds validated `(threshold, total_shares)` parameters, a [`Config`] and a
/// ChaCha20 CSPRNG seeded from the operating system. Every call to
/// [`split`](Self::split) generates a fresh prime and polynomial.
///
/// # Example
/// ```
/// use prime_share::ThresholdScheme;
///
/// // Create a scheme with 5 total shares and threshold of 3
/// let mut scheme = ThresholdScheme::builder(5, 3).build().unwrap();
///
/// // Split a secret
/// let secret = b"my secret data";
/// let set = scheme.split(secret).unwrap();
///
/// // Reconstruct with 3 shares
/// let shares = set.select(&[2, 4, 5]).unwrap();
/// let reconstructed = ThresholdScheme::reconstruct(set.prime(), &shares, secret.len()).unwrap();
/// assert_eq!(reconstructed, secret);
/// ```
pub struct ThresholdScheme {
    /// Total number of shares to generate
    total_shares: u32,
    /// Minimum number of shares needed for reconstruction
    threshold: u32,
    /// Configuration options for the sharing scheme
    config: Config,
    /// Cryptographically secure random number generator
    rng: ChaCha20Rng,
}

/// Builder for creating ThresholdScheme instances with custom configuration
///
/// # Example
/// ```
/// use prime_share::{ThresholdScheme, Config, SplitMode};
///
/// let config = Config::new()
///     .with_primality_rounds(40)
///     .unwrap()
///     .with_mode(SplitMode::Parallel);
///
/// let scheme = ThresholdScheme::builder(5, 3)
///     .with_config(config)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct ThresholdSchemeBuilder {
    total_shares: u32,
    threshold: u32,
    config: Config,
}

impl ThresholdSchemeBuilder {
    /// Creates a new builder with the specified parameters and default configuration
    ///
    /// # Arguments
    /// * `total_shares` - Total number of shares to create
    /// * `threshold` - Minimum shares required for reconstruction (2-total_shares)
    pub fn new(total_shares: u32, threshold: u32) -> Self {
        Self {
            total_shares,
            threshold,
            config: Config::default(),
        }
    }

    /// Sets a custom configuration for the ThresholdScheme instance
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Builds the ThresholdScheme instance with validation
    ///
    /// # Errors
    /// Returns `SharingError` if:
    /// - `threshold` < 2
    /// - `threshold` > `total_shares`
    /// - Configuration validation fails
    /// - The operating system random source cannot seed the generator
    pub fn build(self) -> Result<ThresholdScheme> {
        validate_parameters(self.threshold, self.total_shares)?;
        self.config.validate()?;

        let rng = ChaCha20Rng::try_from_rng(&mut OsRng)
            .map_err(|e| SharingError::RandomSource(e.to_string()))?;

        Ok(ThresholdScheme {
            total_shares: self.total_shares,
            threshold: self.threshold,
            config: self.config,
            rng,
        })
    }
}

impl ThresholdScheme {
    /// Creates a scheme with the default configuration
    pub fn new(total_shares: u32, threshold: u32) -> Result<Self> {
        Self::builder(total_shares, threshold).build()
    }

    /// Creates a builder for configuring a ThresholdScheme instance
    pub fn builder(total_shares: u32, threshold: u32) -> ThresholdSchemeBuilder {
        ThresholdSchemeBuilder::new(total_shares, threshold)
    }

    /// Minimum number of shares needed for reconstruction
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Number of shares produced by each split
    pub fn total_shares(&self) -> u32 {
        self.total_shares
    }

    /// Configuration used for every split
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Splits a secret into `total_shares` shares over a freshly generated prime
    ///
    /// # Example
    /// ```
    /// use prime_share::ThresholdScheme;
    ///
    /// let mut scheme = ThresholdScheme::builder(5, 3).build().unwrap();
    /// let set = scheme.split(b"secret data").unwrap();
    /// assert_eq!(set.len(), 5);
    /// ```
    pub fn split(&mut self, secret: &[u8]) -> Result<ShareSet> {
        generate(
            secret,
            self.threshold,
            self.total_shares,
            &self.config,
            &mut self.rng,
        )
    }

    /// Reconstructs the original secret from shares, see [`reconstruct`]
    pub fn reconstruct(
        prime: &BigUint,
        shares: &[Share],
        original_length: usize,
    ) -> Result<Vec<u8>> {
        reconstruct(prime, shares, original_length)
    }
}
