//! Arithmetic in the prime field that carries the shares.
//!
//! All values are [`BigUint`]s reduced modulo a probable prime produced by
//! [`generate_prime`]. Randomness always comes from a caller-supplied
//! cryptographically secure generator.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};
use tracing::trace;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

use crate::error::{Result, SharingError};

/// Odd primes below 256, used for trial division before Miller-Rabin
const SMALL_PRIMES: [u32; 53] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Draws a uniform integer in `[0, 2^bits)`.
///
/// The intermediate byte buffer is wiped before returning.
pub fn random_below_bits<R: RngCore + CryptoRng>(bits: u64, rng: &mut R) -> BigUint {
    if bits == 0 {
        return BigUint::zero();
    }

    let len = bits.div_ceil(8) as usize;
    let mut buf = vec![0u8; len];
    rng.fill_bytes(&mut buf);

    // Clear the excess high bits of the most significant byte
    let excess = (len as u64 * 8 - bits) as u32;
    buf[0] &= 0xFFu8 >> excess;

    let value = BigUint::from_bytes_be(&buf);
    #[cfg(feature = "zeroize")]
    buf.zeroize();
    value
}

/// Draws a uniform integer in `[0, bound)` by rejection sampling.
///
/// Returns zero when `bound` is zero.
pub fn random_below<R: RngCore + CryptoRng>(bound: &BigUint, rng: &mut R) -> BigUint {
    if bound.is_zero() {
        return BigUint::zero();
    }
    let bits = bound.bits();
    loop {
        let candidate = random_below_bits(bits, rng);
        if &candidate < bound {
            return candidate;
        }
    }
}

/// Miller-Rabin probable prime test with `rounds` random bases.
///
/// Candidates are first checked against the odd primes below 256. Each
/// Miller-Rabin round accepts a composite with probability at most 1/4.
///
/// # Example
/// ```
/// use num_bigint::BigUint;
/// use prime_share::finite_field::is_probable_prime;
///
/// let mut rng = rand::rng();
/// assert!(is_probable_prime(&BigUint::from(2_147_483_647u32), 32, &mut rng));
/// assert!(!is_probable_prime(&BigUint::from(561u32), 32, &mut rng));
/// ```
pub fn is_probable_prime<R: RngCore + CryptoRng>(n: &BigUint, rounds: u32, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    if n == &two {
        return true;
    }
    if (n % 2u32).is_zero() {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    // Bases are drawn from [2, n - 2]
    let base_span = n - 3u32;

    'rounds: for _ in 0..rounds {
        let a = random_below(&base_span, rng) + 2u32;
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = &x * &x % n;
            if x == n_minus_one {
                continue 'rounds;
            }
        }
        return false;
    }

    true
}

/// Generates a probable prime of exactly `bits` bits.
///
/// Candidates are random odd integers with the top bit forced, so the result
/// always lies in `[2^(bits-1), 2^bits)`.
///
/// # Errors
/// Returns `SharingError::InvalidConfig` if `bits < 2` or `rounds == 0`.
pub fn generate_prime<R: RngCore + CryptoRng>(
    bits: u64,
    rounds: u32,
    rng: &mut R,
) -> Result<BigUint> {
    if bits < 2 {
        return Err(SharingError::InvalidConfig(format!(
            "Cannot generate a prime of {bits} bits"
        )));
    }
    if rounds == 0 {
        return Err(SharingError::InvalidConfig(
            "Primality rounds cannot be zero".into(),
        ));
    }

    let top = BigUint::one() << (bits - 1);
    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let mut candidate = random_below_bits(bits, rng);
        candidate |= &top;
        candidate |= BigUint::one();

        if is_probable_prime(&candidate, rounds, rng) {
            trace!(bits, attempts, "prime found");
            return Ok(candidate);
        }
    }
}

/// Evaluates the polynomial with coefficients `coeffs` (constant term first)
/// at `x` using Horner's method, reducing modulo `m` after every step.
///
/// An empty coefficient list is the zero polynomial.
///
/// # Example
/// ```
/// use num_bigint::BigUint;
/// use prime_share::finite_field::eval_polynomial_mod;
///
/// // x^2 + 2x + 3 at x = 2, mod 17
/// let coeffs: Vec<BigUint> = [3u32, 2, 1].into_iter().map(BigUint::from).collect();
/// let y = eval_polynomial_mod(&coeffs, &BigUint::from(2u32), &BigUint::from(17u32));
/// assert_eq!(y, BigUint::from(11u32));
/// ```
pub fn eval_polynomial_mod(coeffs: &[BigUint], x: &BigUint, m: &BigUint) -> BigUint {
    let Some((last, rest)) = coeffs.split_last() else {
        return BigUint::zero();
    };

    rest.iter()
        .rev()
        .fold(last % m, |acc, coeff| (acc * x + coeff) % m)
}

/// Multiplicative inverse of `a` modulo the prime `m`.
///
/// Uses Fermat's little theorem: `a^(m-2) = a^(-1) (mod m)`.
///
/// # Errors
/// - `SharingError::InvalidPrime` if `m < 2`
/// - `SharingError::DivisionByZero` if `a = 0 (mod m)`
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint> {
    if m < &BigUint::from(2u32) {
        return Err(SharingError::InvalidPrime);
    }
    let a = a % m;
    if a.is_zero() {
        return Err(SharingError::DivisionByZero);
    }
    Ok(a.modpow(&(m - 2u32), m))
}

/// Overwrites the digits of `value` with zeros in place and leaves it zero.
///
/// `assign_from_slice` refills the existing digit buffer before normalizing,
/// so the old limbs are overwritten rather than just released.
pub(crate) fn wipe(value: &mut BigUint) {
    let digits = value.bits().div_ceil(32) as usize;
    value.assign_from_slice(&vec![0u32; digits]);
}

/// `(a - b) mod m` for operands already reduced modulo `m`
#[inline]
pub(crate) fn mod_sub(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    if a >= b {
        (a - b) % m
    } else {
        (m - b + a) % m
    }
}
