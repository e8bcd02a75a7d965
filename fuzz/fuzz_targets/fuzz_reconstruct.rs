#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;
use prime_share::{Share, encoding, reconstruct};

// Feeds arbitrary primes, shares and lengths to reconstruct and decode.
//
// Neither may panic: zero or composite moduli, x = 0, repeated indices,
// values above the modulus and lengths that disagree with the value must all
// come back as errors.
fuzz_target!(|data: &[u8]| {
    if data.len() < 11 {
        return;
    }

    // Full-width length, so lengths near usize::MAX are reachable
    let mut length_bytes = [0u8; 8];
    length_bytes.copy_from_slice(&data[..8]);
    let original_length = u64::from_le_bytes(length_bytes) as usize;

    // Cap the modulus so modular exponentiation stays cheap
    let prime_len = (data[8] as usize % 48).min(data.len() - 10);
    let num_shares = data[9] % 12;
    let prime = BigUint::from_bytes_be(&data[10..10 + prime_len]);
    let mut offset = 10 + prime_len;

    let mut shares = Vec::new();
    for _ in 0..num_shares {
        if offset + 3 > data.len() {
            break;
        }

        // Small x range so duplicates and zero indices show up often
        let x = u32::from(data[offset] % 16);
        let y_len = (data[offset + 1] as usize % 48).min(data.len() - offset - 2);
        offset += 2;

        let y = BigUint::from_bytes_be(&data[offset..offset + y_len]);
        offset += y_len;

        shares.push(Share { x, y });
    }

    let _ = reconstruct(&prime, &shares, original_length);
    let _ = reconstruct(&prime, &shares, original_length % 64);
    let _ = reconstruct(&prime, &[], original_length);

    if let Some(first) = shares.first() {
        let _ = reconstruct(&prime, std::slice::from_ref(first), original_length);
        let _ = reconstruct(&prime, &[first.clone(), first.clone()], original_length);
    }

    let _ = encoding::decode(&prime, original_length);
});
