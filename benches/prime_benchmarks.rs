use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use num_bigint::BigUint;
use prime_share::finite_field::{generate_prime, is_probable_prime, mod_inverse};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

fn bench_generate_prime(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_prime");
    group.sample_size(10);
    let mut rng = ChaCha20Rng::seed_from_u64(7);

    for bits in [64u64, 256, 1024] {
        group.bench_function(format!("{}_bits", bits), |b| {
            b.iter(|| black_box(generate_prime(black_box(bits), 64, &mut rng).unwrap()));
        });
    }

    group.finish();
}

fn bench_primality(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(8);
    // 2^127 - 1
    let mersenne = (BigUint::from(1u32) << 127u32) - 1u32;

    c.bench_function("miller_rabin_m127", |b| {
        b.iter(|| black_box(is_probable_prime(black_box(&mersenne), 64, &mut rng)));
    });
}

fn bench_inverse(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(9);
    let prime = generate_prime(512, 64, &mut rng).unwrap();
    let value = &prime >> 1u32;

    c.bench_function("mod_inverse_512_bits", |b| {
        b.iter(|| black_box(mod_inverse(black_box(&value), &prime).unwrap()));
    });
}

criterion_group!(benches, bench_generate_prime, bench_primality, bench_inverse);
criterion_main!(benches);
