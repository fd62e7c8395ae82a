//! # PRNG Reference Tests
//!
//! Verifies the xorshift* generator against a reference sequence computed
//! independently for the default seed. The simulator's determinism rests on
//! these exact values.

use schedsim_core::rng::Xorshift64Star;

/// The first raw outputs for the default seed match the reference
/// generator.
#[test]
fn raw_sequence_for_default_seed() {
    let mut rng = Xorshift64Star::new(1579);
    assert_eq!(rng.next_u64(), 16462829490641492541);
    assert_eq!(rng.next_u64(), 7210525978235932695);
    assert_eq!(rng.next_u64(), 11463776975074497153);
    assert_eq!(rng.next_u64(), 3173303676434629756);
}

/// `int31` keeps the low 32 bits of the raw output and shifts out the
/// lowest bit.
#[test]
fn int31_sequence_for_default_seed() {
    let mut rng = Xorshift64Star::new(1579);
    assert_eq!(rng.int31(), 1438739742);
    assert_eq!(rng.int31(), 1279084555);
    assert_eq!(rng.int31(), 1741621568);
    assert_eq!(rng.int31(), 1059709502);
}

/// `int31` never produces a negative value.
#[test]
fn int31_is_nonnegative() {
    let mut rng = Xorshift64Star::new(987654321);
    for _ in 0..10_000 {
        let v = rng.int31();
        assert!((0..=i64::from(u32::MAX >> 1)).contains(&v));
    }
}

/// `real1` scales the top 32 bits into the unit interval.
#[test]
fn real1_sequence_for_default_seed() {
    let mut rng = Xorshift64Star::new(1579);
    assert!((rng.real1() - 0.8924517752101886).abs() < 1e-12);
    assert!((rng.real1() - 0.3908833965616689).abs() < 1e-12);
}

/// `real1` stays within the closed unit interval.
#[test]
fn real1_stays_in_unit_interval() {
    let mut rng = Xorshift64Star::new(31337);
    for _ in 0..10_000 {
        let v = rng.real1();
        assert!((0.0..=1.0).contains(&v));
    }
}

/// A zero seed selects the default seed: both generators produce the same
/// stream.
#[test]
fn zero_seed_selects_default() {
    let mut zero = Xorshift64Star::new(0);
    let mut default = Xorshift64Star::new(1579);
    for _ in 0..100 {
        assert_eq!(zero.next_u64(), default.next_u64());
    }
}

/// Identical seeds produce identical streams.
#[test]
fn same_seed_same_stream() {
    let mut a = Xorshift64Star::new(42);
    let mut b = Xorshift64Star::new(42);
    for _ in 0..1000 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}
