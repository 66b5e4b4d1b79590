use fixed_bitvector::{
    add, and, compare, divide, multiply, or, quotient, remainder, shift_left, shift_right,
    subtract, xor, BitVector, Block, Error,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cmp::Ordering;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn bits<const N: usize>(digits: &str) -> BitVector<N> {
    digits.parse().unwrap()
}

#[test]
fn test_bitwise_scenarios() {
    let a = bits::<8>("11001100");
    let b = bits::<8>("00101010");
    assert_eq!((&a & &b).to_string(), "00001000");

    let wide = bits::<16>("1010101010101010");
    let union: BitVector<16> = or(&a, &wide);
    assert_eq!(union.to_string(), "1010101011101110");

    let negated = !bits::<8>("11111111");
    assert_eq!(negated.to_string(), "00000000");
}

#[test]
fn test_divide_scenario() {
    init_logging();
    let dividend = BitVector::<32>::from_number(25u32);
    let divisor = BitVector::<32>::from_number(4u32);
    let (q, r) = divide(&dividend, &divisor).unwrap();
    assert_eq!(q.to_number::<u32>(), 6);
    assert_eq!(r.to_number::<u32>(), 1);
    assert_eq!(quotient(&dividend, &divisor).unwrap(), q);
    assert_eq!(remainder(&dividend, &divisor).unwrap(), r);
}

#[test]
fn test_divide_by_zero_leaves_operands_untouched() {
    init_logging();
    let dividend = BitVector::<100>::ones();
    let divisor = BitVector::<100>::zeroes();
    assert_eq!(divide(&dividend, &divisor), Err(Error::DivisionByZero));
    assert!(dividend.all());
    assert!(divisor.is_zero());

    let mut target = dividend.clone();
    assert_eq!(target.divide_in_place(&divisor), Err(Error::DivisionByZero));
    assert_eq!(target, dividend);
}

#[test]
fn test_overflow_reported_by_add_and_multiply() {
    init_logging();
    let max = BitVector::<12, u8>::ones();
    let one = BitVector::<12, u8>::from_number(1u8);
    assert_eq!(
        add::<12, 12, 12, u8>(&max, &one),
        Err(Error::Overflow { width: 12 })
    );

    // Subtraction wraps instead
    let wrapped: BitVector<12, u8> = subtract(&one, &max);
    assert_eq!(wrapped.to_number::<u16>(), 2);

    // The full product always fits in N + M bits
    let product: BitVector<24, u8> = multiply(&max, &max).unwrap();
    assert_eq!(product.to_number::<u32>(), 4095 * 4095);
}

#[test]
fn test_integer_operands() {
    let v = BitVector::<40>::from_number(1_000_000u32);
    assert_eq!(v.add_number(24u8).unwrap().to_number::<u64>(), 1_000_024);
    assert_eq!(v.subtract_number(1_000_001u32).to_number::<u64>(), (1 << 40) - 1);
    let product: BitVector<80> = v.multiply_number(1_000_000u32).unwrap();
    assert_eq!(product.to_number::<u128>(), 1_000_000_000_000);
    let (q, r) = v.divide_number(7u8).unwrap();
    assert_eq!((q.to_number::<u64>(), r.to_number::<u64>()), (142_857, 1));
    assert_eq!(v.divide_number(0u8), Err(Error::DivisionByZero));
}

#[test]
fn test_twos_complement() {
    let v = BitVector::<20, u16>::from_number(5u8);
    let negated = v.twos_complement();
    assert_eq!(negated.to_number::<u32>(), (1 << 20) - 5);
    let sum = add::<20, 20, 20, u16>(&v, &negated);
    assert_eq!(sum, Err(Error::Overflow { width: 20 }));
    assert!(BitVector::<20, u16>::zeroes().twos_complement().is_zero());
}

/// Checks every operation on random operands against native `u128` arithmetic.
fn cross_check<const N: usize, const M: usize, const R: usize, const P: usize, B: Block>(
    seed: u64,
) {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_mask = u128::MAX >> (128 - N);
    let m_mask = u128::MAX >> (128 - M);
    let r_mask = u128::MAX >> (128 - R);
    for _ in 0..200 {
        let x = rng.gen::<u128>() & n_mask;
        let y = rng.gen::<u128>() & m_mask;
        let a = BitVector::<N, B>::from_number(x);
        let b = BitVector::<M, B>::from_number(y);

        match x.checked_add(y).filter(|sum| *sum <= r_mask) {
            Some(sum) => assert_eq!(add::<N, M, R, B>(&a, &b).unwrap().to_number::<u128>(), sum),
            None => assert_eq!(add::<N, M, R, B>(&a, &b), Err(Error::Overflow { width: R })),
        }
        assert_eq!(
            subtract::<N, M, R, B>(&a, &b).to_number::<u128>(),
            x.wrapping_sub(y) & r_mask
        );
        assert_eq!(and::<N, M, R, B>(&a, &b).to_number::<u128>(), x & y);
        assert_eq!(or::<N, M, R, B>(&a, &b).to_number::<u128>(), x | y);
        assert_eq!(xor::<N, M, R, B>(&a, &b).to_number::<u128>(), x ^ y);
        assert_eq!(compare(&a, &b), x.cmp(&y));

        let product = multiply::<N, M, P, B>(&a, &b).unwrap();
        assert_eq!(product.to_number::<u128>(), x * y);

        if y == 0 {
            assert_eq!(divide(&a, &b), Err(Error::DivisionByZero));
        } else {
            let (q, r) = divide(&a, &b).unwrap();
            assert_eq!(q.to_number::<u128>(), x / y);
            assert_eq!(r.to_number::<u128>(), x % y);
        }

        let amount = rng.gen_range(0..=N);
        assert_eq!(
            shift_left(&a, amount).to_number::<u128>(),
            x.checked_shl(amount as u32).unwrap_or(0) & n_mask
        );
        assert_eq!(
            shift_right(&a, amount).to_number::<u128>(),
            x.checked_shr(amount as u32).unwrap_or(0)
        );
    }
}

#[test]
fn test_against_native_arithmetic() {
    init_logging();
    cross_check::<8, 8, 8, 16, u8>(1);
    cross_check::<13, 5, 13, 18, u8>(2);
    cross_check::<5, 13, 13, 18, u16>(3);
    cross_check::<33, 31, 33, 64, u32>(4);
    cross_check::<64, 63, 64, 127, u64>(5);
    cross_check::<40, 60, 60, 100, u16>(6);
    cross_check::<1, 64, 64, 65, u128>(7);
}

#[test]
fn test_small_divisors_exhaustive() {
    // Every 10-bit dividend against every 5-bit divisor
    for x in 0u16..1 << 10 {
        let a = BitVector::<10, u8>::from_number(x);
        for y in 1u8..1 << 5 {
            let b = BitVector::<5, u8>::from_number(y);
            let (q, r) = divide(&a, &b).unwrap();
            assert_eq!(q.to_number::<u16>(), x / y as u16);
            assert_eq!(r.to_number::<u16>(), x % y as u16);
        }
    }
}

#[test]
fn test_ordering_across_widths() {
    let small = BitVector::<4>::from_number(9u8);
    let large = BitVector::<200>::from_number(9u8);
    assert_eq!(small, large);
    assert_eq!(small.partial_cmp(&large), Some(Ordering::Equal));

    let mut larger = large.clone();
    larger.set(150, true).unwrap();
    assert!(small < larger);
    assert!(larger > small);
}
