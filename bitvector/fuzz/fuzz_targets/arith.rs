#![no_main]

use arbitrary::Arbitrary;
use fixed_bitvector::{
    add, compare, divide, multiply, shift_left, shift_right, subtract, BitVector, Error,
};
use libfuzzer_sys::fuzz_target;
use std::cmp::Ordering;

type Wide = BitVector<200, u32>;
type Narrow = BitVector<70, u32>;

#[derive(Arbitrary, Debug)]
enum ArithOperation {
    Add(Vec<bool>, Vec<bool>),
    Subtract(Vec<bool>, Vec<bool>),
    Multiply(Vec<bool>, Vec<bool>),
    Divide(Vec<bool>, Vec<bool>),
    Shift(Vec<bool>, u16),
    TwosComplement(Vec<bool>),
    Parse(String),
}

fn fuzz(ops: Vec<ArithOperation>) {
    for op in ops {
        match op {
            ArithOperation::Add(a, b) => {
                let a = Wide::from_bools(&a);
                let b = Narrow::from_bools(&b);
                match add::<200, 70, 200, u32>(&a, &b) {
                    Ok(sum) => {
                        assert_ne!(compare(&sum, &a), Ordering::Less);
                        let back: Wide = subtract(&sum, &b);
                        assert_eq!(back, a);
                    }
                    Err(err) => {
                        assert_eq!(err, Error::Overflow { width: 200 });
                        // The distance from a to 2^200 must not exceed b
                        let room: Wide = subtract(&Wide::zeroes(), &a);
                        assert!(!room.is_zero());
                        assert_ne!(compare(&room, &b), Ordering::Greater);
                    }
                }
            }

            ArithOperation::Subtract(a, b) => {
                let a = Wide::from_bools(&a);
                let b = Narrow::from_bools(&b);
                let difference: Wide = subtract(&a, &b);
                if a >= b {
                    let sum: Wide = add(&difference, &b).unwrap();
                    assert_eq!(sum, a);
                } else {
                    assert!(add::<200, 70, 200, u32>(&difference, &b).is_err());
                }
            }

            ArithOperation::Multiply(a, b) => {
                let a = Narrow::from_bools(&a);
                let b = Narrow::from_bools(&b);
                let ab: BitVector<140, u32> = multiply(&a, &b).unwrap();
                let ba: BitVector<140, u32> = multiply(&b, &a).unwrap();
                assert_eq!(ab, ba);
                if !a.is_zero() {
                    let (q, r) = divide(&ab, &a).unwrap();
                    assert_eq!(q, b);
                    assert!(r.is_zero());
                }
            }

            ArithOperation::Divide(a, b) => {
                let a = Wide::from_bools(&a);
                let b = Narrow::from_bools(&b);
                let (q, r) = match divide(&a, &b) {
                    Ok(result) => result,
                    Err(err) => {
                        assert_eq!(err, Error::DivisionByZero);
                        assert!(b.is_zero());
                        continue;
                    }
                };
                assert!(r < b);
                let product: BitVector<270, u32> = multiply(&q, &b).unwrap();
                let restored: BitVector<270, u32> = add(&product, &r).unwrap();
                assert_eq!(restored, a);
            }

            ArithOperation::Shift(a, amount) => {
                let a = Wide::from_bools(&a);
                let amount = amount as usize % 256;
                let left = shift_left(&a, amount);
                let right = shift_right(&a, amount);
                if amount == 0 {
                    assert_eq!(left, a);
                    assert_eq!(right, a);
                } else if amount >= 200 {
                    assert!(left.is_zero());
                    assert!(right.is_zero());
                } else {
                    let kept = 200 - amount;
                    assert_eq!(
                        left.count_ones() + (&a >> kept).count_ones(),
                        a.count_ones()
                    );
                    assert_eq!(
                        right.count_ones() + (&a << kept).count_ones(),
                        a.count_ones()
                    );
                    let low_bits = &a & &(Wide::ones() >> kept);
                    assert_eq!(shift_left(&right, amount) | low_bits, a);
                }
            }

            ArithOperation::TwosComplement(a) => {
                let a = Wide::from_bools(&a);
                let negated = a.twos_complement();
                assert_eq!(negated.twos_complement(), a);
                let zero: Wide = subtract(&Wide::zeroes(), &a);
                assert_eq!(zero, negated);
            }

            ArithOperation::Parse(s) => {
                if let Ok(v) = s.parse::<Narrow>() {
                    assert_eq!(v.to_string().parse::<Narrow>().unwrap(), v);
                } else {
                    assert!(s.chars().any(|c| c != '0' && c != '1'));
                }
            }
        }
    }
}

fuzz_target!(|ops: Vec<ArithOperation>| {
    fuzz(ops);
});
