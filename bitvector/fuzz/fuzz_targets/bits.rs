#![no_main]

use arbitrary::Arbitrary;
use commonware_codec::{Decode, Encode, FixedSize};
use fixed_bitvector::{BitVector, Error};
use libfuzzer_sys::fuzz_target;

const WIDTH: usize = 77;
type Vector = BitVector<WIDTH, u16>;

#[derive(Arbitrary, Debug)]
enum BitOperation {
    Get(Vec<bool>, usize),
    Set(Vec<bool>, usize, bool),
    Flip(Vec<bool>, usize),
    Invert(Vec<bool>),
    And(Vec<bool>, Vec<bool>),
    Or(Vec<bool>, Vec<bool>),
    Xor(Vec<bool>, Vec<bool>),
    View(Vec<bool>, usize, usize),
    Decode(Vec<u8>),
}

fn fuzz(ops: Vec<BitOperation>) {
    for op in ops {
        match op {
            BitOperation::Get(bools, index) => {
                let v = Vector::from_bools(&bools);
                match v.get(index) {
                    Ok(bit) => assert_eq!(bit, bools.get(index).copied().unwrap_or(false)),
                    Err(err) => {
                        assert!(index >= WIDTH);
                        assert_eq!(err, Error::IndexOutOfRange { index, width: WIDTH });
                    }
                }
            }

            BitOperation::Set(bools, index, value) => {
                let mut v = Vector::from_bools(&bools);
                let before = v.count_ones();
                match v.set(index, value) {
                    Ok(()) => {
                        assert_eq!(v.get(index), Ok(value));
                        assert!(v.count_ones().abs_diff(before) <= 1);
                    }
                    Err(_) => {
                        assert!(index >= WIDTH);
                        assert_eq!(v.count_ones(), before);
                    }
                }
            }

            BitOperation::Flip(bools, index) => {
                let original = Vector::from_bools(&bools);
                let mut v = original.clone();
                if v.flip(index).is_ok() {
                    assert_ne!(v, original);
                    v.flip(index).unwrap();
                }
                assert_eq!(v, original);
            }

            BitOperation::Invert(bools) => {
                let v = Vector::from_bools(&bools);
                let inverted = !&v;
                assert_eq!(inverted.count_ones(), v.count_zeros());
                assert_eq!(!inverted, v);
            }

            BitOperation::And(a, b) => {
                let a = Vector::from_bools(&a);
                let b = Vector::from_bools(&b);
                let both = &a & &b;
                assert!(both.count_ones() <= a.count_ones().min(b.count_ones()));
                assert_eq!(both, !(!&a | !&b));
            }

            BitOperation::Or(a, b) => {
                let a = Vector::from_bools(&a);
                let b = Vector::from_bools(&b);
                let either = &a | &b;
                assert!(either.count_ones() >= a.count_ones().max(b.count_ones()));
                assert_eq!(either.none(), a.none() && b.none());
            }

            BitOperation::Xor(a, b) => {
                let a = Vector::from_bools(&a);
                let b = Vector::from_bools(&b);
                let mut c = a.clone();
                c ^= &b;
                c ^= &b;
                assert_eq!(c, a);
            }

            BitOperation::View(bools, start, end) => {
                let mut v = Vector::from_bools(&bools);
                let start = start % (WIDTH + 2);
                let end = end % (WIDTH + 2);
                match v.view_mut(start, end) {
                    Ok(mut view) => {
                        assert!(start <= end && end <= WIDTH);
                        view.fill(true);
                        assert_eq!(view.count_ones(), end - start);
                        assert!(view.get(end - start).is_err());
                    }
                    Err(err) => {
                        assert_eq!(err, Error::InvalidView { start, end, width: WIDTH });
                        continue;
                    }
                }
                for index in start..end {
                    assert!(v[index]);
                }
            }

            BitOperation::Decode(bytes) => {
                if let Ok(v) = Vector::decode_cfg(bytes.as_slice(), &()) {
                    assert_eq!(bytes.len(), Vector::SIZE);
                    assert_eq!(&v.encode()[..], bytes.as_slice());
                }
            }
        }
    }
}

fuzz_target!(|ops: Vec<BitOperation>| {
    fuzz(ops);
});
