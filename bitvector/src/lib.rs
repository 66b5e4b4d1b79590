//! Fixed-width bit vectors with unsigned arbitrary-precision arithmetic.
//!
//! A [BitVector] stores exactly `N` bits, where `N` is a const generic. Vectors of different
//! widths can be combined: the caller names the width of the result, and a compile-time check
//! ensures it matches the promotion rule of the operation (`max(N, M)` for addition, subtraction
//! and bitwise operations, `N + M` for multiplication).
//!
//! # Example
//!
//! ```
//! use fixed_bitvector::{add, divide, multiply, BitVector};
//!
//! let a = BitVector::<8>::from_number(25u8);
//! let b = BitVector::<4>::from_number(4u8);
//!
//! let sum: BitVector<8> = add(&a, &b).unwrap();
//! assert_eq!(sum.to_number::<u8>(), 29);
//!
//! let product: BitVector<12> = multiply(&a, &b).unwrap();
//! assert_eq!(product.to_number::<u16>(), 100);
//!
//! let (quotient, remainder) = divide(&a, &b).unwrap();
//! assert_eq!(quotient.to_number::<u8>(), 6);
//! assert_eq!(remainder.to_number::<u8>(), 1);
//! assert_eq!(quotient.to_string(), "00000110");
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod arith;
pub use arith::{
    add, and, compare, divide, max_width, multiply, or, quotient, remainder, subtract, xor,
};
mod block;
pub use block::Block;
mod error;
pub use error::Error;
mod number;
pub use number::Number;
mod shift;
pub use shift::{shift_left, shift_right};
mod vector;
pub use vector::{BitIterator, BitVector, Ones};
mod view;
pub use view::{BitView, BitViewMut};
