//! Arithmetic engine.
//!
//! Binary operations accept operands of different widths and produce a result whose width is
//! fixed by the operation:
//!
//! | Operation | Result width |
//! |---|---|
//! | [add], [subtract], [and], [or], [xor] | `max(N, M)` |
//! | [multiply] | `N + M` |
//! | [divide], [quotient], [remainder] | `N` (the dividend's width) |
//!
//! The result width is a const generic `R` chosen by the caller (usually inferred from the
//! binding) and checked at compile time. Narrower operands are zero-extended to the result width.
//!
//! # Overflow
//!
//! Addition fails with [Error::Overflow] when the sum does not fit in `R` bits. Multiplication
//! accumulates through the same checked addition. Subtraction wraps modulo `2^R` without error.

use crate::{
    block::{self, Block},
    BitVector, Error, Number,
};
use core::cmp::Ordering;
use tracing::{debug, trace};

/// Returns the larger of two widths.
pub const fn max_width(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}

/// Compares two little-block-endian values, treating missing high blocks as zero.
pub(crate) fn compare_blocks<B: Block>(lhs: &[B], rhs: &[B]) -> Ordering {
    let len = lhs.len().max(rhs.len());
    for i in (0..len).rev() {
        let a = lhs.get(i).copied().unwrap_or(B::ZERO);
        let b = rhs.get(i).copied().unwrap_or(B::ZERO);
        match a.cmp(&b) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

/// Adds `rhs` into `acc`, returning the carry out of the top block of `acc`.
///
/// `rhs` must not have more blocks than `acc`.
pub(crate) fn add_assign_blocks<B: Block>(acc: &mut [B], rhs: &[B]) -> bool {
    debug_assert!(rhs.len() <= acc.len());
    let mut carry = false;
    for (i, a) in acc.iter_mut().enumerate() {
        let b = match rhs.get(i) {
            Some(b) => *b,
            None if !carry => break,
            None => B::ZERO,
        };
        (*a, carry) = a.add_with_carry(b, carry);
    }
    carry
}

/// Subtracts `rhs` from `acc`, returning the borrow out of the top block of `acc`.
///
/// `rhs` must not have more blocks than `acc`.
pub(crate) fn sub_assign_blocks<B: Block>(acc: &mut [B], rhs: &[B]) -> bool {
    debug_assert!(rhs.len() <= acc.len());
    let mut borrow = false;
    for (i, a) in acc.iter_mut().enumerate() {
        let b = match rhs.get(i) {
            Some(b) => *b,
            None if !borrow => break,
            None => B::ZERO,
        };
        (*a, borrow) = a.sub_with_borrow(b, borrow);
    }
    borrow
}

/// Adds `rhs` into `acc`, failing if the sum does not fit in `R` bits.
///
/// On failure `acc` holds the truncated sum; callers only pass scratch values.
fn checked_add_into<const R: usize, B: Block>(
    acc: &mut BitVector<R, B>,
    rhs: &[B],
) -> Result<(), Error> {
    let carry = add_assign_blocks(acc.blocks_mut(), rhs);
    if carry || block::has_trailing_bits(acc.blocks(), R) {
        debug!(width = R, "addition overflowed");
        return Err(Error::Overflow { width: R });
    }
    Ok(())
}

/// Compares two vectors by value, regardless of their widths.
pub fn compare<const N: usize, const M: usize, B: Block>(
    lhs: &BitVector<N, B>,
    rhs: &BitVector<M, B>,
) -> Ordering {
    compare_blocks(lhs.blocks(), rhs.blocks())
}

/// Returns `lhs + rhs` in `max(N, M)` bits.
///
/// Fails with [Error::Overflow] if the sum needs more bits.
pub fn add<const N: usize, const M: usize, const R: usize, B: Block>(
    lhs: &BitVector<N, B>,
    rhs: &BitVector<M, B>,
) -> Result<BitVector<R, B>, Error> {
    const { assert!(R == max_width(N, M), "sum width must be max(N, M)") };
    let mut sum = lhs.resize::<R>();
    checked_add_into(&mut sum, rhs.blocks())?;
    Ok(sum)
}

/// Returns `lhs - rhs` modulo `2^max(N, M)`.
pub fn subtract<const N: usize, const M: usize, const R: usize, B: Block>(
    lhs: &BitVector<N, B>,
    rhs: &BitVector<M, B>,
) -> BitVector<R, B> {
    const { assert!(R == max_width(N, M), "difference width must be max(N, M)") };
    let mut difference = lhs.resize::<R>();
    sub_assign_blocks(difference.blocks_mut(), rhs.blocks());
    difference.trim();
    difference
}

/// Returns `lhs * rhs` in `N + M` bits.
///
/// The operand with fewer set bits drives the shift-and-add loop.
pub fn multiply<const N: usize, const M: usize, const R: usize, B: Block>(
    lhs: &BitVector<N, B>,
    rhs: &BitVector<M, B>,
) -> Result<BitVector<R, B>, Error> {
    const { assert!(R == N + M, "product width must be N + M") };
    let mut product = BitVector::<R, B>::zeroes();
    if lhs.count_ones() <= rhs.count_ones() {
        shift_and_add(&mut product, lhs.iter_ones(), rhs.resize::<R>())?;
    } else {
        shift_and_add(&mut product, rhs.iter_ones(), lhs.resize::<R>())?;
    }
    Ok(product)
}

/// Adds `addend << i` into `acc` for every `i` yielded (in ascending order) by `driver`.
fn shift_and_add<const R: usize, B: Block>(
    acc: &mut BitVector<R, B>,
    driver: impl Iterator<Item = usize>,
    mut addend: BitVector<R, B>,
) -> Result<(), Error> {
    let mut shifted = 0;
    for index in driver {
        addend.shift_left(index - shifted);
        shifted = index;
        checked_add_into(acc, addend.blocks())?;
    }
    Ok(())
}

/// Returns `(dividend / divisor, dividend % divisor)`, both in the dividend's width.
///
/// Fails with [Error::DivisionByZero] if `divisor` is zero.
pub fn divide<const N: usize, const M: usize, B: Block>(
    dividend: &BitVector<N, B>,
    divisor: &BitVector<M, B>,
) -> Result<(BitVector<N, B>, BitVector<N, B>), Error> {
    let Some(divisor_top) = divisor.highest_set_bit() else {
        debug!("division by zero");
        return Err(Error::DivisionByZero);
    };
    let Some(dividend_top) = dividend.highest_set_bit() else {
        trace!("zero dividend");
        return Ok((BitVector::zeroes(), BitVector::zeroes()));
    };
    match compare(dividend, divisor) {
        Ordering::Less => {
            trace!("dividend smaller than divisor");
            return Ok((BitVector::zeroes(), dividend.clone()));
        }
        Ordering::Equal => {
            trace!("dividend equals divisor");
            return Ok((BitVector::from_number(1u8), BitVector::zeroes()));
        }
        Ordering::Greater => {}
    }

    // The divisor is smaller than the dividend, so it fits in N bits and its top bit can be
    // aligned with the dividend's without losing any bits.
    let shift = dividend_top - divisor_top;
    trace!(shift, "aligning divisor");
    let mut divisor = divisor.resize::<N>();
    divisor.shift_left(shift);

    let mut quotient = BitVector::<N, B>::zeroes();
    let mut remainder = dividend.clone();
    for index in (0..=shift).rev() {
        if compare_blocks(divisor.blocks(), remainder.blocks()) != Ordering::Greater {
            sub_assign_blocks(remainder.blocks_mut(), divisor.blocks());
            quotient.set_bit_unchecked(index);
        }
        divisor.shift_right(1);
    }
    Ok((quotient, remainder))
}

/// Returns `dividend / divisor` in the dividend's width.
pub fn quotient<const N: usize, const M: usize, B: Block>(
    dividend: &BitVector<N, B>,
    divisor: &BitVector<M, B>,
) -> Result<BitVector<N, B>, Error> {
    divide(dividend, divisor).map(|(quotient, _)| quotient)
}

/// Returns `dividend % divisor` in the dividend's width.
pub fn remainder<const N: usize, const M: usize, B: Block>(
    dividend: &BitVector<N, B>,
    divisor: &BitVector<M, B>,
) -> Result<BitVector<N, B>, Error> {
    divide(dividend, divisor).map(|(_, remainder)| remainder)
}

/// Combines zero-extended operands block by block.
fn bitwise<const N: usize, const M: usize, const R: usize, B: Block>(
    lhs: &BitVector<N, B>,
    rhs: &BitVector<M, B>,
    op: impl Fn(B, B) -> B,
) -> BitVector<R, B> {
    const { assert!(R == max_width(N, M), "bitwise result width must be max(N, M)") };
    let mut result = BitVector::<R, B>::zeroes();
    for (i, out) in result.blocks_mut().iter_mut().enumerate() {
        let a = lhs.blocks().get(i).copied().unwrap_or(B::ZERO);
        let b = rhs.blocks().get(i).copied().unwrap_or(B::ZERO);
        *out = op(a, b);
    }
    result
}

/// Returns `lhs & rhs` in `max(N, M)` bits.
pub fn and<const N: usize, const M: usize, const R: usize, B: Block>(
    lhs: &BitVector<N, B>,
    rhs: &BitVector<M, B>,
) -> BitVector<R, B> {
    bitwise(lhs, rhs, |a, b| a & b)
}

/// Returns `lhs | rhs` in `max(N, M)` bits.
pub fn or<const N: usize, const M: usize, const R: usize, B: Block>(
    lhs: &BitVector<N, B>,
    rhs: &BitVector<M, B>,
) -> BitVector<R, B> {
    bitwise(lhs, rhs, |a, b| a | b)
}

/// Returns `lhs ^ rhs` in `max(N, M)` bits.
pub fn xor<const N: usize, const M: usize, const R: usize, B: Block>(
    lhs: &BitVector<N, B>,
    rhs: &BitVector<M, B>,
) -> BitVector<R, B> {
    bitwise(lhs, rhs, |a, b| a ^ b)
}

impl<const N: usize, B: Block> BitVector<N, B> {
    /// Returns the two's complement (`!self + 1`) modulo `2^N`.
    ///
    /// This wraps like [subtract] and equals `subtract(&zeroes, self)`: negating zero yields
    /// zero, and the carry out of `!self + 1` is discarded instead of reported as
    /// [Error::Overflow] the way [add] would.
    pub fn twos_complement(&self) -> Self {
        let mut result = !self;
        // The carry out of the all-ones case is the modular wraparound to zero
        add_assign_blocks(result.blocks_mut(), &[B::ONE]);
        result.trim();
        result
    }

    /// Returns `self + value`, with `value` first converted to a vector of this width.
    pub fn add_number<T: Number>(&self, value: T) -> Result<Self, Error> {
        add(self, &Self::from_number(value))
    }

    /// Returns `self - value` modulo `2^N`, with `value` first converted to a vector of this
    /// width.
    pub fn subtract_number<T: Number>(&self, value: T) -> Self {
        subtract(self, &Self::from_number(value))
    }

    /// Returns `self * value` in `2N` bits, with `value` first converted to a vector of this
    /// width.
    pub fn multiply_number<const R: usize, T: Number>(
        &self,
        value: T,
    ) -> Result<BitVector<R, B>, Error> {
        multiply(self, &Self::from_number(value))
    }

    /// Returns `(self / value, self % value)`, with `value` first converted to a vector of this
    /// width.
    pub fn divide_number<T: Number>(&self, value: T) -> Result<(Self, Self), Error> {
        divide(self, &Self::from_number(value))
    }

    /// Adds `rhs` to `self`. On overflow `self` is left unchanged.
    pub fn add_in_place<const M: usize>(&mut self, rhs: &BitVector<M, B>) -> Result<(), Error> {
        *self = add(self, rhs)?;
        Ok(())
    }

    /// Subtracts `rhs` from `self` modulo `2^N`.
    pub fn subtract_in_place<const M: usize>(&mut self, rhs: &BitVector<M, B>) {
        *self = subtract(self, rhs);
    }

    /// Replaces `self` with `self / rhs`. On division by zero `self` is left unchanged.
    pub fn divide_in_place<const M: usize>(
        &mut self,
        rhs: &BitVector<M, B>,
    ) -> Result<(), Error> {
        *self = quotient(self, rhs)?;
        Ok(())
    }

    /// Replaces `self` with `self % rhs`. On division by zero `self` is left unchanged.
    pub fn remainder_in_place<const M: usize>(
        &mut self,
        rhs: &BitVector<M, B>,
    ) -> Result<(), Error> {
        *self = remainder(self, rhs)?;
        Ok(())
    }
}
