//! Storage blocks and the carry/borrow primitives built on them.
//!
//! A [Block] is a native unsigned integer used both as the unit of storage in a
//! [crate::BitVector] and as the unit of carry and borrow propagation in the arithmetic engine.
//! Every multi-block operation reduces to [Block::add_with_carry] and [Block::sub_with_borrow],
//! which only rely on the wraparound of the native type.

use core::{
    fmt::Debug,
    hash::Hash,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not},
};

mod private {
    pub trait Sealed {}
}

/// An unsigned machine word usable as storage for a [crate::BitVector].
///
/// Implemented for [u8], [u16], [u32], [u64] and [u128].
pub trait Block:
    Copy
    + Default
    + Eq
    + Ord
    + Hash
    + Debug
    + Send
    + Sync
    + 'static
    + Not<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + BitAndAssign
    + BitOrAssign
    + BitXorAssign
    + private::Sealed
{
    /// Number of bits in the block.
    const BITS: usize;

    /// Block with all bits set to 0.
    const ZERO: Self;

    /// Block with only the least significant bit set.
    const ONE: Self;

    /// Block with all bits set to 1.
    const MAX: Self;

    /// Computes `self + rhs + carry`, returning the wrapped sum and whether it overflowed.
    fn add_with_carry(self, rhs: Self, carry: bool) -> (Self, bool);

    /// Computes `self - rhs - borrow`, returning the wrapped difference and whether it
    /// underflowed (that is, whether `self < rhs + borrow`).
    fn sub_with_borrow(self, rhs: Self, borrow: bool) -> (Self, bool);

    /// Shifts toward the most significant bit. Shifting by [Block::BITS] or more yields zero.
    fn shl_bits(self, n: u32) -> Self;

    /// Shifts toward the least significant bit. Shifting by [Block::BITS] or more yields zero.
    fn shr_bits(self, n: u32) -> Self;

    /// Number of set bits.
    fn count_ones(self) -> u32;

    /// Number of zero bits above the most significant set bit.
    fn leading_zeros(self) -> u32;

    /// Number of zero bits below the least significant set bit.
    fn trailing_zeros(self) -> u32;

    /// Widens a byte into a block.
    fn from_u8(byte: u8) -> Self;

    /// Truncates a block to its lowest byte.
    fn low_byte(self) -> u8;

    /// Creates a mask with the first `n` bits set to 1.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [Block::BITS].
    #[inline]
    fn low_mask(n: usize) -> Self {
        match n {
            0 => Self::ZERO,
            n if n <= Self::BITS => Self::MAX.shr_bits((Self::BITS - n) as u32),
            _ => panic!("mask exceeds block size: {n}"),
        }
    }

    /// Returns true if the bit at `offset` is set.
    #[inline]
    fn bit(self, offset: usize) -> bool {
        self & Self::ONE.shl_bits(offset as u32) != Self::ZERO
    }
}

macro_rules! impl_block {
    ($type:ty) => {
        impl private::Sealed for $type {}

        impl Block for $type {
            const BITS: usize = <$type>::BITS as usize;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MAX: Self = <$type>::MAX;

            #[inline(always)]
            fn add_with_carry(self, rhs: Self, carry: bool) -> (Self, bool) {
                let (sum, first) = self.overflowing_add(rhs);
                let (sum, second) = sum.overflowing_add(carry as $type);
                (sum, first | second)
            }

            #[inline(always)]
            fn sub_with_borrow(self, rhs: Self, borrow: bool) -> (Self, bool) {
                let (diff, first) = self.overflowing_sub(rhs);
                let (diff, second) = diff.overflowing_sub(borrow as $type);
                (diff, first | second)
            }

            #[inline(always)]
            fn shl_bits(self, n: u32) -> Self {
                self.checked_shl(n).unwrap_or(0)
            }

            #[inline(always)]
            fn shr_bits(self, n: u32) -> Self {
                self.checked_shr(n).unwrap_or(0)
            }

            #[inline(always)]
            fn count_ones(self) -> u32 {
                <$type>::count_ones(self)
            }

            #[inline(always)]
            fn leading_zeros(self) -> u32 {
                <$type>::leading_zeros(self)
            }

            #[inline(always)]
            fn trailing_zeros(self) -> u32 {
                <$type>::trailing_zeros(self)
            }

            #[inline(always)]
            fn from_u8(byte: u8) -> Self {
                byte as $type
            }

            #[inline(always)]
            fn low_byte(self) -> u8 {
                self as u8
            }
        }
    };
}

impl_block!(u8);
impl_block!(u16);
impl_block!(u32);
impl_block!(u64);
impl_block!(u128);

/// Calculates the number of blocks needed to store `num_bits`.
#[inline(always)]
pub(crate) const fn num_blocks(num_bits: usize, bits_per_block: usize) -> usize {
    num_bits.div_ceil(bits_per_block)
}

/// Clears any bits in `blocks` at positions `>= width`. Returns true if any bits were cleared.
#[inline]
pub(crate) fn trim<B: Block>(blocks: &mut [B], width: usize) -> bool {
    let offset = width % B::BITS;
    if offset == 0 {
        return false;
    }
    let Some(last) = blocks.last_mut() else {
        return false;
    };
    let old = *last;
    *last &= B::low_mask(offset);
    *last != old
}

/// Returns true if `blocks` has bits set at positions `>= width`.
#[inline]
pub(crate) fn has_trailing_bits<B: Block>(blocks: &[B], width: usize) -> bool {
    let offset = width % B::BITS;
    if offset == 0 {
        return false;
    }
    blocks
        .last()
        .is_some_and(|last| *last & !B::low_mask(offset) != B::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 0, false => (0, false); "zero")]
    #[test_case(1, 2, true => (4, false); "carry in")]
    #[test_case(255, 1, false => (0, true); "wraps")]
    #[test_case(255, 0, true => (0, true); "carry in wraps")]
    #[test_case(255, 255, true => (255, true); "maximum")]
    #[test_case(128, 127, false => (255, false); "no carry at max")]
    fn test_add_with_carry_u8(a: u8, b: u8, carry: bool) -> (u8, bool) {
        a.add_with_carry(b, carry)
    }

    #[test_case(5, 3, false => (2, false); "plain")]
    #[test_case(3, 5, false => (254, true); "borrow out")]
    #[test_case(3, 3, true => (255, true); "borrow in underflows")]
    #[test_case(0, 255, true => (0, true); "rhs plus borrow exceeds block")]
    #[test_case(255, 255, true => (255, true); "equal with borrow")]
    #[test_case(4, 3, true => (0, false); "borrow absorbed")]
    fn test_sub_with_borrow_u8(a: u8, b: u8, borrow: bool) -> (u8, bool) {
        a.sub_with_borrow(b, borrow)
    }

    #[test]
    fn test_add_with_carry_matches_wide_arithmetic() {
        for a in 0..=u8::MAX {
            for b in [0u8, 1, 7, 100, 128, 200, 254, 255] {
                for carry in [false, true] {
                    let wide = a as u16 + b as u16 + carry as u16;
                    assert_eq!(a.add_with_carry(b, carry), (wide as u8, wide > 255));
                }
            }
        }
    }

    #[test]
    fn test_sub_with_borrow_matches_wide_arithmetic() {
        for a in 0..=u8::MAX {
            for b in [0u8, 1, 7, 100, 128, 200, 254, 255] {
                for borrow in [false, true] {
                    let wide = a as i16 - b as i16 - borrow as i16;
                    assert_eq!(a.sub_with_borrow(b, borrow), (wide as u8, wide < 0));
                }
            }
        }
    }

    #[test]
    fn test_primitives_on_wide_blocks() {
        assert_eq!(u64::MAX.add_with_carry(0, true), (0, true));
        assert_eq!(u128::MAX.add_with_carry(u128::MAX, false), (u128::MAX - 1, true));
        assert_eq!(0u32.sub_with_borrow(0, true), (u32::MAX, true));
        assert_eq!(0u16.sub_with_borrow(u16::MAX, false), (1, true));
    }

    #[test]
    fn test_shift_saturates_to_zero() {
        assert_eq!(0xffu8.shl_bits(8), 0);
        assert_eq!(0xffu8.shr_bits(9), 0);
        assert_eq!(1u64.shl_bits(63), 1 << 63);
        assert_eq!(u128::MAX.shr_bits(127), 1);
    }

    #[test]
    fn test_low_mask() {
        assert_eq!(<u8 as Block>::low_mask(0), 0);
        assert_eq!(<u8 as Block>::low_mask(3), 0b111);
        assert_eq!(<u8 as Block>::low_mask(8), 0xff);
        assert_eq!(<u64 as Block>::low_mask(64), u64::MAX);
        assert_eq!(<u32 as Block>::low_mask(17), 0x1ffff);
    }

    #[test]
    #[should_panic(expected = "mask exceeds block size")]
    fn test_low_mask_too_wide() {
        <u16 as Block>::low_mask(17);
    }

    #[test]
    fn test_trim() {
        let mut blocks = [0xffu8, 0xff];
        assert!(trim(&mut blocks, 12));
        assert_eq!(blocks, [0xff, 0x0f]);
        assert!(!trim(&mut blocks, 12));
        assert!(!trim(&mut blocks, 16));
        assert!(!has_trailing_bits(&blocks, 12));
        assert!(has_trailing_bits(&blocks, 10));
    }

    #[test]
    fn test_num_blocks() {
        assert_eq!(num_blocks(1, 8), 1);
        assert_eq!(num_blocks(8, 8), 1);
        assert_eq!(num_blocks(9, 8), 2);
        assert_eq!(num_blocks(130, 64), 3);
    }
}
