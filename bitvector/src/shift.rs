//! Shift engine.
//!
//! A shift by `s` bits is decomposed into a whole-block shift of `s / B::BITS` blocks followed by
//! a sub-block shift of `s % B::BITS` bits, where each block pulls in the bits that cross over
//! from its neighbour. "Left" moves bits toward the most significant end (higher indices).

use crate::{
    block::{self, Block},
    BitVector,
};
use core::ops::{Shl, ShlAssign, Shr, ShrAssign};

/// Shifts `blocks` (holding a value of `width` bits) left by `amount` bits, dropping bits shifted
/// past `width`.
pub(crate) fn shift_blocks_left<B: Block>(blocks: &mut [B], width: usize, amount: usize) {
    if amount == 0 {
        return;
    }
    if amount >= width {
        blocks.fill(B::ZERO);
        return;
    }
    move_blocks_up(blocks, amount / B::BITS);
    shift_bits_up(blocks, (amount % B::BITS) as u32);
    block::trim(blocks, width);
}

/// Shifts `blocks` (holding a value of `width` bits) right by `amount` bits.
pub(crate) fn shift_blocks_right<B: Block>(blocks: &mut [B], width: usize, amount: usize) {
    if amount == 0 {
        return;
    }
    if amount >= width {
        blocks.fill(B::ZERO);
        return;
    }
    move_blocks_down(blocks, amount / B::BITS);
    shift_bits_down(blocks, (amount % B::BITS) as u32);
}

/// Moves block `i` to block `i + count`, zero-filling the vacated low blocks.
fn move_blocks_up<B: Block>(blocks: &mut [B], count: usize) {
    if count == 0 {
        return;
    }
    let len = blocks.len();
    if count >= len {
        blocks.fill(B::ZERO);
        return;
    }
    blocks.copy_within(..len - count, count);
    blocks[..count].fill(B::ZERO);
}

/// Moves block `i` to block `i - count`, zero-filling the vacated high blocks.
fn move_blocks_down<B: Block>(blocks: &mut [B], count: usize) {
    if count == 0 {
        return;
    }
    let len = blocks.len();
    if count >= len {
        blocks.fill(B::ZERO);
        return;
    }
    blocks.copy_within(count.., 0);
    blocks[len - count..].fill(B::ZERO);
}

/// Shifts every block up by `bits < B::BITS`, carrying the top bits of each block into the next.
fn shift_bits_up<B: Block>(blocks: &mut [B], bits: u32) {
    if bits == 0 {
        return;
    }
    let carry_shift = B::BITS as u32 - bits;
    for i in (1..blocks.len()).rev() {
        blocks[i] = blocks[i].shl_bits(bits) | blocks[i - 1].shr_bits(carry_shift);
    }
    // The lowest block has no neighbour to pull from
    if let Some(first) = blocks.first_mut() {
        *first = first.shl_bits(bits);
    }
}

/// Shifts every block down by `bits < B::BITS`, pulling the low bits of the next block in.
fn shift_bits_down<B: Block>(blocks: &mut [B], bits: u32) {
    if bits == 0 {
        return;
    }
    let carry_shift = B::BITS as u32 - bits;
    let len = blocks.len();
    for i in 0..len.saturating_sub(1) {
        blocks[i] = blocks[i].shr_bits(bits) | blocks[i + 1].shl_bits(carry_shift);
    }
    // The highest block has no neighbour to pull from
    if let Some(last) = blocks.last_mut() {
        *last = last.shr_bits(bits);
    }
}

impl<const N: usize, B: Block> BitVector<N, B> {
    /// Shifts the vector toward its most significant bit, discarding bits shifted past `N - 1`.
    ///
    /// Shifting by `N` or more clears the vector.
    #[inline]
    pub fn shift_left(&mut self, amount: usize) {
        shift_blocks_left(self.blocks_mut(), N, amount);
    }

    /// Shifts the vector toward its least significant bit.
    ///
    /// Shifting by `N` or more clears the vector.
    #[inline]
    pub fn shift_right(&mut self, amount: usize) {
        shift_blocks_right(self.blocks_mut(), N, amount);
    }
}

/// Returns `value` shifted left by `amount` bits.
pub fn shift_left<const N: usize, B: Block>(
    value: &BitVector<N, B>,
    amount: usize,
) -> BitVector<N, B> {
    let mut result = value.clone();
    result.shift_left(amount);
    result
}

/// Returns `value` shifted right by `amount` bits.
pub fn shift_right<const N: usize, B: Block>(
    value: &BitVector<N, B>,
    amount: usize,
) -> BitVector<N, B> {
    let mut result = value.clone();
    result.shift_right(amount);
    result
}

impl<const N: usize, B: Block> ShlAssign<usize> for BitVector<N, B> {
    fn shl_assign(&mut self, amount: usize) {
        self.shift_left(amount);
    }
}

impl<const N: usize, B: Block> ShrAssign<usize> for BitVector<N, B> {
    fn shr_assign(&mut self, amount: usize) {
        self.shift_right(amount);
    }
}

impl<const N: usize, B: Block> Shl<usize> for BitVector<N, B> {
    type Output = Self;

    fn shl(mut self, amount: usize) -> Self::Output {
        self.shift_left(amount);
        self
    }
}

impl<const N: usize, B: Block> Shr<usize> for BitVector<N, B> {
    type Output = Self;

    fn shr(mut self, amount: usize) -> Self::Output {
        self.shift_right(amount);
        self
    }
}

impl<const N: usize, B: Block> Shl<usize> for &BitVector<N, B> {
    type Output = BitVector<N, B>;

    fn shl(self, amount: usize) -> Self::Output {
        shift_left(self, amount)
    }
}

impl<const N: usize, B: Block> Shr<usize> for &BitVector<N, B> {
    type Output = BitVector<N, B>;

    fn shr(self, amount: usize) -> Self::Output {
        shift_right(self, amount)
    }
}
