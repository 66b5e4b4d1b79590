//! Fixed-width bit-vector storage.
//!
//! A [BitVector] holds exactly `N` bits in [Block]s, least significant block first. Bit `0` is
//! the least significant bit. An invariant of the implementation is that any bits in the last
//! block that are not part of the vector are set to 0, so counting, comparison and shifting never
//! observe stale high bits.

use crate::{
    arith,
    block::{self, Block},
    Error, Number,
};
#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};
use bytes::{Buf, BufMut};
use commonware_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};
use core::{
    cmp::Ordering,
    fmt::{self, Formatter, Write as _},
    hash::{Hash, Hasher},
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Index, Not},
    str::FromStr,
};
use rand::Rng;
use tracing::debug;

/// A vector of exactly `N` bits stored in blocks of type `B`.
#[derive(Clone)]
pub struct BitVector<const N: usize, B: Block = u64> {
    /// The underlying storage, `N.div_ceil(B::BITS)` blocks long.
    blocks: Vec<B>,
}

impl<const N: usize, B: Block> BitVector<N, B> {
    /// Number of bits in the vector.
    pub const WIDTH: usize = N;

    /// Number of blocks backing the vector.
    pub const BLOCKS: usize = block::num_blocks(N, B::BITS);

    /// Creates a vector with all bits set to 0.
    #[inline]
    pub fn zeroes() -> Self {
        const { assert!(N > 0, "bit vector width must be at least 1") };
        Self {
            blocks: vec![B::ZERO; Self::BLOCKS],
        }
    }

    /// Creates a vector with all bits set to 1.
    #[inline]
    pub fn ones() -> Self {
        let mut result = Self::zeroes();
        result.set_all();
        result
    }

    /// Creates a vector from the bits of an unsigned integer.
    ///
    /// Bits of `value` at positions `N` and above are dropped.
    pub fn from_number<T: Number>(value: T) -> Self {
        let mut result = Self::zeroes();
        for index in 0..N.min(T::BITS) {
            if value.bit(index) {
                result.set_bit_unchecked(index);
            }
        }
        result
    }

    /// Creates a vector from a slice of bools, where `bits[0]` becomes bit 0.
    ///
    /// Entries beyond the width of the vector are dropped.
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut result = Self::zeroes();
        for (index, &bit) in bits.iter().take(N).enumerate() {
            if bit {
                result.set_bit_unchecked(index);
            }
        }
        result
    }

    /// Parses a string of binary digits, most significant digit first.
    ///
    /// Shorter strings are padded with leading zeros. Longer strings keep their last `N` digits.
    /// Every character must be `0` or `1`, including those that are truncated away.
    pub fn from_binary_str(digits: &str) -> Result<Self, Error> {
        let len = digits.chars().count();
        let mut result = Self::zeroes();
        for (position, found) in digits.chars().enumerate() {
            let value = match found {
                '0' => false,
                '1' => true,
                _ => return Err(Error::InvalidDigit { position, found }),
            };
            let index = len - 1 - position;
            if value && index < N {
                result.set_bit_unchecked(index);
            }
        }
        Ok(result)
    }

    /// Creates a vector with uniformly random bits.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = vec![0u8; Self::SIZE];
        rng.fill(&mut bytes[..]);
        let mut result = Self::zeroes();
        for (byte_index, byte) in bytes.into_iter().enumerate() {
            result.load_byte(byte_index, byte);
        }
        result.trim();
        result
    }

    /// Converts to a vector of width `M`, truncating high bits or zero-extending.
    pub fn resize<const M: usize>(&self) -> BitVector<M, B> {
        let mut result = BitVector::<M, B>::zeroes();
        let shared = Self::BLOCKS.min(BitVector::<M, B>::BLOCKS);
        result.blocks[..shared].copy_from_slice(&self.blocks[..shared]);
        result.trim();
        result
    }

    /// Returns the number of bits in the vector.
    #[inline]
    pub const fn size(&self) -> usize {
        N
    }

    /// Returns the underlying blocks, least significant first.
    #[inline]
    pub fn blocks(&self) -> &[B] {
        &self.blocks
    }

    /// Gets the value of the bit at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<bool, Error> {
        Self::check_index(index)?;
        Ok(self.get_bit_unchecked(index))
    }

    /// Sets the bit at `index` to `value`.
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) -> Result<(), Error> {
        Self::check_index(index)?;
        if value {
            self.set_bit_unchecked(index);
        } else {
            self.clear_bit_unchecked(index);
        }
        Ok(())
    }

    /// Flips the bit at `index`.
    #[inline]
    pub fn flip(&mut self, index: usize) -> Result<(), Error> {
        Self::check_index(index)?;
        self.flip_bit_unchecked(index);
        Ok(())
    }

    /// Sets all bits to 0.
    #[inline]
    pub fn clear_all(&mut self) {
        self.blocks.fill(B::ZERO);
    }

    /// Sets all bits to 1.
    #[inline]
    pub fn set_all(&mut self) {
        self.blocks.fill(B::MAX);
        self.trim();
    }

    /// Flips all bits (1s become 0s and vice versa).
    pub fn invert(&mut self) {
        for block in &mut self.blocks {
            *block = !*block;
        }
        self.trim();
    }

    /// Returns the number of bits set to 1.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.blocks
            .iter()
            .map(|block| block.count_ones() as usize)
            .sum()
    }

    /// Returns the number of bits set to 0.
    #[inline]
    pub fn count_zeros(&self) -> usize {
        N - self.count_ones()
    }

    /// Returns true if every bit is set.
    pub fn all(&self) -> bool {
        self.count_ones() == N
    }

    /// Returns true if at least one bit is set.
    pub fn any(&self) -> bool {
        self.blocks.iter().any(|block| *block != B::ZERO)
    }

    /// Returns true if no bit is set.
    pub fn none(&self) -> bool {
        !self.any()
    }

    /// Returns true if the vector represents zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.none()
    }

    /// Returns the index of the most significant set bit, or `None` if no bit is set.
    pub fn highest_set_bit(&self) -> Option<usize> {
        self.blocks
            .iter()
            .enumerate()
            .rev()
            .find(|(_, block)| **block != B::ZERO)
            .map(|(index, block)| (index + 1) * B::BITS - 1 - block.leading_zeros() as usize)
    }

    /// Reconstructs an unsigned integer from the bits of the vector.
    ///
    /// Bits at positions the target type cannot hold are dropped.
    pub fn to_number<T: Number>(&self) -> T {
        self.iter_ones()
            .take_while(|index| *index < T::BITS)
            .fold(T::ZERO, |value, index| value.with_bit(index))
    }

    /// Creates an iterator over all bits, starting from bit 0.
    pub fn iter(&self) -> BitIterator<'_, N, B> {
        BitIterator {
            vector: self,
            pos: 0,
        }
    }

    /// Creates an iterator over the indices of set bits in ascending order.
    pub fn iter_ones(&self) -> Ones<'_, B> {
        Ones {
            blocks: &self.blocks,
            block_index: 0,
            current: self.blocks.first().copied().unwrap_or(B::ZERO),
        }
    }

    // ---------- Helper Functions ----------

    /// Calculates the block index for a given bit index.
    #[inline(always)]
    fn block_index(index: usize) -> usize {
        index / B::BITS
    }

    /// Calculates the bit offset within a block.
    #[inline(always)]
    fn bit_offset(index: usize) -> usize {
        index % B::BITS
    }

    #[inline(always)]
    fn check_index(index: usize) -> Result<(), Error> {
        if index >= N {
            return Err(Error::IndexOutOfRange { index, width: N });
        }
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn get_bit_unchecked(&self, index: usize) -> bool {
        self.blocks[Self::block_index(index)].bit(Self::bit_offset(index))
    }

    #[inline(always)]
    pub(crate) fn set_bit_unchecked(&mut self, index: usize) {
        let mask = B::ONE.shl_bits(Self::bit_offset(index) as u32);
        self.blocks[Self::block_index(index)] |= mask;
    }

    #[inline(always)]
    pub(crate) fn clear_bit_unchecked(&mut self, index: usize) {
        let mask = B::ONE.shl_bits(Self::bit_offset(index) as u32);
        self.blocks[Self::block_index(index)] &= !mask;
    }

    #[inline(always)]
    pub(crate) fn flip_bit_unchecked(&mut self, index: usize) {
        let mask = B::ONE.shl_bits(Self::bit_offset(index) as u32);
        self.blocks[Self::block_index(index)] ^= mask;
    }

    #[inline(always)]
    pub(crate) fn blocks_mut(&mut self) -> &mut [B] {
        &mut self.blocks
    }

    /// Clears any bits in storage beyond the last valid bit. Returns true if any bits were cleared.
    #[inline]
    pub(crate) fn trim(&mut self) -> bool {
        block::trim(&mut self.blocks, N)
    }

    /// ORs `byte` into the storage as bits `8 * byte_index..8 * byte_index + 8`.
    fn load_byte(&mut self, byte_index: usize, byte: u8) {
        let bit = byte_index * 8;
        if let Some(block) = self.blocks.get_mut(Self::block_index(bit)) {
            *block |= B::from_u8(byte).shl_bits(Self::bit_offset(bit) as u32);
        }
    }
}

// ---------- Constructors ----------

impl<const N: usize, B: Block> Default for BitVector<N, B> {
    fn default() -> Self {
        Self::zeroes()
    }
}

impl<const N: usize, B: Block> FromStr for BitVector<N, B> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_binary_str(s)
    }
}

// ---------- Converters ----------

impl<const N: usize, B: Block> From<&BitVector<N, B>> for Vec<bool> {
    fn from(vector: &BitVector<N, B>) -> Self {
        vector.iter().collect()
    }
}

// ---------- Codec ----------

impl<const N: usize, B: Block> Write for BitVector<N, B> {
    fn write(&self, buf: &mut impl BufMut) {
        // Little-endian bytes, independent of the block type
        for byte_index in 0..Self::SIZE {
            let bit = byte_index * 8;
            let block = self.blocks[Self::block_index(bit)];
            block
                .shr_bits(Self::bit_offset(bit) as u32)
                .low_byte()
                .write(buf);
        }
    }
}

impl<const N: usize, B: Block> Read for BitVector<N, B> {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let mut result = Self::zeroes();
        for byte_index in 0..Self::SIZE {
            result.load_byte(byte_index, u8::read(buf)?);
        }

        // Ensure there were no trailing bits
        if result.trim() {
            debug!(width = N, "rejected encoding with trailing bits");
            return Err(CodecError::Invalid("BitVector", "trailing bits"));
        }
        Ok(result)
    }
}

impl<const N: usize, B: Block> FixedSize for BitVector<N, B> {
    const SIZE: usize = N.div_ceil(8);
}

// ---------- Comparison ----------

impl<const N: usize, const M: usize, B: Block> PartialEq<BitVector<M, B>> for BitVector<N, B> {
    fn eq(&self, other: &BitVector<M, B>) -> bool {
        arith::compare(self, other) == Ordering::Equal
    }
}

impl<const N: usize, B: Block> Eq for BitVector<N, B> {}

impl<const N: usize, const M: usize, B: Block> PartialOrd<BitVector<M, B>> for BitVector<N, B> {
    fn partial_cmp(&self, other: &BitVector<M, B>) -> Option<Ordering> {
        Some(arith::compare(self, other))
    }
}

impl<const N: usize, B: Block> Ord for BitVector<N, B> {
    fn cmp(&self, other: &Self) -> Ordering {
        arith::compare(self, other)
    }
}

impl<const N: usize, B: Block> Hash for BitVector<N, B> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.blocks.hash(state);
    }
}

// ---------- Formatting ----------

impl<const N: usize, B: Block> BitVector<N, B> {
    /// Writes the bits in `range`, most significant first.
    fn write_digits(
        &self,
        f: &mut Formatter<'_>,
        range: core::ops::Range<usize>,
    ) -> fmt::Result {
        for index in range.rev() {
            f.write_char(if self.get_bit_unchecked(index) {
                '1'
            } else {
                '0'
            })?;
        }
        Ok(())
    }

    fn digits(&self) -> String {
        (0..N)
            .rev()
            .map(|index| {
                if self.get_bit_unchecked(index) {
                    '1'
                } else {
                    '0'
                }
            })
            .collect()
    }
}

impl<const N: usize, B: Block> fmt::Display for BitVector<N, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(&self.digits())
    }
}

impl<const N: usize, B: Block> fmt::Binary for BitVector<N, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad_integral(true, "0b", &self.digits())
    }
}

impl<const N: usize, B: Block> fmt::Debug for BitVector<N, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // For very large vectors, only show a preview
        const MAX_DISPLAY: usize = 64;
        const HALF_DISPLAY: usize = MAX_DISPLAY / 2;

        write!(f, "BitVector<{}>[", N)?;
        if N <= MAX_DISPLAY {
            self.write_digits(f, 0..N)?;
        } else {
            self.write_digits(f, (N - HALF_DISPLAY)..N)?;
            f.write_str("...")?;
            self.write_digits(f, 0..HALF_DISPLAY)?;
        }
        f.write_str("]")
    }
}

// ---------- Operations ----------

impl<const N: usize, B: Block> Index<usize> for BitVector<N, B> {
    type Output = bool;

    /// Allows reading bits using the `[]` operator.
    ///
    /// Panics if out of bounds.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        assert!(index < N, "index {} out of range for width {}", index, N);
        if self.get_bit_unchecked(index) {
            &true
        } else {
            &false
        }
    }
}

impl<const N: usize, B: Block> Not for BitVector<N, B> {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.invert();
        self
    }
}

impl<const N: usize, B: Block> Not for &BitVector<N, B> {
    type Output = BitVector<N, B>;

    fn not(self) -> Self::Output {
        !self.clone()
    }
}

macro_rules! impl_bitwise {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl<const N: usize, B: Block> $assign_trait<&BitVector<N, B>> for BitVector<N, B> {
            fn $assign_method(&mut self, rhs: &BitVector<N, B>) {
                for (a, b) in self.blocks.iter_mut().zip(rhs.blocks.iter()) {
                    *a = *a $op *b;
                }
            }
        }

        impl<const N: usize, B: Block> $assign_trait for BitVector<N, B> {
            fn $assign_method(&mut self, rhs: Self) {
                $assign_trait::$assign_method(self, &rhs);
            }
        }

        impl<const N: usize, B: Block> $trait<&BitVector<N, B>> for BitVector<N, B> {
            type Output = Self;

            fn $method(mut self, rhs: &BitVector<N, B>) -> Self::Output {
                $assign_trait::$assign_method(&mut self, rhs);
                self
            }
        }

        impl<const N: usize, B: Block> $trait for BitVector<N, B> {
            type Output = Self;

            fn $method(mut self, rhs: Self) -> Self::Output {
                $assign_trait::$assign_method(&mut self, &rhs);
                self
            }
        }

        impl<const N: usize, B: Block> $trait for &BitVector<N, B> {
            type Output = BitVector<N, B>;

            fn $method(self, rhs: Self) -> Self::Output {
                let mut result = self.clone();
                $assign_trait::$assign_method(&mut result, rhs);
                result
            }
        }
    };
}

impl_bitwise!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
impl_bitwise!(BitOr, bitor, BitOrAssign, bitor_assign, |);
impl_bitwise!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

// ---------- Iterators ----------

/// Iterator over the bits of a [BitVector], starting from bit 0.
pub struct BitIterator<'a, const N: usize, B: Block> {
    /// Reference to the vector being iterated over
    vector: &'a BitVector<N, B>,

    /// Current position in the vector (0-indexed)
    pos: usize,
}

impl<const N: usize, B: Block> Iterator for BitIterator<'_, N, B> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= N {
            return None;
        }

        let bit = self.vector.get_bit_unchecked(self.pos);
        self.pos += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = N - self.pos;
        (remaining, Some(remaining))
    }
}

impl<const N: usize, B: Block> ExactSizeIterator for BitIterator<'_, N, B> {}

/// Iterator over the indices of the set bits of a [BitVector], in ascending order.
pub struct Ones<'a, B: Block> {
    blocks: &'a [B],
    block_index: usize,
    /// Unvisited set bits of the current block.
    current: B,
}

impl<B: Block> Iterator for Ones<'_, B> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current == B::ZERO {
            self.block_index += 1;
            self.current = *self.blocks.get(self.block_index)?;
        }
        let offset = self.current.trailing_zeros();
        self.current ^= B::ONE.shl_bits(offset);
        Some(self.block_index * B::BITS + offset as usize)
    }
}
