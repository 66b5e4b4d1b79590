//! Bounded windows over a [BitVector].
//!
//! A view covers the bits `[start, end)` of an existing vector and shares its storage. Position
//! `0` of a view is bit `start` of the vector.

use crate::{BitVector, Block, Error};
use core::fmt::{self, Formatter, Write as _};

/// Validates `start <= end <= width`.
fn check_bounds(start: usize, end: usize, width: usize) -> Result<(), Error> {
    if start > end || end > width {
        return Err(Error::InvalidView { start, end, width });
    }
    Ok(())
}

/// Maps a view position to a vector index.
fn locate(start: usize, end: usize, pos: usize) -> Result<usize, Error> {
    match start.checked_add(pos) {
        Some(index) if index < end => Ok(index),
        _ => Err(Error::IndexOutOfRange {
            index: pos,
            width: end - start,
        }),
    }
}

/// A read-only window over the bits `[start, end)` of a [BitVector].
#[derive(Clone, Copy)]
pub struct BitView<'a, const N: usize, B: Block = u64> {
    vector: &'a BitVector<N, B>,
    start: usize,
    end: usize,
}

impl<'a, const N: usize, B: Block> BitView<'a, N, B> {
    /// Creates a view over `[start, end)` of `vector`.
    pub fn new(vector: &'a BitVector<N, B>, start: usize, end: usize) -> Result<Self, Error> {
        check_bounds(start, end, N)?;
        Ok(Self { vector, start, end })
    }

    /// Index of the first bit of the view in the underlying vector.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index one past the last bit of the view in the underlying vector.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of bits in the view.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the view covers no bits.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Gets the bit at position `pos` of the view.
    pub fn get(&self, pos: usize) -> Result<bool, Error> {
        let index = locate(self.start, self.end, pos)?;
        Ok(self.vector.get_bit_unchecked(index))
    }

    /// Returns the number of set bits in the view.
    pub fn count_ones(&self) -> usize {
        self.iter().filter(|bit| *bit).count()
    }

    /// Creates an iterator over the bits of the view, starting from position 0.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + 'a {
        let vector = self.vector;
        (self.start..self.end).map(move |index| vector.get_bit_unchecked(index))
    }
}

impl<const N: usize, B: Block> fmt::Display for BitView<'_, N, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for index in (self.start..self.end).rev() {
            f.write_char(if self.vector.get_bit_unchecked(index) {
                '1'
            } else {
                '0'
            })?;
        }
        Ok(())
    }
}

impl<const N: usize, B: Block> fmt::Debug for BitView<'_, N, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "BitView[{}..{}]({})", self.start, self.end, self)
    }
}

/// A mutable window over the bits `[start, end)` of a [BitVector].
pub struct BitViewMut<'a, const N: usize, B: Block = u64> {
    vector: &'a mut BitVector<N, B>,
    start: usize,
    end: usize,
}

impl<'a, const N: usize, B: Block> BitViewMut<'a, N, B> {
    /// Creates a mutable view over `[start, end)` of `vector`.
    pub fn new(vector: &'a mut BitVector<N, B>, start: usize, end: usize) -> Result<Self, Error> {
        check_bounds(start, end, N)?;
        Ok(Self { vector, start, end })
    }

    /// Number of bits in the view.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the view covers no bits.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Reborrows as a read-only view.
    pub fn as_view(&self) -> BitView<'_, N, B> {
        BitView {
            vector: &*self.vector,
            start: self.start,
            end: self.end,
        }
    }

    /// Gets the bit at position `pos` of the view.
    pub fn get(&self, pos: usize) -> Result<bool, Error> {
        self.as_view().get(pos)
    }

    /// Sets the bit at position `pos` of the view to `value`.
    pub fn set(&mut self, pos: usize, value: bool) -> Result<(), Error> {
        let index = locate(self.start, self.end, pos)?;
        if value {
            self.vector.set_bit_unchecked(index);
        } else {
            self.vector.clear_bit_unchecked(index);
        }
        Ok(())
    }

    /// Flips the bit at position `pos` of the view.
    pub fn flip(&mut self, pos: usize) -> Result<(), Error> {
        let index = locate(self.start, self.end, pos)?;
        self.vector.flip_bit_unchecked(index);
        Ok(())
    }

    /// Sets every bit of the view to `value`.
    pub fn fill(&mut self, value: bool) {
        for index in self.start..self.end {
            if value {
                self.vector.set_bit_unchecked(index);
            } else {
                self.vector.clear_bit_unchecked(index);
            }
        }
    }

    /// Returns the number of set bits in the view.
    pub fn count_ones(&self) -> usize {
        self.as_view().count_ones()
    }
}

impl<const N: usize, B: Block> fmt::Display for BitViewMut<'_, N, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_view(), f)
    }
}

impl<const N: usize, B: Block> BitVector<N, B> {
    /// Creates a read-only view over the bits `[start, end)`.
    pub fn view(&self, start: usize, end: usize) -> Result<BitView<'_, N, B>, Error> {
        BitView::new(self, start, end)
    }

    /// Creates a mutable view over the bits `[start, end)`.
    pub fn view_mut(&mut self, start: usize, end: usize) -> Result<BitViewMut<'_, N, B>, Error> {
        BitViewMut::new(self, start, end)
    }
}
