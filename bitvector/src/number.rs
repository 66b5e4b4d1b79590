//! Unsigned primitive integers that a [crate::BitVector] converts from and to.

/// An unsigned primitive integer.
pub trait Number: Copy {
    /// Number of bits in the integer.
    const BITS: usize;

    /// The value zero.
    const ZERO: Self;

    /// Returns true if the bit at `index` is set. Indices at or above [Number::BITS] are unset.
    fn bit(self, index: usize) -> bool;

    /// Returns `self` with the bit at `index` set. Indices at or above [Number::BITS] are
    /// ignored.
    fn with_bit(self, index: usize) -> Self;
}

macro_rules! impl_number {
    ($type:ty) => {
        impl Number for $type {
            const BITS: usize = <$type>::BITS as usize;
            const ZERO: Self = 0;

            #[inline]
            fn bit(self, index: usize) -> bool {
                index < <Self as Number>::BITS && (self >> index) & 1 == 1
            }

            #[inline]
            fn with_bit(self, index: usize) -> Self {
                if index < <Self as Number>::BITS {
                    self | (1 << index)
                } else {
                    self
                }
            }
        }
    };
}

impl_number!(u8);
impl_number!(u16);
impl_number!(u32);
impl_number!(u64);
impl_number!(u128);
impl_number!(usize);
