/// Errors that can occur when accessing or computing with a [crate::BitVector].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A bit index fell outside the addressable range.
    #[error("index {index} out of range for width {width}")]
    IndexOutOfRange { index: usize, width: usize },

    /// A view was requested over bounds that do not satisfy `start <= end <= width`.
    #[error("view [{start}, {end}) out of range for width {width}")]
    InvalidView {
        start: usize,
        end: usize,
        width: usize,
    },

    /// The divisor was the all-zero vector.
    #[error("division by zero")]
    DivisionByZero,

    /// The result of an addition does not fit in the result width.
    #[error("overflow: result does not fit in {width} bits")]
    Overflow { width: usize },

    /// A binary string contained a character other than `0` or `1`.
    #[error("invalid binary digit {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },
}
