//! Floating-point comparison rules.

use std::fmt::Debug;

/// Multiplier applied to machine epsilon by the default (relative) rule.
pub const DEFAULT_EPSILON_FACTOR: u8 = 4;

/// Precision-specific comparisons for `f32` and `f64`.
///
/// Comparisons involving NaN never hold, so a NaN operand fails both the
/// equal and the not-equal checks.
pub trait Float: Copy + PartialOrd + Debug + Send + 'static {
    /// Smallest relative increment for this precision.
    const EPSILON: Self;

    /// `|a - b|`
    fn abs_diff(self, other: Self) -> Self;

    /// `|a - b| <= 4 * EPSILON * max(|a|, |b|)`
    fn nearly_equal(self, other: Self) -> bool;

    /// `|a - b| <= tolerance`
    fn within(self, other: Self, tolerance: Self) -> bool {
        self.abs_diff(other) <= tolerance
    }

    /// `|a - b| > tolerance`
    fn beyond(self, other: Self, tolerance: Self) -> bool {
        self.abs_diff(other) > tolerance
    }
}

macro_rules! impl_float {
    ($($ty:ty),*) => {
        $(
            impl Float for $ty {
                const EPSILON: Self = <$ty>::EPSILON;

                fn abs_diff(self, other: Self) -> Self {
                    (self - other).abs()
                }

                fn nearly_equal(self, other: Self) -> bool {
                    let scale = self.abs().max(other.abs());
                    Float::abs_diff(self, other)
                        <= <$ty>::from(DEFAULT_EPSILON_FACTOR) * Self::EPSILON * scale
                }
            }
        )*
    };
}

impl_float!(f32, f64);
