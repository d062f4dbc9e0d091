//! Physics layer masks used to filter world queries.

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// Number of addressable physics layers.
pub const LAYER_COUNT: u8 = 32;

/// Bit set of physics layers a query is allowed to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(u32);

impl LayerMask {
    /// Mask that matches nothing.
    pub const NONE: Self = Self(0);

    /// Mask that matches every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing a single layer.
    ///
    /// Indices at or beyond [`LAYER_COUNT`] yield an empty mask.
    #[must_use]
    pub const fn layer(index: u8) -> Self {
        if index >= LAYER_COUNT {
            Self::NONE
        } else {
            Self(1 << index)
        }
    }

    /// Creates a mask from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Checks whether the two masks share at least one layer.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Checks whether the mask is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for LayerMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_out_of_range_layer_is_empty() {
        assert!(LayerMask::layer(LAYER_COUNT).is_empty());
        assert!(!LayerMask::layer(LAYER_COUNT - 1).is_empty());
    }

    #[test]
    fn test_none_never_intersects() {
        assert!(!LayerMask::NONE.intersects(LayerMask::ALL));
    }

    proptest! {
        #[test]
        fn prop_union_contains_both(a in 0u8..32, b in 0u8..32) {
            let mask = LayerMask::layer(a) | LayerMask::layer(b);
            prop_assert!(mask.intersects(LayerMask::layer(a)));
            prop_assert!(mask.intersects(LayerMask::layer(b)));
        }
    }
}
