//! Value/mask pairs for flow match criteria.

use crate::MacAddress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Types usable as the value and mask of a [`MatchField`].
pub trait MaskBits: Copy + PartialEq {
    /// All bits clear: the wildcard mask and the domain's zero value.
    const NONE: Self;
    /// All bits set: the exact-match mask.
    const ALL: Self;
}

macro_rules! impl_mask_bits {
    ($($t:ty),*) => {
        $(impl MaskBits for $t {
            const NONE: Self = 0;
            const ALL: Self = <$t>::MAX;
        })*
    };
}

impl_mask_bits!(u8, u16, u32);

impl MaskBits for MacAddress {
    const NONE: Self = MacAddress::ZERO;
    const ALL: Self = MacAddress::BROADCAST;
}

impl MaskBits for Ipv4Addr {
    const NONE: Self = Ipv4Addr::UNSPECIFIED;
    const ALL: Self = Ipv4Addr::BROADCAST;
}

impl MaskBits for Ipv6Addr {
    const NONE: Self = Ipv6Addr::UNSPECIFIED;
    const ALL: Self = Ipv6Addr::new(
        0xffff, 0xffff, 0xffff, 0xffff, 0xffff, 0xffff, 0xffff, 0xffff,
    );
}

/// A match value together with the mask of bits significant for comparison.
///
/// A mask with no bits set is a wildcard: the field does not constrain the
/// match.
///
/// # Examples
///
/// ```
/// use ofdpa_types::MatchField;
///
/// let port = MatchField::exact(100u32);
/// assert!(port.is_exact());
///
/// let any: MatchField<u32> = MatchField::wildcard();
/// assert!(any.is_wildcard());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchField<T> {
    pub value: T,
    pub mask: T,
}

impl<T> MatchField<T> {
    pub const fn new(value: T, mask: T) -> Self {
        MatchField { value, mask }
    }
}

impl<T: MaskBits> MatchField<T> {
    /// A field matching `value` on every bit.
    pub fn exact(value: T) -> Self {
        MatchField::new(value, T::ALL)
    }

    /// A field that matches anything.
    pub fn wildcard() -> Self {
        MatchField::new(T::NONE, T::NONE)
    }

    pub fn is_wildcard(&self) -> bool {
        self.mask == T::NONE
    }

    pub fn is_exact(&self) -> bool {
        self.mask == T::ALL
    }

    /// Returns true if the value is the domain's zero.
    pub fn is_zero(&self) -> bool {
        self.value == T::NONE
    }

    /// Clears the mask when the value is zero, turning the field into a wildcard.
    pub fn collapse_zero(&mut self) {
        if self.is_zero() {
            self.mask = T::NONE;
        }
    }
}

impl<T: MaskBits> Default for MatchField<T> {
    fn default() -> Self {
        MatchField::wildcard()
    }
}

impl<T: fmt::Display> fmt::Display for MatchField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.mask)
    }
}
