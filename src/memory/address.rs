//! Address: An arbitrary-precision memory address.
//!
//! Debug targets may expose address spaces wider than 64 bits, so addresses
//! are backed by [`BigUint`]. Arithmetic is limited to what line buffering
//! needs: offsetting by a unit count, aligning down, and distance between
//! two addresses.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::fmt;

/// Width in bytes assumed for addresses whose hex form fits in 8 digits.
pub const NARROW_ADDRESS_SIZE: usize = 4;
/// Width in bytes assumed for addresses whose hex form exceeds 8 digits.
pub const WIDE_ADDRESS_SIZE: usize = 8;
/// Hex characters needed to display one byte.
pub const CHARS_PER_BYTE: usize = 2;

/// An unsigned memory address of arbitrary precision.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(BigUint);

impl Address {
    /// The zero address.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Parse an address from hexadecimal digits (no `0x` prefix required).
    ///
    /// Returns `None` if the string is empty or contains non-hex characters.
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return None;
        }
        BigUint::parse_bytes(digits.as_bytes(), 16).map(Self)
    }

    /// Lowercase hex digits without padding or prefix.
    pub fn to_hex(&self) -> String {
        self.0.to_str_radix(16)
    }

    /// Uppercase hex, left-padded with zeros to at least `width` characters.
    pub fn to_padded_hex(&self, width: usize) -> String {
        let digits = self.0.to_str_radix(16).to_uppercase();
        format!("{digits:0>width$}")
    }

    /// Number of hex digits in the unpadded representation.
    pub fn hex_len(&self) -> usize {
        self.to_hex().len()
    }

    /// Round down to the nearest multiple of `boundary`.
    ///
    /// A boundary of 0 or 1 leaves the address unchanged.
    #[must_use]
    pub fn align_down(&self, boundary: u64) -> Self {
        if boundary <= 1 {
            return self.clone();
        }
        let rem = &self.0 % BigUint::from(boundary);
        Self(&self.0 - rem)
    }

    /// Distance to the next lower `boundary` multiple (`self - align_down`).
    pub fn misalignment(&self, boundary: u64) -> u64 {
        if boundary <= 1 {
            return 0;
        }
        (&self.0 % BigUint::from(boundary)).to_u64().unwrap_or(0)
    }

    /// Address `units` addressable units past this one.
    #[must_use]
    pub fn offset(&self, units: u64) -> Self {
        Self(&self.0 + BigUint::from(units))
    }

    /// Address `units` below this one, clamped at zero.
    #[must_use]
    pub fn saturating_sub(&self, units: u64) -> Self {
        let units = BigUint::from(units);
        if self.0 <= units {
            Self::zero()
        } else {
            Self(&self.0 - units)
        }
    }

    /// Units from this address up to `other`.
    ///
    /// `None` if `other` lies below this address or the distance does not
    /// fit in a `u64`.
    pub fn distance_to(&self, other: &Self) -> Option<u64> {
        if other.0 < self.0 {
            return None;
        }
        (&other.0 - &self.0).to_u64()
    }

    /// Divide by `divisor`, truncating. Returns zero for a zero divisor.
    pub fn div_u64(&self, divisor: u64) -> Self {
        if divisor == 0 {
            return Self::zero();
        }
        Self(&self.0 / BigUint::from(divisor))
    }

    /// Convert to `u64` if the value fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    /// Check whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Borrow the underlying big integer.
    pub const fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for Address {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for Address {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.0.to_str_radix(16))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.0.to_str_radix(16).to_uppercase())
    }
}

/// Infer the display width in bytes for an address with no declared size.
pub fn inferred_address_size(address: &Address) -> usize {
    if address.hex_len() > 8 {
        WIDE_ADDRESS_SIZE
    } else {
        NARROW_ADDRESS_SIZE
    }
}
