//! # Field Module
//!
//! Arithmetic in GF(p) for the Goldilocks prime `p = 2^64 - 2^32 + 1`.
//!
//! Every `FieldElement` holds its canonical representative in `0..p`, so
//! equality and ordering compare canonical values directly. Multiplication
//! reduces a 128-bit product with two identities of this prime:
//!
//! ```text
//! 2^64 ≡ 2^32 - 1 (mod p)
//! 2^96 ≡ -1       (mod p)
//! ```

mod batch;

pub use batch::{batch_inversion, elements_from_bytes, elements_to_bytes};

use crate::error::FieldError;
use core::fmt::{Display, Formatter, Result as FmtResult};
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// CONSTANTS
// =============================================================================

/// The field modulus, `2^64 - 2^32 + 1`.
pub const PRIME: u64 = 0xFFFF_FFFF_0000_0001;

/// Additive identity.
pub const ZERO: FieldElement = FieldElement { value: 0 };

/// Multiplicative identity.
pub const ONE: FieldElement = FieldElement { value: 1 };

// =============================================================================
// FIELD ELEMENT
// =============================================================================

/// An element of GF(p), stored as its canonical `u64` representative.
///
/// Values `>= PRIME` are never stored: `new` and every `From` impl reduce,
/// and `from_bytes` rejects non-canonical encodings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldElement {
    value: u64,
}

impl FieldElement {
    /// Additive identity.
    pub const ZERO: Self = ZERO;

    /// Multiplicative identity.
    pub const ONE: Self = ONE;

    /// Create a field element, reducing `value` modulo `PRIME`.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self {
            value: value % PRIME,
        }
    }

    /// Create a field element from a 128-bit integer, reducing modulo `PRIME`.
    #[must_use]
    pub fn from_u128(value: u128) -> Self {
        Self::new(reduce(value))
    }

    /// Canonical integer value in `0..PRIME`.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Alias for [`value`](Self::value).
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> u64 {
        self.value
    }

    /// Check whether this is the additive identity.
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// `self + self`.
    #[inline]
    #[must_use]
    pub fn double(&self) -> Self {
        *self + *self
    }

    /// `self * self`.
    #[inline]
    #[must_use]
    pub fn square(&self) -> Self {
        *self * *self
    }

    /// `self * self * self`.
    #[inline]
    #[must_use]
    pub fn cube(&self) -> Self {
        self.square() * *self
    }

    /// Raise to the power of a field element's canonical value.
    ///
    /// Not constant time: the loop branches on the exponent bits.
    #[inline]
    #[must_use]
    pub fn exp(self, pow: Self) -> Self {
        self.exp_u64(pow.value)
    }

    /// Raise to an arbitrary `u64` power by square-and-multiply.
    ///
    /// `x^0 = 1` for every `x` (including zero); `0^k = 0` for `k > 0`.
    #[must_use]
    pub fn exp_u64(self, pow: u64) -> Self {
        if pow == 0 {
            return ONE;
        }
        if self.is_zero() {
            return ZERO;
        }

        // Scan exponent bits from least significant; `base` walks
        // through self^(2^i) and multiplies in wherever bit i is set.
        let mut base = self;
        let mut result = if pow & 1 == 1 { base } else { ONE };
        let mut remaining = pow >> 1;

        while remaining > 0 {
            base = base.square();
            if remaining & 1 == 1 {
                result *= base;
            }
            remaining >>= 1;
        }

        result
    }

    /// Multiplicative inverse via Fermat's little theorem, `x^(p - 2)`.
    ///
    /// Uses a fixed addition chain of 72 multiplications. The inverse of
    /// zero is undefined; this returns zero for it. Use [`try_inv`] when the
    /// input may be zero.
    ///
    /// [`try_inv`]: Self::try_inv
    #[inline]
    #[must_use]
    pub fn inv(self) -> Self {
        // p - 2 = 0b 1{31} 0 1{32}
        let t2 = self.cube(); // 11
        let t3 = t2.square() * self; // 111
        let t6 = exp_acc::<3>(t3, t3); // 1{6}
        let t12 = exp_acc::<6>(t6, t6); // 1{12}
        let t24 = exp_acc::<12>(t12, t12); // 1{24}
        let t30 = exp_acc::<6>(t24, t6); // 1{30}
        let t31 = t30.square() * self; // 1{31}
        let t63 = exp_acc::<32>(t31, t31); // 1{31} 0 1{31}

        t63.square() * self
    }

    /// Multiplicative inverse, failing on zero.
    pub fn try_inv(self) -> Result<Self, FieldError> {
        if self.is_zero() {
            Err(FieldError::ZeroInverse)
        } else {
            Ok(self.inv())
        }
    }

    /// Division that fails when `other` is zero.
    pub fn checked_div(self, other: Self) -> Result<Self, FieldError> {
        Ok(self * other.try_inv()?)
    }

    /// Serialize into 8 little-endian bytes.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 8] {
        self.value.to_le_bytes()
    }

    /// Deserialize from 8 little-endian bytes.
    ///
    /// Non-canonical encodings (`>= PRIME`) are rejected rather than reduced.
    pub fn from_bytes(bytes: &[u8; 8]) -> Result<Self, FieldError> {
        let value = u64::from_le_bytes(*bytes);
        if value >= PRIME {
            Err(FieldError::DeserializationError)
        } else {
            Ok(Self { value })
        }
    }

    /// Create from a canonical value, rejecting anything `>= PRIME`.
    pub fn from_canonical(value: u64) -> Result<Self, FieldError> {
        if value >= PRIME {
            Err(FieldError::InvalidValue(value))
        } else {
            Ok(Self { value })
        }
    }
}

impl Display for FieldElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.value)
    }
}

// =============================================================================
// ARITHMETIC
// =============================================================================

impl Add for FieldElement {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        // Both operands are < p, so the sum is < 2p and one correction suffices.
        // On u64 overflow, wrapping back by 2^64 and subtracting p differ by
        // 2^32 - 1, which wrapping_sub(PRIME) accounts for.
        let (sum, carry) = self.value.overflowing_add(other.value);
        Self::new(sum.wrapping_sub(PRIME * u64::from(carry)))
    }
}

impl AddAssign for FieldElement {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for FieldElement {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        let (diff, borrow) = self.value.overflowing_sub(other.value);
        Self::new(diff.wrapping_add(PRIME * u64::from(borrow)))
    }
}

impl SubAssign for FieldElement {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul for FieldElement {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self {
        Self::new(reduce(u128::from(self.value) * u128::from(other.value)))
    }
}

impl MulAssign for FieldElement {
    #[inline]
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Div for FieldElement {
    type Output = Self;

    /// Division by zero yields zero; see [`FieldElement::checked_div`].
    #[inline]
    fn div(self, other: Self) -> Self {
        self * other.inv()
    }
}

impl DivAssign for FieldElement {
    #[inline]
    fn div_assign(&mut self, other: Self) {
        *self = *self / other;
    }
}

impl Neg for FieldElement {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        if self.value == 0 {
            self
        } else {
            Self {
                value: PRIME - self.value,
            }
        }
    }
}

impl Sum for FieldElement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a FieldElement> for FieldElement {
    fn sum<I: Iterator<Item = &'a FieldElement>>(iter: I) -> Self {
        iter.fold(ZERO, |acc, x| acc + *x)
    }
}

impl Product for FieldElement {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(ONE, |acc, x| acc * x)
    }
}

impl<'a> Product<&'a FieldElement> for FieldElement {
    fn product<I: Iterator<Item = &'a FieldElement>>(iter: I) -> Self {
        iter.fold(ONE, |acc, x| acc * *x)
    }
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<u32> for FieldElement {
    fn from(value: u32) -> Self {
        Self {
            value: u64::from(value),
        }
    }
}

impl From<u16> for FieldElement {
    fn from(value: u16) -> Self {
        Self {
            value: u64::from(value),
        }
    }
}

impl From<u8> for FieldElement {
    fn from(value: u8) -> Self {
        Self {
            value: u64::from(value),
        }
    }
}

impl From<bool> for FieldElement {
    fn from(value: bool) -> Self {
        Self {
            value: u64::from(value),
        }
    }
}

impl From<FieldElement> for u64 {
    fn from(element: FieldElement) -> Self {
        element.value
    }
}

// No From<[u8; 8]>: it would have to pick an endianness and reduce silently.
impl TryFrom<[u8; 8]> for FieldElement {
    type Error = FieldError;

    fn try_from(bytes: [u8; 8]) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value)
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u64::deserialize(deserializer)?;
        Self::from_canonical(value).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// REDUCTION
// =============================================================================

/// Reduce a 128-bit integer modulo `PRIME`.
///
/// Writes `x = low + 2^64 * middle + 2^96 * high` and substitutes
/// `2^96 ≡ -1` and `2^64 ≡ 2^32 - 1`, so `x ≡ low - high + (2^32 - 1) * middle`.
/// The result fits in a `u64` but is not guaranteed canonical; callers pass
/// it through [`FieldElement::new`].
///
/// See <https://cp4space.hatsya.com/2021/09/01/an-efficient-prime-for-number-theoretic-transforms/>
#[inline]
#[must_use]
pub fn reduce(x: u128) -> u64 {
    let low = x as u64;
    let middle_high = (x >> 64) as u64;
    let middle = u64::from(middle_high as u32);
    let high = middle_high >> 32;

    // low - high; on borrow add p (mod 2^64 that is subtracting 2^32 - 1)
    let (diff, borrow) = low.overflowing_sub(high);
    let diff = diff.wrapping_add(PRIME * u64::from(borrow));

    // middle < 2^32, so this cannot overflow
    let product = (middle << 32) - middle;

    let (sum, carry) = diff.overflowing_add(product);
    sum.wrapping_sub(PRIME * u64::from(carry))
}

/// Square `base` N times, then multiply by `tail`.
#[inline(always)]
fn exp_acc<const N: usize>(base: FieldElement, tail: FieldElement) -> FieldElement {
    let mut result = base;
    for _ in 0..N {
        result = result.square();
    }
    result * tail
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reduces_modulo_prime() {
        assert_eq!(FieldElement::new(PRIME), ZERO);
        assert_eq!(FieldElement::new(PRIME + 5).value(), 5);
        assert_eq!(FieldElement::new(u64::MAX).value(), u64::MAX - PRIME);
    }

    #[test]
    fn addition() {
        let a = FieldElement::new(15);
        let b = FieldElement::new(35);
        assert_eq!((a + b).value(), 50);

        // Field overflow
        let a = FieldElement::new(PRIME) - ONE;
        let b = FieldElement::new(25);
        assert_eq!((a + b).value(), 24);

        // u64 overflow
        let a = FieldElement::new(PRIME - 1);
        let b = FieldElement::new(PRIME - 2);
        assert_eq!((a + b).value(), PRIME - 3);
    }

    #[test]
    fn subtraction() {
        let a = FieldElement::new(15);
        let b = FieldElement::new(35);
        assert_eq!((b - a).value(), 20);
        assert_eq!((a - b).value(), PRIME - 20);
        assert_eq!((ZERO - ONE).value(), PRIME - 1);
    }

    #[test]
    fn negation() {
        let a = FieldElement::new(15);
        let negated = -a;
        assert_eq!(negated.value(), PRIME - 15);
        assert_eq!(a + negated, ZERO);
        assert_eq!(-ZERO, ZERO);
    }

    #[test]
    fn multiplication() {
        assert_eq!((FieldElement::new(3) * FieldElement::new(5)).value(), 15);

        // (p - 1)(p - 2) = (-1)(-2) = 2
        let a = FieldElement::new(PRIME - 1);
        let b = FieldElement::new(PRIME - 2);
        assert_eq!((a * b).value(), 2);

        // 2^32 * 2^32 = 2^64 ≡ 2^32 - 1
        let two_32 = FieldElement::new(1 << 32);
        assert_eq!((two_32 * two_32).value(), (1 << 32) - 1);
    }

    #[test]
    fn reduce_handles_boundaries() {
        assert_eq!(reduce(0), 0);
        assert_eq!(FieldElement::new(reduce(u128::from(PRIME))), ZERO);
        // 2^96 ≡ -1
        assert_eq!(FieldElement::new(reduce(1u128 << 96)).value(), PRIME - 1);
        assert_eq!(
            FieldElement::from_u128(u128::MAX).value(),
            (u128::MAX % u128::from(PRIME)) as u64
        );
    }

    #[test]
    fn double_square_cube() {
        let a = FieldElement::new(PRIME - 1);
        assert_eq!(a.double().value(), PRIME - 2);
        assert_eq!(a.square(), ONE);
        assert_eq!(a.cube(), a);
        assert_eq!(FieldElement::new(4).cube().value(), 64);
    }

    #[test]
    fn exponentiation() {
        let three = FieldElement::new(3);
        assert_eq!(three.exp(FieldElement::new(5)).value(), 243);
        assert_eq!(three.exp(ZERO), ONE);
        assert_eq!(ZERO.exp(ZERO), ONE);
        assert_eq!(ZERO.exp(FieldElement::new(9)), ZERO);
        // Fermat: x^(p-1) = 1
        assert_eq!(FieldElement::new(7).exp_u64(PRIME - 1), ONE);
    }

    #[test]
    fn inversion() {
        let two = FieldElement::new(2);
        assert_eq!(two.inv().value(), 9_223_372_034_707_292_161);
        assert_eq!(two * two.inv(), ONE);
        assert_eq!(ONE.inv(), ONE);
        assert_eq!(ZERO.inv(), ZERO);

        let x = FieldElement::new(0x1234_5678_9ABC_DEF0);
        assert_eq!(x * x.inv(), ONE);
        assert_eq!(x.inv(), x.exp_u64(PRIME - 2));
    }

    #[test]
    fn checked_inversion_and_division() {
        assert_eq!(ZERO.try_inv(), Err(FieldError::ZeroInverse));
        assert_eq!(
            FieldElement::new(10).checked_div(ZERO),
            Err(FieldError::ZeroInverse)
        );
        assert_eq!(
            FieldElement::new(10).checked_div(FieldElement::new(5)),
            Ok(FieldElement::new(2))
        );
        assert_eq!(FieldElement::new(10) / ZERO, ZERO);
    }

    #[test]
    fn byte_encoding() {
        let a = FieldElement::new(0x0102_0304_0506_0708);
        assert_eq!(a.to_bytes(), [8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(FieldElement::from_bytes(&a.to_bytes()), Ok(a));

        assert_eq!(
            FieldElement::from_bytes(&PRIME.to_le_bytes()),
            Err(FieldError::DeserializationError)
        );
        assert_eq!(
            FieldElement::try_from((PRIME - 1).to_le_bytes()),
            Ok(FieldElement::new(PRIME - 1))
        );
    }

    #[test]
    fn canonical_construction() {
        assert_eq!(FieldElement::from_canonical(7), Ok(FieldElement::new(7)));
        assert_eq!(
            FieldElement::from_canonical(PRIME),
            Err(FieldError::InvalidValue(PRIME))
        );
    }

    #[test]
    fn sum_and_product() {
        let values = [1u64, 2, 3, 4].map(FieldElement::new);
        assert_eq!(values.iter().sum::<FieldElement>().value(), 10);
        assert_eq!(values.into_iter().product::<FieldElement>().value(), 24);
        assert_eq!(core::iter::empty::<FieldElement>().sum::<FieldElement>(), ZERO);
        assert_eq!(
            core::iter::empty::<FieldElement>().product::<FieldElement>(),
            ONE
        );
    }

    #[test]
    fn small_integer_conversions() {
        assert_eq!(FieldElement::from(7u8).value(), 7);
        assert_eq!(FieldElement::from(7u16).value(), 7);
        assert_eq!(FieldElement::from(u32::MAX).value(), u64::from(u32::MAX));
        assert_eq!(FieldElement::from(true), ONE);
        assert_eq!(u64::from(FieldElement::new(42)), 42);
    }

    #[test]
    fn ordering_follows_canonical_value() {
        let mut values = [5u64, PRIME + 1, 3].map(FieldElement::new);
        values.sort();
        assert_eq!(values.map(|v| v.value()), [1u64, 3, 5]);
    }

    #[test]
    fn display_is_decimal() {
        assert_eq!(alloc::format!("{}", FieldElement::new(PRIME - 1)), "18446744069414584320");
    }
}
