// src/num/scalar.rs
//! The closed set of numeric representations the domain understands.
//!
//! `Scalar` is implemented for exactly the ten kinds the type system carries
//! (i8-i64, u8-u64, f32, f64). All impls go through the two macros below so
//! the per-representation rules are stated once per class, not once per type.

use std::cmp::Ordering;
use std::fmt::{Debug, Display};

use crate::num::promote::Promoted;
use crate::types::NumericKind;

mod sealed {
    pub trait Sealed {}
}

/// A machine numeric representation usable in value-sets.
///
/// The trait is sealed: the domain is a closed world of ten kinds, matching
/// the `NumericKind` enum in the type arena.
pub trait Scalar:
    Copy + PartialOrd + Debug + Display + Send + Sync + 'static + sealed::Sealed
{
    /// The type-arena kind tag for this representation.
    const KIND: NumericKind;

    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;
    const ONE: Self;
    /// Smallest representable difference: 1 for integers, machine epsilon
    /// for floats.
    const EPSILON: Self;
    /// Relative tolerance for epsilon-tolerant comparison in the promoted
    /// representation: machine epsilon as f64 for floats (f32 noise is
    /// orders of magnitude coarser than f64's), zero for integers, which
    /// compare exactly.
    const REL_TOLERANCE: f64;

    /// Lossless widening into the common promoted representation.
    fn promote(self) -> Promoted;

    /// Checked narrowing back from the promoted representation.
    fn from_promoted(value: Promoted) -> Option<Self>;

    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn checked_sub(self, rhs: Self) -> Option<Self>;
    fn checked_mul(self, rhs: Self) -> Option<Self>;
    fn checked_div(self, rhs: Self) -> Option<Self>;
    fn checked_rem(self, rhs: Self) -> Option<Self>;

    /// Unchecked arithmetic: wraps for integers, follows IEEE semantics for
    /// floats. Callers that trust the result must consult the overflow
    /// predicates on [`crate::num::Num`] first.
    fn raw_add(self, rhs: Self) -> Self;
    fn raw_sub(self, rhs: Self) -> Self;
    fn raw_mul(self, rhs: Self) -> Self;
    fn raw_div(self, rhs: Self) -> Self;
    fn raw_rem(self, rhs: Self) -> Self;
    fn raw_neg(self) -> Self;

    /// Total ordering suitable for sorted storage. For floats this is the
    /// IEEE total order, not the epsilon-tolerant comparison.
    fn total_cmp(self, other: Self) -> Ordering;

    fn abs(self) -> Self;

    fn is_float() -> bool {
        Self::KIND.is_float()
    }
}

macro_rules! impl_scalar_signed {
    ($($t:ty => $kind:ident),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl Scalar for $t {
            const KIND: NumericKind = NumericKind::$kind;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const EPSILON: Self = 1;
            const REL_TOLERANCE: f64 = 0.0;

            fn promote(self) -> Promoted {
                Promoted::Int(self as i128)
            }

            fn from_promoted(value: Promoted) -> Option<Self> {
                match value {
                    Promoted::Int(v) => Self::try_from(v).ok(),
                    Promoted::Float(v) => {
                        if v.fract() != 0.0 || !v.is_finite() {
                            return None;
                        }
                        Self::try_from(v as i128).ok()
                    }
                }
            }

            fn checked_add(self, rhs: Self) -> Option<Self> {
                self.checked_add(rhs)
            }
            fn checked_sub(self, rhs: Self) -> Option<Self> {
                self.checked_sub(rhs)
            }
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                self.checked_mul(rhs)
            }
            fn checked_div(self, rhs: Self) -> Option<Self> {
                self.checked_div(rhs)
            }
            fn checked_rem(self, rhs: Self) -> Option<Self> {
                self.checked_rem(rhs)
            }

            fn raw_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }
            fn raw_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }
            fn raw_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
            fn raw_div(self, rhs: Self) -> Self {
                self.wrapping_div(rhs)
            }
            fn raw_rem(self, rhs: Self) -> Self {
                self.wrapping_rem(rhs)
            }
            fn raw_neg(self) -> Self {
                self.wrapping_neg()
            }

            fn total_cmp(self, other: Self) -> Ordering {
                Ord::cmp(&self, &other)
            }

            fn abs(self) -> Self {
                self.wrapping_abs()
            }
        }
    )*};
}

macro_rules! impl_scalar_unsigned {
    ($($t:ty => $kind:ident),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl Scalar for $t {
            const KIND: NumericKind = NumericKind::$kind;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const EPSILON: Self = 1;
            const REL_TOLERANCE: f64 = 0.0;

            fn promote(self) -> Promoted {
                Promoted::Int(self as i128)
            }

            fn from_promoted(value: Promoted) -> Option<Self> {
                match value {
                    Promoted::Int(v) => Self::try_from(v).ok(),
                    Promoted::Float(v) => {
                        if v.fract() != 0.0 || !v.is_finite() {
                            return None;
                        }
                        Self::try_from(v as i128).ok()
                    }
                }
            }

            fn checked_add(self, rhs: Self) -> Option<Self> {
                self.checked_add(rhs)
            }
            fn checked_sub(self, rhs: Self) -> Option<Self> {
                self.checked_sub(rhs)
            }
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                self.checked_mul(rhs)
            }
            fn checked_div(self, rhs: Self) -> Option<Self> {
                self.checked_div(rhs)
            }
            fn checked_rem(self, rhs: Self) -> Option<Self> {
                self.checked_rem(rhs)
            }

            fn raw_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }
            fn raw_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }
            fn raw_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
            fn raw_div(self, rhs: Self) -> Self {
                self.wrapping_div(rhs)
            }
            fn raw_rem(self, rhs: Self) -> Self {
                self.wrapping_rem(rhs)
            }
            fn raw_neg(self) -> Self {
                self.wrapping_neg()
            }

            fn total_cmp(self, other: Self) -> Ordering {
                Ord::cmp(&self, &other)
            }

            fn abs(self) -> Self {
                self
            }
        }
    )*};
}

macro_rules! impl_scalar_float {
    ($($t:ty => $kind:ident),* $(,)?) => {$(
        impl sealed::Sealed for $t {}

        impl Scalar for $t {
            const KIND: NumericKind = NumericKind::$kind;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const EPSILON: Self = <$t>::EPSILON;
            const REL_TOLERANCE: f64 = <$t>::EPSILON as f64;

            fn promote(self) -> Promoted {
                Promoted::Float(self as f64)
            }

            fn from_promoted(value: Promoted) -> Option<Self> {
                let v = match value {
                    Promoted::Int(v) => v as f64,
                    Promoted::Float(v) => v,
                };
                if !v.is_finite() {
                    return None;
                }
                if v < <$t>::MIN as f64 || v > <$t>::MAX as f64 {
                    return None;
                }
                Some(v as $t)
            }

            fn checked_add(self, rhs: Self) -> Option<Self> {
                let result = self + rhs;
                result.is_finite().then_some(result)
            }
            fn checked_sub(self, rhs: Self) -> Option<Self> {
                let result = self - rhs;
                result.is_finite().then_some(result)
            }
            fn checked_mul(self, rhs: Self) -> Option<Self> {
                let result = self * rhs;
                result.is_finite().then_some(result)
            }
            fn checked_div(self, rhs: Self) -> Option<Self> {
                if rhs == 0.0 {
                    return None;
                }
                let result = self / rhs;
                result.is_finite().then_some(result)
            }
            fn checked_rem(self, rhs: Self) -> Option<Self> {
                if rhs == 0.0 {
                    return None;
                }
                let result = self % rhs;
                result.is_finite().then_some(result)
            }

            fn raw_add(self, rhs: Self) -> Self {
                self + rhs
            }
            fn raw_sub(self, rhs: Self) -> Self {
                self - rhs
            }
            fn raw_mul(self, rhs: Self) -> Self {
                self * rhs
            }
            fn raw_div(self, rhs: Self) -> Self {
                self / rhs
            }
            fn raw_rem(self, rhs: Self) -> Self {
                self % rhs
            }
            fn raw_neg(self) -> Self {
                -self
            }

            fn total_cmp(self, other: Self) -> Ordering {
                <$t>::total_cmp(&self, &other)
            }

            fn abs(self) -> Self {
                <$t>::abs(self)
            }
        }
    )*};
}

impl_scalar_signed!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);
impl_scalar_unsigned!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);
impl_scalar_float!(f32 => F32, f64 => F64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promote_is_lossless_for_extremes() {
        assert_eq!(i64::MIN.promote(), Promoted::Int(i64::MIN as i128));
        assert_eq!(u64::MAX.promote(), Promoted::Int(u64::MAX as i128));
    }

    #[test]
    fn from_promoted_rejects_out_of_range() {
        assert_eq!(i8::from_promoted(Promoted::Int(128)), None);
        assert_eq!(i8::from_promoted(Promoted::Int(-129)), None);
        assert_eq!(u8::from_promoted(Promoted::Int(-1)), None);
        assert_eq!(i8::from_promoted(Promoted::Int(-128)), Some(-128));
    }

    #[test]
    fn from_promoted_rejects_fractional_floats_for_integers() {
        assert_eq!(i32::from_promoted(Promoted::Float(2.5)), None);
        assert_eq!(i32::from_promoted(Promoted::Float(2.0)), Some(2));
    }

    #[test]
    fn float_checked_div_rejects_zero_divisor() {
        assert_eq!(Scalar::checked_div(1.0f64, 0.0), None);
        assert_eq!(Scalar::checked_div(1.0f64, 2.0), Some(0.5));
    }

    #[test]
    fn integer_epsilon_is_one() {
        assert_eq!(<i32 as Scalar>::EPSILON, 1);
        assert_eq!(<u64 as Scalar>::EPSILON, 1);
    }

    #[test]
    fn relative_tolerance_tracks_the_representation() {
        assert_eq!(<i32 as Scalar>::REL_TOLERANCE, 0.0);
        assert_eq!(<f32 as Scalar>::REL_TOLERANCE, f32::EPSILON as f64);
        assert_eq!(<f64 as Scalar>::REL_TOLERANCE, f64::EPSILON);
        // f32 arithmetic is noisier; its tolerance must be the wider one
        assert!(<f32 as Scalar>::REL_TOLERANCE > <f64 as Scalar>::REL_TOLERANCE);
    }

    #[test]
    fn kind_tags_match() {
        assert_eq!(<i8 as Scalar>::KIND, NumericKind::I8);
        assert_eq!(<f64 as Scalar>::KIND, NumericKind::F64);
    }
}
