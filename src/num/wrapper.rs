// src/num/wrapper.rs
//! The safe numeric wrapper used throughout the value domain.
//!
//! `Num<T>` is a value-typed, immutable scalar. Same-representation
//! arithmetic is available through the usual operators (wrapping for
//! integers); anything whose result will be trusted must consult the
//! `*_will_overflow` predicates first, or use the `try_*` checked forms.
//! Cross-representation comparison goes through [`Promoted`].

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign};

use crate::errors::DomainError;
use crate::num::promote::Promoted;
use crate::num::scalar::Scalar;

/// An immutable scalar of one numeric representation.
///
/// Equality and ordering use the representation's total order (IEEE total
/// order for floats), so values can live in sorted containers. The
/// epsilon-tolerant comparison is the explicit [`Num::cmp_promoted`].
#[derive(Clone, Copy)]
pub struct Num<T: Scalar>(T);

impl<T: Scalar> Num<T> {
    pub fn new(value: T) -> Self {
        Num(value)
    }

    pub fn get(self) -> T {
        self.0
    }

    pub fn min_value() -> Self {
        Num(T::MIN)
    }

    pub fn max_value() -> Self {
        Num(T::MAX)
    }

    pub fn zero() -> Self {
        Num(T::ZERO)
    }

    pub fn one() -> Self {
        Num(T::ONE)
    }

    /// Smallest representable difference for this representation.
    pub fn epsilon() -> Self {
        Num(T::EPSILON)
    }

    pub fn promote(self) -> Promoted {
        self.0.promote()
    }

    pub fn from_promoted(value: Promoted) -> Option<Self> {
        T::from_promoted(value).map(Num)
    }

    /// Compare against a wrapper of any representation, in the common
    /// promoted representation (epsilon-tolerant when floats are involved).
    pub fn cmp_promoted<U: Scalar>(self, other: Num<U>) -> Ordering {
        self.promote().compare(other.promote())
    }

    pub fn eq_promoted<U: Scalar>(self, other: Num<U>) -> bool {
        self.cmp_promoted(other) == Ordering::Equal
    }

    pub fn absolute(self) -> Self {
        Num(self.0.abs())
    }

    // ------------------------------------------------------------------
    // Overflow/divide predicates. Pure: they never perform the operation.
    // ------------------------------------------------------------------

    pub fn addition_will_overflow(self, rhs: Self) -> bool {
        self.0.checked_add(rhs.0).is_none()
    }

    pub fn subtraction_will_overflow(self, rhs: Self) -> bool {
        self.0.checked_sub(rhs.0).is_none()
    }

    pub fn multiplication_will_overflow(self, rhs: Self) -> bool {
        self.0.checked_mul(rhs.0).is_none()
    }

    /// True when the division cannot be performed: zero divisor, or the one
    /// integer case that overflows (MIN / -1).
    pub fn division_will_overflow(self, rhs: Self) -> bool {
        self.0.checked_div(rhs.0).is_none()
    }

    // ------------------------------------------------------------------
    // Checked arithmetic surfacing DomainError.
    // ------------------------------------------------------------------

    pub fn try_add(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_add(rhs.0)
            .map(Num)
            .ok_or(DomainError::Overflow {
                operation: "addition",
            })
    }

    pub fn try_sub(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_sub(rhs.0)
            .map(Num)
            .ok_or(DomainError::Overflow {
                operation: "subtraction",
            })
    }

    pub fn try_mul(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_mul(rhs.0)
            .map(Num)
            .ok_or(DomainError::Overflow {
                operation: "multiplication",
            })
    }

    pub fn try_div(self, rhs: Self) -> Result<Self, DomainError> {
        match self.0.checked_div(rhs.0) {
            Some(v) => Ok(Num(v)),
            None if rhs == Self::zero() || rhs == -Self::zero() => Err(DomainError::DivisionByZero),
            None => Err(DomainError::Overflow {
                operation: "division",
            }),
        }
    }

    pub fn try_rem(self, rhs: Self) -> Result<Self, DomainError> {
        match self.0.checked_rem(rhs.0) {
            Some(v) => Ok(Num(v)),
            None if rhs == Self::zero() || rhs == -Self::zero() => Err(DomainError::DivisionByZero),
            None => Err(DomainError::Overflow {
                operation: "remainder",
            }),
        }
    }
}

impl<T: Scalar> From<T> for Num<T> {
    fn from(value: T) -> Self {
        Num(value)
    }
}

impl<T: Scalar> fmt::Debug for Num<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl<T: Scalar> fmt::Display for Num<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Scalar> PartialEq for Num<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(other.0) == Ordering::Equal
    }
}

impl<T: Scalar> Eq for Num<T> {}

impl<T: Scalar> PartialOrd for Num<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Scalar> Ord for Num<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(other.0)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $raw:ident) => {
        impl<T: Scalar> $trait for Num<T> {
            type Output = Num<T>;

            fn $method(self, rhs: Num<T>) -> Num<T> {
                Num(self.0.$raw(rhs.0))
            }
        }

        impl<T: Scalar> $assign_trait for Num<T> {
            fn $assign_method(&mut self, rhs: Num<T>) {
                self.0 = self.0.$raw(rhs.0);
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, raw_add);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, raw_sub);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, raw_mul);
impl_binary_op!(Div, div, DivAssign, div_assign, raw_div);
impl_binary_op!(Rem, rem, RemAssign, rem_assign, raw_rem);

impl<T: Scalar> Neg for Num<T> {
    type Output = Num<T>;

    fn neg(self) -> Num<T> {
        Num(self.0.raw_neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_width_comparison_handles_signedness() {
        let a: Num<i8> = Num::new(-1);
        let b: Num<u64> = Num::new(u64::MAX);
        assert_eq!(a.cmp_promoted(b), Ordering::Less);
        assert_eq!(b.cmp_promoted(a), Ordering::Greater);

        let c: Num<i32> = Num::new(1000);
        let d: Num<u8> = Num::new(255);
        assert_eq!(c.cmp_promoted(d), Ordering::Greater);
    }

    #[test]
    fn float_comparison_tolerates_representation_noise() {
        let a: Num<f64> = Num::new(0.1 + 0.2);
        let b: Num<f64> = Num::new(0.3);
        assert!(a.eq_promoted(b));
    }

    #[test]
    fn mixed_int_float_equality() {
        let a: Num<i32> = Num::new(7);
        let b: Num<f32> = Num::new(7.0);
        assert!(a.eq_promoted(b));
    }

    #[test]
    fn overflow_predicates() {
        let max: Num<i8> = Num::max_value();
        let one: Num<i8> = Num::one();
        assert!(max.addition_will_overflow(one));
        assert!(!max.subtraction_will_overflow(one));

        let zero: Num<u8> = Num::zero();
        assert!(zero.subtraction_will_overflow(Num::one()));

        let min: Num<i32> = Num::min_value();
        let neg_one: Num<i32> = -Num::one();
        assert!(min.division_will_overflow(neg_one));
        assert!(min.multiplication_will_overflow(neg_one));
    }

    #[test]
    fn try_div_reports_zero_divisor() {
        let a: Num<i32> = Num::new(10);
        assert_eq!(a.try_div(Num::zero()), Err(DomainError::DivisionByZero));
        assert_eq!(a.try_div(Num::new(2)), Ok(Num::new(5)));
    }

    #[test]
    fn try_add_reports_overflow() {
        let a: Num<u8> = Num::new(200);
        assert!(matches!(
            a.try_add(Num::new(100)),
            Err(DomainError::Overflow { .. })
        ));
        assert_eq!(a.try_add(Num::new(55)), Ok(Num::new(255)));
    }

    #[test]
    fn compound_assignment() {
        let mut a: Num<i32> = Num::new(10);
        a += Num::new(5);
        a *= Num::new(2);
        assert_eq!(a, Num::new(30));
    }

    #[test]
    fn absolute_for_all_classes() {
        assert_eq!(Num::new(-5i32).absolute(), Num::new(5));
        assert_eq!(Num::new(5u32).absolute(), Num::new(5));
        assert_eq!(Num::new(-2.5f64).absolute(), Num::new(2.5));
    }

    #[test]
    fn storage_ordering_is_total_for_floats() {
        use std::collections::BTreeSet;
        let mut set: BTreeSet<Num<f64>> = BTreeSet::new();
        set.insert(Num::new(1.5));
        set.insert(Num::new(-3.0));
        set.insert(Num::new(1.5));
        assert_eq!(set.len(), 2);
    }
}
