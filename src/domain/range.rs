// src/domain/range.rs
//! Canonical strided intervals.

use std::fmt;

use crate::errors::DomainError;
use crate::num::{Num, Promoted, Scalar};

/// The arithmetic progression `min, min+step, min+2*step, ...` stopping at
/// the last term `<= max`.
///
/// Construction is validated: `step` must be positive and `min <= max`.
/// `(max - min)` need not be an exact multiple of `step`; the progression
/// simply stops early. A degenerate range (`min == max`) is a single point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range<T: Scalar> {
    min: Num<T>,
    max: Num<T>,
    step: Num<T>,
}

impl<T: Scalar> Range<T> {
    pub fn new(
        min: impl Into<Num<T>>,
        max: impl Into<Num<T>>,
        step: impl Into<Num<T>>,
    ) -> Result<Self, DomainError> {
        let (min, max, step) = (min.into(), max.into(), step.into());
        if step <= Num::zero() {
            return Err(DomainError::invalid_range(format!(
                "step must be positive, got {step}"
            )));
        }
        if min > max {
            return Err(DomainError::invalid_range(format!(
                "min {min} greater than max {max}"
            )));
        }
        Ok(Range { min, max, step })
    }

    /// The full representable domain of `T` with step 1 (the worst-case
    /// abstract value for a numeric type).
    pub fn full() -> Self {
        Range {
            min: Num::min_value(),
            max: Num::max_value(),
            step: Num::one(),
        }
    }

    pub fn min(&self) -> Num<T> {
        self.min
    }

    pub fn max(&self) -> Num<T> {
        self.max
    }

    pub fn step(&self) -> Num<T> {
        self.step
    }

    pub fn is_single_point(&self) -> bool {
        self.min == self.max
    }

    /// The greatest progression member, i.e. the last term `<= max`.
    /// Tolerant for floats: a `max` sitting representation noise below a
    /// term still counts that term as the last.
    pub fn last_term(&self) -> Num<T> {
        let span = self.max.promote() - self.min.promote();
        let k = span.floor_div_tolerant(self.step.promote(), T::REL_TOLERANCE);
        let last = self.min.promote() + k * self.step.promote();
        Num::from_promoted(last).unwrap_or(self.max)
    }

    /// True iff `v` is a member of the progression. Float progressions use
    /// the epsilon-tolerant step-multiple test, scaled to this
    /// representation's noise level.
    pub fn contains(&self, value: impl Into<Num<T>>) -> bool {
        let value = value.into();
        let v = value.promote();
        if v.compare(self.min.promote()).is_lt() || v.compare(self.max.promote()).is_gt() {
            return false;
        }
        Promoted::is_step_multiple(v - self.min.promote(), self.step.promote(), T::REL_TOLERANCE)
    }

    /// Merge `other` into `self` when the union is exactly representable:
    /// same step, aligned phase, and intervals that overlap or are exactly
    /// adjacent. Returns false (and changes nothing) otherwise.
    ///
    /// Conservative on purpose: a successful merge never claims membership
    /// for a value neither input produced.
    pub fn try_merge_with(&mut self, other: &Range<T>) -> bool {
        if self.step != other.step {
            return false;
        }
        let step = self.step.promote();
        let phase = other.min.promote() - self.min.promote();
        if !Promoted::is_step_multiple(phase, step, T::REL_TOLERANCE) {
            return false;
        }
        // First progression slot beyond each range; a gap begins past it.
        let self_reach = self.last_term().promote() + step;
        let other_reach = other.last_term().promote() + step;
        if other.min.promote().compare(self_reach).is_gt()
            || self.min.promote().compare(other_reach).is_gt()
        {
            return false;
        }
        tracing::trace!(
            self_range = %self,
            other = %other,
            "merging ranges"
        );
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        true
    }

    /// Raise `min` to a later progression term. Domain-internal: used when a
    /// covering range is clamped or split.
    pub(crate) fn set_min(&mut self, min: Num<T>) {
        debug_assert!(min <= self.max);
        self.min = min;
    }

    /// Lower `max`. Domain-internal counterpart of [`Range::set_min`].
    pub(crate) fn set_max(&mut self, max: Num<T>) {
        debug_assert!(max >= self.min);
        self.max = max;
    }
}

impl<T: Scalar> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_point() {
            write!(f, "[{}]", self.min)
        } else {
            write!(f, "[{}..{} step {}]", self.min, self.max, self.step)
        }
    }
}
