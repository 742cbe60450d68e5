// src/domain/numeric.rs
//! Hybrid numeric value-sets: discrete values plus disjoint strided ranges.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::range::Range;
use crate::errors::DomainError;
use crate::num::{Num, Scalar};
use crate::types::NumericKind;

/// The set of values a numeric storage location may hold.
///
/// Two invariants are maintained across every operation:
///
/// 1. no discrete value is covered by any stored range (ranges absorb
///    covered values on insertion), and
/// 2. no two stored ranges are mergeable - same-stride ranges never overlap
///    or touch. Ranges of *different* strides may overlap as intervals; the
///    progressions they denote are distinct.
///
/// `initialized` distinguishes "no fact recorded yet" from "known empty":
/// it flips to true on the first successful insertion and never flips back.
#[derive(Debug, Clone, Default)]
pub struct NumericValueSet<T: Scalar> {
    values: BTreeSet<Num<T>>,
    ranges: Vec<Range<T>>,
    initialized: bool,
}

impl<T: Scalar> NumericValueSet<T> {
    pub fn new() -> Self {
        NumericValueSet {
            values: BTreeSet::new(),
            ranges: Vec::new(),
            initialized: false,
        }
    }

    /// Record that `value` is possible. No-op when a range already covers
    /// it. Newly inserted values may be promoted into an adjacent
    /// same-stride range to keep the discrete set small.
    pub fn add_value(&mut self, value: impl Into<Num<T>>) -> &mut Self {
        let value = value.into();
        if self.covering_range(value).is_some() {
            return self;
        }
        self.values.insert(value);
        self.initialized = true;
        self.promote_values();
        self
    }

    /// Record that every member of the progression `min, min+step, ..` up to
    /// `max` is possible. Fails with [`DomainError::InvalidRange`] for a
    /// non-positive step or `min > max`.
    pub fn add_range(
        &mut self,
        min: impl Into<Num<T>>,
        max: impl Into<Num<T>>,
        step: impl Into<Num<T>>,
    ) -> Result<&mut Self, DomainError> {
        let range = Range::new(min, max, step)?;
        Ok(self.add_ranged(range))
    }

    /// Insert an already-validated range.
    pub fn add_ranged(&mut self, range: Range<T>) -> &mut Self {
        // Ranges absorb the discrete values they cover.
        self.values.retain(|v| !range.contains(*v));
        self.coalesce(range);
        self.initialized = true;
        self.promote_values();
        self
    }

    /// Remove one value. A covering range is split around it: `[min, v-step]`
    /// and `[v+step, max]`, with emptied halves dropped. Single-point
    /// leftovers stay as degenerate ranges.
    pub fn remove_value(&mut self, value: impl Into<Num<T>>) -> &mut Self {
        let value = value.into();
        if self.values.remove(&value) {
            return self;
        }
        let Some(index) = self.covering_range(value) else {
            return self;
        };
        let range = self.ranges.remove(index);
        tracing::trace!(range = %range, value = %value, "splitting range around removed value");
        let step = range.step().promote();
        let lower_max = value.promote() - step;
        if let Some(lower_max) = Num::from_promoted(lower_max) {
            if lower_max >= range.min() {
                if let Ok(lower) = Range::new(range.min(), lower_max, range.step()) {
                    self.ranges.push(lower);
                }
            }
        }
        let upper_min = value.promote() + step;
        if let Some(upper_min) = Num::from_promoted(upper_min) {
            if upper_min <= range.max() {
                if let Ok(upper) = Range::new(upper_min, range.max(), range.step()) {
                    self.ranges.push(upper);
                }
            }
        }
        self.sort_ranges();
        self
    }

    /// Drop every possibility strictly below `bound`. Ranges are clamped up
    /// to their first progression term `>= bound` (phase preserved). The
    /// term count uses the tolerant quotient, so a bound sitting
    /// representation noise off a term clamps *to* that term rather than
    /// past it.
    pub fn remove_values_under(&mut self, bound: impl Into<Num<T>>) -> &mut Self {
        let bound = bound.into();
        self.values.retain(|v| *v >= bound);
        self.ranges.retain_mut(|range| {
            if range.min() >= bound {
                return true;
            }
            let step = range.step().promote();
            let offset = bound.promote() - range.min().promote();
            let k = offset.ceil_div_tolerant(step, T::REL_TOLERANCE);
            let new_min = range.min().promote() + k * step;
            if new_min.compare(range.max().promote()).is_gt() {
                return false;
            }
            match Num::from_promoted(new_min) {
                Some(new_min) => {
                    range.set_min(new_min);
                    true
                }
                None => false,
            }
        });
        self
    }

    /// Drop every possibility strictly above `bound`. Ranges are clamped
    /// down to their last progression term `<= bound`.
    pub fn remove_values_over(&mut self, bound: impl Into<Num<T>>) -> &mut Self {
        let bound = bound.into();
        self.values.retain(|v| *v <= bound);
        self.ranges.retain_mut(|range| {
            if range.max() <= bound {
                return true;
            }
            let step = range.step().promote();
            let offset = bound.promote() - range.min().promote();
            let k = offset.floor_div_tolerant(step, T::REL_TOLERANCE);
            let new_max = range.min().promote() + k * step;
            if new_max.compare(range.min().promote()).is_lt() {
                return false;
            }
            match Num::from_promoted(new_max) {
                Some(new_max) => {
                    range.set_max(new_max);
                    true
                }
                None => false,
            }
        });
        self
    }

    pub fn contains(&self, value: impl Into<Num<T>>) -> bool {
        let value = value.into();
        self.values.contains(&value) || self.ranges.iter().any(|r| r.contains(value))
    }

    /// True iff exactly one concrete value remains possible.
    pub fn has_single_possibility(&self) -> bool {
        match (self.values.len(), self.ranges.len()) {
            (1, 0) => true,
            (0, 1) => self.ranges[0].is_single_point(),
            _ => false,
        }
    }

    /// Whether any fact has ever been recorded. False means "nothing known
    /// yet", which is distinct from "known to be empty".
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn discrete_values(&self) -> impl Iterator<Item = Num<T>> + '_ {
        self.values.iter().copied()
    }

    pub fn ranges(&self) -> &[Range<T>] {
        &self.ranges
    }

    /// Human-readable rendering. Numeric leaves are single-line, so the
    /// indent level is accepted for uniformity with the recursive struct
    /// rendering but unused: the caller places the prefix, and there are no
    /// continuation lines to indent.
    pub fn render(&self, _indent: usize) -> String {
        if !self.initialized {
            return "<no facts>".to_string();
        }
        let mut parts: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        parts.extend(self.ranges.iter().map(|r| r.to_string()));
        format!("{{ {} }}", parts.join(", "))
    }

    fn covering_range(&self, value: Num<T>) -> Option<usize> {
        self.ranges.iter().position(|r| r.contains(value))
    }

    fn sort_ranges(&mut self) {
        self.ranges.sort_by(|a, b| a.min().cmp(&b.min()));
    }

    /// Fold `incoming` into the stored ranges, merging repeatedly until no
    /// merge applies. Coalescing is transitive: a merge can newly make the
    /// result adjacent to a third range.
    fn coalesce(&mut self, incoming: Range<T>) {
        let mut merged = incoming;
        loop {
            let Some(index) = self
                .ranges
                .iter()
                .position(|existing| merged.try_merge_with(existing))
            else {
                break;
            };
            self.ranges.remove(index);
        }
        self.ranges.push(merged);
        self.sort_ranges();
    }

    /// Fold discrete values sitting exactly one stride outside a range into
    /// that range, to fixpoint. Extending a range can unlock further folds
    /// and new range merges, so both are retried until stable.
    fn promote_values(&mut self) {
        loop {
            let mut changed = false;
            for range in &mut self.ranges {
                let step = range.step().promote();
                loop {
                    let prev = range.min().promote() - step;
                    let Some(prev) = Num::from_promoted(prev) else {
                        break;
                    };
                    if !self.values.remove(&prev) {
                        break;
                    }
                    tracing::trace!(value = %prev, range = %range, "promoting value into range");
                    range.set_min(prev);
                    changed = true;
                }
                loop {
                    let next = range.last_term().promote() + step;
                    let Some(next) = Num::from_promoted(next) else {
                        break;
                    };
                    if !self.values.remove(&next) {
                        break;
                    }
                    tracing::trace!(value = %next, range = %range, "promoting value into range");
                    range.set_max(next);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
            // Extended ranges may now touch each other.
            let mut old = std::mem::take(&mut self.ranges);
            while let Some(range) = old.pop() {
                self.coalesce(range);
            }
        }
    }
}

impl<T: Scalar> fmt::Display for NumericValueSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}

/// The ten-kind closed union over numeric value-sets, so heterogeneous
/// aggregates can own numeric leaves without trait objects.
#[derive(Debug, Clone)]
pub enum NumericValues {
    I8(NumericValueSet<i8>),
    I16(NumericValueSet<i16>),
    I32(NumericValueSet<i32>),
    I64(NumericValueSet<i64>),
    U8(NumericValueSet<u8>),
    U16(NumericValueSet<u16>),
    U32(NumericValueSet<u32>),
    U64(NumericValueSet<u64>),
    F32(NumericValueSet<f32>),
    F64(NumericValueSet<f64>),
}

macro_rules! for_each_kind {
    ($value:expr, $set:ident => $body:expr) => {
        match $value {
            NumericValues::I8($set) => $body,
            NumericValues::I16($set) => $body,
            NumericValues::I32($set) => $body,
            NumericValues::I64($set) => $body,
            NumericValues::U8($set) => $body,
            NumericValues::U16($set) => $body,
            NumericValues::U32($set) => $body,
            NumericValues::U64($set) => $body,
            NumericValues::F32($set) => $body,
            NumericValues::F64($set) => $body,
        }
    };
}

impl NumericValues {
    pub fn kind(&self) -> NumericKind {
        match self {
            NumericValues::I8(_) => NumericKind::I8,
            NumericValues::I16(_) => NumericKind::I16,
            NumericValues::I32(_) => NumericKind::I32,
            NumericValues::I64(_) => NumericKind::I64,
            NumericValues::U8(_) => NumericKind::U8,
            NumericValues::U16(_) => NumericKind::U16,
            NumericValues::U32(_) => NumericKind::U32,
            NumericValues::U64(_) => NumericKind::U64,
            NumericValues::F32(_) => NumericKind::F32,
            NumericValues::F64(_) => NumericKind::F64,
        }
    }

    pub fn is_initialized(&self) -> bool {
        for_each_kind!(self, set => set.is_initialized())
    }

    pub fn has_single_possibility(&self) -> bool {
        for_each_kind!(self, set => set.has_single_possibility())
    }

    pub fn render(&self, indent: usize) -> String {
        for_each_kind!(self, set => set.render(indent))
    }

    /// Project to the typed set when `T` matches the stored kind.
    pub fn as_set<T: NumericSlot>(&self) -> Option<&NumericValueSet<T>> {
        T::slot(self)
    }

    pub fn as_set_mut<T: NumericSlot>(&mut self) -> Option<&mut NumericValueSet<T>> {
        T::slot_mut(self)
    }
}

/// Typed projection from the [`NumericValues`] union, implemented for each
/// of the ten scalar representations.
pub trait NumericSlot: Scalar {
    fn slot(values: &NumericValues) -> Option<&NumericValueSet<Self>>;
    fn slot_mut(values: &mut NumericValues) -> Option<&mut NumericValueSet<Self>>;
    fn wrap(set: NumericValueSet<Self>) -> NumericValues;
}

macro_rules! impl_numeric_slot {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl NumericSlot for $t {
            fn slot(values: &NumericValues) -> Option<&NumericValueSet<$t>> {
                match values {
                    NumericValues::$variant(set) => Some(set),
                    _ => None,
                }
            }

            fn slot_mut(values: &mut NumericValues) -> Option<&mut NumericValueSet<$t>> {
                match values {
                    NumericValues::$variant(set) => Some(set),
                    _ => None,
                }
            }

            fn wrap(set: NumericValueSet<$t>) -> NumericValues {
                NumericValues::$variant(set)
            }
        }
    )*};
}

impl_numeric_slot!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64,
);

#[cfg(test)]
mod tests {
    use super::*;

    /// Check both invariants: no discrete value covered by a range, and no
    /// two stored ranges mergeable.
    fn assert_invariants<T: Scalar>(set: &NumericValueSet<T>) {
        for v in set.discrete_values() {
            for r in set.ranges() {
                assert!(
                    !r.contains(v),
                    "discrete value {v} is covered by range {r}"
                );
            }
        }
        for (i, a) in set.ranges().iter().enumerate() {
            for b in set.ranges().iter().skip(i + 1) {
                let mut probe = a.clone();
                assert!(
                    !probe.try_merge_with(b),
                    "stored ranges {a} and {b} are mergeable"
                );
            }
        }
    }

    #[test]
    fn uninitialized_until_first_insertion() {
        let mut set = NumericValueSet::<i32>::new();
        assert!(!set.is_initialized());
        assert!(!set.contains(0));
        set.add_value(5);
        assert!(set.is_initialized());
        set.remove_value(5);
        // Removal empties the set but does not "un-know" it
        assert!(set.is_initialized());
        assert!(!set.contains(5));
    }

    #[test]
    fn add_value_is_idempotent() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_value(7).add_value(7);
        assert!(set.contains(7));
        assert!(set.has_single_possibility());
        assert_invariants(&set);
    }

    #[test]
    fn add_value_covered_by_range_is_noop() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_range(0, 100, 10).unwrap();
        set.add_value(50);
        assert_eq!(set.discrete_values().count(), 0);
        assert_invariants(&set);
    }

    #[test]
    fn add_range_absorbs_covered_values() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_value(20).add_value(25).add_value(40);
        set.add_range(0, 100, 20).unwrap();
        // 20 and 40 are progression members; 25 stays discrete
        assert_eq!(set.discrete_values().count(), 1);
        assert!(set.contains(25));
        assert!(set.contains(20));
        assert_invariants(&set);
    }

    #[test]
    fn add_range_rejects_invalid() {
        let mut set = NumericValueSet::<i32>::new();
        assert!(set.add_range(0, 10, 0).is_err());
        assert!(set.add_range(10, 0, 1).is_err());
        assert!(!set.is_initialized());
    }

    #[test]
    fn transitive_coalescing() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_range(0, 40, 20).unwrap();
        set.add_range(100, 140, 20).unwrap();
        assert_eq!(set.ranges().len(), 2);
        // Bridges both: all three collapse to one range
        set.add_range(60, 80, 20).unwrap();
        assert_eq!(set.ranges().len(), 1);
        for v in (0..=140).step_by(20) {
            assert!(set.contains(v));
        }
        assert_invariants(&set);
    }

    #[test]
    fn promotion_folds_adjacent_values_into_range() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_range(40, 60, 10).unwrap();
        set.add_value(30).add_value(20);
        assert_eq!(set.discrete_values().count(), 0);
        assert_eq!(set.ranges().len(), 1);
        assert_eq!(set.ranges()[0].min(), Num::new(20));
        set.add_value(70);
        assert_eq!(set.ranges()[0].max(), Num::new(70));
        assert_invariants(&set);
    }

    #[test]
    fn promotion_bridges_two_ranges() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_range(0, 20, 10).unwrap();
        set.add_range(40, 60, 10).unwrap();
        assert_eq!(set.ranges().len(), 2);
        set.add_value(30);
        assert_eq!(set.ranges().len(), 1);
        assert_eq!(set.discrete_values().count(), 0);
        assert_invariants(&set);
    }

    #[test]
    fn remove_value_splits_covering_range() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_range(10, 50, 10).unwrap();
        set.remove_value(30);
        for v in 0..=60 {
            let expected = matches!(v, 10 | 20 | 40 | 50);
            assert_eq!(set.contains(v), expected, "membership of {v}");
        }
        assert_invariants(&set);
    }

    #[test]
    fn remove_endpoint_keeps_remaining_progression() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_range(10, 30, 10).unwrap();
        set.remove_value(10);
        assert!(!set.contains(10));
        assert!(set.contains(20));
        assert!(set.contains(30));
        set.remove_value(30);
        assert!(set.contains(20));
        assert!(set.has_single_possibility());
        assert_invariants(&set);
    }

    #[test]
    fn remove_only_point_empties_the_set() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_range(10, 10, 1).unwrap();
        set.remove_value(10);
        assert!(!set.contains(10));
        assert_eq!(set.ranges().len(), 0);
        assert!(set.is_initialized());
    }

    #[test]
    fn remove_values_under_clamps_with_phase() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_value(3);
        set.add_range(10, 50, 10).unwrap();
        set.remove_values_under(25);
        assert!(!set.contains(3));
        assert!(!set.contains(20));
        assert!(!set.contains(24));
        // First progression term >= 25 is 30
        assert!(set.contains(30));
        assert!(set.contains(50));
        assert_invariants(&set);
    }

    #[test]
    fn remove_values_under_boundary_is_exclusive() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_range(0, 100, 1).unwrap();
        let before = set.contains(40);
        set.remove_values_under(40);
        assert!(!set.contains(39));
        assert_eq!(set.contains(40), before);
        assert_invariants(&set);
    }

    #[test]
    fn remove_values_over_clamps_to_last_term() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_range(10, 50, 10).unwrap();
        set.add_value(55);
        set.remove_values_over(35);
        assert!(set.contains(10));
        assert!(set.contains(30));
        assert!(!set.contains(40));
        assert!(!set.contains(55));
        assert_invariants(&set);
    }

    #[test]
    fn clip_dropping_whole_range() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_range(10, 50, 10).unwrap();
        set.remove_values_under(60);
        assert_eq!(set.ranges().len(), 0);
        set.add_range(10, 50, 10).unwrap();
        set.remove_values_over(5);
        assert_eq!(set.ranges().len(), 0);
    }

    #[test]
    fn single_possibility_via_degenerate_range() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_range(42, 42, 1).unwrap();
        assert!(set.has_single_possibility());
        set.add_value(43);
        assert!(!set.has_single_possibility());
    }

    #[test]
    fn invariants_hold_across_mixed_sequences() {
        let mut set = NumericValueSet::<i32>::new();
        set.add_value(10).add_value(20).add_value(30).add_value(40);
        set.add_range(200, 300, 20).unwrap();
        set.add_range(150, 300, 50).unwrap();
        set.add_range(300, 12000, 50).unwrap();
        assert_invariants(&set);
        set.remove_value(250);
        assert_invariants(&set);
        set.remove_values_under(15);
        assert_invariants(&set);
        set.remove_values_over(11000);
        assert_invariants(&set);
    }

    #[test]
    fn unsigned_sets_work_at_domain_edges() {
        let mut set = NumericValueSet::<u8>::new();
        set.add_range(0, 255, 1).unwrap();
        set.remove_value(0);
        assert!(!set.contains(0u8));
        assert!(set.contains(1u8));
        assert!(set.contains(255u8));
        assert_invariants(&set);
    }

    #[test]
    fn f32_set_membership_tolerates_accumulated_noise() {
        // f32 sums carry ~1e-8 relative noise; genuine progression members
        // must still be recognized through the value-set surface.
        let mut set = NumericValueSet::<f32>::new();
        set.add_range(0.0f32, 1.0, 0.1).unwrap();
        assert!(set.contains(0.1f32 + 0.1 + 0.1));
        assert!(set.contains(0.7f32));
        assert!(!set.contains(0.25f32));
        assert_invariants(&set);
    }

    #[test]
    fn clip_at_noisy_bound_keeps_the_boundary_term() {
        // contains(v) must be unchanged by remove_values_under(v) /
        // remove_values_over(v), even when v sits representation noise off
        // the true progression term.
        let mut set = NumericValueSet::<f64>::new();
        set.add_range(0.0, 1.0, 0.1).unwrap();
        let bound = 0.1 + 0.1 + 0.1; // noise above 3 * 0.1
        assert!(set.contains(bound));
        set.remove_values_under(bound);
        assert!(set.contains(bound));
        assert!(!set.contains(0.2));
        assert!(set.contains(0.4));

        let mut set = NumericValueSet::<f64>::new();
        set.add_range(0.0, 1.0, 0.1).unwrap();
        let bound = 0.7; // noise below 7 * 0.1
        assert!(set.contains(bound));
        set.remove_values_over(bound);
        assert!(set.contains(bound));
        assert!(!set.contains(0.8));
        assert!(set.contains(0.6));
        assert_invariants(&set);
    }

    #[test]
    fn float_set_operations() {
        let mut set = NumericValueSet::<f64>::new();
        set.add_range(0.0, 2.0, 0.5).unwrap();
        assert!(set.contains(1.5));
        assert!(!set.contains(1.3));
        set.remove_value(1.0);
        assert!(!set.contains(1.0));
        assert!(set.contains(0.5));
        assert!(set.contains(1.5));
        assert_invariants(&set);
    }

    #[test]
    fn typed_projection_from_union() {
        let mut values = NumericValues::I32(NumericValueSet::new());
        assert_eq!(values.kind(), NumericKind::I32);
        assert!(values.as_set::<i64>().is_none());
        let set = values.as_set_mut::<i32>().unwrap();
        set.add_value(5);
        assert!(values.as_set::<i32>().unwrap().contains(5));
        assert!(values.is_initialized());
    }

    #[test]
    fn render_lists_values_and_ranges() {
        let mut set = NumericValueSet::<i32>::new();
        assert_eq!(set.render(0), "<no facts>");
        set.add_value(7);
        set.add_range(10, 50, 10).unwrap();
        let text = set.render(0);
        assert!(text.contains('7'));
        assert!(text.contains("[10..50 step 10]"));
    }
}
