// src/domain/mod.rs
//! The abstract-value domain.
//!
//! An abstract value is the set of concrete runtime values a storage location
//! may hold, represented compactly:
//!
//! - [`Range`] - one strided interval (`min, min+step, ...` up to `max`)
//! - [`NumericValueSet`] - discrete values plus disjoint ranges over one
//!   numeric representation
//! - [`StructValueSet`] - ordered per-field abstract values for an aggregate
//! - [`ValueSet`] - the closed union over the numeric and struct cases
//!
//! Analysis code narrows numeric leaves via the add/remove operations as
//! facts are learned (a branch condition eliminating a sub-range, say).

pub mod numeric;
pub mod range;
pub mod structural;

pub use numeric::{NumericSlot, NumericValueSet, NumericValues};
pub use range::Range;
pub use structural::{StructValueSet, ValueSet, ValueSetAndType};

/// Indentation unit for the recursive value-set rendering.
pub(crate) const INDENT: &str = "    ";

pub(crate) fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str(INDENT);
    }
}
