// src/lib.rs
//! Value-set and type substrate for the Brook compiler front end.
//!
//! This crate is the abstract-interpretation core used by constant/range
//! propagation and diagnostics:
//!
//! - [`num`] - safe numeric scalars with cross-width comparison, checked
//!   arithmetic, and overflow predicates
//! - [`domain`] - abstract values: strided ranges, numeric value-sets, and
//!   struct value-sets
//! - [`types`] - the interned type arena that manufactures canonical abstract
//!   values (uninitialized / default / worst-case)
//! - [`errors`] - structured error types shared by all of the above

pub mod domain;
pub mod errors;
pub mod num;
pub mod types;

pub use domain::{NumericValueSet, NumericValues, Range, StructValueSet, ValueSet, ValueSetAndType};
pub use errors::DomainError;
pub use num::{Num, Promoted, Scalar};
pub use types::{NumericKind, Type, TypeArena, TypeId};
