// src/num/mod.rs
//! Safe numeric scalars.
//!
//! Everything the abstract-value domain knows about machine numbers lives
//! here: the closed [`Scalar`] trait over the ten supported representations,
//! the [`Promoted`] common representation that all cross-width comparison and
//! range arithmetic go through, and the [`Num`] wrapper with overflow-aware
//! predicates and checked operations.

pub mod math;
pub mod promote;
pub mod scalar;
pub mod wrapper;

pub use promote::Promoted;
pub use scalar::Scalar;
pub use wrapper::Num;
