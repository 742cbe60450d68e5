// src/num/promote.rs
//! The common promoted representation.
//!
//! Every cross-width comparison and every piece of range arithmetic in the
//! domain happens here, in a representation wide enough to hold any operand
//! losslessly: `i128` for the eight integer kinds, `f64` for the two float
//! kinds. Mixed integer/float operations promote to `f64` and use the
//! epsilon-tolerant float comparison.
//!
//! Keeping the rules in one place is deliberate: the alternative is
//! re-deriving promotion ad hoc at every operator site, which is where
//! mixed-width bugs come from.

use std::cmp::Ordering;
use std::ops::{Add, Mul, Sub};

use crate::num::math::{ceil_div, floor_div};

/// A numeric value widened into a representation that can hold any supported
/// scalar without loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Promoted {
    Int(i128),
    Float(f64),
}

/// Relative tolerance floor for float equality. Scaled by operand magnitude.
/// Representation-specific tolerances (`Scalar::REL_TOLERANCE`) widen this
/// floor; f32 arithmetic carries roughly 1e-8 relative noise, far above it.
const REL_TOLERANCE: f64 = 1e-9;
/// Absolute tolerance floor for float equality near zero.
const ABS_TOLERANCE: f64 = 1e-12;

/// Epsilon-tolerant float equality: true when the difference is within the
/// absolute floor or within the relative tolerance scaled by the larger
/// operand magnitude.
pub fn floats_equal(a: f64, b: f64) -> bool {
    let diff = (a - b).abs();
    if diff <= ABS_TOLERANCE {
        return true;
    }
    diff <= REL_TOLERANCE * a.abs().max(b.abs())
}

/// Tolerance for deciding whether `offset` sits on a progression of stride
/// `step`: relative in the larger operand magnitude (so noise in a large
/// offset is forgiven even when the remainder itself is near zero), widened
/// to the source representation's relative epsilon `rel`.
fn step_tolerance(offset: f64, step: f64, rel: f64) -> f64 {
    (rel.max(REL_TOLERANCE) * offset.abs().max(step.abs())).max(ABS_TOLERANCE)
}

impl Promoted {
    pub fn as_f64(self) -> f64 {
        match self {
            Promoted::Int(v) => v as f64,
            Promoted::Float(v) => v,
        }
    }

    /// Cross-width comparison. Integer pairs compare exactly in `i128`; any
    /// float operand forces the epsilon-tolerant `f64` comparison.
    pub fn compare(self, other: Promoted) -> Ordering {
        match (self, other) {
            (Promoted::Int(a), Promoted::Int(b)) => a.cmp(&b),
            _ => {
                let (a, b) = (self.as_f64(), other.as_f64());
                if floats_equal(a, b) {
                    Ordering::Equal
                } else {
                    a.total_cmp(&b)
                }
            }
        }
    }

    pub fn approx_eq(self, other: Promoted) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// True when `offset` is an exact multiple of `step` (epsilon-tolerant
    /// for floats). `step` must be non-zero. `rel` is the source
    /// representation's relative epsilon (`Scalar::REL_TOLERANCE`); the
    /// float test measures the distance to the *nearest* multiple of `step`,
    /// scaled by operand magnitude, so near-zero remainders on large offsets
    /// are still recognized.
    pub fn is_step_multiple(offset: Promoted, step: Promoted, rel: f64) -> bool {
        match (offset, step) {
            (Promoted::Int(o), Promoted::Int(s)) => s != 0 && o % s == 0,
            _ => {
                let (o, s) = (offset.as_f64(), step.as_f64());
                if s == 0.0 {
                    return false;
                }
                let nearest = (o / s).round() * s;
                (o - nearest).abs() <= step_tolerance(o, s, rel)
            }
        }
    }

    /// Floor of `self / rhs`. `rhs` must be positive (range steps are).
    pub fn floor_div(self, rhs: Promoted) -> Promoted {
        match (self, rhs) {
            (Promoted::Int(a), Promoted::Int(b)) => Promoted::Int(floor_div(a, b)),
            _ => Promoted::Float((self.as_f64() / rhs.as_f64()).floor()),
        }
    }

    /// Ceiling of `self / rhs`. `rhs` must be positive.
    pub fn ceil_div(self, rhs: Promoted) -> Promoted {
        match (self, rhs) {
            (Promoted::Int(a), Promoted::Int(b)) => Promoted::Int(ceil_div(a, b)),
            _ => Promoted::Float((self.as_f64() / rhs.as_f64()).ceil()),
        }
    }

    /// [`Promoted::floor_div`] that first snaps representation noise: a
    /// quotient within the float tolerance of an integer is taken as that
    /// integer instead of being floored past it. Exact for integer operands.
    pub fn floor_div_tolerant(self, rhs: Promoted, rel: f64) -> Promoted {
        match (self, rhs) {
            (Promoted::Int(a), Promoted::Int(b)) => Promoted::Int(floor_div(a, b)),
            _ => {
                let (o, s) = (self.as_f64(), rhs.as_f64());
                let q = o / s;
                let snapped = q.round();
                if (o - snapped * s).abs() <= step_tolerance(o, s, rel) {
                    Promoted::Float(snapped)
                } else {
                    Promoted::Float(q.floor())
                }
            }
        }
    }

    /// Ceiling counterpart of [`Promoted::floor_div_tolerant`].
    pub fn ceil_div_tolerant(self, rhs: Promoted, rel: f64) -> Promoted {
        match (self, rhs) {
            (Promoted::Int(a), Promoted::Int(b)) => Promoted::Int(ceil_div(a, b)),
            _ => {
                let (o, s) = (self.as_f64(), rhs.as_f64());
                let q = o / s;
                let snapped = q.round();
                if (o - snapped * s).abs() <= step_tolerance(o, s, rel) {
                    Promoted::Float(snapped)
                } else {
                    Promoted::Float(q.ceil())
                }
            }
        }
    }
}

// Promoted sums/differences of 64-bit-sourced values cannot overflow i128;
// products are only formed as k*step with k*step bounded by a value span.
// Saturation keeps the arithmetic total anyway.

impl Add for Promoted {
    type Output = Promoted;

    fn add(self, rhs: Promoted) -> Promoted {
        match (self, rhs) {
            (Promoted::Int(a), Promoted::Int(b)) => Promoted::Int(a.saturating_add(b)),
            _ => Promoted::Float(self.as_f64() + rhs.as_f64()),
        }
    }
}

impl Sub for Promoted {
    type Output = Promoted;

    fn sub(self, rhs: Promoted) -> Promoted {
        match (self, rhs) {
            (Promoted::Int(a), Promoted::Int(b)) => Promoted::Int(a.saturating_sub(b)),
            _ => Promoted::Float(self.as_f64() - rhs.as_f64()),
        }
    }
}

impl Mul for Promoted {
    type Output = Promoted;

    fn mul(self, rhs: Promoted) -> Promoted {
        match (self, rhs) {
            (Promoted::Int(a), Promoted::Int(b)) => Promoted::Int(a.saturating_mul(b)),
            _ => Promoted::Float(self.as_f64() * rhs.as_f64()),
        }
    }
}
