// src/num/math.rs
//! Integer division helpers with explicit rounding direction.
//!
//! Used by range clamping, where "first progression term >= v" needs a ceil
//! and "last progression term <= v" needs a floor. Divisors are always
//! positive here (range steps are validated positive).

/// Floor division: largest q with q*b <= a. Requires b > 0.
pub fn floor_div(a: i128, b: i128) -> i128 {
    a.div_euclid(b)
}

/// Ceiling division: smallest q with q*b >= a. Requires b > 0.
pub fn ceil_div(a: i128, b: i128) -> i128 {
    -((-a).div_euclid(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_div_rounds_toward_negative_infinity() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(6, 2), 3);
        assert_eq!(floor_div(-6, 2), -3);
        assert_eq!(floor_div(0, 5), 0);
    }

    #[test]
    fn ceil_div_rounds_toward_positive_infinity() {
        assert_eq!(ceil_div(7, 2), 4);
        assert_eq!(ceil_div(-7, 2), -3);
        assert_eq!(ceil_div(6, 2), 3);
        assert_eq!(ceil_div(-6, 2), -3);
        assert_eq!(ceil_div(0, 5), 0);
    }

    #[test]
    fn floor_and_ceil_agree_on_exact_division() {
        for a in [-100i128, -50, 0, 50, 100] {
            assert_eq!(floor_div(a, 10), ceil_div(a, 10));
        }
    }
}
