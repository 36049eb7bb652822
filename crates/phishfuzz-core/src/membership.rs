// crates/phishfuzz-core/src/membership.rs
//
// Triangular membership functions.
//
// A triangle (a, b, c) is 0 outside [a, c], rises linearly from a to b,
// peaks at 1 on b, and falls linearly from b to c. Shoulders (a == b or
// b == c) and fully degenerate crisp points (a == b == c) are allowed.

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;

/// A triangular membership function with breakpoints a <= b <= c.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    a: f64,
    b: f64,
    c: f64,
}

impl Triangle {
    /// Create a triangle, rejecting unordered or non-finite breakpoints.
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self, FuzzyError> {
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return Err(FuzzyError::InvalidMembership {
                term: format!("[{a}, {b}, {c}]"),
                reason: "breakpoints must be finite".to_string(),
            });
        }
        if a > b || b > c {
            return Err(FuzzyError::InvalidMembership {
                term: format!("[{a}, {b}, {c}]"),
                reason: "breakpoints must satisfy a <= b <= c".to_string(),
            });
        }
        Ok(Self { a, b, c })
    }

    /// A crisp point: membership 1 exactly at `at`, 0 elsewhere.
    pub fn crisp(at: f64) -> Result<Self, FuzzyError> {
        Self::new(at, at, at)
    }

    pub fn breakpoints(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// Whether this triangle is a single crisp point.
    pub fn is_crisp(&self) -> bool {
        self.a == self.b && self.b == self.c
    }

    /// Degree of membership of `x`, in [0, 1].
    pub fn membership(&self, x: f64) -> f64 {
        let (a, b, c) = (self.a, self.b, self.c);
        if x < a || x > c {
            0.0
        } else if x == b {
            1.0
        } else if x < b {
            (x - a) / (b - a)
        } else {
            (c - x) / (c - b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_is_one_and_feet_are_zero() {
        let t = Triangle::new(20.0, 50.0, 70.0).unwrap();
        assert_eq!(t.membership(20.0), 0.0);
        assert_eq!(t.membership(50.0), 1.0);
        assert_eq!(t.membership(70.0), 0.0);
        assert_eq!(t.membership(19.0), 0.0);
        assert_eq!(t.membership(71.0), 0.0);
    }

    #[test]
    fn interpolates_linearly_on_both_slopes() {
        let t = Triangle::new(20.0, 50.0, 70.0).unwrap();
        assert!((t.membership(35.0) - 0.5).abs() < 1e-10);
        assert!((t.membership(60.0) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn left_shoulder_is_one_at_a() {
        let young = Triangle::new(0.0, 0.0, 180.0).unwrap();
        assert_eq!(young.membership(0.0), 1.0);
        assert!((young.membership(150.0) - 30.0 / 180.0).abs() < 1e-10);
        assert_eq!(young.membership(180.0), 0.0);
    }

    #[test]
    fn right_shoulder_is_one_at_c() {
        let old = Triangle::new(180.0, 1000.0, 1000.0).unwrap();
        assert_eq!(old.membership(1000.0), 1.0);
        assert_eq!(old.membership(180.0), 0.0);
        assert!((old.membership(900.0) - 720.0 / 820.0).abs() < 1e-10);
    }

    #[test]
    fn crisp_point_matches_only_itself() {
        let yes = Triangle::crisp(1.0).unwrap();
        assert!(yes.is_crisp());
        assert_eq!(yes.membership(1.0), 1.0);
        assert_eq!(yes.membership(0.0), 0.0);
        assert_eq!(yes.membership(0.999), 0.0);
    }

    #[test]
    fn monotone_on_each_slope() {
        let t = Triangle::new(3.0, 10.0, 14.0).unwrap();
        let mut prev = 0.0;
        for i in 0..=100 {
            let x = 3.0 + 7.0 * i as f64 / 100.0;
            let m = t.membership(x);
            assert!(m >= prev);
            prev = m;
        }
        for i in 0..=100 {
            let x = 10.0 + 4.0 * i as f64 / 100.0;
            let m = t.membership(x);
            assert!(m <= prev);
            prev = m;
        }
    }

    #[test]
    fn unordered_breakpoints_rejected() {
        assert!(Triangle::new(5.0, 2.0, 9.0).is_err());
        assert!(Triangle::new(0.0, 5.0, 4.0).is_err());
        assert!(Triangle::new(0.0, f64::NAN, 4.0).is_err());
    }
}
