//! Immutable 2D vector used by demonstration content
//!
//! Every operation returns a new value. Degenerate inputs (zero length,
//! division by zero) yield the zero vector instead of NaN/infinity.

use std::ops::{Add, Div, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A pair of numeric components in canvas space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians)
    #[inline]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[inline]
    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    #[inline]
    pub fn magnitude_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction, or zero for a zero-length vector
    pub fn normalize(self) -> Self {
        let m = self.magnitude();
        if m != 0.0 { self / m } else { Self::ZERO }
    }

    /// Clamp the magnitude to `max`, keeping direction
    pub fn limit(self, max: f64) -> Self {
        if self.magnitude() > max {
            self.normalize() * max
        } else {
            self
        }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Distance between the two points
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).magnitude()
    }

    /// Angle of the vector in radians, measured from +x
    #[inline]
    pub fn heading(self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn sum(a: Self, b: Self) -> Self {
        a + b
    }

    pub fn difference(a: Self, b: Self) -> Self {
        a - b
    }

    pub fn distance_between(a: Self, b: Self) -> f64 {
        a.distance(b)
    }
}

impl Add for Vector2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vector2 {
    type Output = Self;

    /// Division by zero yields the zero vector
    #[inline]
    fn div(self, rhs: f64) -> Self {
        if rhs == 0.0 {
            return Self::ZERO;
        }
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<DVec2> for Vector2 {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for DVec2 {
    fn from(v: Vector2) -> Self {
        DVec2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
    }

    #[test]
    fn test_normalize_three_four() {
        let n = Vector2::new(3.0, 4.0).normalize();
        assert!(approx(n.x, 0.6));
        assert!(approx(n.y, 0.8));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(Vector2::new(7.0, -2.0) / 0.0, Vector2::ZERO);
    }

    #[test]
    fn test_operands_unchanged() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, 5.0);
        let _ = a + b;
        let _ = a - b;
        let _ = a * 4.0;
        assert_eq!(a, Vector2::new(1.0, 2.0));
        assert_eq!(b, Vector2::new(3.0, 5.0));
    }

    #[test]
    fn test_distance_and_heading() {
        let a = Vector2::new(1.0, 1.0);
        let b = Vector2::new(4.0, 5.0);
        assert!(approx(a.distance(b), 5.0));
        assert!(approx(Vector2::distance_between(a, b), 5.0));
        assert!(approx(Vector2::new(0.0, 2.0).heading(), std::f64::consts::FRAC_PI_2));
    }

    #[test]
    fn test_static_forms() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(0.5, -1.0);
        assert_eq!(Vector2::sum(a, b), Vector2::new(1.5, 1.0));
        assert_eq!(Vector2::difference(a, b), Vector2::new(0.5, 3.0));
    }

    #[test]
    fn test_limit() {
        let v = Vector2::new(30.0, 40.0).limit(5.0);
        assert!(approx(v.magnitude(), 5.0));
        let short = Vector2::new(1.0, 0.0);
        assert_eq!(short.limit(5.0), short);
    }

    proptest! {
        #[test]
        fn normalize_is_unit_or_zero(x in -1e6f64..1e6, y in -1e6f64..1e6) {
            let n = Vector2::new(x, y).normalize();
            prop_assert!(n.x.is_finite() && n.y.is_finite());
            if x != 0.0 || y != 0.0 {
                prop_assert!((n.magnitude() - 1.0).abs() < 1e-9);
            } else {
                prop_assert_eq!(n, Vector2::ZERO);
            }
        }

        #[test]
        fn magnitude_squared_matches(x in -1e3f64..1e3, y in -1e3f64..1e3) {
            let v = Vector2::new(x, y);
            prop_assert!((v.magnitude().powi(2) - v.magnitude_squared()).abs() < 1e-6);
        }
    }
}
