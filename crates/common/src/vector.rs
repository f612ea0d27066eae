use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign};

/// A 2D vector of `f32` components.
///
/// Arithmetic returns new values; the `*_local` variants mutate the receiver.
/// Equality is exact on both components (no epsilon).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn add_local(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn scale_local(&mut self, factor: f32) {
        self.x *= factor;
        self.y *= factor;
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn magnitude(self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction.
    ///
    /// Precondition: `self.magnitude() > 0`. A zero vector yields NaN
    /// components.
    pub fn normalize(self) -> Self {
        let magnitude = self.magnitude();
        Self::new(self.x / magnitude, self.y / magnitude)
    }

    /// In-place [`normalize`](Self::normalize); same precondition.
    pub fn normalize_local(&mut self) {
        let magnitude = self.magnitude();
        self.x /= magnitude;
        self.y /= magnitude;
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Vector2D::add(self, rhs)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, rhs: Self) {
        self.add_local(rhs);
    }
}

impl Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl MulAssign<f32> for Vector2D {
    fn mul_assign(&mut self, rhs: f32) {
        self.scale_local(rhs);
    }
}

impl From<Vec2> for Vector2D {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2D> for Vec2 {
    fn from(v: Vector2D) -> Self {
        Vec2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_of_three_four() {
        assert_eq!(Vector2D::new(3.0, 4.0).magnitude(), 5.0);
        assert_eq!(Vector2D::new(3.0, 4.0).magnitude_squared(), 25.0);
    }

    #[test]
    fn normalize_yields_unit_length() {
        let n = Vector2D::new(3.0, 4.0).normalize();
        assert!((n.magnitude() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn local_variants_mutate_receiver() {
        let mut v = Vector2D::new(1.0, 2.0);
        v.add_local(Vector2D::new(2.0, 2.0));
        assert_eq!(v, Vector2D::new(3.0, 4.0));
        v.scale_local(2.0);
        assert_eq!(v, Vector2D::new(6.0, 8.0));
        v.normalize_local();
        assert!((v.magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn pure_variants_leave_receiver_alone() {
        let v = Vector2D::new(1.0, -1.0);
        let sum = v.add(Vector2D::new(1.0, 1.0));
        let scaled = v.scale(3.0);
        assert_eq!(v, Vector2D::new(1.0, -1.0));
        assert_eq!(sum, Vector2D::new(2.0, 0.0));
        assert_eq!(scaled, Vector2D::new(3.0, -3.0));
    }

    #[test]
    fn dot_product() {
        assert_eq!(Vector2D::new(1.0, 2.0).dot(Vector2D::new(3.0, 4.0)), 11.0);
        assert_eq!(Vector2D::new(1.0, 0.0).dot(Vector2D::new(0.0, 1.0)), 0.0);
    }

    #[test]
    fn equality_is_exact() {
        assert_eq!(Vector2D::new(0.1, 0.2), Vector2D::new(0.1, 0.2));
        assert_ne!(Vector2D::new(1.0 + f32::EPSILON, 0.0), Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn operators_match_methods() {
        let mut v = Vector2D::new(1.0, 1.0) + Vector2D::new(1.0, 2.0);
        assert_eq!(v, Vector2D::new(2.0, 3.0));
        v *= 2.0;
        assert_eq!(v * 0.5, Vector2D::new(2.0, 3.0));
        v += Vector2D::new(-4.0, -6.0);
        assert_eq!(v, Vector2D::ZERO);
    }

    #[test]
    fn glam_round_trip() {
        let v: Vector2D = Vec2::new(1.5, -2.5).into();
        assert_eq!(v, Vector2D::new(1.5, -2.5));
        assert_eq!(Vec2::from(v), Vec2::new(1.5, -2.5));
    }
}
