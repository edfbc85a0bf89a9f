//! Simple vector types for geometry calculations
//!
//! These are lightweight vector types used for profile and sweep generation.
//! For rigid transformations with 4x4 matrices, use `Matrix4` from the matrix module.

/// A 2D vector helper, used for cross-section (YZ plane) calculations
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// A 3D point or direction
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Vec3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or `+Z` for a zero-length vector
    pub fn normalize(self) -> Self {
        self.normalize_or(Vec3::Z)
    }

    /// Unit vector in the same direction, or `fallback` for a zero-length vector
    pub fn normalize_or(self, fallback: Vec3) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            fallback
        }
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
        Vec3 {
            x: a.y * b.z - a.z * b.y,
            y: a.z * b.x - a.x * b.z,
            z: a.x * b.y - a.y * b.x,
        }
    }

    pub fn midpoint(a: &Vec3, b: &Vec3) -> Vec3 {
        Vec3 {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
            z: (a.z + b.z) / 2.0,
        }
    }

    /// Average of a set of points, the origin for an empty set
    pub fn centroid(points: &[Vec3]) -> Vec3 {
        if points.is_empty() {
            return Vec3::ZERO;
        }
        let sum = points.iter().fold(Vec3::ZERO, |acc, p| acc + *p);
        let count = points.len() as f64;
        Vec3::new(sum.x / count, sum.y / count, sum.z / count)
    }
}

/// Rotate `point` about the line through `center` with direction `axis`
/// using Rodrigues' rotation formula.
///
/// The cross term is `offset × axis`, so a positive angle turns clockwise
/// when looking down `axis`. All sweeps and connection frames rely on this.
/// `axis` is expected to be unit length.
pub fn rotate_around_axis(point: Vec3, axis: Vec3, center: Vec3, angle_rad: f64) -> Vec3 {
    let rel = point - center;
    let (sin_angle, cos_angle) = angle_rad.sin_cos();
    let one_minus_cos = 1.0 - cos_angle;
    let dot = rel.dot(&axis);

    let cross = Vec3 {
        x: rel.y * axis.z - rel.z * axis.y,
        y: rel.z * axis.x - rel.x * axis.z,
        z: rel.x * axis.y - rel.y * axis.x,
    };

    let rotated = Vec3 {
        x: rel.x * cos_angle + cross.x * sin_angle + axis.x * dot * one_minus_cos,
        y: rel.y * cos_angle + cross.y * sin_angle + axis.y * dot * one_minus_cos,
        z: rel.z * cos_angle + cross.z * sin_angle + axis.z * dot * one_minus_cos,
    };
    rotated + center
}

/// Unit normal of the edge `p1 -> p2` projected on the YZ plane,
/// rotated 90° counter-clockwise: `(-dz, dy) / |edge|`.
///
/// Returns `(0, 0)` for a degenerate edge.
pub fn edge_normal_2d(p1: &Vec3, p2: &Vec3) -> Vec2 {
    let edge = Vec2::new(p2.y - p1.y, p2.z - p1.z);
    let len = edge.length();
    if len == 0.0 {
        return Vec2::default();
    }
    Vec2 {
        x: -edge.y / len,
        y: edge.x / len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-9;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(
            (a - b).length() < EPSILON,
            "expected {b:?}, got {a:?} (distance {})",
            (a - b).length()
        );
    }

    #[test]
    fn test_vec2_operations() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v, Vec2 { x: 3.0, y: 4.0 });
        assert_eq!(v.length(), 5.0);
        assert_eq!(Vec2::default().length(), 0.0);
    }

    #[test]
    fn test_vec3_operations() {
        let v1 = Vec3::new(1.0, 2.0, 3.0);
        let v2 = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(v1 + v2, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(v1 - v2, Vec3::new(-3.0, -3.0, -3.0));
        assert_eq!(v1 * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-v1, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(v1.length(), 14.0f64.sqrt());
        assert_eq!(v1.dot(&v2), 32.0);
        assert_eq!(Vec3::cross(&v1, &v2), Vec3::new(-3.0, 6.0, -3.0));
        assert_eq!(Vec3::midpoint(&v1, &v2), Vec3::new(2.5, 3.5, 4.5));
    }

    #[test]
    fn test_normalize_zero_length_uses_fallback() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::Z);
        assert_eq!(Vec3::ZERO.normalize_or(Vec3::X), Vec3::X);
        assert_eq!(Vec3::new(0.0, 3.0, 4.0).normalize(), Vec3::new(0.0, 0.6, 0.8));
    }

    #[test]
    fn test_centroid() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 6.0),
        ];
        assert_eq!(Vec3::centroid(&points), Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(Vec3::centroid(&[]), Vec3::ZERO);
    }

    #[test]
    fn test_rotate_around_z_axis_is_clockwise() {
        let rotated = rotate_around_axis(Vec3::X, Vec3::Z, Vec3::ZERO, FRAC_PI_2);
        assert_close(rotated, -Vec3::Y);
        let rotated = rotate_around_axis(Vec3::X, Vec3::Z, Vec3::ZERO, -FRAC_PI_2);
        assert_close(rotated, Vec3::Y);
    }

    #[test]
    fn test_rotate_around_offset_center() {
        // quarter turn of the origin around (0, 1024, 0) ends up at (-1024, 1024, 0)
        let center = Vec3::new(0.0, 1024.0, 0.0);
        let rotated = rotate_around_axis(Vec3::ZERO, Vec3::Z, center, FRAC_PI_2);
        assert_close(rotated, Vec3::new(-1024.0, 1024.0, 0.0));
    }

    #[test]
    fn test_rotate_full_turn_is_identity() {
        let point = Vec3::new(12.5, -3.0, 7.0);
        let axis = Vec3::new(1.0, 1.0, 0.0).normalize();
        let rotated = rotate_around_axis(point, axis, Vec3::new(1.0, 2.0, 3.0), 2.0 * PI);
        assert_close(rotated, point);
    }

    #[test]
    fn test_rotate_point_on_axis_stays() {
        let point = Vec3::new(0.0, 0.0, 42.0);
        let rotated = rotate_around_axis(point, Vec3::Z, Vec3::ZERO, 1.234);
        assert_close(rotated, point);
    }

    #[test]
    fn test_edge_normal_2d() {
        let n = edge_normal_2d(&Vec3::new(0.0, 0.0, 0.0), &Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(n, Vec2::new(0.0, 1.0));
        let n = edge_normal_2d(&Vec3::new(0.0, 0.0, 0.0), &Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(n, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_edge_normal_2d_degenerate() {
        let p = Vec3::new(0.0, 1.0, 1.0);
        assert_eq!(edge_normal_2d(&p, &p), Vec2::default());
    }
}
