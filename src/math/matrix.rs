//! Rigid transformation matrices
//!
//! Row-major 4x4 matrices with the row-vector convention: a point is
//! transformed as `p' = p * M`, so the translation lives in row 4.
//!
//! When matrices are multiplied as A * B, the transformation A is applied first, then B.
//!
//! For a point p, the transformation (A * B) * p means:
//! 1. First apply A to p
//! 2. Then apply B to the result
//!
//! Only rotations and translations are ever composed here, which is what
//! allows [`Matrix4::inverse_rigid`] to avoid a general inversion.

use std::ops::Mul;

use super::Vec3;

/// 4x4 matrix for representing rigid transformations of 3D points
///
/// Layout:
/// ```text
/// [ forward.x forward.y forward.z 0 ]
/// [ side.x    side.y    side.z    0 ]
/// [ up.x      up.y      up.z      0 ]
/// [ pos.x     pos.y     pos.z     1 ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    /// Row-major 4x4 matrix data
    pub m: [[f64; 4]; 4],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    /// Create a new matrix with explicit values (row-major order)
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        m11: f64,
        m12: f64,
        m13: f64,
        m14: f64,
        m21: f64,
        m22: f64,
        m23: f64,
        m24: f64,
        m31: f64,
        m32: f64,
        m33: f64,
        m34: f64,
        m41: f64,
        m42: f64,
        m43: f64,
        m44: f64,
    ) -> Self {
        Self {
            m: [
                [m11, m12, m13, m14],
                [m21, m22, m23, m24],
                [m31, m32, m33, m34],
                [m41, m42, m43, m44],
            ],
        }
    }

    /// Create an identity matrix
    pub const fn identity() -> Self {
        Self::new(
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Frame matrix mapping local coordinates into the frame at `position`
    /// with local X along `forward` and local Z along `up`.
    ///
    /// Local Y is `up × forward`, which keeps the basis right-handed for
    /// orthonormal inputs.
    pub fn from_basis(position: Vec3, forward: Vec3, up: Vec3) -> Self {
        let side = Vec3::cross(&up, &forward);
        Self::new(
            forward.x, forward.y, forward.z, 0.0, side.x, side.y, side.z, 0.0, up.x, up.y, up.z,
            0.0, position.x, position.y, position.z, 1.0,
        )
    }

    /// Inverse of a rigid transformation: the rotation block is transposed
    /// and the translation rotated back.
    ///
    /// The result is meaningless for matrices containing scale or shear.
    pub fn inverse_rigid(&self) -> Self {
        let m = &self.m;
        let t = Vec3::new(m[3][0], m[3][1], m[3][2]);
        let row = |i: usize| Vec3::new(m[i][0], m[i][1], m[i][2]);
        let tx = -row(0).dot(&t);
        let ty = -row(1).dot(&t);
        let tz = -row(2).dot(&t);
        Self::new(
            m[0][0], m[1][0], m[2][0], 0.0, m[0][1], m[1][1], m[2][1], 0.0, m[0][2], m[1][2],
            m[2][2], 0.0, tx, ty, tz, 1.0,
        )
    }

    /// Transform a point by this matrix
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z + m[3][0],
            m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z + m[3][1],
            m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z + m[3][2],
        )
    }

    /// Transform a direction by this matrix (no translation)
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
            m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
            m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
        )
    }
}

/// Matrix multiplication (A * B means A is applied first, then B)
impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, b: Matrix4) -> Matrix4 {
        let a = &self;
        let mut result = [[0.0f64; 4]; 4];
        for (i, row) in result.iter_mut().enumerate() {
            for (l, cell) in row.iter_mut().enumerate() {
                *cell = b.m[0][l] * a.m[i][0]
                    + b.m[1][l] * a.m[i][1]
                    + b.m[2][l] * a.m[i][2]
                    + b.m[3][l] * a.m[i][3];
            }
        }
        Matrix4 { m: result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn assert_vec_eq(actual: Vec3, expected: Vec3) {
        assert!(
            approx_eq(actual.x, expected.x)
                && approx_eq(actual.y, expected.y)
                && approx_eq(actual.z, expected.z),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_identity() {
        let m = Matrix4::identity();
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(m.transform_point(v), v);
        assert_eq!(Matrix4::default(), m);
    }

    #[test]
    fn test_matrix_multiplication_order() {
        // quarter turn about Z placed at (10, 0, 0), and a shift along X
        let turn = Matrix4::from_basis(Vec3::new(10.0, 0.0, 0.0), Vec3::Y, Vec3::Z);
        let shift = Matrix4::from_basis(Vec3::new(5.0, 0.0, 0.0), Vec3::X, Vec3::Z);

        let combined = turn * shift;
        assert_vec_eq(combined.transform_point(Vec3::X), Vec3::new(15.0, 1.0, 0.0));

        // shifted first, so the shift is turned as well
        let combined = shift * turn;
        assert_vec_eq(combined.transform_point(Vec3::X), Vec3::new(10.0, 6.0, 0.0));
    }

    #[test]
    fn test_transform_vector_no_translation() {
        let m = Matrix4::from_basis(Vec3::new(10.0, 20.0, 30.0), Vec3::X, Vec3::Z);
        assert_eq!(m.transform_vector(Vec3::X), Vec3::X);
        assert_eq!(m.transform_point(Vec3::X), Vec3::new(11.0, 20.0, 30.0));
    }

    #[test]
    fn test_from_basis_maps_local_axes() {
        let position = Vec3::new(5.0, -2.0, 7.0);
        let forward = Vec3::Y;
        let up = Vec3::Z;
        let m = Matrix4::from_basis(position, forward, up);

        assert_vec_eq(m.transform_point(Vec3::ZERO), position);
        assert_vec_eq(m.transform_vector(Vec3::X), forward);
        assert_vec_eq(m.transform_vector(Vec3::Z), up);
        // side = up x forward
        assert_vec_eq(m.transform_vector(Vec3::Y), -Vec3::X);
    }

    #[test]
    fn test_inverse_rigid_round_trip() {
        let forward = Vec3::new(1.0, 1.0, 0.0).normalize();
        let m = Matrix4::from_basis(Vec3::new(100.0, -50.0, 25.0), forward, Vec3::Z);
        let inverse = m.inverse_rigid();

        let identity = m * inverse;
        for (i, row) in identity.m.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(approx_eq(*value, expected), "m[{i}][{j}] = {value}");
            }
        }

        let point = Vec3::new(3.0, 4.0, 5.0);
        assert_vec_eq(inverse.transform_point(m.transform_point(point)), point);
    }
}
