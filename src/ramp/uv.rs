//! Texture axes for ramp faces
//!
//! Lateral faces of a sweep get their U axis along the sweep so textures
//! follow the curve. The U shift keeps running from one segment to the next,
//! which hides the seams between brushes. Cap faces use a plain world-aligned
//! projection.

use crate::math::Vec3;
use crate::vmf::TextureAxis;

/// Shifts are wrapped into `[0, TEXTURE_SIZE)`
const TEXTURE_SIZE: f64 = 1024.0;

/// Texture axes of a lateral quad face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceUv {
    pub uaxis: TextureAxis,
    pub vaxis: TextureAxis,
    /// Length of the face along the U axis in world units
    pub u_length: f64,
}

/// Computes the axes of the quad `v1 v2 v3 v4`, where `v1 v2` is the edge on
/// the start cross-section and `v4 v3` the matching edge on the end one.
///
/// `offset` is the U shift accumulated by the previous faces of the strip.
pub fn face_uv(v1: &Vec3, v2: &Vec3, v3: &Vec3, v4: &Vec3, scale: f64, offset: f64) -> FaceUv {
    let mid_start = Vec3::midpoint(v1, v2);
    let mid_end = Vec3::midpoint(v4, v3);
    let along = mid_end - mid_start;

    let u = along.normalize_or(Vec3::X);
    let normal = face_normal(v4, v3, v2);
    let v = v_axis(&normal, &u, v1, v2, v3, v4);

    let shift_u = wrap(offset - mid_start.dot(&u) / scale);
    let shift_v = wrap(-v1.dot(&v) / scale);

    FaceUv {
        uaxis: TextureAxis::fixed(u, shift_u, scale),
        vaxis: TextureAxis::fixed(v, shift_v, scale),
        u_length: along.length(),
    }
}

fn face_normal(a: &Vec3, b: &Vec3, c: &Vec3) -> Vec3 {
    Vec3::cross(&(*b - *a), &(*c - *a)).normalize_or(Vec3::Z)
}

/// V runs across the face, flipped so it points from the `v1 v4` edge
/// towards the `v2 v3` edge.
fn v_axis(normal: &Vec3, u: &Vec3, v1: &Vec3, v2: &Vec3, v3: &Vec3, v4: &Vec3) -> Vec3 {
    let v = Vec3::cross(normal, u).normalize_or(Vec3::Y);
    let span = (*v2 + *v3) - (*v1 + *v4);
    if span.dot(&v) < 0.0 { -v } else { v }
}

fn wrap(value: f64) -> f64 {
    ((value % TEXTURE_SIZE) + TEXTURE_SIZE) % TEXTURE_SIZE
}

/// Projects the face through `p1 p2 p3` on the world plane it faces most
pub fn world_aligned_uv(p1: &Vec3, p2: &Vec3, p3: &Vec3, scale: f64) -> (TextureAxis, TextureAxis) {
    let n = Vec3::cross(&(*p2 - *p1), &(*p3 - *p1));
    let len = n.length();
    let (u, v) = if len == 0.0 {
        (Vec3::X, -Vec3::Z)
    } else {
        let (ax, ay, az) = ((n.x / len).abs(), (n.y / len).abs(), (n.z / len).abs());
        if az >= ax && az >= ay {
            (Vec3::X, -Vec3::Y)
        } else if ax >= ay && ax >= az {
            (Vec3::Y, -Vec3::Z)
        } else {
            (Vec3::X, -Vec3::Z)
        }
    };
    (
        TextureAxis::shortest(u, 0.0, scale),
        TextureAxis::shortest(v, 0.0, scale),
    )
}

/// Running U shifts of the lateral face strips of a sweep, one per profile edge
#[derive(Debug, Clone, PartialEq)]
pub struct TextureOffsets {
    offsets: Vec<f64>,
    scale: f64,
}

impl TextureOffsets {
    pub fn new(edges: usize, scale: f64) -> Self {
        Self {
            offsets: vec![0.0; edges],
            scale,
        }
    }

    /// Axes for the next face of strip `edge`, advancing that strip's shift
    pub fn next_face(&mut self, edge: usize, v1: &Vec3, v2: &Vec3, v3: &Vec3, v4: &Vec3) -> FaceUv {
        if edge >= self.offsets.len() {
            self.offsets.resize(edge + 1, 0.0);
        }
        let uv = face_uv(v1, v2, v3, v4, self.scale, self.offsets[edge]);
        self.offsets[edge] += uv.u_length / self.scale;
        uv
    }

    pub fn offset(&self, edge: usize) -> f64 {
        self.offsets.get(edge).copied().unwrap_or(0.0)
    }
}
