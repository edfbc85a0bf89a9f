//! Attachment frames and chain transforms
//!
//! Every ramp has a start frame at its local origin and an end frame where the
//! sweep finishes. Chaining ramps means finding the rigid transform that puts
//! one ramp's frame onto the matching frame of its predecessor.

use crate::math::{Matrix4, Vec3, rotate_around_axis};

use super::geometry::SpinConfig;
use super::params::{ConnectionMode, RampParams};

/// Position and orientation of a ramp's attachment point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionFrame {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl ConnectionFrame {
    /// The local origin, facing +X with +Z up
    pub const ORIGIN: ConnectionFrame = ConnectionFrame {
        position: Vec3::ZERO,
        forward: Vec3::X,
        up: Vec3::Z,
    };

    /// Matrix mapping canonical coordinates into this frame
    pub fn basis(&self) -> Matrix4 {
        Matrix4::from_basis(self.position, self.forward, self.up)
    }

    pub fn transformed(&self, transform: &Matrix4) -> ConnectionFrame {
        ConnectionFrame {
            position: transform.transform_point(self.position),
            forward: transform.transform_vector(self.forward),
            up: transform.transform_vector(self.up),
        }
    }
}

/// The start or end frame of a ramp in its local coordinates.
///
/// Derived from the parameters alone, no geometry is generated.
pub fn connection_frame(params: &RampParams, is_start: bool) -> ConnectionFrame {
    if is_start {
        return ConnectionFrame::ORIGIN;
    }
    match SpinConfig::for_ramp(params) {
        None => ConnectionFrame {
            position: Vec3::new(-params.size, 0.0, 0.0),
            ..ConnectionFrame::ORIGIN
        },
        Some(spin) => ConnectionFrame {
            position: spin.rotate(Vec3::ZERO, spin.angle),
            forward: rotate_around_axis(Vec3::X, spin.axis, Vec3::ZERO, spin.angle).normalize(),
            up: rotate_around_axis(Vec3::Z, spin.axis, Vec3::ZERO, spin.angle).normalize(),
        },
    }
}

/// Transform placing the current ramp against the previous one.
///
/// In [`ConnectionMode::End`] the current ramp's start attaches to the
/// previous ramp's end, in [`ConnectionMode::Start`] its end attaches to the
/// previous ramp's start. `prev_transform` places the previous ramp in the
/// chain.
pub fn connection_transform(
    prev: &RampParams,
    current: &RampParams,
    prev_transform: &Matrix4,
    mode: ConnectionMode,
) -> Matrix4 {
    let to_start_of_prev = mode == ConnectionMode::Start;
    let target = connection_frame(prev, to_start_of_prev).transformed(prev_transform);
    let source = connection_frame(current, !to_start_of_prev);
    source.basis().inverse_rigid() * target.basis()
}
