//! Cross-section profiles
//!
//! A profile is a closed polygon in the local YZ plane (X = 0) that gets swept
//! along the ramp path. Wedge ramps have a single triangle, thin ramps one or
//! two quads.

use crate::math::{Vec3, edge_normal_2d};

use super::params::{RampParams, Style, Surf};

/// Ordered cross-section polygon, every point has `x == 0`
pub type Profile = Vec<Vec3>;

/// Builds the cross-section(s) for the given parameters.
///
/// Returns one profile, except for a thin ramp surfable on both sides which
/// has one quad per slope.
pub fn generate_profiles(params: &RampParams) -> Vec<Profile> {
    let total_width = match params.surf {
        Surf::Both => params.width * 2.0,
        Surf::Left | Surf::Right => params.width,
    };
    let half = CrossSection::new(params.surf, total_width, params.height);

    match params.style {
        Style::Wedge => wedge_profiles(params.surf, &half),
        Style::Thin => thin_profiles(params.surf, &half, params.thickness),
    }
}

struct CrossSection {
    top_z: f64,
    left_y: f64,
    right_y: f64,
    /// shift applied to one-sided ramps so their vertical wall sits at Y = 0
    y_offset: f64,
}

impl CrossSection {
    fn new(surf: Surf, total_width: f64, height: f64) -> Self {
        let left_y = -total_width / 2.0;
        let right_y = total_width / 2.0;
        let y_offset = match surf {
            Surf::Both => 0.0,
            Surf::Left => -left_y,
            Surf::Right => -right_y,
        };
        Self {
            top_z: height,
            left_y,
            right_y,
            y_offset,
        }
    }

    fn left(&self) -> f64 {
        self.left_y + self.y_offset
    }

    fn right(&self) -> f64 {
        self.right_y + self.y_offset
    }
}

const BOTTOM_Z: f64 = 0.0;
const CENTER_Y: f64 = 0.0;

fn wedge_profiles(surf: Surf, cs: &CrossSection) -> Vec<Profile> {
    let profile = match surf {
        Surf::Both => vec![
            Vec3::new(0.0, CENTER_Y, cs.top_z),
            Vec3::new(0.0, cs.right_y, BOTTOM_Z),
            Vec3::new(0.0, cs.left_y, BOTTOM_Z),
        ],
        Surf::Left => vec![
            Vec3::new(0.0, cs.left(), cs.top_z),
            Vec3::new(0.0, cs.right(), BOTTOM_Z),
            Vec3::new(0.0, cs.left(), BOTTOM_Z),
        ],
        Surf::Right => vec![
            Vec3::new(0.0, cs.right(), cs.top_z),
            Vec3::new(0.0, cs.right(), BOTTOM_Z),
            Vec3::new(0.0, cs.left(), BOTTOM_Z),
        ],
    };
    vec![profile]
}

fn thin_profiles(surf: Surf, cs: &CrossSection, thickness: f64) -> Vec<Profile> {
    match surf {
        Surf::Both => thin_both_sides(cs, thickness),
        Surf::Left => {
            let start = Vec3::new(0.0, cs.left(), cs.top_z);
            let end = Vec3::new(0.0, cs.right(), BOTTOM_Z);
            vec![thickened_segment(start, end, thickness)]
        }
        Surf::Right => {
            let start = Vec3::new(0.0, cs.left(), BOTTOM_Z);
            let end = Vec3::new(0.0, cs.right(), cs.top_z);
            vec![thickened_segment(start, end, thickness)]
        }
    }
}

/// Two slabs sharing an inner spine. The spine peak is lowered so the wall
/// thickness is measured perpendicular to the slope.
fn thin_both_sides(cs: &CrossSection, thickness: f64) -> Vec<Profile> {
    let peak = Vec3::new(0.0, CENTER_Y, cs.top_z);
    let left_base = Vec3::new(0.0, cs.left_y, BOTTOM_Z);
    let right_base = Vec3::new(0.0, cs.right_y, BOTTOM_Z);

    let half_width = cs.right_y;
    let height = cs.top_z - BOTTOM_Z;
    let slope_length = (half_width * half_width + height * height).sqrt();
    let vertical_offset = if half_width > 0.0 {
        thickness * slope_length / half_width
    } else {
        thickness
    };
    let inner_peak = Vec3::new(0.0, CENTER_Y, cs.top_z - vertical_offset);

    let left_base_inner = left_base - normal_offset(&left_base, &peak, thickness);
    let right_base_inner = right_base - normal_offset(&peak, &right_base, thickness);

    vec![
        vec![left_base, peak, inner_peak, left_base_inner],
        vec![peak, right_base, right_base_inner, inner_peak],
    ]
}

/// Quad made of the edge `start -> end` and its copy pushed `thickness` units
/// against the edge normal.
fn thickened_segment(start: Vec3, end: Vec3, thickness: f64) -> Profile {
    let offset = normal_offset(&start, &end, thickness);
    vec![start, end, end - offset, start - offset]
}

/// Edge normal of `p1 -> p2` in the YZ plane, scaled to `amount`
pub(crate) fn normal_offset(p1: &Vec3, p2: &Vec3, amount: f64) -> Vec3 {
    let normal = edge_normal_2d(p1, p2);
    Vec3::new(0.0, normal.x * amount, normal.y * amount)
}
