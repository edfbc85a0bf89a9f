//! Sweeping profiles into brush solids
//!
//! Every profile is swept either along a straight line or around a circular
//! arc. The sweep produces a [`SweptSolid`], a list of steps (copies of the
//! profile) and the brush segments between consecutive steps. Every visible
//! solid also gets clip solids, slightly offset player-clip volumes that
//! overlap between segments to keep players from snagging on seams.

use log::debug;

use crate::math::{Vec3, rotate_around_axis};

use super::params::{RampAxis, RampDirection, RampParams, Style, Surf};
use super::profile::{Profile, generate_profiles, normal_offset};

/// Distance the surfable edge of a clip profile is pushed out of the visual brush
const CLIP_OFFSET: f64 = 1.0;
/// Overlap between consecutive clip segments, in world units along the arc
const TARGET_OVERLAP_UNITS: f64 = 4.0;
/// Radius below which the overlap is no longer derived from the radius
const MIN_OVERLAP_RADIUS: f64 = 64.0;
/// Upper bound of the overlap as a fraction of one segment's angle
const MAX_OVERLAP_FRACTION: f64 = 0.45;

/// Rotation a curved ramp sweeps its profile through
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinConfig {
    pub axis: Vec3,
    pub center: Vec3,
    /// Signed total angle in radians
    pub angle: f64,
}

impl SpinConfig {
    /// The spin of a curved ramp, `None` for a straight one.
    pub fn for_ramp(params: &RampParams) -> Option<SpinConfig> {
        if params.is_straight() {
            return None;
        }
        let angle = params.angle_rad();
        let size = params.size;
        let spin = match params.direction {
            RampDirection::Right => SpinConfig {
                axis: Vec3::Z,
                center: Vec3::new(0.0, size, 0.0),
                angle,
            },
            RampDirection::Left => SpinConfig {
                axis: Vec3::Z,
                center: Vec3::new(0.0, -size, 0.0),
                angle: -angle,
            },
            RampDirection::Down | RampDirection::Arc => SpinConfig {
                axis: -Vec3::Y,
                center: Vec3::new(0.0, 0.0, -size),
                angle: -angle,
            },
            RampDirection::Up | RampDirection::Dip => SpinConfig {
                axis: -Vec3::Y,
                center: Vec3::new(0.0, 0.0, size + params.height),
                angle,
            },
            RampDirection::Straight => return None,
        };
        Some(spin)
    }

    pub fn rotate(&self, point: Vec3, angle: f64) -> Vec3 {
        rotate_around_axis(point, self.axis, self.center, angle)
    }

    fn rotate_profile(&self, profile: &[Vec3], angle: f64) -> Vec<Vec3> {
        profile.iter().map(|p| self.rotate(*p, angle)).collect()
    }
}

/// A single convex slab between two cross-sections
#[derive(Debug, Clone, PartialEq)]
pub struct BrushSegment {
    pub start: Vec<Vec3>,
    pub end: Vec<Vec3>,
}

impl BrushSegment {
    /// Copy of this segment with `f` applied to every vertex
    pub fn transformed<F: Fn(Vec3) -> Vec3>(&self, f: F) -> BrushSegment {
        BrushSegment {
            start: self.start.iter().map(|p| f(*p)).collect(),
            end: self.end.iter().map(|p| f(*p)).collect(),
        }
    }
}

/// One profile swept along the ramp path
#[derive(Debug, Clone, PartialEq)]
pub struct SweptSolid {
    /// Consecutive cross-sections, all with the point count of the profile
    pub steps: Vec<Vec<Vec3>>,
    pub segments: Vec<BrushSegment>,
}

impl SweptSolid {
    fn from_steps(steps: Vec<Vec<Vec3>>) -> Self {
        let segments = steps
            .windows(2)
            .map(|pair| BrushSegment {
                start: pair[0].clone(),
                end: pair[1].clone(),
            })
            .collect();
        Self { steps, segments }
    }
}

/// Player clip volume swept alongside a visual solid
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSolid {
    pub segments: Vec<BrushSegment>,
    /// Whether the clip profile sits on the inside of the turn, in which case
    /// consecutive segments overlap
    pub is_profile_inward: bool,
}

/// All geometry of one ramp in its local frame
#[derive(Debug, Clone, PartialEq)]
pub struct RampGeometry {
    pub solids: Vec<SweptSolid>,
    pub clip_solids: Vec<ClipSolid>,
    /// Brush segments per solid
    pub segments: usize,
    pub is_loop: bool,
    pub direction: RampDirection,
    pub axis: RampAxis,
    pub style: Style,
    pub surf: Surf,
}

/// Generates the visual and clip geometry of a ramp.
///
/// Never fails, degenerate parameters result in degenerate geometry.
pub fn generate_geometry(params: &RampParams) -> RampGeometry {
    let profiles = generate_profiles(params);
    let segments = params.segment_count();
    let spin = SpinConfig::for_ramp(params);

    let solids: Vec<SweptSolid> = match &spin {
        None => profiles
            .iter()
            .map(|profile| straight_sweep(profile, params.size))
            .collect(),
        Some(spin) => profiles
            .iter()
            .map(|profile| curved_sweep(profile, spin, segments))
            .collect(),
    };

    let clip_solids = generate_clip_solids(params, &profiles, spin.as_ref(), segments, &solids);

    debug!(
        "Generated {} solid(s) and {} clip solid(s) with {} segment(s) each for {:?}",
        solids.len(),
        clip_solids.len(),
        segments,
        params.direction
    );

    RampGeometry {
        solids,
        clip_solids,
        segments,
        is_loop: params.is_loop(),
        direction: params.direction,
        axis: params.axis(),
        style: params.style,
        surf: params.surf,
    }
}

/// Extrudes the profile from the origin towards local -X, the same way the
/// curved sweeps leave their start frame.
fn straight_sweep(profile: &[Vec3], size: f64) -> SweptSolid {
    let start = profile.to_vec();
    let end = translate_x(profile, -size);
    SweptSolid::from_steps(vec![start, end])
}

fn translate_x(profile: &[Vec3], dx: f64) -> Vec<Vec3> {
    profile
        .iter()
        .map(|p| Vec3::new(p.x + dx, p.y, p.z))
        .collect()
}

fn curved_sweep(profile: &[Vec3], spin: &SpinConfig, segments: usize) -> SweptSolid {
    let steps = (0..=segments)
        .map(|step| {
            let progress = step as f64 / segments as f64;
            spin.rotate_profile(profile, spin.angle * progress)
        })
        .collect();
    SweptSolid::from_steps(steps)
}

/// Pushes the edge `p1 -> p2` out along its normal. The `keep_z` flags pin
/// the original height of an endpoint so the clip stays flush with the floor.
fn offset_edge(profile: &mut [Vec3], i1: usize, i2: usize, keep_z1: bool, keep_z2: bool) {
    let (p1, p2) = (profile[i1], profile[i2]);
    if (p2.y - p1.y) == 0.0 && (p2.z - p1.z) == 0.0 {
        return;
    }
    let offset = normal_offset(&p1, &p2, CLIP_OFFSET);
    let mut moved1 = p1 + offset;
    let mut moved2 = p2 + offset;
    if keep_z1 {
        moved1.z = p1.z;
    }
    if keep_z2 {
        moved2.z = p2.z;
    }
    profile[i1] = moved1;
    profile[i2] = moved2;
}

fn clip_profiles(params: &RampParams, profiles: &[Profile]) -> Vec<Profile> {
    let horizontal = params.axis() == RampAxis::Horizontal;
    let mut clip: Vec<Profile> = profiles.to_vec();

    match (params.style, params.surf) {
        (Style::Wedge, Surf::Both) => {
            let Some(profile) = clip.first() else {
                return clip;
            };
            let (peak, bottom_right, bottom_left) = (profile[0], profile[1], profile[2]);

            let mut left = vec![peak, Vec3::ZERO, bottom_left];
            offset_edge(&mut left, 2, 0, horizontal, false);

            let mut right = vec![peak, bottom_right, Vec3::ZERO];
            offset_edge(&mut right, 0, 1, false, horizontal);

            clip = vec![left, right];
        }
        (Style::Wedge, Surf::Left) => {
            for profile in clip.iter_mut() {
                offset_edge(profile, 0, 1, false, horizontal);
            }
        }
        (Style::Wedge, Surf::Right) => {
            for profile in clip.iter_mut() {
                offset_edge(profile, 2, 0, horizontal, false);
            }
        }
        (Style::Thin, _) => {
            for profile in clip.iter_mut() {
                offset_edge(profile, 0, 1, false, horizontal);
            }
        }
    }
    clip
}

/// Whether a clip profile lies on the inner side of the turn
fn is_profile_inward(profile: &[Vec3], params: &RampParams) -> bool {
    match params.axis() {
        RampAxis::Vertical => true,
        RampAxis::Straight => false,
        RampAxis::Horizontal => match params.surf {
            Surf::Both => {
                let avg_y = Vec3::centroid(profile).y;
                let is_left_side = avg_y < 0.0;
                match params.direction {
                    RampDirection::Right => !is_left_side,
                    _ => is_left_side,
                }
            }
            Surf::Left => params.direction != RampDirection::Left,
            Surf::Right => params.direction != RampDirection::Right,
        },
    }
}

fn overlap_angle(size: f64, step_angle: f64, is_loop: bool) -> f64 {
    let max_overlap = step_angle.abs() * MAX_OVERLAP_FRACTION;
    if is_loop {
        return max_overlap;
    }
    let radius_based = TARGET_OVERLAP_UNITS / size.max(MIN_OVERLAP_RADIUS);
    radius_based.min(max_overlap)
}

fn generate_clip_solids(
    params: &RampParams,
    profiles: &[Profile],
    spin: Option<&SpinConfig>,
    segments: usize,
    solids: &[SweptSolid],
) -> Vec<ClipSolid> {
    let clip_profiles = clip_profiles(params, profiles);

    let Some(spin) = spin else {
        return clip_profiles
            .iter()
            .map(|profile| ClipSolid {
                segments: straight_sweep(profile, params.size).segments,
                is_profile_inward: is_profile_inward(profile, params),
            })
            .collect();
    };

    let is_loop = params.is_loop();
    let step_angle = spin.angle / segments as f64;
    let overlap = overlap_angle(params.size, step_angle, is_loop);
    let signed_overlap = if step_angle < 0.0 { -overlap } else { overlap };

    let clip_solids = clip_profiles
        .iter()
        .map(|profile| {
            let inward = is_profile_inward(profile, params);
            let segments = (0..segments)
                .map(|i| {
                    let mut angle_start = i as f64 * step_angle;
                    let mut angle_end = (i + 1) as f64 * step_angle;
                    if inward {
                        if i != 0 || is_loop {
                            angle_start -= signed_overlap;
                        }
                        if i != segments - 1 || is_loop {
                            angle_end += signed_overlap;
                        }
                    }
                    BrushSegment {
                        start: spin.rotate_profile(profile, angle_start),
                        end: spin.rotate_profile(profile, angle_end),
                    }
                })
                .collect();
            ClipSolid {
                segments,
                is_profile_inward: inward,
            }
        })
        .collect();

    match params.direction {
        RampDirection::Arc | RampDirection::Dip => {
            correct_arc_dip(clip_solids, solids, params.direction, params.angle_rad(), segments)
        }
        _ => clip_solids,
    }
}

/// Vertical sweeps tilt their clip volumes the wrong way; turn them about
/// the middle cross-section of the visual sweep by half the sweep angle.
fn correct_arc_dip(
    clip_solids: Vec<ClipSolid>,
    solids: &[SweptSolid],
    direction: RampDirection,
    angle_rad: f64,
    segments: usize,
) -> Vec<ClipSolid> {
    let Some(mid_step) = solids.first().and_then(|s| s.steps.get(segments / 2)) else {
        return clip_solids;
    };
    let center = Vec3::centroid(mid_step);
    let rotation = match direction {
        RampDirection::Arc => angle_rad / 2.0,
        _ => -angle_rad / 2.0,
    };
    // Rotation is in place about `center`: points are moved back by `center`
    // afterwards, so the clip stays where the sweep put it and is not
    // re-centred on the origin.
    clip_solids
        .into_iter()
        .map(|clip| ClipSolid {
            segments: clip
                .segments
                .iter()
                .map(|segment| {
                    segment.transformed(|p| rotate_around_axis(p, Vec3::Y, center, rotation))
                })
                .collect(),
            is_profile_inward: clip.is_profile_inward,
        })
        .collect()
}
