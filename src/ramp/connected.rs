//! Chains of ramps
//!
//! A chain shares one set of cross-section parameters and overrides the
//! direction, angle and size per ramp. Every ramp is generated in its own
//! local frame and then placed against its predecessor with the transform
//! from [`connection_transform`].
//!
//! Where two chained ramps meet, their clip volumes may sit on different
//! sides of the turn. One of them overlaps the neighbouring segments while
//! the other does not, so the junction is spliced: the last boundary segment
//! of the previous ramp is dropped and the first one of the current ramp is
//! stretched to close the gap.

use log::{debug, warn};
use tracing::instrument;

use crate::math::Matrix4;
use crate::vmf::{Document, Solid, VmfBuilder};

use super::brush::{CapMaterials, LateralUv, NODRAW, cap_material, clip_brush, visual_brush};
use super::connection::connection_transform;
use super::geometry::{BrushSegment, RampGeometry, generate_geometry};
use super::params::{ChainConfig, ConnectionMode, RampAxis, RampConfig, RampParams};
use super::uv::TextureOffsets;

/// Property making a `func_brush` never solid
const SOLIDITY_NEVER: (&str, &str) = ("solidity", "1");

/// Which ends of a ramp attach to a neighbour in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapState {
    pub start_connected: bool,
    pub end_connected: bool,
}

impl CapState {
    /// Connected ends are hidden, open ends show `material`
    pub fn materials(&self, material: &str) -> CapMaterials {
        let pick = |connected: bool| {
            if connected {
                NODRAW.to_string()
            } else {
                material.to_string()
            }
        };
        CapMaterials {
            start: pick(self.start_connected),
            end: pick(self.end_connected),
        }
    }
}

/// A ramp placed in a chain
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedRamp {
    pub params: RampParams,
    /// Places the ramp's local geometry relative to the first ramp
    pub transform: Matrix4,
    /// Geometry in the ramp's local frame
    pub geometry: RampGeometry,
    pub cap_state: CapState,
    pub cap_materials: CapMaterials,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedRamps {
    pub shared: RampParams,
    pub mode: ConnectionMode,
    pub ramps: Vec<ConnectedRamp>,
}

impl ConnectedRamps {
    pub fn from_config(config: &ChainConfig) -> Self {
        generate_connected_ramps(&config.shared, &config.ramps, config.connection_mode)
    }

    pub fn is_empty(&self) -> bool {
        self.ramps.is_empty()
    }
}

/// Generates and places every ramp of a chain.
///
/// The first ramp stays at the origin. An empty `configs` slice results in a
/// chain without ramps.
#[instrument(skip_all, fields(ramps = configs.len(), ?mode))]
pub fn generate_connected_ramps(
    shared: &RampParams,
    configs: &[RampConfig],
    mode: ConnectionMode,
) -> ConnectedRamps {
    let params: Vec<RampParams> = configs
        .iter()
        .enumerate()
        .map(|(index, config)| shared.with_overrides(config, index))
        .collect();

    let mut transforms: Vec<Matrix4> = Vec::with_capacity(params.len());
    for (index, current) in params.iter().enumerate() {
        let transform = match index.checked_sub(1) {
            None => Matrix4::identity(),
            Some(prev) => connection_transform(&params[prev], current, &transforms[prev], mode),
        };
        transforms.push(transform);
    }

    let states = cap_states(params.len(), mode);
    let ramps = params
        .into_iter()
        .zip(transforms)
        .zip(states)
        .map(|((params, transform), cap_state)| {
            let geometry = generate_geometry(&params);
            let cap_materials = cap_state.materials(&params.material);
            ConnectedRamp {
                params,
                transform,
                geometry,
                cap_state,
                cap_materials,
            }
        })
        .collect();

    ConnectedRamps {
        shared: shared.clone(),
        mode,
        ramps,
    }
}

fn cap_states(count: usize, mode: ConnectionMode) -> Vec<CapState> {
    let mut states = vec![CapState::default(); count];
    for i in 1..count {
        match mode {
            ConnectionMode::End => {
                states[i - 1].end_connected = true;
                states[i].start_connected = true;
            }
            ConnectionMode::Start => {
                states[i - 1].start_connected = true;
                states[i].end_connected = true;
            }
        }
    }
    states
}

/// Clip segments one ramp contributes to a clip volume, already in chain space
#[derive(Debug, Clone)]
struct RampClip {
    ramp: usize,
    axis: RampAxis,
    inward: bool,
    segments: Vec<BrushSegment>,
}

/// Clip volumes of the chain, one list per clip profile index
fn collect_clips(chain: &ConnectedRamps) -> Vec<Vec<RampClip>> {
    let mut volumes: Vec<Vec<RampClip>> = Vec::new();
    for (ramp, connected) in chain.ramps.iter().enumerate() {
        let transform = &connected.transform;
        for (index, clip) in connected.geometry.clip_solids.iter().enumerate() {
            if volumes.len() <= index {
                volumes.resize_with(index + 1, Vec::new);
            }
            volumes[index].push(RampClip {
                ramp,
                axis: connected.geometry.axis,
                inward: clip.is_profile_inward,
                segments: clip
                    .segments
                    .iter()
                    .map(|segment| segment.transformed(|p| transform.transform_point(p)))
                    .collect(),
            });
        }
    }
    volumes
}

/// Splices the clip segments of adjacent ramps whose clip profiles disagree
/// on being inward.
fn fix_clip_connections(clips: &mut [RampClip], mode: ConnectionMode) {
    for i in 1..clips.len() {
        let (head, tail) = clips.split_at_mut(i);
        let (prev, current) = (&mut head[i - 1], &mut tail[0]);

        if prev.inward == current.inward {
            continue;
        }
        if current.segments.len() == 1 {
            debug!(
                "Ramp {} has a single clip segment, junction with ramp {} left as is",
                current.ramp, prev.ramp
            );
            continue;
        }
        if !prev.axis.is_compatible_with(current.axis) {
            warn!(
                "Cannot join clip volumes of ramp {} ({:?}) and ramp {} ({:?}), leaving a seam",
                prev.ramp, prev.axis, current.ramp, current.axis
            );
            continue;
        }
        if prev.segments.len() < 2 {
            continue;
        }

        match mode {
            ConnectionMode::End => splice_end(prev, current),
            ConnectionMode::Start => splice_start(prev, current),
        }
        debug!(
            "Spliced clip junction between ramp {} and ramp {}",
            prev.ramp, current.ramp
        );
    }
}

/// The current ramp starts where the previous one ends
fn splice_end(prev: &mut RampClip, current: &mut RampClip) {
    let n = prev.segments.len();
    let start = if prev.inward {
        prev.segments[n - 1].start.clone()
    } else {
        prev.segments[n - 2].end.clone()
    };
    current.segments[0].start = start;
    prev.segments.pop();
}

/// The current ramp ends where the previous one starts
fn splice_start(prev: &mut RampClip, current: &mut RampClip) {
    let end = if prev.inward {
        prev.segments[0].end.clone()
    } else {
        prev.segments[1].start.clone()
    };
    if let Some(last) = current.segments.last_mut() {
        last.end = end;
    }
    prev.segments.remove(0);
}

/// Generates the map document of a whole chain, `None` for an empty chain.
///
/// Visual brushes are ordered by solid index and then by ramp, so the
/// texture of each lateral strip runs on from one ramp to the next.
#[instrument(skip_all, fields(ramp = %chain.shared.name))]
pub fn generate_connected_vmf(chain: &ConnectedRamps) -> Option<Document> {
    if chain.is_empty() {
        return None;
    }

    let mut clip_volumes = collect_clips(chain);
    for clips in clip_volumes.iter_mut() {
        fix_clip_connections(clips, chain.mode);
    }

    let mut builder = VmfBuilder::new();
    let visual = visual_brushes(&mut builder, chain);
    debug!("{} visual brushes", visual.len());
    if !visual.is_empty() {
        let classname = chain.shared.visual_entity.as_str();
        let properties = if classname == "func_brush" {
            vec![(SOLIDITY_NEVER.0.to_string(), SOLIDITY_NEVER.1.to_string())]
        } else {
            vec![]
        };
        builder.add_entity(classname, visual, properties);
    }
    add_clip_brushes(&mut builder, &clip_volumes, chain.shared.uv_scale);
    Some(builder.finish())
}

fn visual_brushes(builder: &mut VmfBuilder, chain: &ConnectedRamps) -> Vec<Solid> {
    let shared = &chain.shared;
    let solid_count = chain
        .ramps
        .iter()
        .map(|ramp| ramp.geometry.solids.len())
        .max()
        .unwrap_or(0);

    let mut brushes = Vec::new();
    for index in 0..solid_count {
        let mut offsets: Option<TextureOffsets> = None;
        for ramp in &chain.ramps {
            let Some(solid) = ramp.geometry.solids.get(index) else {
                continue;
            };
            let offsets = offsets.get_or_insert_with(|| {
                TextureOffsets::new(solid.steps.first().map_or(0, Vec::len), shared.uv_scale)
            });
            let open = !ramp.geometry.is_loop;
            let last = solid.segments.len().saturating_sub(1);
            for (i, segment) in solid.segments.iter().enumerate() {
                let placed = segment.transformed(|p| ramp.transform.transform_point(p));
                let start = cap_material(i == 0 && open, &ramp.cap_materials.start);
                let end = cap_material(i == last && open, &ramp.cap_materials.end);
                brushes.push(visual_brush(
                    builder,
                    &placed,
                    &shared.material,
                    (start, end),
                    &mut LateralUv::Swept(offsets),
                    shared.uv_scale,
                ));
            }
        }
    }
    brushes
}

fn add_clip_brushes(builder: &mut VmfBuilder, volumes: &[Vec<RampClip>], scale: f64) {
    let has_clips = volumes
        .iter()
        .flatten()
        .any(|clip| !clip.segments.is_empty());
    if !has_clips {
        return;
    }
    let group_id = builder.add_group();
    let mut count = 0;
    for segment in volumes.iter().flatten().flat_map(|clip| &clip.segments) {
        let solid = clip_brush(
            builder,
            segment,
            group_id,
            &mut LateralUv::WorldAligned { scale },
            scale,
        );
        builder.add_world_solid(solid);
        count += 1;
    }
    debug!("{count} clip brushes in group {group_id}");
}
