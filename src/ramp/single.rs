use log::debug;
use tracing::instrument;

use crate::vmf::{Document, Solid, VmfBuilder};

use super::brush::{CapMaterials, LateralUv, cap_material, clip_brush, visual_brush};
use super::geometry::{RampGeometry, generate_geometry};
use super::params::RampParams;
use super::uv::TextureOffsets;

const VISUAL_ENTITY: &str = "func_detail";

/// Generates the map document of a single ramp.
///
/// Visible brushes end up in a `func_detail` entity, player clip brushes in
/// the world, all in one editor group. `caps` overrides the materials of the
/// two open ends; a missing or empty override uses the ramp material.
#[instrument(skip_all, fields(ramp = %params.name))]
pub fn generate_vmf(params: &RampParams, caps: Option<&CapMaterials>) -> Document {
    let geometry = generate_geometry(params);
    let caps = resolve_caps(caps, &params.material);

    let mut builder = VmfBuilder::new();
    let visual = visual_brushes(&mut builder, &geometry, params, &caps);
    debug!("{} visual brushes", visual.len());
    if !visual.is_empty() {
        builder.add_entity(VISUAL_ENTITY, visual, vec![]);
    }
    add_clip_brushes(&mut builder, &geometry, params);
    builder.finish()
}

fn resolve_caps(caps: Option<&CapMaterials>, material: &str) -> CapMaterials {
    let pick = |cap: Option<&String>| match cap {
        Some(cap) if !cap.is_empty() => cap.clone(),
        _ => material.to_string(),
    };
    CapMaterials {
        start: pick(caps.map(|c| &c.start)),
        end: pick(caps.map(|c| &c.end)),
    }
}

fn visual_brushes(
    builder: &mut VmfBuilder,
    geometry: &RampGeometry,
    params: &RampParams,
    caps: &CapMaterials,
) -> Vec<Solid> {
    let mut brushes = Vec::new();
    for solid in &geometry.solids {
        let points = solid.steps.first().map_or(0, Vec::len);
        let mut offsets = TextureOffsets::new(points, params.uv_scale);
        let last = solid.segments.len().saturating_sub(1);
        for (i, segment) in solid.segments.iter().enumerate() {
            let start = cap_material(i == 0 && !geometry.is_loop, &caps.start);
            let end = cap_material(i == last && !geometry.is_loop, &caps.end);
            brushes.push(visual_brush(
                builder,
                segment,
                &params.material,
                (start, end),
                &mut LateralUv::Swept(&mut offsets),
                params.uv_scale,
            ));
        }
    }
    brushes
}

fn add_clip_brushes(builder: &mut VmfBuilder, geometry: &RampGeometry, params: &RampParams) {
    if geometry.clip_solids.iter().all(|clip| clip.segments.is_empty()) {
        return;
    }
    let group_id = builder.add_group();
    let mut count = 0;
    for clip in &geometry.clip_solids {
        let points = clip.segments.first().map_or(0, |s| s.start.len());
        let mut offsets = TextureOffsets::new(points, params.uv_scale);
        for segment in &clip.segments {
            let solid = clip_brush(
                builder,
                segment,
                group_id,
                &mut LateralUv::Swept(&mut offsets),
                params.uv_scale,
            );
            builder.add_world_solid(solid);
            count += 1;
        }
    }
    debug!("{count} clip brushes in group {group_id}");
}
