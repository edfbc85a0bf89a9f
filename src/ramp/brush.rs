//! Brush side assembly shared by the single and chained document paths

use serde::{Deserialize, Serialize};

use crate::math::Vec3;
use crate::vmf::{Color, Editor, Plane, SideSpec, Solid, VmfBuilder};

use super::geometry::BrushSegment;
use super::uv::{TextureOffsets, world_aligned_uv};

/// Material of faces that are never seen
pub const NODRAW: &str = "TOOLS/TOOLSNODRAW";
pub const PLAYER_CLIP: &str = "tools/toolsplayerclip";

/// Materials of the two faces closing a ramp
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapMaterials {
    pub start: String,
    pub end: String,
}

/// Texture projection of the lateral faces of a segment
pub(crate) enum LateralUv<'a> {
    /// textures follow the sweep, continuing the running shifts
    Swept(&'a mut TextureOffsets),
    WorldAligned { scale: f64 },
}

/// One quad per profile edge. The quad between edge `j` on the start and on
/// the end cross-section is written `v4 v3 v2 v1` with plane `v2 v1 v4`.
pub(crate) fn lateral_sides(
    segment: &BrushSegment,
    material: &str,
    uv: &mut LateralUv<'_>,
) -> Vec<SideSpec> {
    let (start, end) = (&segment.start, &segment.end);
    let n = start.len().min(end.len());
    (0..n)
        .map(|j| {
            let next = (j + 1) % n;
            let (v1, v2, v3, v4) = (start[j], start[next], end[next], end[j]);
            let (uaxis, vaxis) = match uv {
                LateralUv::Swept(offsets) => {
                    let face = offsets.next_face(j, &v1, &v2, &v3, &v4);
                    (face.uaxis, face.vaxis)
                }
                LateralUv::WorldAligned { scale } => world_aligned_uv(&v2, &v1, &v4, *scale),
            };
            SideSpec {
                plane: Plane::new(v2, v1, v4),
                vertices: vec![v4, v3, v2, v1],
                material: material.to_string(),
                uaxis,
                vaxis,
            }
        })
        .collect()
}

/// The faces closing the segment at its start and end cross-section
pub(crate) fn cap_sides(
    segment: &BrushSegment,
    start_material: &str,
    end_material: &str,
    scale: f64,
) -> Vec<SideSpec> {
    let mut sides = Vec::with_capacity(2);
    if let [s0, s1, s2, ..] = segment.start.as_slice() {
        sides.push(cap_side(
            [*s0, *s1, *s2],
            segment.start.clone(),
            start_material,
            scale,
        ));
    }
    if let [e0, e1, e2, ..] = segment.end.as_slice() {
        let vertices = segment.end.iter().rev().copied().collect();
        sides.push(cap_side([*e0, *e2, *e1], vertices, end_material, scale));
    }
    sides
}

fn cap_side(plane: [Vec3; 3], vertices: Vec<Vec3>, material: &str, scale: f64) -> SideSpec {
    let [p1, p2, p3] = plane;
    let (uaxis, vaxis) = world_aligned_uv(&p1, &p2, &p3, scale);
    SideSpec {
        plane: Plane(plane),
        vertices,
        material: material.to_string(),
        uaxis,
        vaxis,
    }
}

/// Cap material of a segment end: the exposed material only at an open end
pub(crate) fn cap_material(exposed: bool, material: &str) -> &str {
    if exposed { material } else { NODRAW }
}

/// A visible brush for one segment
pub(crate) fn visual_brush(
    builder: &mut VmfBuilder,
    segment: &BrushSegment,
    material: &str,
    caps: (&str, &str),
    uv: &mut LateralUv<'_>,
    scale: f64,
) -> Solid {
    let mut sides = lateral_sides(segment, material, uv);
    sides.extend(cap_sides(segment, caps.0, caps.1, scale));
    builder.solid(sides, Editor::new(Color::VISUAL))
}

/// A player clip brush for one segment, every face uses the clip material
pub(crate) fn clip_brush(
    builder: &mut VmfBuilder,
    segment: &BrushSegment,
    group_id: u32,
    uv: &mut LateralUv<'_>,
    scale: f64,
) -> Solid {
    let mut sides = lateral_sides(segment, PLAYER_CLIP, uv);
    sides.extend(cap_sides(segment, PLAYER_CLIP, PLAYER_CLIP, scale));
    builder.solid(sides, Editor::grouped(Color::CLIP, group_id))
}
