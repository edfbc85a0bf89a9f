//! Triangles for previewing ramps
//!
//! Viewers only need a triangle soup, so the swept solids are triangulated
//! lazily: two triangles per lateral quad and a fan per cap.

use crate::math::Vec3;

use super::connected::ConnectedRamps;
use super::geometry::{RampGeometry, SweptSolid};

pub type Triangle = [Vec3; 3];

/// Every triangle of the ramp's visual solids, caps are left out of loops
pub fn triangles(geometry: &RampGeometry) -> impl Iterator<Item = Triangle> + '_ {
    let open = !geometry.is_loop;
    geometry.solids.iter().flat_map(move |solid| {
        let lateral = solid
            .steps
            .windows(2)
            .flat_map(|pair| strip(&pair[0], &pair[1]));
        let caps = open.then(|| caps(solid)).into_iter().flatten();
        lateral.chain(caps)
    })
}

fn strip<'a>(current: &'a [Vec3], next: &'a [Vec3]) -> impl Iterator<Item = Triangle> + 'a {
    let n = current.len().min(next.len());
    (0..n).flat_map(move |j| {
        let nj = (j + 1) % n;
        [
            [current[j], current[nj], next[j]],
            [current[nj], next[nj], next[j]],
        ]
    })
}

fn caps(solid: &SweptSolid) -> impl Iterator<Item = Triangle> + '_ {
    let start = solid.steps.first().into_iter().flat_map(|step| fan(step, true));
    let end = solid.steps.last().into_iter().flat_map(|step| fan(step, false));
    start.chain(end)
}

/// The start cap is wound the other way so both caps face outwards
fn fan(step: &[Vec3], flip: bool) -> impl Iterator<Item = Triangle> + '_ {
    (1..step.len().saturating_sub(1)).map(move |j| {
        if flip {
            [step[0], step[j + 1], step[j]]
        } else {
            [step[0], step[j], step[j + 1]]
        }
    })
}

impl ConnectedRamps {
    /// Triangles of every ramp in the chain, placed by their transforms
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.ramps.iter().flat_map(|ramp| {
            triangles(&ramp.geometry).map(move |triangle| {
                triangle.map(|p| ramp.transform.transform_point(p))
            })
        })
    }
}
