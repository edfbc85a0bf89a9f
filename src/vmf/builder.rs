use crate::math::Vec3;

use super::color::Color;
use super::model::{Document, Editor, Entity, Group, Plane, Side, Solid, TextureAxis};

const FIRST_ID: u32 = 2;
const DEFAULT_LIGHTMAP_SCALE: u32 = 16;

/// A side that has not been assigned an ID yet
#[derive(Debug, Clone, PartialEq)]
pub struct SideSpec {
    pub plane: Plane,
    pub vertices: Vec<Vec3>,
    pub material: String,
    pub uaxis: TextureAxis,
    pub vaxis: TextureAxis,
}

/// Assembles a [`Document`], handing out IDs in creation order.
///
/// One builder per document, the counter is never shared.
#[derive(Debug)]
pub struct VmfBuilder {
    next_id: u32,
    document: Document,
}

impl Default for VmfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VmfBuilder {
    pub fn new() -> Self {
        Self {
            next_id: FIRST_ID,
            document: Document::default(),
        }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Creates a solid, the solid takes the next ID followed by its sides.
    pub fn solid(&mut self, sides: Vec<SideSpec>, editor: Editor) -> Solid {
        let id = self.next_id();
        let sides = sides
            .into_iter()
            .map(|spec| Side {
                id: self.next_id(),
                plane: spec.plane,
                vertices: spec.vertices,
                material: spec.material,
                uaxis: spec.uaxis,
                vaxis: spec.vaxis,
                rotation: 0,
                lightmap_scale: DEFAULT_LIGHTMAP_SCALE,
                smoothing_groups: 0,
            })
            .collect();
        Solid { id, sides, editor }
    }

    pub fn add_world_solid(&mut self, solid: Solid) {
        self.document.world.solids.push(solid);
    }

    /// Registers a new editor group and returns its ID
    pub fn add_group(&mut self) -> u32 {
        let id = self.next_id();
        self.document.world.groups.push(Group {
            id,
            editor: Editor::new(Color::GROUP),
        });
        id
    }

    /// Wraps already created solids in an entity, which takes the next ID
    pub fn add_entity(
        &mut self,
        classname: &str,
        solids: Vec<Solid>,
        properties: Vec<(String, String)>,
    ) -> u32 {
        let id = self.next_id();
        self.document.entities.push(Entity {
            id,
            classname: classname.to_string(),
            solids,
            properties,
        });
        id
    }

    pub fn finish(self) -> Document {
        self.document
    }
}
