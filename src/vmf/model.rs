//! In-memory representation of a map document
//!
//! The model mirrors the nested block structure of the text format. Numbers
//! are kept as numbers, formatting happens in the writer.

use crate::math::Vec3;

use super::color::Color;

/// ID of the world block, every other ID is allocated from 2 upwards
pub const WORLD_ID: u32 = 1;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub world: World,
    pub entities: Vec<Entity>,
}

impl Document {
    /// Every solid, side, entity and group ID in document order
    pub fn ids(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        let solid_ids = |solid: &Solid, ids: &mut Vec<u32>| {
            ids.push(solid.id);
            ids.extend(solid.sides.iter().map(|side| side.id));
        };
        for solid in &self.world.solids {
            solid_ids(solid, &mut ids);
        }
        ids.extend(self.world.groups.iter().map(|group| group.id));
        for entity in &self.entities {
            ids.push(entity.id);
            for solid in &entity.solids {
                solid_ids(solid, &mut ids);
            }
        }
        ids
    }

    /// All solids, world solids first
    pub fn solids(&self) -> impl Iterator<Item = &Solid> {
        self.world
            .solids
            .iter()
            .chain(self.entities.iter().flat_map(|e| e.solids.iter()))
    }
}

/// The `world` block: clip brushes and their groups
#[derive(Debug, Clone, PartialEq, Default)]
pub struct World {
    pub solids: Vec<Solid>,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    pub id: u32,
    pub sides: Vec<Side>,
    pub editor: Editor,
}

/// One face of a brush
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub id: u32,
    pub plane: Plane,
    /// Explicit vertex loop written as `vertices_plus`, skipped when empty
    pub vertices: Vec<Vec3>,
    pub material: String,
    pub uaxis: TextureAxis,
    pub vaxis: TextureAxis,
    pub rotation: i32,
    pub lightmap_scale: u32,
    pub smoothing_groups: u32,
}

/// Three points on a face, written as `(x y z) (x y z) (x y z)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane(pub [Vec3; 3]);

impl Plane {
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        Plane([p1, p2, p3])
    }
}

/// How the numbers of a texture axis are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisFormat {
    /// direction and shift with 4 decimals
    Fixed,
    /// shortest representation
    Shortest,
}

/// A texture axis `[x y z shift] scale`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureAxis {
    pub direction: Vec3,
    pub shift: f64,
    pub scale: f64,
    pub format: AxisFormat,
}

impl TextureAxis {
    pub fn fixed(direction: Vec3, shift: f64, scale: f64) -> Self {
        Self {
            direction,
            shift,
            scale,
            format: AxisFormat::Fixed,
        }
    }

    pub fn shortest(direction: Vec3, shift: f64, scale: f64) -> Self {
        Self {
            direction,
            shift,
            scale,
            format: AxisFormat::Shortest,
        }
    }
}

/// Hammer editor metadata of a solid or group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Editor {
    pub color: Color,
    pub visgroup_shown: bool,
    pub visgroup_auto_shown: bool,
    pub group_id: Option<u32>,
}

impl Editor {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            visgroup_shown: true,
            visgroup_auto_shown: true,
            group_id: None,
        }
    }

    pub fn grouped(color: Color, group_id: u32) -> Self {
        Self {
            group_id: Some(group_id),
            ..Self::new(color)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Group {
    pub id: u32,
    pub editor: Editor,
}

/// A brush entity. Properties are written after the solids.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub classname: String,
    pub solids: Vec<Solid>,
    pub properties: Vec<(String, String)>,
}

impl Entity {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
