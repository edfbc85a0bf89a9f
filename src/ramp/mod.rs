//! Surf ramp generation
//!
//! A ramp is a cross-section [profile](profile) swept along a straight line
//! or a circular arc. [`generate_geometry`] produces the swept solids and
//! their player clip volumes, [`generate_vmf`] turns one ramp into a map
//! document and [`generate_connected_ramps`] with [`generate_connected_vmf`]
//! does the same for a chain of ramps.
//!
//! ```
//! use surframp::ramp::{RampParams, generate_vmf};
//!
//! let params = RampParams {
//!     material: "dev/dev_measuregeneric01".to_string(),
//!     ..Default::default()
//! };
//! let document = generate_vmf(&params, None);
//! assert_eq!(document.entities[0].solids.len(), 16);
//! let text = document.to_vmf_string();
//! assert!(text.starts_with("versioninfo\n{\n"));
//! ```

mod brush;
mod connected;
mod connection;
mod geometry;
mod params;
pub mod profile;
mod single;
mod uv;
mod visualization;

pub use brush::{CapMaterials, NODRAW, PLAYER_CLIP};
pub use connected::{
    CapState, ConnectedRamp, ConnectedRamps, generate_connected_ramps, generate_connected_vmf,
};
pub use connection::{ConnectionFrame, connection_frame, connection_transform};
pub use geometry::{
    BrushSegment, ClipSolid, RampGeometry, SpinConfig, SweptSolid, generate_geometry,
};
pub use params::{
    ChainConfig, ConfigError, ConnectionMode, RampAxis, RampConfig, RampDirection, RampParams,
    Style, Surf,
};
pub use profile::{Profile, generate_profiles};
pub use single::generate_vmf;
pub use uv::{FaceUv, TextureOffsets, face_uv, world_aligned_uv};
pub use visualization::{Triangle, triangles};
