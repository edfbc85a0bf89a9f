//! Math utilities
//!
//! This module provides:
//! - Vector types, axis-angle rotation and 2D edge normals (vec submodule)
//! - Rigid 4x4 transformations (matrix submodule)

mod matrix;
mod vec;

pub use matrix::*;
pub use vec::*;
