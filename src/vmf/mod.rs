//! Valve Map Format (VMF) documents
//!
//! [`VmfBuilder`] assembles a [`Document`] while handing out unique IDs,
//! the writer renders it to the nested block text format.

mod builder;
mod color;
mod model;
mod writer;

pub use builder::{SideSpec, VmfBuilder};
pub use color::Color;
pub use model::*;
pub use writer::{VmfWriter, write};
