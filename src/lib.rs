//! Surframp generates surf ramps for Source engine maps.
//!
//! Ramps are swept cross-sections made of convex brushes, with invisible
//! player clip volumes that keep players from snagging on the seams between
//! brushes. The result is written in the Valve Map Format (VMF) that the
//! Hammer level editor reads.

pub mod math;
pub mod ramp;
pub mod vmf;

#[cfg(feature = "wasm")]
mod wasm;
