//! Arrow geometry
//!
//! Pure functions from arrow descriptors to outlines. No state and no
//! rendering dependencies.

pub mod arc;
pub mod arrow;

pub use arc::{ArcShaft, ShaftPoint};
pub use arrow::{ArrowDescriptor, ArrowPath, Dash, DrawLayer, FanOut, to_path};
