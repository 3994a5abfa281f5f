//! Batch analysis for multi-camera attention recordings
//!
//! Two independent engines share this crate: a salient-frame selector that
//! scans a 6-DoF head-pose trace for moments of high local variability
//! (frames worth manual annotation), and a multi-view geometry layer that
//! projects world points into the rig's tiled camera mosaic and triangulates
//! an attention target back out of per-camera 2D observations.

pub mod error;
pub mod multiview;
pub mod selection;
pub mod trace;
pub mod types;

pub use error::{ReviewError, ReviewResult};
