//! Pan and zoom state of the image preview.
//!
//! # Coordinate System
//!
//! - Offsets are in frame pixels, measured from the centered position
//! - Scale 1.0 means the image exactly fills the frame
//! - Crop regions are normalized (0.0 to 1.0), origin at the top-left corner

mod bounds;
mod model;

pub use bounds::{clamp_offset, compute_bound};
pub use model::{CropRegion, ViewportModel, ViewportTransform};
