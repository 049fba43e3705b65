//! Core contour geometry and color types for beacon detection.
//!
//! This crate is intentionally small and purely geometric/colorimetric. It
//! does *not* depend on any image type or contour extractor: contours and
//! their hierarchy arrive here already extracted by an upstream vision stage.

mod color;
mod contour;
mod hierarchy;
mod logger;

pub use color::LabColor;
pub use contour::{Contour, Rect};
pub use hierarchy::{ContourHierarchy, HierarchyNode};
pub use logger::init_with_level;
