//! Shape and perceptual-color classifiers for contour candidates.
//!
//! Built on top of `beacon-core`: a [`ShapeClassifier`] labels a contour as
//! square/rectangle/circle from its simplified polygon, and a
//! [`ColorClassifier`] names a region-average Lab sample by nearest palette
//! entry. Both are deterministic and never fail; malformed input degrades to
//! [`ShapeLabel::Unidentified`] or the nearest palette entry.

mod color;
mod shape;

pub use color::{ColorClassifier, NamedColor};
pub use shape::{ShapeClassifier, ShapeClassifierParams, ShapeLabel};
