//! High-level facade crate for the `beacon-*` workspace.
//!
//! Provides stable, convenient re-exports of the underlying crates. An
//! upstream vision stage extracts contours (with hierarchy and region-average
//! Lab colors) from each frame; this workspace classifies them, matches the
//! active mode's rules and stabilizes the result over time.
//!
//! ## Quickstart
//!
//! ```
//! use beacon_vision::{DetectionMode, FrameInput, FramePipeline, PipelineConfig};
//!
//! let mut pipeline = FramePipeline::new(PipelineConfig::for_mode(DetectionMode::ObjectIndoor));
//!
//! // Candidates come from the external contour extractor, one frame at a time.
//! let frame = FrameInput { candidates: vec![], hierarchy: None };
//! let out = pipeline.process_frame(&frame);
//! assert!(out.displayed.is_none());
//! ```
//!
//! ## API map
//! - `beacon_vision::core`: contour geometry, hierarchy, Lab colors, logger.
//! - `beacon_vision::classify`: shape and nearest-palette color classifiers.
//! - `beacon_vision::detect`: rules, matcher, stability tracker, pipeline,
//!   performance reports.

pub use beacon_classify as classify;
pub use beacon_core as core;
pub use beacon_detect as detect;

pub use beacon_classify::{ColorClassifier, ShapeClassifier, ShapeLabel};
pub use beacon_core::{Contour, ContourHierarchy, LabColor};
pub use beacon_detect::{
    Detection, DetectionMode, DetectionRule, FrameInput, FrameOutput, FramePipeline,
    PipelineConfig, RegionCandidate, RuleMatcher, StabilityTracker,
};
