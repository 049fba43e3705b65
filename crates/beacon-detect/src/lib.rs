//! Rule-based beacon detection with temporal stabilization.
//!
//! Per frame, an upstream vision stage hands over candidate contours with
//! their nesting hierarchy and region-average Lab colors. This crate then:
//! 1. classifies each candidate by shape and color (`beacon-classify`),
//! 2. matches candidates against the active mode's ordered rule list,
//!    including nested parent/child rules ([`RuleMatcher`]),
//! 3. stabilizes the per-frame result into a single displayed detection with
//!    disappearance hysteresis ([`StabilityTracker`]).
//!
//! [`FramePipeline`] wires the three stages together and adds the frame-skip
//! gate and the between-frame control surface (mode switch, reset).
//!
//! The per-frame data path never fails: degenerate contours and missing
//! hierarchy information degrade to "no match" instead of errors. The only
//! fallible operations are report I/O and mode-name parsing.

mod error;
mod matcher;
mod pipeline;
mod report;
mod rules;
mod tracker;

pub use error::{ParseModeError, ReportError};
pub use matcher::{Detection, MatcherParams, RegionCandidate, RuleMatcher};
pub use pipeline::{FrameInput, FrameOutput, FramePipeline, PipelineConfig};
pub use report::{
    analyze_candidate, ClassPerformance, ContourAnalysis, DetectionScorer, Evaluation,
    GroundTruth, OverallPerformance, PerformanceSummary,
};
pub use rules::{ChildConstraint, DetectionMode, DetectionRule};
pub use tracker::{StabilityTracker, TrackerConfig, TrackerMetrics};
