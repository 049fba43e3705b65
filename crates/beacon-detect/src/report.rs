//! Offline accuracy evaluation against a known ground truth.
//!
//! Mirrors the interactive tester workflow: point the camera at a known
//! object, record per-contour classification outcomes, and export a JSON
//! performance report (`{accuracy, avg_confidence, total_tests}` per class
//! plus an `overall` block) for downstream analysis tooling.

use std::collections::BTreeMap;
use std::path::Path;

use beacon_classify::{ColorClassifier, ShapeClassifier, ShapeLabel};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::matcher::RegionCandidate;

/// Classification outcome plus confidence heuristics for one candidate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContourAnalysis {
    pub shape: ShapeLabel,
    pub color: Option<String>,
    /// Shape confidence from circularity / aspect-ratio agreement.
    pub shape_confidence: f32,
    /// Color confidence from normalized region area: `min(area / 1000, 1)`.
    pub color_confidence: f32,
}

/// Classify one candidate and derive its confidence scores.
pub fn analyze_candidate(
    shapes: &ShapeClassifier,
    colors: &ColorClassifier,
    candidate: &RegionCandidate,
) -> ContourAnalysis {
    let shape = shapes.classify(&candidate.contour);
    let color = colors.classify(&candidate.mean_color).map(str::to_string);

    let area = candidate.contour.area();
    let perimeter = candidate.contour.arc_length();

    let shape_confidence = if area > 0.0 && perimeter > 0.0 {
        let circularity = 4.0 * std::f32::consts::PI * area / (perimeter * perimeter);
        let aspect_ratio = candidate
            .contour
            .bounding_rect()
            .map(|r| r.aspect_ratio())
            .unwrap_or(0.0);
        match shape {
            ShapeLabel::Circle => (circularity * 2.0).min(1.0),
            ShapeLabel::Square => 1.0 - (1.0 - aspect_ratio).abs(),
            ShapeLabel::Rectangle => (aspect_ratio - 1.5).abs().min(1.0),
            ShapeLabel::Unidentified => 1.0 - circularity,
        }
    } else {
        0.0
    };

    ContourAnalysis {
        shape,
        color,
        shape_confidence,
        color_confidence: (area / 1000.0).min(1.0),
    }
}

/// What the operator placed in front of the camera.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundTruth {
    /// Color family prefix, e.g. "orange".
    pub color_family: String,
    pub shape: ShapeLabel,
}

/// Outcome of checking one analysis against the ground truth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub color_correct: bool,
    pub shape_correct: bool,
}

#[derive(Clone, Debug, Default)]
struct ClassStats {
    correct: u32,
    total: u32,
    confidences: Vec<f32>,
}

impl ClassStats {
    fn accuracy(&self) -> f32 {
        if self.total > 0 {
            self.correct as f32 / self.total as f32
        } else {
            0.0
        }
    }

    fn avg_confidence(&self) -> f32 {
        if self.confidences.is_empty() {
            return 0.0;
        }
        self.confidences.iter().sum::<f32>() / self.confidences.len() as f32
    }
}

/// Accumulates per-class accuracy statistics against a settable ground truth.
#[derive(Clone, Debug, Default)]
pub struct DetectionScorer {
    ground_truth: Option<GroundTruth>,
    color_stats: BTreeMap<String, ClassStats>,
    shape_stats: BTreeMap<String, ClassStats>,
}

impl DetectionScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ground_truth(&mut self, color_family: &str, shape: ShapeLabel) {
        self.ground_truth = Some(GroundTruth {
            color_family: color_family.to_string(),
            shape,
        });
    }

    #[inline]
    pub fn ground_truth(&self) -> Option<&GroundTruth> {
        self.ground_truth.as_ref()
    }

    /// Score one analysis. Returns `None` when no ground truth is set.
    pub fn record(&mut self, analysis: &ContourAnalysis) -> Option<Evaluation> {
        let truth = self.ground_truth.as_ref()?;

        let evaluation = Evaluation {
            color_correct: analysis
                .color
                .as_deref()
                .is_some_and(|c| c.starts_with(&truth.color_family)),
            shape_correct: analysis.shape == truth.shape,
        };

        let color_entry = self
            .color_stats
            .entry(truth.color_family.clone())
            .or_default();
        color_entry.total += 1;
        color_entry.correct += evaluation.color_correct as u32;
        color_entry.confidences.push(analysis.color_confidence);

        let shape_entry = self
            .shape_stats
            .entry(truth.shape.as_str().to_string())
            .or_default();
        shape_entry.total += 1;
        shape_entry.correct += evaluation.shape_correct as u32;
        shape_entry.confidences.push(analysis.shape_confidence);

        Some(evaluation)
    }

    /// Drop all accumulated statistics, keeping the ground truth.
    pub fn clear(&mut self) {
        self.color_stats.clear();
        self.shape_stats.clear();
    }

    pub fn summary(&self) -> PerformanceSummary {
        fn fold(stats: &BTreeMap<String, ClassStats>) -> (BTreeMap<String, ClassPerformance>, u32, u32) {
            let mut out = BTreeMap::new();
            let (mut correct, mut total) = (0, 0);
            for (name, s) in stats {
                if s.total == 0 {
                    continue;
                }
                out.insert(
                    name.clone(),
                    ClassPerformance {
                        accuracy: s.accuracy(),
                        avg_confidence: s.avg_confidence(),
                        total_tests: s.total,
                    },
                );
                correct += s.correct;
                total += s.total;
            }
            (out, correct, total)
        }

        let (color_performance, color_correct, color_total) = fold(&self.color_stats);
        let (shape_performance, shape_correct, shape_total) = fold(&self.shape_stats);

        PerformanceSummary {
            color_performance,
            shape_performance,
            overall: OverallPerformance {
                color_accuracy: ratio(color_correct, color_total),
                shape_accuracy: ratio(shape_correct, shape_total),
                total_tests: color_total.max(shape_total),
            },
        }
    }
}

fn ratio(correct: u32, total: u32) -> f32 {
    if total > 0 {
        correct as f32 / total as f32
    } else {
        0.0
    }
}

/// Per-class slice of the report.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassPerformance {
    pub accuracy: f32,
    pub avg_confidence: f32,
    pub total_tests: u32,
}

/// The `overall` block of the report.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverallPerformance {
    pub color_accuracy: f32,
    pub shape_accuracy: f32,
    pub total_tests: u32,
}

/// The JSON report consumed by the offline analysis tooling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub color_performance: BTreeMap<String, ClassPerformance>,
    pub shape_performance: BTreeMap<String, ClassPerformance>,
    pub overall: OverallPerformance,
}

impl PerformanceSummary {
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
