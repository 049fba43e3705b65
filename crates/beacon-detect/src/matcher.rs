use std::cmp::Ordering;
use std::collections::HashSet;

use beacon_classify::{ColorClassifier, ShapeClassifier, ShapeLabel};
use beacon_core::{Contour, ContourHierarchy, LabColor};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::rules::DetectionRule;

/// One candidate contour handed over by the upstream extractor.
///
/// `mean_color` is the average Lab color over the contour's eroded interior
/// mask, precomputed upstream so boundary/anti-aliasing pixels do not bleed
/// into the sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionCandidate {
    pub contour: Contour,
    pub mean_color: LabColor,
}

/// A winning rule match for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub centroid: Point2<f32>,
    pub contour: Contour,
    pub frame_index: u64,
    /// Normalized area confidence: `min(area / 1000, 1.0)`.
    pub confidence: f32,
}

/// Matching thresholds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MatcherParams {
    /// Candidates below this area are noise and excluded.
    pub min_area: f32,
}

impl Default for MatcherParams {
    fn default() -> Self {
        Self { min_area: 150.0 }
    }
}

/// Evaluates an ordered rule list against one frame's classified candidates.
///
/// Candidates are scanned in descending area order and each is classified
/// exactly once; the first rule satisfied by the first (largest) satisfying
/// candidate wins. Hierarchy indices refer to positions in the candidate
/// slice; a frame without hierarchy information simply disables nested rules.
#[derive(Clone, Debug, Default)]
pub struct RuleMatcher {
    params: MatcherParams,
    shapes: ShapeClassifier,
    colors: ColorClassifier,
}

impl RuleMatcher {
    pub fn new(params: MatcherParams) -> Self {
        Self {
            params,
            shapes: ShapeClassifier::default(),
            colors: ColorClassifier::default(),
        }
    }

    pub fn with_classifiers(
        params: MatcherParams,
        shapes: ShapeClassifier,
        colors: ColorClassifier,
    ) -> Self {
        Self {
            params,
            shapes,
            colors,
        }
    }

    #[inline]
    pub fn params(&self) -> &MatcherParams {
        &self.params
    }

    #[inline]
    pub fn shape_classifier(&self) -> &ShapeClassifier {
        &self.shapes
    }

    #[inline]
    pub fn color_classifier(&self) -> &ColorClassifier {
        &self.colors
    }

    /// Evaluate one frame; at most one detection is produced.
    pub fn match_frame(
        &self,
        candidates: &[RegionCandidate],
        hierarchy: Option<&ContourHierarchy>,
        rules: &[DetectionRule],
        frame_index: u64,
    ) -> Option<Detection> {
        self.collect_matches(candidates, hierarchy, rules, frame_index, true)
            .into_iter()
            .next()
    }

    /// Every match in priority order, for diagnostics and offline evaluation.
    ///
    /// Child-consumption bookkeeping is shared across the whole frame: a child
    /// index consumed by one parent match cannot satisfy a later parent's
    /// nested rule.
    pub fn match_all(
        &self,
        candidates: &[RegionCandidate],
        hierarchy: Option<&ContourHierarchy>,
        rules: &[DetectionRule],
        frame_index: u64,
    ) -> Vec<Detection> {
        self.collect_matches(candidates, hierarchy, rules, frame_index, false)
    }

    fn collect_matches(
        &self,
        candidates: &[RegionCandidate],
        hierarchy: Option<&ContourHierarchy>,
        rules: &[DetectionRule],
        frame_index: u64,
        stop_after_first: bool,
    ) -> Vec<Detection> {
        let areas: Vec<f32> = candidates.iter().map(|c| c.contour.area()).collect();
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| areas[b].partial_cmp(&areas[a]).unwrap_or(Ordering::Equal));

        let mut cache: Vec<Option<(ShapeLabel, Option<&str>)>> = vec![None; candidates.len()];
        let mut used_children: HashSet<usize> = HashSet::new();
        let mut out = Vec::new();

        'candidates: for &idx in &order {
            // Descending order: everything after this is smaller still.
            if areas[idx] < self.params.min_area {
                break;
            }
            let (shape, color) = self.classify_cached(&mut cache, candidates, idx);

            for rule in rules {
                if shape != rule.shape || !prefix_matches(color, &rule.color_prefix) {
                    continue;
                }
                let consumed_child = match &rule.child {
                    Some(constraint) => {
                        // Nested rules need hierarchy information for this frame.
                        let Some(h) = hierarchy else { continue };
                        let Some(child_idx) = h.first_child(idx) else {
                            continue;
                        };
                        if child_idx >= candidates.len() || used_children.contains(&child_idx) {
                            continue;
                        }
                        let (child_shape, child_color) =
                            self.classify_cached(&mut cache, candidates, child_idx);
                        // Child color is exact-name, not prefix.
                        if child_shape != constraint.shape
                            || child_color != Some(constraint.color.as_str())
                        {
                            continue;
                        }
                        Some(child_idx)
                    }
                    None => None,
                };

                // A vanishing zeroth moment means the candidate is degenerate;
                // skip it silently without consuming its child.
                let Some(centroid) = candidates[idx].contour.centroid() else {
                    continue 'candidates;
                };
                if let Some(child_idx) = consumed_child {
                    used_children.insert(child_idx);
                }
                debug!(
                    "frame {frame_index}: `{}` matched candidate {idx} ({} {:?}) at ({:.1}, {:.1})",
                    rule.label,
                    shape,
                    color,
                    centroid.x,
                    centroid.y
                );
                out.push(Detection {
                    label: rule.label.clone(),
                    centroid,
                    contour: candidates[idx].contour.clone(),
                    frame_index,
                    confidence: (areas[idx] / 1000.0).min(1.0),
                });
                if stop_after_first {
                    break 'candidates;
                }
                // First satisfied rule wins for this candidate.
                continue 'candidates;
            }
        }
        out
    }

    fn classify_cached<'s>(
        &'s self,
        cache: &mut [Option<(ShapeLabel, Option<&'s str>)>],
        candidates: &[RegionCandidate],
        idx: usize,
    ) -> (ShapeLabel, Option<&'s str>) {
        if let Some(entry) = cache[idx] {
            return entry;
        }
        let shape = self.shapes.classify(&candidates[idx].contour);
        let color = self.colors.classify(&candidates[idx].mean_color);
        cache[idx] = Some((shape, color));
        (shape, color)
    }
}

fn prefix_matches(color: Option<&str>, prefix: &str) -> bool {
    color.is_some_and(|name| name.starts_with(prefix))
}
