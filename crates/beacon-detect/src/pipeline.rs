use beacon_core::ContourHierarchy;
use log::info;
use serde::{Deserialize, Serialize};

use crate::matcher::{Detection, MatcherParams, RegionCandidate, RuleMatcher};
use crate::rules::{DetectionMode, DetectionRule};
use crate::tracker::{StabilityTracker, TrackerConfig, TrackerMetrics};

/// Pipeline settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub mode: DetectionMode,
    #[serde(default)]
    pub matcher: MatcherParams,
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Frames dropped between analyzed frames (0 = analyze every frame).
    /// Dropped frames bypass classification, matching and tracker bookkeeping
    /// entirely, so they neither count as hits nor as misses.
    #[serde(default)]
    pub frames_to_skip: u32,
}

impl PipelineConfig {
    pub fn for_mode(mode: DetectionMode) -> Self {
        Self {
            mode,
            matcher: MatcherParams::default(),
            tracker: TrackerConfig::default(),
            frames_to_skip: 0,
        }
    }
}

/// One frame's worth of extractor output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameInput {
    pub candidates: Vec<RegionCandidate>,
    /// Nesting relations for `candidates`, when the extractor provides them.
    /// Absent hierarchy disables nested rules for this frame only.
    pub hierarchy: Option<ContourHierarchy>,
}

/// Per-frame result handed to the render/report sink.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameOutput {
    /// Zero or one stabilized detection; may stem from an earlier frame
    /// while within the hysteresis window.
    pub displayed: Option<Detection>,
    pub metrics: TrackerMetrics,
    /// False when the frame-skip gate suppressed analysis for this frame.
    pub analyzed: bool,
}

/// Frame-synchronous detection pipeline: matcher plus stability tracker plus
/// the frame-skip gate.
///
/// Single-threaded by contract: one frame is fully processed before the next
/// is accepted, and frames must be submitted in capture order. The control
/// surface ([`set_mode`](Self::set_mode), [`reset`](Self::reset)) takes
/// `&mut self`, so mode swaps can only happen between frames.
pub struct FramePipeline {
    mode: DetectionMode,
    rules: Vec<DetectionRule>,
    matcher: RuleMatcher,
    tracker: StabilityTracker,
    frames_to_skip: u32,
    frame_index: u64,
}

impl FramePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        info!("detection mode: {}", config.mode);
        Self {
            mode: config.mode,
            rules: config.mode.rules(),
            matcher: RuleMatcher::new(config.matcher),
            tracker: StabilityTracker::new(config.tracker),
            frames_to_skip: config.frames_to_skip,
            frame_index: 0,
        }
    }

    #[inline]
    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    #[inline]
    pub fn matcher(&self) -> &RuleMatcher {
        &self.matcher
    }

    #[inline]
    pub fn tracker(&self) -> &StabilityTracker {
        &self.tracker
    }

    /// Number of frames submitted so far.
    #[inline]
    pub fn frames_seen(&self) -> u64 {
        self.frame_index
    }

    /// Swap the active rule list. Takes effect for the next frame; tracker
    /// state is deliberately kept so a held detection survives the switch.
    pub fn set_mode(&mut self, mode: DetectionMode) {
        if mode != self.mode {
            info!("detection mode: {} -> {}", self.mode, mode);
            self.mode = mode;
            self.rules = mode.rules();
        }
    }

    /// Clear all tracker state. External command only.
    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    /// Process the next frame in capture order.
    pub fn process_frame(&mut self, input: &FrameInput) -> FrameOutput {
        let frame_index = self.frame_index;
        self.frame_index += 1;

        if self.frames_to_skip > 0 && frame_index % (self.frames_to_skip as u64 + 1) != 0 {
            // Skipped frames are invisible to the hysteresis counter.
            return FrameOutput {
                displayed: self.tracker.displayed().cloned(),
                metrics: self.tracker.metrics(),
                analyzed: false,
            };
        }

        let detection = self.matcher.match_frame(
            &input.candidates,
            input.hierarchy.as_ref(),
            &self.rules,
            frame_index,
        );
        let displayed = self.tracker.update(frame_index, detection).cloned();
        FrameOutput {
            displayed,
            metrics: self.tracker.metrics(),
            analyzed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::{Contour, LabColor};
    use nalgebra::Point2;

    fn orange_circle_frame() -> FrameInput {
        let contour = Contour::new(
            (0..32)
                .map(|k| {
                    let t = std::f32::consts::TAU * k as f32 / 32.0;
                    Point2::new(100.0 + 30.0 * t.cos(), 100.0 + 30.0 * t.sin())
                })
                .collect(),
        );
        FrameInput {
            candidates: vec![RegionCandidate {
                contour,
                mean_color: LabColor::from_rgb8(253, 147, 70),
            }],
            hierarchy: None,
        }
    }

    fn empty_frame() -> FrameInput {
        FrameInput {
            candidates: vec![],
            hierarchy: None,
        }
    }

    #[test]
    fn skipped_frames_do_not_advance_hysteresis() {
        let mut config = PipelineConfig::for_mode(DetectionMode::ObjectIndoor);
        config.frames_to_skip = 1; // analyze every other frame
        let mut pipeline = FramePipeline::new(config);

        let out = pipeline.process_frame(&orange_circle_frame());
        assert!(out.analyzed);
        assert!(out.displayed.is_some());

        // 18 empty frames, but only 9 are analyzed: still within hysteresis.
        for _ in 0..18 {
            let out = pipeline.process_frame(&empty_frame());
            assert!(out.displayed.is_some(), "held detection must persist");
        }
        assert_eq!(pipeline.tracker().frames_since_seen(), 9);

        // Two more frames bring the analyzed miss count to 10: cleared.
        pipeline.process_frame(&empty_frame());
        let out = pipeline.process_frame(&empty_frame());
        assert!(out.displayed.is_none());
    }

    #[test]
    fn skipped_frames_report_analyzed_false() {
        let mut config = PipelineConfig::for_mode(DetectionMode::ObjectIndoor);
        config.frames_to_skip = 2;
        let mut pipeline = FramePipeline::new(config);
        let flags: Vec<bool> = (0..6)
            .map(|_| pipeline.process_frame(&empty_frame()).analyzed)
            .collect();
        assert_eq!(flags, vec![true, false, false, true, false, false]);
    }

    #[test]
    fn mode_switch_swaps_rules_and_keeps_held_detection() {
        let mut pipeline = FramePipeline::new(PipelineConfig::for_mode(DetectionMode::ObjectIndoor));
        assert!(pipeline
            .process_frame(&orange_circle_frame())
            .displayed
            .is_some());

        pipeline.set_mode(DetectionMode::FinishStartLeft);
        assert_eq!(pipeline.mode(), DetectionMode::FinishStartLeft);

        // The orange circle no longer matches, but the hold window keeps it
        // on screen for a while.
        let out = pipeline.process_frame(&orange_circle_frame());
        assert!(out.analyzed);
        assert_eq!(out.displayed.unwrap().label, "Object indoor");
    }

    #[test]
    fn reset_clears_displayed_state() {
        let mut pipeline = FramePipeline::new(PipelineConfig::for_mode(DetectionMode::ObjectIndoor));
        pipeline.process_frame(&orange_circle_frame());
        assert!(pipeline.tracker().displayed().is_some());
        pipeline.reset();
        assert!(pipeline.tracker().displayed().is_none());
        let out = pipeline.process_frame(&empty_frame());
        assert!(out.displayed.is_none());
    }
}
