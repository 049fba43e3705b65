use std::collections::VecDeque;

use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::matcher::Detection;

/// Stabilization settings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Consecutive empty frames tolerated before the held detection is
    /// discarded.
    pub disappearance_threshold: u32,
    /// Retention bound for the centroid history (FIFO).
    pub position_history_len: usize,
    /// Retention bound for the confidence history (FIFO).
    pub confidence_history_len: usize,
    /// Number of most recent centroids entering the stability metric.
    pub stability_window: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            disappearance_threshold: 10,
            position_history_len: 20,
            confidence_history_len: 10,
            stability_window: 10,
        }
    }
}

/// Derived per-frame metrics, pure functions of the bounded histories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerMetrics {
    /// Mean per-axis standard deviation over the recent centroid window.
    /// 0 with fewer than 3 samples.
    pub stability: f32,
    /// Distance between the two most recent centroids. 0 with fewer than 2.
    pub velocity: f32,
    /// Mean of the confidence history. 0 when empty.
    pub avg_confidence: f32,
}

/// Single-slot temporal stabilizer with disappearance hysteresis.
///
/// Two states: EMPTY (no memory) and HOLDING (remembers the last detection).
/// A held detection survives up to `disappearance_threshold - 1` consecutive
/// misses; the threshold-th miss clears it. The miss counter is advanced
/// before the display decision, matching the reference pipeline.
///
/// The histories are only cleared by [`reset`](Self::reset) — a disappearance
/// drops the held detection but keeps the bounded metric histories.
#[derive(Clone, Debug)]
pub struct StabilityTracker {
    config: TrackerConfig,
    held: Option<Detection>,
    frames_since_seen: u32,
    position_history: VecDeque<Point2<f32>>,
    confidence_history: VecDeque<f32>,
}

impl Default for StabilityTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl StabilityTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            held: None,
            frames_since_seen: 0,
            position_history: VecDeque::with_capacity(config.position_history_len),
            confidence_history: VecDeque::with_capacity(config.confidence_history_len),
        }
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Frames elapsed since the last hit. 0 while EMPTY or right after a hit.
    #[inline]
    pub fn frames_since_seen(&self) -> u32 {
        self.frames_since_seen
    }

    /// Apply one processed frame. Frames must arrive in capture order;
    /// skipped frames must not be passed here at all.
    ///
    /// Returns the detection to display for this frame, which may stem from
    /// an earlier frame while within the hysteresis window.
    pub fn update(&mut self, frame_index: u64, detection: Option<Detection>) -> Option<&Detection> {
        match detection {
            Some(det) => {
                self.position_history.push_back(det.centroid);
                while self.position_history.len() > self.config.position_history_len {
                    self.position_history.pop_front();
                }
                self.confidence_history.push_back(det.confidence);
                while self.confidence_history.len() > self.config.confidence_history_len {
                    self.confidence_history.pop_front();
                }
                self.frames_since_seen = 0;
                self.held = Some(det);
            }
            None => {
                if self.held.is_some() {
                    self.frames_since_seen += 1;
                    if self.frames_since_seen >= self.config.disappearance_threshold {
                        debug!(
                            "frame {frame_index}: held detection dropped after {} misses",
                            self.frames_since_seen
                        );
                        self.held = None;
                    }
                }
            }
        }
        self.held.as_ref()
    }

    /// The currently displayed detection, if any.
    #[inline]
    pub fn displayed(&self) -> Option<&Detection> {
        self.held.as_ref()
    }

    /// Mean per-axis standard deviation over the most recent centroid window.
    pub fn stability(&self) -> f32 {
        let window = self.config.stability_window.min(self.position_history.len());
        if window < 3 {
            return 0.0;
        }
        let start = self.position_history.len() - window;
        let points: Vec<&Point2<f32>> = self.position_history.iter().skip(start).collect();
        let n = points.len() as f32;
        let mean_x = points.iter().map(|p| p.x).sum::<f32>() / n;
        let mean_y = points.iter().map(|p| p.y).sum::<f32>() / n;
        let var_x = points.iter().map(|p| (p.x - mean_x).powi(2)).sum::<f32>() / n;
        let var_y = points.iter().map(|p| (p.y - mean_y).powi(2)).sum::<f32>() / n;
        0.5 * (var_x.sqrt() + var_y.sqrt())
    }

    /// Distance between the two most recent centroids.
    pub fn velocity(&self) -> f32 {
        let len = self.position_history.len();
        if len < 2 {
            return 0.0;
        }
        let a = self.position_history[len - 2];
        let b = self.position_history[len - 1];
        (b - a).norm()
    }

    /// Mean of the bounded confidence history.
    pub fn average_confidence(&self) -> f32 {
        if self.confidence_history.is_empty() {
            return 0.0;
        }
        self.confidence_history.iter().sum::<f32>() / self.confidence_history.len() as f32
    }

    pub fn metrics(&self) -> TrackerMetrics {
        TrackerMetrics {
            stability: self.stability(),
            velocity: self.velocity(),
            avg_confidence: self.average_confidence(),
        }
    }

    /// Unconditionally clear all state: held detection, miss counter and both
    /// histories. An explicit external command, never triggered internally.
    pub fn reset(&mut self) {
        self.held = None;
        self.frames_since_seen = 0;
        self.position_history.clear();
        self.confidence_history.clear();
        debug!("tracker state reset");
    }

    #[cfg(test)]
    fn position_history(&self) -> &VecDeque<Point2<f32>> {
        &self.position_history
    }
}
