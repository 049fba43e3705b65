//! Feed a synthetic frame stream through the pipeline and print what the
//! render sink would see: a beacon drifts across the view, vanishes for a
//! few frames (the hold bridges the gap), then reappears.
//!
//! Run with `cargo run --example track_synthetic`.

use beacon_core::{init_with_level, Contour, LabColor};
use beacon_detect::{DetectionMode, FrameInput, FramePipeline, PipelineConfig, RegionCandidate};
use nalgebra::Point2;

fn circle(cx: f32, cy: f32, radius: f32) -> Contour {
    Contour::new(
        (0..48)
            .map(|k| {
                let t = std::f32::consts::TAU * k as f32 / 48.0;
                Point2::new(cx + radius * t.cos(), cy + radius * t.sin())
            })
            .collect(),
    )
}

fn main() {
    let _ = init_with_level(log::LevelFilter::Debug);

    let mut pipeline = FramePipeline::new(PipelineConfig::for_mode(DetectionMode::ObjectIndoor));
    let orange = LabColor::from_rgb8(253, 147, 70);

    for frame in 0..40u64 {
        // The beacon is occluded for frames 20..26.
        let candidates = if (20..26).contains(&frame) {
            vec![]
        } else {
            vec![RegionCandidate {
                contour: circle(100.0 + 4.0 * frame as f32, 120.0, 35.0),
                mean_color: orange,
            }]
        };
        let out = pipeline.process_frame(&FrameInput {
            candidates,
            hierarchy: None,
        });

        match &out.displayed {
            Some(det) => println!(
                "frame {frame:2}: {} at ({:6.1}, {:6.1})  v={:5.2} stab={:5.2} conf={:4.2}",
                det.label,
                det.centroid.x,
                det.centroid.y,
                out.metrics.velocity,
                out.metrics.stability,
                out.metrics.avg_confidence
            ),
            None => println!("frame {frame:2}: --"),
        }
    }
}
